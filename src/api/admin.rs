use serde_json::json;

use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{AdminStats, AdminStatsDto, Booking, BookingDto, Role, User, UserDto};

/// Platform-admin endpoints under `/admin`.
#[derive(Clone)]
pub struct AdminService {
    api: ApiClient,
}

impl AdminService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        let dto: AdminStatsDto = self.api.get("/admin/stats").await?;
        Ok(dto.into())
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        let dtos: Vec<UserDto> = self.api.get_list("/admin/users").await?;
        convert_all(dtos)
    }

    pub async fn set_role(&self, user_id: &str, role: Role) -> Result<()> {
        self.api
            .put_empty(
                &format!("/admin/users/{}/role", segment(user_id)),
                &json!({ "role": role.as_str() }),
            )
            .await
    }

    pub async fn set_active(&self, user_id: &str, active: bool) -> Result<()> {
        self.api
            .put_empty(
                &format!("/admin/users/{}/status", segment(user_id)),
                &json!({ "isActive": active }),
            )
            .await
    }

    pub async fn bookings(&self) -> Result<Vec<Booking>> {
        let dtos: Vec<BookingDto> = self.api.get_list("/admin/bookings").await?;
        convert_all(dtos)
    }
}
