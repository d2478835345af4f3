use super::client::{segment, ApiClient};
use crate::error::Result;
use crate::models::{PasswordChange, ProfileUpdate, User, UserDto};

#[derive(Clone)]
pub struct UserService {
    api: ApiClient,
}

impl UserService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn get(&self, id: &str) -> Result<User> {
        let dto: UserDto = self.api.get(&format!("/users/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<User> {
        let dto: UserDto = self.api.put(&format!("/users/{}", segment(id)), update).await?;
        dto.try_into()
    }

    pub async fn change_password(&self, id: &str, change: &PasswordChange) -> Result<()> {
        self.api
            .put_empty(&format!("/users/{}/password", segment(id)), change)
            .await
    }
}
