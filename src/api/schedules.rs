use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;

use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{Schedule, ScheduleDto, ScheduleUpdate, SeatMap, SeatMapDto};

/// Query string of `GET /schedules/search`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduleQuery {
    pub origin: String,
    pub destination: String,
    pub date: NaiveDate,
    pub passengers: u32,
}

#[derive(Clone)]
pub struct ScheduleService {
    api: ApiClient,
}

impl ScheduleService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Schedule>> {
        let dtos: Vec<ScheduleDto> = self.api.get_list("/schedules").await?;
        convert_all(dtos)
    }

    pub async fn get(&self, id: &str) -> Result<Schedule> {
        let dto: ScheduleDto = self.api.get(&format!("/schedules/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn search(&self, query: &ScheduleQuery) -> Result<Vec<Schedule>> {
        let dtos: Vec<ScheduleDto> = self
            .api
            .get_list_query("/schedules/search", query)
            .await?;
        convert_all(dtos)
    }

    pub async fn by_route(&self, route_id: &str) -> Result<Vec<Schedule>> {
        let dtos: Vec<ScheduleDto> = self
            .api
            .get_list(&format!("/schedules/route/{}", segment(route_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn by_company(&self, company_id: &str) -> Result<Vec<Schedule>> {
        let dtos: Vec<ScheduleDto> = self
            .api
            .get_list(&format!("/schedules/company/{}", segment(company_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn seats(&self, id: &str) -> Result<SeatMap> {
        let dto: SeatMapDto = self.api.get(&format!("/schedules/{}/seats", segment(id))).await?;
        Ok(SeatMap::from_dto(id, dto))
    }

    pub async fn create(&self, schedule: &ScheduleUpdate) -> Result<Schedule> {
        let dto: ScheduleDto = self.api.post("/schedules", schedule).await?;
        dto.try_into()
    }

    pub async fn update(&self, id: &str, schedule: &ScheduleUpdate) -> Result<Schedule> {
        let dto: ScheduleDto = self.api.put(&format!("/schedules/{}", segment(id)), schedule).await?;
        dto.try_into()
    }

    pub async fn cancel(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(&format!("/schedules/{}/cancel", segment(id)), &json!({}))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/schedules/{}", segment(id))).await
    }
}
