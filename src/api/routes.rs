use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{Route, RouteDto, RouteUpdate};

#[derive(Clone)]
pub struct RouteService {
    api: ApiClient,
}

impl RouteService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Route>> {
        let dtos: Vec<RouteDto> = self.api.get_list("/routes").await?;
        convert_all(dtos)
    }

    pub async fn get(&self, id: &str) -> Result<Route> {
        let dto: RouteDto = self.api.get(&format!("/routes/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn by_company(&self, company_id: &str) -> Result<Vec<Route>> {
        let dtos: Vec<RouteDto> = self
            .api
            .get_list(&format!("/routes/company/{}", segment(company_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn create(&self, route: &RouteUpdate) -> Result<Route> {
        let dto: RouteDto = self.api.post("/routes", route).await?;
        dto.try_into()
    }

    pub async fn update(&self, id: &str, route: &RouteUpdate) -> Result<Route> {
        let dto: RouteDto = self.api.put(&format!("/routes/{}", segment(id)), route).await?;
        dto.try_into()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/routes/{}", segment(id))).await
    }
}
