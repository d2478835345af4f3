use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{BusLocation, BusLocationDto, LocationUpdate};

#[derive(Clone)]
pub struct LocationService {
    api: ApiClient,
}

impl LocationService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<BusLocation>> {
        let dtos: Vec<BusLocationDto> = self.api.get_list("/locations").await?;
        convert_all(dtos)
    }

    pub async fn search(&self, term: &str) -> Result<Vec<BusLocation>> {
        let dtos: Vec<BusLocationDto> = self
            .api
            .get_list_query("/locations/search", &[("q", term)])
            .await?;
        convert_all(dtos)
    }

    pub async fn create(&self, location: &LocationUpdate) -> Result<BusLocation> {
        let dto: BusLocationDto = self.api.post("/locations", location).await?;
        dto.try_into()
    }

    pub async fn update(&self, id: &str, location: &LocationUpdate) -> Result<BusLocation> {
        let dto: BusLocationDto = self
            .api
            .put(&format!("/locations/{}", segment(id)), location)
            .await?;
        dto.try_into()
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/locations/{}", segment(id))).await
    }
}
