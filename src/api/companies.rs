use serde_json::json;

use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{Company, CompanyDto, CompanyStatus, CompanyUpdate};

#[derive(Clone)]
pub struct CompanyService {
    api: ApiClient,
}

impl CompanyService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<Company>> {
        let dtos: Vec<CompanyDto> = self.api.get_list("/companies").await?;
        convert_all(dtos)
    }

    pub async fn get(&self, id: &str) -> Result<Company> {
        let dto: CompanyDto = self.api.get(&format!("/companies/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn create(&self, company: &CompanyUpdate) -> Result<Company> {
        let dto: CompanyDto = self.api.post("/companies", company).await?;
        dto.try_into()
    }

    pub async fn update(&self, id: &str, company: &CompanyUpdate) -> Result<Company> {
        let dto: CompanyDto = self.api.put(&format!("/companies/{}", segment(id)), company).await?;
        dto.try_into()
    }

    /// Approves or suspends an operator.
    pub async fn set_status(&self, id: &str, status: CompanyStatus) -> Result<()> {
        self.api
            .put_empty(
                &format!("/companies/{}/status", segment(id)),
                &json!({ "status": status.as_str() }),
            )
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.api.delete(&format!("/companies/{}", segment(id))).await
    }
}
