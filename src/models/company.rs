use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_opt_id, parse_optional_timestamp, parse_variant, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompanyStatus {
    Pending,
    Active,
    Suspended,
}

impl CompanyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Active => "Active",
            Self::Suspended => "Suspended",
        }
    }
}

impl fmt::Display for CompanyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CompanyStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "status",
            s,
            &[
                ("pending", Self::Pending),
                ("active", Self::Active),
                ("approved", Self::Active),
                ("suspended", Self::Suspended),
                ("inactive", Self::Suspended),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(alias = "companyName")]
    pub name: String,
    pub email: String,
    #[serde(default, alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, alias = "busCount")]
    pub fleet_size: u32,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub status: CompanyStatus,
    pub fleet_size: u32,
    pub created_at: Option<DateTime<Utc>>,
}

impl TryFrom<CompanyDto> for Company {
    type Error = ApiError;

    fn try_from(dto: CompanyDto) -> Result<Self, Self::Error> {
        let status = match dto.status.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => CompanyStatus::Pending,
        };

        Ok(Self {
            created_at: parse_optional_timestamp("createdAt", dto.created_at.as_deref())?,
            id: record_id("company", dto.id, dto.mongo_id)?,
            name: dto.name,
            email: dto.email,
            phone: dto.phone,
            address: dto.address,
            status,
            fleet_size: dto.fleet_size,
        })
    }
}

/// Body for creating or editing a company.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyUpdate {
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_status_is_pending() {
        let dto: CompanyDto = serde_json::from_str(
            r#"{"id": "c1", "companyName": "Easy Coach", "email": "ops@easycoach.co.ke"}"#,
        )
        .unwrap();
        let company = Company::try_from(dto).unwrap();
        assert_eq!(company.name, "Easy Coach");
        assert_eq!(company.status, CompanyStatus::Pending);
        assert_eq!(company.fleet_size, 0);
    }

    #[test]
    fn test_unknown_status_is_an_error() {
        let dto: CompanyDto = serde_json::from_str(
            r#"{"id": "c1", "name": "X", "email": "x@y.z", "status": "archived"}"#,
        )
        .unwrap();
        assert!(Company::try_from(dto).is_err());
    }
}
