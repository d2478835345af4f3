use serde::{Deserialize, Serialize};

use super::{deserialize_opt_id, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusLocationDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(alias = "locationName")]
    pub name: String,
    #[serde(default, alias = "town")]
    pub city: Option<String>,
    #[serde(default, alias = "county")]
    pub region: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BusLocation {
    pub id: String,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub code: Option<String>,
}

impl TryFrom<BusLocationDto> for BusLocation {
    type Error = ApiError;

    fn try_from(dto: BusLocationDto) -> Result<Self, Self::Error> {
        // Stops without a city are usually the city itself.
        let city = dto
            .city
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| dto.name.clone());
        Ok(Self {
            id: record_id("location", dto.id, dto.mongo_id)?,
            name: dto.name,
            city,
            region: dto.region,
            code: dto.code,
        })
    }
}

impl BusLocation {
    /// "Name, City" unless both are the same.
    pub fn label(&self) -> String {
        if self.name.eq_ignore_ascii_case(&self.city) {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.city)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub name: String,
    pub city: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_city_defaults_to_name() {
        let dto: BusLocationDto =
            serde_json::from_str(r#"{"id": 3, "locationName": "Kisumu"}"#).unwrap();
        let location = BusLocation::try_from(dto).unwrap();
        assert_eq!(location.city, "Kisumu");
        assert_eq!(location.label(), "Kisumu");
    }

    #[test]
    fn test_label_includes_city() {
        let dto: BusLocationDto =
            serde_json::from_str(r#"{"id": "l1", "name": "Machakos Country Bus", "city": "Nairobi"}"#)
                .unwrap();
        assert_eq!(BusLocation::try_from(dto).unwrap().label(), "Machakos Country Bus, Nairobi");
    }
}
