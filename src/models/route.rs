use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub company_id: String,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(alias = "from", alias = "source")]
    pub origin: String,
    #[serde(alias = "to")]
    pub destination: String,
    #[serde(default, alias = "distance")]
    pub distance_km: Option<f64>,
    #[serde(default, alias = "estimatedDuration", alias = "durationMinutes")]
    pub duration: u32,
    #[serde(alias = "price", alias = "basePrice")]
    pub base_fare: f64,
    #[serde(default = "default_active", alias = "isActive")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub id: String,
    pub company_id: String,
    pub company_name: Option<String>,
    pub origin: String,
    pub destination: String,
    pub distance_km: Option<f64>,
    pub duration_minutes: u32,
    pub base_price: f64,
    pub active: bool,
}

impl TryFrom<RouteDto> for Route {
    type Error = ApiError;

    fn try_from(dto: RouteDto) -> Result<Self, Self::Error> {
        Ok(Self {
            id: record_id("route", dto.id, dto.mongo_id)?,
            company_id: dto.company_id,
            company_name: dto.company_name,
            origin: dto.origin,
            destination: dto.destination,
            distance_km: dto.distance_km,
            duration_minutes: dto.duration,
            base_price: dto.base_fare,
            active: dto.active,
        })
    }
}

impl Route {
    pub fn label(&self) -> String {
        format!("{} → {}", self.origin, self.destination)
    }
}

/// Body for creating or editing a route.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    pub origin: String,
    pub destination: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    pub duration_minutes: u32,
    pub base_price: f64,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_route_from_legacy_names() {
        let dto: RouteDto = serde_json::from_str(
            r#"{"_id": 11, "companyId": 2, "from": "Nairobi", "to": "Kisumu",
                "estimatedDuration": 495, "price": 1450.0}"#,
        )
        .unwrap();
        let route = Route::try_from(dto).unwrap();
        assert_eq!(route.id, "11");
        assert_eq!(route.company_id, "2");
        assert_eq!(route.duration_minutes, 495);
        assert_eq!(route.base_price, 1450.0);
        assert!(route.active);
        assert_eq!(route.label(), "Nairobi → Kisumu");
    }

    #[test]
    fn test_route_update_serializes_camel_case() {
        let body = RouteUpdate {
            company_id: Some("2".to_string()),
            origin: "Nairobi".to_string(),
            destination: "Mombasa".to_string(),
            distance_km: None,
            duration_minutes: 480,
            base_price: 2200.0,
            active: true,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["companyId"], "2");
        assert_eq!(json["durationMinutes"], 480);
        assert_eq!(json["basePrice"], 2200.0);
        assert!(json.get("distanceKm").is_none());
    }
}
