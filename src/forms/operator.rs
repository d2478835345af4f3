use chrono::{DateTime, Utc};

use super::{email, max_value, min_value, non_empty, optional, phone, positive, required, Form};
use crate::error::{ValidationError, ValidationErrors};
use crate::models::{parse_timestamp, CompanyUpdate, LocationUpdate, RouteUpdate, ScheduleUpdate};

pub const MAX_BUS_SEATS: u32 = 100;

#[derive(Debug, Clone)]
pub struct RouteForm {
    pub company_id: Option<String>,
    pub origin: String,
    pub destination: String,
    pub distance_km: Option<f64>,
    pub duration_minutes: u32,
    pub base_price: f64,
    pub active: bool,
}

impl Default for RouteForm {
    fn default() -> Self {
        Self {
            company_id: None,
            origin: String::new(),
            destination: String::new(),
            distance_km: None,
            duration_minutes: 0,
            base_price: 0.0,
            active: true,
        }
    }
}

impl Form for RouteForm {
    type Output = RouteUpdate;

    fn validate(&self) -> Result<RouteUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("origin", &self.origin));
        errors.check(required("destination", &self.destination));
        if !self.origin.trim().is_empty()
            && self.origin.trim().eq_ignore_ascii_case(self.destination.trim())
        {
            errors.push(ValidationError::InvalidFormat {
                field: "destination".to_string(),
                reason: "must differ from the origin".to_string(),
            });
        }
        if let Some(distance) = self.distance_km {
            errors.check(positive("distanceKm", distance));
        }
        errors.check(min_value("durationMinutes", self.duration_minutes, 1));
        errors.check(positive("basePrice", self.base_price));

        errors.into_result(RouteUpdate {
            company_id: self.company_id.clone(),
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            distance_km: self.distance_km,
            duration_minutes: self.duration_minutes,
            base_price: self.base_price,
            active: self.active,
        })
    }
}

/// A departure on one of the company's routes. Times are entered as text.
#[derive(Debug, Clone)]
pub struct ScheduleForm {
    pub route_id: String,
    pub departure: String,
    pub arrival: String,
    pub bus_number: String,
    pub total_seats: u32,
    pub price: f64,
    now: DateTime<Utc>,
}

impl ScheduleForm {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            route_id: String::new(),
            departure: String::new(),
            arrival: String::new(),
            bus_number: String::new(),
            total_seats: 0,
            price: 0.0,
            now,
        }
    }
}

impl Default for ScheduleForm {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl Form for ScheduleForm {
    type Output = ScheduleUpdate;

    fn validate(&self) -> Result<ScheduleUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("routeId", &self.route_id));
        errors.check(required("busNumber", &self.bus_number));
        errors.check(min_value("totalSeats", self.total_seats, 1));
        errors.check(max_value("totalSeats", self.total_seats, MAX_BUS_SEATS));
        errors.check(positive("price", self.price));

        let departure = timestamp_field("departure", &self.departure);
        let arrival = timestamp_field("arrival", &self.arrival);

        if let Ok(dep) = &departure {
            if *dep <= self.now {
                errors.push(ValidationError::InvalidFormat {
                    field: "departure".to_string(),
                    reason: "must be in the future".to_string(),
                });
            }
        }
        if let (Ok(dep), Ok(arr)) = (&departure, &arrival) {
            if arr <= dep {
                errors.push(ValidationError::InvalidFormat {
                    field: "arrival".to_string(),
                    reason: "must be after the departure".to_string(),
                });
            }
        }

        let (departure_time, arrival_time) = match (departure, arrival) {
            (Ok(d), Ok(a)) => (d, a),
            (d, a) => {
                errors.check(d.map(|_| ()));
                errors.check(a.map(|_| ()));
                return Err(errors);
            }
        };

        errors.into_result(ScheduleUpdate {
            route_id: self.route_id.trim().to_string(),
            departure_time,
            arrival_time,
            bus_number: self.bus_number.trim().to_uppercase(),
            total_seats: self.total_seats,
            price: self.price,
        })
    }
}

fn timestamp_field(field: &str, value: &str) -> Result<DateTime<Utc>, ValidationError> {
    required(field, value)?;
    parse_timestamp(field, value).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a date and time like 2026-11-03T22:00".to_string(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct CompanyForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Form for CompanyForm {
    type Output = CompanyUpdate;

    fn validate(&self) -> Result<CompanyUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("name", &self.name));
        errors.check(required("email", &self.email).and_then(|_| email("email", &self.email)));
        errors.check(optional(&self.phone, |v| phone("phone", v)));

        errors.into_result(CompanyUpdate {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
            phone: non_empty(&self.phone),
            address: non_empty(&self.address),
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct LocationForm {
    pub name: String,
    pub city: String,
    pub region: String,
    pub code: String,
}

impl Form for LocationForm {
    type Output = LocationUpdate;

    fn validate(&self) -> Result<LocationUpdate, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("name", &self.name));
        errors.check(required("city", &self.city));

        errors.into_result(LocationUpdate {
            name: self.name.trim().to_string(),
            city: self.city.trim().to_string(),
            region: non_empty(&self.region),
            code: non_empty(&self.code).map(|c| c.to_uppercase()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    fn schedule_form() -> ScheduleForm {
        let mut form = ScheduleForm::new(now());
        form.route_id = "11".to_string();
        form.departure = "2026-11-03T22:00".to_string();
        form.arrival = "2026-11-04T06:00".to_string();
        form.bus_number = "kda 456b".to_string();
        form.total_seats = 36;
        form.price = 2200.0;
        form
    }

    #[test]
    fn test_route_form() {
        let mut form = RouteForm::default();
        assert!(!form.is_valid());

        form.origin = "Nairobi".to_string();
        form.destination = "Eldoret".to_string();
        form.duration_minutes = 360;
        form.base_price = 1300.0;
        assert!(form.is_valid());

        form.distance_km = Some(-5.0);
        assert!(form.validate().unwrap_err().has_field("distanceKm"));
    }

    #[test]
    fn test_schedule_form_valid() {
        let update = schedule_form().validate().unwrap();
        assert_eq!(update.bus_number, "KDA 456B");
        assert_eq!(update.departure_time, Utc.with_ymd_and_hms(2026, 11, 3, 22, 0, 0).unwrap());
    }

    #[test]
    fn test_schedule_arrival_before_departure() {
        let mut form = schedule_form();
        form.arrival = "2026-11-03T21:00".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("arrival"));
    }

    #[test]
    fn test_schedule_departure_in_past_and_bad_seats() {
        let mut form = schedule_form();
        form.departure = "2026-10-01T08:00".to_string();
        form.total_seats = 150;
        let errors = form.validate().unwrap_err();
        assert!(errors.has_field("departure"));
        assert!(errors.has_field("totalSeats"));
    }

    #[test]
    fn test_schedule_unparseable_time() {
        let mut form = schedule_form();
        form.departure = "10 PM".to_string();
        let errors = form.validate().unwrap_err();
        assert!(errors.has_field("departure"));
    }

    #[test]
    fn test_location_form_uppercases_code() {
        let form = LocationForm {
            name: "Kisumu Stage".to_string(),
            city: "Kisumu".to_string(),
            region: String::new(),
            code: "ksm".to_string(),
        };
        let update = form.validate().unwrap();
        assert_eq!(update.code.as_deref(), Some("KSM"));
        assert_eq!(update.region, None);
    }

    #[test]
    fn test_company_form() {
        let form = CompanyForm {
            name: "Modern Coast".to_string(),
            email: "bad".to_string(),
            ..Default::default()
        };
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors.has_field("email"));
    }
}
