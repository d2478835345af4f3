use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id, parse_timestamp, parse_variant, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduleStatus {
    Scheduled,
    Departed,
    Cancelled,
    Completed,
}

impl ScheduleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Departed => "Departed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for ScheduleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScheduleStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "status",
            s,
            &[
                ("scheduled", Self::Scheduled),
                ("active", Self::Scheduled),
                ("ontime", Self::Scheduled),
                ("departed", Self::Departed),
                ("intransit", Self::Departed),
                ("cancelled", Self::Cancelled),
                ("canceled", Self::Cancelled),
                ("completed", Self::Completed),
                ("arrived", Self::Completed),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub route_id: String,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub company_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default, alias = "from", alias = "source")]
    pub origin: String,
    #[serde(default, alias = "to")]
    pub destination: String,
    #[serde(alias = "departure", alias = "departureDateTime")]
    pub departure_time: String,
    #[serde(alias = "arrival", alias = "arrivalDateTime")]
    pub arrival_time: String,
    #[serde(default, alias = "busNo", alias = "plateNumber")]
    pub bus_number: String,
    #[serde(alias = "capacity")]
    pub total_seats: u32,
    #[serde(alias = "seatsAvailable")]
    pub available_seats: u32,
    #[serde(alias = "fare")]
    pub price: f64,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub id: String,
    pub route_id: String,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub origin: String,
    pub destination: String,
    pub departure: DateTime<Utc>,
    pub arrival: DateTime<Utc>,
    pub bus_number: String,
    pub total_seats: u32,
    pub available_seats: u32,
    pub price: f64,
    pub status: ScheduleStatus,
}

impl TryFrom<ScheduleDto> for Schedule {
    type Error = ApiError;

    fn try_from(dto: ScheduleDto) -> Result<Self, Self::Error> {
        let status = match dto.status.as_deref() {
            Some(s) if !s.trim().is_empty() => s.parse()?,
            _ => ScheduleStatus::Scheduled,
        };

        Ok(Self {
            departure: parse_timestamp("departureTime", &dto.departure_time)?,
            arrival: parse_timestamp("arrivalTime", &dto.arrival_time)?,
            id: record_id("schedule", dto.id, dto.mongo_id)?,
            route_id: dto.route_id,
            company_id: dto.company_id,
            company_name: dto.company_name,
            origin: dto.origin,
            destination: dto.destination,
            bus_number: dto.bus_number,
            // Some payloads overshoot after cancellations, never show more free seats than the bus has.
            available_seats: dto.available_seats.min(dto.total_seats),
            total_seats: dto.total_seats,
            price: dto.price,
            status,
        })
    }
}

impl Schedule {
    pub fn duration(&self) -> Duration {
        self.arrival - self.departure
    }

    /// Whether `passengers` seats can still be booked on this departure at `now`.
    pub fn is_bookable(&self, now: DateTime<Utc>, passengers: u32) -> bool {
        self.status == ScheduleStatus::Scheduled
            && self.departure > now
            && self.available_seats >= passengers.max(1)
    }

    pub fn occupancy(&self) -> f64 {
        if self.total_seats == 0 {
            return 0.0;
        }
        f64::from(self.total_seats - self.available_seats) / f64::from(self.total_seats)
    }
}

/// Body for creating or editing a schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleUpdate {
    pub route_id: String,
    pub departure_time: DateTime<Utc>,
    pub arrival_time: DateTime<Utc>,
    pub bus_number: String,
    pub total_seats: u32,
    pub price: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Seat {
    #[serde(alias = "seatNumber", alias = "seat_number")]
    pub label: String,
    #[serde(alias = "isAvailable", alias = "is_available")]
    pub available: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatMapDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub schedule_id: Option<String>,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeatMap {
    pub schedule_id: String,
    pub seats: Vec<Seat>,
}

impl SeatMap {
    pub fn from_dto(schedule_id: &str, dto: SeatMapDto) -> Self {
        Self {
            schedule_id: dto.schedule_id.unwrap_or_else(|| schedule_id.to_string()),
            seats: dto.seats,
        }
    }

    pub fn available(&self) -> impl Iterator<Item = &Seat> {
        self.seats.iter().filter(|s| s.available)
    }

    pub fn is_available(&self, label: &str) -> bool {
        self.seats.iter().any(|s| s.label == label && s.available)
    }
}
