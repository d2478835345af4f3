use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::{date_at_time, deserialize_id, deserialize_opt_id, lenient_timestamp, parse_variant, record_id};
use crate::error::ApiError;

/// Bookings can no longer be cancelled this close to departure.
pub const CANCELLATION_CUTOFF_HOURS: i64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Cancelled => "Cancelled",
            Self::Completed => "Completed",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "status",
            s,
            &[
                ("pending", Self::Pending),
                ("reserved", Self::Pending),
                ("confirmed", Self::Confirmed),
                ("paid", Self::Confirmed),
                ("cancelled", Self::Cancelled),
                ("canceled", Self::Cancelled),
                ("completed", Self::Completed),
            ],
        )
    }
}

/// Seats arrive as a list, a single label, or a comma separated string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeatsDto {
    List(Vec<String>),
    Numbers(Vec<u32>),
    Single(String),
}

impl SeatsDto {
    fn into_labels(self) -> Vec<String> {
        match self {
            SeatsDto::List(list) => list,
            SeatsDto::Numbers(list) => list.into_iter().map(|n| n.to_string()).collect(),
            SeatsDto::Single(s) => s
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PassengerDto {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub booking_id: Option<String>,
    #[serde(default, alias = "bookingReference", alias = "ticketNumber")]
    pub reference: Option<String>,
    #[serde(default, alias = "riderId", deserialize_with = "deserialize_opt_id")]
    pub user_id: Option<String>,
    #[serde(alias = "busId", deserialize_with = "deserialize_id")]
    pub schedule_id: String,
    #[serde(alias = "seatNumbers", alias = "seatNumber")]
    pub seats: SeatsDto,
    #[serde(default)]
    pub passenger_name: String,
    #[serde(default)]
    pub passenger_phone: Option<String>,
    #[serde(default)]
    pub passengers: Vec<PassengerDto>,
    #[serde(alias = "totalPrice", alias = "amount")]
    pub total_amount: f64,
    pub status: String,
    #[serde(default, alias = "bookingDate", alias = "createdAt")]
    pub booked_at: Option<String>,
    #[serde(default, alias = "from")]
    pub origin: Option<String>,
    #[serde(default, alias = "to")]
    pub destination: Option<String>,
    #[serde(default, alias = "departure")]
    pub departure_time: Option<String>,
    #[serde(default, rename = "date", alias = "travelDate")]
    pub travel_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Booking {
    pub id: String,
    pub reference: String,
    pub user_id: Option<String>,
    pub schedule_id: String,
    pub seats: Vec<String>,
    pub passenger_name: String,
    pub passenger_phone: Option<String>,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub booked_at: Option<DateTime<Utc>>,
    pub origin: Option<String>,
    pub destination: Option<String>,
    pub departure: Option<DateTime<Utc>>,
}

/// Departure may be a full timestamp or a wall-clock time next to the travel date.
fn departure_at(travel_date: Option<&str>, departure: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = departure?;
    travel_date
        .and_then(|date| date_at_time(date, raw))
        .or_else(|| lenient_timestamp("departureTime", Some(raw)))
}

impl TryFrom<BookingDto> for Booking {
    type Error = ApiError;

    fn try_from(dto: BookingDto) -> Result<Self, Self::Error> {
        let id = record_id("booking", dto.id, dto.mongo_id)?;
        let reference = dto
            .reference
            .into_iter()
            .chain(dto.booking_id)
            .find(|r| !r.trim().is_empty())
            .unwrap_or_else(|| id.to_uppercase());
        let passenger_name = if dto.passenger_name.trim().is_empty() {
            dto.passengers.into_iter().map(|p| p.name).next().unwrap_or_default()
        } else {
            dto.passenger_name
        };

        Ok(Self {
            status: dto.status.parse()?,
            booked_at: lenient_timestamp("bookingDate", dto.booked_at.as_deref()),
            departure: departure_at(dto.travel_date.as_deref(), dto.departure_time.as_deref()),
            id,
            reference,
            user_id: dto.user_id,
            schedule_id: dto.schedule_id,
            seats: dto.seats.into_labels(),
            passenger_name,
            passenger_phone: dto.passenger_phone,
            total_amount: dto.total_amount,
            origin: dto.origin,
            destination: dto.destination,
        })
    }
}

impl Booking {
    /// Riders may cancel pending or confirmed bookings until shortly before departure.
    pub fn is_cancellable(&self, now: DateTime<Utc>) -> bool {
        let open = matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed);
        let before_cutoff = self
            .departure
            .map_or(true, |d| d - now > Duration::hours(CANCELLATION_CUTOFF_HOURS));
        open && before_cutoff
    }

    pub fn trip(&self) -> String {
        match (&self.origin, &self.destination) {
            (Some(o), Some(d)) => format!("{} → {}", o, d),
            _ => format!("schedule {}", self.schedule_id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub schedule_id: String,
    pub seat_numbers: Vec<String>,
    pub passenger_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passenger_phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking(json: &str) -> Booking {
        Booking::try_from(serde_json::from_str::<BookingDto>(json).unwrap()).unwrap()
    }

    #[test]
    fn test_convert_booking_with_comma_seats() {
        let b = booking(
            r#"{"_id": "65f0ab", "userId": 3, "scheduleId": 5, "seatNumber": "4, 5",
                "passengerName": "Otieno", "totalPrice": 4400, "status": "CONFIRMED",
                "bookingDate": "2026-10-19T09:30:00Z", "from": "Nairobi", "to": "Mombasa",
                "departure": "2026-11-03T22:00:00"}"#,
        );
        assert_eq!(b.id, "65f0ab");
        assert_eq!(b.reference, "65F0AB");
        assert_eq!(b.seats, vec!["4".to_string(), "5".to_string()]);
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.trip(), "Nairobi → Mombasa");
        assert_eq!(b.user_id.as_deref(), Some("3"));
    }

    #[test]
    fn test_rider_booking_list_entry() {
        // Shape returned by GET /BusBooking/user/{id}.
        let b = booking(
            r#"{"id": "65f0ab12", "busId": "65e1cd", "busName": "Coastline 07", "busType": "Luxury",
                "from": "Nairobi", "to": "Mombasa", "departure": "08:15 PM", "arrival": "04:30 AM",
                "totalPrice": 2900.0, "seats": [14, 15], "status": "confirmed", "date": "2026-11-03",
                "bookingDate": "2026-10-19 9:30:00.0 +00:00:00", "bookingId": "65F0AB12",
                "passengers": [{"name": "Achieng Otieno", "seatNumber": 14, "age": 31, "gender": "female"},
                               {"name": "Baraka Otieno", "seatNumber": 15, "age": 6, "gender": "male"}]}"#,
        );
        assert_eq!(b.id, "65f0ab12");
        assert_eq!(b.reference, "65F0AB12");
        assert_eq!(b.schedule_id, "65e1cd");
        assert_eq!(b.user_id, None);
        assert_eq!(b.passenger_name, "Achieng Otieno");
        assert_eq!(b.seats, vec!["14".to_string(), "15".to_string()]);
        assert_eq!(b.departure, Some(Utc.with_ymd_and_hms(2026, 11, 3, 20, 15, 0).unwrap()));
        assert!(b.is_cancellable(Utc.with_ymd_and_hms(2026, 11, 3, 12, 0, 0).unwrap()));
    }

    #[test]
    fn test_unreadable_summary_times_do_not_fail_the_booking() {
        let b = booking(
            r#"{"id": "b9", "busId": "x", "seats": ["1"], "totalPrice": 10, "status": "pending",
                "departure": "08:15 AM", "bookingDate": "sometime"}"#,
        );
        assert_eq!(b.departure, None);
        assert_eq!(b.booked_at, None);
        assert!(b.is_cancellable(Utc::now()));
    }

    #[test]
    fn test_booking_without_any_id_is_rejected() {
        let dto: BookingDto = serde_json::from_str(
            r#"{"scheduleId": 5, "seats": ["1"], "totalAmount": 10, "status": "pending"}"#,
        )
        .unwrap();
        assert!(matches!(Booking::try_from(dto), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_numeric_seat_list() {
        let b = booking(
            r#"{"id": 1, "reference": "BK-0001", "userId": 3, "scheduleId": 5, "seats": [7, 8],
                "totalAmount": 10, "status": "pending", "bookedAt": "2026-10-19"}"#,
        );
        assert_eq!(b.reference, "BK-0001");
        assert_eq!(b.seats, vec!["7".to_string(), "8".to_string()]);
        assert_eq!(b.trip(), "schedule 5");
    }

    #[test]
    fn test_is_cancellable() {
        let b = booking(
            r#"{"id": 1, "userId": 3, "scheduleId": 5, "seats": ["1"], "totalAmount": 10,
                "status": "confirmed", "bookedAt": "2026-10-19", "departureTime": "2026-11-03T22:00:00Z"}"#,
        );
        let early = Utc.with_ymd_and_hms(2026, 11, 3, 12, 0, 0).unwrap();
        let late = Utc.with_ymd_and_hms(2026, 11, 3, 21, 0, 0).unwrap();
        assert!(b.is_cancellable(early));
        assert!(!b.is_cancellable(late));

        let cancelled = Booking {
            status: BookingStatus::Cancelled,
            ..b
        };
        assert!(!cancelled.is_cancellable(early));
    }
}
