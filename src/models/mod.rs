pub mod admin;
pub mod auth;
pub mod booking;
pub mod company;
pub mod location;
pub mod payment;
pub mod route;
pub mod schedule;
pub mod user;

// Re-export all the models that are used in other modules
pub use admin::{AdminStats, AdminStatsDto};
pub use auth::{AuthResponse, AuthResponseDto, Claims, GoogleLoginRequest, LoginRequest, RegisterRequest};
pub use booking::{Booking, BookingDto, BookingStatus, NewBooking};
pub use company::{Company, CompanyDto, CompanyStatus, CompanyUpdate};
pub use location::{BusLocation, BusLocationDto, LocationUpdate};
pub use payment::{NewPayment, Payment, PaymentDto, PaymentMethod, PaymentStatus};
pub use route::{Route, RouteDto, RouteUpdate};
pub use schedule::{Schedule, ScheduleDto, ScheduleStatus, ScheduleUpdate, Seat, SeatMap, SeatMapDto};
pub use user::{PasswordChange, ProfileUpdate, Role, User, UserDto};

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer};

use crate::error::{ApiError, Result};

/// Accepts ids sent either as JSON strings or numbers.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(i64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

pub(crate) fn deserialize_opt_id<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct Wrapper(#[serde(deserialize_with = "deserialize_id")] String);

    Ok(Option::<Wrapper>::deserialize(deserializer)?.map(|Wrapper(id)| id))
}

/// Picks the record id out of `id` or Mongo's `_id`, whichever the payload carried.
pub(crate) fn record_id(entity: &str, id: Option<String>, mongo_id: Option<String>) -> Result<String> {
    id.into_iter()
        .chain(mongo_id)
        .find(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::Decode(format!("{} record has no id", entity)))
}

/// Coerces a backend timestamp into UTC.
///
/// RFC 3339 is taken as-is; naive `YYYY-MM-DDTHH:MM:SS[.fff]` (with `T` or a
/// space) is assumed to be UTC; a bare `YYYY-MM-DD` becomes midnight UTC.
pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ApiError::Decode(format!("{} has an unrecognised timestamp '{}'", field, raw)))
}

pub fn parse_optional_timestamp(field: &str, raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    match raw {
        Some(s) if !s.trim().is_empty() => parse_timestamp(field, s).map(Some),
        _ => Ok(None),
    }
}

/// For display-only summaries: an unreadable value is logged and dropped
/// instead of failing the whole record.
pub(crate) fn lenient_timestamp(field: &str, raw: Option<&str>) -> Option<DateTime<Utc>> {
    parse_optional_timestamp(field, raw).unwrap_or_else(|e| {
        warn!("Ignoring {}", e);
        None
    })
}

/// Joins a travel date with a wall-clock time such as `08:15 AM` or `22:00`.
pub(crate) fn date_at_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = ["%I:%M %p", "%H:%M", "%H:%M:%S"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(time.trim(), format).ok())?;
    Some(date.and_time(time).and_utc())
}

/// Case-insensitive lookup of a wire string in a table of known values.
pub(crate) fn parse_variant<T: Copy>(field: &str, raw: &str, table: &[(&str, T)]) -> Result<T> {
    let normalized: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '_' && *c != '-' && *c != ' ')
        .collect::<String>()
        .to_lowercase();

    table
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, value)| *value)
        .ok_or_else(|| ApiError::Decode(format!("{} has an unknown value '{}'", field, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_timestamp_formats() {
        let expected = Utc.with_ymd_and_hms(2026, 11, 3, 8, 15, 0).unwrap();
        assert_eq!(parse_timestamp("d", "2026-11-03T08:15:00Z").unwrap(), expected);
        assert_eq!(parse_timestamp("d", "2026-11-03T11:15:00+03:00").unwrap(), expected);
        assert_eq!(parse_timestamp("d", "2026-11-03T08:15:00").unwrap(), expected);
        assert_eq!(parse_timestamp("d", "2026-11-03 08:15:00.000").unwrap(), expected);
        assert_eq!(parse_timestamp("d", "2026-11-03T08:15").unwrap(), expected);
        assert_eq!(
            parse_timestamp("d", "2026-11-03").unwrap(),
            Utc.with_ymd_and_hms(2026, 11, 3, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        let err = parse_timestamp("departureTime", "08:15 AM").unwrap_err();
        assert!(err.to_string().contains("departureTime"));
    }

    #[test]
    fn test_lenient_timestamp_drops_unreadable_values() {
        assert_eq!(lenient_timestamp("departure", Some("Unknown")), None);
        assert_eq!(lenient_timestamp("departure", None), None);
        assert_eq!(
            lenient_timestamp("departure", Some("2026-11-03T08:15:00Z")),
            Some(Utc.with_ymd_and_hms(2026, 11, 3, 8, 15, 0).unwrap())
        );
    }

    #[test]
    fn test_date_at_time() {
        let expected = Utc.with_ymd_and_hms(2026, 11, 3, 20, 30, 0).unwrap();
        assert_eq!(date_at_time("2026-11-03", "08:30 PM"), Some(expected));
        assert_eq!(date_at_time("2026-11-03", "20:30"), Some(expected));
        assert_eq!(date_at_time("2026-11-03", "Unknown"), None);
        assert_eq!(date_at_time("soon", "08:30 PM"), None);
    }

    #[test]
    fn test_record_id_takes_whichever_key_is_present() {
        assert_eq!(record_id("user", Some("7".into()), None).unwrap(), "7");
        assert_eq!(record_id("user", None, Some("65f0".into())).unwrap(), "65f0");
        assert_eq!(record_id("user", Some("7".into()), Some("65f0".into())).unwrap(), "7");
        assert!(matches!(record_id("user", None, None), Err(ApiError::Decode(_))));
    }

    #[test]
    fn test_parse_variant_is_lenient_on_case_and_separators() {
        let table = [("mobilemoney", 1), ("card", 2)];
        assert_eq!(parse_variant("m", "MOBILE_MONEY", &table).unwrap(), 1);
        assert_eq!(parse_variant("m", "Card", &table).unwrap(), 2);
        assert!(parse_variant("m", "cheque", &table).is_err());
    }

    #[test]
    fn test_ids_accept_numbers_and_strings() {
        #[derive(Deserialize)]
        struct Row {
            #[serde(deserialize_with = "deserialize_id")]
            id: String,
            #[serde(default, deserialize_with = "deserialize_opt_id")]
            parent: Option<String>,
        }

        let row: Row = serde_json::from_str(r#"{"id": 42, "parent": "abc"}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.parent.as_deref(), Some("abc"));

        let row: Row = serde_json::from_str(r#"{"id": "65f0"}"#).unwrap();
        assert_eq!(row.parent, None);
    }
}
