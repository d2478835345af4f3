//! Schedule search and the origin/destination autocomplete.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::info;

use crate::api::{ScheduleQuery, ScheduleService};
use crate::error::{ApiError, Result, ValidationError, ValidationErrors};
use crate::forms::{Form, SearchForm};
use crate::models::{BusLocation, Schedule};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchSort {
    #[default]
    Departure,
    Price,
    Duration,
    SeatsLeft,
}

impl FromStr for SearchSort {
    type Err = ApiError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "departure" | "time" => Ok(Self::Departure),
            "price" | "fare" => Ok(Self::Price),
            "duration" => Ok(Self::Duration),
            "seats" | "seats-left" => Ok(Self::SeatsLeft),
            other => {
                let mut errors = ValidationErrors::new();
                errors.push(ValidationError::InvalidFormat {
                    field: "sort".to_string(),
                    reason: format!("'{}' is not one of departure, price, duration, seats", other),
                });
                Err(errors.into())
            }
        }
    }
}

/// Drops departures that cannot take `query.passengers` anymore and orders the rest.
pub fn refine(mut results: Vec<Schedule>, query: &ScheduleQuery, sort: SearchSort, now: DateTime<Utc>) -> Vec<Schedule> {
    results.retain(|s| s.is_bookable(now, query.passengers));
    results.sort_by(|a, b| compare(a, b, sort).then_with(|| a.departure.cmp(&b.departure)));
    results
}

fn compare(a: &Schedule, b: &Schedule, sort: SearchSort) -> Ordering {
    match sort {
        SearchSort::Departure => a.departure.cmp(&b.departure),
        SearchSort::Price => a.price.partial_cmp(&b.price).unwrap_or(Ordering::Equal),
        SearchSort::Duration => a.duration().cmp(&b.duration()),
        // Most seats left first.
        SearchSort::SeatsLeft => b.available_seats.cmp(&a.available_seats),
    }
}

pub struct ScheduleSearch {
    schedules: ScheduleService,
}

impl ScheduleSearch {
    pub fn new(schedules: ScheduleService) -> Self {
        Self { schedules }
    }

    /// Validates the form, queries the backend and returns bookable departures.
    pub async fn run(&self, form: &SearchForm, sort: SearchSort, now: DateTime<Utc>) -> Result<Vec<Schedule>> {
        let query = form.validate()?;
        let results = self.schedules.search(&query).await?;
        let total = results.len();
        let results = refine(results, &query, sort, now);
        info!(
            "{} → {} on {}: {} of {} departures bookable",
            query.origin,
            query.destination,
            query.date,
            results.len(),
            total
        );
        Ok(results)
    }
}

pub const AUTOCOMPLETE_MIN_CHARS: usize = 2;
pub const AUTOCOMPLETE_LIMIT: usize = 8;

/// Suggests stops while the user types an origin or destination.
#[derive(Debug, Clone)]
pub struct LocationAutocomplete {
    locations: Vec<BusLocation>,
    min_chars: usize,
    limit: usize,
}

impl LocationAutocomplete {
    pub fn new(locations: Vec<BusLocation>) -> Self {
        Self {
            locations,
            min_chars: AUTOCOMPLETE_MIN_CHARS,
            limit: AUTOCOMPLETE_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Prefix matches on name or city come first, then substring matches.
    pub fn suggest(&self, term: &str) -> Vec<&BusLocation> {
        let term = term.trim().to_lowercase();
        if term.chars().count() < self.min_chars {
            return Vec::new();
        }

        let (mut prefix, mut partial): (Vec<&BusLocation>, Vec<&BusLocation>) = (Vec::new(), Vec::new());
        for location in &self.locations {
            let name = location.name.to_lowercase();
            let city = location.city.to_lowercase();
            if name.starts_with(&term) || city.starts_with(&term) {
                prefix.push(location);
            } else if name.contains(&term) || city.contains(&term) {
                partial.push(location);
            }
        }

        prefix.append(&mut partial);
        prefix.truncate(self.limit);
        prefix
    }

    /// Resolves free text to a single stop when it names one exactly.
    pub fn resolve(&self, term: &str) -> Option<&BusLocation> {
        let term = term.trim();
        self.locations
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(term) || l.code.as_deref().map_or(false, |c| c.eq_ignore_ascii_case(term)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleStatus;
    use chrono::{Duration, NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 11, 3, 6, 0, 0).unwrap()
    }

    fn schedule(id: &str, depart_hour: u32, hours: i64, price: f64, seats: u32) -> Schedule {
        let departure = Utc.with_ymd_and_hms(2026, 11, 3, depart_hour, 0, 0).unwrap();
        Schedule {
            id: id.to_string(),
            route_id: "r1".to_string(),
            company_id: None,
            company_name: None,
            origin: "Nairobi".to_string(),
            destination: "Mombasa".to_string(),
            departure,
            arrival: departure + Duration::hours(hours),
            bus_number: format!("KD{}", id),
            total_seats: 44,
            available_seats: seats,
            price,
            status: ScheduleStatus::Scheduled,
        }
    }

    fn query(passengers: u32) -> ScheduleQuery {
        ScheduleQuery {
            origin: "Nairobi".to_string(),
            destination: "Mombasa".to_string(),
            date: NaiveDate::from_ymd_opt(2026, 11, 3).unwrap(),
            passengers,
        }
    }

    fn ids(results: &[Schedule]) -> Vec<&str> {
        results.iter().map(|s| s.id.as_str()).collect()
    }

    fn sample() -> Vec<Schedule> {
        vec![
            schedule("a", 22, 8, 2200.0, 10),
            schedule("b", 8, 9, 1500.0, 2),
            schedule("c", 5, 8, 1000.0, 30), // already left
            schedule("d", 10, 7, 2500.0, 40),
        ]
    }

    #[test]
    fn test_refine_drops_unbookable() {
        let results = refine(sample(), &query(3), SearchSort::Departure, now());
        assert_eq!(ids(&results), vec!["d", "a"]);
    }

    #[test]
    fn test_refine_sorts() {
        let q = query(1);
        assert_eq!(ids(&refine(sample(), &q, SearchSort::Departure, now())), vec!["b", "d", "a"]);
        assert_eq!(ids(&refine(sample(), &q, SearchSort::Price, now())), vec!["b", "a", "d"]);
        assert_eq!(ids(&refine(sample(), &q, SearchSort::Duration, now())), vec!["d", "a", "b"]);
        assert_eq!(ids(&refine(sample(), &q, SearchSort::SeatsLeft, now())), vec!["d", "a", "b"]);
    }

    #[test]
    fn test_sort_parsing() {
        assert_eq!("fare".parse::<SearchSort>().unwrap(), SearchSort::Price);
        assert_eq!("Seats".parse::<SearchSort>().unwrap(), SearchSort::SeatsLeft);
        match "random".parse::<SearchSort>() {
            Err(ApiError::Validation(errors)) => assert!(errors.has_field("sort")),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    fn location(id: &str, name: &str, city: &str, code: Option<&str>) -> BusLocation {
        BusLocation {
            id: id.to_string(),
            name: name.to_string(),
            city: city.to_string(),
            region: None,
            code: code.map(str::to_string),
        }
    }

    fn autocomplete() -> LocationAutocomplete {
        LocationAutocomplete::new(vec![
            location("1", "Machakos Country Bus", "Nairobi", Some("NBO")),
            location("2", "Mombasa", "Mombasa", Some("MBA")),
            location("3", "Nakuru", "Nakuru", None),
            location("4", "Kisumu", "Kisumu", Some("KSM")),
            location("5", "Nairobi CBD", "Nairobi", None),
        ])
    }

    #[test]
    fn test_suggest_needs_min_chars() {
        assert!(autocomplete().suggest("n").is_empty());
    }

    #[test]
    fn test_suggest_prefix_before_substring() {
        let ac = autocomplete();
        let names: Vec<&str> = ac.suggest("na").iter().map(|l| l.name.as_str()).collect();
        // Machakos matches on its city.
        assert_eq!(names, vec!["Machakos Country Bus", "Nakuru", "Nairobi CBD"]);

        let names: Vec<&str> = ac.suggest("su").iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Kisumu"]);
    }

    #[test]
    fn test_suggest_limit() {
        let ac = autocomplete().with_limit(1);
        assert_eq!(ac.suggest("na").len(), 1);
    }

    #[test]
    fn test_resolve_by_name_or_code() {
        let ac = autocomplete();
        assert_eq!(ac.resolve("mba").map(|l| l.id.as_str()), Some("2"));
        assert_eq!(ac.resolve(" nakuru ").map(|l| l.id.as_str()), Some("3"));
        assert!(ac.resolve("Nai").is_none());
    }
}
