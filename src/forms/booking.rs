use std::collections::HashSet;

use chrono::{NaiveDate, Utc};

use super::{
    card_cvv, card_expiry, card_number, max_value, min_value, non_empty, not_in_past, optional,
    parse_date, phone, positive, required, Form,
};
use crate::api::ScheduleQuery;
use crate::error::{ValidationError, ValidationErrors};
use crate::models::{NewBooking, NewPayment, PaymentMethod, SeatMap};

pub const MAX_PASSENGERS: u32 = 10;

/// Origin/destination/date search on the landing page.
#[derive(Debug, Clone)]
pub struct SearchForm {
    pub origin: String,
    pub destination: String,
    pub date: String,
    pub passengers: u32,
    today: NaiveDate,
}

impl SearchForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            origin: String::new(),
            destination: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            passengers: 1,
            today,
        }
    }
}

impl Default for SearchForm {
    fn default() -> Self {
        Self::new(Utc::now().date_naive())
    }
}

impl Form for SearchForm {
    type Output = ScheduleQuery;

    fn validate(&self) -> Result<ScheduleQuery, ValidationErrors> {
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

        let date = required("date", &self.date).and_then(|_| parse_date("date", &self.date));
        let parsed = date.as_ref().ok().copied();
        match date {
            Ok(d) => errors.check(not_in_past("date", d, self.today)),
            Err(e) => errors.push(e),
        }

        errors.check(min_value("passengers", self.passengers, 1));
        errors.check(max_value("passengers", self.passengers, MAX_PASSENGERS));

        errors.into_result(ScheduleQuery {
            origin: self.origin.trim().to_string(),
            destination: self.destination.trim().to_string(),
            date: parsed.unwrap_or(self.today),
            passengers: self.passengers,
        })
    }
}

/// Seat selection and passenger details for one schedule.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub schedule_id: String,
    pub seats: Vec<String>,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub available_seats: u32,
    pub seat_map: Option<SeatMap>,
}

impl Form for BookingForm {
    type Output = NewBooking;

    fn validate(&self) -> Result<NewBooking, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("scheduleId", &self.schedule_id));
        errors.check(required("passengerName", &self.passenger_name));
        errors.check(optional(&self.passenger_phone, |v| phone("passengerPhone", v)));

        let seats: Vec<String> = self
            .seats
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        if seats.is_empty() {
            errors.push(ValidationError::Required {
                field: "seats".to_string(),
            });
        }

        let has_duplicates = {
            let unique: HashSet<&str> = seats.iter().map(String::as_str).collect();
            unique.len() != seats.len()
        };
        if has_duplicates {
            errors.push(ValidationError::InvalidFormat {
                field: "seats".to_string(),
                reason: "the same seat was picked twice".to_string(),
            });
        }

        errors.check(max_value("seats", seats.len() as u32, self.available_seats));
        errors.check(max_value("seats", seats.len() as u32, MAX_PASSENGERS));

        if let Some(map) = &self.seat_map {
            let taken: Vec<&str> = seats
                .iter()
                .map(String::as_str)
                .filter(|s| !map.is_available(s))
                .collect();
            if !taken.is_empty() {
                errors.push(ValidationError::InvalidFormat {
                    field: "seats".to_string(),
                    reason: format!("not available: {}", taken.join(", ")),
                });
            }
        }

        errors.into_result(NewBooking {
            schedule_id: self.schedule_id.trim().to_string(),
            seat_numbers: seats,
            passenger_name: self.passenger_name.trim().to_string(),
            passenger_phone: non_empty(&self.passenger_phone),
        })
    }
}

// No Debug: holds raw card details.
#[derive(Clone)]
pub struct PaymentForm {
    pub booking_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub card_number: String,
    pub card_expiry: String,
    pub card_cvv: String,
    pub phone: String,
    today: NaiveDate,
}

impl PaymentForm {
    pub fn new(booking_id: impl Into<String>, amount: f64, method: PaymentMethod, today: NaiveDate) -> Self {
        Self {
            booking_id: booking_id.into(),
            amount,
            method,
            card_number: String::new(),
            card_expiry: String::new(),
            card_cvv: String::new(),
            phone: String::new(),
            today,
        }
    }
}

impl Form for PaymentForm {
    type Output = NewPayment;

    fn validate(&self) -> Result<NewPayment, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(required("bookingId", &self.booking_id));
        errors.check(positive("amount", self.amount));

        match self.method {
            PaymentMethod::Card => {
                errors.check(
                    required("cardNumber", &self.card_number)
                        .and_then(|_| card_number("cardNumber", &self.card_number)),
                );
                errors.check(
                    required("cardExpiry", &self.card_expiry)
                        .and_then(|_| card_expiry("cardExpiry", &self.card_expiry, self.today)),
                );
                errors.check(
                    required("cardCvv", &self.card_cvv).and_then(|_| card_cvv("cardCvv", &self.card_cvv)),
                );
            }
            PaymentMethod::MobileMoney => {
                errors.check(required("phone", &self.phone).and_then(|_| phone("phone", &self.phone)));
            }
            PaymentMethod::Cash => {}
        }

        let is_card = self.method == PaymentMethod::Card;
        let digits: String = self.card_number.chars().filter(char::is_ascii_digit).collect();

        errors.into_result(NewPayment {
            booking_id: self.booking_id.trim().to_string(),
            amount: self.amount,
            payment_method: self.method,
            card_number: is_card.then(|| digits),
            card_expiry: is_card.then(|| self.card_expiry.trim().to_string()),
            card_cvv: is_card.then(|| self.card_cvv.trim().to_string()),
            phone_number: if self.method == PaymentMethod::MobileMoney {
                non_empty(&self.phone)
            } else {
                None
            },
        })
    }
}
