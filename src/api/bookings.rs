use log::info;
use serde_json::json;

use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{Booking, BookingDto, NewBooking};

#[derive(Clone)]
pub struct BookingService {
    api: ApiClient,
}

impl BookingService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn create(&self, booking: &NewBooking) -> Result<Booking> {
        let dto: BookingDto = self.api.post("/BusBooking", booking).await?;
        let booking = Booking::try_from(dto)?;
        info!("Booking {} created for seats {:?}", booking.reference, booking.seats);
        Ok(booking)
    }

    pub async fn get(&self, id: &str) -> Result<Booking> {
        let dto: BookingDto = self.api.get(&format!("/BusBooking/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        let dtos: Vec<BookingDto> = self
            .api
            .get_list(&format!("/BusBooking/user/{}", segment(user_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn by_schedule(&self, schedule_id: &str) -> Result<Vec<Booking>> {
        let dtos: Vec<BookingDto> = self
            .api
            .get_list(&format!("/BusBooking/schedule/{}", segment(schedule_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn by_company(&self, company_id: &str) -> Result<Vec<Booking>> {
        let dtos: Vec<BookingDto> = self
            .api
            .get_list(&format!("/BusBooking/company/{}", segment(company_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn cancel(&self, id: &str) -> Result<()> {
        self.api
            .put_empty(&format!("/BusBooking/{}/cancel", segment(id)), &json!({}))
            .await?;
        info!("Booking {} cancelled", id);
        Ok(())
    }
}
