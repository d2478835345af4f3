use log::info;
use serde_json::json;

use super::client::{convert_all, segment, ApiClient};
use crate::error::Result;
use crate::models::{NewPayment, Payment, PaymentDto};

#[derive(Clone)]
pub struct PaymentService {
    api: ApiClient,
}

impl PaymentService {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub async fn pay(&self, payment: &NewPayment) -> Result<Payment> {
        let dto: PaymentDto = self.api.post("/payments", payment).await?;
        let payment = Payment::try_from(dto)?;
        info!(
            "Payment {} for booking {} is {}",
            payment.id, payment.booking_id, payment.status
        );
        Ok(payment)
    }

    pub async fn get(&self, id: &str) -> Result<Payment> {
        let dto: PaymentDto = self.api.get(&format!("/payments/{}", segment(id))).await?;
        dto.try_into()
    }

    pub async fn by_booking(&self, booking_id: &str) -> Result<Vec<Payment>> {
        let dtos: Vec<PaymentDto> = self
            .api
            .get_list(&format!("/payments/booking/{}", segment(booking_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn by_user(&self, user_id: &str) -> Result<Vec<Payment>> {
        let dtos: Vec<PaymentDto> = self
            .api
            .get_list(&format!("/payments/user/{}", segment(user_id)))
            .await?;
        convert_all(dtos)
    }

    pub async fn refund(&self, id: &str) -> Result<Payment> {
        let dto: PaymentDto = self
            .api
            .post(&format!("/payments/{}/refund", segment(id)), &json!({}))
            .await?;
        dto.try_into()
    }
}
