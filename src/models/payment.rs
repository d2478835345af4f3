use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{deserialize_id, deserialize_opt_id, parse_optional_timestamp, parse_variant, record_id};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Card,
    MobileMoney,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::MobileMoney => "MobileMoney",
            Self::Cash => "Cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "method",
            s,
            &[
                ("card", Self::Card),
                ("creditcard", Self::Card),
                ("debitcard", Self::Card),
                ("mobilemoney", Self::MobileMoney),
                ("mpesa", Self::MobileMoney),
                ("cash", Self::Cash),
            ],
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Refunded => "Refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_variant(
            "status",
            s,
            &[
                ("pending", Self::Pending),
                ("processing", Self::Pending),
                ("completed", Self::Completed),
                ("success", Self::Completed),
                ("successful", Self::Completed),
                ("paid", Self::Completed),
                ("failed", Self::Failed),
                ("declined", Self::Failed),
                ("refunded", Self::Refunded),
            ],
        )
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDto {
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub id: Option<String>,
    #[serde(default, rename = "_id", deserialize_with = "deserialize_opt_id")]
    pub mongo_id: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_id")]
    pub payment_id: Option<String>,
    #[serde(deserialize_with = "deserialize_id")]
    pub booking_id: String,
    pub amount: f64,
    #[serde(alias = "paymentMethod")]
    pub method: String,
    #[serde(alias = "paymentStatus")]
    pub status: String,
    #[serde(default, alias = "transactionId", alias = "reference")]
    pub transaction_ref: Option<String>,
    #[serde(default, alias = "paymentDate")]
    pub paid_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Payment {
    pub id: String,
    pub booking_id: String,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub transaction_ref: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl TryFrom<PaymentDto> for Payment {
    type Error = ApiError;

    fn try_from(dto: PaymentDto) -> Result<Self, Self::Error> {
        Ok(Self {
            method: dto.method.parse()?,
            status: dto.status.parse()?,
            paid_at: parse_optional_timestamp("paidAt", dto.paid_at.as_deref())?,
            id: record_id("payment", dto.id.or(dto.payment_id), dto.mongo_id)?,
            booking_id: dto.booking_id,
            amount: dto.amount,
            transaction_ref: dto.transaction_ref,
        })
    }
}

/// Payment request. Card details are only sent for card payments and never logged.
#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub booking_id: String,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_expiry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_cvv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
}

impl fmt::Debug for NewPayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let masked = self.card_number.as_ref().map(|n| {
            let tail: String = n.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
            format!("****{}", tail)
        });
        f.debug_struct("NewPayment")
            .field("booking_id", &self.booking_id)
            .field("amount", &self.amount)
            .field("payment_method", &self.payment_method)
            .field("card_number", &masked)
            .field("phone_number", &self.phone_number)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_payment() {
        let dto: PaymentDto = serde_json::from_str(
            r#"{"paymentId": 9, "bookingId": "65f0ab", "amount": 2200, "paymentMethod": "M-Pesa",
                "paymentStatus": "SUCCESS", "transactionId": "QJ81XYZ", "paymentDate": "2026-10-19T09:31:00Z"}"#,
        )
        .unwrap();
        let payment = Payment::try_from(dto).unwrap();
        assert_eq!(payment.id, "9");
        assert_eq!(payment.method, PaymentMethod::MobileMoney);
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(payment.transaction_ref.as_deref(), Some("QJ81XYZ"));
        assert!(payment.paid_at.is_some());
    }

    #[test]
    fn test_debug_masks_card_number() {
        let request = NewPayment {
            booking_id: "b1".to_string(),
            amount: 100.0,
            payment_method: PaymentMethod::Card,
            card_number: Some("4111111111111111".to_string()),
            card_expiry: Some("12/29".to_string()),
            card_cvv: Some("123".to_string()),
            phone_number: None,
        };
        let printed = format!("{:?}", request);
        assert!(printed.contains("****1111"));
        assert!(!printed.contains("4111111111111111"));
        assert!(!printed.contains("123\""));
    }
}
