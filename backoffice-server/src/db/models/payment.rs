//! Payment Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type PaymentId = RecordId;

/// Payment method
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
}

/// Payment against a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<PaymentId>,

    #[serde(with = "serde_helpers::record_id")]
    pub sale: RecordId,

    pub method: PaymentMethod,

    /// Amount paid, positive
    pub amount: f64,

    /// External reference (card slip, bank transfer id)
    pub reference: Option<String>,

    pub note: Option<String>,

    pub created_at: Option<i64>,
}

/// Record payment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentCreate {
    pub sale_id: String,
    pub method: PaymentMethod,
    pub amount: f64,
    pub reference: Option<String>,
    pub note: Option<String>,
}
