//! Product Model

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type ProductId = RecordId;

/// Product entity
///
/// `stock` is the authoritative available-quantity counter. It is only ever
/// changed through the conditional adjustment in the product repository, so
/// it can never go negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<ProductId>,
    pub name: String,
    /// Stock-keeping unit, unique
    pub sku: String,
    pub description: Option<String>,
    /// Unit price in the store currency
    pub unit_price: f64,
    /// On-hand quantity, non-negative
    #[serde(default)]
    pub stock: i64,
    #[serde(default = "default_true", deserialize_with = "serde_helpers::bool_true")]
    pub is_active: bool,
    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub sku: String,
    pub description: Option<String>,
    pub unit_price: f64,
    /// Initial stock, defaults to 0
    pub stock: Option<i64>,
}

/// Update product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
    pub is_active: Option<bool>,
}

/// Manual stock correction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockAdjust {
    /// Signed quantity change (positive = received, negative = write-off)
    pub delta: i64,
    pub reason: Option<String>,
}
