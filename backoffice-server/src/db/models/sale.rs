//! Sale Model
//!
//! A sale is a transaction header owning an ordered list of line items.
//! Items are replaced wholesale on update; stock reconciliation is the
//! workflow service's responsibility, never the model's.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type SaleId = RecordId;
pub type SaleItemId = RecordId;

/// Sale header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleId>,

    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,

    /// Employee who processed the sale
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    pub total_amount: f64,
    pub tax_amount: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub final_amount: f64,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Sale line item
///
/// Product name and SKU are copied onto the item so the sale history
/// survives later product edits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleItemId>,

    #[serde(with = "serde_helpers::record_id")]
    pub sale: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,

    pub product_name: String,
    pub sku: String,

    /// Quantity sold, positive
    pub quantity: i64,
    /// Unit price at time of sale, non-negative
    pub unit_price: f64,
    /// quantity x unit_price, clamped at zero
    pub subtotal: f64,

    /// Position within the sale, preserves input order
    pub line_no: i32,
}

/// One line of a create/update sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleLineInput {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// Caller-supplied subtotal is accepted but recomputed server-side
    pub subtotal: Option<f64>,
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleCreate {
    pub customer_id: String,
    pub employee_id: String,
    pub total_amount: f64,
    pub tax_amount: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub final_amount: f64,
    pub items: Vec<SaleLineInput>,
}

/// Update sale payload
///
/// Scalar fields are applied when present; the item list always replaces
/// the previous one in full.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleUpdate {
    pub customer_id: Option<String>,
    pub employee_id: Option<String>,
    pub total_amount: Option<f64>,
    pub tax_amount: Option<f64>,
    pub discount_amount: Option<f64>,
    pub final_amount: Option<f64>,
    pub items: Vec<SaleLineInput>,
}

/// Bulk delete payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleBulkDelete {
    pub ids: Vec<String>,
}

/// Full sale representation: header plus ordered items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleId>,

    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    pub total_amount: f64,
    pub tax_amount: f64,
    #[serde(default)]
    pub discount_amount: f64,
    pub final_amount: f64,

    #[serde(default)]
    pub items: Vec<SaleItem>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}
