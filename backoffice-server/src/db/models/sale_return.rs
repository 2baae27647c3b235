//! Sale Return Model
//!
//! A sale return reverses part or all of a prior sale. The original sale
//! and customer references are fixed at creation time; every returned
//! product must appear in the original sale's items.

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use surrealdb::RecordId;

pub type SaleReturnId = RecordId;
pub type SaleReturnItemId = RecordId;

/// Sale return header
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturn {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleReturnId>,

    /// Original sale, immutable after creation
    #[serde(with = "serde_helpers::record_id")]
    pub sale: RecordId,

    /// Must equal the original sale's customer
    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,

    /// Employee who processed the return
    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    /// Why the goods came back, non-empty
    pub reason: String,

    /// Sum of item subtotals; recomputed on every update
    pub total_return_amount: f64,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Sale return line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturnItem {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleReturnItemId>,

    #[serde(with = "serde_helpers::record_id")]
    pub sale_return: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub product: RecordId,

    pub product_name: String,
    pub sku: String,

    /// Quantity returned, positive
    pub quantity: i64,
    /// Unit price, defaults to the original sale line's price
    pub unit_price: f64,
    /// quantity x unit_price, clamped at zero
    pub subtotal: f64,

    pub line_no: i32,
}

/// One line of a create/update return payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReturnLineInput {
    pub product_id: String,
    pub quantity: i64,
    /// Omitted = use the unit price from the original sale line
    pub unit_price: Option<f64>,
}

/// Create sale return payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturnCreate {
    pub sale_id: String,
    pub customer_id: String,
    pub employee_id: String,
    pub reason: String,
    pub items: Vec<ReturnLineInput>,
}

/// Update sale return payload
///
/// `sale_id` and `customer_id`, when present, must match the stored
/// references; they exist only so callers can echo the original request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturnUpdate {
    pub sale_id: Option<String>,
    pub customer_id: Option<String>,
    pub employee_id: Option<String>,
    pub reason: Option<String>,
    pub items: Vec<ReturnLineInput>,
}

/// Bulk delete payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturnBulkDelete {
    pub ids: Vec<String>,
}

/// Full sale return representation: header plus ordered items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleReturnDetail {
    #[serde(default, with = "serde_helpers::option_record_id")]
    pub id: Option<SaleReturnId>,

    #[serde(with = "serde_helpers::record_id")]
    pub sale: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub customer: RecordId,

    #[serde(with = "serde_helpers::record_id")]
    pub employee: RecordId,

    pub reason: String,
    pub total_return_amount: f64,

    #[serde(default)]
    pub items: Vec<SaleReturnItem>,

    pub created_at: Option<i64>,
    pub updated_at: Option<i64>,
}
