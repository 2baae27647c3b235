//! Workflow services
//!
//! The sale and sale-return engines own every stock-affecting rule;
//! repositories underneath them stay mechanical. `money` and `stock`
//! are the shared pure helpers both engines lean on.

pub mod money;
pub mod sale_return_service;
pub mod sale_service;
pub mod stock;

pub use sale_return_service::SaleReturnService;
pub use sale_service::SaleService;

use shared::error::{AppError, AppResult};
use surrealdb::RecordId;

/// Unwrap a persisted record's id; absence is a storage-layer bug.
pub(crate) fn required_id(id: Option<RecordId>, entity: &str) -> AppResult<RecordId> {
    id.ok_or_else(|| AppError::internal(format!("{entity} record has no id")))
}
