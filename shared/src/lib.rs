//! Shared types for the back-office service
//!
//! Common types used across crates: the unified error system,
//! response structures, and small utility helpers.

pub mod error;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
