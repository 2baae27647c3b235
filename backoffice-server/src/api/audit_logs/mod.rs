//! Audit Log API Module
//!
//! Read-only: the audit trail has no mutation endpoints.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/audit-logs", audit_routes())
}

fn audit_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/verify-chain", get(handler::verify_chain))
}
