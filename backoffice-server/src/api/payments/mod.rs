//! Payment API Module

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/payments", payment_routes())
}

fn payment_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/by-sale/{sale_id}", get(handler::list_by_sale))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
