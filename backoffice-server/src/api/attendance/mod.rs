//! Attendance API Module

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/attendance", attendance_routes())
}

fn attendance_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list))
        .route("/clock-in", post(handler::clock_in))
        .route("/{id}/clock-out", post(handler::clock_out))
        .route("/employee/{employee_id}", get(handler::list_by_employee))
        .route("/{id}", get(handler::get_by_id))
}
