//! Sale Return API Module

mod handler;

use axum::{
    Router,
    routing::{delete, get},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/sale-returns", return_routes())
}

fn return_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/delete-many",
            delete(handler::delete_many).post(handler::delete_many),
        )
        .route("/original-sale/{sale_id}", get(handler::list_by_sale))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::delete),
        )
}
