//! Sale API Handlers
//!
//! Thin layer over the sale workflow service: deserialize, delegate,
//! emit audit entries, map to status codes.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Sale, SaleBulkDelete, SaleCreate, SaleDetail, SaleUpdate};
use crate::services::SaleService;
use crate::utils::AppResult;

const RESOURCE: &str = "sale";

/// Query params for listing sales
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/sales
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Sale>>> {
    let service = SaleService::new(state.get_db());
    let sales = service.list(query.limit, query.offset).await?;
    Ok(Json(sales))
}

/// GET /api/sales/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SaleDetail>> {
    let service = SaleService::new(state.get_db());
    let sale = service.get(&id).await?;
    Ok(Json(sale))
}

/// POST /api/sales
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SaleCreate>,
) -> AppResult<(StatusCode, Json<SaleDetail>)> {
    let service = SaleService::new(state.get_db());
    let sale = service.create(payload).await?;

    let id = sale.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::SaleCreated,
        RESOURCE,
        &id,
        serde_json::json!({
            "items": sale.items.len(),
            "final_amount": sale.final_amount,
        }),
    );

    Ok((StatusCode::CREATED, Json(sale)))
}

/// PUT /api/sales/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SaleUpdate>,
) -> AppResult<Json<SaleDetail>> {
    let service = SaleService::new(state.get_db());
    let sale = service.update(&id, payload).await?;

    state.audit_log(
        AuditAction::SaleUpdated,
        RESOURCE,
        &id,
        serde_json::json!({
            "items": sale.items.len(),
            "final_amount": sale.final_amount,
        }),
    );

    Ok(Json(sale))
}

/// DELETE /api/sales/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let service = SaleService::new(state.get_db());
    service.delete(&id).await?;

    state.audit_log(AuditAction::SaleDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/sales/delete-many
pub async fn delete_many(
    State(state): State<ServerState>,
    Json(payload): Json<SaleBulkDelete>,
) -> AppResult<StatusCode> {
    let service = SaleService::new(state.get_db());
    service.delete_many(&payload.ids).await?;

    state.audit_log(
        AuditAction::SaleDeleted,
        RESOURCE,
        "bulk",
        serde_json::json!({ "ids": payload.ids }),
    );

    Ok(StatusCode::NO_CONTENT)
}
