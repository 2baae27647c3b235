//! Sale Return API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{
    SaleReturn, SaleReturnBulkDelete, SaleReturnCreate, SaleReturnDetail, SaleReturnUpdate,
};
use crate::services::SaleReturnService;
use crate::utils::AppResult;

const RESOURCE: &str = "sale_return";

/// Query params for listing returns
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

/// GET /api/sale-returns
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<SaleReturn>>> {
    let service = SaleReturnService::new(state.get_db());
    let returns = service.list(query.limit, query.offset).await?;
    Ok(Json(returns))
}

/// GET /api/sale-returns/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<SaleReturnDetail>> {
    let service = SaleReturnService::new(state.get_db());
    let ret = service.get(&id).await?;
    Ok(Json(ret))
}

/// GET /api/sale-returns/original-sale/:sale_id
pub async fn list_by_sale(
    State(state): State<ServerState>,
    Path(sale_id): Path<String>,
) -> AppResult<Json<Vec<SaleReturnDetail>>> {
    let service = SaleReturnService::new(state.get_db());
    let returns = service.find_by_sale(&sale_id).await?;
    Ok(Json(returns))
}

/// POST /api/sale-returns
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<SaleReturnCreate>,
) -> AppResult<(StatusCode, Json<SaleReturnDetail>)> {
    let service = SaleReturnService::new(state.get_db());
    let ret = service.create(payload).await?;

    let id = ret.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::ReturnCreated,
        RESOURCE,
        &id,
        serde_json::json!({
            "sale": ret.sale.to_string(),
            "items": ret.items.len(),
            "total_return_amount": ret.total_return_amount,
        }),
    );

    Ok((StatusCode::CREATED, Json(ret)))
}

/// PUT /api/sale-returns/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<SaleReturnUpdate>,
) -> AppResult<Json<SaleReturnDetail>> {
    let service = SaleReturnService::new(state.get_db());
    let ret = service.update(&id, payload).await?;

    state.audit_log(
        AuditAction::ReturnUpdated,
        RESOURCE,
        &id,
        serde_json::json!({
            "items": ret.items.len(),
            "total_return_amount": ret.total_return_amount,
        }),
    );

    Ok(Json(ret))
}

/// DELETE /api/sale-returns/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let service = SaleReturnService::new(state.get_db());
    service.delete(&id).await?;

    state.audit_log(AuditAction::ReturnDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/sale-returns/delete-many
pub async fn delete_many(
    State(state): State<ServerState>,
    Json(payload): Json<SaleReturnBulkDelete>,
) -> AppResult<StatusCode> {
    let service = SaleReturnService::new(state.get_db());
    service.delete_many(&payload.ids).await?;

    state.audit_log(
        AuditAction::ReturnDeleted,
        RESOURCE,
        "bulk",
        serde_json::json!({ "ids": payload.ids }),
    );

    Ok(StatusCode::NO_CONTENT)
}
