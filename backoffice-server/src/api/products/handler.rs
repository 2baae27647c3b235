//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Product, ProductCreate, ProductUpdate, StockAdjust};
use crate::db::repository::ProductRepository;
use crate::utils::validation::{MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_amount, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "product";

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Include deactivated products
    #[serde(default)]
    pub with_inactive: bool,
}

/// GET /api/products
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let repo = ProductRepository::new(state.get_db());
    let products = if query.with_inactive {
        repo.find_all_with_inactive().await?
    } else {
        repo.find_all().await?
    };
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Product>> {
    let repo = ProductRepository::new(state.get_db());
    let product = repo.find_by_id(&id).await?.ok_or_else(|| product_not_found(&id))?;
    Ok(Json(product))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<(StatusCode, Json<Product>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&payload.sku, "sku", MAX_SHORT_TEXT_LEN)?;
    validate_amount(payload.unit_price, "unit_price")?;
    if payload.stock.is_some_and(|s| s < 0) {
        return Err(AppError::validation("stock must be non-negative"));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo.create(payload).await?;

    let id = product.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::ProductCreated,
        RESOURCE,
        &id,
        serde_json::json!({ "sku": product.sku, "stock": product.stock }),
    );

    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<Product>> {
    if let Some(price) = payload.unit_price {
        validate_amount(price, "unit_price")?;
    }

    let repo = ProductRepository::new(state.get_db());
    let before = repo.find_by_id(&id).await?.ok_or_else(|| product_not_found(&id))?;
    let product = repo.update(&id, payload).await?;

    if product.unit_price != before.unit_price {
        state.audit_log(
            AuditAction::ProductPriceChanged,
            RESOURCE,
            &id,
            serde_json::json!({ "from": before.unit_price, "to": product.unit_price }),
        );
    }

    Ok(Json(product))
}

/// DELETE /api/products/:id (deactivate)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = ProductRepository::new(state.get_db());
    if !repo.delete(&id).await? {
        return Err(product_not_found(&id));
    }

    state.audit_log(AuditAction::ProductDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/products/:id/stock-adjust — manual stock correction
pub async fn adjust_stock(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<StockAdjust>,
) -> AppResult<Json<Product>> {
    if payload.delta == 0 {
        return Err(AppError::validation("delta must be non-zero"));
    }

    let repo = ProductRepository::new(state.get_db());
    let product = repo.find_by_id(&id).await?.ok_or_else(|| product_not_found(&id))?;
    let record = product
        .id
        .clone()
        .ok_or_else(|| AppError::internal("product record has no id"))?;

    match repo.adjust_stock(&record, payload.delta).await? {
        Some(updated) => {
            state.audit_log(
                AuditAction::StockAdjusted,
                RESOURCE,
                &id,
                serde_json::json!({
                    "delta": payload.delta,
                    "stock": updated.stock,
                    "reason": payload.reason,
                }),
            );
            Ok(Json(updated))
        }
        None => Err(AppError::insufficient_stock(
            &product.name,
            product.stock,
            -payload.delta,
        )),
    }
}

fn product_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::ProductNotFound, format!("Product {} not found", id))
}
