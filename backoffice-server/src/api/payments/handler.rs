//! Payment API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Payment, PaymentCreate};
use crate::db::repository::{PaymentRepository, SaleRepository};
use crate::utils::validation::{MAX_NOTE_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "payment";

/// Query params for listing payments
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

/// GET /api/payments
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Payment>>> {
    let repo = PaymentRepository::new(state.get_db());
    let payments = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(payments))
}

/// GET /api/payments/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Payment>> {
    let repo = PaymentRepository::new(state.get_db());
    let payment = repo.find_by_id(&id).await?.ok_or_else(|| payment_not_found(&id))?;
    Ok(Json(payment))
}

/// GET /api/payments/by-sale/:sale_id
pub async fn list_by_sale(
    State(state): State<ServerState>,
    Path(sale_id): Path<String>,
) -> AppResult<Json<Vec<Payment>>> {
    let sales = SaleRepository::new(state.get_db());
    let sale = sales
        .find_by_id(&sale_id)
        .await?
        .ok_or_else(|| sale_not_found(&sale_id))?;
    let record = sale
        .id
        .ok_or_else(|| AppError::internal("sale record has no id"))?;

    let repo = PaymentRepository::new(state.get_db());
    let payments = repo.find_by_sale(&record).await?;
    Ok(Json(payments))
}

/// POST /api/payments
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<PaymentCreate>,
) -> AppResult<(StatusCode, Json<Payment>)> {
    if !payload.amount.is_finite() || payload.amount <= 0.0 {
        return Err(AppError::with_message(
            ErrorCode::PaymentInvalidAmount,
            format!("amount must be positive, got {}", payload.amount),
        ));
    }
    validate_optional_text(&payload.reference, "reference", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let sales = SaleRepository::new(state.get_db());
    let sale = sales
        .find_by_id(&payload.sale_id)
        .await?
        .ok_or_else(|| sale_not_found(&payload.sale_id))?;
    let record = sale
        .id
        .ok_or_else(|| AppError::internal("sale record has no id"))?;

    let repo = PaymentRepository::new(state.get_db());
    let payment = repo
        .create(
            &record,
            payload.method,
            payload.amount,
            payload.reference,
            payload.note,
        )
        .await?;

    let id = payment.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::PaymentRecorded,
        RESOURCE,
        &id,
        serde_json::json!({
            "sale": payment.sale.to_string(),
            "amount": payment.amount,
        }),
    );

    Ok((StatusCode::CREATED, Json(payment)))
}

/// DELETE /api/payments/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = PaymentRepository::new(state.get_db());
    if !repo.delete(&id).await? {
        return Err(payment_not_found(&id));
    }

    state.audit_log(AuditAction::PaymentDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

fn payment_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::PaymentNotFound,
        format!("Payment {} not found", id),
    )
}

fn sale_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::SaleNotFound, format!("Sale {} not found", id))
}
