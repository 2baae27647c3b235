//! Audit Log API Handlers

use axum::{
    Json,
    extract::{Query, State},
};

use crate::audit::{AuditChainVerification, AuditListResponse, AuditQuery};
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// GET /api/audit-logs
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<AuditQuery>,
) -> AppResult<Json<AuditListResponse>> {
    let audit = state
        .audit
        .as_ref()
        .ok_or_else(|| AppError::invalid_request("Audit logging is disabled"))?;
    let (entries, total) = audit.query(&query).await?;
    Ok(Json(AuditListResponse { entries, total }))
}

/// GET /api/audit-logs/verify-chain
pub async fn verify_chain(
    State(state): State<ServerState>,
) -> AppResult<Json<AuditChainVerification>> {
    let audit = state
        .audit
        .as_ref()
        .ok_or_else(|| AppError::invalid_request("Audit logging is disabled"))?;
    let verification = audit.verify_chain().await?;
    Ok(Json(verification))
}
