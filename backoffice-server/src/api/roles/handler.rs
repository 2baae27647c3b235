//! Role API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Role, RoleCreate, RoleUpdate};
use crate::db::repository::RoleRepository;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "role";

/// GET /api/roles
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Role>>> {
    let repo = RoleRepository::new(state.get_db());
    let roles = repo.find_all().await?;
    Ok(Json(roles))
}

/// GET /api/roles/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Role>> {
    let repo = RoleRepository::new(state.get_db());
    let role = repo.find_by_id(&id).await?.ok_or_else(|| role_not_found(&id))?;
    Ok(Json(role))
}

/// POST /api/roles
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<RoleCreate>,
) -> AppResult<(StatusCode, Json<Role>)> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let repo = RoleRepository::new(state.get_db());
    if repo.find_by_name(&payload.name).await?.is_some() {
        return Err(AppError::with_message(
            ErrorCode::RoleNameExists,
            format!("Role '{}' already exists", payload.name),
        ));
    }
    let role = repo.create(payload).await?;

    let id = role.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::RoleCreated,
        RESOURCE,
        &id,
        serde_json::json!({ "name": role.name }),
    );

    Ok((StatusCode::CREATED, Json(role)))
}

/// PUT /api/roles/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<RoleUpdate>,
) -> AppResult<Json<Role>> {
    let repo = RoleRepository::new(state.get_db());
    let existing = repo.find_by_id(&id).await?.ok_or_else(|| role_not_found(&id))?;
    if existing.is_system {
        return Err(AppError::new(ErrorCode::RoleIsSystem));
    }

    let role = repo.update(&id, payload).await?;

    state.audit_log(
        AuditAction::RoleUpdated,
        RESOURCE,
        &id,
        serde_json::json!({ "name": role.name }),
    );

    Ok(Json(role))
}

/// DELETE /api/roles/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = RoleRepository::new(state.get_db());
    let existing = repo.find_by_id(&id).await?.ok_or_else(|| role_not_found(&id))?;
    if existing.is_system {
        return Err(AppError::new(ErrorCode::RoleIsSystem));
    }
    let record = existing
        .id
        .clone()
        .ok_or_else(|| AppError::internal("role record has no id"))?;
    if repo.count_assigned(&record).await? > 0 {
        return Err(AppError::with_message(
            ErrorCode::RoleInUse,
            format!("Role '{}' is in use", existing.name),
        ));
    }

    repo.delete(&id).await?;

    state.audit_log(AuditAction::RoleDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

fn role_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::RoleNotFound, format!("Role {} not found", id))
}
