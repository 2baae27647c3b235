//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{EmployeeCreate, EmployeeResponse, EmployeeUpdate};
use crate::db::repository::{EmployeeRepository, RoleRepository};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_required_text,
};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "employee";

/// GET /api/employees
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let repo = EmployeeRepository::new(state.get_db());
    let employees = repo.find_all().await?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// GET /api/employees/all — including deactivated
pub async fn list_with_inactive(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<EmployeeResponse>>> {
    let repo = EmployeeRepository::new(state.get_db());
    let employees = repo.find_all_with_inactive().await?;
    Ok(Json(employees.into_iter().map(EmployeeResponse::from).collect()))
}

/// GET /api/employees/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<EmployeeResponse>> {
    let repo = EmployeeRepository::new(state.get_db());
    let employee = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| employee_not_found(&id))?;
    Ok(Json(EmployeeResponse::from(employee)))
}

/// POST /api/employees
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<EmployeeCreate>,
) -> AppResult<(StatusCode, Json<EmployeeResponse>)> {
    validate_required_text(&payload.username, "username", MAX_NAME_LEN)?;
    validate_required_text(&payload.password, "password", MAX_PASSWORD_LEN)?;

    // The referenced role must exist
    let roles = RoleRepository::new(state.get_db());
    if roles.find_by_id(&payload.role.to_string()).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::RoleNotFound,
            format!("Role {} not found", payload.role),
        ));
    }

    let repo = EmployeeRepository::new(state.get_db());
    let employee = repo.create(payload).await?;

    let id = employee.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::EmployeeCreated,
        RESOURCE,
        &id,
        serde_json::json!({ "username": employee.username }),
    );

    Ok((StatusCode::CREATED, Json(employee)))
}

/// PUT /api/employees/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> AppResult<Json<EmployeeResponse>> {
    if let Some(ref role) = payload.role {
        let roles = RoleRepository::new(state.get_db());
        if roles.find_by_id(&role.to_string()).await?.is_none() {
            return Err(AppError::with_message(
                ErrorCode::RoleNotFound,
                format!("Role {} not found", role),
            ));
        }
    }

    let repo = EmployeeRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| employee_not_found(&id))?;
    if existing.is_system
        && (payload.username.is_some()
            || payload.role.is_some()
            || payload.is_active.is_some()
            || payload.display_name.is_some())
    {
        return Err(AppError::new(ErrorCode::EmployeeIsSystem));
    }

    let employee = repo.update(&id, payload).await?;

    state.audit_log(
        AuditAction::EmployeeUpdated,
        RESOURCE,
        &id,
        serde_json::json!({ "username": employee.username }),
    );

    Ok(Json(employee))
}

/// DELETE /api/employees/:id (deactivate)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = EmployeeRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| employee_not_found(&id))?;
    if existing.is_system {
        return Err(AppError::new(ErrorCode::EmployeeIsSystem));
    }

    repo.delete(&id).await?;

    state.audit_log(AuditAction::EmployeeDeleted, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

fn employee_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeNotFound,
        format!("Employee {} not found", id),
    )
}
