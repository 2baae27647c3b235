//! Attendance API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Attendance, ClockIn, ClockOut};
use crate::db::repository::{AttendanceRepository, EmployeeRepository, RepoError};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "attendance";

/// Query params for listing attendance records
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

/// GET /api/attendance
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Attendance>>> {
    let repo = AttendanceRepository::new(state.get_db());
    let records = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(records))
}

/// GET /api/attendance/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Attendance>> {
    let repo = AttendanceRepository::new(state.get_db());
    let record = repo.find_by_id(&id).await?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::AttendanceNotFound,
            format!("Attendance {} not found", id),
        )
    })?;
    Ok(Json(record))
}

/// GET /api/attendance/employee/:employee_id
pub async fn list_by_employee(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<Vec<Attendance>>> {
    let employees = EmployeeRepository::new(state.get_db());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(|| employee_not_found(&employee_id))?;
    let record = employee
        .id
        .ok_or_else(|| AppError::internal("employee record has no id"))?;

    let repo = AttendanceRepository::new(state.get_db());
    let records = repo.find_by_employee(&record).await?;
    Ok(Json(records))
}

/// POST /api/attendance/clock-in
pub async fn clock_in(
    State(state): State<ServerState>,
    Json(payload): Json<ClockIn>,
) -> AppResult<(StatusCode, Json<Attendance>)> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let employees = EmployeeRepository::new(state.get_db());
    let employee = employees
        .find_by_id(&payload.employee_id)
        .await?
        .ok_or_else(|| employee_not_found(&payload.employee_id))?;
    let record = employee
        .id
        .clone()
        .ok_or_else(|| AppError::internal("employee record has no id"))?;

    let repo = AttendanceRepository::new(state.get_db());
    let attendance = repo
        .clock_in(
            &record,
            &employee.display_name,
            payload.status.unwrap_or_default(),
            payload.note,
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => {
                AppError::with_message(ErrorCode::AlreadyClockedIn, msg)
            }
            other => other.into(),
        })?;

    let id = attendance.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::ClockedIn,
        RESOURCE,
        &id,
        serde_json::json!({ "employee": employee.display_name }),
    );

    Ok((StatusCode::CREATED, Json(attendance)))
}

/// POST /api/attendance/:id/clock-out
pub async fn clock_out(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ClockOut>,
) -> AppResult<Json<Attendance>> {
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = AttendanceRepository::new(state.get_db());
    let attendance = repo
        .clock_out(&id, payload.note)
        .await
        .map_err(|e| match e {
            RepoError::Validation(msg) => AppError::with_message(ErrorCode::NotClockedIn, msg),
            RepoError::NotFound(msg) => {
                AppError::with_message(ErrorCode::AttendanceNotFound, msg)
            }
            other => other.into(),
        })?;

    state.audit_log(
        AuditAction::ClockedOut,
        RESOURCE,
        &id,
        serde_json::json!({ "employee": attendance.employee_name }),
    );

    Ok(Json(attendance))
}

fn employee_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeNotFound,
        format!("Employee {} not found", id),
    )
}
