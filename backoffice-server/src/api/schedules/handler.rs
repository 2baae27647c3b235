//! Schedule API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::audit::AuditAction;
use crate::core::ServerState;
use crate::db::models::{Schedule, ScheduleCreate, ScheduleUpdate};
use crate::db::repository::{EmployeeRepository, RepoError, ScheduleRepository};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use crate::utils::{AppError, AppResult, ErrorCode};

const RESOURCE: &str = "schedule";

/// Query params for listing schedules
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Calendar date "YYYY-MM-DD"
    pub date: Option<String>,
}

/// GET /api/schedules?date=YYYY-MM-DD
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Schedule>>> {
    let date = query
        .date
        .ok_or_else(|| AppError::validation("date query parameter is required"))?;
    validate_date(&date)?;

    let repo = ScheduleRepository::new(state.get_db());
    let schedules = repo.find_by_date(&date).await?;
    Ok(Json(schedules))
}

/// GET /api/schedules/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Schedule>> {
    let repo = ScheduleRepository::new(state.get_db());
    let schedule = repo.find_by_id(&id).await?.ok_or_else(|| schedule_not_found(&id))?;
    Ok(Json(schedule))
}

/// GET /api/schedules/employee/:employee_id
pub async fn list_by_employee(
    State(state): State<ServerState>,
    Path(employee_id): Path<String>,
) -> AppResult<Json<Vec<Schedule>>> {
    let employees = EmployeeRepository::new(state.get_db());
    let employee = employees
        .find_by_id(&employee_id)
        .await?
        .ok_or_else(|| employee_not_found(&employee_id))?;
    let record = employee
        .id
        .ok_or_else(|| AppError::internal("employee record has no id"))?;

    let repo = ScheduleRepository::new(state.get_db());
    let schedules = repo.find_by_employee(&record).await?;
    Ok(Json(schedules))
}

/// POST /api/schedules
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ScheduleCreate>,
) -> AppResult<(StatusCode, Json<Schedule>)> {
    validate_date(&payload.date)?;
    validate_time(&payload.shift_start, "shift_start")?;
    validate_time(&payload.shift_end, "shift_end")?;
    if payload.shift_end <= payload.shift_start {
        return Err(AppError::validation("shift_end must be after shift_start"));
    }
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

    let repo = ScheduleRepository::new(state.get_db());
    let schedule = repo
        .create(
            &record,
            &employee.display_name,
            &payload.date,
            &payload.shift_start,
            &payload.shift_end,
            payload.note,
        )
        .await
        .map_err(|e| match e {
            RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ScheduleOverlap, msg),
            other => other.into(),
        })?;

    let id = schedule.id.as_ref().map(|r| r.to_string()).unwrap_or_default();
    state.audit_log(
        AuditAction::ScheduleChanged,
        RESOURCE,
        &id,
        serde_json::json!({
            "employee": schedule.employee_name,
            "date": schedule.date,
        }),
    );

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// PUT /api/schedules/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ScheduleUpdate>,
) -> AppResult<Json<Schedule>> {
    if let Some(ref date) = payload.date {
        validate_date(date)?;
    }
    if let Some(ref start) = payload.shift_start {
        validate_time(start, "shift_start")?;
    }
    if let Some(ref end) = payload.shift_end {
        validate_time(end, "shift_end")?;
    }
    validate_optional_text(&payload.note, "note", MAX_NOTE_LEN)?;

    let repo = ScheduleRepository::new(state.get_db());
    let schedule = repo.update(&id, payload).await.map_err(|e| match e {
        RepoError::Duplicate(msg) => AppError::with_message(ErrorCode::ScheduleOverlap, msg),
        RepoError::NotFound(msg) => AppError::with_message(ErrorCode::ScheduleNotFound, msg),
        other => other.into(),
    })?;

    state.audit_log(
        AuditAction::ScheduleChanged,
        RESOURCE,
        &id,
        serde_json::json!({
            "employee": schedule.employee_name,
            "date": schedule.date,
        }),
    );

    Ok(Json(schedule))
}

/// DELETE /api/schedules/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let repo = ScheduleRepository::new(state.get_db());
    if !repo.delete(&id).await? {
        return Err(schedule_not_found(&id));
    }

    state.audit_log(AuditAction::ScheduleChanged, RESOURCE, &id, serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

/// "YYYY-MM-DD"
fn validate_date(value: &str) -> AppResult<()> {
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        return Err(AppError::validation(format!(
            "date must be YYYY-MM-DD, got '{value}'"
        )));
    }
    Ok(())
}

/// "HH:MM", zero-padded
fn validate_time(value: &str, field: &str) -> AppResult<()> {
    if chrono::NaiveTime::parse_from_str(value, "%H:%M").is_err() {
        return Err(AppError::validation(format!(
            "{field} must be HH:MM, got '{value}'"
        )));
    }
    Ok(())
}

fn schedule_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ScheduleNotFound,
        format!("Schedule {} not found", id),
    )
}

fn employee_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::EmployeeNotFound,
        format!("Employee {} not found", id),
    )
}
