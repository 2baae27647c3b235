//! Attendance Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Attendance, AttendanceStatus};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct AttendanceRepository {
    base: BaseRepository,
}

impl AttendanceRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find attendance record by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Attendance>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid attendance ID format: {}", id)))?;
        let record: Option<Attendance> = self.base.db().select(thing).await?;
        Ok(record)
    }

    /// Find the open (not clocked out) record for an employee
    pub async fn find_open_for(&self, employee: &RecordId) -> RepoResult<Option<Attendance>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM attendance WHERE employee = $employee AND clock_out = NONE LIMIT 1",
            )
            .bind(("employee", employee.clone()))
            .await?;
        let records: Vec<Attendance> = result.take(0)?;
        Ok(records.into_iter().next())
    }

    /// List records, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Attendance>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance ORDER BY clock_in DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let records: Vec<Attendance> = result.take(0)?;
        Ok(records)
    }

    /// List records for one employee, newest first
    pub async fn find_by_employee(&self, employee: &RecordId) -> RepoResult<Vec<Attendance>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM attendance WHERE employee = $employee ORDER BY clock_in DESC")
            .bind(("employee", employee.clone()))
            .await?;
        let records: Vec<Attendance> = result.take(0)?;
        Ok(records)
    }

    /// Clock an employee in (one open record per employee)
    pub async fn clock_in(
        &self,
        employee: &RecordId,
        employee_name: &str,
        status: AttendanceStatus,
        note: Option<String>,
    ) -> RepoResult<Attendance> {
        if self.find_open_for(employee).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Employee '{}' is already clocked in",
                employee_name
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE attendance SET
                    employee = $employee,
                    employee_name = $employee_name,
                    status = $status,
                    clock_in = $now,
                    clock_out = NONE,
                    note = $note,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("employee_name", employee_name.to_string()))
            .bind(("status", status))
            .bind(("note", note))
            .bind(("now", now))
            .await?;

        let created: Option<Attendance> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create attendance".to_string()))
    }

    /// Clock an open record out
    pub async fn clock_out(&self, id: &str, note: Option<String>) -> RepoResult<Attendance> {
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Attendance {} not found", id)))?;

        if existing.clock_out.is_some() {
            return Err(RepoError::Validation(
                "Attendance record already closed".to_string(),
            ));
        }

        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid attendance ID format: {}", id)))?;
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    clock_out = $now,
                    note = $note,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("note", note.or(existing.note)))
            .bind(("now", now))
            .await?;

        let updated: Option<Attendance> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Attendance {} not found", id)))
    }
}
