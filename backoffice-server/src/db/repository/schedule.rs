//! Schedule Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Schedule, ScheduleUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ScheduleRepository {
    base: BaseRepository,
}

impl ScheduleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find schedule by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Schedule>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid schedule ID format: {}", id)))?;
        let schedule: Option<Schedule> = self.base.db().select(thing).await?;
        Ok(schedule)
    }

    /// List schedules for a calendar date
    pub async fn find_by_date(&self, date: &str) -> RepoResult<Vec<Schedule>> {
        let date_owned = date.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM schedule WHERE date = $date ORDER BY shift_start")
            .bind(("date", date_owned))
            .await?;
        let schedules: Vec<Schedule> = result.take(0)?;
        Ok(schedules)
    }

    /// List schedules for one employee, newest date first
    pub async fn find_by_employee(&self, employee: &RecordId) -> RepoResult<Vec<Schedule>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM schedule WHERE employee = $employee ORDER BY date DESC")
            .bind(("employee", employee.clone()))
            .await?;
        let schedules: Vec<Schedule> = result.take(0)?;
        Ok(schedules)
    }

    /// Overlapping shift for the same employee on the same date.
    /// Times are zero-padded "HH:MM" so string comparison is enough.
    pub async fn find_overlap(
        &self,
        employee: &RecordId,
        date: &str,
        shift_start: &str,
        shift_end: &str,
        exclude: Option<&RecordId>,
    ) -> RepoResult<Option<Schedule>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT * FROM schedule
                    WHERE employee = $employee
                      AND date = $date
                      AND shift_start < $shift_end
                      AND shift_end > $shift_start
                      AND ($exclude = NONE OR id != $exclude)
                    LIMIT 1"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("date", date.to_string()))
            .bind(("shift_start", shift_start.to_string()))
            .bind(("shift_end", shift_end.to_string()))
            .bind(("exclude", exclude.cloned()))
            .await?;
        let schedules: Vec<Schedule> = result.take(0)?;
        Ok(schedules.into_iter().next())
    }

    /// Create a schedule entry
    pub async fn create(
        &self,
        employee: &RecordId,
        employee_name: &str,
        date: &str,
        shift_start: &str,
        shift_end: &str,
        note: Option<String>,
    ) -> RepoResult<Schedule> {
        if self
            .find_overlap(employee, date, shift_start, shift_end, None)
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Employee '{}' already has a shift overlapping {} {}-{}",
                employee_name, date, shift_start, shift_end
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE schedule SET
                    employee = $employee,
                    employee_name = $employee_name,
                    date = $date,
                    shift_start = $shift_start,
                    shift_end = $shift_end,
                    note = $note,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("employee", employee.clone()))
            .bind(("employee_name", employee_name.to_string()))
            .bind(("date", date.to_string()))
            .bind(("shift_start", shift_start.to_string()))
            .bind(("shift_end", shift_end.to_string()))
            .bind(("note", note))
            .bind(("now", now))
            .await?;

        let created: Option<Schedule> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create schedule".to_string()))
    }

    /// Update a schedule entry
    pub async fn update(&self, id: &str, data: ScheduleUpdate) -> RepoResult<Schedule> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid schedule ID format: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Schedule {} not found", id)))?;

        let date = data.date.unwrap_or(existing.date);
        let shift_start = data.shift_start.unwrap_or(existing.shift_start);
        let shift_end = data.shift_end.unwrap_or(existing.shift_end);

        if self
            .find_overlap(&existing.employee, &date, &shift_start, &shift_end, Some(&thing))
            .await?
            .is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Employee '{}' already has a shift overlapping {} {}-{}",
                existing.employee_name, date, shift_start, shift_end
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    date = $date,
                    shift_start = $shift_start,
                    shift_end = $shift_end,
                    note = $note,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("date", date))
            .bind(("shift_start", shift_start))
            .bind(("shift_end", shift_end))
            .bind(("note", data.note.or(existing.note)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Schedule> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Schedule {} not found", id)))
    }

    /// Delete a schedule entry
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid schedule ID format: {}", id)))?;
        let deleted: Option<Schedule> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
