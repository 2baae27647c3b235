//! Role Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Role, RoleCreate, RoleUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct RoleRepository {
    base: BaseRepository,
}

impl RoleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all roles
    pub async fn find_all(&self) -> RepoResult<Vec<Role>> {
        let roles: Vec<Role> = self
            .base
            .db()
            .query("SELECT * FROM role ORDER BY name")
            .await?
            .take(0)?;
        Ok(roles)
    }

    /// Find role by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Role>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid role ID format: {}", id)))?;
        let role: Option<Role> = self.base.db().select(thing).await?;
        Ok(role)
    }

    /// Find role by name
    pub async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let name_owned = name.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM role WHERE name = $name LIMIT 1")
            .bind(("name", name_owned))
            .await?;
        let roles: Vec<Role> = result.take(0)?;
        Ok(roles.into_iter().next())
    }

    /// Count employees assigned to this role
    pub async fn count_assigned(&self, id: &RecordId) -> RepoResult<usize> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE count() FROM employee WHERE role = $role GROUP ALL")
            .bind(("role", id.clone()))
            .await?;
        let counts: Vec<i64> = result.take(0)?;
        Ok(counts.first().copied().unwrap_or(0) as usize)
    }

    /// Create a new role
    pub async fn create(&self, data: RoleCreate) -> RepoResult<Role> {
        if self.find_by_name(&data.name).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                data.name
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE role SET
                    name = $name,
                    description = $description,
                    permissions = $permissions,
                    is_system = false,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("description", data.description))
            .bind(("permissions", data.permissions))
            .bind(("now", now))
            .await?;

        let created: Option<Role> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create role".to_string()))
    }

    /// Update a role
    pub async fn update(&self, id: &str, data: RoleUpdate) -> RepoResult<Role> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid role ID format: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot modify system role".to_string(),
            ));
        }

        if let Some(ref new_name) = data.name
            && new_name != &existing.name
            && self.find_by_name(new_name).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Role '{}' already exists",
                new_name
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    name = $name,
                    description = $description,
                    permissions = $permissions,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("description", data.description.or(existing.description)))
            .bind(("permissions", data.permissions.unwrap_or(existing.permissions)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Role> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))
    }

    /// Delete a role (refused while employees still carry it)
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid role ID format: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Role {} not found", id)))?;

        if existing.is_system {
            return Err(RepoError::Validation(
                "Cannot delete system role".to_string(),
            ));
        }

        if self.count_assigned(&thing).await? > 0 {
            return Err(RepoError::Validation(format!(
                "Role '{}' is in use",
                existing.name
            )));
        }

        let deleted: Option<Role> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
