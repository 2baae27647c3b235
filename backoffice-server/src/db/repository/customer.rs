//! Customer Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Customer, CustomerCreate, CustomerUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct CustomerRepository {
    base: BaseRepository,
}

impl CustomerRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active customers
    pub async fn find_all(&self) -> RepoResult<Vec<Customer>> {
        let customers: Vec<Customer> = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(customers)
    }

    /// Find customer by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Customer>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid customer ID format: {}", id)))?;
        let customer: Option<Customer> = self.base.db().select(thing).await?;
        Ok(customer)
    }

    /// Find customer by phone number
    pub async fn find_by_phone(&self, phone: &str) -> RepoResult<Option<Customer>> {
        let phone_owned = phone.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM customer WHERE phone = $phone LIMIT 1")
            .bind(("phone", phone_owned))
            .await?;
        let customers: Vec<Customer> = result.take(0)?;
        Ok(customers.into_iter().next())
    }

    /// Create a new customer
    pub async fn create(&self, data: CustomerCreate) -> RepoResult<Customer> {
        // Check duplicate phone when given
        if let Some(ref phone) = data.phone
            && self.find_by_phone(phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Phone '{}' already registered",
                phone
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE customer SET
                    name = $name,
                    phone = $phone,
                    email = $email,
                    address = $address,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("phone", data.phone))
            .bind(("email", data.email))
            .bind(("address", data.address))
            .bind(("now", now))
            .await?;

        let created: Option<Customer> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create customer".to_string()))
    }

    /// Update a customer
    pub async fn update(&self, id: &str, data: CustomerUpdate) -> RepoResult<Customer> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid customer ID format: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))?;

        if let Some(ref new_phone) = data.phone
            && existing.phone.as_deref() != Some(new_phone)
            && self.find_by_phone(new_phone).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "Phone '{}' already registered",
                new_phone
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    name = $name,
                    phone = $phone,
                    email = $email,
                    address = $address,
                    is_active = $is_active,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("phone", data.phone.or(existing.phone)))
            .bind(("email", data.email.or(existing.email)))
            .bind(("address", data.address.or(existing.address)))
            .bind(("is_active", data.is_active.unwrap_or(existing.is_active)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Customer> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Customer {} not found", id)))
    }

    /// Soft delete a customer
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid customer ID format: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET is_active = false, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Customer> = result.take(0)?;
        Ok(!updated.is_empty())
    }
}
