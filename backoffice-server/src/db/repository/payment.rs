//! Payment Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Payment, PaymentMethod};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct PaymentRepository {
    base: BaseRepository,
}

impl PaymentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find payment by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Payment>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid payment ID format: {}", id)))?;
        let payment: Option<Payment> = self.base.db().select(thing).await?;
        Ok(payment)
    }

    /// List payments, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Payment>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payment ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        Ok(payments)
    }

    /// List payments for one sale, oldest first
    pub async fn find_by_sale(&self, sale: &RecordId) -> RepoResult<Vec<Payment>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM payment WHERE sale = $sale ORDER BY created_at")
            .bind(("sale", sale.clone()))
            .await?;
        let payments: Vec<Payment> = result.take(0)?;
        Ok(payments)
    }

    /// Record a payment against a sale
    pub async fn create(
        &self,
        sale: &RecordId,
        method: PaymentMethod,
        amount: f64,
        reference: Option<String>,
        note: Option<String>,
    ) -> RepoResult<Payment> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE payment SET
                    sale = $sale,
                    method = $method,
                    amount = $amount,
                    reference = $reference,
                    note = $note,
                    created_at = $now
                RETURN AFTER"#,
            )
            .bind(("sale", sale.clone()))
            .bind(("method", method))
            .bind(("amount", amount))
            .bind(("reference", reference))
            .bind(("note", note))
            .bind(("now", now))
            .await?;

        let created: Option<Payment> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create payment".to_string()))
    }

    /// Delete a payment
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid payment ID format: {}", id)))?;
        let deleted: Option<Payment> = self.base.db().delete(thing).await?;
        Ok(deleted.is_some())
    }
}
