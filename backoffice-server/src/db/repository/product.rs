//! Product Repository

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find all products including inactive
    pub async fn find_all_with_inactive(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let product: Option<Product> = self.base.db().select(thing).await?;
        Ok(product)
    }

    /// Find product by SKU
    pub async fn find_by_sku(&self, sku: &str) -> RepoResult<Option<Product>> {
        let sku_owned = sku.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM product WHERE sku = $sku LIMIT 1")
            .bind(("sku", sku_owned))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        // Check duplicate SKU
        if self.find_by_sku(&data.sku).await?.is_some() {
            return Err(RepoError::Duplicate(format!(
                "SKU '{}' already exists",
                data.sku
            )));
        }

        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE product SET
                    name = $name,
                    sku = $sku,
                    description = $description,
                    unit_price = $unit_price,
                    stock = $stock,
                    is_active = true,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("name", data.name))
            .bind(("sku", data.sku))
            .bind(("description", data.description))
            .bind(("unit_price", data.unit_price))
            .bind(("stock", data.stock.unwrap_or(0)))
            .bind(("now", now))
            .await?;

        let created: Option<Product> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let existing = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        // Check duplicate SKU if changing
        if let Some(ref new_sku) = data.sku
            && new_sku != &existing.sku
            && self.find_by_sku(new_sku).await?.is_some()
        {
            return Err(RepoError::Duplicate(format!(
                "SKU '{}' already exists",
                new_sku
            )));
        }

        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    name = $name,
                    sku = $sku,
                    description = $description,
                    unit_price = $unit_price,
                    is_active = $is_active,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", thing))
            .bind(("name", data.name.unwrap_or(existing.name)))
            .bind(("sku", data.sku.unwrap_or(existing.sku)))
            .bind(("description", data.description.or(existing.description)))
            .bind(("unit_price", data.unit_price.unwrap_or(existing.unit_price)))
            .bind(("is_active", data.is_active.unwrap_or(existing.is_active)))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Product> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Soft delete a product
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid product ID format: {}", id)))?;
        let mut result = self
            .base
            .db()
            .query("UPDATE $id SET is_active = false, updated_at = $now RETURN AFTER")
            .bind(("id", thing))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        Ok(!updated.is_empty())
    }

    /// Atomically adjust stock by `delta`, refusing any change that would
    /// drive the counter negative.
    ///
    /// Returns the product after the change, or `None` when the guard
    /// rejected it (insufficient stock for a negative delta).
    pub async fn adjust_stock(&self, id: &RecordId, delta: i64) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE product
                    SET stock += $delta, updated_at = $now
                    WHERE id = $id AND stock + $delta >= 0
                RETURN AFTER"#,
            )
            .bind(("id", id.clone()))
            .bind(("delta", delta))
            .bind(("now", now_millis()))
            .await?;
        let updated: Vec<Product> = result.take(0)?;
        Ok(updated.into_iter().next())
    }
}
