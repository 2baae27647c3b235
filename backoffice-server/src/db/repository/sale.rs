//! Sale Repository
//!
//! Mechanical persistence for sale headers and their line items. Stock
//! arithmetic and batch validation live in the sale workflow service.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Sale, SaleDetail, SaleItem};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SaleRepository {
    base: BaseRepository,
}

impl SaleRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find sale header by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Sale>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid sale ID format: {}", id)))?;
        let sale: Option<Sale> = self.base.db().select(thing).await?;
        Ok(sale)
    }

    /// List sale headers, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<Sale>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sale ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let sales: Vec<Sale> = result.take(0)?;
        Ok(sales)
    }

    /// Full sale representation: header plus items in line order
    pub async fn detail(&self, id: &RecordId) -> RepoResult<Option<SaleDetail>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT *,
                    (SELECT * FROM sale_item WHERE sale = $parent.id ORDER BY line_no) AS items
                FROM sale WHERE id = $id"#,
            )
            .bind(("id", id.clone()))
            .await?;
        let details: Vec<SaleDetail> = result.take(0)?;
        Ok(details.into_iter().next())
    }

    /// Which of `ids` actually exist
    pub async fn existing_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<RecordId>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE id FROM sale WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        let found: Vec<RecordId> = result.take(0)?;
        Ok(found)
    }

    /// Persist a new sale header
    #[allow(clippy::too_many_arguments)]
    pub async fn create_header(
        &self,
        customer: &RecordId,
        employee: &RecordId,
        total_amount: f64,
        tax_amount: f64,
        discount_amount: f64,
        final_amount: f64,
    ) -> RepoResult<Sale> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sale SET
                    customer = $customer,
                    employee = $employee,
                    total_amount = $total_amount,
                    tax_amount = $tax_amount,
                    discount_amount = $discount_amount,
                    final_amount = $final_amount,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("customer", customer.clone()))
            .bind(("employee", employee.clone()))
            .bind(("total_amount", total_amount))
            .bind(("tax_amount", tax_amount))
            .bind(("discount_amount", discount_amount))
            .bind(("final_amount", final_amount))
            .bind(("now", now))
            .await?;

        let created: Option<Sale> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sale".to_string()))
    }

    /// Overwrite the scalar fields of an existing header
    #[allow(clippy::too_many_arguments)]
    pub async fn update_header(
        &self,
        id: &RecordId,
        customer: &RecordId,
        employee: &RecordId,
        total_amount: f64,
        tax_amount: f64,
        discount_amount: f64,
        final_amount: f64,
    ) -> RepoResult<Sale> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    customer = $customer,
                    employee = $employee,
                    total_amount = $total_amount,
                    tax_amount = $tax_amount,
                    discount_amount = $discount_amount,
                    final_amount = $final_amount,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", id.clone()))
            .bind(("customer", customer.clone()))
            .bind(("employee", employee.clone()))
            .bind(("total_amount", total_amount))
            .bind(("tax_amount", tax_amount))
            .bind(("discount_amount", discount_amount))
            .bind(("final_amount", final_amount))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<Sale> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Sale {} not found", id)))
    }

    /// Items for one sale in line order
    pub async fn items_for(&self, sale: &RecordId) -> RepoResult<Vec<SaleItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sale_item WHERE sale = $sale ORDER BY line_no")
            .bind(("sale", sale.clone()))
            .await?;
        let items: Vec<SaleItem> = result.take(0)?;
        Ok(items)
    }

    /// Persist one line item
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_item(
        &self,
        sale: &RecordId,
        product: &RecordId,
        product_name: &str,
        sku: &str,
        quantity: i64,
        unit_price: f64,
        subtotal: f64,
        line_no: i32,
    ) -> RepoResult<SaleItem> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sale_item SET
                    sale = $sale,
                    product = $product,
                    product_name = $product_name,
                    sku = $sku,
                    quantity = $quantity,
                    unit_price = $unit_price,
                    subtotal = $subtotal,
                    line_no = $line_no
                RETURN AFTER"#,
            )
            .bind(("sale", sale.clone()))
            .bind(("product", product.clone()))
            .bind(("product_name", product_name.to_string()))
            .bind(("sku", sku.to_string()))
            .bind(("quantity", quantity))
            .bind(("unit_price", unit_price))
            .bind(("subtotal", subtotal))
            .bind(("line_no", line_no))
            .await?;

        let created: Option<SaleItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sale item".to_string()))
    }

    /// Remove all items belonging to one sale
    pub async fn delete_items(&self, sale: &RecordId) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE sale_item WHERE sale = $sale")
            .bind(("sale", sale.clone()))
            .await?;
        Ok(())
    }

    /// Delete a sale and its items
    pub async fn delete_with_items(&self, id: &RecordId) -> RepoResult<bool> {
        self.delete_items(id).await?;
        let deleted: Option<Sale> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Bulk delete: all items of the listed sales, then the headers
    pub async fn delete_many(&self, ids: &[RecordId]) -> RepoResult<()> {
        self.base
            .db()
            .query("DELETE sale_item WHERE sale IN $ids; DELETE sale WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        Ok(())
    }
}
