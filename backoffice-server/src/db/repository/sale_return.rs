//! Sale Return Repository
//!
//! Persistence for sale-return headers and their line items. The return
//! invariants (customer match, original-sale membership, quantity caps)
//! are enforced by the sale-return workflow service.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{SaleReturn, SaleReturnDetail, SaleReturnItem};
use shared::util::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

#[derive(Clone)]
pub struct SaleReturnRepository {
    base: BaseRepository,
}

impl SaleReturnRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find return header by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<SaleReturn>> {
        let thing: RecordId = id
            .parse()
            .map_err(|_| RepoError::NotFound(format!("Invalid sale return ID format: {}", id)))?;
        let ret: Option<SaleReturn> = self.base.db().select(thing).await?;
        Ok(ret)
    }

    /// List return headers, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<SaleReturn>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sale_return ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let returns: Vec<SaleReturn> = result.take(0)?;
        Ok(returns)
    }

    /// Full return representation: header plus items in line order
    pub async fn detail(&self, id: &RecordId) -> RepoResult<Option<SaleReturnDetail>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT *,
                    (SELECT * FROM sale_return_item WHERE sale_return = $parent.id ORDER BY line_no) AS items
                FROM sale_return WHERE id = $id"#,
            )
            .bind(("id", id.clone()))
            .await?;
        let details: Vec<SaleReturnDetail> = result.take(0)?;
        Ok(details.into_iter().next())
    }

    /// All returns filed against one original sale, newest first
    pub async fn find_by_sale(&self, sale: &RecordId) -> RepoResult<Vec<SaleReturnDetail>> {
        let mut result = self
            .base
            .db()
            .query(
                r#"SELECT *,
                    (SELECT * FROM sale_return_item WHERE sale_return = $parent.id ORDER BY line_no) AS items
                FROM sale_return WHERE sale = $sale ORDER BY created_at DESC"#,
            )
            .bind(("sale", sale.clone()))
            .await?;
        let details: Vec<SaleReturnDetail> = result.take(0)?;
        Ok(details)
    }

    /// Which of `ids` actually exist
    pub async fn existing_ids(&self, ids: &[RecordId]) -> RepoResult<Vec<RecordId>> {
        let mut result = self
            .base
            .db()
            .query("SELECT VALUE id FROM sale_return WHERE id IN $ids")
            .bind(("ids", ids.to_vec()))
            .await?;
        let found: Vec<RecordId> = result.take(0)?;
        Ok(found)
    }

    /// Persist a new return header
    pub async fn create_header(
        &self,
        sale: &RecordId,
        customer: &RecordId,
        employee: &RecordId,
        reason: &str,
        total_return_amount: f64,
    ) -> RepoResult<SaleReturn> {
        let now = now_millis();
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sale_return SET
                    sale = $sale,
                    customer = $customer,
                    employee = $employee,
                    reason = $reason,
                    total_return_amount = $total_return_amount,
                    created_at = $now,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("sale", sale.clone()))
            .bind(("customer", customer.clone()))
            .bind(("employee", employee.clone()))
            .bind(("reason", reason.to_string()))
            .bind(("total_return_amount", total_return_amount))
            .bind(("now", now))
            .await?;

        let created: Option<SaleReturn> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create sale return".to_string()))
    }

    /// Overwrite the mutable header fields (employee, reason, total)
    pub async fn update_header(
        &self,
        id: &RecordId,
        employee: &RecordId,
        reason: &str,
        total_return_amount: f64,
    ) -> RepoResult<SaleReturn> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    employee = $employee,
                    reason = $reason,
                    total_return_amount = $total_return_amount,
                    updated_at = $now
                RETURN AFTER"#,
            )
            .bind(("id", id.clone()))
            .bind(("employee", employee.clone()))
            .bind(("reason", reason.to_string()))
            .bind(("total_return_amount", total_return_amount))
            .bind(("now", now_millis()))
            .await?;

        let updated: Option<SaleReturn> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Sale return {} not found", id)))
    }

    /// Items for one return in line order
    pub async fn items_for(&self, ret: &RecordId) -> RepoResult<Vec<SaleReturnItem>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM sale_return_item WHERE sale_return = $ret ORDER BY line_no")
            .bind(("ret", ret.clone()))
            .await?;
        let items: Vec<SaleReturnItem> = result.take(0)?;
        Ok(items)
    }

    /// Persist one return line item
    #[allow(clippy::too_many_arguments)]
    pub async fn insert_item(
        &self,
        ret: &RecordId,
        product: &RecordId,
        product_name: &str,
        sku: &str,
        quantity: i64,
        unit_price: f64,
        subtotal: f64,
        line_no: i32,
    ) -> RepoResult<SaleReturnItem> {
        let mut result = self
            .base
            .db()
            .query(
                r#"CREATE sale_return_item SET
                    sale_return = $ret,
                    product = $product,
                    product_name = $product_name,
                    sku = $sku,
                    quantity = $quantity,
                    unit_price = $unit_price,
                    subtotal = $subtotal,
                    line_no = $line_no
                RETURN AFTER"#,
            )
            .bind(("ret", ret.clone()))
            .bind(("product", product.clone()))
            .bind(("product_name", product_name.to_string()))
            .bind(("sku", sku.to_string()))
            .bind(("quantity", quantity))
            .bind(("unit_price", unit_price))
            .bind(("subtotal", subtotal))
            .bind(("line_no", line_no))
            .await?;

        let created: Option<SaleReturnItem> = result.take(0)?;
        created.ok_or_else(|| RepoError::Database("Failed to create return item".to_string()))
    }

    /// Update quantity/price/subtotal of one persisted return item
    pub async fn update_item(
        &self,
        item: &RecordId,
        quantity: i64,
        unit_price: f64,
        subtotal: f64,
    ) -> RepoResult<SaleReturnItem> {
        let mut result = self
            .base
            .db()
            .query(
                r#"UPDATE $id SET
                    quantity = $quantity,
                    unit_price = $unit_price,
                    subtotal = $subtotal
                RETURN AFTER"#,
            )
            .bind(("id", item.clone()))
            .bind(("quantity", quantity))
            .bind(("unit_price", unit_price))
            .bind(("subtotal", subtotal))
            .await?;

        let updated: Option<SaleReturnItem> = result.take(0)?;
        updated.ok_or_else(|| RepoError::NotFound(format!("Return item {} not found", item)))
    }

    /// Delete one persisted return item
    pub async fn delete_item(&self, item: &RecordId) -> RepoResult<()> {
        let _deleted: Option<SaleReturnItem> = self.base.db().delete(item.clone()).await?;
        Ok(())
    }

    /// Delete a return and its items
    pub async fn delete_with_items(&self, id: &RecordId) -> RepoResult<bool> {
        self.base
            .db()
            .query("DELETE sale_return_item WHERE sale_return = $id")
            .bind(("id", id.clone()))
            .await?;
        let deleted: Option<SaleReturn> = self.base.db().delete(id.clone()).await?;
        Ok(deleted.is_some())
    }

    /// Bulk delete: all items of the listed returns, then the headers
    pub async fn delete_many(&self, ids: &[RecordId]) -> RepoResult<()> {
        self.base
            .db()
            .query(
                "DELETE sale_return_item WHERE sale_return IN $ids; DELETE sale_return WHERE id IN $ids",
            )
            .bind(("ids", ids.to_vec()))
            .await?;
        Ok(())
    }
}
