//! Sale-return workflow service
//!
//! Orchestrates create/update/delete of sale-return aggregates. Every
//! returned product must appear in the original sale, cumulative
//! returned quantity may not exceed the purchased quantity, and the
//! filing customer must be the original purchaser. Stock moves in the
//! opposite direction from sales: creation puts goods back, deletion
//! takes them out again. As with sales, the whole payload is validated
//! before any stock mutation.

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{
    Customer, Employee, Product, ReturnLineInput, Sale, SaleItem, SaleReturn, SaleReturnCreate,
    SaleReturnDetail, SaleReturnUpdate,
};
use crate::db::repository::{
    CustomerRepository, EmployeeRepository, ProductRepository, RepoError, SaleRepository,
    SaleReturnRepository,
};
use crate::services::{money, required_id, stock};
use crate::utils::validation::{MAX_NOTE_LEN, validate_amount, validate_required_text};

/// One aggregated return line (payload lines collapsed per product)
struct ResolvedReturnLine {
    product: Product,
    product_ref: RecordId,
    quantity: i64,
    unit_price: f64,
}

pub struct SaleReturnService {
    returns: SaleReturnRepository,
    sales: SaleRepository,
    products: ProductRepository,
    customers: CustomerRepository,
    employees: EmployeeRepository,
}

impl SaleReturnService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            returns: SaleReturnRepository::new(db.clone()),
            sales: SaleRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            employees: EmployeeRepository::new(db),
        }
    }

    /// List return headers
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<SaleReturn>> {
        Ok(self.returns.find_all(limit, offset).await?)
    }

    /// Full representation of one return
    pub async fn get(&self, id: &str) -> AppResult<SaleReturnDetail> {
        let ret = self.resolve_return(id).await?;
        let ret_id = required_id(ret.id, "sale_return")?;
        self.returns
            .detail(&ret_id)
            .await?
            .ok_or_else(|| return_not_found(id))
    }

    /// All returns filed against one original sale
    pub async fn find_by_sale(&self, sale_id: &str) -> AppResult<Vec<SaleReturnDetail>> {
        let sale = self.resolve_sale(sale_id).await?;
        let sale_ref = required_id(sale.id, "sale")?;
        Ok(self.returns.find_by_sale(&sale_ref).await?)
    }

    /// Create a sale return: all invariants checked up front, then the
    /// header and items are persisted and stock is incremented.
    pub async fn create(&self, data: SaleReturnCreate) -> AppResult<SaleReturnDetail> {
        validate_required_text(&data.reason, "reason", MAX_NOTE_LEN)
            .map_err(|_| AppError::new(ErrorCode::ReturnReasonRequired))?;
        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::ReturnEmpty));
        }
        validate_return_lines(&data.items)?;

        let sale = self.resolve_sale(&data.sale_id).await?;
        let sale_ref = required_id(sale.id.clone(), "sale")?;
        let sale_lines = self.sale_lines_by_product(&sale_ref).await?;

        let customer = self.resolve_customer(&data.customer_id).await?;
        let customer_ref = required_id(customer.id.clone(), "customer")?;
        if customer_ref != sale.customer {
            return Err(AppError::with_message(
                ErrorCode::ReturnCustomerMismatch,
                format!(
                    "Customer '{}' did not make the original purchase",
                    customer.name
                ),
            ));
        }

        let employee = self.resolve_employee(&data.employee_id).await?;
        let employee_ref = required_id(employee.id, "employee")?;

        let lines = self
            .resolve_return_lines(&data.items, &sale_lines)
            .await?;
        check_against_sale(&lines, &sale_lines)?;

        let total = money::sum(
            lines
                .iter()
                .map(|l| money::line_subtotal(l.quantity, l.unit_price)),
        );

        let ret = self
            .returns
            .create_header(&sale_ref, &customer_ref, &employee_ref, &data.reason, total)
            .await?;
        let ret_id = required_id(ret.id, "sale_return")?;

        for (idx, line) in lines.iter().enumerate() {
            // Returns put goods back on the shelf
            self.products
                .adjust_stock(&line.product_ref, line.quantity)
                .await?;
            let subtotal = money::line_subtotal(line.quantity, line.unit_price);
            self.returns
                .insert_item(
                    &ret_id,
                    &line.product_ref,
                    &line.product.name,
                    &line.product.sku,
                    line.quantity,
                    line.unit_price,
                    subtotal,
                    (idx + 1) as i32,
                )
                .await?;
        }

        tracing::info!(sale_return = %ret_id, sale = %sale_ref, "Sale return created");

        self.returns
            .detail(&ret_id)
            .await?
            .ok_or_else(|| AppError::internal("Sale return disappeared after create"))
    }

    /// Update a sale return. The original sale and customer references
    /// are immutable; items are synchronized against the persisted set
    /// keyed by product id and the total is recomputed from subtotals.
    pub async fn update(&self, id: &str, data: SaleReturnUpdate) -> AppResult<SaleReturnDetail> {
        let ret = self.resolve_return(id).await?;
        let ret_id = required_id(ret.id.clone(), "sale_return")?;

        if let Some(ref sid) = data.sale_id {
            let requested: Option<RecordId> = sid.parse().ok();
            if requested.as_ref() != Some(&ret.sale) {
                return Err(AppError::new(ErrorCode::ReturnSaleImmutable));
            }
        }
        if let Some(ref cid) = data.customer_id {
            let requested: Option<RecordId> = cid.parse().ok();
            if requested.as_ref() != Some(&ret.customer) {
                return Err(AppError::new(ErrorCode::ReturnCustomerImmutable));
            }
        }

        let employee_ref = match &data.employee_id {
            Some(eid) => required_id(self.resolve_employee(eid).await?.id, "employee")?,
            None => ret.employee.clone(),
        };
        let reason = match data.reason {
            Some(reason) => {
                validate_required_text(&reason, "reason", MAX_NOTE_LEN)
                    .map_err(|_| AppError::new(ErrorCode::ReturnReasonRequired))?;
                reason
            }
            None => ret.reason.clone(),
        };

        if data.items.is_empty() {
            return Err(AppError::new(ErrorCode::ReturnEmpty));
        }
        validate_return_lines(&data.items)?;

        let sale_lines = self.sale_lines_by_product(&ret.sale).await?;
        let lines = self
            .resolve_return_lines(&data.items, &sale_lines)
            .await?;
        check_against_sale(&lines, &sale_lines)?;

        let existing_items = self.returns.items_for(&ret_id).await?;
        let existing_by_product: HashMap<String, &crate::db::models::SaleReturnItem> =
            existing_items
                .iter()
                .map(|i| (i.product.to_string(), i))
                .collect();

        // Net stock movement: a return update that shrinks a line takes
        // goods back out of stock, which must not go negative.
        let old_alloc = stock::allocation_map(
            existing_items
                .iter()
                .map(|i| (i.product.to_string(), i.quantity)),
        );
        let new_alloc = stock::allocation_map(
            lines
                .iter()
                .map(|l| (l.product_ref.to_string(), l.quantity)),
        );
        let deltas = stock::net_deltas(&old_alloc, &new_alloc);

        for (pid, delta) in &deltas {
            if *delta < 0 {
                let needed = -*delta;
                let product = self.product_for_delta(pid, &lines).await?;
                if product.stock < needed {
                    return Err(AppError::insufficient_stock(
                        &product.name,
                        product.stock,
                        needed,
                    ));
                }
            }
        }

        // Apply stock movement, one signed adjustment per product
        for (pid, delta) in &deltas {
            let record: RecordId = pid
                .parse()
                .map_err(|_| AppError::internal(format!("bad product id in delta map: {pid}")))?;
            if self.products.adjust_stock(&record, *delta).await?.is_none() {
                let product = self.product_for_delta(pid, &lines).await?;
                return Err(AppError::insufficient_stock(
                    &product.name,
                    product.stock,
                    -*delta,
                ));
            }
        }

        // Synchronize items keyed by product id
        let mut next_line_no = existing_items
            .iter()
            .map(|i| i.line_no)
            .max()
            .unwrap_or(0);
        let new_products: std::collections::HashSet<String> = lines
            .iter()
            .map(|l| l.product_ref.to_string())
            .collect();

        for item in &existing_items {
            if !new_products.contains(&item.product.to_string()) {
                let item_id = required_id(item.id.clone(), "sale_return_item")?;
                self.returns.delete_item(&item_id).await?;
            }
        }
        for line in &lines {
            let subtotal = money::line_subtotal(line.quantity, line.unit_price);
            match existing_by_product.get(&line.product_ref.to_string()) {
                Some(existing) => {
                    let item_id = required_id(existing.id.clone(), "sale_return_item")?;
                    self.returns
                        .update_item(&item_id, line.quantity, line.unit_price, subtotal)
                        .await?;
                }
                None => {
                    next_line_no += 1;
                    self.returns
                        .insert_item(
                            &ret_id,
                            &line.product_ref,
                            &line.product.name,
                            &line.product.sku,
                            line.quantity,
                            line.unit_price,
                            subtotal,
                            next_line_no,
                        )
                        .await?;
                }
            }
        }

        // The recomputed total is authoritative
        let total = money::sum(
            lines
                .iter()
                .map(|l| money::line_subtotal(l.quantity, l.unit_price)),
        );
        self.returns
            .update_header(&ret_id, &employee_ref, &reason, total)
            .await?;

        tracing::info!(sale_return = %ret_id, "Sale return updated");

        self.returns
            .detail(&ret_id)
            .await?
            .ok_or_else(|| return_not_found(id))
    }

    /// Delete a return, reversing the stock increase it granted
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let ret = self.resolve_return(id).await?;
        let ret_id = required_id(ret.id, "sale_return")?;
        let items = self.returns.items_for(&ret_id).await?;

        self.check_stock_for_removal(&items).await?;
        for item in &items {
            if self
                .products
                .adjust_stock(&item.product, -item.quantity)
                .await?
                .is_none()
            {
                return Err(AppError::insufficient_stock(
                    &item.product_name,
                    0,
                    item.quantity,
                ));
            }
        }

        self.returns.delete_with_items(&ret_id).await?;
        tracing::info!(sale_return = %ret_id, items = items.len(), "Sale return deleted");
        Ok(())
    }

    /// Bulk delete: every id must exist before anything is touched
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::validation("ids must not be empty"));
        }

        let mut parsed = Vec::with_capacity(ids.len());
        for raw in ids {
            let record: RecordId = raw.parse().map_err(|_| return_not_found(raw))?;
            parsed.push(record);
        }

        let existing = self.returns.existing_ids(&parsed).await?;
        let existing_set: std::collections::HashSet<String> =
            existing.iter().map(|r| r.to_string()).collect();
        if let Some(missing) = ids.iter().find(|raw| !existing_set.contains(*raw)) {
            return Err(return_not_found(missing));
        }

        for record in &parsed {
            let items = self.returns.items_for(record).await?;
            self.check_stock_for_removal(&items).await?;
        }

        for record in &parsed {
            let items = self.returns.items_for(record).await?;
            for item in &items {
                self.products
                    .adjust_stock(&item.product, -item.quantity)
                    .await?;
            }
        }

        self.returns.delete_many(&parsed).await?;
        tracing::info!(count = parsed.len(), "Sale returns bulk-deleted");
        Ok(())
    }

    // ==================== helpers ====================

    /// Original sale lines keyed by product id. Purchased quantities are
    /// accumulated across lines of the same product; the first line wins
    /// for the unit-price fallback.
    async fn sale_lines_by_product(
        &self,
        sale: &RecordId,
    ) -> AppResult<HashMap<String, (SaleItem, i64)>> {
        let items = self.sales.items_for(sale).await?;
        let mut map: HashMap<String, (SaleItem, i64)> = HashMap::new();
        for item in items {
            let key = item.product.to_string();
            match map.get_mut(&key) {
                Some((_, purchased)) => *purchased += item.quantity,
                None => {
                    let quantity = item.quantity;
                    map.insert(key, (item, quantity));
                }
            }
        }
        Ok(map)
    }

    /// Collapse payload lines per product and resolve each product.
    /// The unit price falls back to the original sale line's price.
    async fn resolve_return_lines(
        &self,
        items: &[ReturnLineInput],
        sale_lines: &HashMap<String, (SaleItem, i64)>,
    ) -> AppResult<Vec<ResolvedReturnLine>> {
        let mut lines: Vec<ResolvedReturnLine> = Vec::new();
        for item in items {
            let product = match self.products.find_by_id(&item.product_id).await {
                Ok(Some(product)) => product,
                Ok(None) | Err(RepoError::NotFound(_)) => {
                    return Err(AppError::with_message(
                        ErrorCode::ProductNotFound,
                        format!("Product {} not found", item.product_id),
                    ));
                }
                Err(e) => return Err(e.into()),
            };
            let product_ref = required_id(product.id.clone(), "product")?;
            let key = product_ref.to_string();

            if let Some(existing) = lines.iter_mut().find(|l| l.product_ref == product_ref) {
                existing.quantity += item.quantity;
                continue;
            }

            let unit_price = match item.unit_price {
                Some(price) => price,
                None => sale_lines
                    .get(&key)
                    .map(|(line, _)| line.unit_price)
                    .unwrap_or(product.unit_price),
            };
            lines.push(ResolvedReturnLine {
                product,
                product_ref,
                quantity: item.quantity,
                unit_price,
            });
        }
        Ok(lines)
    }

    /// Product lookup for a delta-map key: prefer the resolved lines,
    /// fall back to the store for products only present in the old set.
    async fn product_for_delta(
        &self,
        pid: &str,
        lines: &[ResolvedReturnLine],
    ) -> AppResult<Product> {
        if let Some(line) = lines.iter().find(|l| l.product_ref.to_string() == pid) {
            return Ok(line.product.clone());
        }
        match self.products.find_by_id(pid).await {
            Ok(Some(product)) => Ok(product),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(AppError::with_message(
                ErrorCode::ProductNotFound,
                format!("Product {} not found", pid),
            )),
            Err(e) => Err(e.into()),
        }
    }

    /// A deleted return takes its goods back out of stock; refuse the
    /// whole operation when any counter would go negative.
    async fn check_stock_for_removal(
        &self,
        items: &[crate::db::models::SaleReturnItem],
    ) -> AppResult<()> {
        for item in items {
            let product = self
                .products
                .find_by_id(&item.product.to_string())
                .await?
                .ok_or_else(|| {
                    AppError::with_message(
                        ErrorCode::ProductNotFound,
                        format!("Product {} not found", item.product),
                    )
                })?;
            if product.stock < item.quantity {
                return Err(AppError::insufficient_stock(
                    &product.name,
                    product.stock,
                    item.quantity,
                ));
            }
        }
        Ok(())
    }

    // ==================== reference resolution ====================

    async fn resolve_return(&self, id: &str) -> AppResult<SaleReturn> {
        match self.returns.find_by_id(id).await {
            Ok(Some(ret)) => Ok(ret),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(return_not_found(id)),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_sale(&self, id: &str) -> AppResult<Sale> {
        match self.sales.find_by_id(id).await {
            Ok(Some(sale)) => Ok(sale),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(AppError::with_message(
                ErrorCode::SaleNotFound,
                format!("Sale {} not found", id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_customer(&self, id: &str) -> AppResult<Customer> {
        match self.customers.find_by_id(id).await {
            Ok(Some(customer)) => Ok(customer),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(AppError::with_message(
                ErrorCode::CustomerNotFound,
                format!("Customer {} not found", id),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn resolve_employee(&self, id: &str) -> AppResult<Employee> {
        match self.employees.find_by_id(id).await {
            Ok(Some(employee)) => Ok(employee),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(AppError::with_message(
                ErrorCode::EmployeeNotFound,
                format!("Employee {} not found", id),
            )),
            Err(e) => Err(e.into()),
        }
    }
}

/// Shape checks that need no database access
fn validate_return_lines(items: &[ReturnLineInput]) -> AppResult<()> {
    for (idx, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "items[{idx}].quantity must be positive, got {}",
                item.quantity
            )));
        }
        if let Some(price) = item.unit_price {
            validate_amount(price, "unit_price")?;
        }
    }
    Ok(())
}

/// Every returned product must appear in the original sale, and the
/// cumulative quantity per product may not exceed what was purchased.
fn check_against_sale(
    lines: &[ResolvedReturnLine],
    sale_lines: &HashMap<String, (SaleItem, i64)>,
) -> AppResult<()> {
    for line in lines {
        let key = line.product_ref.to_string();
        let Some((_, purchased)) = sale_lines.get(&key) else {
            return Err(AppError::with_message(
                ErrorCode::ReturnProductNotInSale,
                format!(
                    "Product '{}' was not part of the original sale",
                    line.product.name
                ),
            )
            .with_detail("product", line.product.name.clone()));
        };
        if line.quantity > *purchased {
            return Err(AppError::with_message(
                ErrorCode::ReturnQuantityExceedsPurchase,
                format!(
                    "Cannot return {} of '{}': only {} purchased",
                    line.quantity, line.product.name, purchased
                ),
            )
            .with_detail("product", line.product.name.clone())
            .with_detail("purchased", *purchased)
            .with_detail("requested", line.quantity));
        }
    }
    Ok(())
}

fn return_not_found(id: &str) -> AppError {
    AppError::with_message(
        ErrorCode::ReturnNotFound,
        format!("Sale return {} not found", id),
    )
}
