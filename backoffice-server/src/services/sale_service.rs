//! Sale workflow service
//!
//! Orchestrates create/update/delete of sale aggregates while keeping
//! `product.stock` consistent. The whole item batch is validated before
//! any stock mutation: a sale that cannot be satisfied fails without
//! touching a single counter. Updates collapse the old and new item
//! lists into a net per-product delta map, so shuffling quantities
//! between lines of the same product never produces a transient
//! negative-stock window.

use std::collections::HashMap;

use shared::error::{AppError, AppResult, ErrorCode};
use surrealdb::RecordId;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{Customer, Employee, Product, SaleCreate, SaleDetail, SaleLineInput, SaleUpdate};
use crate::db::repository::{
    CustomerRepository, EmployeeRepository, ProductRepository, RepoError, SaleRepository,
};
use crate::services::{money, required_id, stock};
use crate::utils::validation::validate_amount;

/// A payload line with its product resolved
struct ResolvedLine {
    product: Product,
    product_ref: RecordId,
    quantity: i64,
    unit_price: f64,
}

pub struct SaleService {
    sales: SaleRepository,
    products: ProductRepository,
    customers: CustomerRepository,
    employees: EmployeeRepository,
}

impl SaleService {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            sales: SaleRepository::new(db.clone()),
            products: ProductRepository::new(db.clone()),
            customers: CustomerRepository::new(db.clone()),
            employees: EmployeeRepository::new(db),
        }
    }

    /// List sale headers
    pub async fn list(&self, limit: i64, offset: i64) -> AppResult<Vec<crate::db::models::Sale>> {
        Ok(self.sales.find_all(limit, offset).await?)
    }

    /// Full representation of one sale
    pub async fn get(&self, id: &str) -> AppResult<SaleDetail> {
        let sale = self.resolve_sale(id).await?;
        let sale_id = required_id(sale.id, "sale")?;
        self.sales
            .detail(&sale_id)
            .await?
            .ok_or_else(|| sale_not_found(id))
    }

    /// Create a sale: resolve references, validate the whole batch,
    /// then persist the header, decrement stock and insert items in
    /// input order.
    pub async fn create(&self, data: SaleCreate) -> AppResult<SaleDetail> {
        validate_amount(data.total_amount, "total_amount")?;
        validate_amount(data.tax_amount, "tax_amount")?;
        validate_amount(data.discount_amount, "discount_amount")?;
        validate_amount(data.final_amount, "final_amount")?;
        validate_lines(&data.items)?;

        let customer = self.resolve_customer(&data.customer_id).await?;
        let employee = self.resolve_employee(&data.employee_id).await?;
        let lines = self.resolve_lines(&data.items).await?;

        // New sales only reference products still on the catalog
        for line in &lines {
            if !line.product.is_active {
                return Err(AppError::with_message(
                    ErrorCode::ProductInactive,
                    format!("Product '{}' is inactive", line.product.name),
                ));
            }
        }

        check_batch_stock(&lines)?;

        let customer_ref = required_id(customer.id, "customer")?;
        let employee_ref = required_id(employee.id, "employee")?;

        let sale = self
            .sales
            .create_header(
                &customer_ref,
                &employee_ref,
                data.total_amount,
                data.tax_amount,
                data.discount_amount,
                data.final_amount,
            )
            .await?;
        let sale_id = required_id(sale.id, "sale")?;

        for (idx, line) in lines.iter().enumerate() {
            self.take_stock(&line.product_ref, line.quantity, &line.product.name)
                .await?;
            let subtotal = money::line_subtotal(line.quantity, line.unit_price);
            self.sales
                .insert_item(
                    &sale_id,
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

        tracing::info!(sale = %sale_id, items = lines.len(), "Sale created");

        self.sales
            .detail(&sale_id)
            .await?
            .ok_or_else(|| AppError::internal("Sale disappeared after create"))
    }

    /// Update a sale: scalar fields are merged, the item list replaces
    /// the previous one in full, and stock moves by the net per-product
    /// difference between the two allocations.
    pub async fn update(&self, id: &str, data: SaleUpdate) -> AppResult<SaleDetail> {
        let sale = self.resolve_sale(id).await?;
        let sale_id = required_id(sale.id.clone(), "sale")?;
        let original_items = self.sales.items_for(&sale_id).await?;

        validate_lines(&data.items)?;
        for (value, field) in [
            (data.total_amount, "total_amount"),
            (data.tax_amount, "tax_amount"),
            (data.discount_amount, "discount_amount"),
            (data.final_amount, "final_amount"),
        ] {
            if let Some(v) = value {
                validate_amount(v, field)?;
            }
        }

        let customer_ref = match &data.customer_id {
            Some(cid) => required_id(self.resolve_customer(cid).await?.id, "customer")?,
            None => sale.customer.clone(),
        };
        // Re-resolve the employee only when it actually changes
        let employee_ref = match &data.employee_id {
            Some(eid) if *eid != sale.employee.to_string() => {
                required_id(self.resolve_employee(eid).await?.id, "employee")?
            }
            _ => sale.employee.clone(),
        };

        let lines = self.resolve_lines(&data.items).await?;

        let old_alloc = stock::allocation_map(
            original_items
                .iter()
                .map(|i| (i.product.to_string(), i.quantity)),
        );
        let new_alloc = stock::allocation_map(
            lines
                .iter()
                .map(|l| (l.product_ref.to_string(), l.quantity)),
        );
        let deltas = stock::net_deltas(&old_alloc, &new_alloc);

        // Every product demanding more stock is checked before anything moves
        let products_by_id: HashMap<String, &Product> = lines
            .iter()
            .map(|l| (l.product_ref.to_string(), &l.product))
            .collect();
        for (pid, delta) in &deltas {
            if *delta > 0 {
                let product = products_by_id
                    .get(pid)
                    .ok_or_else(|| AppError::internal("delta for unresolved product"))?;
                if product.stock < *delta {
                    return Err(AppError::insufficient_stock(
                        &product.name,
                        product.stock,
                        *delta,
                    ));
                }
            }
        }

        self.sales
            .update_header(
                &sale_id,
                &customer_ref,
                &employee_ref,
                data.total_amount.unwrap_or(sale.total_amount),
                data.tax_amount.unwrap_or(sale.tax_amount),
                data.discount_amount.unwrap_or(sale.discount_amount),
                data.final_amount.unwrap_or(sale.final_amount),
            )
            .await?;

        // Single signed adjustment per product
        let item_names: HashMap<String, String> = original_items
            .iter()
            .map(|i| (i.product.to_string(), i.product_name.clone()))
            .collect();
        for (pid, delta) in &deltas {
            let record: RecordId = pid
                .parse()
                .map_err(|_| AppError::internal(format!("bad product id in delta map: {pid}")))?;
            let name = products_by_id
                .get(pid)
                .map(|p| p.name.clone())
                .or_else(|| item_names.get(pid).cloned())
                .unwrap_or_else(|| pid.clone());
            self.take_stock(&record, *delta, &name).await?;
        }

        self.sales.delete_items(&sale_id).await?;
        for (idx, line) in lines.iter().enumerate() {
            let subtotal = money::line_subtotal(line.quantity, line.unit_price);
            self.sales
                .insert_item(
                    &sale_id,
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

        tracing::info!(sale = %sale_id, "Sale updated");

        self.sales
            .detail(&sale_id)
            .await?
            .ok_or_else(|| sale_not_found(id))
    }

    /// Delete a sale, restoring stock for every item
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let sale = self.resolve_sale(id).await?;
        let sale_id = required_id(sale.id, "sale")?;
        let items = self.sales.items_for(&sale_id).await?;

        for item in &items {
            // Restoration can never fail the non-negative guard
            self.products.adjust_stock(&item.product, item.quantity).await?;
        }

        self.sales.delete_with_items(&sale_id).await?;
        tracing::info!(sale = %sale_id, items = items.len(), "Sale deleted, stock restored");
        Ok(())
    }

    /// Bulk delete: every id must exist before anything is touched
    pub async fn delete_many(&self, ids: &[String]) -> AppResult<()> {
        if ids.is_empty() {
            return Err(AppError::validation("ids must not be empty"));
        }

        let mut parsed = Vec::with_capacity(ids.len());
        for raw in ids {
            let record: RecordId = raw.parse().map_err(|_| sale_not_found(raw))?;
            parsed.push(record);
        }

        let existing = self.sales.existing_ids(&parsed).await?;
        let existing_set: std::collections::HashSet<String> =
            existing.iter().map(|r| r.to_string()).collect();
        if let Some(missing) = ids.iter().find(|raw| !existing_set.contains(*raw)) {
            return Err(sale_not_found(missing));
        }

        for record in &parsed {
            let items = self.sales.items_for(record).await?;
            for item in &items {
                self.products.adjust_stock(&item.product, item.quantity).await?;
            }
        }

        self.sales.delete_many(&parsed).await?;
        tracing::info!(count = parsed.len(), "Sales bulk-deleted, stock restored");
        Ok(())
    }

    // ==================== reference resolution ====================

    async fn resolve_sale(&self, id: &str) -> AppResult<crate::db::models::Sale> {
        match self.sales.find_by_id(id).await {
            Ok(Some(sale)) => Ok(sale),
            Ok(None) | Err(RepoError::NotFound(_)) => Err(sale_not_found(id)),
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

    /// Resolve every line's product, preserving input order
    async fn resolve_lines(&self, items: &[SaleLineInput]) -> AppResult<Vec<ResolvedLine>> {
        let mut lines = Vec::with_capacity(items.len());
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
            lines.push(ResolvedLine {
                product,
                product_ref,
                quantity: item.quantity,
                unit_price: item.unit_price,
            });
        }
        Ok(lines)
    }

    /// Apply one signed stock adjustment; a refused decrement surfaces
    /// as InsufficientStock with the current counter.
    async fn take_stock(&self, product: &RecordId, delta: i64, name: &str) -> AppResult<()> {
        match self.products.adjust_stock(product, -delta).await? {
            Some(_) => Ok(()),
            None => {
                let available = self
                    .products
                    .find_by_id(&product.to_string())
                    .await?
                    .map(|p| p.stock)
                    .unwrap_or(0);
                Err(AppError::insufficient_stock(name, available, delta))
            }
        }
    }
}

/// Shape checks that need no database access
fn validate_lines(items: &[SaleLineInput]) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::SaleEmpty));
    }
    for (idx, item) in items.iter().enumerate() {
        if item.quantity <= 0 {
            return Err(AppError::validation(format!(
                "items[{idx}].quantity must be positive, got {}",
                item.quantity
            )));
        }
        validate_amount(item.unit_price, "unit_price")?;
        if let Some(subtotal) = item.subtotal {
            validate_amount(subtotal, "subtotal")?;
        }
    }
    Ok(())
}

/// Whole-batch stock sufficiency, accumulated per product
fn check_batch_stock(lines: &[ResolvedLine]) -> AppResult<()> {
    let requested = stock::allocation_map(
        lines
            .iter()
            .map(|l| (l.product_ref.to_string(), l.quantity)),
    );
    for (pid, qty) in &requested {
        let Some(product) = lines
            .iter()
            .find(|l| l.product_ref.to_string() == *pid)
            .map(|l| &l.product)
        else {
            continue;
        };
        if product.stock < *qty {
            return Err(AppError::insufficient_stock(
                &product.name,
                product.stock,
                *qty,
            ));
        }
    }
    Ok(())
}

fn sale_not_found(id: &str) -> AppError {
    AppError::with_message(ErrorCode::SaleNotFound, format!("Sale {} not found", id))
}
