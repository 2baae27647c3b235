//! Shared test fixtures: in-memory database seeded with a role, an
//! employee, a customer and helper constructors for sale payloads.

use backoffice_server::db::DbService;
use backoffice_server::db::models::{
    Customer, CustomerCreate, EmployeeCreate, EmployeeResponse, Product, ProductCreate,
    RoleCreate, SaleCreate, SaleLineInput,
};
use backoffice_server::db::repository::{
    CustomerRepository, EmployeeRepository, ProductRepository, RoleRepository,
};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

pub struct TestContext {
    pub db: Surreal<Db>,
    pub customer: Customer,
    pub employee: EmployeeResponse,
}

pub async fn setup() -> TestContext {
    let db = DbService::memory().await.expect("in-memory db").db;

    let roles = RoleRepository::new(db.clone());
    let role = roles
        .create(RoleCreate {
            name: "clerk".into(),
            description: None,
            permissions: vec!["sales.write".into()],
        })
        .await
        .expect("seed role");

    let employees = EmployeeRepository::new(db.clone());
    let employee = employees
        .create(EmployeeCreate {
            username: "alice".into(),
            password: "correct-horse".into(),
            display_name: Some("Alice".into()),
            role: role.id.clone().expect("role id"),
        })
        .await
        .expect("seed employee");

    let customers = CustomerRepository::new(db.clone());
    let customer = customers
        .create(CustomerCreate {
            name: "Bob".into(),
            phone: None,
            email: None,
            address: None,
        })
        .await
        .expect("seed customer");

    TestContext {
        db,
        customer,
        employee,
    }
}

pub async fn seed_product(
    db: &Surreal<Db>,
    name: &str,
    sku: &str,
    unit_price: f64,
    stock: i64,
) -> Product {
    ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: name.into(),
            sku: sku.into(),
            description: None,
            unit_price,
            stock: Some(stock),
        })
        .await
        .expect("seed product")
}

/// "table:id" string of a persisted record
pub fn rid<T: ToString>(id: &Option<T>) -> String {
    id.as_ref().expect("record id").to_string()
}

pub async fn stock_of(db: &Surreal<Db>, product: &Product) -> i64 {
    ProductRepository::new(db.clone())
        .find_by_id(&rid(&product.id))
        .await
        .expect("stock query")
        .expect("product exists")
        .stock
}

pub fn line(product: &Product, quantity: i64, unit_price: f64) -> SaleLineInput {
    SaleLineInput {
        product_id: rid(&product.id),
        quantity,
        unit_price,
        subtotal: None,
    }
}

pub fn sale_payload(ctx: &TestContext, items: Vec<SaleLineInput>) -> SaleCreate {
    let total: f64 = items
        .iter()
        .map(|i| i.unit_price * i.quantity as f64)
        .sum();
    SaleCreate {
        customer_id: rid(&ctx.customer.id),
        employee_id: rid(&ctx.employee.id),
        total_amount: total,
        tax_amount: 0.0,
        discount_amount: 0.0,
        final_amount: total,
        items,
    }
}
