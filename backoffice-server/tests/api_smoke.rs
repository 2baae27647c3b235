//! HTTP surface smoke test: routing, JSON shapes, status codes and the
//! error envelope, driven through the router without a socket.

use axum::Router;
use axum::body::Body;
use backoffice_server::{Config, ServerState};
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

use backoffice_server::db::models::{CustomerCreate, EmployeeCreate, ProductCreate, RoleCreate};
use backoffice_server::db::repository::{
    CustomerRepository, EmployeeRepository, ProductRepository, RoleRepository,
};

struct TestApp {
    router: Router,
    customer_id: String,
    employee_id: String,
    product_id: String,
}

async fn spawn_app() -> TestApp {
    let config = Config::with_overrides("unused", 0);
    let state = ServerState::in_memory(config).await;
    let db = state.get_db();

    let role = RoleRepository::new(db.clone())
        .create(RoleCreate {
            name: "clerk".into(),
            description: None,
            permissions: vec![],
        })
        .await
        .expect("role");
    let employee = EmployeeRepository::new(db.clone())
        .create(EmployeeCreate {
            username: "alice".into(),
            password: "correct-horse".into(),
            display_name: None,
            role: role.id.clone().expect("role id"),
        })
        .await
        .expect("employee");
    let customer = CustomerRepository::new(db.clone())
        .create(CustomerCreate {
            name: "Bob".into(),
            phone: None,
            email: None,
            address: None,
        })
        .await
        .expect("customer");
    let product = ProductRepository::new(db.clone())
        .create(ProductCreate {
            name: "Ballpoint Pen".into(),
            sku: "PEN-01".into(),
            description: None,
            unit_price: 1.5,
            stock: Some(10),
        })
        .await
        .expect("product");

    let router = backoffice_server::api::build_app(&state).with_state(state);

    TestApp {
        router,
        customer_id: customer.id.expect("customer id").to_string(),
        employee_id: employee.id.expect("employee id").to_string(),
        product_id: product.id.expect("product id").to_string(),
    }
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn health_endpoint_reports_ok() {
    let app = spawn_app().await;

    let response = app
        .router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn sale_endpoints_round_trip() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "customer_id": app.customer_id,
        "employee_id": app.employee_id,
        "total_amount": 4.5,
        "tax_amount": 0.0,
        "discount_amount": 0.0,
        "final_amount": 4.5,
        "items": [
            { "product_id": app.product_id, "quantity": 3, "unit_price": 1.5 }
        ]
    });

    // Create
    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/sales")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let sale = body_json(response).await;
    let sale_id = sale["id"].as_str().expect("sale id").to_string();
    assert_eq!(sale["items"].as_array().unwrap().len(), 1);
    assert_eq!(sale["items"][0]["subtotal"], 4.5);

    // Read back
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get(format!("/api/sales/{sale_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Stock was decremented
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get(format!("/api/products/{}", app.product_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let product = body_json(response).await;
    assert_eq!(product["stock"], 7);

    // Delete restores and returns 204
    let response = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/sales/{sale_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Gone: 404 with the error envelope
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get(format!("/api/sales/{sale_id}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["code"], 4001);
}

#[tokio::test]
async fn insufficient_stock_maps_to_bad_request() {
    let app = spawn_app().await;

    let payload = serde_json::json!({
        "customer_id": app.customer_id,
        "employee_id": app.employee_id,
        "total_amount": 16.5,
        "tax_amount": 0.0,
        "discount_amount": 0.0,
        "final_amount": 16.5,
        "items": [
            { "product_id": app.product_id, "quantity": 11, "unit_price": 1.5 }
        ]
    });

    let response = app
        .router
        .oneshot(
            Request::post("/api/sales")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], 6003);
    assert!(body["message"].as_str().unwrap().contains("Ballpoint Pen"));
}
