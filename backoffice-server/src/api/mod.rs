//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`products`] - 商品和库存管理接口
//! - [`customers`] - 客户管理接口
//! - [`employees`] - 员工管理接口
//! - [`roles`] - 角色管理接口
//! - [`attendance`] - 考勤接口
//! - [`schedules`] - 排班接口
//! - [`sales`] - 销售单接口
//! - [`sale_returns`] - 退货单接口
//! - [`payments`] - 收款接口
//! - [`audit_logs`] - 审计日志查询接口

pub mod attendance;
pub mod audit_logs;
pub mod customers;
pub mod employees;
pub mod health;
pub mod payments;
pub mod products;
pub mod roles;
pub mod sale_returns;
pub mod sales;
pub mod schedules;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::ServerState;

// Re-export common types for handlers
pub use crate::utils::{AppResult, ApiResponse};

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<ServerState> {
    Router::new()
        .merge(health::router())
        .merge(products::router())
        .merge(customers::router())
        .merge(employees::router())
        .merge(roles::router())
        .merge(attendance::router())
        .merge(schedules::router())
        .merge(sales::router())
        .merge(sale_returns::router())
        .merge(payments::router())
        .merge(audit_logs::router())
}

/// Build a fully configured application with all middleware
pub fn build_app(_state: &ServerState) -> Router<ServerState> {
    build_router()
        // ========== Tower HTTP Middleware ==========
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
}
