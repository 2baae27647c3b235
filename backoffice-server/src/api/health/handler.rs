//! Health check handlers

use axum::{Json, extract::State};
use serde::Serialize;
use std::time::Instant;

use crate::core::ServerState;

/// Simple health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// ok | error
    status: &'static str,
    version: &'static str,
    environment: String,
}

/// Detailed health check response
#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
}

/// Single check result
#[derive(Serialize)]
pub struct CheckResult {
    /// ok | error
    status: &'static str,
    /// Latency in milliseconds
    latency_ms: u128,
}

pub async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        environment: state.config.environment.clone(),
    })
}

pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let started = Instant::now();
    let db_ok = state.db.query("RETURN 1").await.is_ok();
    let database = CheckResult {
        status: if db_ok { "ok" } else { "error" },
        latency_ms: started.elapsed().as_millis(),
    };

    Json(DetailedHealthResponse {
        status: if db_ok { "ok" } else { "error" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks { database },
    })
}
