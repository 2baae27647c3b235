//! Audit log module — tamper-evident audit trail
//!
//! # Architecture
//!
//! ```text
//! sensitive operation
//!   ├─ AuditService::log() → mpsc → AuditWorker → audit_log table
//!   └─ AuditService::log_sync() → audit_log table (startup/shutdown)
//!
//! SHA-256 hash chain: genesis → entry₁ → entry₂ → ... → entryₙ
//! ```
//!
//! # Tamper evidence
//!
//! - **SHA-256 hash chain**: every record carries its predecessor's hash
//! - **Append-only**: no delete/update interface
//! - **Chain verification API**: integrity can be checked at any time

pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::{AuditLogRequest, AuditService};
pub use storage::{AuditStorage, AuditStorageError};
pub use types::{
    AuditAction, AuditChainVerification, AuditEntry, AuditListResponse, AuditQuery,
};
pub use worker::AuditWorker;
