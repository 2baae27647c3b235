//! Audit log service
//!
//! `AuditService` is the front door for audit logging:
//! - writes go through an mpsc channel to the background worker
//! - queries and chain verification read storage directly
//!
//! A full channel drops the entry with an error log rather than
//! blocking a request handler on audit I/O.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio::sync::mpsc;

use super::storage::AuditStorage;
use super::types::{AuditAction, AuditChainVerification, AuditEntry, AuditQuery};
use shared::error::AppResult;

/// One log request sent to the worker
#[derive(Debug)]
pub struct AuditLogRequest {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub operator_id: Option<String>,
    pub operator_name: Option<String>,
    pub details: serde_json::Value,
}

/// Audit log service
pub struct AuditService {
    storage: AuditStorage,
    tx: mpsc::Sender<AuditLogRequest>,
}

impl std::fmt::Debug for AuditService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditService").finish_non_exhaustive()
    }
}

impl AuditService {
    /// Create the service plus the receiver half for the worker
    pub fn new(
        db: Surreal<Db>,
        buffer_size: usize,
    ) -> (Arc<Self>, mpsc::Receiver<AuditLogRequest>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        let storage = AuditStorage::new(db);
        let service = Arc::new(Self { storage, tx });
        (service, rx)
    }

    /// Storage handle for the worker
    pub fn storage(&self) -> AuditStorage {
        self.storage.clone()
    }

    /// Enqueue one audit entry (non-blocking, lossy when the buffer is full)
    pub fn log(&self, req: AuditLogRequest) {
        if let Err(e) = self.tx.try_send(req) {
            tracing::error!("Audit log buffer full, entry dropped: {}", e);
        }
    }

    /// Write one entry synchronously (startup/shutdown paths)
    pub async fn log_sync(
        &self,
        action: AuditAction,
        resource_type: &str,
        resource_id: &str,
        details: serde_json::Value,
    ) {
        if let Err(e) = self
            .storage
            .append(
                action,
                resource_type.to_string(),
                resource_id.to_string(),
                None,
                None,
                details,
            )
            .await
        {
            tracing::error!("Failed to write audit entry: {:?}", e);
        }
    }

    /// Query entries with filters and paging
    pub async fn query(&self, q: &AuditQuery) -> AppResult<(Vec<AuditEntry>, u64)> {
        Ok(self.storage.query(q).await?)
    }

    /// Verify the whole hash chain
    pub async fn verify_chain(&self) -> AppResult<AuditChainVerification> {
        Ok(self.storage.verify_chain().await?)
    }
}
