//! Audit log type definitions
//!
//! Core data structures for the tamper-evident audit trail. Entries are
//! immutable and never deleted; integrity comes from a SHA-256 hash chain.

use serde::{Deserialize, Serialize};

/// Audit action type (enum, not free text)
///
/// Grouped by domain so every sensitive operation has an explicit tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    // ═══ System lifecycle ═══
    /// Normal system startup
    SystemStartup,
    /// Normal system shutdown
    SystemShutdown,

    // ═══ Sales (financially critical) ═══
    /// Sale created
    SaleCreated,
    /// Sale updated (items replaced, stock reconciled)
    SaleUpdated,
    /// Sale deleted (stock restored)
    SaleDeleted,
    /// Sale return created (stock returned)
    ReturnCreated,
    /// Sale return updated
    ReturnUpdated,
    /// Sale return deleted (stock taken back out)
    ReturnDeleted,
    /// Payment recorded against a sale
    PaymentRecorded,
    /// Payment removed
    PaymentDeleted,

    // ═══ Inventory ═══
    /// Manual stock correction
    StockAdjusted,
    /// Product price changed
    ProductPriceChanged,
    /// Product created
    ProductCreated,
    /// Product deactivated
    ProductDeleted,

    // ═══ Administration ═══
    /// Employee created
    EmployeeCreated,
    /// Employee updated
    EmployeeUpdated,
    /// Employee deactivated
    EmployeeDeleted,
    /// Role created
    RoleCreated,
    /// Role updated
    RoleUpdated,
    /// Role deleted
    RoleDeleted,

    // ═══ Workforce ═══
    /// Employee clocked in
    ClockedIn,
    /// Employee clocked out
    ClockedOut,
    /// Schedule created or changed
    ScheduleChanged,
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Audit log entry (immutable)
///
/// Each record carries a SHA-256 hash chain:
/// - `prev_hash`: hash of the previous record
/// - `curr_hash`: hash of this record (covers prev_hash + all fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Globally increasing sequence number
    pub id: u64,
    /// Timestamp (Unix millis)
    pub timestamp: i64,
    /// Action type
    pub action: AuditAction,
    /// Resource type ("sale", "product", "employee", "system", ...)
    pub resource_type: String,
    /// Resource id ("sale:xxx", "employee:yyy", ...)
    pub resource_id: String,
    /// Operator id (None for system events)
    pub operator_id: Option<String>,
    /// Operator display name
    pub operator_name: Option<String>,
    /// Structured details (JSON)
    pub details: serde_json::Value,
    /// Hash of the previous entry
    pub prev_hash: String,
    /// Hash of this entry (SHA-256)
    pub curr_hash: String,
}

/// Audit log query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuditQuery {
    /// Filter by action type (snake_case name)
    pub action: Option<String>,
    /// Filter by resource type
    pub resource_type: Option<String>,
    /// Filter by resource id
    pub resource_id: Option<String>,
    /// Filter by operator id
    pub operator_id: Option<String>,
    /// Entries at or after this timestamp (millis)
    pub from: Option<i64>,
    /// Entries strictly before this timestamp (millis)
    pub to: Option<i64>,
    /// Page size (default 50)
    pub limit: Option<i64>,
    /// Page offset
    pub offset: Option<i64>,
}

/// Paged audit log response
#[derive(Debug, Clone, Serialize)]
pub struct AuditListResponse {
    pub entries: Vec<AuditEntry>,
    pub total: u64,
}

/// Result of a whole-chain verification pass
#[derive(Debug, Clone, Serialize)]
pub struct AuditChainVerification {
    pub valid: bool,
    pub entries_checked: u64,
    /// Sequence number of the first broken entry, if any
    pub broken_at: Option<u64>,
}
