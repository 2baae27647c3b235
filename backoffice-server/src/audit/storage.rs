//! Audit log storage layer
//!
//! Append-only by construction: no update or delete interface exists.
//! A SHA-256 hash chain links every entry to its predecessor, so any
//! edit to a stored record breaks verification from that point on.

use std::sync::Arc;

use sha2::{Digest, Sha256};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

use super::types::{AuditAction, AuditChainVerification, AuditEntry, AuditQuery};

/// Storage error
#[derive(Debug, Error)]
pub enum AuditStorageError {
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<surrealdb::Error> for AuditStorageError {
    fn from(err: surrealdb::Error) -> Self {
        AuditStorageError::Database(err.to_string())
    }
}

pub type AuditStorageResult<T> = Result<T, AuditStorageError>;

impl From<AuditStorageError> for shared::error::AppError {
    fn from(err: AuditStorageError) -> Self {
        shared::error::AppError::internal(err.to_string())
    }
}

/// Read shape (includes the SurrealDB record id)
#[derive(Debug, Clone, serde::Deserialize)]
struct AuditRecord {
    #[allow(dead_code)]
    id: surrealdb::RecordId,
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    resource_type: String,
    resource_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

impl From<AuditRecord> for AuditEntry {
    fn from(r: AuditRecord) -> Self {
        AuditEntry {
            id: r.sequence,
            timestamp: r.timestamp,
            action: r.action,
            resource_type: r.resource_type,
            resource_id: r.resource_id,
            operator_id: r.operator_id,
            operator_name: r.operator_name,
            details: r.details,
            prev_hash: r.prev_hash,
            curr_hash: r.curr_hash,
        }
    }
}

/// Sequence + hash of the newest record
#[derive(Debug, serde::Deserialize)]
struct LastEntry {
    sequence: u64,
    curr_hash: String,
}

/// COUNT result
#[derive(Debug, serde::Deserialize)]
struct CountResult {
    total: u64,
}

/// Insert shape (no SurrealDB id)
#[derive(Debug, serde::Serialize)]
struct AuditInsert {
    sequence: u64,
    timestamp: i64,
    action: AuditAction,
    resource_type: String,
    resource_id: String,
    operator_id: Option<String>,
    operator_name: Option<String>,
    details: serde_json::Value,
    prev_hash: String,
    curr_hash: String,
}

/// Audit log storage
///
/// Only `append` and the query methods exist; the table is never
/// updated or pruned.
#[derive(Clone)]
pub struct AuditStorage {
    db: Surreal<Db>,
    /// Serializes appends so the read-modify-write on sequence/hash
    /// cannot interleave
    append_lock: Arc<tokio::sync::Mutex<()>>,
}

impl AuditStorage {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            db,
            append_lock: Arc::new(tokio::sync::Mutex::new(())),
        }
    }

    /// Append one audit entry
    ///
    /// 1. Read the current max sequence and last hash
    /// 2. Compute this entry's hash
    /// 3. Write the entry
    pub async fn append(
        &self,
        action: AuditAction,
        resource_type: String,
        resource_id: String,
        operator_id: Option<String>,
        operator_name: Option<String>,
        details: serde_json::Value,
    ) -> AuditStorageResult<AuditEntry> {
        let _guard = self.append_lock.lock().await;

        // 1. Current max sequence and last hash
        let mut result = self
            .db
            .query("SELECT sequence, curr_hash FROM audit_log ORDER BY sequence DESC LIMIT 1")
            .await?;
        let last: Vec<LastEntry> = result.take(0)?;

        let (sequence, prev_hash) = match last.first() {
            Some(last) => (last.sequence + 1, last.curr_hash.clone()),
            None => (1, "genesis".to_string()),
        };

        // 2. Hash over every stored field
        let timestamp = shared::util::now_millis();
        let curr_hash = compute_audit_hash(
            &prev_hash,
            sequence,
            timestamp,
            &action,
            &resource_type,
            &resource_id,
            operator_id.as_deref(),
            operator_name.as_deref(),
            &details,
        );

        let entry = AuditEntry {
            id: sequence,
            timestamp,
            action,
            resource_type: resource_type.clone(),
            resource_id: resource_id.clone(),
            operator_id: operator_id.clone(),
            operator_name: operator_name.clone(),
            details: details.clone(),
            prev_hash: prev_hash.clone(),
            curr_hash: curr_hash.clone(),
        };

        let insert = AuditInsert {
            sequence,
            timestamp,
            action,
            resource_type,
            resource_id,
            operator_id,
            operator_name,
            details,
            prev_hash,
            curr_hash,
        };

        // 3. Write (bind needs 'static, pass owned)
        let mut res = self
            .db
            .query("CREATE audit_log CONTENT $data")
            .bind(("data", insert))
            .await?;
        let _: Vec<AuditRecord> = res.take(0)?;

        Ok(entry)
    }

    /// Query audit entries with filters and paging
    pub async fn query(&self, q: &AuditQuery) -> AuditStorageResult<(Vec<AuditEntry>, u64)> {
        let mut conditions = Vec::new();

        if q.from.is_some() {
            conditions.push("timestamp >= $from");
        }
        if q.to.is_some() {
            conditions.push("timestamp < $to");
        }
        if q.action.is_some() {
            conditions.push("action = $action");
        }
        if q.operator_id.is_some() {
            conditions.push("operator_id = $operator_id");
        }
        if q.resource_type.is_some() {
            conditions.push("resource_type = $resource_type");
        }
        if q.resource_id.is_some() {
            conditions.push("resource_id = $resource_id");
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", conditions.join(" AND "))
        };

        let limit = q.limit.unwrap_or(50).clamp(1, 500);
        let offset = q.offset.unwrap_or(0).max(0);

        let count_sql = format!(
            "SELECT count() as total FROM audit_log{} GROUP ALL",
            where_clause
        );
        let select_sql = format!(
            "SELECT * FROM audit_log{} ORDER BY sequence DESC LIMIT {} START {}",
            where_clause, limit, offset
        );
        let sql = format!("{}; {}", count_sql, select_sql);

        let mut qb = self.db.query(sql);

        if let Some(from) = q.from {
            qb = qb.bind(("from", from));
        }
        if let Some(to) = q.to {
            qb = qb.bind(("to", to));
        }
        if let Some(ref action) = q.action {
            qb = qb.bind(("action", action.clone()));
        }
        if let Some(ref operator_id) = q.operator_id {
            qb = qb.bind(("operator_id", operator_id.clone()));
        }
        if let Some(ref resource_type) = q.resource_type {
            qb = qb.bind(("resource_type", resource_type.clone()));
        }
        if let Some(ref resource_id) = q.resource_id {
            qb = qb.bind(("resource_id", resource_id.clone()));
        }

        let mut result = qb.await?;

        let count_result: Vec<CountResult> = result.take(0)?;
        let total = count_result.first().map(|c| c.total).unwrap_or(0);

        let records: Vec<AuditRecord> = result.take(1)?;
        let entries = records.into_iter().map(AuditEntry::from).collect();

        Ok((entries, total))
    }

    /// Walk the whole chain in sequence order, recomputing every hash
    pub async fn verify_chain(&self) -> AuditStorageResult<AuditChainVerification> {
        let mut result = self
            .db
            .query("SELECT * FROM audit_log ORDER BY sequence ASC")
            .await?;
        let records: Vec<AuditRecord> = result.take(0)?;

        let mut prev_hash = "genesis".to_string();
        let mut checked: u64 = 0;

        for record in records {
            let expected = compute_audit_hash(
                &prev_hash,
                record.sequence,
                record.timestamp,
                &record.action,
                &record.resource_type,
                &record.resource_id,
                record.operator_id.as_deref(),
                record.operator_name.as_deref(),
                &record.details,
            );
            if record.prev_hash != prev_hash || record.curr_hash != expected {
                return Ok(AuditChainVerification {
                    valid: false,
                    entries_checked: checked,
                    broken_at: Some(record.sequence),
                });
            }
            prev_hash = record.curr_hash;
            checked += 1;
        }

        Ok(AuditChainVerification {
            valid: true,
            entries_checked: checked,
            broken_at: None,
        })
    }
}

/// Normalize a JSON value — restore integers degraded to floats.
///
/// The embedded store keeps all numbers as floats, so `5` reads back as
/// `5.0`. Hash input must be identical on write and re-read, hence
/// `5.0` → `5` whenever there is no fractional part.
///
/// Safe range: f64 has a 52-bit mantissa, only |value| <= 2^53 converts
/// losslessly.
fn normalize_json(value: &serde_json::Value) -> serde_json::Value {
    const MAX_SAFE_INT: f64 = (1_i64 << 53) as f64;

    match value {
        serde_json::Value::Number(n) => {
            if let Some(f) = n.as_f64()
                && f.fract() == 0.0
                && f.abs() <= MAX_SAFE_INT
            {
                return serde_json::Value::Number(serde_json::Number::from(f as i64));
            }
            value.clone()
        }
        serde_json::Value::Object(map) => {
            let normalized: serde_json::Map<String, serde_json::Value> = map
                .iter()
                .map(|(k, v)| (k.clone(), normalize_json(v)))
                .collect();
            serde_json::Value::Object(normalized)
        }
        serde_json::Value::Array(arr) => {
            serde_json::Value::Array(arr.iter().map(normalize_json).collect())
        }
        _ => value.clone(),
    }
}

/// SHA-256 over every stored field.
///
/// - Variable-length fields are separated with `\x00` so ("ab","cd")
///   and ("abc","d") cannot collide
/// - Fixed-width fields (u64/i64) use LE bytes, no separator needed
/// - Optionals are tagged `\x00`=None / `\x01`+bytes=Some, so None and
///   Some("") stay distinct
/// - action hashes via its serde snake_case form (stable across
///   versions), not the Debug representation
/// - details goes through normalize_json first
#[allow(clippy::too_many_arguments)]
fn compute_audit_hash(
    prev_hash: &str,
    id: u64,
    timestamp: i64,
    action: &AuditAction,
    resource_type: &str,
    resource_id: &str,
    operator_id: Option<&str>,
    operator_name: Option<&str>,
    details: &serde_json::Value,
) -> String {
    let mut hasher = Sha256::new();

    hasher.update(prev_hash.as_bytes());
    hasher.update(b"\x00");

    hasher.update(id.to_le_bytes());
    hasher.update(timestamp.to_le_bytes());

    let action_str = serde_json::to_string(action).unwrap_or_default();
    hasher.update(action_str.as_bytes());
    hasher.update(b"\x00");

    hasher.update(resource_type.as_bytes());
    hasher.update(b"\x00");
    hasher.update(resource_id.as_bytes());
    hasher.update(b"\x00");

    hash_optional(&mut hasher, operator_id);
    hash_optional(&mut hasher, operator_name);

    let normalized = normalize_json(details);
    let details_json = serde_json::to_string(&normalized).unwrap_or_default();
    hasher.update(details_json.as_bytes());
    hasher.update(b"\x00");

    hex::encode(hasher.finalize())
}

/// Optional field hashing: `\x00` = None, `\x01` + bytes + `\x00` = Some
fn hash_optional(hasher: &mut Sha256, value: Option<&str>) {
    match value {
        Some(v) => {
            hasher.update(b"\x01");
            hasher.update(v.as_bytes());
        }
        None => {
            hasher.update(b"\x00");
        }
    }
    hasher.update(b"\x00");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hash(details: &serde_json::Value, operator: Option<&str>) -> String {
        compute_audit_hash(
            "genesis",
            1,
            1_700_000_000_000,
            &AuditAction::SaleCreated,
            "sale",
            "sale:abc",
            operator,
            None,
            details,
        )
    }

    #[test]
    fn test_hash_is_deterministic() {
        let details = serde_json::json!({"items": 2});
        assert_eq!(sample_hash(&details, None), sample_hash(&details, None));
    }

    #[test]
    fn test_hash_changes_with_any_field() {
        let details = serde_json::json!({"items": 2});
        let base = sample_hash(&details, None);

        let other_details = serde_json::json!({"items": 3});
        assert_ne!(base, sample_hash(&other_details, None));
        assert_ne!(base, sample_hash(&details, Some("employee:e1")));
    }

    #[test]
    fn test_none_and_empty_string_differ() {
        let details = serde_json::json!({});
        assert_ne!(sample_hash(&details, None), sample_hash(&details, Some("")));
    }

    #[test]
    fn test_normalize_json_restores_integers() {
        let degraded = serde_json::json!({"quantity": 5.0, "nested": {"n": 3.0}, "price": 2.5});
        let normalized = normalize_json(&degraded);
        assert_eq!(normalized["quantity"], serde_json::json!(5));
        assert_eq!(normalized["nested"]["n"], serde_json::json!(3));
        assert_eq!(normalized["price"], serde_json::json!(2.5));
    }
}
