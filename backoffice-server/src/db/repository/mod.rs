//! Repository Module
//!
//! CRUD operations over the embedded SurrealDB tables. Repositories stay
//! mechanical; cross-aggregate rules (stock reconciliation, return
//! invariants) live in the workflow services.

// People
pub mod customer;
pub mod employee;
pub mod role;

// Catalog
pub mod product;

// Workforce
pub mod attendance;
pub mod schedule;

// Transactions
pub mod payment;
pub mod sale;
pub mod sale_return;

// Re-exports
pub use attendance::AttendanceRepository;
pub use customer::CustomerRepository;
pub use employee::EmployeeRepository;
pub use payment::PaymentRepository;
pub use product::ProductRepository;
pub use role::RoleRepository;
pub use sale::SaleRepository;
pub use sale_return::SaleReturnRepository;
pub use schedule::ScheduleRepository;

use shared::error::AppError;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => {
                AppError::with_message(shared::ErrorCode::NotFound, msg)
            }
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// ID convention: the whole stack uses the "table:id" string form.
// Parse with `let id: RecordId = "product:abc".parse()?` and pass the
// RecordId straight into queries; a string that does not parse is treated
// as a reference to a record that cannot exist.

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}
