//! Repository Module
//!
//! CRUD operations over the SurrealDB tables. All catalog and order
//! queries are owner-scoped: the caller passes the authenticated user's
//! id and never sees another user's records.

pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use order::OrderRepository;
pub use product::ProductRepository;
pub use session::SessionRepository;
pub use user::UserRepository;

use crate::utils::AppError;
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

    #[error("Insufficient stock: {0}")]
    InsufficientStock(String),

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
            RepoError::NotFound(msg) => AppError::not_found(msg),
            RepoError::Duplicate(msg) => AppError::conflict(msg),
            RepoError::InsufficientStock(msg) => AppError::conflict(msg),
            RepoError::Validation(msg) => AppError::validation(msg),
            RepoError::Database(msg) => AppError::database(msg),
        }
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

// =============================================================================
// ID Convention: "table:id" everywhere
// =============================================================================
//
// surrealdb::RecordId handles all IDs:
//   - parse:  let id: RecordId = "product:abc".parse()?;
//   - build:  let id = RecordId::from_table_key("product", "abc");
//   - table:  id.table()
//   - key:    id.key().to_string()
//   - CRUD:   db.select(id) / db.delete(id) take RecordId directly

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

/// Parse a "table:id" string, rejecting IDs that point at another table.
pub(crate) fn parse_record_id(id: &str, table: &str) -> RepoResult<surrealdb::RecordId> {
    let thing: surrealdb::RecordId = id
        .parse()
        .map_err(|_| RepoError::Validation(format!("Invalid ID: {id}")))?;
    if thing.table() != table {
        return Err(RepoError::Validation(format!("Invalid {table} ID: {id}")));
    }
    Ok(thing)
}
