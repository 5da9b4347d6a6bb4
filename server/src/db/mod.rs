//! Database Service
//!
//! Embedded SurrealDB over RocksDB. The service owns connection setup and
//! schema definition; repositories borrow the handle for queries.

pub mod models;
pub mod repository;

use crate::utils::{AppError, AppResult};
use std::path::Path;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

const NAMESPACE: &str = "storekeep";
const DATABASE: &str = "main";

/// Table and index definitions, applied on every startup.
///
/// Tables are schemaless; the unique indexes back the duplicate-username
/// guard and refresh-token lookup.
const SCHEMA: &str = "
    DEFINE TABLE IF NOT EXISTS user SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;
    DEFINE TABLE IF NOT EXISTS session SCHEMALESS;
    DEFINE INDEX IF NOT EXISTS session_token ON TABLE session COLUMNS token UNIQUE;
    DEFINE TABLE IF NOT EXISTS product SCHEMALESS;
    DEFINE TABLE IF NOT EXISTS order SCHEMALESS;
";

/// Embedded database service
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database at `path` and apply the schema.
    pub async fn new(path: &Path) -> AppResult<Self> {
        let db = Surreal::new::<RocksDb>(path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        db.query(SCHEMA)
            .await
            .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?
            .check()
            .map_err(|e| AppError::database(format!("Schema definition rejected: {e}")))?;

        tracing::info!(target: "database", "Database ready at {}", path.display());
        Ok(Self { db })
    }
}
