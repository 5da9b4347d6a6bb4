use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::auth::JwtService;
use crate::core::Config;
use crate::utils::AppResult;

/// Server state shared across handlers
///
/// Cloning is shallow: the database handle and JWT service are shared
/// references.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB over RocksDB)
    pub db: Surreal<Db>,
    /// JWT token service
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Initialize state from configuration.
    ///
    /// Ensures the work directory layout exists, opens the database at
    /// `work_dir/database/storekeep.db`, and builds the JWT service from
    /// the configured secret.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| crate::AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_dir().join("storekeep.db");
        let db = crate::db::DbService::new(&db_path).await?.db;

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        Ok(Self::new(config.clone(), db, jwt_service))
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
