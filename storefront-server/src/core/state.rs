use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::core::Config;
use crate::db::DbService;
use crate::inventory::ReservationManager;
use crate::utils::AppError;

/// Shared application state
///
/// Holds the configuration, the embedded database handle and the
/// reservation manager whose per-product locks must be shared by
/// every handler. Cloning is shallow.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// Embedded database (SurrealDB)
    pub db: Surreal<Db>,
    /// Stock reservation coordinator
    pub reservations: ReservationManager,
}

impl ServerState {
    pub fn new(config: Config, db: Surreal<Db>) -> Self {
        let reservations = ReservationManager::new(db.clone());
        Self {
            config,
            db,
            reservations,
        }
    }

    /// Initialize the state for a real deployment:
    /// working directory layout first, then the on-disk database at
    /// `{work_dir}/database/storefront.db`.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        config
            .ensure_work_dir_structure()
            .map_err(|e| AppError::Internal(format!("failed to create work directory: {e}")))?;

        let db_path = config.database_dir().join("storefront.db");
        let db_service = DbService::new(&db_path.to_string_lossy())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(Self::new(config.clone(), db_service.db))
    }

    /// State over an in-memory database, for tests
    pub async fn in_memory(config: Config) -> Result<Self, AppError> {
        let db_service = DbService::open_in_memory()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(Self::new(config, db_service.db))
    }

    pub fn get_db(&self) -> Surreal<Db> {
        self.db.clone()
    }
}
