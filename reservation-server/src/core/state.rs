use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::services::ReservationService;
use shared::error::AppResult;

/// Shared application state, cloned into every handler
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
}

impl ServerState {
    /// Open the configured database (migrations applied) and build the state
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        Ok(Self::with_pool(config.clone(), db.pool))
    }

    /// Build state over an existing pool
    pub fn with_pool(config: Config, pool: SqlitePool) -> Self {
        Self { config, pool }
    }

    pub fn reservations(&self) -> ReservationService {
        ReservationService::new(self.pool.clone())
    }
}
