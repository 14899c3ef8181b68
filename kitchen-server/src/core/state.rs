use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::{Config, Result, ServerError};
use crate::db::DbService;
use crate::db::repository::user;

/// Server state shared by every handler
///
/// Cheap to clone: the pool and the JWT service are reference counted.
///
/// | Field | Description |
/// |-------|-------------|
/// | config | immutable configuration |
/// | db | SQLite pool wrapper |
/// | jwt_service | token issue/validation |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub db: DbService,
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    pub fn new(config: Config, db: DbService) -> Self {
        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        Self {
            config,
            db,
            jwt_service,
        }
    }

    /// Open the database, run migrations and bootstrap the admin account
    pub async fn initialize(config: &Config) -> Result<Self> {
        let db = DbService::new(&config.database_url)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        let state = Self::new(config.clone(), db);
        state.bootstrap_admin().await?;
        Ok(state)
    }

    /// Create the configured admin when the users table is empty
    pub async fn bootstrap_admin(&self) -> Result<()> {
        let (Some(email), Some(password)) = (&self.config.admin_email, &self.config.admin_password)
        else {
            return Ok(());
        };

        let created = user::bootstrap_admin(self.pool(), &self.config.admin_name, email, password)
            .await
            .map_err(|e| ServerError::Database(e.to_string()))?;

        if created {
            tracing::info!(email = %email, "Bootstrap admin account created");
        }
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db.pool
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }
}
