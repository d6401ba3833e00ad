use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use crate::config::DatabaseConfig;
use crate::database::storage::StorageError;

/// Builds the connection pool once at startup; the pool is handed to
/// `PgStorage` and closed again on shutdown.
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, StorageError> {
        let url = config
            .url
            .as_deref()
            .ok_or(StorageError::ConfigMissing("DATABASE_URL"))?;
        let redacted = Self::redact_url(url)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await
            .map_err(StorageError::from_read)?;

        info!("Created database pool for: {}", redacted);
        Ok(pool)
    }

    /// Strip credentials so the URL can be logged
    fn redact_url(raw: &str) -> Result<String, StorageError> {
        let mut url = url::Url::parse(raw).map_err(|_| StorageError::InvalidDatabaseUrl)?;
        if url.password().is_some() {
            url.set_password(Some("***"))
                .map_err(|_| StorageError::InvalidDatabaseUrl)?;
        }
        Ok(url.into())
    }

    pub async fn close(pool: &PgPool) {
        pool.close().await;
        info!("Closed database pool");
    }
}
