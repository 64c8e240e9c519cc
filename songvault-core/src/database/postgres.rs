use crate::{
    MIGRATOR,
    database::infrastructure::postgres::PostgresSongRepository,
    error::{Result, StoreError},
};
use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use std::{fmt, time::Duration};
use tracing::info;

/// Statistics about the connection pool
#[derive(Debug, Clone)]
pub struct PoolStats {
    pub size: u32,
    pub idle: u32,
    pub max_size: u32,
    pub min_idle: u32,
}

/// Pool sizing knobs, normally filled from configuration.
#[derive(Debug, Clone, Copy)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: num_cpus::get() as u32,
            min_connections: 1,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
    settings: PoolSettings,
    songs: PostgresSongRepository,
}

impl fmt::Debug for PostgresDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PostgresDatabase")
            .field("pool_size", &self.pool.size())
            .field("idle_connections", &self.pool.num_idle())
            .field("max_connections", &self.settings.max_connections)
            .field("min_connections", &self.settings.min_connections)
            .finish()
    }
}

impl PostgresDatabase {
    /// Connect eagerly; an unreachable database is an error, not a lazy
    /// failure on first request.
    pub async fn new(
        connection_string: &str,
        settings: PoolSettings,
    ) -> Result<Self> {
        let connect_options = Self::build_connect_options(connection_string)?;
        let min_connections =
            settings.min_connections.min(settings.max_connections);

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .min_connections(min_connections)
            .acquire_timeout(settings.acquire_timeout)
            .max_lifetime(Duration::from_secs(1800))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect_with(connect_options)
            .await
            .map_err(|e| {
                StoreError::Storage(format!("Database connection failed: {e}"))
            })?;

        info!(
            max_connections = settings.max_connections,
            min_connections, "Database pool initialized"
        );

        Ok(Self::with_settings(pool, settings))
    }

    /// Create a PostgresDatabase from an existing pool (mainly for testing)
    pub fn from_pool(pool: PgPool) -> Self {
        Self::with_settings(
            pool,
            PoolSettings {
                max_connections: 10,
                min_connections: 0,
                acquire_timeout: Duration::from_secs(30),
            },
        )
    }

    fn with_settings(pool: PgPool, settings: PoolSettings) -> Self {
        let songs = PostgresSongRepository::new(pool.clone());
        Self {
            pool,
            settings,
            songs,
        }
    }

    fn build_connect_options(
        connection_string: &str,
    ) -> Result<PgConnectOptions> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(StoreError::Storage(
                "PostgreSQL connection string is empty".into(),
            ));
        }

        trimmed.parse::<PgConnectOptions>().map_err(|e| {
            StoreError::Storage(format!(
                "Invalid PostgreSQL connection string: {e}"
            ))
        })
    }

    pub fn songs(&self) -> PostgresSongRepository {
        self.songs.clone()
    }

    /// Get connection pool statistics for monitoring
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats {
            size: self.pool.size(),
            idle: self.pool.num_idle() as u32,
            max_size: self.settings.max_connections,
            min_idle: self.settings.min_connections,
        }
    }

    /// Apply the embedded migrations.
    pub async fn migrate(&self) -> Result<()> {
        MIGRATOR.run(&self.pool).await.map_err(|e| {
            StoreError::Storage(format!("Migration failed: {e}"))
        })?;
        info!("Database migrations applied");
        Ok(())
    }
}
