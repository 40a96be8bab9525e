//! Connection pool, entities, and migrations for the page tree service.
//!
//! `Db` is a thin wrapper over a `sea_orm::DatabaseConnection`, mirroring
//! the house convention of not hand-rolling SQL execution: callers reach
//! for `sea_orm::TransactionTrait::begin` on the inner connection rather
//! than a bespoke transaction type.

pub mod entities;
pub mod migrations;

use std::time::Duration;

use sea_orm::{AccessMode, ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
pub use sea_orm_migration::MigratorTrait;

/// Pool sizing and lifetime figures from §5 CONCURRENCY & RESOURCE MODEL.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    pub min_connections: u32,
    pub max_connections: u32,
    pub max_lifetime: Duration,
    pub idle_timeout: Duration,
    pub healthcheck_interval: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 20,
            max_lifetime: Duration::from_secs(3600),
            idle_timeout: Duration::from_secs(1800),
            healthcheck_interval: Duration::from_secs(60),
        }
    }
}

/// A connected, migrated database handle.
#[derive(Clone)]
pub struct Db {
    conn: DatabaseConnection,
}

impl Db {
    /// Opens a connection pool against `database_url` with the given pool
    /// configuration and runs any pending migrations.
    ///
    /// # Errors
    ///
    /// Returns the underlying `DbErr` if the connection cannot be
    /// established or a migration fails.
    pub async fn connect(database_url: &str, pool: &PoolConfig) -> Result<Self, DbErr> {
        let mut opts = ConnectOptions::new(database_url);
        opts.min_connections(pool.min_connections)
            .max_connections(pool.max_connections)
            .max_lifetime(pool.max_lifetime)
            .idle_timeout(pool.idle_timeout)
            .connect_timeout(pool.healthcheck_interval)
            .sqlx_logging(false);
        let conn = Database::connect(opts).await?;
        tracing::info!(max_connections = pool.max_connections, "connected to database");
        migrations::Migrator::up(&conn, None).await?;
        tracing::info!("migrations applied");
        Ok(Self { conn })
    }

    #[must_use]
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Opens a read-only transaction (§4.1 `begin(readonly?)`, §4.6
    /// "executed in a read-only transaction").
    ///
    /// Callers still drop the returned `DatabaseTransaction` without an
    /// explicit `commit`, same as a write transaction rolled back on drop —
    /// a read-only transaction never has anything to commit.
    ///
    /// # Errors
    ///
    /// Returns the underlying `DbErr` if the transaction cannot be started.
    pub async fn begin_readonly(&self) -> Result<DatabaseTransaction, DbErr> {
        self.conn.begin_with_config(None, Some(AccessMode::ReadOnly)).await
    }

    /// Closes the pool. Called during graceful shutdown after the server
    /// has stopped accepting new connections (§5).
    ///
    /// # Errors
    ///
    /// Returns the underlying `DbErr` if closing fails.
    pub async fn close(self) -> Result<(), DbErr> {
        self.conn.close().await
    }
}
