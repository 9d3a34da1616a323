use std::time::Duration;

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr, Statement,
    TransactionTrait,
};
use tokio::sync::RwLock;

use super::schema;
use crate::config::{DatabaseConfig, Driver};
use crate::error::{StoreError, StoreResult};

/// Owns the pooled engine handle and hands out per-operation sessions.
///
/// Every storage failure at this layer is logged and reported as `false` or
/// [`StoreError::Connection`]; nothing here panics or propagates a raw
/// engine error to the caller.
pub struct ConnectionManager {
    config: DatabaseConfig,
    conn: RwLock<Option<DatabaseConnection>>,
}

/// A unit-of-work handle bound to the pooled engine.
///
/// Reads run directly against the pool; each write runs inside its own
/// transaction obtained from [`Session::begin`] and closed by
/// [`Session::finish`].
pub struct Session {
    conn: DatabaseConnection,
}

impl ConnectionManager {
    /// Create a manager for the given configuration. No connection is made yet.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        config.validate().context("Invalid database configuration")?;
        Ok(Self {
            config,
            conn: RwLock::new(None),
        })
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Establish the pooled engine and ping it.
    ///
    /// When an engine already exists it is only pinged again.
    pub async fn connect(&self) -> bool {
        let mut guard = self.conn.write().await;

        if let Some(conn) = guard.as_ref() {
            return match Self::ping(conn).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Database connection test failed: {}", e);
                    false
                }
            };
        }

        let conn = match self.open_pool().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to connect to database: {:#}", e);
                return false;
            }
        };

        if let Err(e) = Self::ping(&conn).await {
            error!("Failed to connect to database: {}", e);
            if let Err(close_err) = conn.close().await {
                warn!("Failed to dispose unusable pool: {}", close_err);
            }
            return false;
        }

        info!("Successfully connected to database: {}", self.config.database);
        *guard = Some(conn);
        true
    }

    /// Get a fresh session, connecting first if needed.
    pub async fn get_session(&self) -> StoreResult<Session> {
        if let Some(conn) = self.conn.read().await.as_ref() {
            return Ok(Session::new(conn.clone()));
        }

        if !self.connect().await {
            return Err(StoreError::connection_failed());
        }

        match self.conn.read().await.as_ref() {
            Some(conn) => Ok(Session::new(conn.clone())),
            None => Err(StoreError::connection_failed()),
        }
    }

    /// Run the liveness check against the current engine.
    pub async fn test_connection(&self) -> bool {
        match self.conn.read().await.as_ref() {
            Some(conn) => match Self::ping(conn).await {
                Ok(()) => true,
                Err(e) => {
                    error!("Database connection test failed: {}", e);
                    false
                }
            },
            None => {
                warn!("Database connection test skipped: not connected");
                false
            }
        }
    }

    /// Dispose the engine. Safe to call when never connected.
    pub async fn close(&self) {
        if let Some(conn) = self.conn.write().await.take() {
            match conn.close().await {
                Ok(()) => info!("Database connection closed"),
                Err(e) => error!("Failed to close database connection: {}", e),
            }
        }
    }

    /// Create the reminder and todo tables if they do not exist.
    pub async fn create_tables(&self) -> Result<()> {
        let guard = self.conn.read().await;
        let conn = guard.as_ref().ok_or_else(|| anyhow::anyhow!("Database is not connected"))?;
        schema::create_tables(conn).await.context("Failed to create tables")?;
        info!("Database tables created successfully");
        Ok(())
    }

    /// Connect, create tables and verify the connection afterwards.
    pub async fn initialize(&self) -> Result<()> {
        if !self.connect().await {
            anyhow::bail!("Failed to connect to database");
        }
        self.create_tables().await?;
        if !self.test_connection().await {
            anyhow::bail!("Database connection test failed after table creation");
        }
        info!("Database initialization completed successfully");
        Ok(())
    }

    async fn open_pool(&self) -> Result<DatabaseConnection> {
        let url = self.config.connection_url()?;
        let timeout = Duration::from_secs(self.config.pool_timeout_secs);

        let mut options = ConnectOptions::new(url);
        options
            .connect_timeout(timeout)
            .acquire_timeout(timeout)
            .test_before_acquire(true)
            .sqlx_logging(false);

        if self.config.is_memory() {
            // A private in-memory database lives only as long as its connection.
            options.max_connections(1).min_connections(1);
        } else {
            options
                .max_connections(self.config.max_connections())
                .min_connections(self.config.pool_size)
                .max_lifetime(Duration::from_secs(self.config.pool_recycle_secs));
        }

        if self.config.driver == Driver::Mysql {
            debug!(
                "Opening MySQL pool to {}:{} (pool_size={}, max_overflow={})",
                self.config.host, self.config.port, self.config.pool_size, self.config.max_overflow
            );
        }

        Database::connect(options)
            .await
            .with_context(|| format!("Failed to open connection pool for '{}'", self.config.database))
    }

    async fn ping(conn: &DatabaseConnection) -> Result<(), DbErr> {
        let backend = conn.get_database_backend();
        let row = conn
            .query_one(Statement::from_string(backend, "SELECT 1"))
            .await?
            .ok_or_else(|| DbErr::Custom("liveness check returned no rows".to_string()))?;
        let value: i64 = row.try_get_by_index(0)?;
        if value != 1 {
            return Err(DbErr::Custom(format!("liveness check returned {}", value)));
        }
        Ok(())
    }
}

impl Session {
    fn new(conn: DatabaseConnection) -> Self {
        debug!("Session opened");
        Self { conn }
    }

    /// Connection used for reads.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Start the transaction for one write.
    pub async fn begin(&self) -> StoreResult<DatabaseTransaction> {
        Ok(self.conn.begin().await?)
    }

    /// Commit on success, roll back on failure, then hand the outcome back.
    pub async fn finish<T>(txn: DatabaseTransaction, outcome: StoreResult<T>) -> StoreResult<T> {
        match outcome {
            Ok(value) => {
                txn.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }

    /// Release the session.
    pub fn close(self) {
        debug!("Session closed");
    }
}
