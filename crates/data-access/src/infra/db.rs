//! Database connection and initialization.

use std::time::Duration;

use common::{AppResult, DatabaseConfig};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database as SeaDatabase, DatabaseConnection, DbErr, Statement,
};

use super::transaction::{parse_isolation_level, Transaction, TransactionOptions};

/// Database wrapper for connection management
#[derive(Clone)]
pub struct Database {
    connection: DatabaseConnection,
    options: TransactionOptions,
}

impl Database {
    /// Open a connection pool from configuration.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = match config.isolation_level.as_deref() {
            Some(level) => TransactionOptions {
                isolation_level: Some(parse_isolation_level(level)?),
                ..TransactionOptions::default()
            },
            None => TransactionOptions::default(),
        };

        let mut connect = ConnectOptions::new(config.url.clone());
        connect
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .sqlx_logging(config.sqlx_logging);

        let connection = SeaDatabase::connect(connect).await?;
        tracing::info!(
            backend = ?connection.get_database_backend(),
            "Database connected"
        );

        Ok(Self {
            connection,
            options,
        })
    }

    /// Get a reference to the database connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.connection
    }

    /// Create an idle unit of work using the configured transaction options.
    pub fn transaction(&self) -> Transaction {
        Transaction::with_options(self.connection.clone(), self.options.clone())
    }

    /// Check database connectivity by executing a simple query.
    pub async fn ping(&self) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_string(
                self.connection.get_database_backend(),
                "SELECT 1".to_string(),
            ))
            .await?;
        Ok(())
    }
}
