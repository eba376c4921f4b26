//! Unit of Work - transaction lifecycle management.
//!
//! A `Transaction` owns at most one live store transaction at a time:
//!
//! ```text
//! Idle --begin--> Active --commit--> Idle
//!                        --rollback--> Idle
//! ```
//!
//! Repositories share the `Transaction` through `Arc` and borrow the live
//! store handle per operation via [`Transaction::connection`]. The handle is
//! guarded by an async mutex, so operations against one instance are
//! serialized; a hook must use the handle it is given instead of calling back
//! into a repository bound to the same instance.

use std::sync::Mutex as StdMutex;

use common::{AppError, AppResult};
use sea_orm::{AccessMode, DatabaseConnection, DatabaseTransaction, IsolationLevel, TransactionTrait};
use tokio::sync::{MappedMutexGuard, Mutex, MutexGuard};

/// Borrowed live store transaction.
pub type StoreHandle<'a> = MappedMutexGuard<'a, DatabaseTransaction>;

type CommitCallback = Box<dyn FnOnce() + Send + 'static>;

/// Settings applied when a store transaction is opened.
#[derive(Debug, Clone, Default)]
pub struct TransactionOptions {
    pub isolation_level: Option<IsolationLevel>,
    pub access_mode: Option<AccessMode>,
}

/// Parse an isolation level name such as `read-committed` or `SERIALIZABLE`.
pub fn parse_isolation_level(value: &str) -> AppResult<IsolationLevel> {
    let normalized = value.trim().to_ascii_lowercase().replace(['_', ' '], "-");
    match normalized.as_str() {
        "read-uncommitted" => Ok(IsolationLevel::ReadUncommitted),
        "read-committed" => Ok(IsolationLevel::ReadCommitted),
        "repeatable-read" => Ok(IsolationLevel::RepeatableRead),
        "serializable" => Ok(IsolationLevel::Serializable),
        _ => Err(AppError::internal(format!(
            "Unknown isolation level '{}'",
            value
        ))),
    }
}

/// One atomic unit of work against the store.
pub struct Transaction {
    db: DatabaseConnection,
    options: TransactionOptions,
    live: Mutex<Option<DatabaseTransaction>>,
    committing: StdMutex<Option<CommitCallback>>,
    committed: StdMutex<Option<CommitCallback>>,
}

impl Transaction {
    /// Create an idle unit of work with the store's default settings
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_options(db, TransactionOptions::default())
    }

    /// Create an idle unit of work with explicit transaction settings
    pub fn with_options(db: DatabaseConnection, options: TransactionOptions) -> Self {
        Self {
            db,
            options,
            live: Mutex::new(None),
            committing: StdMutex::new(None),
            committed: StdMutex::new(None),
        }
    }

    /// Get the underlying connection pool
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Whether a store transaction is currently live
    pub async fn is_active(&self) -> bool {
        self.live.lock().await.is_some()
    }

    /// Open a new store transaction.
    ///
    /// Fails with `TransactionAlreadyStarted` if one is already live; the
    /// live transaction is left untouched.
    pub async fn begin(&self) -> AppResult<()> {
        let mut live = self.live.lock().await;
        if live.is_some() {
            return Err(AppError::TransactionAlreadyStarted);
        }

        let txn = self
            .db
            .begin_with_config(
                self.options.isolation_level.clone(),
                self.options.access_mode.clone(),
            )
            .await?;
        *live = Some(txn);

        tracing::debug!("Transaction started");
        Ok(())
    }

    /// Commit the live transaction. No-op when idle.
    ///
    /// Saves and deletes write through to the store transaction as they
    /// happen, so there is nothing left to flush at this point. The
    /// committing callback fires right before the store commit, the
    /// committed callback right after a successful one.
    pub async fn commit(&self) -> AppResult<()> {
        let mut live = self.live.lock().await;
        let Some(txn) = live.take() else {
            return Ok(());
        };

        fire(&self.committing);

        match txn.commit().await {
            Ok(()) => {
                fire(&self.committed);
                tracing::debug!("Transaction committed");
                Ok(())
            }
            Err(e) => {
                clear(&self.committed);
                Err(e.into())
            }
        }
    }

    /// Abort the live transaction. No-op when idle.
    ///
    /// Pending commit callbacks are discarded without firing.
    pub async fn rollback(&self) -> AppResult<()> {
        let mut live = self.live.lock().await;
        let Some(txn) = live.take() else {
            return Ok(());
        };

        self.clear_callbacks();
        txn.rollback().await?;

        tracing::debug!("Transaction rolled back");
        Ok(())
    }

    /// Release resources, rolling back a transaction that is still live.
    /// Safe to call any number of times.
    pub async fn dispose(&self) {
        let mut live = self.live.lock().await;
        self.clear_callbacks();

        if let Some(txn) = live.take() {
            if let Err(e) = txn.rollback().await {
                tracing::error!("Transaction rollback failed: {}", e);
            }
        }
    }

    /// Borrow the live store transaction for one operation.
    pub async fn connection(&self) -> AppResult<StoreHandle<'_>> {
        let live = self.live.lock().await;
        MutexGuard::try_map(live, |slot| slot.as_mut()).map_err(|_| AppError::TransactionNotActive)
    }

    /// Run `callback` once, right before the next successful commit.
    /// Replaces a previously registered committing callback.
    pub fn on_committing(&self, callback: impl FnOnce() + Send + 'static) {
        *lock(&self.committing) = Some(Box::new(callback));
    }

    /// Run `callback` once, right after the next successful commit.
    /// Replaces a previously registered committed callback.
    pub fn on_committed(&self, callback: impl FnOnce() + Send + 'static) {
        *lock(&self.committed) = Some(Box::new(callback));
    }

    fn clear_callbacks(&self) {
        clear(&self.committing);
        clear(&self.committed);
    }
}

fn lock(slot: &StdMutex<Option<CommitCallback>>) -> std::sync::MutexGuard<'_, Option<CommitCallback>> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn fire(slot: &StdMutex<Option<CommitCallback>>) {
    let callback = lock(slot).take();
    if let Some(callback) = callback {
        callback();
    }
}

fn clear(slot: &StdMutex<Option<CommitCallback>>) {
    lock(slot).take();
}
