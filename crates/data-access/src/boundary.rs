//! Request boundary: runs a unit of work around a handler.
//!
//! A handler executes with input validated and inside a transaction that is
//! committed when it succeeds and rolled back when it fails:
//!
//! ```text
//! invokable check -> input validation -> begin -> handler -> commit | rollback
//! ```

use std::future::Future;

use common::{validate_input, AppError, AppResult};
use validator::Validate;

use crate::infra::Transaction;

/// Per-handler settings checked before any work starts.
#[derive(Debug, Clone, Copy)]
pub struct HandlerOptions {
    /// Non-invokable handlers are rejected with `NotInvokable`
    pub invokable: bool,
}

impl HandlerOptions {
    /// Options of a handler that must never be called through the boundary
    pub fn non_invokable() -> Self {
        Self { invokable: false }
    }
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self { invokable: true }
    }
}

/// Run `work` inside `tx`.
///
/// Commits when `work` succeeds. When it fails the transaction is rolled
/// back and the error of `work` is returned; a rollback failure is only
/// logged.
pub async fn execute_in_transaction<T, W, Fut>(tx: &Transaction, work: W) -> AppResult<T>
where
    W: FnOnce() -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    tx.begin().await?;

    match work().await {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            tracing::debug!(code = e.code(), "Handler failed, rolling back");
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!("Transaction rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

/// Run `handler` on `input` through every boundary guard.
pub async fn invoke<I, T, H, Fut>(
    tx: &Transaction,
    options: HandlerOptions,
    input: I,
    handler: H,
) -> AppResult<T>
where
    I: Validate,
    H: FnOnce(I) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    if !options.invokable {
        return Err(AppError::NotInvokable);
    }

    validate_input(&input)?;

    execute_in_transaction(tx, move || handler(input)).await
}
