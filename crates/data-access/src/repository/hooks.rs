//! Repository lifecycle hooks.
//!
//! A repository runs its hooks in registration order at every extension
//! point. All methods default to no-ops, so a hook implements only the
//! points it cares about.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;
use uuid::Uuid;

use common::AppResult;
use domain::Record;

/// Caller-supplied parameters passed through save/delete to every hook
pub type ExtraParams = HashMap<String, serde_json::Value>;

/// What hooks get to work with during an operation.
pub struct HookContext<'a> {
    txn: &'a DatabaseTransaction,
    params: &'a ExtraParams,
}

impl<'a> HookContext<'a> {
    pub fn new(txn: &'a DatabaseTransaction, params: &'a ExtraParams) -> Self {
        Self { txn, params }
    }

    /// Live store transaction, for nested queries
    pub fn txn(&self) -> &'a DatabaseTransaction {
        self.txn
    }

    pub fn params(&self) -> &'a ExtraParams {
        self.params
    }

    pub fn param(&self, key: &str) -> Option<&'a serde_json::Value> {
        self.params.get(key)
    }
}

/// Outcome of the `saving` extension point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveAction {
    Persist,
    /// Do not write the record; later `saving` and all `saved` hooks are skipped
    Skip,
}

/// Extension points of a record repository.
///
/// `original` is the record as currently stored, `None` for new records.
#[async_trait]
pub trait RecordHooks<R: Record>: Send + Sync {
    async fn finding(&self, _ctx: &HookContext<'_>, _id: Uuid) -> AppResult<()> {
        Ok(())
    }

    async fn found(&self, _ctx: &HookContext<'_>, _record: &R) -> AppResult<()> {
        Ok(())
    }

    /// Additional validation messages; all of them are reported together
    /// with the record's own field rules.
    async fn validate(
        &self,
        _ctx: &HookContext<'_>,
        _record: &R,
        _original: Option<&R>,
    ) -> AppResult<Vec<String>> {
        Ok(Vec::new())
    }

    async fn saving(
        &self,
        _ctx: &HookContext<'_>,
        _record: &mut R,
        _original: Option<&R>,
    ) -> AppResult<SaveAction> {
        Ok(SaveAction::Persist)
    }

    async fn saved(
        &self,
        _ctx: &HookContext<'_>,
        _record: &R,
        _original: Option<&R>,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn deleting(&self, _ctx: &HookContext<'_>, _record: &R) -> AppResult<()> {
        Ok(())
    }

    async fn deleted(&self, _ctx: &HookContext<'_>, _record: &R) -> AppResult<()> {
        Ok(())
    }
}
