//! Ready-made hooks: audit stamping and idempotent saves.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use common::AppResult;
use domain::{AuditFields, Record};

use super::hooks::{HookContext, RecordHooks, SaveAction};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Who is acting, and when.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ActorSource: Send + Sync {
    /// Id of the acting user (nil for anonymous/system work)
    fn current_actor(&self) -> Uuid;

    fn now(&self) -> DateTime<Utc>;
}

/// Fixed actor with the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemActor {
    actor: Uuid,
}

impl SystemActor {
    pub fn new(actor: Uuid) -> Self {
        Self { actor }
    }

    pub fn anonymous() -> Self {
        Self { actor: Uuid::nil() }
    }
}

impl ActorSource for SystemActor {
    fn current_actor(&self) -> Uuid {
        self.actor
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Stamps audit fields on trackable records before they are written.
///
/// New records get creator and creation time. Existing records keep the
/// creation fields of the stored row, whatever the caller put there, and
/// get modifier and modification time.
pub struct AuditTrail {
    source: Arc<dyn ActorSource>,
}

impl AuditTrail {
    pub fn new(source: Arc<dyn ActorSource>) -> Self {
        Self { source }
    }

    /// Apply the stamp to `record` given its stored snapshot.
    pub fn stamp<R: Record>(&self, record: &mut R, original: Option<&R>) {
        let stored = original
            .and_then(|o| o.as_trackable())
            .map(|t| t.audit());

        let Some(trackable) = record.as_trackable_mut() else {
            return;
        };

        let actor = self.source.current_actor();
        let now = self.source.now();
        let audit = match stored {
            Some(previous) => previous.modified(actor, now),
            None => AuditFields::created(actor, now),
        };
        trackable.set_audit(audit);
    }
}

#[async_trait]
impl<R: Record> RecordHooks<R> for AuditTrail {
    async fn saving(
        &self,
        _ctx: &HookContext<'_>,
        record: &mut R,
        original: Option<&R>,
    ) -> AppResult<SaveAction> {
        self.stamp(record, original);
        Ok(SaveAction::Persist)
    }
}

/// Skips the write when the record equals its stored snapshot.
///
/// Register it before hooks that modify the record (such as
/// [`AuditTrail`]) so an unchanged record stays untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipUnchanged;

#[async_trait]
impl<R: Record + PartialEq> RecordHooks<R> for SkipUnchanged {
    async fn saving(
        &self,
        _ctx: &HookContext<'_>,
        record: &mut R,
        original: Option<&R>,
    ) -> AppResult<SaveAction> {
        if original.is_some_and(|stored| stored == &*record) {
            tracing::debug!(id = %record.id(), "Record unchanged, skipping save");
            return Ok(SaveAction::Skip);
        }
        Ok(SaveAction::Persist)
    }
}
