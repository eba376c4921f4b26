//! Record and transport-model capabilities.
//!
//! A record is anything the repository engine persists: it has a stable
//! `Uuid` identity and may opt into the `Trackable` and `SoftDeletable`
//! capabilities. Capabilities are discovered through the `as_*` accessors,
//! which return `None` unless the concrete type overrides them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Audit fields carried by trackable records and their models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditFields {
    /// Actor that created the record
    pub created_by_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Actor behind the last modification (None until first update)
    pub modified_by_id: Option<Uuid>,
    /// Last modification timestamp (None until first update)
    pub modified_at: Option<DateTime<Utc>>,
}

impl AuditFields {
    /// Audit fields of a record created now by `actor`.
    pub fn created(actor: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            created_by_id: actor,
            created_at: at,
            modified_by_id: None,
            modified_at: None,
        }
    }

    /// Keep the creation fields, record a modification by `actor`.
    pub fn modified(self, actor: Uuid, at: DateTime<Utc>) -> Self {
        Self {
            modified_by_id: Some(actor),
            modified_at: Some(at),
            ..self
        }
    }
}

/// Capability: creator/modifier audit fields.
pub trait Trackable {
    fn audit(&self) -> AuditFields;

    fn set_audit(&mut self, audit: AuditFields);
}

/// Capability: logical deletion instead of physical removal.
pub trait SoftDeletable {
    fn is_deleted(&self) -> bool;

    fn set_deleted(&mut self, deleted: bool);
}

/// A persisted domain object with a stable identity.
///
/// `Default` produces the "fresh" record the mapping layer starts from when
/// creating; a fresh record carries the nil id and is therefore new.
/// Field-level rules are expressed with `validator` and checked on every save.
pub trait Record: Validate + Default + Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);

    /// A record is new until it has been assigned a non-nil id.
    fn is_new(&self) -> bool {
        self.id().is_nil()
    }

    /// Read access to the audit fields. Must return `Some` exactly when
    /// [`Record::as_trackable_mut`] does.
    fn as_trackable(&self) -> Option<&dyn Trackable> {
        None
    }

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        None
    }

    /// Logical deletion support. The flag is only ever set by the mapping
    /// layer, so there is no read-only counterpart.
    fn as_soft_deletable_mut(&mut self) -> Option<&mut dyn SoftDeletable> {
        None
    }
}

/// Transport-facing counterpart of a record.
///
/// Models are created fresh (`Default`) for every translation step.
pub trait TransportModel: Default + Clone + Send + Sync + 'static {
    fn id(&self) -> Uuid;

    fn set_id(&mut self, id: Uuid);

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        None
    }
}
