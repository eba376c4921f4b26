//! Domain layer - Record capabilities and query value objects.
//!
//! This crate contains pure domain types with no infrastructure dependencies.
//! Everything here is shared between the repository engine and its callers.

pub mod constants;
pub mod error;
pub mod pair;
pub mod query;
pub mod record;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pair::EntityModelPair;
pub use query::{validate_sorts, Page, PageResult, Sort, SortDirection};
pub use record::{AuditFields, Record, SoftDeletable, Trackable, TransportModel};
