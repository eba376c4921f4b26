//! Repository layer for data access.

pub mod audit;
mod filter;
mod hooks;
mod record_repository;

pub use filter::{Associations, Criteria, EntityFilter, MatchAll, RecordEntity};
pub use hooks::{ExtraParams, HookContext, RecordHooks, SaveAction};
pub use record_repository::{EntityStore, RecordRepository};
