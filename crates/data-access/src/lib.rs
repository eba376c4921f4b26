//! Data Access Library
//!
//! Transactional, generic data access for record types persisted through
//! SeaORM:
//!
//! - [`infra`]: connection pool and the [`Transaction`] unit of work
//! - [`repository`]: the generic record repository with lifecycle hooks
//! - [`service`]: record/model translation around repository calls
//! - [`boundary`]: running handlers inside a unit of work

pub mod boundary;
pub mod infra;
pub mod repository;
pub mod service;

pub use repository::audit;

pub use common::{AppError, AppResult};

pub use boundary::{execute_in_transaction, invoke, HandlerOptions};
pub use infra::{Database, Transaction, TransactionOptions};
pub use repository::{
    Associations, Criteria, EntityFilter, EntityStore, ExtraParams, HookContext, MatchAll,
    RecordEntity, RecordHooks, RecordRepository, SaveAction,
};
pub use service::{DefaultMapper, ModelManager, ModelMapper, ModelService};
