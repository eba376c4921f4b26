//! Service layer: model-level operations over repositories.

mod model_service;

pub use model_service::{copy_identity, DefaultMapper, ModelManager, ModelMapper, ModelService};
