//! Record/model pairing used by batch translation.

/// Exactly one record associated with exactly one model.
///
/// Translation hooks always receive a batch of pairs so they can do
/// cross-item work (batched lookups) while never sharing a model between
/// two records.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityModelPair<R, M> {
    pub entity: R,
    pub model: M,
}

impl<R, M> EntityModelPair<R, M> {
    pub fn new(entity: R, model: M) -> Self {
        Self { entity, model }
    }

    pub fn into_entity(self) -> R {
        self.entity
    }

    pub fn into_model(self) -> M {
        self.model
    }
}

impl<R, M: Default> EntityModelPair<R, M> {
    /// Pair a record with a fresh model
    pub fn with_fresh_model(entity: R) -> Self {
        Self::new(entity, M::default())
    }
}
