//! Model service - translates between records and transport models around
//! repository calls.
//!
//! Translation always runs in batches of [`EntityModelPair`]s, one fresh
//! model per record, inside the unit of work the repository is bound to.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::EntityTrait;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{EntityModelPair, Page, PageResult, Record, Sort, TransportModel};

use crate::repository::{Associations, EntityFilter, ExtraParams, HookContext, RecordRepository};

/// Batch translation between records `R` and models `M`.
#[async_trait]
pub trait ModelMapper<R: Record, M: TransportModel>: Send + Sync {
    /// Fill each pair's model from its record.
    ///
    /// Default: copies the id, and the audit fields when both sides are
    /// trackable.
    async fn to_models(
        &self,
        _ctx: &HookContext<'_>,
        pairs: &mut [EntityModelPair<R, M>],
    ) -> AppResult<()> {
        for pair in pairs.iter_mut() {
            copy_identity(&pair.entity, &mut pair.model);
        }
        Ok(())
    }

    /// Apply each pair's model onto its record. Default: no-op.
    async fn to_entities(
        &self,
        _ctx: &HookContext<'_>,
        _pairs: &mut [EntityModelPair<R, M>],
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Copy id and audit fields from a record onto its model.
pub fn copy_identity<R: Record, M: TransportModel>(record: &R, model: &mut M) {
    model.set_id(record.id());
    if let (Some(source), Some(target)) = (record.as_trackable(), model.as_trackable_mut()) {
        target.set_audit(source.audit());
    }
}

/// Mapper using only the default translations.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMapper;

impl<R: Record, M: TransportModel> ModelMapper<R, M> for DefaultMapper {}

/// Model-level CRUD over a record repository.
#[async_trait]
pub trait ModelService<F, M>: Send + Sync
where
    F: Send + Sync,
    M: TransportModel,
{
    /// Get the model of the record with `id`
    async fn get(&self, id: Uuid) -> AppResult<M>;

    /// Get a page of models; `total_count` is the number of matching records
    async fn read(&self, filter: Option<&F>, sorts: &[Sort], page: Page)
        -> AppResult<PageResult<M>>;

    /// Insert a new record built from `model`; any id on the model is ignored
    async fn create(&self, model: M, params: &ExtraParams) -> AppResult<M>;

    /// Apply `model` onto the existing record with the model's id
    async fn update(&self, model: M, params: &ExtraParams) -> AppResult<M>;

    /// Delete the record with `id` (logically, when soft-deletable) and
    /// return its model as it was before deletion
    async fn delete(&self, id: Uuid) -> AppResult<M>;
}

/// Concrete implementation of ModelService for entity `E`, filter `F` and
/// model `M`.
pub struct ModelManager<E, F, M>
where
    E: EntityTrait,
    E::Model: Record,
    F: EntityFilter<E>,
    M: TransportModel,
{
    repo: Arc<dyn RecordRepository<E, F>>,
    mapper: Arc<dyn ModelMapper<E::Model, M>>,
    associations: Option<Arc<Associations<E>>>,
    _marker: PhantomData<fn() -> M>,
}

impl<E, F, M> ModelManager<E, F, M>
where
    E: EntityTrait,
    E::Model: Record,
    F: EntityFilter<E>,
    M: TransportModel,
{
    /// Create new model service with repository and mapper
    pub fn new(
        repo: Arc<dyn RecordRepository<E, F>>,
        mapper: Arc<dyn ModelMapper<E::Model, M>>,
    ) -> Self {
        Self {
            repo,
            mapper,
            associations: None,
            _marker: PhantomData,
        }
    }

    /// Associations applied to every fetch made by this service
    pub fn with_associations(mut self, associations: Arc<Associations<E>>) -> Self {
        self.associations = Some(associations);
        self
    }

    fn associations(&self) -> Option<&Associations<E>> {
        self.associations.as_deref()
    }

    async fn to_models(
        &self,
        records: Vec<E::Model>,
        params: &ExtraParams,
    ) -> AppResult<Vec<M>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut pairs: Vec<EntityModelPair<E::Model, M>> = records
            .into_iter()
            .map(EntityModelPair::with_fresh_model)
            .collect();

        {
            let txn = self.repo.transaction().connection().await?;
            let ctx = HookContext::new(&txn, params);
            self.mapper.to_models(&ctx, &mut pairs).await?;
        }

        Ok(pairs.into_iter().map(EntityModelPair::into_model).collect())
    }

    async fn to_model(&self, record: E::Model, params: &ExtraParams) -> AppResult<M> {
        self.to_models(vec![record], params)
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("Model translation produced no model"))
    }

    async fn to_entity(
        &self,
        record: E::Model,
        model: M,
        params: &ExtraParams,
    ) -> AppResult<E::Model> {
        let mut pairs = vec![EntityModelPair::new(record, model)];

        {
            let txn = self.repo.transaction().connection().await?;
            let ctx = HookContext::new(&txn, params);
            self.mapper.to_entities(&ctx, &mut pairs).await?;
        }

        pairs
            .pop()
            .map(EntityModelPair::into_entity)
            .ok_or_else(|| AppError::internal("Record translation produced no record"))
    }
}

/// Set the deleted flag if the record supports logical deletion.
fn mark_deleted<R: Record>(record: &mut R) -> bool {
    match record.as_soft_deletable_mut() {
        Some(flag) => {
            flag.set_deleted(true);
            true
        }
        None => false,
    }
}

#[async_trait]
impl<E, F, M> ModelService<F, M> for ModelManager<E, F, M>
where
    E: EntityTrait,
    E::Model: Record,
    F: EntityFilter<E>,
    M: TransportModel,
{
    async fn get(&self, id: Uuid) -> AppResult<M> {
        let record = self.repo.get(id, self.associations()).await?;
        self.to_model(record, &ExtraParams::new()).await
    }

    async fn read(
        &self,
        filter: Option<&F>,
        sorts: &[Sort],
        page: Page,
    ) -> AppResult<PageResult<M>> {
        let result = self
            .repo
            .read(filter, sorts, page, self.associations())
            .await?;
        let models = self.to_models(result.items, &ExtraParams::new()).await?;
        Ok(PageResult::new(models, result.total_count))
    }

    async fn create(&self, model: M, params: &ExtraParams) -> AppResult<M> {
        let mut record = self.to_entity(E::Model::default(), model, params).await?;
        record.set_id(Uuid::nil());

        let saved = self.repo.save(record, params).await?;
        self.to_model(saved, params).await
    }

    async fn update(&self, model: M, params: &ExtraParams) -> AppResult<M> {
        let id = model.id();
        if id.is_nil() {
            return Err(AppError::ArgumentMissing("id"));
        }

        let existing = self.repo.get(id, self.associations()).await?;
        let mut record = self.to_entity(existing, model, params).await?;
        record.set_id(id);

        let saved = self.repo.save(record, params).await?;
        self.to_model(saved, params).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<M> {
        let params = ExtraParams::new();
        let mut record = self.repo.get(id, self.associations()).await?;
        let snapshot = self.to_model(record.clone(), &params).await?;

        if mark_deleted(&mut record) {
            self.repo.save(record, &params).await?;
        } else {
            self.repo.delete(record, &params).await?;
        }

        Ok(snapshot)
    }
}
