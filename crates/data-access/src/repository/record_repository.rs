//! Generic record repository: paged/filtered/sorted reads and hook-driven
//! save/delete for one record type.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};
use uuid::Uuid;

use common::{validation_messages, AppError, AppResult};
use domain::{
    validate_sorts, Page, PageResult, Record, Sort, FIRST_MATCH_PAGE_SIZE, UNIQUE_MATCH_PAGE_SIZE,
};

use super::filter::{order_of, Associations, Criteria, EntityFilter, RecordEntity};
use super::hooks::{ExtraParams, HookContext, RecordHooks, SaveAction};
use crate::infra::Transaction;

/// Repository contract for the records of entity `E` searched with filter `F`.
///
/// A `None` filter means the filter type's default (match everything).
#[async_trait]
pub trait RecordRepository<E, F>: Send + Sync
where
    E: EntityTrait,
    E::Model: Record,
    F: EntityFilter<E>,
{
    /// Unit of work this repository operates in
    fn transaction(&self) -> &Arc<Transaction>;

    /// Fetch the record with `id`
    async fn get(&self, id: Uuid, associations: Option<&Associations<E>>)
        -> AppResult<E::Model>;

    /// Fetch a page of matching records plus the total number of matches
    async fn read(
        &self,
        filter: Option<&F>,
        sorts: &[Sort],
        page: Page,
        associations: Option<&Associations<E>>,
    ) -> AppResult<PageResult<E::Model>>;

    /// Number of matching records
    async fn count(&self, filter: Option<&F>) -> AppResult<u64>;

    /// Whether any record matches
    async fn exists(&self, filter: Option<&F>) -> AppResult<bool>;

    /// Insert a new record or update an existing one
    async fn save(&self, record: E::Model, params: &ExtraParams) -> AppResult<E::Model>;

    /// Physically remove a record
    async fn delete(&self, record: E::Model, params: &ExtraParams) -> AppResult<E::Model>;

    /// First match; fails with `NoMatch` when nothing matches
    async fn get_first(
        &self,
        filter: Option<&F>,
        associations: Option<&Associations<E>>,
    ) -> AppResult<E::Model> {
        self.get_first_or_default(filter, associations)
            .await?
            .ok_or_else(|| AppError::no_match(entity_name::<E>()))
    }

    /// First match, if any
    async fn get_first_or_default(
        &self,
        filter: Option<&F>,
        associations: Option<&Associations<E>>,
    ) -> AppResult<Option<E::Model>> {
        let page = Page::sized(FIRST_MATCH_PAGE_SIZE);
        let result = self.read(filter, &[], page, associations).await?;
        Ok(result.items.into_iter().next())
    }

    /// The only match; fails with `NoMatch` or `NotUnique`
    async fn get_unique(
        &self,
        filter: Option<&F>,
        associations: Option<&Associations<E>>,
    ) -> AppResult<E::Model> {
        self.get_unique_or_default(filter, associations)
            .await?
            .ok_or_else(|| AppError::no_match(entity_name::<E>()))
    }

    /// The only match, if any; fails with `NotUnique` on several matches
    async fn get_unique_or_default(
        &self,
        filter: Option<&F>,
        associations: Option<&Associations<E>>,
    ) -> AppResult<Option<E::Model>> {
        // A second row is enough to prove the match is not unique.
        let page = Page::sized(UNIQUE_MATCH_PAGE_SIZE);
        let result = self.read(filter, &[], page, associations).await?;

        let mut items = result.items.into_iter();
        match (items.next(), items.next()) {
            (first, None) => Ok(first),
            (_, Some(_)) => Err(AppError::not_unique(entity_name::<E>())),
        }
    }
}

/// Table name of `E`, used in error messages
pub(crate) fn entity_name<E: EntityTrait>() -> String {
    E::default().table_name().to_string()
}

/// SeaORM-backed repository for entity `E` with active model `A`.
pub struct EntityStore<E, A, F>
where
    E: EntityTrait,
    E::Model: Record,
{
    tx: Arc<Transaction>,
    hooks: Vec<Arc<dyn RecordHooks<E::Model>>>,
    _marker: PhantomData<fn() -> (A, F)>,
}

impl<E, A, F> EntityStore<E, A, F>
where
    E: RecordEntity,
    E::Model: Record + IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
    F: EntityFilter<E>,
{
    /// Create a repository bound to a unit of work
    pub fn new(tx: Arc<Transaction>) -> Self {
        Self {
            tx,
            hooks: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Register a hook; hooks run in registration order
    pub fn with_hook(mut self, hook: Arc<dyn RecordHooks<E::Model>>) -> Self {
        self.hooks.push(hook);
        self
    }

    fn criteria(filter: Option<&F>) -> Criteria {
        match filter {
            Some(filter) => filter.criteria(),
            None => F::default().criteria(),
        }
    }

    fn order_columns(sorts: &[Sort]) -> AppResult<Vec<(E::Column, sea_orm::sea_query::Order)>> {
        validate_sorts(sorts)?;
        sorts
            .iter()
            .map(|sort| {
                E::order_column(&sort.field)
                    .map(|column| (column, order_of(sort.direction)))
                    .ok_or_else(|| {
                        AppError::invalid_sort(format!(
                            "{} cannot be sorted by '{}'",
                            entity_name::<E>(),
                            sort.field
                        ))
                    })
            })
            .collect()
    }

    async fn validate(
        &self,
        ctx: &HookContext<'_>,
        record: &E::Model,
        original: Option<&E::Model>,
    ) -> AppResult<()> {
        let mut messages = match validator::Validate::validate(record) {
            Ok(()) => Vec::new(),
            Err(errors) => validation_messages(&errors),
        };
        for hook in &self.hooks {
            messages.extend(hook.validate(ctx, record, original).await?);
        }

        if messages.is_empty() {
            Ok(())
        } else {
            tracing::warn!(
                entity = %entity_name::<E>(),
                id = %record.id(),
                "Record failed validation: {}",
                messages.join("; ")
            );
            Err(AppError::validation(messages))
        }
    }
}

#[async_trait]
impl<E, A, F> RecordRepository<E, F> for EntityStore<E, A, F>
where
    E: RecordEntity,
    E::Model: Record + IntoActiveModel<A>,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + Sync + 'static,
    F: EntityFilter<E>,
{
    fn transaction(&self) -> &Arc<Transaction> {
        &self.tx
    }

    async fn get(
        &self,
        id: Uuid,
        associations: Option<&Associations<E>>,
    ) -> AppResult<E::Model> {
        if id.is_nil() {
            return Err(AppError::ArgumentMissing("id"));
        }

        let txn = self.tx.connection().await?;
        let params = ExtraParams::new();
        let ctx = HookContext::new(&txn, &params);

        for hook in &self.hooks {
            hook.finding(&ctx, id).await?;
        }

        let mut query = E::find();
        if let Some(associations) = associations {
            query = associations(query);
        }

        let record = query
            .filter(E::match_by_id(id))
            .one(&*txn)
            .await?
            .ok_or_else(|| AppError::not_found(entity_name::<E>(), id))?;

        for hook in &self.hooks {
            hook.found(&ctx, &record).await?;
        }

        Ok(record)
    }

    async fn read(
        &self,
        filter: Option<&F>,
        sorts: &[Sort],
        page: Page,
        associations: Option<&Associations<E>>,
    ) -> AppResult<PageResult<E::Model>> {
        let order = Self::order_columns(sorts)?;

        let condition = match Self::criteria(filter) {
            Criteria::Match(condition) => condition,
            Criteria::Suppress => {
                tracing::debug!(entity = %entity_name::<E>(), "Filter suppressed the query");
                return Ok(PageResult::empty());
            }
        };

        let txn = self.tx.connection().await?;
        let total_count = E::find().filter(condition.clone()).count(&*txn).await?;
        if page.is_past_end() {
            return Ok(PageResult::new(Vec::new(), total_count));
        }

        let mut query = E::find();
        if let Some(associations) = associations {
            query = associations(query);
        }
        query = query.filter(condition);
        for (column, direction) in order {
            query = query.order_by(column, direction);
        }
        if let Some(limit) = page.limit() {
            query = query.offset(page.offset()).limit(limit);
        }

        let items = query.all(&*txn).await?;

        Ok(PageResult::new(items, total_count))
    }

    async fn count(&self, filter: Option<&F>) -> AppResult<u64> {
        let condition = match Self::criteria(filter) {
            Criteria::Match(condition) => condition,
            Criteria::Suppress => return Ok(0),
        };

        let txn = self.tx.connection().await?;
        Ok(E::find().filter(condition).count(&*txn).await?)
    }

    async fn exists(&self, filter: Option<&F>) -> AppResult<bool> {
        let condition = match Self::criteria(filter) {
            Criteria::Match(condition) => condition,
            Criteria::Suppress => return Ok(false),
        };

        let txn = self.tx.connection().await?;
        let found = E::find().filter(condition).limit(1).one(&*txn).await?;
        Ok(found.is_some())
    }

    async fn save(&self, mut record: E::Model, params: &ExtraParams) -> AppResult<E::Model> {
        let txn = self.tx.connection().await?;
        let ctx = HookContext::new(&txn, params);

        let original = if record.is_new() {
            None
        } else {
            let stored = E::find()
                .filter(E::match_by_id(record.id()))
                .one(&*txn)
                .await?
                .ok_or_else(|| AppError::not_found(entity_name::<E>(), record.id()))?;
            Some(stored)
        };

        self.validate(&ctx, &record, original.as_ref()).await?;

        for hook in &self.hooks {
            if hook.saving(&ctx, &mut record, original.as_ref()).await? == SaveAction::Skip {
                tracing::debug!(
                    entity = %entity_name::<E>(),
                    id = %record.id(),
                    "Save suppressed by hook"
                );
                return Ok(record);
            }
        }

        // Write every column, including values set by hooks.
        let persisted = if record.is_new() {
            record.set_id(Uuid::new_v4());
            record.into_active_model().reset_all().insert(&*txn).await?
        } else {
            record.into_active_model().reset_all().update(&*txn).await?
        };

        for hook in &self.hooks {
            hook.saved(&ctx, &persisted, original.as_ref()).await?;
        }

        Ok(persisted)
    }

    async fn delete(&self, record: E::Model, params: &ExtraParams) -> AppResult<E::Model> {
        let txn = self.tx.connection().await?;
        let ctx = HookContext::new(&txn, params);

        for hook in &self.hooks {
            hook.deleting(&ctx, &record).await?;
        }

        let result = E::delete_many()
            .filter(E::match_by_id(record.id()))
            .exec(&*txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(AppError::not_found(entity_name::<E>(), record.id()));
        }

        for hook in &self.hooks {
            hook.deleted(&ctx, &record).await?;
        }

        Ok(record)
    }
}
