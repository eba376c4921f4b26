//! Shared fixtures: sample entities, filters, models and a fresh in-memory
//! database per test.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ConnectionTrait, EntityTrait, Schema};
use uuid::Uuid;

use common::DatabaseConfig;
use data_access::audit::{AuditTrail, SystemActor};
use data_access::service::copy_identity;
use data_access::{
    AppResult, Criteria, Database, EntityFilter, EntityStore, HookContext, MatchAll, ModelMapper,
    Transaction,
};
use domain::{AuditFields, EntityModelPair, Record, SoftDeletable, Trackable, TransportModel};

pub mod product {
    use sea_orm::entity::prelude::*;
    use validator::Validate;

    #[derive(Clone, Debug, PartialEq, Eq, Default, DeriveEntityModel, Validate)]
    #[sea_orm(table_name = "products")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        #[validate(length(min = 1, message = "name is required"))]
        pub name: String,
        #[validate(range(min = 0, message = "price must not be negative"))]
        pub price: i64,
        pub created_by_id: Uuid,
        pub created_at: ChronoDateTimeUtc,
        pub modified_by_id: Option<Uuid>,
        pub modified_at: Option<ChronoDateTimeUtc>,
        pub is_deleted: bool,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

pub mod tag {
    use sea_orm::entity::prelude::*;
    use validator::Validate;

    #[derive(Clone, Debug, PartialEq, Eq, Default, DeriveEntityModel, Validate)]
    #[sea_orm(table_name = "tags")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: Uuid,
        pub label: String,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

impl Trackable for product::Model {
    fn audit(&self) -> AuditFields {
        AuditFields {
            created_by_id: self.created_by_id,
            created_at: self.created_at,
            modified_by_id: self.modified_by_id,
            modified_at: self.modified_at,
        }
    }

    fn set_audit(&mut self, audit: AuditFields) {
        self.created_by_id = audit.created_by_id;
        self.created_at = audit.created_at;
        self.modified_by_id = audit.modified_by_id;
        self.modified_at = audit.modified_at;
    }
}

impl SoftDeletable for product::Model {
    fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    fn set_deleted(&mut self, deleted: bool) {
        self.is_deleted = deleted;
    }
}

impl Record for product::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn as_trackable(&self) -> Option<&dyn Trackable> {
        Some(self)
    }

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        Some(self)
    }

    fn as_soft_deletable_mut(&mut self) -> Option<&mut dyn SoftDeletable> {
        Some(self)
    }
}

impl data_access::RecordEntity for product::Entity {}

impl Record for tag::Model {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

impl data_access::RecordEntity for tag::Entity {}

/// Product search criteria. An empty `ids` list can match nothing.
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub ids: Option<Vec<Uuid>>,
    pub name: Option<String>,
    pub min_price: Option<i64>,
    pub deleted: Option<bool>,
}

impl ProductFilter {
    pub fn named(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn ids(ids: Vec<Uuid>) -> Self {
        Self {
            ids: Some(ids),
            ..Self::default()
        }
    }
}

impl EntityFilter<product::Entity> for ProductFilter {
    fn criteria(&self) -> Criteria {
        use sea_orm::{ColumnTrait, Condition};

        let mut condition = Condition::all();
        if let Some(ids) = &self.ids {
            if ids.is_empty() {
                return Criteria::Suppress;
            }
            condition = condition.add(product::Column::Id.is_in(ids.clone()));
        }
        if let Some(name) = &self.name {
            condition = condition.add(product::Column::Name.eq(name.as_str()));
        }
        if let Some(min_price) = self.min_price {
            condition = condition.add(product::Column::Price.gte(min_price));
        }
        if let Some(deleted) = self.deleted {
            condition = condition.add(product::Column::IsDeleted.eq(deleted));
        }
        Criteria::Match(condition)
    }
}

pub type ProductStore = EntityStore<product::Entity, product::ActiveModel, ProductFilter>;
pub type TagStore = EntityStore<tag::Entity, tag::ActiveModel, MatchAll>;

/// Transport model for products
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductModel {
    pub id: Uuid,
    pub name: String,
    pub price: i64,
    pub audit: AuditFields,
}

impl Trackable for ProductModel {
    fn audit(&self) -> AuditFields {
        self.audit
    }

    fn set_audit(&mut self, audit: AuditFields) {
        self.audit = audit;
    }
}

impl TransportModel for ProductModel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }

    fn as_trackable_mut(&mut self) -> Option<&mut dyn Trackable> {
        Some(self)
    }
}

pub struct ProductMapper;

#[async_trait]
impl ModelMapper<product::Model, ProductModel> for ProductMapper {
    async fn to_models(
        &self,
        _ctx: &HookContext<'_>,
        pairs: &mut [EntityModelPair<product::Model, ProductModel>],
    ) -> AppResult<()> {
        for pair in pairs.iter_mut() {
            copy_identity(&pair.entity, &mut pair.model);
            pair.model.name = pair.entity.name.clone();
            pair.model.price = pair.entity.price;
        }
        Ok(())
    }

    async fn to_entities(
        &self,
        _ctx: &HookContext<'_>,
        pairs: &mut [EntityModelPair<product::Model, ProductModel>],
    ) -> AppResult<()> {
        for pair in pairs.iter_mut() {
            pair.entity.name = pair.model.name.clone();
            pair.entity.price = pair.model.price;
        }
        Ok(())
    }
}

/// Transport model for tags
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagModel {
    pub id: Uuid,
    pub label: String,
}

impl TransportModel for TagModel {
    fn id(&self) -> Uuid {
        self.id
    }

    fn set_id(&mut self, id: Uuid) {
        self.id = id;
    }
}

pub struct TagMapper;

#[async_trait]
impl ModelMapper<tag::Model, TagModel> for TagMapper {
    async fn to_models(
        &self,
        _ctx: &HookContext<'_>,
        pairs: &mut [EntityModelPair<tag::Model, TagModel>],
    ) -> AppResult<()> {
        for pair in pairs.iter_mut() {
            pair.model.id = pair.entity.id;
            pair.model.label = pair.entity.label.clone();
        }
        Ok(())
    }

    async fn to_entities(
        &self,
        _ctx: &HookContext<'_>,
        pairs: &mut [EntityModelPair<tag::Model, TagModel>],
    ) -> AppResult<()> {
        for pair in pairs.iter_mut() {
            pair.entity.label = pair.model.label.clone();
        }
        Ok(())
    }
}

/// Fresh in-memory database with the sample tables created.
pub async fn setup_db() -> Database {
    common::telemetry::init_tracing("warn");

    let db = Database::connect(&DatabaseConfig::in_memory())
        .await
        .expect("Failed to open in-memory database");

    let conn = db.connection();
    let backend = conn.get_database_backend();
    let schema = Schema::new(backend);
    create_table(conn, &schema, product::Entity).await;
    create_table(conn, &schema, tag::Entity).await;

    db
}

async fn create_table<E: EntityTrait>(
    conn: &sea_orm::DatabaseConnection,
    schema: &Schema,
    entity: E,
) {
    let backend = conn.get_database_backend();
    conn.execute(backend.build(&schema.create_table_from_entity(entity)))
        .await
        .expect("Failed to create table");
}

/// Idle unit of work on `db`
pub fn new_tx(db: &Database) -> Arc<Transaction> {
    Arc::new(db.transaction())
}

/// Product repository stamping audit fields as `actor`
pub fn audited_products(tx: &Arc<Transaction>, actor: Uuid) -> ProductStore {
    ProductStore::new(tx.clone()).with_hook(Arc::new(AuditTrail::new(Arc::new(
        SystemActor::new(actor),
    ))))
}

pub fn product(name: &str, price: i64) -> product::Model {
    product::Model {
        name: name.to_string(),
        price,
        ..Default::default()
    }
}
