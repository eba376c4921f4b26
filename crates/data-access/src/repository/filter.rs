//! Query building blocks supplied by record and filter types.

use sea_orm::{
    sea_query::Order, ColumnTrait, Condition, EntityTrait, Iterable, PrimaryKeyToColumn, Select,
};
use uuid::Uuid;

use domain::SortDirection;

/// Customization applied to the base query before any filtering, used for
/// joins or projections a record type needs on every read.
pub type Associations<E> = dyn Fn(Select<E>) -> Select<E> + Send + Sync;

/// What a filter turns into.
#[derive(Debug, Clone)]
pub enum Criteria {
    /// Run the query with this predicate
    Match(Condition),
    /// The result is known to be empty; skip the store entirely
    Suppress,
}

impl Criteria {
    /// Predicate matching every record
    pub fn all() -> Self {
        Criteria::Match(Condition::all())
    }
}

/// Type-specific search criteria for the records of entity `E`.
///
/// `Default` must produce the match-everything filter: it is used whenever a
/// caller passes no filter at all.
pub trait EntityFilter<E: EntityTrait>: Default + Send + Sync + 'static {
    fn criteria(&self) -> Criteria {
        Criteria::all()
    }
}

/// Filter that matches every record of any entity.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchAll;

impl<E: EntityTrait> EntityFilter<E> for MatchAll {}

/// Record-type query customization: how an id is matched and how a sort
/// field name maps to a column.
pub trait RecordEntity: EntityTrait {
    /// Predicate selecting the record with `id`. Defaults to the primary key.
    fn match_by_id(id: Uuid) -> Condition {
        Self::PrimaryKey::iter().fold(Condition::all(), |cond, key| {
            cond.add(key.into_column().eq(id))
        })
    }

    /// Column ordered by for a sort field, None if the field is unknown.
    /// Defaults to the column of the same name.
    fn order_column(field: &str) -> Option<Self::Column> {
        field.trim().parse().ok()
    }
}

pub(crate) fn order_of(direction: SortDirection) -> Order {
    match direction {
        SortDirection::Asc => Order::Asc,
        SortDirection::Desc => Order::Desc,
    }
}
