//! Query value objects: sorting, paging and paged results.

use serde::{Deserialize, Serialize};

use crate::constants::{BLANK_SORT_FIELD_MESSAGE, DEFAULT_PAGE_NUMBER};
use crate::error::{DomainError, DomainResult};

/// Sort direction of a single sort key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One sort key. A list of sorts is applied in order: the first entry is the
/// primary key, every following entry breaks ties of the ones before it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl Sort {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// A sort entry needs a non-blank field name.
    pub fn validate(&self) -> DomainResult<()> {
        if self.field.trim().is_empty() {
            return Err(DomainError::invalid_sort(BLANK_SORT_FIELD_MESSAGE));
        }
        Ok(())
    }
}

/// Validate every entry of a sort list.
pub fn validate_sorts(sorts: &[Sort]) -> DomainResult<()> {
    sorts.iter().try_for_each(Sort::validate)
}

/// Page request. Both parts are optional: the number defaults to the first
/// page and an absent size means "unbounded".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Page {
    #[serde(default)]
    pub number: Option<u64>,
    #[serde(default)]
    pub size: Option<u64>,
}

impl Page {
    pub fn new(number: u64, size: u64) -> Self {
        Self {
            number: Some(number),
            size: Some(size),
        }
    }

    /// First page with the given size
    pub fn sized(size: u64) -> Self {
        Self {
            number: None,
            size: Some(size),
        }
    }

    /// 1-based page number; 0 is treated as the first page
    pub fn number(&self) -> u64 {
        self.number.unwrap_or(DEFAULT_PAGE_NUMBER).max(DEFAULT_PAGE_NUMBER)
    }

    /// Maximum number of items on the page, None when unbounded
    pub fn limit(&self) -> Option<u64> {
        self.size
    }

    /// Number of matching items to skip before this page
    pub fn offset(&self) -> u64 {
        match self.size {
            Some(size) => (self.number() - 1).saturating_mul(size),
            None => 0,
        }
    }

    /// An unbounded page holds every match, so any page after the first is
    /// empty.
    pub fn is_past_end(&self) -> bool {
        self.size.is_none() && self.number() > DEFAULT_PAGE_NUMBER
    }
}

/// One page of items plus the total number of matches ignoring paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total_count: u64,
}

impl<T> PageResult<T> {
    pub fn new(items: Vec<T>, total_count: u64) -> Self {
        Self { items, total_count }
    }

    /// Result of a query known to match nothing
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for PageResult<T> {
    fn default() -> Self {
        Self::empty()
    }
}
