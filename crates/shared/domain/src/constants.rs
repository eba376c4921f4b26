//! Domain-level constants.
//!
//! These constants define paging defaults and fixed validation messages.

// =============================================================================
// Pagination
// =============================================================================

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u64 = 1;

/// Page size used to fetch the first match of a filter
pub const FIRST_MATCH_PAGE_SIZE: u64 = 1;

/// Page size used to prove a match is unique (a second row means "not unique")
pub const UNIQUE_MATCH_PAGE_SIZE: u64 = 2;

// =============================================================================
// Validation
// =============================================================================

/// Message reported when a sort entry carries no field name
pub const BLANK_SORT_FIELD_MESSAGE: &str = "A sorting field is either null or empty";
