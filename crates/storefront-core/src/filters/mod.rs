//! ============================================================================
//! Filters Module - Filter/category selection state machine
//! ============================================================================
//! Two-phase (draft/applied) state for the filter modal and the category
//! drawer, plus the derived "active" and "count" queries used for chips and
//! badges.
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_core::filters::{FilterStore, SetMember};
//!
//! let mut filters = FilterStore::default();
//! filters.open();
//! filters.draft_mut().toggle_member(SetMember::Brand("Brio".into()));
//! filters.apply();
//! assert_eq!(filters.applied().active_count(), 1);
//! ```
//! ============================================================================

mod categories;
mod staged;
mod state;

pub use categories::{CategorySelection, EVERYTHING};
pub use staged::Staged;
pub use state::{
    ActiveFacet, Facet, FacetValue, FilterState, LocationRange, NumericRange, SetMember, SortBy,
    DEFAULT_AGE_RANGE, DEFAULT_LOCATION_MILES, DEFAULT_PRICE_RANGE,
};

/// Filter modal state
pub type FilterStore = Staged<FilterState>;

/// Category drawer state
pub type CategoryStore = Staged<CategorySelection>;
