//! ============================================================================
//! Suggestions Module - Seller suggestion selector
//! ============================================================================
//! Given a focal product and the catalog, produces the "more from this
//! seller" and "you may also like" lists and picks a presentation mode from
//! the seller's tier.
//!
//! ## Usage
//! ```rust,ignore
//! use storefront_core::suggestions::{plan_suggestions, IndexCache, SuggestionLimits};
//!
//! let mut cache = IndexCache::new();
//! let index = cache.get(&catalog);
//! let plan = plan_suggestions(&index, &product, tier, SuggestionLimits::default());
//! ```
//! ============================================================================

mod index;
mod plan;
mod selector;

pub use index::{Catalog, CatalogIndex, IndexCache};
pub use plan::{
    plan_suggestions, RevealControl, RevealWindow, SuggestionLimits, SuggestionPlan,
    INITIAL_VISIBLE, LABEL_NO_MORE_FROM_SELLER, LABEL_YOU_MAY_ALSO_LIKE, REVEAL_STEP,
};
pub use selector::{seller_items, similar_items};
