//! ============================================================================
//! STOREFRONT-CORE: Marketplace client state engines
//! ============================================================================
//! This crate holds the logic behind the storefront screens:
//! - Filter and category selection with draft/applied staging
//! - Seller suggestions and tier-driven presentation plans
//! - Bundle discount quotes
//! - Favorites (cookie codec, optimistic sync) and local persistence via redb
//! ============================================================================

pub mod bundle;
pub mod catalog;
pub mod config;
pub mod db;
pub mod favorites;
pub mod feed;
pub mod filters;
pub mod sellers;
pub mod store;
pub mod suggestions;
pub mod types;

// Re-export main types for convenience
pub use types::*;
pub use bundle::{Bundle, BundleQuote};
pub use catalog::{CatalogLoader, CatalogSource, JsonFileSource, LoadOutcome, StaticSource};
pub use config::StorefrontConfig;
pub use db::{DbStats, LocalStore};
pub use favorites::{FavoriteIds, FavoritesSync, HttpFavoritesSync, LikeStore};
pub use feed::search_feed;
pub use filters::{CategoryStore, FilterStore};
pub use sellers::SellerDirectory;
pub use store::{Persist, StateContainer};
pub use suggestions::{plan_suggestions, CatalogIndex, IndexCache, SuggestionPlan};
