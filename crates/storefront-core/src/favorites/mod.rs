//! ============================================================================
//! Favorites Module - Liked item ids, local and mirrored
//! ============================================================================
//! - `FavoriteIds`: insertion-ordered id set, also the cookie payload
//! - `LikeStore`: observable local set with optimistic server sync
//! - `HttpFavoritesSync`: client for `/api/favorites`
//! - `pull_favorites`: refresh the persisted likes through that client
//! ============================================================================

mod ids;
mod likes;
mod pull;
mod sync;

pub use ids::{
    decode_cookie_value, encode_cookie_value, find_cookie, ids_from_cookie_header, ids_from_json,
    set_cookie_header, FavoriteIds, FAVORITES_COOKIE, FAVORITES_COOKIE_MAX_AGE,
};
pub use likes::{LikeState, LikeStore, ToggleOutcome};
pub use pull::pull_favorites;
pub use sync::{FavoritesSync, HttpFavoritesSync, IdsPayload, FAVORITES_PATH};
