// ============================================================================
// Favorites Pull - Refresh persisted likes from the favorites API
// ============================================================================

use anyhow::{anyhow, Result};
use std::sync::Arc;
use tracing::info;

use super::ids::FavoriteIds;
use super::likes::LikeStore;
use super::sync::HttpFavoritesSync;
use crate::db::{keys, LocalStore};

/// Restore local likes, present them to the server as the `favorites`
/// cookie, replace them with the server's answer and persist the result.
/// Local likes are left untouched when the server cannot be reached.
pub async fn pull_favorites(store: &LocalStore, api_base_url: &str) -> Result<FavoriteIds> {
    let sync = Arc::new(HttpFavoritesSync::new(api_base_url)?);
    let likes = LikeStore::with_sync(sync.clone());
    store.restore(likes.container(), keys::LIKES)?;
    sync.seed_cookie(&likes.ids())?;

    if !likes.hydrate().await {
        return Err(anyhow!("Could not reach {}", api_base_url));
    }
    store.persist(likes.container(), keys::LIKES)?;

    let ids = likes.ids();
    info!("Pulled {} favorites from {}", ids.len(), api_base_url);
    Ok(ids)
}
