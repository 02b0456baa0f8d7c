//! ============================================================================
//! Like Store - Local favorites with optimistic server sync
//! ============================================================================
//! Toggle protocol:
//! 1. remember whether the id was liked
//! 2. apply the flip locally (subscribers see it at once)
//! 3. call the server
//! 4. on failure restore the remembered membership for that id
//!
//! Restoring the remembered value, rather than flipping again, keeps the
//! state right when the same id is toggled again before the failure lands.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::ids::FavoriteIds;
use super::sync::FavoritesSync;
use crate::store::{Persist, StateContainer};

/// Persisted portion of the like store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LikeState {
    pub ids: FavoriteIds,
}

impl Persist for LikeState {
    fn partialize(&self) -> serde_json::Value {
        serde_json::json!({ "ids": self.ids })
    }

    fn rehydrate(&mut self, value: serde_json::Value) {
        match serde_json::from_value::<LikeState>(value) {
            Ok(restored) => self.ids = restored.ids,
            Err(e) => warn!("Ignoring malformed persisted likes: {}", e),
        }
    }
}

/// Result of a toggle once the server has answered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Membership after the toggle (restored value if the sync failed)
    pub liked: bool,
    pub synced: bool,
}

pub struct LikeStore {
    state: StateContainer<LikeState>,
    sync: Option<Arc<dyn FavoritesSync>>,
}

impl LikeStore {
    /// Local-only store
    pub fn new() -> Self {
        Self {
            state: StateContainer::default(),
            sync: None,
        }
    }

    /// Store mirrored to a server
    pub fn with_sync(sync: Arc<dyn FavoritesSync>) -> Self {
        Self {
            state: StateContainer::default(),
            sync: Some(sync),
        }
    }

    pub fn container(&self) -> &StateContainer<LikeState> {
        &self.state
    }

    pub fn ids(&self) -> FavoriteIds {
        self.state.with_state(|s| s.ids.clone())
    }

    pub fn is_liked(&self, id: &str) -> bool {
        self.state.with_state(|s| s.ids.contains(id))
    }

    pub fn subscribe(&self) -> watch::Receiver<LikeState> {
        self.state.subscribe()
    }

    pub async fn toggle(&self, id: &str) -> ToggleOutcome {
        let was_liked = self.is_liked(id);
        self.set_membership(id, !was_liked);

        let Some(sync) = &self.sync else {
            return ToggleOutcome {
                liked: !was_liked,
                synced: false,
            };
        };

        let result = if was_liked {
            sync.remove(id).await
        } else {
            sync.add(id).await
        };

        match result {
            Ok(_) => {
                debug!("Favorite {} synced (liked: {})", id, !was_liked);
                ToggleOutcome {
                    liked: !was_liked,
                    synced: true,
                }
            }
            Err(e) => {
                warn!("Favorite sync failed for {}, restoring: {}", id, e);
                self.set_membership(id, was_liked);
                ToggleOutcome {
                    liked: was_liked,
                    synced: false,
                }
            }
        }
    }

    /// Replace local ids with the server's list; keep local ids if that fails
    pub async fn hydrate(&self) -> bool {
        let Some(sync) = &self.sync else {
            return false;
        };

        match sync.fetch().await {
            Ok(ids) => {
                debug!("Hydrated {} favorites from server", ids.len());
                self.state.update(|s| s.ids = ids);
                true
            }
            Err(e) => {
                warn!("Could not load favorites from server: {}", e);
                false
            }
        }
    }

    fn set_membership(&self, id: &str, liked: bool) {
        self.state.update(|s| {
            if liked {
                s.ids.insert(id);
            } else {
                s.ids.remove(id);
            }
        });
    }
}

impl Default for LikeStore {
    fn default() -> Self {
        Self::new()
    }
}
