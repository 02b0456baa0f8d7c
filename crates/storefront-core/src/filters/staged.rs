//! ============================================================================
//! Staged - Draft / applied pair behind every editing surface
//! ============================================================================
//! The draft is a deep clone of the applied value taken whenever a modal or
//! drawer opens. Draft edits never reach `applied` until `apply()`; `cancel()`
//! throws the draft away by re-cloning from `applied`.
//! ============================================================================

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::store::Persist;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Staged<T> {
    applied: T,
    draft: T,
    editing: bool,
}

impl<T: Clone> Staged<T> {
    pub fn new(applied: T) -> Self {
        Self {
            draft: applied.clone(),
            applied,
            editing: false,
        }
    }

    /// Re-initialize the draft from `applied` and mark the surface as editing
    pub fn open(&mut self) {
        self.initialize_draft();
        self.editing = true;
    }

    /// draft := deep clone of applied
    pub fn initialize_draft(&mut self) {
        self.draft = self.applied.clone();
        debug!("Draft initialized from applied state");
    }

    /// applied := draft; closes the editing surface
    pub fn apply(&mut self) {
        self.applied = self.draft.clone();
        self.editing = false;
        debug!("Draft applied");
    }

    /// Discard draft edits
    pub fn cancel(&mut self) {
        self.initialize_draft();
        self.editing = false;
    }

    pub fn applied(&self) -> &T {
        &self.applied
    }

    pub fn applied_mut(&mut self) -> &mut T {
        &mut self.applied
    }

    pub fn draft(&self) -> &T {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut T {
        &mut self.draft
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }
}

/// Only the applied side is persisted; the draft is rebuilt on load
#[derive(Serialize, Deserialize)]
struct PersistedStaged<T> {
    applied: T,
}

impl<T> Persist for Staged<T>
where
    T: Clone + Serialize + DeserializeOwned,
{
    fn partialize(&self) -> serde_json::Value {
        serde_json::to_value(PersistedStaged {
            applied: &self.applied,
        })
        .unwrap_or(serde_json::Value::Null)
    }

    fn rehydrate(&mut self, value: serde_json::Value) {
        match serde_json::from_value::<PersistedStaged<T>>(value) {
            Ok(persisted) => {
                self.applied = persisted.applied;
                self.initialize_draft();
                self.editing = false;
            }
            Err(e) => warn!("Ignoring malformed persisted state: {}", e),
        }
    }
}
