//! ============================================================================
//! State Container - Observable state with a persisted allow-list
//! ============================================================================
//! Each store (filters, categories, likes) lives in its own container owned
//! by the session. Mutations are a single atomic replacement that notifies
//! every subscriber; there is no ambient global instance.
//! ============================================================================

use tokio::sync::watch;

/// Serialization allow-list for the persisted subset of a store
pub trait Persist {
    /// JSON of the fields that survive a reload
    fn partialize(&self) -> serde_json::Value;

    /// Restore from `partialize` output. Malformed input leaves the state untouched.
    fn rehydrate(&mut self, value: serde_json::Value);
}

/// Observable state container: get / set / update / subscribe
pub struct StateContainer<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> StateContainer<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _receiver) = watch::channel(initial);
        Self { sender }
    }

    /// Snapshot of the current state
    pub fn get_state(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Read without cloning
    pub fn with_state<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    /// Replace the whole state
    pub fn set_state(&self, state: T) {
        self.sender.send_replace(state);
    }

    /// Mutate in place; subscribers see one change
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Receiver that observes every subsequent mutation
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone + Default> Default for StateContainer<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + Persist> StateContainer<T> {
    pub fn partialize(&self) -> serde_json::Value {
        self.sender.borrow().partialize()
    }

    pub fn rehydrate(&self, value: serde_json::Value) {
        self.sender.send_modify(|state| state.rehydrate(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FacetValue, FilterStore};

    #[test]
    fn test_get_set_update() {
        let container = StateContainer::new(0u32);
        container.set_state(5);
        assert_eq!(container.get_state(), 5);
        container.update(|n| *n *= 2);
        assert_eq!(container.get_state(), 10);
        assert_eq!(container.with_state(|n| *n + 1), 11);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let container: StateContainer<FilterStore> = StateContainer::default();
        let mut rx = container.subscribe();

        container.update(|f| {
            f.open();
            f.draft_mut().set_facet(FacetValue::OnSale(true));
            f.apply();
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().applied().on_sale);
    }

    #[test]
    fn test_persist_roundtrip_through_container() {
        let container: StateContainer<FilterStore> = StateContainer::default();
        container.update(|f| f.applied_mut().set_facet(FacetValue::SmokeFree(true)));

        let saved = container.partialize();
        let fresh: StateContainer<FilterStore> = StateContainer::default();
        fresh.rehydrate(saved);
        assert!(fresh.get_state().applied().smoke_free);
        assert!(fresh.get_state().draft().smoke_free);
    }
}
