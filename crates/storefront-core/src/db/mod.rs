// ============================================================================
// LocalStore - Embedded Database (redb)
// ============================================================================
// Persisted slices of the client stores (applied filters, applied categories,
// liked ids), one JSON snapshot per key.
// Default path: ~/.storefront/state.redb (override via STOREFRONT_DB_PATH)
// ============================================================================

pub mod types;

pub use types::{keys, DbStats};

use anyhow::{anyhow, Result};
use redb::{Database, ReadableTable, TableDefinition};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::store::{Persist, StateContainer};

const SNAPSHOTS: TableDefinition<&str, &[u8]> = TableDefinition::new("snapshots");

/// Embedded snapshot store for client state
pub struct LocalStore {
    db: Database,
    path: PathBuf,
}

impl LocalStore {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses STOREFRONT_DB_PATH or ~/.storefront/state.redb
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let db_path = if let Some(p) = path {
            p.to_path_buf()
        } else if let Ok(env_path) = std::env::var("STOREFRONT_DB_PATH") {
            PathBuf::from(env_path)
        } else {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
            let dir = home.join(".storefront");
            std::fs::create_dir_all(&dir)
                .map_err(|e| anyhow!("Failed to create .storefront directory: {}", e))?;
            dir.join("state.redb")
        };

        info!("Opening local store at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to create snapshots table: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self { db, path: db_path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    // ========================================================================
    // Snapshot Operations
    // ========================================================================

    pub fn save_snapshot(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| anyhow!("Failed to serialize snapshot {}: {}", key, e))?;

        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn.open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;
            table.insert(key, bytes.as_slice())
                .map_err(|e| anyhow!("Failed to insert snapshot: {}", e))?;
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Saved snapshot {} ({} bytes)", key, bytes.len());
        Ok(())
    }

    /// Stored snapshot for `key`; unreadable JSON counts as absent
    pub fn load_snapshot(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(SNAPSHOTS)
            .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;

        match table.get(key).map_err(|e| anyhow!("Failed to get snapshot: {}", e))? {
            Some(value) => match serde_json::from_slice(value.value()) {
                Ok(json) => Ok(Some(json)),
                Err(e) => {
                    warn!("Ignoring unreadable snapshot {}: {}", key, e);
                    Ok(None)
                }
            },
            None => Ok(None),
        }
    }

    pub fn delete_snapshot(&self, key: &str) -> Result<bool> {
        let write_txn = self.db.begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        let removed;
        {
            let mut table = write_txn.open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;
            removed = table.remove(key)
                .map_err(|e| anyhow!("Failed to remove snapshot: {}", e))?
                .is_some();
        }
        write_txn.commit().map_err(|e| anyhow!("Failed to commit delete: {}", e))?;

        if removed {
            debug!("Deleted snapshot: {}", key);
        }
        Ok(removed)
    }

    pub fn list_keys(&self) -> Result<Vec<String>> {
        Ok(self.sizes()?.into_iter().map(|(key, _)| key).collect())
    }

    pub fn stats(&self) -> Result<DbStats> {
        let sizes = self.sizes()?;
        Ok(DbStats {
            snapshot_count: sizes.len(),
            total_bytes: sizes.iter().map(|(_, n)| n).sum(),
            sizes,
        })
    }

    fn sizes(&self) -> Result<Vec<(String, usize)>> {
        let read_txn = self.db.begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn.open_table(SNAPSHOTS)
            .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;

        let mut sizes = Vec::new();
        for entry in table.range::<&str>(..)
            .map_err(|e| anyhow!("Failed to iterate snapshots: {}", e))?
        {
            let (key, value) = entry.map_err(|e| anyhow!("Failed to read snapshot: {}", e))?;
            sizes.push((key.value().to_string(), value.value().len()));
        }
        Ok(sizes)
    }

    // ========================================================================
    // Store Bridge
    // ========================================================================

    /// Write the container's persisted slice under `key`
    pub fn persist<T: Clone + Persist>(&self, container: &StateContainer<T>, key: &str) -> Result<()> {
        self.save_snapshot(key, &container.partialize())
    }

    /// Rehydrate the container from `key`; returns whether a snapshot existed
    pub fn restore<T: Clone + Persist>(&self, container: &StateContainer<T>, key: &str) -> Result<bool> {
        match self.load_snapshot(key)? {
            Some(value) => {
                container.rehydrate(value);
                debug!("Restored {} from local store", key);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::LikeState;
    use crate::filters::{FilterStore, SetMember};

    fn open_temp() -> (tempfile::TempDir, LocalStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::open(Some(dir.path().join("state.redb").as_path())).unwrap();
        (dir, store)
    }

    #[test]
    fn test_snapshot_crud() {
        let (_dir, store) = open_temp();
        assert!(store.load_snapshot("likes").unwrap().is_none());

        store
            .save_snapshot("likes", &serde_json::json!({ "ids": ["1"] }))
            .unwrap();
        store.save_snapshot("filters", &serde_json::json!({})).unwrap();
        assert_eq!(
            store.load_snapshot("likes").unwrap(),
            Some(serde_json::json!({ "ids": ["1"] }))
        );
        assert_eq!(store.list_keys().unwrap(), vec!["filters", "likes"]);

        let stats = store.stats().unwrap();
        assert_eq!(stats.snapshot_count, 2);
        assert_eq!(stats.total_bytes, 2 + r#"{"ids":["1"]}"#.len());

        assert!(store.delete_snapshot("likes").unwrap());
        assert!(!store.delete_snapshot("likes").unwrap());
        assert_eq!(store.list_keys().unwrap(), vec!["filters"]);
    }

    #[test]
    fn test_persist_and_restore_filters() {
        let (_dir, store) = open_temp();

        let container: StateContainer<FilterStore> = StateContainer::default();
        container.update(|f| {
            f.open();
            f.draft_mut().toggle_member(SetMember::Brand("Brio".into()));
            f.apply();
            f.open();
            f.draft_mut().toggle_member(SetMember::Brand("Lego".into()));
        });
        store.persist(&container, keys::FILTERS).unwrap();

        let restored: StateContainer<FilterStore> = StateContainer::default();
        assert!(store.restore(&restored, keys::FILTERS).unwrap());
        let state = restored.get_state();
        assert_eq!(state.applied().brands, vec!["Brio".to_string()]);
        assert!(!state.is_editing());
    }

    #[test]
    fn test_restore_missing_key_keeps_defaults() {
        let (_dir, store) = open_temp();
        let likes: StateContainer<LikeState> = StateContainer::default();
        assert!(!store.restore(&likes, keys::LIKES).unwrap());
        assert!(likes.get_state().ids.is_empty());
    }

    #[test]
    fn test_reopen_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.redb");
        {
            let store = LocalStore::open(Some(path.as_path())).unwrap();
            store.save_snapshot("likes", &serde_json::json!({ "ids": [] })).unwrap();
        }
        let store = LocalStore::open(Some(path.as_path())).unwrap();
        assert_eq!(store.list_keys().unwrap(), vec!["likes"]);
    }
}
