//! ============================================================================
//! Catalog Loader - One-time load of the in-memory catalog
//! ============================================================================
//! At most one fetch is ever in flight: a call while a load is running, or
//! after items are present, is a no-op. Each successful load publishes a new
//! `Arc`, which is what invalidates the suggestion index cache.
//! ============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::suggestions::Catalog;
use crate::types::CatalogItem;

/// Where catalog items come from
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<CatalogItem>>;
}

/// JSON array of items on disk
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for JsonFileSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        debug!("Reading catalog from {}", self.path.display());
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| anyhow!("Failed to read catalog {}: {}", self.path.display(), e))?;
        serde_json::from_str(&raw)
            .map_err(|e| anyhow!("Failed to parse catalog {}: {}", self.path.display(), e))
    }
}

/// Fixed item list, for mocks and tests
pub struct StaticSource {
    items: Vec<CatalogItem>,
}

impl StaticSource {
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn fetch(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }
}

/// What `ensure_loaded` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(usize),
    AlreadyLoaded,
    InFlight,
}

struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct CatalogLoader {
    source: Arc<dyn CatalogSource>,
    items: RwLock<Catalog>,
    loading: AtomicBool,
}

impl CatalogLoader {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            items: RwLock::new(Arc::new(Vec::new())),
            loading: AtomicBool::new(false),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Current catalog (empty until loaded)
    pub async fn items(&self) -> Catalog {
        self.items.read().await.clone()
    }

    pub async fn ensure_loaded(&self) -> Result<LoadOutcome> {
        if !self.items.read().await.is_empty() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            debug!("Catalog load already in flight");
            return Ok(LoadOutcome::InFlight);
        }
        // Cleared on every exit, including when this future is dropped mid-fetch
        let _guard = LoadingGuard(&self.loading);

        // A load may have finished between the emptiness check and the flag swap
        if !self.items.read().await.is_empty() {
            return Ok(LoadOutcome::AlreadyLoaded);
        }

        let items = self.source.fetch().await?;
        let count = items.len();
        *self.items.write().await = Arc::new(items);
        info!("Catalog loaded: {} items", count);
        Ok(LoadOutcome::Loaded(count))
    }

    /// Drop the loaded items so the next `ensure_loaded` fetches again
    pub async fn reset(&self) {
        *self.items.write().await = Arc::new(Vec::new());
    }
}
