//! ============================================================================
//! Catalog Index - Inverted lookups over the in-memory catalog
//! ============================================================================
//! Three tables, each preserving catalog order:
//! - seller id -> items
//! - category id -> items
//! - (category id, lowercased brand) -> items
//!
//! `IndexCache` rebuilds only when it is handed a different catalog `Arc`.
//! ============================================================================

use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::types::CatalogItem;

pub type Catalog = Arc<Vec<CatalogItem>>;

/// Positions into the backing catalog, grouped by key
pub struct CatalogIndex {
    catalog: Catalog,
    by_seller: HashMap<String, Vec<usize>>,
    by_category: HashMap<String, Vec<usize>>,
    by_category_brand: HashMap<(String, String), Vec<usize>>,
}

impl CatalogIndex {
    pub fn build(catalog: Catalog) -> Self {
        let mut by_seller: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_category: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_category_brand: HashMap<(String, String), Vec<usize>> = HashMap::new();

        for (pos, item) in catalog.iter().enumerate() {
            by_seller
                .entry(item.seller.user_id.clone())
                .or_default()
                .push(pos);
            by_category
                .entry(item.category_id.clone())
                .or_default()
                .push(pos);
            if let Some(brand) = item.brand_key() {
                by_category_brand
                    .entry((item.category_id.clone(), brand))
                    .or_default()
                    .push(pos);
            }
        }

        debug!(
            "Built catalog index: {} items, {} sellers, {} categories",
            catalog.len(),
            by_seller.len(),
            by_category.len()
        );

        Self {
            catalog,
            by_seller,
            by_category,
            by_category_brand,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn get(&self, id: &str) -> Option<&CatalogItem> {
        self.catalog.iter().find(|item| item.id == id)
    }

    pub fn by_seller(&self, seller_id: &str) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.resolve(self.by_seller.get(seller_id))
    }

    pub fn by_category(&self, category_id: &str) -> impl Iterator<Item = &CatalogItem> + '_ {
        self.resolve(self.by_category.get(category_id))
    }

    /// `brand` is matched case-insensitively
    pub fn by_category_brand(
        &self,
        category_id: &str,
        brand: &str,
    ) -> impl Iterator<Item = &CatalogItem> + '_ {
        let key = (category_id.to_string(), brand.trim().to_lowercase());
        self.resolve(self.by_category_brand.get(&key))
    }

    fn resolve<'a>(
        &'a self,
        positions: Option<&'a Vec<usize>>,
    ) -> impl Iterator<Item = &'a CatalogItem> + 'a {
        positions
            .into_iter()
            .flatten()
            .filter_map(move |pos| self.catalog.get(*pos))
    }
}

/// Session-owned cache of the index, keyed by catalog identity
#[derive(Default)]
pub struct IndexCache {
    built: Option<Arc<CatalogIndex>>,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index for `catalog`, rebuilt only if the backing `Arc` changed
    pub fn get(&mut self, catalog: &Catalog) -> Arc<CatalogIndex> {
        if let Some(index) = &self.built {
            if Arc::ptr_eq(index.catalog(), catalog) {
                return index.clone();
            }
        }

        let index = Arc::new(CatalogIndex::build(catalog.clone()));
        self.built = Some(index.clone());
        index
    }

    pub fn invalidate(&mut self) {
        self.built = None;
    }
}
