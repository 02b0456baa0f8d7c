//! ============================================================================
//! Bundle Calculator - Same-seller bundle selection and pricing
//! ============================================================================
//! Candidates are the seller's other `bundleDeal` items (no cap). The focal
//! item is always part of the bundle. Two or more items earn 15% off, rounded
//! to the nearest whole currency unit.
//! ============================================================================

use serde::Serialize;
use tracing::debug;

use crate::suggestions::CatalogIndex;
use crate::types::CatalogItem;

/// Discount in percent once the bundle reaches `BUNDLE_MIN_ITEMS`
pub const BUNDLE_DISCOUNT_PERCENT: u64 = 15;

/// Minimum selected items before the discount applies
pub const BUNDLE_MIN_ITEMS: usize = 2;

/// Price breakdown for the current selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleQuote {
    pub item_count: usize,
    pub subtotal: u64,
    pub discount: u64,
    pub total: u64,
}

impl BundleQuote {
    pub fn from_prices(prices: &[u64]) -> Self {
        let subtotal = prices.iter().fold(0u64, |acc, p| acc.saturating_add(*p));
        let discount = if prices.len() >= BUNDLE_MIN_ITEMS {
            // round half up: (x * 15 + 50) / 100, widened so large catalogs cannot overflow
            let wide = (u128::from(subtotal) * u128::from(BUNDLE_DISCOUNT_PERCENT) + 50) / 100;
            u64::try_from(wide).unwrap_or(u64::MAX)
        } else {
            0
        };

        Self {
            item_count: prices.len(),
            subtotal,
            discount,
            total: subtotal.saturating_sub(discount),
        }
    }
}

/// Selectable bundle seeded with the focal item
#[derive(Debug, Clone)]
pub struct Bundle<'a> {
    focal: &'a CatalogItem,
    candidates: Vec<&'a CatalogItem>,
    selected: Vec<String>,
}

impl<'a> Bundle<'a> {
    /// `None` unless the product itself is flagged as a bundle deal
    pub fn for_product(index: &'a CatalogIndex, product_id: &str) -> Option<Self> {
        let focal = index.get(product_id)?;
        if !focal.bundle_deal {
            return None;
        }

        let candidates: Vec<&CatalogItem> = index
            .by_seller(focal.seller_id())
            .filter(|item| item.bundle_deal && item.id != focal.id)
            .collect();

        debug!(
            "Bundle for {}: {} candidates from seller {}",
            focal.id,
            candidates.len(),
            focal.seller_id()
        );

        Some(Self {
            focal,
            candidates,
            selected: vec![focal.id.clone()],
        })
    }

    pub fn focal(&self) -> &CatalogItem {
        self.focal
    }

    pub fn candidates(&self) -> &[&'a CatalogItem] {
        &self.candidates
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Add or remove a candidate. The focal item and unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) {
        if id == self.focal.id || !self.candidates.iter().any(|c| c.id == id) {
            return;
        }
        match self.selected.iter().position(|s| s == id) {
            Some(pos) => {
                self.selected.remove(pos);
            }
            None => self.selected.push(id.to_string()),
        }
    }

    /// Selected items, focal first
    pub fn selected_items(&self) -> Vec<&'a CatalogItem> {
        std::iter::once(self.focal)
            .chain(self.candidates.iter().copied().filter(|c| self.is_selected(&c.id)))
            .collect()
    }

    pub fn quote(&self) -> BundleQuote {
        let prices: Vec<u64> = self
            .selected_items()
            .iter()
            .map(|item| item.price_value())
            .collect();
        BundleQuote::from_prices(&prices)
    }
}
