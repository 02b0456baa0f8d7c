//! ============================================================================
//! Suggestion Plan - Presentation mode chosen from seller tier
//! ============================================================================
//! | tier     | seller has more | presentation                              |
//! |----------|-----------------|-------------------------------------------|
//! | premium  | no              | similar shelf, "No more items from seller"|
//! | freemium | no              | similar shelf, "You may also like"        |
//! | freemium | yes             | one blended shelf (seller ++ similar)     |
//! | premium  | yes             | paginated seller grid + similar shelf     |
//! ============================================================================

use serde::Serialize;
use tracing::debug;

use super::index::CatalogIndex;
use super::selector::{seller_items, similar_items};
use crate::types::{CatalogItem, SellerTier};

pub const LABEL_NO_MORE_FROM_SELLER: &str = "No more items from seller";
pub const LABEL_YOU_MAY_ALSO_LIKE: &str = "You may also like";

/// Seller grid starts with this many cards visible
pub const INITIAL_VISIBLE: usize = 4;

/// Each "show more" reveals this many more
pub const REVEAL_STEP: usize = 10;

/// Caps for the two candidate lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestionLimits {
    pub seller_max: usize,
    pub similar_max: usize,
}

impl Default for SuggestionLimits {
    fn default() -> Self {
        Self {
            seller_max: 24,
            similar_max: 12,
        }
    }
}

/// What the product page renders below the listing
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SuggestionPlan<'a> {
    /// One "similar items" shelf with a heading
    SimilarOnly {
        label: &'static str,
        items: Vec<&'a CatalogItem>,
    },
    /// Seller items followed by similar items, no visual distinction
    Blended { items: Vec<&'a CatalogItem> },
    /// Paginated seller grid plus a separate similar shelf
    Split {
        seller: Vec<&'a CatalogItem>,
        window: RevealWindow,
        similar: Vec<&'a CatalogItem>,
    },
}

impl<'a> SuggestionPlan<'a> {
    pub fn mode_name(&self) -> &'static str {
        match self {
            SuggestionPlan::SimilarOnly { .. } => "similar_only",
            SuggestionPlan::Blended { .. } => "blended",
            SuggestionPlan::Split { .. } => "split",
        }
    }
}

/// Pick the presentation for `product` given its seller's tier
pub fn plan_suggestions<'a>(
    index: &'a CatalogIndex,
    product: &CatalogItem,
    tier: SellerTier,
    limits: SuggestionLimits,
) -> SuggestionPlan<'a> {
    let from_seller = seller_items(index, product.seller_id(), &product.id, limits.seller_max);
    let similar = similar_items(index, product, limits.similar_max);
    let has_more = !from_seller.is_empty();

    debug!(
        "Suggestions for {}: tier={:?} seller_items={} similar={}",
        product.id,
        tier,
        from_seller.len(),
        similar.len()
    );

    match (tier, has_more) {
        (SellerTier::Premium, false) => SuggestionPlan::SimilarOnly {
            label: LABEL_NO_MORE_FROM_SELLER,
            items: similar,
        },
        (SellerTier::Freemium, false) => SuggestionPlan::SimilarOnly {
            label: LABEL_YOU_MAY_ALSO_LIKE,
            items: similar,
        },
        (SellerTier::Freemium, true) => {
            let mut items = from_seller;
            items.extend(similar);
            SuggestionPlan::Blended { items }
        }
        (SellerTier::Premium, true) => SuggestionPlan::Split {
            window: RevealWindow::new(from_seller.len()),
            seller: from_seller,
            similar,
        },
    }
}

// ============================================================================
// Reveal Window
// ============================================================================

/// Which control sits under the seller grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealControl {
    None,
    ShowMore,
    ShowLess,
}

/// Visibility cursor over already-resident items
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RevealWindow {
    visible: usize,
    total: usize,
}

impl RevealWindow {
    pub fn new(total: usize) -> Self {
        Self {
            visible: INITIAL_VISIBLE.min(total),
            total,
        }
    }

    pub fn visible(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_expanded(&self) -> bool {
        self.visible >= self.total
    }

    pub fn show_more(&mut self) {
        self.visible = (self.visible + REVEAL_STEP).min(self.total);
    }

    pub fn show_less(&mut self) {
        self.visible = INITIAL_VISIBLE.min(self.total);
    }

    /// Show more until fully expanded, then collapse
    pub fn toggle(&mut self) {
        match self.control() {
            RevealControl::ShowMore => self.show_more(),
            RevealControl::ShowLess => self.show_less(),
            RevealControl::None => {}
        }
    }

    pub fn control(&self) -> RevealControl {
        if self.total <= INITIAL_VISIBLE {
            RevealControl::None
        } else if self.is_expanded() {
            RevealControl::ShowLess
        } else {
            RevealControl::ShowMore
        }
    }

    pub fn slice<'s, T>(&self, items: &'s [T]) -> &'s [T] {
        &items[..self.visible.min(items.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::item;
    use std::sync::Arc;

    fn index() -> CatalogIndex {
        CatalogIndex::build(Arc::new(vec![
            item("1", "s1", "toys", Some("Brio"), "£10"),
            item("2", "s1", "toys", None, "£12"),
            item("3", "s2", "toys", Some("Brio"), "£3"),
            item("4", "s3", "toys", None, "£40"),
            item("5", "s9", "books", None, "£5"),
        ]))
    }

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_premium_without_more() {
        let index = index();
        let focal = index.get("5").unwrap().clone();
        let plan = plan_suggestions(&index, &focal, SellerTier::Premium, SuggestionLimits::default());
        match plan {
            SuggestionPlan::SimilarOnly { label, items } => {
                assert_eq!(label, LABEL_NO_MORE_FROM_SELLER);
                assert!(items.is_empty());
            }
            other => panic!("unexpected plan {:?}", other.mode_name()),
        }
    }

    #[test]
    fn test_freemium_without_more() {
        let index = index();
        let focal = index.get("3").unwrap().clone();
        let plan = plan_suggestions(&index, &focal, SellerTier::Freemium, SuggestionLimits::default());
        match plan {
            SuggestionPlan::SimilarOnly { label, items } => {
                assert_eq!(label, LABEL_YOU_MAY_ALSO_LIKE);
                assert_eq!(ids(&items), vec!["1", "2", "4"]);
            }
            other => panic!("unexpected plan {:?}", other.mode_name()),
        }
    }

    #[test]
    fn test_freemium_with_more_blends() {
        let index = index();
        let focal = index.get("1").unwrap().clone();
        let plan = plan_suggestions(&index, &focal, SellerTier::Freemium, SuggestionLimits::default());
        match plan {
            SuggestionPlan::Blended { items } => assert_eq!(ids(&items), vec!["2", "3", "4"]),
            other => panic!("unexpected plan {:?}", other.mode_name()),
        }
    }

    #[test]
    fn test_premium_with_more_splits() {
        let index = index();
        let focal = index.get("1").unwrap().clone();
        let plan = plan_suggestions(&index, &focal, SellerTier::Premium, SuggestionLimits::default());
        match plan {
            SuggestionPlan::Split {
                seller,
                window,
                similar,
            } => {
                assert_eq!(ids(&seller), vec!["2"]);
                assert_eq!(ids(&similar), vec!["3", "4"]);
                assert_eq!(window.control(), RevealControl::None);
            }
            other => panic!("unexpected plan {:?}", other.mode_name()),
        }
    }

    #[test]
    fn test_reveal_window_cycle() {
        let mut window = RevealWindow::new(17);
        assert_eq!(window.visible(), 4);
        assert_eq!(window.control(), RevealControl::ShowMore);

        window.toggle();
        assert_eq!(window.visible(), 14);
        assert_eq!(window.control(), RevealControl::ShowMore);

        window.toggle();
        assert_eq!(window.visible(), 17);
        assert_eq!(window.control(), RevealControl::ShowLess);

        window.toggle();
        assert_eq!(window.visible(), 4);

        let items: Vec<u32> = (0..17).collect();
        assert_eq!(window.slice(&items).len(), 4);
    }

    #[test]
    fn test_reveal_window_small_total() {
        let mut window = RevealWindow::new(3);
        assert_eq!(window.visible(), 3);
        assert_eq!(window.control(), RevealControl::None);
        window.toggle();
        assert_eq!(window.visible(), 3);
    }
}
