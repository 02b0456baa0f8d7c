//! ============================================================================
//! Suggestion Selector - "More from this seller" and "You may also like"
//! ============================================================================
//! Both lists are deterministic: catalog order, no shuffling.
//! ============================================================================

use std::collections::HashSet;

use super::index::CatalogIndex;
use crate::types::CatalogItem;

/// Up to `max` of the seller's items, skipping `exclude_id`
pub fn seller_items<'a>(
    index: &'a CatalogIndex,
    seller_id: &str,
    exclude_id: &str,
    max: usize,
) -> Vec<&'a CatalogItem> {
    index
        .by_seller(seller_id)
        .filter(|item| item.id != exclude_id)
        .take(max)
        .collect()
}

/// Same category + brand first, then same category; never the focal item
/// or anything from the focal item's seller.
pub fn similar_items<'a>(
    index: &'a CatalogIndex,
    product: &CatalogItem,
    max: usize,
) -> Vec<&'a CatalogItem> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut result = Vec::new();

    let brand_matches: Box<dyn Iterator<Item = &'a CatalogItem> + 'a> = match product.brand_key() {
        Some(brand) => Box::new(index.by_category_brand(&product.category_id, &brand)),
        None => Box::new(std::iter::empty()),
    };
    let candidates = brand_matches.chain(index.by_category(&product.category_id));

    for item in candidates {
        if result.len() >= max {
            break;
        }
        if item.id == product.id || item.seller_id() == product.seller_id() {
            continue;
        }
        if seen.insert(item.id.as_str()) {
            result.push(item);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::fixtures::item;
    use std::sync::Arc;

    fn index() -> CatalogIndex {
        CatalogIndex::build(Arc::new(vec![
            item("1", "s1", "toys", Some("Brio"), "£10"),
            item("2", "s2", "toys", Some("Lego"), "£12"),
            item("3", "s1", "toys", Some("Brio"), "£3"),
            item("4", "s3", "toys", Some("brio"), "£40"),
            item("5", "s1", "books", None, "£5"),
            item("6", "s4", "toys", None, "£8"),
            item("7", "s2", "books", None, "£2"),
        ]))
    }

    #[test]
    fn test_seller_items_excludes_focal_and_caps() {
        let index = index();
        let ids: Vec<_> = seller_items(&index, "s1", "1", 10)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "5"]);

        assert_eq!(seller_items(&index, "s1", "1", 1).len(), 1);
        assert!(seller_items(&index, "s1", "1", 0).is_empty());
    }

    #[test]
    fn test_similar_ranks_brand_before_category() {
        let index = index();
        let focal = index.get("1").unwrap().clone();
        let ids: Vec<_> = similar_items(&index, &focal, 10)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        // 4 is the only same-brand item from another seller; 2 and 6 follow
        assert_eq!(ids, vec!["4", "2", "6"]);
    }

    #[test]
    fn test_similar_never_includes_focal_or_same_seller() {
        let index = index();
        for focal in index.catalog().iter() {
            for item in similar_items(&index, focal, 100) {
                assert_ne!(item.id, focal.id);
                assert_ne!(item.seller_id(), focal.seller_id());
            }
        }
    }

    #[test]
    fn test_similar_caps_and_dedups() {
        let index = index();
        let focal = index.get("1").unwrap().clone();
        assert_eq!(similar_items(&index, &focal, 2).len(), 2);

        let all = similar_items(&index, &focal, 100);
        let unique: HashSet<_> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(unique.len(), all.len());
    }

    #[test]
    fn test_similar_without_brand_uses_category() {
        let index = index();
        let focal = index.get("5").unwrap().clone();
        let ids: Vec<_> = similar_items(&index, &focal, 10)
            .iter()
            .map(|i| i.id.as_str())
            .collect();
        assert_eq!(ids, vec!["7"]);
    }
}
