//! ============================================================================
//! Feed Search - Narrow and order the catalog by the applied filters
//! ============================================================================
//! Only facets that map onto a catalog attribute narrow the feed. Gender,
//! age, distance, sizes, in-stock and on-sale have no item attribute in the
//! catalog and are ignored here.
//! ============================================================================

use tracing::debug;

use crate::filters::{CategorySelection, FilterState, SortBy};
use crate::types::CatalogItem;

/// Whether `item` passes every applicable facet
pub fn matches_filters(item: &CatalogItem, filters: &FilterState) -> bool {
    let defaults = FilterState::default();

    if filters.price_range != defaults.price_range {
        let price = i64::try_from(item.price_value()).unwrap_or(i64::MAX);
        if !filters.price_range.contains(price) {
            return false;
        }
    }

    if let Some(condition) = filters.item_condition {
        if item.condition != condition {
            return false;
        }
    }

    if let Some(threshold) = filters.seller_rating {
        if item.seller_rating < threshold {
            return false;
        }
    }

    if !filters.brands.is_empty() {
        let brand = item.brand_key();
        let hit = filters
            .brands
            .iter()
            .any(|b| brand.as_deref() == Some(b.trim().to_lowercase().as_str()));
        if !hit {
            return false;
        }
    }

    if !filters.shipping_methods.is_empty()
        && !filters
            .shipping_methods
            .iter()
            .any(|m| item.shipping_methods.contains(m))
    {
        return false;
    }

    (!filters.pet_free || item.pet_free)
        && (!filters.smoke_free || item.smoke_free)
        && (!filters.perfume_free || item.perfume_free)
        && (!filters.bundle_deal || item.bundle_deal)
}

fn matches_query(item: &CatalogItem, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    item.title.to_lowercase().contains(&needle)
        || item
            .brand
            .as_deref()
            .is_some_and(|b| b.to_lowercase().contains(&needle))
}

/// Filtered and ordered view of the catalog
pub fn search_feed<'a>(
    items: &'a [CatalogItem],
    filters: &FilterState,
    categories: &CategorySelection,
    query: &str,
) -> Vec<&'a CatalogItem> {
    let mut result: Vec<&CatalogItem> = items
        .iter()
        .filter(|item| categories.matches(&item.category_id, item.subcategory_id.as_deref()))
        .filter(|item| matches_filters(item, filters))
        .filter(|item| matches_query(item, query))
        .collect();

    // sort_by is stable, so ties keep catalog order
    match filters.sort_by {
        SortBy::Recommended => {}
        SortBy::PriceLowToHigh => result.sort_by_key(|item| item.price_value()),
        SortBy::PriceHighToLow => {
            result.sort_by(|a, b| b.price_value().cmp(&a.price_value()))
        }
        SortBy::SellerRating => result.sort_by(|a, b| b.seller_rating.total_cmp(&a.seller_rating)),
    }

    debug!(
        "Feed search: {} of {} items (query: {:?})",
        result.len(),
        items.len(),
        query
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{FacetValue, NumericRange, SetMember};
    use crate::types::fixtures::item;
    use crate::types::{Condition, ShippingMethod};

    fn catalog() -> Vec<CatalogItem> {
        let mut a = item("1", "s1", "toys", Some("Brio"), "£30");
        a.pet_free = true;
        a.seller_rating = 4.9;
        let mut b = item("2", "s2", "toys", Some("Lego"), "£80");
        b.condition = Condition::New;
        b.shipping_methods = vec![ShippingMethod::Express];
        let mut c = item("3", "s3", "books", None, "£5");
        c.subcategory_id = Some("picture".into());
        c.seller_rating = 3.0;
        let d = item("4", "s1", "toys", Some("brio"), "£12");
        vec![a, b, c, d]
    }

    fn ids(items: &[&CatalogItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_defaults_return_everything_in_order() {
        let items = catalog();
        let result = search_feed(&items, &FilterState::default(), &CategorySelection::default(), "");
        assert_eq!(ids(&result), vec!["1", "2", "3", "4"]);
    }

    #[test]
    fn test_brand_is_case_insensitive() {
        let items = catalog();
        let mut filters = FilterState::default();
        filters.toggle_member(SetMember::Brand("BRIO".into()));
        let result = search_feed(&items, &filters, &CategorySelection::default(), "");
        assert_eq!(ids(&result), vec!["1", "4"]);
    }

    #[test]
    fn test_price_condition_and_flags() {
        let items = catalog();
        let mut filters = FilterState::default();
        filters.set_facet(FacetValue::PriceRange(NumericRange::new(10, 50)));
        assert_eq!(
            ids(&search_feed(&items, &filters, &CategorySelection::default(), "")),
            vec!["1", "4"]
        );

        filters.set_facet(FacetValue::PetFree(true));
        assert_eq!(
            ids(&search_feed(&items, &filters, &CategorySelection::default(), "")),
            vec!["1"]
        );

        let mut filters = FilterState::default();
        filters.set_facet(FacetValue::ItemCondition(Some(Condition::New)));
        filters.toggle_member(SetMember::Shipping(ShippingMethod::Express));
        assert_eq!(
            ids(&search_feed(&items, &filters, &CategorySelection::default(), "")),
            vec!["2"]
        );
    }

    #[test]
    fn test_categories_and_query() {
        let items = catalog();
        let mut categories = CategorySelection::default();
        categories.toggle_category("books");
        categories.toggle_subcategory("books", "picture");
        let result = search_feed(&items, &FilterState::default(), &categories, "");
        assert_eq!(ids(&result), vec!["3"]);

        let result = search_feed(
            &items,
            &FilterState::default(),
            &CategorySelection::default(),
            "lego",
        );
        assert_eq!(ids(&result), vec!["2"]);
    }

    #[test]
    fn test_sorting() {
        let items = catalog();
        let mut filters = FilterState::default();
        filters.set_facet(FacetValue::SortBy(SortBy::PriceLowToHigh));
        let result = search_feed(&items, &filters, &CategorySelection::default(), "");
        assert_eq!(ids(&result), vec!["3", "4", "1", "2"]);

        filters.set_facet(FacetValue::SortBy(SortBy::PriceHighToLow));
        let result = search_feed(&items, &filters, &CategorySelection::default(), "");
        assert_eq!(ids(&result), vec!["2", "1", "4", "3"]);

        filters.set_facet(FacetValue::SortBy(SortBy::SellerRating));
        filters.set_facet(FacetValue::SellerRating(Some(4.0)));
        let result = search_feed(&items, &filters, &CategorySelection::default(), "");
        assert_eq!(ids(&result), vec!["1", "2", "4"]);
    }
}
