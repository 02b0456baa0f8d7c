//! ============================================================================
//! Filter State - Facet values, defaults and derived queries
//! ============================================================================
//! Every facet has a documented default. A facet is "active" when its value
//! differs from that default; the whole state is active when any facet is.
//! Range inputs are stored exactly as given (no clamping, inverted ranges
//! pass through).
//! ============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::{Condition, ShippingMethod};

/// Default age range in years
pub const DEFAULT_AGE_RANGE: NumericRange = NumericRange { lo: 0, hi: 16 };

/// Default price range in whole currency units
pub const DEFAULT_PRICE_RANGE: NumericRange = NumericRange { lo: 0, hi: 1000 };

/// Default search radius in miles
pub const DEFAULT_LOCATION_MILES: u32 = 25;

/// Inclusive numeric range fed by a two-thumb slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericRange {
    pub lo: i64,
    pub hi: i64,
}

impl NumericRange {
    pub fn new(lo: i64, hi: i64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, value: i64) -> bool {
        value >= self.lo && value <= self.hi
    }
}

/// Search radius; `is_set` tracks whether the user touched the slider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationRange {
    pub miles: u32,
    pub is_set: bool,
}

impl Default for LocationRange {
    fn default() -> Self {
        Self {
            miles: DEFAULT_LOCATION_MILES,
            is_set: false,
        }
    }
}

/// Feed ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Recommended,
    PriceLowToHigh,
    PriceHighToLow,
    SellerRating,
}

impl SortBy {
    pub fn display_name(&self) -> &'static str {
        match self {
            SortBy::Recommended => "Recommended",
            SortBy::PriceLowToHigh => "Price: low to high",
            SortBy::PriceHighToLow => "Price: high to low",
            SortBy::SellerRating => "Seller rating",
        }
    }
}

impl std::str::FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "recommended" => Ok(SortBy::Recommended),
            "price-asc" | "price-low-to-high" => Ok(SortBy::PriceLowToHigh),
            "price-desc" | "price-high-to-low" => Ok(SortBy::PriceHighToLow),
            "rating" | "seller-rating" => Ok(SortBy::SellerRating),
            _ => Err(format!("Unknown sort order: {}", s)),
        }
    }
}

// ============================================================================
// Facet identifiers
// ============================================================================

/// One independent filter dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Facet {
    Gender,
    AgeRange,
    PriceRange,
    LocationRange,
    SortBy,
    InStock,
    OnSale,
    ItemCondition,
    SellerRating,
    Sizes,
    Brands,
    ShippingMethods,
    PetFree,
    SmokeFree,
    PerfumeFree,
    BundleDeal,
}

impl Facet {
    /// Canonical order, also the chip order
    pub const ALL: [Facet; 16] = [
        Facet::Gender,
        Facet::AgeRange,
        Facet::PriceRange,
        Facet::LocationRange,
        Facet::SortBy,
        Facet::InStock,
        Facet::OnSale,
        Facet::ItemCondition,
        Facet::SellerRating,
        Facet::Sizes,
        Facet::Brands,
        Facet::ShippingMethods,
        Facet::PetFree,
        Facet::SmokeFree,
        Facet::PerfumeFree,
        Facet::BundleDeal,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            Facet::Gender => "Gender",
            Facet::AgeRange => "Age",
            Facet::PriceRange => "Price",
            Facet::LocationRange => "Distance",
            Facet::SortBy => "Sort",
            Facet::InStock => "In stock",
            Facet::OnSale => "On sale",
            Facet::ItemCondition => "Condition",
            Facet::SellerRating => "Seller rating",
            Facet::Sizes => "Sizes",
            Facet::Brands => "Brands",
            Facet::ShippingMethods => "Shipping",
            Facet::PetFree => "Pet-free home",
            Facet::SmokeFree => "Smoke-free home",
            Facet::PerfumeFree => "Perfume-free home",
            Facet::BundleDeal => "Bundle deal",
        }
    }
}

/// A value assignment for `FilterState::set_facet`
#[derive(Debug, Clone, PartialEq)]
pub enum FacetValue {
    Gender(Vec<String>),
    AgeRange(NumericRange),
    PriceRange(NumericRange),
    /// Sets the radius and marks the location as chosen
    Location(u32),
    SortBy(SortBy),
    InStock(bool),
    OnSale(bool),
    /// `None` means all conditions
    ItemCondition(Option<Condition>),
    /// Minimum seller rating; `None` disables the threshold
    SellerRating(Option<f32>),
    Sizes(Vec<String>),
    Brands(Vec<String>),
    ShippingMethods(Vec<ShippingMethod>),
    PetFree(bool),
    SmokeFree(bool),
    PerfumeFree(bool),
    BundleDeal(bool),
}

/// A member of one of the set-valued facets
#[derive(Debug, Clone, PartialEq)]
pub enum SetMember {
    Gender(String),
    Size(String),
    Brand(String),
    Shipping(ShippingMethod),
}

/// One rendered chip for an active facet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActiveFacet {
    pub facet: Facet,
    pub label: String,
}

// ============================================================================
// Filter State
// ============================================================================

/// Complete set of facet values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterState {
    pub gender: Vec<String>,
    pub age_range: NumericRange,
    pub price_range: NumericRange,
    pub location_range: LocationRange,
    pub sort_by: SortBy,
    pub in_stock: bool,
    pub on_sale: bool,
    pub item_condition: Option<Condition>,
    pub seller_rating: Option<f32>,
    pub sizes: Vec<String>,
    pub brands: Vec<String>,
    pub shipping_methods: Vec<ShippingMethod>,
    pub pet_free: bool,
    pub smoke_free: bool,
    pub perfume_free: bool,
    pub bundle_deal: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            gender: Vec::new(),
            age_range: DEFAULT_AGE_RANGE,
            price_range: DEFAULT_PRICE_RANGE,
            location_range: LocationRange::default(),
            sort_by: SortBy::Recommended,
            in_stock: false,
            on_sale: false,
            item_condition: None,
            seller_rating: None,
            sizes: Vec::new(),
            brands: Vec::new(),
            shipping_methods: Vec::new(),
            pet_free: false,
            smoke_free: false,
            perfume_free: false,
            bundle_deal: false,
        }
    }
}

impl FilterState {
    pub fn set_facet(&mut self, value: FacetValue) {
        debug!("Setting facet {:?}", value);
        match value {
            FacetValue::Gender(v) => self.gender = v,
            FacetValue::AgeRange(r) => self.age_range = r,
            FacetValue::PriceRange(r) => self.price_range = r,
            FacetValue::Location(miles) => {
                self.location_range = LocationRange {
                    miles,
                    is_set: true,
                }
            }
            FacetValue::SortBy(s) => self.sort_by = s,
            FacetValue::InStock(b) => self.in_stock = b,
            FacetValue::OnSale(b) => self.on_sale = b,
            FacetValue::ItemCondition(c) => self.item_condition = c,
            FacetValue::SellerRating(r) => self.seller_rating = r,
            FacetValue::Sizes(v) => self.sizes = v,
            FacetValue::Brands(v) => self.brands = v,
            FacetValue::ShippingMethods(v) => self.shipping_methods = v,
            FacetValue::PetFree(b) => self.pet_free = b,
            FacetValue::SmokeFree(b) => self.smoke_free = b,
            FacetValue::PerfumeFree(b) => self.perfume_free = b,
            FacetValue::BundleDeal(b) => self.bundle_deal = b,
        }
    }

    /// Add the member if absent, remove it if present
    pub fn toggle_member(&mut self, member: SetMember) {
        match member {
            SetMember::Gender(v) => toggle(&mut self.gender, v),
            SetMember::Size(v) => toggle(&mut self.sizes, v),
            SetMember::Brand(v) => toggle(&mut self.brands, v),
            SetMember::Shipping(v) => toggle(&mut self.shipping_methods, v),
        }
    }

    /// Reset one facet to its default (location also drops `is_set`)
    pub fn clear_facet(&mut self, facet: Facet) {
        let defaults = FilterState::default();
        match facet {
            Facet::Gender => self.gender = defaults.gender,
            Facet::AgeRange => self.age_range = defaults.age_range,
            Facet::PriceRange => self.price_range = defaults.price_range,
            Facet::LocationRange => self.location_range = defaults.location_range,
            Facet::SortBy => self.sort_by = defaults.sort_by,
            Facet::InStock => self.in_stock = defaults.in_stock,
            Facet::OnSale => self.on_sale = defaults.on_sale,
            Facet::ItemCondition => self.item_condition = defaults.item_condition,
            Facet::SellerRating => self.seller_rating = defaults.seller_rating,
            Facet::Sizes => self.sizes = defaults.sizes,
            Facet::Brands => self.brands = defaults.brands,
            Facet::ShippingMethods => self.shipping_methods = defaults.shipping_methods,
            Facet::PetFree => self.pet_free = defaults.pet_free,
            Facet::SmokeFree => self.smoke_free = defaults.smoke_free,
            Facet::PerfumeFree => self.perfume_free = defaults.perfume_free,
            Facet::BundleDeal => self.bundle_deal = defaults.bundle_deal,
        }
    }

    pub fn clear_all(&mut self) {
        *self = FilterState::default();
    }

    pub fn is_facet_active(&self, facet: Facet) -> bool {
        match facet {
            Facet::Gender => !self.gender.is_empty(),
            Facet::AgeRange => self.age_range != DEFAULT_AGE_RANGE,
            Facet::PriceRange => self.price_range != DEFAULT_PRICE_RANGE,
            Facet::LocationRange => self.location_range != LocationRange::default(),
            Facet::SortBy => self.sort_by != SortBy::default(),
            Facet::InStock => self.in_stock,
            Facet::OnSale => self.on_sale,
            Facet::ItemCondition => self.item_condition.is_some(),
            Facet::SellerRating => self.seller_rating.is_some(),
            Facet::Sizes => !self.sizes.is_empty(),
            Facet::Brands => !self.brands.is_empty(),
            Facet::ShippingMethods => !self.shipping_methods.is_empty(),
            Facet::PetFree => self.pet_free,
            Facet::SmokeFree => self.smoke_free,
            Facet::PerfumeFree => self.perfume_free,
            Facet::BundleDeal => self.bundle_deal,
        }
    }

    pub fn is_active(&self) -> bool {
        Facet::ALL.iter().any(|f| self.is_facet_active(*f))
    }

    /// Number of active facets; a set facet counts once however many members it has
    pub fn active_count(&self) -> usize {
        Facet::ALL.iter().filter(|f| self.is_facet_active(**f)).count()
    }

    /// Chips for every active facet in canonical order
    pub fn active_facets(&self) -> Vec<ActiveFacet> {
        Facet::ALL
            .iter()
            .filter(|f| self.is_facet_active(**f))
            .map(|f| ActiveFacet {
                facet: *f,
                label: self.chip_label(*f),
            })
            .collect()
    }

    fn chip_label(&self, facet: Facet) -> String {
        let name = facet.display_name();
        match facet {
            Facet::Gender => format!("{}: {}", name, self.gender.join(", ")),
            Facet::AgeRange => format!("{}: {}-{}", name, self.age_range.lo, self.age_range.hi),
            Facet::PriceRange => format!("{}: {}-{}", name, self.price_range.lo, self.price_range.hi),
            Facet::LocationRange => format!("Within {} miles", self.location_range.miles),
            Facet::SortBy => format!("{}: {}", name, self.sort_by.display_name()),
            Facet::ItemCondition => match self.item_condition {
                Some(c) => format!("{}: {}", name, c.display_name()),
                None => name.to_string(),
            },
            Facet::SellerRating => match self.seller_rating {
                Some(r) => format!("{}: {}+", name, r),
                None => name.to_string(),
            },
            Facet::Sizes => format!("{}: {}", name, self.sizes.join(", ")),
            Facet::Brands => format!("{}: {}", name, self.brands.join(", ")),
            Facet::ShippingMethods => format!("{}: {}", name, self.shipping_methods.len()),
            Facet::InStock
            | Facet::OnSale
            | Facet::PetFree
            | Facet::SmokeFree
            | Facet::PerfumeFree
            | Facet::BundleDeal => name.to_string(),
        }
    }
}

fn toggle<T: PartialEq>(set: &mut Vec<T>, value: T) {
    match set.iter().position(|v| *v == value) {
        Some(pos) => {
            set.remove(pos);
        }
        None => set.push(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn everything_set() -> FilterState {
        let mut state = FilterState::default();
        state.set_facet(FacetValue::Gender(vec!["girls".into()]));
        state.set_facet(FacetValue::AgeRange(NumericRange::new(2, 5)));
        state.set_facet(FacetValue::PriceRange(NumericRange::new(10, 200)));
        state.set_facet(FacetValue::Location(10));
        state.set_facet(FacetValue::SortBy(SortBy::PriceHighToLow));
        state.set_facet(FacetValue::InStock(true));
        state.set_facet(FacetValue::OnSale(true));
        state.set_facet(FacetValue::ItemCondition(Some(Condition::New)));
        state.set_facet(FacetValue::SellerRating(Some(4.0)));
        state.set_facet(FacetValue::Sizes(vec!["3-4y".into()]));
        state.set_facet(FacetValue::Brands(vec!["Brio".into()]));
        state.set_facet(FacetValue::ShippingMethods(vec![ShippingMethod::Pickup]));
        state.set_facet(FacetValue::PetFree(true));
        state.set_facet(FacetValue::SmokeFree(true));
        state.set_facet(FacetValue::PerfumeFree(true));
        state.set_facet(FacetValue::BundleDeal(true));
        state
    }

    #[test]
    fn test_default_is_inactive() {
        let state = FilterState::default();
        assert!(!state.is_active());
        assert_eq!(state.active_count(), 0);
        assert!(state.active_facets().is_empty());
    }

    #[test]
    fn test_clear_facet_resets_every_facet() {
        let defaults = FilterState::default();
        for facet in Facet::ALL {
            let mut state = everything_set();
            assert!(state.is_facet_active(facet), "{:?} should start active", facet);
            state.clear_facet(facet);
            assert!(!state.is_facet_active(facet), "{:?} still active", facet);

            let mut expected = everything_set();
            expected.clear_facet(facet);
            // Only the cleared facet moved back to its default
            assert_eq!(state, expected);
        }

        let mut state = everything_set();
        for facet in Facet::ALL {
            state.clear_facet(facet);
        }
        assert_eq!(state, defaults);
    }

    #[test]
    fn test_clear_location_drops_is_set() {
        let mut state = FilterState::default();
        state.set_facet(FacetValue::Location(25));
        assert!(state.location_range.is_set);
        assert!(state.is_facet_active(Facet::LocationRange));

        state.clear_facet(Facet::LocationRange);
        assert_eq!(state.location_range.miles, 25);
        assert!(!state.location_range.is_set);
    }

    #[test]
    fn test_clear_all() {
        let mut state = everything_set();
        assert_eq!(state.active_count(), 16);
        state.clear_all();
        assert_eq!(state, FilterState::default());
    }

    #[test]
    fn test_toggle_member_twice_restores_set() {
        let mut state = FilterState::default();
        state.set_facet(FacetValue::Brands(vec!["Brio".into(), "Lego".into()]));
        let before = state.clone();

        state.toggle_member(SetMember::Brand("Hape".into()));
        assert_eq!(state.brands, vec!["Brio", "Lego", "Hape"]);
        state.toggle_member(SetMember::Brand("Hape".into()));
        assert_eq!(state, before);

        state.toggle_member(SetMember::Brand("Brio".into()));
        state.toggle_member(SetMember::Brand("Brio".into()));
        assert_eq!(state.brands, vec!["Lego", "Brio"]);

        state.toggle_member(SetMember::Shipping(ShippingMethod::Express));
        state.toggle_member(SetMember::Shipping(ShippingMethod::Express));
        assert!(state.shipping_methods.is_empty());
    }

    #[test]
    fn test_count_is_per_facet() {
        let mut state = FilterState::default();
        for brand in ["Brio", "Lego", "Hape"] {
            state.toggle_member(SetMember::Brand(brand.into()));
        }
        assert_eq!(state.active_count(), 1);

        state.set_facet(FacetValue::PetFree(true));
        assert_eq!(state.active_count(), 2);
    }

    #[test]
    fn test_ranges_pass_through_unclamped() {
        let mut state = FilterState::default();
        state.set_facet(FacetValue::PriceRange(NumericRange::new(900, -5)));
        assert_eq!(state.price_range, NumericRange::new(900, -5));
        assert!(state.is_facet_active(Facet::PriceRange));
    }

    #[test]
    fn test_chip_labels() {
        let mut state = FilterState::default();
        state.set_facet(FacetValue::Brands(vec!["Brio".into(), "Lego".into()]));
        state.set_facet(FacetValue::Location(10));
        let chips = state.active_facets();
        assert_eq!(chips.len(), 2);
        assert_eq!(chips[0].facet, Facet::LocationRange);
        assert_eq!(chips[0].label, "Within 10 miles");
        assert_eq!(chips[1].label, "Brands: Brio, Lego");
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let state: FilterState = serde_json::from_str(r#"{"petFree": true}"#).unwrap();
        assert!(state.pet_free);
        assert_eq!(state.price_range, DEFAULT_PRICE_RANGE);
        assert_eq!(state.active_count(), 1);
    }
}
