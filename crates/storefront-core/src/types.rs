//! ============================================================================
//! Catalog Types - Items, sellers and tiers shared by every engine
//! ============================================================================
//! The catalog is read-only for the lifetime of a session. Field names follow
//! the camelCase JSON the storefront mock data ships with.
//! ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Catalog Item
// ============================================================================

/// A single listing in the marketplace catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    /// Currency-prefixed display price, e.g. "£1,250"
    pub price: String,
    #[serde(default)]
    pub seller_rating: f32,
    pub condition: Condition,
    pub category_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub bundle_deal: bool,
    #[serde(default)]
    pub pet_free: bool,
    #[serde(default)]
    pub smoke_free: bool,
    #[serde(default)]
    pub perfume_free: bool,
    #[serde(default)]
    pub shipping_methods: Vec<ShippingMethod>,
    pub seller: SellerRef,
}

impl CatalogItem {
    /// Numeric price: every non-digit character of the display string is dropped.
    pub fn price_value(&self) -> u64 {
        parse_price(&self.price)
    }

    /// Brand lowercased for case-insensitive matching
    pub fn brand_key(&self) -> Option<String> {
        self.brand
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
            .map(str::to_lowercase)
    }

    pub fn seller_id(&self) -> &str {
        &self.seller.user_id
    }
}

/// Strip everything except ASCII digits and read the rest as an integer.
/// Empty or overflowing input yields 0.
pub fn parse_price(display: &str) -> u64 {
    let digits: String = display.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().unwrap_or(0)
}

/// Seller reference embedded in every item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerRef {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub description: String,
}

/// Item condition, from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    New,
    LikeNew,
    Good,
    Fair,
    Poor,
}

impl Condition {
    pub fn display_name(&self) -> &'static str {
        match self {
            Condition::New => "New",
            Condition::LikeNew => "Like new",
            Condition::Good => "Good",
            Condition::Fair => "Fair",
            Condition::Poor => "Poor",
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "new" => Ok(Condition::New),
            "like-new" | "likenew" => Ok(Condition::LikeNew),
            "good" => Ok(Condition::Good),
            "fair" => Ok(Condition::Fair),
            "poor" => Ok(Condition::Poor),
            _ => Err(format!("Unknown condition: {}", s)),
        }
    }
}

/// Delivery options a seller offers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ShippingMethod {
    Standard,
    Express,
    Pickup,
    LocalDelivery,
}

impl std::str::FromStr for ShippingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "standard" => Ok(ShippingMethod::Standard),
            "express" => Ok(ShippingMethod::Express),
            "pickup" => Ok(ShippingMethod::Pickup),
            "local-delivery" => Ok(ShippingMethod::LocalDelivery),
            _ => Err(format!("Unknown shipping method: {}", s)),
        }
    }
}

// ============================================================================
// Seller Tier / Profile
// ============================================================================

/// Seller account class, controls how suggestions are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SellerTier {
    #[default]
    Freemium,
    Premium,
}

impl SellerTier {
    pub fn display_name(&self) -> &'static str {
        match self {
            SellerTier::Freemium => "Freemium",
            SellerTier::Premium => "Premium",
        }
    }
}

impl std::str::FromStr for SellerTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "freemium" | "free" => Ok(SellerTier::Freemium),
            "premium" => Ok(SellerTier::Premium),
            _ => Err(format!("Unknown seller tier: {}", s)),
        }
    }
}

/// Public seller profile as served by the profiles endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tier: SellerTier,
}

// ============================================================================
// Errors
// ============================================================================

/// Typed failures callers branch on
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StorefrontError {
    #[error("Missing id")]
    MissingId,

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error("Sync failed: {0}")]
    SyncFailed(String),
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price_strips_non_digits() {
        assert_eq!(parse_price("£1,250"), 1250);
        assert_eq!(parse_price("$40"), 40);
        assert_eq!(parse_price("free"), 0);
        assert_eq!(parse_price(""), 0);
    }

    #[test]
    fn test_item_deserializes_from_camel_case() {
        let json = r#"{
            "id": "7",
            "title": "Wooden train set",
            "price": "£35",
            "sellerRating": 4.8,
            "condition": "like-new",
            "categoryId": "toys",
            "brand": "Brio",
            "images": ["a.jpg"],
            "bundleDeal": true,
            "shippingMethods": ["standard", "local-delivery"],
            "seller": { "userId": "s1", "name": "Ana" }
        }"#;
        let item: CatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.condition, Condition::LikeNew);
        assert_eq!(item.brand_key().as_deref(), Some("brio"));
        assert!(item.bundle_deal);
        assert!(!item.pet_free);
        assert_eq!(item.price_value(), 35);
        assert_eq!(item.seller_id(), "s1");
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("premium".parse::<SellerTier>().unwrap(), SellerTier::Premium);
        assert_eq!("Freemium".parse::<SellerTier>().unwrap(), SellerTier::Freemium);
        assert!("gold".parse::<SellerTier>().is_err());
        assert_eq!(SellerTier::default(), SellerTier::Freemium);
    }
}
