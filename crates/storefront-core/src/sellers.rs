//! ============================================================================
//! Seller Directory - Tiers, profiles and followed sellers
//! ============================================================================
//! Backed by `/api/sellers/tiers`, `/api/sellers/profiles` and
//! `/api/following`. A failed call is logged and treated as "no data"; no
//! local state was changed beforehand, so there is nothing to roll back.
//! ============================================================================

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::types::{SellerProfile, SellerTier};

pub const TIERS_PATH: &str = "/api/sellers/tiers";
pub const PROFILES_PATH: &str = "/api/sellers/profiles";
pub const FOLLOWING_PATH: &str = "/api/following";

#[derive(Debug, Deserialize)]
struct TiersResponse {
    tiers: HashMap<String, SellerTier>,
}

#[derive(Debug, Deserialize)]
struct ProfilesResponse {
    profiles: Vec<SellerProfile>,
}

#[derive(Debug, Deserialize)]
struct FollowingResponse {
    ids: Vec<String>,
}

/// Lookup tables for seller metadata
pub struct SellerDirectory {
    client: reqwest::Client,
    base_url: String,
    tiers: Arc<RwLock<HashMap<String, SellerTier>>>,
    profiles: Arc<RwLock<HashMap<String, SellerProfile>>>,
    following: Arc<RwLock<Vec<String>>>,
}

impl SellerDirectory {
    pub fn new(api_base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: api_base_url.trim_end_matches('/').to_string(),
            tiers: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            following: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Directory seeded with a mock tier table
    pub fn with_tiers(api_base_url: &str, tiers: HashMap<String, SellerTier>) -> Self {
        let directory = Self::new(api_base_url);
        Self {
            tiers: Arc::new(RwLock::new(tiers)),
            ..directory
        }
    }

    /// Load everything; each endpoint fails independently
    pub async fn load_all(&self) {
        self.load_tiers().await;
        self.load_profiles().await;
        self.load_following().await;
    }

    pub async fn load_tiers(&self) -> usize {
        match self.get_json::<TiersResponse>(TIERS_PATH).await {
            Ok(response) => {
                let count = response.tiers.len();
                self.tiers.write().await.extend(response.tiers);
                info!("Loaded {} seller tiers", count);
                count
            }
            Err(e) => {
                warn!("Seller tiers unavailable: {}", e);
                0
            }
        }
    }

    pub async fn load_profiles(&self) -> usize {
        match self.get_json::<ProfilesResponse>(PROFILES_PATH).await {
            Ok(response) => {
                let count = response.profiles.len();
                let mut profiles = self.profiles.write().await;
                for profile in response.profiles {
                    profiles.insert(profile.user_id.clone(), profile);
                }
                info!("Loaded {} seller profiles", count);
                count
            }
            Err(e) => {
                warn!("Seller profiles unavailable: {}", e);
                0
            }
        }
    }

    pub async fn load_following(&self) -> usize {
        match self.get_json::<FollowingResponse>(FOLLOWING_PATH).await {
            Ok(response) => {
                let count = response.ids.len();
                *self.following.write().await = response.ids;
                count
            }
            Err(e) => {
                warn!("Following list unavailable: {}", e);
                0
            }
        }
    }

    /// Tier for a seller; unknown sellers are freemium
    pub async fn tier_of(&self, seller_id: &str) -> SellerTier {
        let tier = self
            .tiers
            .read()
            .await
            .get(seller_id)
            .copied()
            .unwrap_or_default();
        debug!("Tier for seller {}: {:?}", seller_id, tier);
        tier
    }

    pub async fn set_tier(&self, seller_id: &str, tier: SellerTier) {
        self.tiers.write().await.insert(seller_id.to_string(), tier);
    }

    pub async fn profile(&self, seller_id: &str) -> Option<SellerProfile> {
        self.profiles.read().await.get(seller_id).cloned()
    }

    pub async fn is_following(&self, seller_id: &str) -> bool {
        self.following.read().await.iter().any(|s| s == seller_id)
    }

    pub async fn following(&self) -> Vec<String> {
        self.following.read().await.clone()
    }

    /// Local follow toggle; returns the new state
    pub async fn toggle_follow(&self, seller_id: &str) -> bool {
        let mut following = self.following.write().await;
        match following.iter().position(|s| s == seller_id) {
            Some(pos) => {
                following.remove(pos);
                false
            }
            None => {
                following.push(seller_id.to_string());
                true
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request to {} failed: {}", path, e))?;

        if !response.status().is_success() {
            return Err(anyhow!("{} returned {}", path, response.status()));
        }

        response
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse {} response: {}", path, e))
    }
}
