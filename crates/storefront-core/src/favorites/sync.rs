//! ============================================================================
//! Favorites Sync - Server mirror of the liked ids
//! ============================================================================
//! Talks to `/api/favorites`. Every call returns the full id list the server
//! now holds. The HTTP client keeps a cookie jar so the `favorites` cookie
//! set by one call is sent on the next, the way a browser would. The server
//! keeps nothing, so a new client must seed the jar from local ids.
//! ============================================================================

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::cookie::Jar;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use super::ids::{set_cookie_header, FavoriteIds};
use crate::types::StorefrontError;

/// Path of the favorites endpoint relative to the API base URL
pub const FAVORITES_PATH: &str = "/api/favorites";

/// Remote store of favorited ids
#[async_trait]
pub trait FavoritesSync: Send + Sync {
    async fn fetch(&self) -> Result<FavoriteIds>;
    async fn add(&self, id: &str) -> Result<FavoriteIds>;
    async fn remove(&self, id: &str) -> Result<FavoriteIds>;
    async fn replace(&self, ids: &FavoriteIds) -> Result<FavoriteIds>;
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IdsPayload {
    pub ids: FavoriteIds,
}

#[derive(Debug, Serialize)]
struct IdPayload<'a> {
    id: &'a str,
}

/// `FavoritesSync` over HTTP
pub struct HttpFavoritesSync {
    client: reqwest::Client,
    jar: Arc<Jar>,
    url: String,
}

impl HttpFavoritesSync {
    pub fn new(api_base_url: &str) -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(|e| anyhow!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            client,
            jar,
            url: format!("{}{}", api_base_url.trim_end_matches('/'), FAVORITES_PATH),
        })
    }

    /// Put `ids` in the cookie jar, as a browser that already holds the
    /// `favorites` cookie would send them. A fresh client has an empty jar.
    pub fn seed_cookie(&self, ids: &FavoriteIds) -> Result<()> {
        let url = Url::parse(&self.url)
            .map_err(|e| anyhow!("Invalid favorites URL {}: {}", self.url, e))?;
        self.jar.add_cookie_str(&set_cookie_header(ids), &url);
        debug!("Seeded favorites cookie with {} ids", ids.len());
        Ok(())
    }

    async fn read_ids(response: reqwest::Response) -> Result<FavoriteIds> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(
                StorefrontError::SyncFailed(format!("Favorites API error {}: {}", status, body))
                    .into(),
            );
        }

        let payload: IdsPayload = response
            .json()
            .await
            .map_err(|e| StorefrontError::MalformedPayload(e.to_string()))?;
        Ok(payload.ids)
    }
}

#[async_trait]
impl FavoritesSync for HttpFavoritesSync {
    async fn fetch(&self) -> Result<FavoriteIds> {
        debug!("GET {}", self.url);
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to fetch favorites: {}", e))?;
        Self::read_ids(response).await
    }

    async fn add(&self, id: &str) -> Result<FavoriteIds> {
        debug!("POST {} id={}", self.url, id);
        let response = self
            .client
            .post(&self.url)
            .json(&IdPayload { id })
            .send()
            .await
            .map_err(|e| anyhow!("Failed to add favorite: {}", e))?;
        Self::read_ids(response).await
    }

    async fn remove(&self, id: &str) -> Result<FavoriteIds> {
        debug!("DELETE {} id={}", self.url, id);
        let response = self
            .client
            .delete(&self.url)
            .json(&IdPayload { id })
            .send()
            .await
            .map_err(|e| anyhow!("Failed to remove favorite: {}", e))?;
        Self::read_ids(response).await
    }

    async fn replace(&self, ids: &FavoriteIds) -> Result<FavoriteIds> {
        debug!("PUT {} ({} ids)", self.url, ids.len());
        let response = self
            .client
            .put(&self.url)
            .json(&IdsPayload { ids: ids.clone() })
            .send()
            .await
            .map_err(|e| anyhow!("Failed to replace favorites: {}", e))?;
        Self::read_ids(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let sync = HttpFavoritesSync::new("http://localhost:3000/").unwrap();
        assert_eq!(sync.url, "http://localhost:3000/api/favorites");
    }

    #[test]
    fn test_seed_cookie_accepts_local_ids() {
        let sync = HttpFavoritesSync::new("http://127.0.0.1:3000").unwrap();
        let ids: FavoriteIds = ["3", "9"].into_iter().collect();
        assert!(sync.seed_cookie(&ids).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_an_error() {
        // Port 9 (discard) is not listening on loopback in test environments
        let sync = HttpFavoritesSync::new("http://127.0.0.1:9").unwrap();
        assert!(sync.fetch().await.is_err());
    }
}
