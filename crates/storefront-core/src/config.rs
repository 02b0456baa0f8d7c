//! ============================================================================
//! Storefront Configuration
//! ============================================================================
//! Values come from the environment (a `.env` file is loaded by the binaries
//! before this is built).
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";

/// Client-side configuration shared by the CLI and library consumers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorefrontConfig {
    /// Base URL of the storefront API (favorites, sellers)
    pub api_base_url: String,
    /// Local state database; `None` lets the store pick `~/.storefront/state.redb`
    pub db_path: Option<PathBuf>,
    /// JSON catalog file used by offline commands
    pub catalog_path: Option<PathBuf>,
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            api_base_url: std::env::var("STOREFRONT_API_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            db_path: std::env::var("STOREFRONT_DB_PATH").ok().map(PathBuf::from),
            catalog_path: std::env::var("STOREFRONT_CATALOG").ok().map(PathBuf::from),
        }
    }
}

impl StorefrontConfig {
    /// Command-line values win over the environment
    pub fn with_overrides(mut self, db_path: Option<PathBuf>, catalog_path: Option<PathBuf>) -> Self {
        if db_path.is_some() {
            self.db_path = db_path;
        }
        if catalog_path.is_some() {
            self.catalog_path = catalog_path;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = StorefrontConfig {
            api_base_url: DEFAULT_API_URL.to_string(),
            db_path: Some(PathBuf::from("/tmp/a.redb")),
            catalog_path: Some(PathBuf::from("/tmp/catalog.json")),
        };

        let config = config.with_overrides(Some(PathBuf::from("/tmp/b.redb")), None);
        assert_eq!(config.db_path, Some(PathBuf::from("/tmp/b.redb")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/tmp/catalog.json")));
    }
}
