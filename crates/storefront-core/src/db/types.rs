// ============================================================================
// Database Types
// ============================================================================

use serde::{Deserialize, Serialize};

/// Summary of what the local store holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub snapshot_count: usize,
    pub total_bytes: usize,
    /// Bytes per snapshot key, in key order
    pub sizes: Vec<(String, usize)>,
}

/// Well-known snapshot keys
pub mod keys {
    pub const FILTERS: &str = "filters";
    pub const CATEGORIES: &str = "categories";
    pub const LIKES: &str = "likes";
}
