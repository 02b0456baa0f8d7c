//! ============================================================================
//! Favorite Ids - Ordered id set and its cookie encoding
//! ============================================================================
//! The cookie `favorites` holds a JSON array of item ids, percent-encoded.
//! Anything unreadable decodes to an empty set; it is never surfaced.
//! ============================================================================

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Cookie name shared by the server and the HTTP client
pub const FAVORITES_COOKIE: &str = "favorites";

/// One year, in seconds
pub const FAVORITES_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Characters that may not appear raw in a cookie value
const COOKIE_VALUE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b',')
    .add(b';')
    .add(b'\\')
    .add(b'%')
    .add(b'[')
    .add(b']');

/// Insertion-ordered set of item ids
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct FavoriteIds(Vec<String>);

impl FavoriteIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the id was already present
    pub fn insert(&mut self, id: &str) -> bool {
        if self.contains(id) {
            return false;
        }
        self.0.push(id.to_string());
        true
    }

    /// Returns false if the id was not present
    pub fn remove(&mut self, id: &str) -> bool {
        match self.0.iter().position(|x| x == id) {
            Some(pos) => {
                self.0.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.iter().any(|x| x == id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl From<Vec<String>> for FavoriteIds {
    /// Keeps the first occurrence of each id
    fn from(ids: Vec<String>) -> Self {
        let mut set = FavoriteIds::new();
        for id in ids {
            set.insert(&id);
        }
        set
    }
}

impl From<FavoriteIds> for Vec<String> {
    fn from(ids: FavoriteIds) -> Self {
        ids.0
    }
}

impl<'a> FromIterator<&'a str> for FavoriteIds {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = FavoriteIds::new();
        for id in iter {
            set.insert(id);
        }
        set
    }
}

/// Parse a JSON array of ids; non-string entries are dropped
pub fn ids_from_json(raw: &str) -> FavoriteIds {
    match serde_json::from_str::<serde_json::Value>(raw) {
        Ok(serde_json::Value::Array(values)) => values
            .iter()
            .filter_map(serde_json::Value::as_str)
            .collect(),
        Ok(_) => {
            debug!("Favorites payload is not an array, treating as empty");
            FavoriteIds::new()
        }
        Err(e) => {
            debug!("Malformed favorites payload, treating as empty: {}", e);
            FavoriteIds::new()
        }
    }
}

// ============================================================================
// Cookie codec
// ============================================================================

pub fn encode_cookie_value(ids: &FavoriteIds) -> String {
    let json = serde_json::to_string(ids.as_slice()).unwrap_or_else(|_| "[]".to_string());
    utf8_percent_encode(&json, COOKIE_VALUE).to_string()
}

pub fn decode_cookie_value(value: &str) -> FavoriteIds {
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) => ids_from_json(&decoded),
        Err(e) => {
            debug!("Favorites cookie is not UTF-8, treating as empty: {}", e);
            FavoriteIds::new()
        }
    }
}

/// Value of cookie `name` inside a `Cookie:` header
pub fn find_cookie<'h>(header: &'h str, name: &str) -> Option<&'h str> {
    header.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Ids carried by a `Cookie:` header; missing or malformed -> empty
pub fn ids_from_cookie_header(header: Option<&str>) -> FavoriteIds {
    header
        .and_then(|h| find_cookie(h, FAVORITES_COOKIE))
        .map(decode_cookie_value)
        .unwrap_or_default()
}

/// `Set-Cookie` value: readable from scripts, SameSite=Lax, path `/`, one year
pub fn set_cookie_header(ids: &FavoriteIds) -> String {
    format!(
        "{}={}; Path=/; Max-Age={}; SameSite=Lax",
        FAVORITES_COOKIE,
        encode_cookie_value(ids),
        FAVORITES_COOKIE_MAX_AGE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remove_idempotent() {
        let mut ids = FavoriteIds::new();
        assert!(ids.insert("3"));
        assert!(!ids.insert("3"));
        assert!(ids.insert("9"));
        assert_eq!(ids.as_slice(), ["3", "9"]);

        assert!(ids.remove("3"));
        assert!(!ids.remove("3"));
        assert_eq!(ids.as_slice(), ["9"]);
    }

    #[test]
    fn test_from_vec_dedups_keeping_first() {
        let ids = FavoriteIds::from(vec!["7".to_string(), "3".to_string(), "7".to_string()]);
        assert_eq!(ids.as_slice(), ["7", "3"]);
    }

    #[test]
    fn test_cookie_value_roundtrip() {
        let ids: FavoriteIds = ["3", "7"].into_iter().collect();
        let encoded = encode_cookie_value(&ids);
        assert!(!encoded.contains(','));
        assert!(!encoded.contains('"'));
        assert_eq!(decode_cookie_value(&encoded), ids);
    }

    #[test]
    fn test_malformed_cookie_is_empty() {
        assert!(decode_cookie_value("not-json").is_empty());
        assert!(decode_cookie_value("%7B%7D").is_empty()); // {}
        assert!(decode_cookie_value("%FF").is_empty());
        assert!(ids_from_cookie_header(None).is_empty());
        assert!(ids_from_cookie_header(Some("theme=dark")).is_empty());
    }

    #[test]
    fn test_unencoded_json_cookie_is_read() {
        let ids = ids_from_cookie_header(Some(r#"theme=dark; favorites=["3",4,"9"]"#));
        assert_eq!(ids.as_slice(), ["3", "9"]);
    }

    #[test]
    fn test_find_cookie() {
        let header = "a=1; favorites=%5B%5D ; b=2";
        assert_eq!(find_cookie(header, "favorites"), Some("%5B%5D"));
        assert_eq!(find_cookie(header, "c"), None);
    }

    #[test]
    fn test_set_cookie_attributes() {
        let header = set_cookie_header(&FavoriteIds::new());
        assert!(header.starts_with("favorites="));
        assert!(header.contains("Path=/"));
        assert!(header.contains("Max-Age=31536000"));
        assert!(header.contains("SameSite=Lax"));
        assert!(!header.contains("HttpOnly"));
    }

    #[test]
    fn test_serde_as_plain_array() {
        let ids: FavoriteIds = serde_json::from_str(r#"["1","2","1"]"#).unwrap();
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"["1","2"]"#);
    }
}
