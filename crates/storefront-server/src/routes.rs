// ============================================================================
// Favorites Routes
// ============================================================================
// The id list lives entirely in the `favorites` cookie. Every handler reads
// it, applies its change, writes it back and answers with `{ ids }`.
// ============================================================================

use axum::{
    body::Bytes,
    http::{
        header::{COOKIE, SET_COOKIE},
        HeaderMap,
    },
    response::{IntoResponse, Response},
    Json,
};
use storefront_core::favorites::{
    ids_from_cookie_header, set_cookie_header, FavoriteIds, IdsPayload,
};
use storefront_core::StorefrontError;
use tracing::debug;

use crate::error::AppError;

fn current_ids(headers: &HeaderMap) -> FavoriteIds {
    let header = headers.get(COOKIE).and_then(|v| v.to_str().ok());
    ids_from_cookie_header(header)
}

fn ids_response(ids: FavoriteIds) -> Response {
    let cookie = set_cookie_header(&ids);
    ([(SET_COOKIE, cookie)], Json(IdsPayload { ids })).into_response()
}

/// `id` from a `{ id }` body; absent, empty or non-string ids are missing
fn required_id(body: &[u8]) -> Result<String, StorefrontError> {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("id").and_then(|id| id.as_str()).map(str::to_string))
        .filter(|id| !id.is_empty())
        .ok_or(StorefrontError::MissingId)
}

/// String entries of a `{ ids }` body; anything else reads as an empty list
fn ids_from_body(body: &[u8]) -> FavoriteIds {
    let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) else {
        return FavoriteIds::new();
    };
    match value.get("ids").and_then(|ids| ids.as_array()) {
        Some(entries) => entries.iter().filter_map(|e| e.as_str()).collect(),
        None => FavoriteIds::new(),
    }
}

pub async fn get_favorites(headers: HeaderMap) -> Json<IdsPayload> {
    let ids = current_ids(&headers);
    debug!("GET favorites: {} ids", ids.len());
    Json(IdsPayload { ids })
}

pub async fn put_favorites(body: Bytes) -> Response {
    let ids = ids_from_body(&body);
    debug!("PUT favorites: {} ids", ids.len());
    ids_response(ids)
}

pub async fn add_favorite(headers: HeaderMap, body: Bytes) -> Result<Response, AppError> {
    let id = required_id(&body)?;
    let mut ids = current_ids(&headers);
    ids.insert(&id);
    debug!("POST favorite {}: {} ids", id, ids.len());
    Ok(ids_response(ids))
}

pub async fn remove_favorite(headers: HeaderMap, body: Bytes) -> Result<Response, AppError> {
    let id = required_id(&body)?;
    let mut ids = current_ids(&headers);
    ids.remove(&id);
    debug!("DELETE favorite {}: {} ids", id, ids.len());
    Ok(ids_response(ids))
}
