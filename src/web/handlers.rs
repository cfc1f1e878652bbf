//! HTTP handlers for the key-value API

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use super::error::{
    ApiError, INVALID_DURATION, KEY_CAN_NOT_BE_EMPTY, UNABLE_TO_PARSE_REQUEST_BODY,
    VALUE_CAN_NOT_BE_EMPTY,
};
use crate::limit::RateLimiter;
use crate::store::MemoryStore;

pub const KEY_ADDED_SUCCESSFULLY: &str = "Key added successfully";
pub const KEY_DELETED_SUCCESSFULLY: &str = "Key deleted successfully";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub limiter: Arc<RateLimiter>,
}

/// Request body for `/set`
#[derive(Debug, Deserialize)]
pub struct SetRequest {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
    /// TTL in seconds, 0 for a permanent key
    #[serde(default)]
    pub expiration: i64,
}

/// `?key=` query parameter
#[derive(Debug, Deserialize)]
pub struct KeyQuery {
    #[serde(default)]
    pub key: String,
}

/// Response body for `/stats`
#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub total_keys: usize,
    pub expired_keys: usize,
    pub active_keys: usize,
    pub tracked_clients: usize,
}

/// Store a key, replacing any previous value
pub async fn set_handler(
    State(state): State<AppState>,
    payload: Result<Json<SetRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload.map_err(|e| {
        debug!("Rejected /set body: {}", e);
        ApiError::BadRequest(UNABLE_TO_PARSE_REQUEST_BODY)
    })?;

    if req.key.is_empty() {
        return Err(ApiError::BadRequest(KEY_CAN_NOT_BE_EMPTY));
    }
    if req.value.is_empty() {
        return Err(ApiError::BadRequest(VALUE_CAN_NOT_BE_EMPTY));
    }
    let ttl = u64::try_from(req.expiration)
        .map(Duration::from_secs)
        .map_err(|_| ApiError::BadRequest(INVALID_DURATION))?;

    debug!(key = %req.key, ttl_secs = req.expiration, "SET");
    state.store.set(req.key, req.value, ttl);

    Ok((StatusCode::CREATED, KEY_ADDED_SUCCESSFULLY))
}

/// Read the value of a key
pub async fn get_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.key.is_empty() {
        return Err(ApiError::BadRequest(KEY_CAN_NOT_BE_EMPTY));
    }

    debug!(key = %query.key, "GET");
    let value = state.store.get(&query.key)?;

    Ok((StatusCode::OK, value))
}

/// Remove a key
pub async fn delete_handler(
    State(state): State<AppState>,
    Query(query): Query<KeyQuery>,
) -> Result<impl IntoResponse, ApiError> {
    if query.key.is_empty() {
        return Err(ApiError::BadRequest(KEY_CAN_NOT_BE_EMPTY));
    }

    debug!(key = %query.key, "DELETE");
    state.store.delete(&query.key)?;

    Ok((StatusCode::OK, KEY_DELETED_SUCCESSFULLY))
}

/// List every valid entity
pub async fn all_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let entities = state.store.get_all()?;
    debug!(count = entities.len(), "ALL");

    Ok((StatusCode::OK, Json(entities)))
}

/// Store and limiter statistics, without reaping
pub async fn stats_handler(State(state): State<AppState>) -> impl IntoResponse {
    let stats = state.store.stats();

    Json(StatsResponse {
        total_keys: stats.total_keys,
        expired_keys: stats.expired_keys,
        active_keys: stats.active_keys,
        tracked_clients: state.limiter.tracked(),
    })
}
