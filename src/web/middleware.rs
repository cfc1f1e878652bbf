//! Per-client throttling middleware

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::net::SocketAddr;
use tracing::warn;

use super::error::ApiError;
use super::handlers::AppState;

const FORWARDED_FOR: &str = "x-forwarded-for";

/// Identity used for throttling: `X-Forwarded-For` if set, else the peer IP
pub fn client_identity(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    let forwarded = headers
        .get(FORWARDED_FOR)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    match (forwarded, peer) {
        (Some(forwarded), _) => forwarded.to_string(),
        (None, Some(addr)) => addr.ip().to_string(),
        (None, None) => "unknown".to_string(),
    }
}

/// Reject the request with 429 when its client exceeds the configured rate
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let identity = client_identity(request.headers(), peer);

    if !state.limiter.acquire(&identity) {
        warn!(client = %identity, "Rate limit exceeded");
        return ApiError::TooManyRequests.into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_identity_prefers_forwarded_for() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("203.0.113.7"));
        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();

        assert_eq!(client_identity(&headers, Some(peer)), "203.0.113.7");
    }

    #[test]
    fn test_identity_falls_back_to_peer_ip() {
        let mut headers = HeaderMap::new();
        headers.insert(FORWARDED_FOR, HeaderValue::from_static("  "));
        let peer: SocketAddr = "127.0.0.1:5555".parse().unwrap();

        assert_eq!(client_identity(&headers, Some(peer)), "127.0.0.1");
    }

    #[test]
    fn test_identity_unknown() {
        assert_eq!(client_identity(&HeaderMap::new(), None), "unknown");
    }
}
