//! Mapping of request failures to HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::store::StoreError;

pub const UNABLE_TO_PARSE_REQUEST_BODY: &str = "Unable to parse request body";
pub const VALUE_CAN_NOT_BE_EMPTY: &str = "Value can not be empty";
pub const KEY_CAN_NOT_BE_EMPTY: &str = "Key can not be empty";
pub const INVALID_DURATION: &str = "Invalid duration";
pub const TOO_MANY_REQUESTS: &str = "Too many requests";

/// Error type returned by handlers and middleware
#[derive(Debug)]
pub enum ApiError {
    BadRequest(&'static str),
    Store(StoreError),
    TooManyRequests,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Store(StoreError::KeyNotFound) => {
                (StatusCode::NOT_FOUND, StoreError::KeyNotFound.to_string()).into_response()
            }
            ApiError::Store(StoreError::KeyExpired) => {
                (StatusCode::GONE, StoreError::KeyExpired.to_string()).into_response()
            }
            // 204 carries no body
            ApiError::Store(StoreError::StorageEmpty) => StatusCode::NO_CONTENT.into_response(),
            ApiError::TooManyRequests => {
                (StatusCode::TOO_MANY_REQUESTS, TOO_MANY_REQUESTS).into_response()
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        ApiError::Store(e)
    }
}
