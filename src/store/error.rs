//! Storage error types

use thiserror::Error;

/// Failures reported by `MemoryStore` operations.
///
/// All of them are expected conditions the caller maps to a response.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    #[error("key not found")]
    KeyNotFound,

    #[error("key expired")]
    KeyExpired,

    #[error("storage is empty")]
    StorageEmpty,
}

pub type Result<T> = std::result::Result<T, StoreError>;
