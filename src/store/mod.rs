//! In-memory storage module
//!
//! Provides the key-value storage engine with TTL support and lazy,
//! read-triggered expiration. This module knows nothing about HTTP.

mod entry;
mod error;
mod memory;

pub use entry::{Entity, NO_EXPIRATION};
pub use error::{Result, StoreError};
pub use memory::{MemoryStore, StoreStats};
