//! FerrumKV - An in-memory key-value store with per-key TTL
//!
//! The crate is split into two independent cores and a thin HTTP layer:
//! - `store`: the storage engine, with lazy read-triggered expiration
//! - `limit`: the per-client rate limiter
//! - `web`: routing, JSON marshaling and throttling middleware
//!
//! `store` and `limit` never depend on each other; both read time
//! through the crate-private `clock` module.

mod clock;
pub mod config;
pub mod limit;
pub mod store;
pub mod web;

/// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use limit::RateLimiter;
pub use store::{Entity, MemoryStore, StoreError};
