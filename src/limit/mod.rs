//! Request rate limiting
//!
//! Tracks the last granted access per client identity. Independent of the
//! storage engine; the two never share a lock.

mod rate;

pub use rate::RateLimiter;
