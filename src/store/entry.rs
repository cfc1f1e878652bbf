//! Entity structure for stored key-value pairs

use crate::clock::now_nanos;
use serde::Serialize;
use std::time::Duration;

/// Sentinel `expires_at` value for entities that never expire
pub const NO_EXPIRATION: i64 = 0;

/// Represents a single stored value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    /// The key
    pub key: String,

    /// The value
    pub value: String,

    /// Absolute expiration time in Unix nanoseconds, `NO_EXPIRATION` if permanent
    #[serde(rename = "expiration")]
    pub expires_at: i64,
}

impl Entity {
    /// Create a new entity without expiration
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Entity {
            key: key.into(),
            value: value.into(),
            expires_at: NO_EXPIRATION,
        }
    }

    /// Create a new entity expiring `ttl` from now.
    ///
    /// A zero `ttl` yields a permanent entity.
    pub fn with_ttl(key: impl Into<String>, value: impl Into<String>, ttl: Duration) -> Self {
        let mut entity = Entity::new(key, value);
        if !ttl.is_zero() {
            let ttl_nanos = i64::try_from(ttl.as_nanos()).unwrap_or(i64::MAX);
            entity.expires_at = now_nanos().saturating_add(ttl_nanos);
        }
        entity
    }

    /// Check if the entity has expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now_nanos())
    }

    /// Check expiry against an explicit timestamp
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at != NO_EXPIRATION && now >= self.expires_at
    }
}
