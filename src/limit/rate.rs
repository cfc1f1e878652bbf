//! Per-client rate limiter

use crate::clock::now_nanos;
use parking_lot::Mutex;
use siphasher::sip::SipHasher13;
use std::collections::HashMap;
use std::hash::BuildHasherDefault;
use std::num::NonZeroU64;
use std::time::Duration;

const NANOS_PER_SEC: i64 = 1_000_000_000;

/// Client identity -> Unix nanos of the last recorded access
type Ledger = HashMap<String, i64, BuildHasherDefault<SipHasher13>>;

/// Minimum-spacing limiter keyed by client identity.
///
/// Each identity may be granted at most one access per `min_interval`.
/// There is no burst allowance and identities are never evicted.
pub struct RateLimiter {
    ledger: Mutex<Ledger>,
    min_interval_nanos: i64,
}

impl RateLimiter {
    /// Create a limiter allowing `requests_per_second` accesses per identity
    pub fn new(requests_per_second: NonZeroU64) -> Self {
        let rps = i64::try_from(requests_per_second.get()).unwrap_or(i64::MAX);
        RateLimiter {
            ledger: Mutex::new(Ledger::default()),
            min_interval_nanos: NANOS_PER_SEC / rps,
        }
    }

    /// Whether `identity` may proceed now. Records nothing.
    pub fn check(&self, identity: &str) -> bool {
        let ledger = self.ledger.lock();
        Self::allowed(&ledger, identity, now_nanos(), self.min_interval_nanos)
    }

    /// Record now as the last access of `identity`
    pub fn limit(&self, identity: &str) {
        let mut ledger = self.ledger.lock();
        ledger.insert(identity.to_owned(), now_nanos());
    }

    /// `check` and `limit` under a single lock hold.
    ///
    /// Records the access only when it is allowed, so concurrent requests
    /// from one identity cannot both slip through.
    pub fn acquire(&self, identity: &str) -> bool {
        let mut ledger = self.ledger.lock();
        let now = now_nanos();

        if !Self::allowed(&ledger, identity, now, self.min_interval_nanos) {
            return false;
        }
        ledger.insert(identity.to_owned(), now);
        true
    }

    /// Number of identities ever recorded
    pub fn tracked(&self) -> usize {
        self.ledger.lock().len()
    }

    /// Minimum spacing between two granted accesses of one identity
    pub fn min_interval(&self) -> Duration {
        Duration::from_nanos(self.min_interval_nanos as u64)
    }

    fn allowed(ledger: &Ledger, identity: &str, now: i64, min_interval_nanos: i64) -> bool {
        match ledger.get(identity) {
            Some(&last) => now.saturating_sub(last) >= min_interval_nanos,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;

    fn limiter(rps: u64) -> RateLimiter {
        RateLimiter::new(NonZeroU64::new(rps).unwrap())
    }

    #[test]
    fn test_min_interval_from_rps() {
        assert_eq!(limiter(10).min_interval(), Duration::from_millis(100));
        assert_eq!(limiter(1).min_interval(), Duration::from_secs(1));
        assert_eq!(limiter(1_000).min_interval(), Duration::from_millis(1));
    }

    #[test]
    fn test_unknown_identity_allowed() {
        let limiter = limiter(10);
        assert!(limiter.check("never-seen"));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_basic_throttle() {
        let limiter = limiter(10);
        limiter.limit("ip");
        assert!(!limiter.check("ip"));

        thread::sleep(Duration::from_millis(110));
        assert!(limiter.check("ip"));
    }

    #[test]
    fn test_stays_throttled_while_limited_repeatedly() {
        let limiter = limiter(10);
        for _ in 0..5 {
            limiter.limit("ip");
            thread::sleep(Duration::from_millis(20));
            assert!(!limiter.check("ip"));
        }
    }

    #[test]
    fn test_identities_are_independent() {
        let limiter = limiter(10);
        limiter.limit("a");
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn test_check_does_not_record() {
        let limiter = limiter(10);
        assert!(limiter.check("ip"));
        assert!(limiter.check("ip"));
        assert_eq!(limiter.tracked(), 0);
    }

    #[test]
    fn test_acquire() {
        let limiter = limiter(10);
        assert!(limiter.acquire("ip"));
        assert!(!limiter.acquire("ip"));
        assert!(!limiter.check("ip"));

        thread::sleep(Duration::from_millis(110));
        assert!(limiter.acquire("ip"));
    }

    #[test]
    fn test_acquire_admits_one_of_concurrent_requests() {
        let limiter = Arc::new(limiter(1));
        let granted = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let granted = Arc::clone(&granted);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    if limiter.acquire("same-client") {
                        granted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(granted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_ledger_grows_with_distinct_identities() {
        let limiter = limiter(10);
        for i in 0..100 {
            limiter.limit(&format!("10.0.0.{}", i));
        }
        limiter.limit("10.0.0.1");

        assert_eq!(limiter.tracked(), 100);
    }
}
