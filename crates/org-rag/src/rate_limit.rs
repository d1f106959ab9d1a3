//! Per-caller fixed-window rate limiting for the ask entry point

use dashmap::DashMap;
use std::time::{Duration, Instant};

/// Outcome of one quota consumption attempt
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDecision {
    #[serde(skip)]
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub retry_after_seconds: u64,
}

#[derive(Debug, Clone, Copy)]
struct Bucket {
    count: u32,
    reset_at: Instant,
}

/// Fixed-window counter keyed by caller identity.
///
/// One bucket per distinct key, created on first request and mutated
/// atomically through the map's entry API. Buckets are never evicted; a
/// process restart is the only reset mechanism.
#[derive(Default)]
pub struct RateLimiter {
    buckets: DashMap<String, Bucket>,
}

impl RateLimiter {
    /// Create a new limiter with no buckets
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one request from `key`'s quota
    pub fn consume(&self, key: &str, limit: u32, window: Duration) -> RateDecision {
        self.consume_at(key, limit, window, Instant::now())
    }

    fn consume_at(&self, key: &str, limit: u32, window: Duration, now: Instant) -> RateDecision {
        // The entry guard holds the shard lock across the read-modify-write,
        // so racing requests for one key serialize here
        let mut bucket = self
            .buckets
            .entry(key.to_string())
            .or_insert(Bucket {
                count: 0,
                reset_at: now,
            });

        if now >= bucket.reset_at {
            bucket.count = 1;
            bucket.reset_at = now + window;
            return RateDecision {
                allowed: true,
                limit,
                remaining: limit.saturating_sub(1),
                retry_after_seconds: ceil_secs(window),
            };
        }

        let retry_after_seconds = ceil_secs(bucket.reset_at - now).max(1);

        if bucket.count >= limit {
            return RateDecision {
                allowed: false,
                limit,
                remaining: 0,
                retry_after_seconds,
            };
        }

        bucket.count += 1;
        RateDecision {
            allowed: true,
            limit,
            remaining: limit.saturating_sub(bucket.count),
            retry_after_seconds,
        }
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    (duration.as_millis() as u64 + 999) / 1000
}
