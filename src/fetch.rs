//! Time-boxed caching proxy for expensive external fetches.

use crate::backend::KvBackend;
use crate::error::{Error, Result};
use crate::key;
use std::time::Duration;

/// Default lifetime of a cached fetch result.
pub const DEFAULT_FETCH_TTL: Duration = Duration::from_secs(10);

/// An expensive external fetch keyed by a single text argument.
///
/// Typically an HTTP GET by URL; this crate only sees the returned payload.
#[allow(async_fn_in_trait)]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, arg: &str) -> Result<Vec<u8>>;
}

/// TTL cache in front of a [`Fetcher`], with per-argument access counting.
///
/// Every call increments `count:<arg>` whether it hits or misses, so the
/// counter tracks total accesses, never resetting. A cache hit returns the
/// stored payload without touching the fetcher; a miss fetches, writes the
/// result under `result:<arg>` with the configured TTL, and returns it.
///
/// The read-fetch-write sequence is not atomic: concurrent callers racing
/// on the same miss may each fetch, and the last write wins. Counting stays
/// exact either way because the increment is a single store primitive.
pub struct FetchCache<B: KvBackend, F: Fetcher> {
    backend: B,
    fetcher: F,
    ttl: Duration,
}

impl<B: KvBackend, F: Fetcher> FetchCache<B, F> {
    /// Wrap `fetcher` with the default 10-second TTL.
    pub fn new(backend: B, fetcher: F) -> Self {
        FetchCache {
            backend,
            fetcher,
            ttl: DEFAULT_FETCH_TTL,
        }
    }

    /// Override the cache-entry lifetime.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Fetch `arg`, serving from cache while the entry is live.
    ///
    /// A fetch failure propagates without writing a cache entry, so the next
    /// call retries. An expired entry is indistinguishable from an absent
    /// one; the TTL window restarts on every miss, never on a hit.
    pub async fn get(&self, arg: &str) -> Result<String> {
        if let Err(e) = self.backend.incr(&key::count_key(arg)).await {
            warn!("access count skipped for {}: {}", arg, e);
        }

        let result_key = key::result_key(arg);
        if let Some(raw) = self.backend.get(&result_key).await? {
            debug!("✓ fetch cache HIT for {}", arg);
            return decode(arg, raw);
        }

        debug!("✗ fetch cache MISS for {} - invoking fetcher", arg);
        let body = self.fetcher.fetch(arg).await?;
        self.backend
            .set(&result_key, body.clone(), Some(self.ttl))
            .await?;
        decode(arg, body)
    }

    /// Total number of times `arg` has been requested (hits and misses).
    pub async fn access_count(&self, arg: &str) -> Result<i64> {
        match self.backend.get(&key::count_key(arg)).await? {
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    Error::CoercionError(format!("access counter for {} is not an integer", arg))
                }),
            None => Ok(0),
        }
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

fn decode(arg: &str, raw: Vec<u8>) -> Result<String> {
    String::from_utf8(raw)
        .map_err(|e| Error::CoercionError(format!("payload for {} is not valid UTF-8: {}", arg, e)))
}
