//! Key-value store backends.
//!
//! A backend is an opaque service with at-least-Redis semantics for the
//! handful of primitives this crate composes: get, set-with-optional-expiry,
//! atomic increment, ordered list append/range, existence check, and a full
//! flush. Per-key operations are assumed atomic and linearizable; nothing in
//! this crate takes locks of its own.

#[cfg(feature = "inmemory")]
mod memory;
#[cfg(feature = "redis")]
mod redis;

#[cfg(feature = "inmemory")]
pub use memory::InMemoryBackend;
#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};

use crate::error::Result;
use std::time::Duration;

/// Store primitives every backend must provide.
///
/// Implementations are expected to be cheaply cloneable handles onto a
/// shared connection or map, so one backend can be threaded through several
/// wrapped operations at once.
#[allow(async_fn_in_trait)]
pub trait KvBackend: Clone + Send + Sync + 'static {
    /// Read the raw bytes at `key`. Absence is `Ok(None)`, never an error.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Write `value` verbatim, optionally expiring after `ttl`.
    ///
    /// The expiry window is measured from this write; a later overwrite
    /// restarts it.
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Atomically increment the integer at `key` by 1, creating it at 0
    /// first if absent. Returns the post-increment value.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Append `value` to the ordered list at `key`, creating the list if
    /// absent. Returns the new list length.
    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize>;

    /// Read the inclusive range `[start, stop]` of the list at `key`.
    /// Negative indices count from the end, Redis-style; an absent key
    /// yields an empty range.
    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>>;

    /// Whether a live (non-expired) entry exists at `key`.
    async fn exists(&self, key: &str) -> Result<bool>;

    /// Destroy every key in the active database.
    async fn flush_all(&self) -> Result<()>;
}
