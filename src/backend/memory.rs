//! In-memory backend for tests and single-process use.

use super::KvBackend;
use crate::error::{Error, Result};
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// In-memory store with Redis-like semantics.
///
/// Entries expire lazily: an expired entry is removed the next time its key
/// is touched, which keeps reads and writes lock-free beyond the map's own
/// sharding. Timing uses `tokio::time::Instant` so paused-clock tests can
/// drive TTL expiry deterministically.
#[derive(Clone, Default)]
pub struct InMemoryBackend {
    inner: Arc<DashMap<String, Entry>>,
}

struct Entry {
    slot: Slot,
    expires_at: Option<Instant>,
}

enum Slot {
    Bytes(Vec<u8>),
    List(Vec<Vec<u8>>),
}

impl Entry {
    fn bytes(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        Entry {
            slot: Slot::Bytes(value),
            expires_at: ttl.map(|d| Instant::now() + d),
        }
    }

    fn live(&self) -> bool {
        self.expires_at.map_or(true, |at| Instant::now() < at)
    }
}

fn wrong_type(key: &str) -> Error {
    Error::BackendError(format!(
        "WRONGTYPE operation against key {} holding the wrong kind of value",
        key
    ))
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop the entry at `key` if its TTL has lapsed.
    fn sweep(&self, key: &str) {
        self.inner.remove_if(key, |_, entry| !entry.live());
    }

    /// Number of live entries (diagnostic, used by tests).
    pub async fn len(&self) -> usize {
        self.inner.iter().filter(|e| e.live()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl KvBackend for InMemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.sweep(key);
        match self.inner.get(key) {
            Some(entry) => match &entry.slot {
                Slot::Bytes(b) => {
                    debug!("✓ memory GET {} -> HIT", key);
                    Ok(Some(b.clone()))
                }
                Slot::List(_) => Err(wrong_type(key)),
            },
            None => {
                debug!("✓ memory GET {} -> MISS", key);
                Ok(None)
            }
        }
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.inner.insert(key.to_string(), Entry::bytes(value, ttl));
        if let Some(d) = ttl {
            debug!("✓ memory SET {} (TTL: {:?})", key, d);
        } else {
            debug!("✓ memory SET {}", key);
        }
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64> {
        self.sweep(key);
        let mut entry = self
            .inner
            .entry(key.to_string())
            .or_insert_with(|| Entry::bytes(b"0".to_vec(), None));
        match &mut entry.slot {
            Slot::Bytes(b) => {
                let current: i64 = std::str::from_utf8(b)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        Error::BackendError(format!(
                            "value at {} is not an integer or out of range",
                            key
                        ))
                    })?;
                let next = current + 1;
                *b = next.to_string().into_bytes();
                Ok(next)
            }
            Slot::List(_) => Err(wrong_type(key)),
        }
    }

    async fn rpush(&self, key: &str, value: Vec<u8>) -> Result<usize> {
        self.sweep(key);
        let mut entry = self.inner.entry(key.to_string()).or_insert_with(|| Entry {
            slot: Slot::List(Vec::new()),
            expires_at: None,
        });
        match &mut entry.slot {
            Slot::List(items) => {
                items.push(value);
                Ok(items.len())
            }
            Slot::Bytes(_) => Err(wrong_type(key)),
        }
    }

    async fn lrange(&self, key: &str, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
        self.sweep(key);
        match self.inner.get(key) {
            Some(entry) => match &entry.slot {
                Slot::List(items) => {
                    let len = items.len() as i64;
                    let from = if start < 0 { start + len } else { start }.max(0);
                    let to = if stop < 0 { stop + len } else { stop }.min(len - 1);
                    if from > to || len == 0 {
                        return Ok(Vec::new());
                    }
                    Ok(items[from as usize..=to as usize].to_vec())
                }
                Slot::Bytes(_) => Err(wrong_type(key)),
            },
            None => Ok(Vec::new()),
        }
    }

    async fn exists(&self, key: &str) -> Result<bool> {
        self.sweep(key);
        Ok(self.inner.contains_key(key))
    }

    async fn flush_all(&self) -> Result<()> {
        self.inner.clear();
        warn!("⚠ memory FLUSH executed - all data cleared!");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_round_trip() {
        let backend = InMemoryBackend::new();
        backend.set("k", b"v".to_vec(), None).await.unwrap();
        assert_eq!(backend.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert_eq!(backend.get("missing").await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_expiry_is_lazy_but_observable() {
        let backend = InMemoryBackend::new();
        backend
            .set("k", b"v".to_vec(), Some(Duration::from_secs(10)))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(backend.get("k").await.unwrap(), Some(b"v".to_vec()));
        assert!(backend.exists("k").await.unwrap());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(backend.get("k").await.unwrap(), None);
        assert!(!backend.exists("k").await.unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_restarts_ttl_window() {
        let backend = InMemoryBackend::new();
        backend
            .set("k", b"old".to_vec(), Some(Duration::from_secs(10)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        backend
            .set("k", b"new".to_vec(), Some(Duration::from_secs(10)))
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(backend.get("k").await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_creates_then_counts() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.incr("n").await.unwrap(), 1);
        assert_eq!(backend.incr("n").await.unwrap(), 2);
        assert_eq!(backend.incr("n").await.unwrap(), 3);
        assert_eq!(backend.get("n").await.unwrap(), Some(b"3".to_vec()));
    }

    #[tokio::test]
    async fn test_incr_on_non_integer_fails() {
        let backend = InMemoryBackend::new();
        backend.set("k", b"abc".to_vec(), None).await.unwrap();
        assert!(backend.incr("k").await.is_err());
    }

    #[tokio::test]
    async fn test_rpush_lrange_preserve_order() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.rpush("l", b"a".to_vec()).await.unwrap(), 1);
        assert_eq!(backend.rpush("l", b"b".to_vec()).await.unwrap(), 2);
        assert_eq!(backend.rpush("l", b"c".to_vec()).await.unwrap(), 3);

        let all = backend.lrange("l", 0, -1).await.unwrap();
        assert_eq!(all, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);

        let tail = backend.lrange("l", 1, -1).await.unwrap();
        assert_eq!(tail, vec![b"b".to_vec(), b"c".to_vec()]);

        assert!(backend.lrange("l", 2, 1).await.unwrap().is_empty());
        assert!(backend.lrange("absent", 0, -1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_type_confusion_is_rejected() {
        let backend = InMemoryBackend::new();
        backend.rpush("l", b"a".to_vec()).await.unwrap();
        assert!(backend.get("l").await.is_err());
        assert!(backend.incr("l").await.is_err());

        backend.set("s", b"v".to_vec(), None).await.unwrap();
        assert!(backend.rpush("s", b"x".to_vec()).await.is_err());
        assert!(backend.lrange("s", 0, -1).await.is_err());
    }

    #[tokio::test]
    async fn test_flush_all_clears_everything() {
        let backend = InMemoryBackend::new();
        backend.set("a", b"1".to_vec(), None).await.unwrap();
        backend.incr("b").await.unwrap();
        backend.rpush("c", b"x".to_vec()).await.unwrap();
        assert_eq!(backend.len().await, 3);

        backend.flush_all().await.unwrap();
        assert!(backend.is_empty().await);
    }
}
