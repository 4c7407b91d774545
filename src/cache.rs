//! Typed store facade over a key-value backend.

use crate::backend::KvBackend;
use crate::error::{Error, Result};
use crate::instrument::{counted, recorded};
use crate::key;
use crate::replay::Replayable;
use crate::value::Value;

/// Store/retrieve facade with per-call instrumentation.
///
/// Every `store` call is journaled and counted under the identity
/// `"Cache.store"`; retrieval goes through typed accessors that coerce the
/// raw bytes on the way out.
///
/// # Example
///
/// ```ignore
/// let cache = Cache::new(InMemoryBackend::new()).await?;
/// let key = cache.store("hello").await?;
/// assert_eq!(cache.get_str(&key).await?, Some("hello".to_string()));
/// ```
pub struct Cache<B: KvBackend> {
    backend: B,
}

impl<B: KvBackend> Cache<B> {
    /// Identity string for the instrumented `store` operation.
    pub const STORE_IDENTITY: &'static str = "Cache.store";

    /// Connect the facade to a backend.
    ///
    /// Destructive: the entire active database is flushed before the facade
    /// is handed back, so a fresh `Cache` always starts from an empty store.
    pub async fn new(backend: B) -> Result<Self> {
        backend.flush_all().await?;
        Ok(Cache { backend })
    }

    /// Store a value under a freshly generated opaque key and return the key.
    ///
    /// Keys are never derived from the value and never reused, so records
    /// written through this path are effectively immutable. The call is
    /// wrapped recorder-outermost, counter-innermost: the input's JSON form
    /// is journaled before the write, the returned key after it, and the
    /// call counter ticks in between.
    pub async fn store<V: Into<Value>>(&self, value: V) -> Result<String> {
        let value = value.into();
        let input = serde_json::to_string(&value)?;
        let payload = value.into_bytes();

        recorded(&self.backend, Self::STORE_IDENTITY, &input, || {
            counted(&self.backend, Self::STORE_IDENTITY, || async move {
                let key = key::fresh_key();
                self.backend.set(&key, payload, None).await?;
                Ok(key)
            })
        })
        .await
    }

    /// Read the raw bytes at `key`. An absent key is `Ok(None)`, not an error.
    pub async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.backend.get(key).await
    }

    /// Read the value at `key` and coerce it on presence.
    ///
    /// Coercion failures propagate to the caller; absence short-circuits to
    /// `Ok(None)` without invoking `coerce`.
    pub async fn get_with<T>(
        &self,
        key: &str,
        coerce: impl FnOnce(Vec<u8>) -> Result<T>,
    ) -> Result<Option<T>> {
        match self.backend.get(key).await? {
            Some(raw) => coerce(raw).map(Some),
            None => Ok(None),
        }
    }

    /// `get` specialized with UTF-8 decoding.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_with(key, |raw| {
            String::from_utf8(raw)
                .map_err(|e| Error::CoercionError(format!("not valid UTF-8: {}", e)))
        })
        .await
    }

    /// `get` specialized with integer parsing.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_with(key, |raw| {
            let text = std::str::from_utf8(&raw)
                .map_err(|e| Error::CoercionError(format!("not valid UTF-8: {}", e)))?;
            text.parse()
                .map_err(|_| Error::CoercionError(format!("not an integer: {:?}", text)))
        })
        .await
    }

    /// How many times `store` has been called (0 before the first call).
    pub async fn call_count(&self) -> Result<i64> {
        match self.backend.get(Self::STORE_IDENTITY).await? {
            Some(raw) => std::str::from_utf8(&raw)
                .ok()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| {
                    Error::CoercionError(format!(
                        "counter at {} is not an integer",
                        Self::STORE_IDENTITY
                    ))
                }),
            None => Ok(0),
        }
    }

    /// Get backend reference (for advanced use).
    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: KvBackend> Replayable for Cache<B> {
    type Backend = B;

    fn op_identity(&self) -> &str {
        Self::STORE_IDENTITY
    }

    fn backend(&self) -> &B {
        &self.backend
    }
}
