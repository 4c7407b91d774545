//! # kvtrace
//!
//! A thin instrumentation and caching layer in front of a key-value store.
//!
//! ## Features
//!
//! - **Call instrumentation:** count and journal every invocation of a
//!   store-backed operation with composable async wrappers
//! - **Typed facade:** store values under opaque generated keys, read them
//!   back with on-demand coercion (`get_str`, `get_int`, or your own)
//! - **Replay:** render an operation's counter and paired input/output
//!   history as a human-readable transcript
//! - **TTL fetch cache:** time-box expensive external fetches with exact
//!   per-argument access counting
//! - **Backend Agnostic:** in-memory for tests and single-process use,
//!   Redis for everything else
//!
//! ## Quick Start
//!
//! ```ignore
//! use kvtrace::{backend::InMemoryBackend, replay, Cache};
//!
//! let cache = Cache::new(InMemoryBackend::new()).await?;
//!
//! let k1 = cache.store("hello").await?;
//! let k2 = cache.store(42i64).await?;
//!
//! assert_eq!(cache.get_str(&k1).await?.as_deref(), Some("hello"));
//! assert_eq!(cache.get_int(&k2).await?, Some(42));
//!
//! println!("{}", replay(&cache).await?);
//! // Cache.store was called 2 times:
//! // Cache.store("hello") -> 0b7daf7c-...
//! // Cache.store(42) -> 8c3f9e21-...
//! ```
//!
//! Instrumentation is best-effort by design: if the store cannot be reached,
//! counting and recording are skipped with a warning and the wrapped
//! operation still runs.

#[macro_use]
extern crate log;

pub mod backend;
pub mod cache;
pub mod error;
pub mod fetch;
pub mod instrument;
pub mod key;
pub mod replay;
pub mod value;

// Re-exports for convenience
pub use backend::KvBackend;
pub use cache::Cache;
pub use error::{Error, Result};
pub use fetch::{FetchCache, Fetcher, DEFAULT_FETCH_TTL};
pub use instrument::{counted, recorded, CallOutput};
pub use replay::{replay, Replayable};
pub use value::Value;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
