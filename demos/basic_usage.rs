//! Basic usage: typed store facade, replay, and the TTL fetch cache.
//!
//! Run with: cargo run --example basic_usage

use kvtrace::backend::InMemoryBackend;
use kvtrace::{replay, Cache, FetchCache, Fetcher, Result};
use std::time::Duration;

/// Stand-in for an expensive network fetch.
struct SlowFetcher;

impl Fetcher for SlowFetcher {
    async fn fetch(&self, arg: &str) -> Result<Vec<u8>> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        Ok(format!("<html>payload for {}</html>", arg).into_bytes())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let backend = InMemoryBackend::new();

    // Typed store facade: every store is counted and journaled.
    let cache = Cache::new(backend.clone()).await?;
    let k1 = cache.store("hello").await?;
    let k2 = cache.store(42i64).await?;

    println!("get_str({}) = {:?}", k1, cache.get_str(&k1).await?);
    println!("get_int({}) = {:?}", k2, cache.get_int(&k2).await?);

    // Replay the recorded history.
    print!("{}", replay(&cache).await?);

    // TTL fetch cache: second request is served without fetching.
    let pages = FetchCache::new(backend, SlowFetcher);
    let url = "http://example.com";
    pages.get(url).await?;
    pages.get(url).await?;
    println!(
        "{} requested {} times",
        url,
        pages.access_count(url).await?
    );

    Ok(())
}
