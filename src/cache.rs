//! Cache store accessor for serialized profile summaries.
//!
//! The cache is a performance layer only, never a source of truth. The
//! [`SummaryCache`] trait deliberately exposes opaque bytes with a per-entry
//! TTL: callers serialize what they store, and a reader that cannot make
//! sense of a payload treats it exactly like a missing key. Orchestrating
//! code must treat any [`CacheError`] as "absent" on read and as a no-op on
//! write; cache unavailability degrades latency, never correctness.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use thiserror::Error;

/// Error from the underlying cache store.
///
/// Carried for logging only; callers never branch on the variant.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("cache store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, CacheError>;

/// Key-value cache with per-key expiry.
#[async_trait]
pub trait SummaryCache: Send + Sync {
    /// Fetch the bytes stored under `key`, if present and unexpired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, expiring after `ttl`.
    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()>;
}

/// Entry stored in the moka cache; the TTL travels with the value so the
/// expiry policy can honor per-call lifetimes.
#[derive(Clone)]
struct Entry {
    bytes: Vec<u8>,
    ttl: Duration,
}

struct PerEntryTtl;

impl Expiry<String, Entry> for PerEntryTtl {
    fn expire_after_create(&self, _key: &String, value: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(value.ttl)
    }
}

/// In-process cache store backed by `moka::future::Cache`.
pub struct MokaSummaryCache {
    cache: Cache<String, Entry>,
}

impl MokaSummaryCache {
    pub fn new(max_entries: u64) -> Self {
        let cache = Cache::builder().max_capacity(max_entries).expire_after(PerEntryTtl).build();
        Self { cache }
    }
}

#[async_trait]
impl SummaryCache for MokaSummaryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.cache.get(key).await.map(|entry| entry.bytes))
    }

    async fn set_with_ttl(&self, key: &str, value: Vec<u8>, ttl: Duration) -> Result<()> {
        self.cache.insert(key.to_string(), Entry { bytes: value, ttl }).await;
        Ok(())
    }
}
