//! Partner profile summaries: the cache-aside read path.
//!
//! [`SummaryService`] answers "how many prediction requests has partner P
//! made?" without hitting the relational store on every read. Each request
//! consults the cache first; on a miss it reads the partner row, runs one
//! aggregate COUNT, writes the serialized summary back into the cache with a
//! fixed TTL, and returns it. The relational store stays the sole source of
//! truth: a cached value may lag it by at most one TTL window, and nothing
//! is invalidated when new prediction facts arrive.
//!
//! Failure isolation is the load-bearing contract here. Cache errors on read
//! are indistinguishable from a missing key, cache errors on write are
//! logged and dropped, and only an unreachable authoritative store during
//! the miss path fails the request. Concurrent misses for the same partner
//! may both recompute and both write; last write wins, which is safe because
//! both values come from approximately the same authoritative state.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use crate::api::models::summaries::{CacheStatus, ProfileSummary};
use crate::cache::SummaryCache;
use crate::config::SummaryCacheConfig;
use crate::db::handlers::{Partners, PredictionRequests, Repository};
use crate::types::PartnerId;

/// Fixed namespace prefix for summary cache keys.
const CACHE_KEY_PREFIX: &str = "profile_summary";

/// Derive the cache key for a partner's summary.
///
/// A pure function of the partner id only, so repeated calls for the same
/// partner always address the same entry. Collaborators must not assume
/// this format.
pub fn summary_cache_key(partner_id: PartnerId) -> String {
    format!("{CACHE_KEY_PREFIX}:{partner_id}")
}

/// Error from the authoritative store accessor.
#[derive(Error, Debug)]
#[error("authoritative store error: {0}")]
pub struct StoreError(#[from] pub anyhow::Error);

/// Partner identity as seen by the summary service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerProfile {
    pub id: PartnerId,
    pub name: String,
}

/// Read-only accessor contract over the authoritative relational store.
///
/// Implementations must support concurrent callers; every call is an
/// independent read-only unit of work. The aggregate count must be a single
/// COUNT operation, never an enumeration of rows.
#[async_trait]
pub trait PartnerStore: Send + Sync {
    /// Fetch a partner's identity record, if it exists.
    async fn get_partner(&self, id: PartnerId) -> Result<Option<PartnerProfile>, StoreError>;

    /// Total prediction requests recorded for the partner.
    async fn count_prediction_requests(&self, id: PartnerId) -> Result<i64, StoreError>;
}

/// PostgreSQL-backed [`PartnerStore`] delegating to the db repositories.
pub struct PgPartnerStore {
    pool: PgPool,
}

impl PgPartnerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PartnerStore for PgPartnerStore {
    async fn get_partner(&self, id: PartnerId) -> Result<Option<PartnerProfile>, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| StoreError(e.into()))?;
        let partner = Partners::new(&mut conn)
            .get_by_id(id)
            .await
            .map_err(|e| StoreError(anyhow::Error::from(e)))?;
        Ok(partner.map(|p| PartnerProfile { id: p.id, name: p.name }))
    }

    async fn count_prediction_requests(&self, id: PartnerId) -> Result<i64, StoreError> {
        let mut conn = self.pool.acquire().await.map_err(|e| StoreError(e.into()))?;
        PredictionRequests::new(&mut conn)
            .count_for_partner(id)
            .await
            .map_err(|e| StoreError(anyhow::Error::from(e)))
    }
}

/// Error taxonomy exposed by [`SummaryService::get_profile_summary`].
///
/// Cache failures never appear here: they are absorbed locally and at most
/// logged. `Unavailable` is retryable by the caller; the service itself
/// never retries.
#[derive(Error, Debug)]
pub enum SummaryError {
    /// Partner does not exist. Terminal; never cached.
    #[error("partner {0} not found")]
    NotFound(PartnerId),

    /// Authoritative store unreachable or errored during a required read.
    #[error("summary temporarily unavailable: {0}")]
    Unavailable(#[source] anyhow::Error),
}

/// Wire form written to the cache. Provenance is deliberately excluded; the
/// reader stamps hit/miss on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedSummary {
    partner_id: PartnerId,
    name: String,
    total_requests: i64,
}

/// Cache-aside orchestrator for partner profile summaries.
///
/// Holds stateless accessors to the two stores; safe to clone and share
/// across concurrent requests.
#[derive(Clone)]
pub struct SummaryService {
    store: Arc<dyn PartnerStore>,
    cache: Arc<dyn SummaryCache>,
    ttl: Duration,
    store_timeout: Duration,
    cache_timeout: Duration,
}

impl SummaryService {
    pub fn new(store: Arc<dyn PartnerStore>, cache: Arc<dyn SummaryCache>, config: &SummaryCacheConfig) -> Self {
        Self {
            store,
            cache,
            ttl: config.ttl,
            store_timeout: config.store_timeout,
            cache_timeout: config.cache_timeout,
        }
    }

    /// Resolve a partner's profile summary, preferring the cache.
    ///
    /// On a hit the authoritative store is not consulted at all. On a miss
    /// the summary is computed from the authoritative store, written back
    /// into the cache best-effort, and returned with `cache_status: miss`.
    /// A NotFound result is never cached, so a later partner creation is
    /// visible on the very next request.
    #[instrument(skip(self), err(level = "debug"))]
    pub async fn get_profile_summary(&self, partner_id: PartnerId) -> Result<ProfileSummary, SummaryError> {
        let key = summary_cache_key(partner_id);

        if let Some(summary) = self.cache_lookup(&key, partner_id).await {
            return Ok(summary);
        }

        // Miss path: the authoritative store is mandatory from here on.
        let partner = match timeout(self.store_timeout, self.store.get_partner(partner_id)).await {
            Ok(Ok(partner)) => partner,
            Ok(Err(e)) => return Err(SummaryError::Unavailable(e.into())),
            Err(_) => return Err(SummaryError::Unavailable(anyhow!("partner lookup timed out"))),
        };
        let Some(partner) = partner else {
            return Err(SummaryError::NotFound(partner_id));
        };

        let total_requests = match timeout(self.store_timeout, self.store.count_prediction_requests(partner_id)).await {
            Ok(Ok(count)) => count,
            Ok(Err(e)) => return Err(SummaryError::Unavailable(e.into())),
            Err(_) => return Err(SummaryError::Unavailable(anyhow!("request count timed out"))),
        };

        let cached = CachedSummary {
            partner_id,
            name: partner.name,
            total_requests,
        };
        self.populate_cache(&key, &cached).await;

        debug!(partner_id, total_requests, "profile summary cache miss");
        Ok(ProfileSummary {
            partner_id,
            name: cached.name,
            total_requests,
            cache_status: CacheStatus::Miss,
        })
    }

    /// Cache read. Any failure - transport error, timeout, malformed
    /// payload - collapses to `None` so the caller falls through to the
    /// authoritative store.
    async fn cache_lookup(&self, key: &str, partner_id: PartnerId) -> Option<ProfileSummary> {
        let bytes = match timeout(self.cache_timeout, self.cache.get(key)).await {
            Ok(Ok(bytes)) => bytes?,
            Ok(Err(e)) => {
                warn!(partner_id, error = %e, "cache read failed, treating as miss");
                return None;
            }
            Err(_) => {
                warn!(partner_id, "cache read timed out, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice::<CachedSummary>(&bytes) {
            Ok(cached) => {
                debug!(partner_id, total_requests = cached.total_requests, "profile summary cache hit");
                Some(ProfileSummary {
                    partner_id: cached.partner_id,
                    name: cached.name,
                    total_requests: cached.total_requests,
                    cache_status: CacheStatus::Hit,
                })
            }
            Err(e) => {
                warn!(partner_id, error = %e, "malformed cached summary, treating as miss");
                None
            }
        }
    }

    /// Best-effort cache population. A failure here must never fail the
    /// request: the freshly computed summary is returned regardless.
    async fn populate_cache(&self, key: &str, cached: &CachedSummary) {
        let bytes = match serde_json::to_vec(cached) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(partner_id = cached.partner_id, error = %e, "failed to serialize summary for cache");
                return;
            }
        };

        match timeout(self.cache_timeout, self.cache.set_with_ttl(key, bytes, self.ttl)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!(partner_id = cached.partner_id, error = %e, "cache write failed, serving uncached"),
            Err(_) => warn!(partner_id = cached.partner_id, "cache write timed out, serving uncached"),
        }
    }
}
