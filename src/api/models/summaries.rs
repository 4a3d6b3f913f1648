//! API models for partner profile summaries.

use crate::types::PartnerId;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provenance of a returned summary: served from cache or freshly computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CacheStatus {
    Hit,
    Miss,
}

/// Derived, ephemeral view of a partner's request activity.
///
/// `total_requests` equals the authoritative COUNT of prediction requests at
/// the instant of computation; a cached copy may lag the true value by up to
/// the configured TTL. `cache_status` is stamped by the reader and is never
/// part of the cached payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub partner_id: PartnerId,
    pub name: String,
    pub total_requests: i64,
    pub cache_status: CacheStatus,
}
