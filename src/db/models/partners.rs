//! Database models for partners.

use crate::api::models::partners::{PartnerCreate, PartnerUpdate};
use crate::types::PartnerId;
use chrono::{DateTime, Utc};

/// Database request for provisioning a new partner.
///
/// The API key is generated by the caller (see [`crate::crypto::generate_api_key`])
/// so that provisioning stays a single INSERT.
#[derive(Debug, Clone)]
pub struct PartnerCreateDBRequest {
    pub name: String,
    pub api_key: String,
}

impl PartnerCreateDBRequest {
    pub fn new(api: PartnerCreate, api_key: String) -> Self {
        Self { name: api.name, api_key }
    }
}

/// Database request for the administrative partner update
#[derive(Debug, Clone)]
pub struct PartnerUpdateDBRequest {
    pub name: Option<String>,
}

impl From<PartnerUpdate> for PartnerUpdateDBRequest {
    fn from(api: PartnerUpdate) -> Self {
        Self { name: api.name }
    }
}

/// Database response for a partner
#[derive(Debug, Clone)]
pub struct PartnerDBResponse {
    pub id: PartnerId,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}
