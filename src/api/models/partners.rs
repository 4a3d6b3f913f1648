//! API models for partners.

use crate::db::models::partners::PartnerDBResponse;
use crate::types::PartnerId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for provisioning a partner
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartnerCreate {
    pub name: String,
}

/// Request body for the administrative partner update
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PartnerUpdate {
    pub name: Option<String>,
}

/// Partner record returned by the API.
///
/// The opaque credential is returned on creation and lookup; callers are
/// expected to store it, as it is never derivable.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PartnerResponse {
    pub id: PartnerId,
    pub name: String,
    pub api_key: String,
    pub created_at: DateTime<Utc>,
}

impl From<PartnerDBResponse> for PartnerResponse {
    fn from(db: PartnerDBResponse) -> Self {
        Self {
            id: db.id,
            name: db.name,
            api_key: db.api_key,
            created_at: db.created_at,
        }
    }
}
