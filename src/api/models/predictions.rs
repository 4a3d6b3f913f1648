//! API models for prediction request facts.

use crate::db::models::predictions::PredictionRequestDBResponse;
use crate::types::{PartnerId, PredictionRequestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Request body for appending one prediction fact.
///
/// Both payloads are opaque structured documents; the service stores them
/// verbatim and never inspects their contents.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct PredictionRequestCreate {
    pub input_data: Option<serde_json::Value>,
    pub prediction_output: Option<serde_json::Value>,
}

/// Prediction fact returned by the API
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionRequestResponse {
    pub id: PredictionRequestId,
    pub partner_id: PartnerId,
    pub input_data: Option<serde_json::Value>,
    pub prediction_output: Option<serde_json::Value>,
    pub requested_at: DateTime<Utc>,
}

impl From<PredictionRequestDBResponse> for PredictionRequestResponse {
    fn from(db: PredictionRequestDBResponse) -> Self {
        Self {
            id: db.id,
            partner_id: db.partner_id,
            input_data: db.input_data,
            prediction_output: db.prediction_output,
            requested_at: db.requested_at,
        }
    }
}
