//! Database models for prediction request facts.

use crate::api::models::predictions::PredictionRequestCreate;
use crate::types::{PartnerId, PredictionRequestId};
use chrono::{DateTime, Utc};

/// Database request for appending one prediction fact.
///
/// Payloads are opaque JSONB documents; the service never inspects their
/// contents.
#[derive(Debug, Clone)]
pub struct PredictionRequestCreateDBRequest {
    pub partner_id: PartnerId,
    pub input_data: Option<serde_json::Value>,
    pub prediction_output: Option<serde_json::Value>,
}

impl PredictionRequestCreateDBRequest {
    pub fn new(partner_id: PartnerId, api: PredictionRequestCreate) -> Self {
        Self {
            partner_id,
            input_data: api.input_data,
            prediction_output: api.prediction_output,
        }
    }
}

/// Database response for a prediction fact
#[derive(Debug, Clone)]
pub struct PredictionRequestDBResponse {
    pub id: PredictionRequestId,
    pub partner_id: PartnerId,
    pub input_data: Option<serde_json::Value>,
    pub prediction_output: Option<serde_json::Value>,
    pub requested_at: DateTime<Utc>,
}
