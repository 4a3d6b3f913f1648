//! OpenAPI documentation for the partner analytics API at `/api/v1/*`.

use utoipa::OpenApi;

use crate::api::handlers;
use crate::api::models::{partners, predictions, summaries};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "insightd API",
        description = "Partner provisioning, prediction request ingestion, and cached profile summaries.",
    ),
    paths(
        handlers::partners::create_partner,
        handlers::partners::list_partners,
        handlers::partners::get_partner,
        handlers::partners::get_partner_by_api_key,
        handlers::partners::update_partner,
        handlers::partners::delete_partner,
        handlers::predictions::create_prediction_request,
        handlers::predictions::list_prediction_requests,
        handlers::summaries::get_profile_summary,
    ),
    components(schemas(
        partners::PartnerCreate,
        partners::PartnerUpdate,
        partners::PartnerResponse,
        predictions::PredictionRequestCreate,
        predictions::PredictionRequestResponse,
        summaries::CacheStatus,
        summaries::ProfileSummary,
    )),
    tags(
        (name = "partners", description = "Partner provisioning and lookup"),
        (name = "predictions", description = "Prediction request facts"),
        (name = "summaries", description = "Cached partner profile summaries"),
    )
)]
pub struct ApiDoc;
