use crate::{
    AppState,
    api::models::{
        PaginationQuery,
        predictions::{PredictionRequestCreate, PredictionRequestResponse},
    },
    db::{
        errors::DbError,
        handlers::{Partners, PredictionRequests, Repository},
        models::predictions::PredictionRequestCreateDBRequest,
    },
    errors::{Error, Result},
    types::PartnerId,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};

/// Record a prediction request fact
#[utoipa::path(
    post,
    path = "/partners/{partner_id}/prediction-requests",
    tag = "predictions",
    summary = "Record a prediction request",
    description = "Append one prediction fact for a partner. Payloads are stored verbatim as opaque documents.",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
    ),
    responses(
        (status = 201, description = "Prediction request recorded", body = PredictionRequestResponse),
        (status = 404, description = "Partner not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn create_prediction_request(
    State(state): State<AppState>,
    Path(partner_id): Path<PartnerId>,
    Json(data): Json<PredictionRequestCreate>,
) -> Result<(StatusCode, Json<PredictionRequestResponse>)> {
    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;
    let mut repo = PredictionRequests::new(&mut pool_conn);

    let request = PredictionRequestCreateDBRequest::new(partner_id, data);
    // The foreign key does the existence check for us.
    let record = match repo.create(&request).await {
        Ok(record) => record,
        Err(DbError::ForeignKeyViolation { .. }) => {
            return Err(Error::NotFound {
                resource: "Partner".to_string(),
                id: partner_id.to_string(),
            });
        }
        Err(e) => return Err(e.into()),
    };

    Ok((StatusCode::CREATED, Json(PredictionRequestResponse::from(record))))
}

/// List a partner's prediction requests
#[utoipa::path(
    get,
    path = "/partners/{partner_id}/prediction-requests",
    tag = "predictions",
    summary = "List a partner's prediction requests",
    description = "Most recent facts first.",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
        PaginationQuery
    ),
    responses(
        (status = 200, description = "List of prediction requests", body = [PredictionRequestResponse]),
        (status = 404, description = "Partner not found"),
        (status = 500, description = "Internal server error"),
    )
)]
pub async fn list_prediction_requests(
    State(state): State<AppState>,
    Path(partner_id): Path<PartnerId>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<Vec<PredictionRequestResponse>>> {
    let skip = query.skip.unwrap_or(0).max(0);
    let limit = query.limit.unwrap_or(100).clamp(1, 1000);

    let mut pool_conn = state.db.acquire().await.map_err(|e| Error::Database(e.into()))?;

    if Partners::new(&mut pool_conn).get_by_id(partner_id).await?.is_none() {
        return Err(Error::NotFound {
            resource: "Partner".to_string(),
            id: partner_id.to_string(),
        });
    }

    let records = PredictionRequests::new(&mut pool_conn)
        .list_for_partner(partner_id, skip, limit)
        .await?;

    Ok(Json(records.into_iter().map(PredictionRequestResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_app, create_test_partner};
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_prediction_request(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let partner = create_test_partner(&pool, "Ingest Co").await;

        let body = json!({
            "input_data": {"customer_id": 42, "features": [1.0, 0.5]},
            "prediction_output": {"churn_risk": "high", "confidence": 0.91}
        });

        let response = app
            .post(&format!("/api/v1/partners/{}/prediction-requests", partner.id))
            .json(&body)
            .await;

        response.assert_status(StatusCode::CREATED);
        let record: PredictionRequestResponse = response.json();
        assert_eq!(record.partner_id, partner.id);
        assert_eq!(record.prediction_output, Some(json!({"churn_risk": "high", "confidence": 0.91})));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_for_unknown_partner_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app
            .post("/api/v1/partners/999999/prediction-requests")
            .json(&json!({"input_data": null, "prediction_output": null}))
            .await;

        response.assert_status_not_found();
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_prediction_requests_newest_first(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let partner = create_test_partner(&pool, "History Co").await;

        for i in 0..4 {
            app.post(&format!("/api/v1/partners/{}/prediction-requests", partner.id))
                .json(&json!({"input_data": {"seq": i}}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = app.get(&format!("/api/v1/partners/{}/prediction-requests", partner.id)).await;
        response.assert_status_ok();
        let records: Vec<PredictionRequestResponse> = response.json();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].input_data, Some(json!({"seq": 3})));

        let response = app
            .get(&format!("/api/v1/partners/{}/prediction-requests?skip=2&limit=2", partner.id))
            .await;
        let page: Vec<PredictionRequestResponse> = response.json();
        assert_eq!(page.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_for_unknown_partner_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        let response = app.get("/api/v1/partners/999999/prediction-requests").await;
        response.assert_status_not_found();
    }
}
