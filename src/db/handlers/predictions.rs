//! Database repository for prediction request facts.
//!
//! Prediction requests are append-only: rows are written once per external
//! prediction event and never mutated or deleted, so this repository does not
//! implement the full [`crate::db::handlers::Repository`] trait. The summary
//! service depends on [`PredictionRequests::count_for_partner`], a single
//! aggregate COUNT whose cost is independent of history size.

use crate::db::{
    errors::Result,
    models::predictions::{PredictionRequestCreateDBRequest, PredictionRequestDBResponse},
};
use crate::types::PartnerId;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection};
use tracing::instrument;

// Database entity model
#[derive(Debug, Clone, FromRow)]
struct PredictionRequest {
    pub id: i64,
    pub partner_id: i64,
    pub input_data: Option<serde_json::Value>,
    pub prediction_output: Option<serde_json::Value>,
    pub requested_at: DateTime<Utc>,
}

impl From<PredictionRequest> for PredictionRequestDBResponse {
    fn from(row: PredictionRequest) -> Self {
        Self {
            id: row.id,
            partner_id: row.partner_id,
            input_data: row.input_data,
            prediction_output: row.prediction_output,
            requested_at: row.requested_at,
        }
    }
}

pub struct PredictionRequests<'c> {
    db: &'c mut PgConnection,
}

impl<'c> PredictionRequests<'c> {
    pub fn new(db: &'c mut PgConnection) -> Self {
        Self { db }
    }

    /// Append one prediction fact.
    #[instrument(skip(self, request), fields(partner_id = request.partner_id), err)]
    pub async fn create(&mut self, request: &PredictionRequestCreateDBRequest) -> Result<PredictionRequestDBResponse> {
        let row = sqlx::query_as::<_, PredictionRequest>(
            r#"
            INSERT INTO prediction_requests (partner_id, input_data, prediction_output)
            VALUES ($1, $2, $3)
            RETURNING id, partner_id, input_data, prediction_output, requested_at
            "#,
        )
        .bind(request.partner_id)
        .bind(&request.input_data)
        .bind(&request.prediction_output)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(row.into())
    }

    /// Total prediction requests recorded for a partner.
    #[instrument(skip(self), err)]
    pub async fn count_for_partner(&mut self, partner_id: PartnerId) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM prediction_requests WHERE partner_id = $1")
            .bind(partner_id)
            .fetch_one(&mut *self.db)
            .await?;

        Ok(count)
    }

    /// Most recent facts for a partner, newest first.
    #[instrument(skip(self), fields(partner_id, limit, skip), err)]
    pub async fn list_for_partner(&mut self, partner_id: PartnerId, skip: i64, limit: i64) -> Result<Vec<PredictionRequestDBResponse>> {
        let rows = sqlx::query_as::<_, PredictionRequest>(
            r#"
            SELECT id, partner_id, input_data, prediction_output, requested_at
            FROM prediction_requests
            WHERE partner_id = $1
            ORDER BY requested_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(partner_id)
        .bind(limit)
        .bind(skip)
        .fetch_all(&mut *self.db)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::errors::DbError;
    use crate::test_utils::create_test_partner;
    use serde_json::json;
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_and_count(pool: PgPool) {
        let partner = create_test_partner(&pool, "Counting Co").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = PredictionRequests::new(&mut conn);

        assert_eq!(repo.count_for_partner(partner.id).await.unwrap(), 0);

        for i in 0..3 {
            let request = PredictionRequestCreateDBRequest {
                partner_id: partner.id,
                input_data: Some(json!({"event": i})),
                prediction_output: Some(json!({"churn_risk": "high", "confidence": 0.88})),
            };
            let created = repo.create(&request).await.unwrap();
            assert_eq!(created.partner_id, partner.id);
        }

        assert_eq!(repo.count_for_partner(partner.id).await.unwrap(), 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_count_scoped_to_partner(pool: PgPool) {
        let partner_a = create_test_partner(&pool, "Partner A").await;
        let partner_b = create_test_partner(&pool, "Partner B").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = PredictionRequests::new(&mut conn);

        for _ in 0..2 {
            repo.create(&PredictionRequestCreateDBRequest {
                partner_id: partner_a.id,
                input_data: None,
                prediction_output: None,
            })
            .await
            .unwrap();
        }
        repo.create(&PredictionRequestCreateDBRequest {
            partner_id: partner_b.id,
            input_data: None,
            prediction_output: None,
        })
        .await
        .unwrap();

        assert_eq!(repo.count_for_partner(partner_a.id).await.unwrap(), 2);
        assert_eq!(repo.count_for_partner(partner_b.id).await.unwrap(), 1);
        // A partner with no history counts zero rather than erroring
        assert_eq!(repo.count_for_partner(999_999).await.unwrap(), 0);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_newest_first(pool: PgPool) {
        let partner = create_test_partner(&pool, "Lister").await;
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = PredictionRequests::new(&mut conn);

        let mut ids = Vec::new();
        for i in 0..5 {
            let created = repo
                .create(&PredictionRequestCreateDBRequest {
                    partner_id: partner.id,
                    input_data: Some(json!({"seq": i})),
                    prediction_output: None,
                })
                .await
                .unwrap();
            ids.push(created.id);
        }

        let page = repo.list_for_partner(partner.id, 0, 3).await.unwrap();
        assert_eq!(page.len(), 3);
        assert_eq!(page[0].id, ids[4]);

        let rest = repo.list_for_partner(partner.id, 3, 3).await.unwrap();
        assert_eq!(rest.len(), 2);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_unknown_partner_rejected(pool: PgPool) {
        let mut conn = pool.acquire().await.unwrap();
        let mut repo = PredictionRequests::new(&mut conn);

        let err = repo
            .create(&PredictionRequestCreateDBRequest {
                partner_id: 999_999,
                input_data: None,
                prediction_output: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }
}
