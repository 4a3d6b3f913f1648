use crate::{
    AppState,
    api::models::summaries::ProfileSummary,
    errors::{Error, Result},
    types::PartnerId,
};
use axum::{
    extract::{Path, State},
    response::Json,
};

/// Get a partner's profile summary
#[utoipa::path(
    get,
    path = "/partners/{partner_id}/profile-summary",
    tag = "summaries",
    summary = "Get a partner's profile summary",
    description = "Cache-aside read: served from cache when a fresh entry exists, otherwise computed \
                   from the relational store and cached for the configured TTL. `cache_status` reports \
                   which path served this response. `total_requests` may lag the true count by up to \
                   the TTL.",
    params(
        ("partner_id" = i64, Path, description = "Partner ID"),
    ),
    responses(
        (status = 200, description = "Profile summary", body = ProfileSummary),
        (status = 404, description = "Partner not found"),
        (status = 503, description = "Authoritative store unavailable"),
    )
)]
pub async fn get_profile_summary(State(state): State<AppState>, Path(partner_id): Path<PartnerId>) -> Result<Json<ProfileSummary>> {
    let summary = state.summary_service.get_profile_summary(partner_id).await.map_err(Error::from)?;
    Ok(Json(summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::summaries::CacheStatus;
    use crate::test_utils::{create_test_app, create_test_partner, insert_prediction};
    use sqlx::PgPool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_summary_miss_then_hit(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let partner = create_test_partner(&pool, "Summary Co").await;
        for _ in 0..3 {
            insert_prediction(&pool, partner.id).await;
        }

        let response = app.get(&format!("/api/v1/partners/{}/profile-summary", partner.id)).await;
        response.assert_status_ok();
        let first: ProfileSummary = response.json();
        assert_eq!(first.partner_id, partner.id);
        assert_eq!(first.name, "Summary Co");
        assert_eq!(first.total_requests, 3);
        assert_eq!(first.cache_status, CacheStatus::Miss);

        let response = app.get(&format!("/api/v1/partners/{}/profile-summary", partner.id)).await;
        response.assert_status_ok();
        let second: ProfileSummary = response.json();
        assert_eq!(second.cache_status, CacheStatus::Hit);
        assert_eq!(second.total_requests, 3);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_summary_stale_within_ttl(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;
        let partner = create_test_partner(&pool, "Stale Co").await;
        insert_prediction(&pool, partner.id).await;

        // Prime the cache.
        let first: ProfileSummary = app
            .get(&format!("/api/v1/partners/{}/profile-summary", partner.id))
            .await
            .json();
        assert_eq!(first.total_requests, 1);

        // New facts within the TTL window are not yet reflected.
        insert_prediction(&pool, partner.id).await;
        let stale: ProfileSummary = app
            .get(&format!("/api/v1/partners/{}/profile-summary", partner.id))
            .await
            .json();
        assert_eq!(stale.cache_status, CacheStatus::Hit);
        assert_eq!(stale.total_requests, 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_summary_unknown_partner_not_found(pool: PgPool) {
        let app = create_test_app(pool).await;

        // Repeated lookups keep returning 404: absence is never cached.
        for _ in 0..2 {
            let response = app.get("/api/v1/partners/999999/profile-summary").await;
            response.assert_status_not_found();
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_summary_visible_right_after_creation(pool: PgPool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.get("/api/v1/partners/1/profile-summary").await;
        response.assert_status_not_found();

        let partner = create_test_partner(&pool, "Fresh Co").await;
        let response = app.get(&format!("/api/v1/partners/{}/profile-summary", partner.id)).await;
        response.assert_status_ok();
        let summary: ProfileSummary = response.json();
        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.cache_status, CacheStatus::Miss);
    }
}
