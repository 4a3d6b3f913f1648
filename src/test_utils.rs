//! Test utilities for integration testing.

use crate::db::handlers::{Partners, PredictionRequests, Repository};
use crate::db::models::partners::{PartnerCreateDBRequest, PartnerDBResponse};
use crate::db::models::predictions::{PredictionRequestCreateDBRequest, PredictionRequestDBResponse};
use crate::types::PartnerId;
use axum_test::TestServer;
use sqlx::PgPool;
use std::time::Duration;

pub async fn create_test_app(pool: PgPool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, pool)
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> crate::config::Config {
    crate::config::Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: crate::config::DatabaseConfig {
            // Overridden by the pool handed in by sqlx::test
            url: "unused".to_string(),
            max_connections: 1,
            ..Default::default()
        },
        summary_cache: crate::config::SummaryCacheConfig {
            ttl: Duration::from_secs(60),
            max_entries: 64,
            ..Default::default()
        },
    }
}

pub async fn create_test_partner(pool: &PgPool, name: &str) -> PartnerDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = Partners::new(&mut conn);

    let request = PartnerCreateDBRequest {
        name: name.to_string(),
        api_key: crate::crypto::generate_api_key(),
    };

    repo.create(&request).await.expect("Failed to create test partner")
}

pub async fn insert_prediction(pool: &PgPool, partner_id: PartnerId) -> PredictionRequestDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    let mut repo = PredictionRequests::new(&mut conn);

    let request = PredictionRequestCreateDBRequest {
        partner_id,
        input_data: Some(serde_json::json!({"source": "test"})),
        prediction_output: None,
    };

    repo.create(&request).await.expect("Failed to insert test prediction")
}
