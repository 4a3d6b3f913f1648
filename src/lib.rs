//! Partner analytics service with cached profile summaries.
//!
//! insightd tracks partners and the prediction requests they make, and serves
//! a derived "profile summary" per partner (identity plus total request
//! count). Summaries are expensive relative to their churn, so reads go
//! through a cache-aside layer: a fresh cached copy short-circuits the
//! relational store entirely, a miss recomputes from it and repopulates the
//! cache with a fixed TTL. The relational store remains the single source of
//! truth throughout; the cache is a disposable accelerator whose failure
//! never fails a request.
//!
//! # Architecture
//!
//! - [`api`]: HTTP models and axum handlers for `/api/v1/*`
//! - [`db`]: repositories over PostgreSQL (partners, prediction requests)
//! - [`cache`]: the [`cache::SummaryCache`] seam and its in-process
//!   implementation
//! - [`summary`]: the cache-aside orchestration and its error taxonomy
//! - [`config`]: YAML + environment configuration
//!
//! # Usage
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! use insightd::{Application, Config, config::Args};
//! use clap::Parser;
//!
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//! Application::new(config).await?.serve(std::future::pending()).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod crypto;
pub mod db;
pub mod errors;
mod openapi;
pub mod summary;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use crate::cache::MokaSummaryCache;
use crate::openapi::ApiDoc;
use crate::summary::{PgPartnerStore, SummaryService};
use axum::{
    Router,
    routing::{get, post},
};
pub use config::Config;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use types::{PartnerId, PredictionRequestId};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Config,
    pub summary_service: SummaryService,
}

/// Get the insightd database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Connect to the database with bounded retry and run migrations.
///
/// At startup the database may still be coming up (container orchestration),
/// so connection attempts are retried with a fixed backoff up to the
/// configured limit before failing hard.
#[instrument(skip_all)]
async fn setup_database(config: &Config) -> anyhow::Result<PgPool> {
    let db = &config.database;

    let mut attempt = 1u32;
    let pool = loop {
        match PgPoolOptions::new().max_connections(db.max_connections).connect(&db.url).await {
            Ok(pool) => break pool,
            Err(e) if attempt < db.connect_attempts => {
                warn!(attempt, error = %e, "Database not ready, retrying in {:?}", db.connect_backoff);
                tokio::time::sleep(db.connect_backoff).await;
                attempt += 1;
            }
            Err(e) => {
                return Err(anyhow::Error::from(e).context(format!("failed to connect to database after {attempt} attempts")));
            }
        }
    };

    migrator().run(&pool).await?;
    info!("Database connected and migrations applied");

    Ok(pool)
}

/// Build the application router with all endpoints and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(
            "/partners",
            post(api::handlers::partners::create_partner).get(api::handlers::partners::list_partners),
        )
        .route(
            "/partners/{partner_id}",
            get(api::handlers::partners::get_partner)
                .patch(api::handlers::partners::update_partner)
                .delete(api::handlers::partners::delete_partner),
        )
        .route("/partners/by-key/{api_key}", get(api::handlers::partners::get_partner_by_api_key))
        .route(
            "/partners/{partner_id}/prediction-requests",
            post(api::handlers::predictions::create_prediction_request).get(api::handlers::predictions::list_prediction_requests),
        )
        .route(
            "/partners/{partner_id}/profile-summary",
            get(api::handlers::summaries::get_profile_summary),
        )
        .with_state(state);

    Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { axum::Json(ApiDoc::openapi()) }))
        .nest("/api/v1", api_routes)
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

/// The running application: router, state, and database pool.
///
/// # Lifecycle
///
/// 1. **Create**: [`Application::new`] connects to the database with retry,
///    runs migrations, and wires up the summary cache
/// 2. **Serve**: [`Application::serve`] binds to a TCP port and handles
///    requests until the shutdown future resolves
pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Create a new application instance with all resources initialized
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting insightd with configuration: {:#?}", config);

        let pool = setup_database(&config).await?;
        Ok(Self::from_pool(config, pool))
    }

    /// Create an application over an existing pool, skipping connection setup.
    ///
    /// The pool is expected to be migrated already (e.g. by `sqlx::test`).
    pub async fn new_with_pool(config: Config, pool: PgPool) -> anyhow::Result<Self> {
        Ok(Self::from_pool(config, pool))
    }

    fn from_pool(config: Config, pool: PgPool) -> Self {
        let store = Arc::new(PgPartnerStore::new(pool.clone()));
        let cache = Arc::new(MokaSummaryCache::new(config.summary_cache.max_entries));
        let summary_service = SummaryService::new(store, cache, &config.summary_cache);

        let state = AppState {
            db: pool.clone(),
            config: config.clone(),
            summary_service,
        };
        let router = build_router(state);

        Self { router, config, pool }
    }

    /// Convert application into a test server (for tests)
    #[cfg(test)]
    pub fn into_test_server(self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router).expect("Failed to create test server")
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!("insightd listening on http://{}", bind_addr);

        axum::serve(listener, self.router.into_make_service())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
