//! ddx-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
mod middleware;
mod routes;
mod terminology;
mod tracking;

use std::sync::Arc;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use ddx_core::HeadingParser;
use deadpool_postgres::Pool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{DiagnosisModel, ModelClient, TreatmentModel};
use config::Config;
use terminology::TerminologyClient;
use tracking::RequestTracker;

/// Build the full application router with all routes and middleware.
///
/// Fails only if an HTTP client for the upstream services cannot be built.
pub fn build_app(pool: Pool, config: &Config) -> Result<Router, reqwest::Error> {
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    // Model clients share one connection pool and retry policy
    let model_client = ModelClient::new(config.model_timeout, config.retry.clone())?;
    let ddx_model = DiagnosisModel::new(model_client.clone(), config.ddx.clone());
    let ttx_model = TreatmentModel::new(model_client, config.ttx.clone());

    let http = reqwest::Client::builder().build()?;
    let tracker = RequestTracker::new(http.clone(), &config.elasticsearch_url);
    let terminology = TerminologyClient::new(http, &config.snomed_base_url);

    let parser = Arc::new(HeadingParser::new(config.parse_options.clone()));

    let api_routes = routes::api_routes()
        .layer(Extension(ddx_model))
        .layer(Extension(ttx_model))
        .layer(Extension(tracker))
        .layer(Extension(terminology))
        .layer(Extension(parser))
        .layer(Extension(config.concepts.clone()))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // build_recorder() + set_global_recorder() so repeated calls in tests
    // still return a usable handle
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let ops_routes = Router::new()
        .route("/health", get(routes::ops::health))
        .route("/metrics", get(routes::ops::metrics))
        .layer(Extension(prometheus_handle));

    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Ok(Router::new()
        .merge(ops_routes)
        .merge(api_routes)
        .with_state(pool)
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware)))
}
