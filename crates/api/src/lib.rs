//! HTTP API server for the product catalog service.
//!
//! Provides REST endpoints for products and account assignments, with
//! structured logging (tracing) and Prometheus metrics. The router is
//! built by [`create_app`] so integration tests can drive it directly
//! without binding a socket.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use catalog::{AccountsClient, CatalogService, CatalogStore, HttpAccountsClient};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<A: AccountsClient + 'static>(
    state: Arc<AppState<A>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", post(routes::products::create::<A>))
        .route("/products", get(routes::products::list::<A>))
        .route("/products/all", get(routes::products::list_all::<A>))
        .route("/products/{id}", get(routes::products::get::<A>))
        .route("/products/{id}/assign", post(routes::products::assign::<A>))
        .route("/assignments", get(routes::assignments::list::<A>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: an empty store wired to the
/// HTTP accounts client from configuration.
pub fn create_default_state(config: &Config) -> Arc<AppState<HttpAccountsClient>> {
    let accounts = HttpAccountsClient::new(config.accounts_base_url.clone());
    let service = CatalogService::new(CatalogStore::new(), accounts, config.charge_on_assign);
    Arc::new(AppState { service })
}
