//! HTTP API
//!
//! JSON CRUD over communities and properties, aggregate stats, and the
//! spreadsheet template/export/import endpoints. Everything except health
//! and template download requires a bearer token; writes to records require
//! the admin role.

pub mod auth;
mod communities;
mod error;
mod extract;
mod health;
mod import_export;
mod properties;
mod state;
mod stats;

use anyhow::{Context, Result};
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method, header};
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;

pub use auth::{Role, issue_token};
pub use state::AppState;

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let cors = create_cors_layer(&state.settings.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.settings.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            "/api/communities",
            get(communities::list).post(communities::create),
        )
        .route(
            "/api/communities/:id",
            get(communities::get_one)
                .put(communities::update)
                .delete(communities::delete),
        )
        .route(
            "/api/properties",
            get(properties::list).post(properties::create),
        )
        .route(
            "/api/properties/:id",
            get(properties::get_one)
                .put(properties::update)
                .delete(properties::delete),
        )
        .route("/api/stats", get(stats::get_stats))
        .route(
            "/api/import-export/template/:kind",
            get(import_export::template),
        )
        .route("/api/import-export/export/:kind", get(import_export::export))
        .route("/api/import-export/:kind", post(import_export::import))
        .layer(body_limit)
        .layer(cors)
        .with_state(state)
}

fn create_cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Bind and serve until the process is stopped
pub async fn run_server(app: Router, addr: &str) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    log::info!("Server listening on {}", addr);
    log::info!("- Health endpoint: http://{}/health", addr);
    log::info!("- API root: http://{}/api", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
