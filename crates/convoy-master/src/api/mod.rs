/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # API Routes Aggregator Module
//!
//! This module aggregates all API routes and provides a function to configure the main router.
//! It also hosts the operational endpoints (health, readiness, metrics) and the
//! request-tracking middleware.

pub mod v1;

use crate::dal::DAL;
use crate::metrics::{
    encode_metrics, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS, ONLINE_AGENTS,
    PENDING_DEPLOYMENTS,
};
use axum::{
    extract::{Request, State},
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use convoy_utils::config::Cors;
use hyper::StatusCode;
use std::time::{Duration, Instant};
use tower_http::cors::{Any, CorsLayer};

/// Configures and returns the main application router with all API routes.
pub fn configure_api_routes() -> Router<DAL> {
    Router::new()
        .nest("/api/v1", v1::routes())
        .merge(v1::openapi::configure_openapi())
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .layer(middleware::from_fn(track_metrics))
}

/// Builds the CORS layer from configuration.
pub fn cors_layer(cfg: &Cors) -> CorsLayer {
    let mut layer = CorsLayer::new().max_age(Duration::from_secs(cfg.max_age_seconds));

    layer = if cfg.allowed_origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = cfg
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer.allow_origin(origins)
    };

    let methods: Vec<Method> = cfg
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    layer = layer.allow_methods(methods);

    layer = if cfg.allowed_headers.iter().any(|h| h == "*") {
        layer.allow_headers(Any)
    } else {
        let headers: Vec<axum::http::HeaderName> = cfg
            .allowed_headers
            .iter()
            .filter_map(|h| h.parse().ok())
            .collect();
        layer.allow_headers(headers)
    };

    layer
}

/// Records request count and latency for every handled request.
async fn track_metrics(req: Request, next: Next) -> Response {
    let endpoint = req.uri().path().to_string();
    let method = req.method().to_string();
    let start = Instant::now();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&endpoint, &method, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&endpoint, &method])
        .observe(start.elapsed().as_secs_f64());

    response
}

/// Health check endpoint handler
///
/// Returns a 200 OK status code with "OK" in the body.
async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready check endpoint handler
///
/// Returns a 200 OK status code with "Ready" in the body.
async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, "Ready")
}

/// Metrics endpoint handler
///
/// Refreshes the fleet gauges from the database, then returns all registered
/// metrics in Prometheus exposition format.
async fn metrics(State(dal): State<DAL>) -> impl IntoResponse {
    if let Ok(count) = dal.agents().count_online() {
        ONLINE_AGENTS.set(count);
    }
    if let Ok(count) = dal.deployments().count_pending() {
        PENDING_DEPLOYMENTS.set(count);
    }
    (StatusCode::OK, encode_metrics())
}
