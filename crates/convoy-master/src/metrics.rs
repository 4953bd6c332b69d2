/*
 * Copyright (c) 2025 Dylan Storey
 * Licensed under the Elastic License 2.0.
 * See LICENSE file in the project root for full license text.
 */

//! # Metrics Module
//!
//! This module provides Prometheus metrics for the Convoy Master.
//! It exposes metrics about HTTP requests, deployment throughput, and fleet state.

use once_cell::sync::Lazy;
use prometheus::{
    CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge, Opts, Registry, TextEncoder,
};

/// Global Prometheus registry for all master metrics
pub static REGISTRY: Lazy<Registry> = Lazy::new(Registry::new);

/// HTTP request counter
/// Labels: endpoint, method, status
pub static HTTP_REQUESTS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "convoy_http_requests_total",
        "Total number of HTTP requests by endpoint and status",
    );
    let counter = CounterVec::new(opts, &["endpoint", "method", "status"])
        .expect("Failed to create HTTP requests counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register HTTP requests counter");
    counter
});

/// HTTP request duration histogram
/// Labels: endpoint, method
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let opts = HistogramOpts::new(
        "convoy_http_request_duration_seconds",
        "HTTP request latency distribution in seconds",
    )
    .buckets(vec![
        0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    ]);
    let histogram = HistogramVec::new(opts, &["endpoint", "method"])
        .expect("Failed to create HTTP request duration histogram");
    REGISTRY
        .register(Box::new(histogram.clone()))
        .expect("Failed to register HTTP request duration histogram");
    histogram
});

/// Number of agents currently marked ONLINE
pub static ONLINE_AGENTS: Lazy<IntGauge> = Lazy::new(|| {
    let opts = Opts::new("convoy_online_agents", "Number of agents marked ONLINE");
    let gauge = IntGauge::with_opts(opts).expect("Failed to create online agents gauge");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("Failed to register online agents gauge");
    gauge
});

/// Number of deployments waiting to be picked up
pub static PENDING_DEPLOYMENTS: Lazy<IntGauge> = Lazy::new(|| {
    let opts = Opts::new(
        "convoy_pending_deployments",
        "Number of deployments in PENDING status",
    );
    let gauge = IntGauge::with_opts(opts).expect("Failed to create pending deployments gauge");
    REGISTRY
        .register(Box::new(gauge.clone()))
        .expect("Failed to register pending deployments gauge");
    gauge
});

/// Completed deployment counter
/// Labels: outcome (success, failed)
pub static DEPLOYMENTS_COMPLETED_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    let opts = Opts::new(
        "convoy_deployments_completed_total",
        "Total number of completed deployments by outcome",
    );
    let counter = CounterVec::new(opts, &["outcome"])
        .expect("Failed to create completed deployments counter");
    REGISTRY
        .register(Box::new(counter.clone()))
        .expect("Failed to register completed deployments counter");
    counter
});

/// Encodes all registered metrics in Prometheus text format
///
/// # Returns
///
/// Returns a String containing all metrics in Prometheus exposition format
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = vec![];
    encoder
        .encode(&metric_families, &mut buffer)
        .expect("Failed to encode metrics");
    String::from_utf8(buffer).expect("Failed to convert metrics to UTF-8")
}
