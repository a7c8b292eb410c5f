//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the spotlist server:
//! - HTTP request metrics (latency, counts, in flight)
//! - Catalog operation outcomes
//! - Catalog size (collected on scrape)

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "spotlist_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0,
        ]),
        &["method", "path", "status"],
    )
    .expect("valid histogram definition")
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("spotlist_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("valid counter definition")
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "spotlist_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .expect("valid gauge definition")
});

// =============================================================================
// Catalog Metrics
// =============================================================================

/// Catalog operations by operation name and outcome.
pub static SPOT_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "spotlist_spot_operations_total",
            "Catalog write operations by outcome",
        ),
        &["operation", "outcome"], // outcome: "applied", "missing", "error"
    )
    .expect("valid counter definition")
});

/// Stored spots (collected dynamically).
pub static SPOTS: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new("spotlist_spots", "Number of spots in the catalog")
        .expect("valid gauge definition")
});

/// Path label for requests that matched no route.
pub const UNMATCHED_PATH: &str = "unmatched";

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    let collectors: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(HTTP_REQUEST_DURATION.clone()),
        Box::new(HTTP_REQUESTS_TOTAL.clone()),
        Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()),
        Box::new(SPOT_OPERATIONS_TOTAL.clone()),
        Box::new(SPOTS.clone()),
    ];

    for collector in collectors {
        if let Err(e) = registry.register(collector) {
            tracing::warn!("Failed to register metric: {}", e);
        }
    }
}

/// Record the outcome of a catalog operation.
pub fn record_operation(operation: &str, outcome: &str) {
    SPOT_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Collect dynamic metrics from current application state.
///
/// Called before encoding so gauges reflect the catalog at scrape time.
pub fn collect_dynamic_metrics(state: &crate::state::AppState) {
    match state.catalog().count() {
        Ok(count) => SPOTS.set(count),
        Err(e) => tracing::warn!("Failed to count spots for metrics: {}", e),
    }
}
