//! Prometheus metrics for the bot.
//!
//! Metrics are exposed in Prometheus text format on `METRICS_BIND` when it is
//! configured; otherwise the recorders are no-ops.
//!
//! # Metrics Categories
//!
//! - **Event Metrics**: Inbound events by kind, routing outcomes
//! - **Delivery Metrics**: Delivered and failed notifications
//! - **Tournament Metrics**: Tournaments created so far
//!
//! # Example Usage
//!
//! ```rust,no_run
//! use tourney_bot::metrics;
//! use std::net::SocketAddr;
//!
//! let addr: SocketAddr = "127.0.0.1:9090".parse().unwrap();
//! metrics::init_metrics(addr).unwrap();
//!
//! metrics::events_received_total("button_tap");
//! ```

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize Prometheus metrics exporter.
///
/// Metrics will be available at `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))
}

// ============================================================================
// Event Metrics
// ============================================================================

/// Increment the inbound event counter for one event kind.
pub fn events_received_total(kind: &'static str) {
    metrics::counter!("events_received_total", "kind" => kind).increment(1);
}

/// Increment the routing outcome counter.
pub fn events_routed_total(outcome: &'static str) {
    metrics::counter!("events_routed_total", "outcome" => outcome).increment(1);
}

// ============================================================================
// Delivery Metrics
// ============================================================================

/// Increment delivered notifications counter.
pub fn notifications_delivered_total() {
    metrics::counter!("notifications_delivered_total").increment(1);
}

/// Increment failed notifications counter.
pub fn notification_failures_total(reason: &'static str) {
    metrics::counter!("notification_failures_total", "reason" => reason).increment(1);
}

// ============================================================================
// Tournament Metrics
// ============================================================================

/// Set the number of tournaments created since startup.
pub fn tournaments_total(count: usize) {
    metrics::gauge!("tournaments_total").set(count as f64);
}
