//! Metrics for the team-draw service
//!
//! Prometheus counters and histograms for draws, the roster store, and the
//! HTTP surface, plus text exposition for the `/metrics` endpoint.

pub mod collector;

pub use collector::{DrawMetrics, MetricsCollector, MetricsTimer, RosterMetrics, ServiceMetrics};

use anyhow::Result;
use prometheus::{Encoder, TextEncoder};

/// Render every registered metric in the Prometheus text format
pub fn encode_metrics(collector: &MetricsCollector) -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = collector.registry().gather();

    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
