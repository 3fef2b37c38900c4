//! Metrics collection module for the match service
//!
//! This module provides functionality for collecting and exposing service metrics
//! using Prometheus.

use lazy_static::lazy_static;
use prometheus::{
    Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};
use std::future::Future;
use std::time::Instant;

lazy_static! {
    /// Global Prometheus registry instance
    pub static ref REGISTRY_INSTANCE: Registry = Registry::new();

    /// Counter for tracking request counts by method
    pub static ref REQ_COUNTER_VEC: CounterVec =
        CounterVec::new(Opts::new("request_counter", "request counter"), &["method"]).unwrap();

    /// Histogram for tracking method execution times
    pub static ref METHOD_HISTOGRAM_VEC: HistogramVec = HistogramVec::new(
        HistogramOpts::new("method_cost", "method cost"),
        &["method"]
    )
    .unwrap();

    /// Candidates skipped because their collection could not be read
    pub static ref CANDIDATE_READ_FAILURES: Counter = Counter::new(
        "candidate_read_failures",
        "candidates excluded after a failed collection read"
    )
    .unwrap();
}

/// Initializes the metrics registry
///
/// Registers all metric collectors with the global registry
pub fn init_registry() {
    let _ = REGISTRY_INSTANCE.register(Box::new(REQ_COUNTER_VEC.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(METHOD_HISTOGRAM_VEC.clone()));
    let _ = REGISTRY_INSTANCE.register(Box::new(CANDIDATE_READ_FAILURES.clone()));
}

/// Encodes every registered metric in the Prometheus text format
pub fn gather_text() -> Result<Vec<u8>, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY_INSTANCE.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(buffer)
}

/// Records metrics for an async operation
///
/// Counts the call under `method_name` and observes how long `handler` took.
pub async fn record_metrics<F, Fut, T>(method_name: &'static str, handler: F) -> T
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let start = Instant::now();
    REQ_COUNTER_VEC.with_label_values(&[method_name]).inc();
    let result = handler().await;

    let elapsed = start.elapsed();
    METHOD_HISTOGRAM_VEC
        .with_label_values(&[method_name])
        .observe(elapsed.as_secs_f64());

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_record_metrics_counts_calls() {
        init_registry();
        let before = REQ_COUNTER_VEC.with_label_values(&["metrics_test"]).get();
        let value = record_metrics("metrics_test", || async { 42 }).await;

        assert_eq!(value, 42);
        assert_eq!(
            REQ_COUNTER_VEC.with_label_values(&["metrics_test"]).get(),
            before + 1.0
        );
        let text = String::from_utf8(gather_text().unwrap()).unwrap();
        assert!(text.contains("request_counter"));
    }
}
