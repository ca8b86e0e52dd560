//! Controller metrics
//!
//! Prometheus counters and histograms for event dispatch and watch requeues.

use lazy_static::lazy_static;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Controller metrics registry
    pub static ref CONTROLLER_METRICS_REGISTRY: Registry = Registry::new();

    /// Event dispatch duration (all handlers of a registry)
    static ref EVENT_DISPATCH_DURATION: HistogramVec = {
        let opts = HistogramOpts::new(
            "event_dispatch_duration_seconds",
            "Event dispatch duration in seconds",
        );
        let histogram = HistogramVec::new(opts, &["event"])
            .expect("Failed to create histogram");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(histogram.clone()))
            .expect("Failed to register histogram");
        histogram
    };

    /// Events dispatched total
    static ref EVENT_DISPATCH_TOTAL: IntCounterVec = {
        let opts = Opts::new(
            "event_dispatch_total",
            "Total number of events dispatched to handlers",
        );
        let counter = IntCounterVec::new(opts, &["event", "result"])
            .expect("Failed to create counter");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(counter.clone()))
            .expect("Failed to register counter");
        counter
    };

    /// Watch events requeued after a failed callback
    static ref WATCH_EVENTS_REQUEUED_TOTAL: IntCounterVec = {
        let opts = Opts::new(
            "watch_events_requeued_total",
            "Total number of watch events requeued after a failed callback",
        );
        let counter = IntCounterVec::new(opts, &["resource"])
            .expect("Failed to create counter");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(counter.clone()))
            .expect("Failed to register counter");
        counter
    };

    /// Watch events dropped after exhausting their requeues
    static ref WATCH_EVENTS_DROPPED_TOTAL: IntCounterVec = {
        let opts = Opts::new(
            "watch_events_dropped_total",
            "Total number of watch events dropped after the maximum requeues",
        );
        let counter = IntCounterVec::new(opts, &["resource"])
            .expect("Failed to create counter");
        CONTROLLER_METRICS_REGISTRY
            .register(Box::new(counter.clone()))
            .expect("Failed to register counter");
        counter
    };
}

/// Record one event dispatch
pub fn record_event_dispatch(event: &str, duration_secs: f64, result: &str) {
    EVENT_DISPATCH_DURATION
        .with_label_values(&[event])
        .observe(duration_secs);

    EVENT_DISPATCH_TOTAL
        .with_label_values(&[event, result])
        .inc();
}

/// Record a requeued watch event
pub fn record_watch_requeue(resource: &str) {
    WATCH_EVENTS_REQUEUED_TOTAL
        .with_label_values(&[resource])
        .inc();
}

/// Record a dropped watch event
pub fn record_watch_drop(resource: &str) {
    WATCH_EVENTS_DROPPED_TOTAL
        .with_label_values(&[resource])
        .inc();
}

/// Gather controller metrics in Prometheus text format
pub fn gather_controller_metrics() -> Result<String, String> {
    let mut buffer = vec![];
    let encoder = TextEncoder::new();
    let metric_families = CONTROLLER_METRICS_REGISTRY.gather();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| format!("Failed to encode metrics: {}", e))?;

    String::from_utf8(buffer).map_err(|e| format!("Failed to convert to UTF-8: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_dispatch_metrics_recorded() {
        record_event_dispatch("RemoteEndpointCreated", 0.002, "success");

        let metrics = gather_controller_metrics().expect("Should gather metrics");

        assert!(
            metrics.contains("event_dispatch_total"),
            "Should contain counter metric"
        );
        assert!(
            metrics.contains("event_dispatch_duration_seconds"),
            "Should contain histogram metric"
        );
    }

    #[test]
    fn test_watch_drop_metrics_recorded() {
        record_watch_requeue("metrics-test-resource");
        record_watch_drop("metrics-test-resource");

        let metrics = gather_controller_metrics().expect("Should gather metrics");

        assert!(metrics.contains("watch_events_requeued_total"));
        assert!(metrics.contains("watch_events_dropped_total{resource=\"metrics-test-resource\"}"));
    }
}
