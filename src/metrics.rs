//! Prometheus metrics & middleware helper.

use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use once_cell::sync::Lazy;
use prometheus::IntCounter;

/// Global Prometheus handle reused in tests.
pub static METRICS: Lazy<PrometheusMetrics> = Lazy::new(|| {
    PrometheusMetricsBuilder::new("ladder")
        .endpoint("/metrics") // exposed URL
        .build()
        .expect("metrics builder")
});

/// Challenge results successfully recorded.
pub static RESULTS_POSTED: Lazy<IntCounter> = Lazy::new(|| {
    let counter = IntCounter::new("ladder_results_posted_total", "Challenge results recorded")
        .expect("counter");
    METRICS
        .registry
        .register(Box::new(counter.clone()))
        .expect("register counter");
    counter
});
