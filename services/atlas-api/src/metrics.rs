//! Request metrics.
//!
//! Counters and histograms go through the `metrics` facade; the binary
//! installs the Prometheus recorder and `/metrics` renders it. Without a
//! recorder (tests) every call is a no-op.

use std::time::Instant;

use metrics::{counter, histogram};

/// Times one request and records it when dropped.
#[derive(Debug)]
pub struct RequestTimer {
    endpoint: &'static str,
    start: Instant,
}

impl RequestTimer {
    pub fn start(endpoint: &'static str) -> Self {
        counter!("atlas_requests_total", "endpoint" => endpoint).increment(1);
        Self {
            endpoint,
            start: Instant::now(),
        }
    }
}

impl Drop for RequestTimer {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_secs_f64() * 1000.0;
        histogram!("atlas_request_duration_ms", "endpoint" => self.endpoint).record(elapsed_ms);
    }
}

/// Count an error response by its machine code.
pub fn record_error(code: &'static str) {
    counter!("atlas_errors_total", "code" => code).increment(1);
}

/// Record what was loaded at startup.
pub fn record_startup(years: usize, counties: usize, boundaries: usize) {
    metrics::gauge!("atlas_dataset_years").set(years as f64);
    metrics::gauge!("atlas_dataset_counties").set(counties as f64);
    metrics::gauge!("atlas_boundaries").set(boundaries as f64);
}
