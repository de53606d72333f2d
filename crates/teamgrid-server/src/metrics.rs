//! Counters and histograms recorded through the `metrics` facade.
//!
//! The server registers descriptions at startup; an exporter installed by
//! the deployment turns the recorded values into whatever backend is in
//! use.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};

/// Register descriptions for every metric the server emits.
///
/// Call once at startup, before the first request is served.
pub fn init_metrics() {
    describe_counter!(
        "timeline_mutations_total",
        "Total number of applied timeline mutations"
    );
    describe_counter!(
        "timeline_merged_days_total",
        "Total number of destination days absorbed by block moves"
    );
    describe_histogram!(
        "timeline_query_duration_seconds",
        "Timeline range query duration in seconds"
    );
    describe_counter!(
        "http_requests_errors_total",
        "Total number of HTTP requests answered with a server error"
    );

    tracing::info!("Metric descriptions registered");
}

/// Record an applied timeline mutation
pub fn record_timeline_mutation(operation: &str) {
    counter!("timeline_mutations_total", "operation" => operation.to_string()).increment(1);
}

/// Record destination days absorbed by a block move
pub fn record_merged_days(merged_days: u32) {
    counter!("timeline_merged_days_total").increment(u64::from(merged_days));
}

/// Record a timeline range query
pub fn record_timeline_query(kind: &str, duration_secs: f64) {
    histogram!("timeline_query_duration_seconds", "kind" => kind.to_string())
        .record(duration_secs);
}

/// Record an HTTP request answered with a server error
pub fn record_request_error(path: &str) {
    counter!("http_requests_errors_total", "path" => path.to_string()).increment(1);
}

/// Measures elapsed seconds for histogram recording.
pub struct Timer(Instant);

impl Timer {
    pub fn start() -> Self {
        Timer(Instant::now())
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.0.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_reports_elapsed_seconds() {
        let timer = Timer::start();
        std::thread::sleep(std::time::Duration::from_millis(10));
        assert!(timer.elapsed_secs() >= 0.01);
    }
}
