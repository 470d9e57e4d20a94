use std::time::Instant;

use axum::{extract::Request, http::StatusCode, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter,
    IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("railway_http_requests_total", "Total HTTP requests handled")
        .expect("register requests_total")
});

pub static REQUEST_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "railway_http_request_duration_seconds",
        "Request duration in seconds",
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("register request_duration")
});

pub static REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "railway_http_rejections_total",
        "Requests answered with an error status",
        &["status"]
    )
    .expect("register rejections_total")
});

pub static DOMAIN_EVENTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "railway_domain_events_total",
        "Successful create/update/delete operations",
        &["event"]
    )
    .expect("register domain_events_total")
});

pub fn record_rejection(status: StatusCode) {
    REJECTIONS_TOTAL.with_label_values(&[status.as_str()]).inc();
}

pub fn record_event(event: &str) {
    DOMAIN_EVENTS_TOTAL.with_label_values(&[event]).inc();
}

/// Count every request and observe its latency.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let started = Instant::now();
    let resp = next.run(req).await;
    REQUESTS_TOTAL.inc();
    REQUEST_DURATION.observe(started.elapsed().as_secs_f64());
    resp
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_text_output() {
        record_event("carriage_created");
        record_rejection(StatusCode::CONFLICT);
        let (status, body) = encode_metrics();
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("railway_domain_events_total{event=\"carriage_created\"}"));
        assert!(body.contains("railway_http_rejections_total{status=\"409\"}"));
    }
}
