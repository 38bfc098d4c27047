//! HTTP request metrics and the Prometheus endpoint
//!
//! - `digiworld_http_requests_total{method, route, status}` - request counter
//! - `digiworld_http_request_duration_seconds{method, route}` - latency histogram

use anyhow::Result;
use axum::extract::{MatchedPath, Request};
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::{response::Response, routing::get, Router};
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
};
use std::sync::{Mutex, OnceLock};
use std::time::Instant;
use tracing::{debug, info};

static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
static HTTP_REQUEST_DURATION: OnceLock<HistogramVec> = OnceLock::new();

// Serializes registration so concurrent callers never double-register
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Register the HTTP metrics with the default Prometheus registry.
/// Safe to call more than once.
pub fn init_monitoring() -> Result<()> {
    let _lock = INIT_LOCK
        .lock()
        .map_err(|_| anyhow::anyhow!("Metrics initialization lock poisoned"))?;

    if HTTP_REQUESTS_TOTAL.get().is_some() {
        return Ok(());
    }

    let requests = register_int_counter_vec!(
        "digiworld_http_requests_total",
        "Total number of HTTP requests",
        &["method", "route", "status"]
    )?;
    let duration = register_histogram_vec!(
        "digiworld_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "route"]
    )?;

    HTTP_REQUESTS_TOTAL
        .set(requests)
        .map_err(|_| anyhow::anyhow!("Failed to register HTTP_REQUESTS_TOTAL"))?;
    HTTP_REQUEST_DURATION
        .set(duration)
        .map_err(|_| anyhow::anyhow!("Failed to register HTTP_REQUEST_DURATION"))?;

    info!("Monitoring system initialized");
    Ok(())
}

/// Record one finished request. A no-op until [`init_monitoring`] ran.
pub fn record_http_request(method: &str, route: &str, status: u16, duration_seconds: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        let status = status.to_string();
        counter
            .with_label_values(&[method, route, status.as_str()])
            .inc();
    }

    if let Some(histogram) = HTTP_REQUEST_DURATION.get() {
        histogram
            .with_label_values(&[method, route])
            .observe(duration_seconds);
    }
}

/// Axum middleware recording every request under its route template
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let elapsed = start.elapsed().as_secs_f64();
    debug!(
        "{} {} -> {} ({:.3}ms)",
        method,
        route,
        response.status(),
        elapsed * 1000.0
    );
    record_http_request(&method, &route, response.status().as_u16(), elapsed);

    response
}

/// Router exposing `/metrics`
pub fn create_metrics_router() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

/// Metrics endpoint handler
async fn metrics_handler() -> Result<Response<String>, StatusCode> {
    let encoder = prometheus::TextEncoder::new();
    let metric_families = prometheus::gather();

    let metrics = encoder
        .encode_to_string(&metric_families)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, encoder.format_type())
        .body(metrics)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use tower::ServiceExt;

    #[test]
    fn test_init_is_idempotent() {
        init_monitoring().unwrap();
        init_monitoring().unwrap();
        assert!(HTTP_REQUESTS_TOTAL.get().is_some());
    }

    #[test]
    fn test_record_http_request_increments_counter() {
        init_monitoring().unwrap();

        let counter = HTTP_REQUESTS_TOTAL.get().unwrap();
        let before = counter
            .with_label_values(&["GET", "/test-route", "200"])
            .get();
        record_http_request("GET", "/test-route", 200, 0.01);
        let after = counter
            .with_label_values(&["GET", "/test-route", "200"])
            .get();
        assert_eq!(after, before + 1);
    }

    #[tokio::test]
    async fn test_metrics_endpoint_serves_text_format() {
        init_monitoring().unwrap();
        record_http_request("GET", "/digimons", 200, 0.002);

        let response = create_metrics_router()
            .oneshot(
                axum::http::Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("digiworld_http_requests_total"));
    }
}
