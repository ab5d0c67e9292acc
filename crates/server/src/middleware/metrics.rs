//! Prometheus metrics collection middleware
//!
//! Records `http_requests_total` (counter) and `http_request_duration_seconds`
//! (histogram) for every request, with method/path/status labels.

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Routes whose trailing segment is caller-supplied text
const PARAMETERIZED_PREFIXES: [(&str, &str); 1] = [("/getdiags/", "/getdiags/:term")];

/// Collapse free-text path parameters so search terms don't become labels
fn normalize_path(path: &str) -> String {
    PARAMETERIZED_PREFIXES
        .iter()
        .find(|(prefix, _)| path.starts_with(*prefix))
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Middleware that records request count and duration metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());

    let start = Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed().as_secs_f64();

    let status = response.status().as_u16().to_string();

    metrics::counter!(
        "http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method,
        "path" => path
    )
    .record(duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("/getdiags/chest%20pain"), "/getdiags/:term");
        assert_eq!(normalize_path("/ddx"), "/ddx");
        assert_eq!(normalize_path("/health"), "/health");
    }
}
