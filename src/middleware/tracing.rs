use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, info_span, Instrument};

/// Request-span middleware: every request runs inside an `http_request`
/// span and logs its route, status and latency on completion.
pub async fn observability_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str())
        .unwrap_or("unknown")
        .to_string();

    let span = info_span!(
        "http_request",
        method = %method,
        route = %route,
    );

    let start_time = Instant::now();
    let response = next.run(request).instrument(span).await;
    let latency_ms = start_time.elapsed().as_millis();
    let status = response.status().as_u16();

    if status >= 500 {
        error!(%method, route, status, latency_ms, "request failed");
    } else {
        info!(%method, route, status, latency_ms, "request completed");
    }

    response
}
