use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info_span, Instrument};
use uuid::Uuid;

/// HTTP header name for trace ID
pub const TRACE_ID_HEADER: &str = "X-Trace-Id";

/// Middleware that tags each request with a trace ID
///
/// A well-formed UUID sent by the caller in `X-Trace-Id` is reused, otherwise a
/// fresh v4 UUID is generated. The ID is stored in the request extensions,
/// recorded on the request span and echoed in the response headers.
pub async fn trace_id_middleware(mut request: Request, next: Next) -> Response {
    let trace_id = request
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| Uuid::parse_str(value).ok())
        .unwrap_or_else(Uuid::new_v4)
        .to_string();

    let span = info_span!(
        "http_request",
        trace_id = %trace_id,
        method = %request.method(),
        uri = %request.uri(),
    );

    request.extensions_mut().insert(TraceId(trace_id.clone()));

    let started = Instant::now();
    let mut response = async move {
        tracing::debug!("Request started");
        let response = next.run(request).await;

        tracing::info!(
            status = %response.status(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Request completed"
        );

        response
    }
    .instrument(span)
    .await;

    if let Ok(value) = HeaderValue::from_str(&trace_id) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }

    response
}

/// Extension type for storing trace ID in request extensions
#[derive(Clone, Debug)]
pub struct TraceId(pub String);

impl TraceId {
    /// Get the trace ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        extract::Extension,
        http::{Request, StatusCode},
        middleware,
        routing::get,
        Router,
    };
    use tower::util::ServiceExt;

    async fn echo_trace_id(Extension(trace_id): Extension<TraceId>) -> (StatusCode, String) {
        (StatusCode::OK, trace_id.as_str().to_string())
    }

    fn app() -> Router {
        Router::new()
            .route("/test", get(echo_trace_id))
            .layer(middleware::from_fn(trace_id_middleware))
    }

    fn header(response: &Response) -> String {
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn test_generated_id_matches_handler_extension() {
        let response = app()
            .oneshot(Request::builder().uri("/test").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let header_id = header(&response);
        assert!(Uuid::parse_str(&header_id).is_ok());

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header_id);
    }

    #[tokio::test]
    async fn test_caller_id_is_reused() {
        let incoming = Uuid::new_v4().to_string();
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(TRACE_ID_HEADER, &incoming)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(header(&response), incoming);
    }

    #[tokio::test]
    async fn test_malformed_caller_id_is_replaced() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/test")
                    .header(TRACE_ID_HEADER, "not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let id = header(&response);
        assert_ne!(id, "not-a-uuid");
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
