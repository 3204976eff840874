//! Middleware for logging requests and responses.

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::render_error;

/// Log the request and response for each request.
///
/// Both the request and response are logged at the `info` level.
/// If a body is longer than [LOG_BODY_LENGTH_LIMIT] bytes, it is
/// truncated and the full body is logged at the `debug` level.
/// The `Authorization` header is never logged in the clear.
///
/// Request bodies larger than [MAX_BODY_SIZE] bytes are rejected with 413.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    // Fails when the body is over the limit or the client hung up, and only
    // the first can still be answered.
    let body_bytes = match axum::body::to_bytes(body, MAX_BODY_SIZE).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::warn!("Could not read request body: {error}");
            return render_error(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Request body is too large",
            );
        }
    };
    log_request(&parts, &String::from_utf8_lossy(&body_bytes));

    let request = Request::from_parts(parts, Body::from(body_bytes));
    let response = next.run(request).await;

    let (parts, body) = response.into_parts();
    let body_bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!("Could not read response body: {error}");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    log_response(&parts, &String::from_utf8_lossy(&body_bytes));

    Response::from_parts(parts, Body::from(body_bytes))
}

/// Copy `headers` with credentials replaced by a placeholder.
fn redact_credentials(headers: &HeaderMap) -> HeaderMap {
    let mut redacted = headers.clone();

    if redacted.contains_key(AUTHORIZATION) {
        redacted.insert(AUTHORIZATION, HeaderValue::from_static("********"));
    }

    redacted
}

/// Cut `body` to at most [LOG_BODY_LENGTH_LIMIT] bytes without splitting a character.
fn truncate_body(body: &str) -> &str {
    let mut end = LOG_BODY_LENGTH_LIMIT.min(body.len());

    while !body.is_char_boundary(end) {
        end -= 1;
    }

    &body[..end]
}

/// The number of bytes of a body that are logged at the `info` level.
pub const LOG_BODY_LENGTH_LIMIT: usize = 64;

/// The largest request body, in bytes, that is read into memory. Matches the
/// default limit of axum's body extractors.
pub const MAX_BODY_SIZE: usize = 2 * 1024 * 1024;

fn log_request(parts: &axum::http::request::Parts, body: &str) {
    let method = &parts.method;
    let uri = &parts.uri;
    let headers = redact_credentials(&parts.headers);

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Received request: {method} {uri} {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full request body: {body:?}");
    } else {
        tracing::info!("Received request: {method} {uri} {headers:#?}\nbody: {body:?}");
    }
}

fn log_response(parts: &axum::http::response::Parts, body: &str) {
    let status = parts.status;
    let headers = &parts.headers;

    if body.len() > LOG_BODY_LENGTH_LIMIT {
        tracing::info!(
            "Sending response: {status} {headers:#?}\nbody: {:}...",
            truncate_body(body)
        );
        tracing::debug!("Full response body: {body:?}");
    } else {
        tracing::info!("Sending response: {status} {headers:#?}\nbody: {body:?}");
    }
}

#[cfg(test)]
mod logging_tests {
    use axum::{
        Router, middleware,
        http::{HeaderMap, HeaderValue, StatusCode, header::AUTHORIZATION, header::CONTENT_TYPE},
        routing::post,
    };
    use axum_test::TestServer;

    use super::{
        LOG_BODY_LENGTH_LIMIT, MAX_BODY_SIZE, logging_middleware, redact_credentials,
        truncate_body,
    };

    #[test]
    fn redacts_authorization_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46cGFzcw=="));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let redacted = redact_credentials(&headers);

        assert_eq!(redacted.get(AUTHORIZATION).unwrap(), "********");
        assert_eq!(redacted.get(CONTENT_TYPE).unwrap(), "application/json");
    }

    #[test]
    fn leaves_headers_without_credentials_alone() {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        assert_eq!(redact_credentials(&headers), headers);
    }

    #[test]
    fn truncates_on_char_boundary() {
        let body = "é".repeat(LOG_BODY_LENGTH_LIMIT);

        let truncated = truncate_body(&body);

        assert!(truncated.len() <= LOG_BODY_LENGTH_LIMIT);
        assert!(truncated.chars().all(|c| c == 'é'));
    }

    #[test]
    fn short_bodies_are_not_truncated() {
        assert_eq!(truncate_body("{}"), "{}");
    }

    #[tokio::test]
    async fn passes_bodies_through_unchanged() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);
        let body = "x".repeat(LOG_BODY_LENGTH_LIMIT * 2);

        let response = server.post("/echo").text(body.clone()).await;

        response.assert_status_ok();
        assert_eq!(response.text(), body);
    }

    #[tokio::test]
    async fn rejects_body_over_limit() {
        let app = Router::new()
            .route("/echo", post(|body: String| async move { body }))
            .layer(middleware::from_fn(logging_middleware));
        let server = TestServer::new(app);

        let response = server
            .post("/echo")
            .text("x".repeat(MAX_BODY_SIZE + 1))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    }
}
