//! Application router configuration. Every route is protected by the
//! credential gate except CORS preflight requests, and accepted requests are
//! logged.

use axum::{
    Router,
    http::{
        Method,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    middleware,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    auth::auth_guard,
    endpoints,
    logging::logging_middleware,
    not_found::get_404_not_found,
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, delete_without_id_endpoint,
        edit_transaction_endpoint, edit_without_id_endpoint, get_transaction_endpoint,
        get_transactions_endpoint,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            endpoints::TRANSACTIONS,
            get(get_transactions_endpoint)
                .post(create_transaction_endpoint)
                .put(edit_without_id_endpoint)
                .delete(delete_without_id_endpoint),
        )
        .route(
            endpoints::TRANSACTION,
            get(get_transaction_endpoint)
                .put(edit_transaction_endpoint)
                .delete(delete_transaction_endpoint),
        )
        .fallback(get_404_not_found)
        // Inside the auth guard so that bodies are only buffered for accepted requests.
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard))
        // Added last so that preflight requests are answered before the auth guard runs.
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}

#[cfg(test)]
mod routing_tests {
    use axum::http::{
        HeaderName, HeaderValue, Method, StatusCode,
        header::{ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, ORIGIN},
    };
    use serde_json::{Value, json};

    use crate::{
        MAX_BODY_SIZE,
        test_utils::{auth_header, get_test_server, sample_registry},
    };

    #[tokio::test]
    async fn unknown_path_is_404() {
        let server = get_test_server(sample_registry());
        let (name, value) = auth_header();

        let response = server.get("/accounts").add_header(name, value).await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({"error": true, "message": "Invalid endpoint", "status": 404})
        );
    }

    #[tokio::test]
    async fn preflight_does_not_need_credentials() {
        let server = get_test_server(sample_registry());

        let response = server
            .method(Method::OPTIONS, "/transactions")
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5500"))
            .add_header(
                ACCESS_CONTROL_REQUEST_METHOD,
                HeaderValue::from_static("DELETE"),
            )
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }

    #[tokio::test]
    async fn responses_allow_any_origin() {
        let server = get_test_server(sample_registry());
        let (name, value): (HeaderName, HeaderValue) = auth_header();

        let response = server
            .get("/transactions")
            .add_header(name, value)
            .add_header(ORIGIN, HeaderValue::from_static("http://localhost:5500"))
            .await;

        response.assert_status_ok();
        assert_eq!(response.header(ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }

    #[tokio::test]
    async fn oversized_body_without_credentials_is_rejected_by_auth() {
        let server = get_test_server(sample_registry());

        let response = server
            .post("/transactions")
            .text("x".repeat(MAX_BODY_SIZE * 2))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn oversized_body_with_credentials_is_413() {
        let server = get_test_server(sample_registry());
        let (name, value) = auth_header();

        let response = server
            .post("/transactions")
            .add_header(name.clone(), value.clone())
            .text("x".repeat(MAX_BODY_SIZE + 1))
            .await;

        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        let listed = server
            .get("/transactions")
            .add_header(name, value)
            .await
            .json::<Value>();
        assert_eq!(listed["count"], 3);
    }
}
