//! Authentication middleware that checks every request against the credential gate.

use std::sync::Arc;

use axum::{
    Json,
    extract::{FromRef, Request, State},
    http::{
        HeaderValue, StatusCode,
        header::{AUTHORIZATION, WWW_AUTHENTICATE},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{AppState, auth::CredentialGate};

/// The realm sent with the `WWW-Authenticate` challenge.
pub const AUTH_REALM: &str = "transactions";

/// The state needed for the auth middleware
#[derive(Clone)]
pub struct AuthState {
    /// Decides whether a request's credentials are accepted.
    pub credential_gate: Arc<dyn CredentialGate>,
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            credential_gate: state.credential_gate.clone(),
        }
    }
}

/// Middleware function that passes the request on if the credential gate
/// accepts its `Authorization` header, otherwise responds with 401.
///
/// Checking a password hash is slow by design of the hashing function, so the
/// check runs on the blocking thread pool.
pub async fn auth_guard(State(state): State<AuthState>, request: Request, next: Next) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    let accepted = match token {
        Some(token) => {
            let gate = state.credential_gate.clone();
            tokio::task::spawn_blocking(move || gate.accept(&token))
                .await
                .unwrap_or_else(|error| {
                    tracing::error!("Credential check did not complete: {error}");
                    false
                })
        }
        None => false,
    };

    if !accepted {
        tracing::warn!(
            "Rejected {} {} with missing or invalid credentials.",
            request.method(),
            request.uri().path()
        );
        return get_unauthorized_response();
    }

    next.run(request).await
}

/// The response for requests without acceptable credentials.
pub fn get_unauthorized_response() -> Response {
    let challenge = HeaderValue::from_str(&format!("Basic realm=\"{AUTH_REALM}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("Basic"));

    (
        StatusCode::UNAUTHORIZED,
        [(WWW_AUTHENTICATE, challenge)],
        Json(json!({
            "error": "Unauthorized",
            "message": "Invalid or missing authentication credentials",
            "status": 401,
        })),
    )
        .into_response()
}
