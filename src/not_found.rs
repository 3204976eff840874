use axum::{http::StatusCode, response::Response};

use crate::error::render_error;

/// The fallback handler for paths that do not match an endpoint.
pub async fn get_404_not_found() -> Response {
    get_404_not_found_response()
}

pub fn get_404_not_found_response() -> Response {
    render_error(StatusCode::NOT_FOUND, "Invalid endpoint")
}
