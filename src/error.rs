//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::transaction::TransactionId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The requested transaction is not in the registry.
    ///
    /// For HTTP request handlers, the client should check that the ID is
    /// correct and that the transaction has not already been deleted.
    #[error("Transaction with ID {0} not found")]
    NotFound(TransactionId),

    /// One or more of the fields needed to create a transaction were not
    /// supplied. Holds the name of every missing field.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    /// An amount was supplied that could not be read as a finite number.
    #[error("Invalid amount \"{0}\": expected a number")]
    InvalidAmount(String),

    /// The record file could not be read, e.g. it does not exist.
    #[error("could not read the record file: {0}")]
    SourceUnreadable(String),

    /// The record file is not well-formed XML.
    #[error("could not parse the record file: {0}")]
    MalformedSource(String),

    /// The request body could not be parsed as the expected JSON.
    #[error("Invalid JSON in request body")]
    InvalidRequestBody(String),

    /// The transaction ID in the request path is not an integer.
    #[error("Invalid transaction ID \"{0}\"")]
    InvalidTransactionId(String),

    /// A request that changes a single transaction did not name one.
    ///
    /// Holds the HTTP method of the request, e.g. "PUT".
    #[error("Transaction ID is required for {0} request")]
    MissingTransactionId(&'static str),

    /// The file listing the users allowed to access the API could not be
    /// loaded.
    #[error("could not load the credentials file: {0}")]
    InvalidCredentialsFile(String),

    /// Could not acquire the registry lock
    #[error("could not acquire the registry lock")]
    RegistryLockError,

    /// Every transaction ID has been handed out, so no more transactions can
    /// be created.
    #[error("no transaction IDs are left to assign")]
    IdSpaceExhausted,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server.
    #[error("hashing failed: {0}")]
    HashingError(String),
}

impl Error {
    /// The HTTP status code that best describes the error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::MissingFields(_)
            | Error::InvalidAmount(_)
            | Error::InvalidRequestBody(_)
            | Error::InvalidTransactionId(_)
            | Error::MissingTransactionId(_) => StatusCode::BAD_REQUEST,
            Error::SourceUnreadable(_)
            | Error::MalformedSource(_)
            | Error::InvalidCredentialsFile(_)
            | Error::RegistryLockError
            | Error::HashingError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::IdSpaceExhausted => StatusCode::INSUFFICIENT_STORAGE,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            Error::InvalidRequestBody(reason) => {
                tracing::debug!("Rejected request body: {reason}");
            }
            Error::IdSpaceExhausted => tracing::error!("Could not create transaction: {self}"),
            _ if status == StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!("An unexpected error occurred: {self}");
                // Internal details are not intended to be shown to the client.
                return render_error(status, "Internal server error");
            }
            _ => {}
        }

        render_error(status, &self.to_string())
    }
}

/// Build a JSON error response with the shape
/// `{"error": true, "message": ..., "status": ...}`.
pub fn render_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": true,
            "message": message,
            "status": status.as_u16(),
        })),
    )
        .into_response()
}
