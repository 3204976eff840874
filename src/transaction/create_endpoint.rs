//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::{NewTransaction, state::TransactionState},
};

/// A route handler for creating a new transaction, responds with 201 and the
/// created transaction on success.
///
/// Responds with 400 if the body is not valid JSON, if required fields are
/// missing, or if the amount is not a number.
pub async fn create_transaction_endpoint(
    State(state): State<TransactionState>,
    body: Result<Json<NewTransaction>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), Error> {
    let Json(request) = body.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let transaction = state.lock()?.create(request).inspect_err(|error| {
        tracing::debug!("Rejected new transaction: {error}");
    })?;

    tracing::info!("Created transaction {}", transaction.id);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Transaction created successfully",
            "data": transaction,
        })),
    ))
}
