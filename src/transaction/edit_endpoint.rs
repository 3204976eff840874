//! Defines the endpoint for updating part of a transaction.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::{
        TransactionPatch,
        state::{TransactionState, parse_transaction_id},
    },
};

/// A route handler for updating a transaction with the fields in the request
/// body. Fields that are not in the body keep their current values.
///
/// Responds with 404 if the transaction does not exist, which is checked
/// before the body is parsed.
pub async fn edit_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(raw_id): Path<String>,
    body: Result<Json<TransactionPatch>, JsonRejection>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_transaction_id(&raw_id)?;
    let mut registry = state.lock()?;
    registry.get(transaction_id)?;

    let Json(patch) = body.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let transaction = registry.update(transaction_id, patch)?;

    tracing::info!("Updated transaction {transaction_id}");

    Ok(Json(json!({
        "success": true,
        "message": format!("Transaction {transaction_id} updated successfully"),
        "data": transaction,
    })))
}

/// A route handler for update requests that do not name a transaction.
pub async fn edit_without_id_endpoint() -> Error {
    Error::MissingTransactionId("PUT")
}
