//! Defines the endpoints for reading transactions.

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::state::{TransactionState, parse_transaction_id},
};

/// A route handler that responds with every transaction in insertion order.
pub async fn get_transactions_endpoint(
    State(state): State<TransactionState>,
) -> Result<Json<Value>, Error> {
    let registry = state.lock()?;
    let transactions = registry.list();

    Ok(Json(json!({
        "success": true,
        "count": transactions.len(),
        "data": transactions,
    })))
}

/// A route handler that responds with a single transaction.
///
/// Responds with 404 if the transaction does not exist.
pub async fn get_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_transaction_id(&raw_id)?;
    let registry = state.lock()?;
    let transaction = registry.get(transaction_id)?;

    Ok(Json(json!({
        "success": true,
        "data": transaction,
    })))
}
