use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    Error,
    transaction::state::{TransactionState, parse_transaction_id},
};

/// A route handler for deleting a transaction, responds with the deleted
/// transaction.
///
/// Responds with 404 if the transaction does not exist.
pub async fn delete_transaction_endpoint(
    State(state): State<TransactionState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Value>, Error> {
    let transaction_id = parse_transaction_id(&raw_id)?;
    let transaction = state.lock()?.delete(transaction_id)?;

    tracing::info!("Deleted transaction {transaction_id}");

    Ok(Json(json!({
        "success": true,
        "message": format!("Transaction {transaction_id} deleted successfully"),
        "data": transaction,
    })))
}

/// A route handler for delete requests that do not name a transaction.
pub async fn delete_without_id_endpoint() -> Error {
    Error::MissingTransactionId("DELETE")
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::{
        endpoints::{self, format_endpoint},
        test_utils::{auth_header, get_test_server, sample_registry},
    };

    #[tokio::test]
    async fn deletes_transaction() {
        let server = get_test_server(sample_registry());
        let (name, value) = auth_header();
        let path = format_endpoint(endpoints::TRANSACTION, 2);

        let response = server
            .delete(&path)
            .add_header(name.clone(), value.clone())
            .await;

        response.assert_status_ok();
        let body = response.json::<Value>();
        assert_eq!(body["message"], "Transaction 2 deleted successfully");
        assert_eq!(body["data"]["id"], 2);

        server
            .get(&path)
            .add_header(name.clone(), value.clone())
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let listed = server
            .get(endpoints::TRANSACTIONS)
            .add_header(name, value)
            .await
            .json::<Value>();
        assert_eq!(listed["count"], 2);
        assert_eq!(listed["data"][0]["id"], 1);
        assert_eq!(listed["data"][1]["id"], 3);
    }

    #[tokio::test]
    async fn deleting_twice_is_404() {
        let server = get_test_server(sample_registry());
        let (name, value) = auth_header();
        let path = format_endpoint(endpoints::TRANSACTION, 1);

        server
            .delete(&path)
            .add_header(name.clone(), value.clone())
            .await
            .assert_status_ok();
        let response = server.delete(&path).add_header(name, value).await;

        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_without_id_is_400() {
        let server = get_test_server(sample_registry());
        let (name, value) = auth_header();

        let response = server
            .delete(endpoints::TRANSACTIONS)
            .add_header(name, value)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>()["message"],
            "Transaction ID is required for DELETE request"
        );
    }
}
