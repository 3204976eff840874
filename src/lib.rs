//! An in-memory registry of financial transactions served over a JSON REST API.
//!
//! Transactions are loaded once from an XML record file at start-up and then
//! listed, created, updated and deleted through the `/transactions` endpoints.
//! Every request must carry credentials accepted by a [CredentialGate].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod auth;
mod endpoints;
mod error;
mod ingest;
mod logging;
mod not_found;
mod routing;
mod transaction;

#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use auth::{BasicAuthGate, CredentialGate, PasswordHash};
pub use error::Error;
pub use ingest::{ingest, parse_records, read_records};
pub use logging::{LOG_BODY_LENGTH_LIMIT, MAX_BODY_SIZE, logging_middleware};
pub use routing::build_router;
pub use transaction::{
    AmountInput, DEFAULT_STATUS, ImportedTransaction, NewTransaction, Transaction, TransactionId,
    TransactionPatch, TransactionRegistry, build_index,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("Failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
