use std::sync::{Arc, Mutex, MutexGuard};

use axum::extract::FromRef;

use crate::{
    AppState, Error,
    transaction::{TransactionId, TransactionRegistry},
};

/// The state needed by the transaction endpoints.
#[derive(Debug, Clone)]
pub struct TransactionState {
    /// The registry holding every transaction.
    pub registry: Arc<Mutex<TransactionRegistry>>,
}

impl FromRef<AppState> for TransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            registry: state.registry.clone(),
        }
    }
}

impl TransactionState {
    /// Lock the registry for the duration of one operation.
    ///
    /// # Errors
    /// Returns [Error::RegistryLockError] if the lock is poisoned.
    pub fn lock(&self) -> Result<MutexGuard<'_, TransactionRegistry>, Error> {
        self.registry.lock().map_err(|error| {
            tracing::error!("Could not acquire registry lock: {error}");
            Error::RegistryLockError
        })
    }
}

/// Parse the transaction ID taken from a request path.
///
/// # Errors
/// Returns [Error::InvalidTransactionId] if `raw_id` is not an integer.
pub(crate) fn parse_transaction_id(raw_id: &str) -> Result<TransactionId, Error> {
    raw_id
        .parse()
        .map_err(|_| Error::InvalidTransactionId(raw_id.to_owned()))
}
