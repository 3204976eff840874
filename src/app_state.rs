//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use crate::{auth::CredentialGate, transaction::TransactionRegistry};

/// The state of the REST server.
///
/// Cloning the state is cheap, all clones share the same registry.
#[derive(Clone)]
pub struct AppState {
    /// The transactions, behind a single lock that every operation takes.
    pub registry: Arc<Mutex<TransactionRegistry>>,

    /// Decides which requests may access the registry.
    pub credential_gate: Arc<dyn CredentialGate>,
}

impl AppState {
    /// Create a new [AppState] that owns `registry`.
    pub fn new(registry: TransactionRegistry, credential_gate: impl CredentialGate + 'static) -> Self {
        Self {
            registry: Arc::new(Mutex::new(registry)),
            credential_gate: Arc::new(credential_gate),
        }
    }
}
