//! Transaction management.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and the typed requests for creating and patching transactions
//! - The `TransactionRegistry` that stores transactions in memory
//! - Route handlers for the transaction endpoints

mod core;
mod create_endpoint;
mod delete_endpoint;
mod edit_endpoint;
mod list_endpoint;
mod registry;
mod state;

pub use core::{
    AmountInput, DEFAULT_STATUS, ImportedTransaction, NewTransaction, Transaction, TransactionId,
    TransactionPatch,
};
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::{delete_transaction_endpoint, delete_without_id_endpoint};
pub use edit_endpoint::{edit_transaction_endpoint, edit_without_id_endpoint};
pub use list_endpoint::{get_transaction_endpoint, get_transactions_endpoint};
pub use registry::{TransactionRegistry, build_index};
