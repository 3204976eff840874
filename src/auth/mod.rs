//! Access control for the API.
//!
//! Every request must present credentials accepted by a [CredentialGate]
//! before it reaches the transaction registry.

mod gate;
mod middleware;

pub use gate::{BasicAuthGate, CredentialGate, PasswordHash};
pub use middleware::auth_guard;
