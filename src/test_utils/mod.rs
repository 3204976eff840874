#![allow(missing_docs)]

use std::collections::HashMap;

use axum::http::{HeaderName, HeaderValue, header::AUTHORIZATION};
use axum_extra::headers::{Authorization, Header};
use axum_test::TestServer;

use crate::{
    AppState,
    auth::{BasicAuthGate, PasswordHash},
    build_router,
    transaction::{ImportedTransaction, TransactionRegistry},
};

pub(crate) const TEST_USER: &str = "admin";
pub(crate) const TEST_PASSWORD: &str = "password";

/// A server for `registry` that accepts [TEST_USER] with [TEST_PASSWORD].
#[track_caller]
pub(crate) fn get_test_server(registry: TransactionRegistry) -> TestServer {
    // The minimum bcrypt cost keeps the tests fast.
    let hash = PasswordHash::hash(TEST_PASSWORD, 4)
        .expect("Could not hash test password");
    let gate = BasicAuthGate::new(HashMap::from([(TEST_USER.to_owned(), hash)]));
    let app = build_router(AppState::new(registry, gate));

    TestServer::new(app)
}

/// The `Authorization` header for the test user.
pub(crate) fn auth_header() -> (HeaderName, HeaderValue) {
    let token = basic_token(TEST_USER, TEST_PASSWORD);

    (
        AUTHORIZATION,
        HeaderValue::from_str(&token).expect("Could not create header value"),
    )
}

/// Encode `user` and `password` as a Basic `Authorization` header value.
pub(crate) fn basic_token(user: &str, password: &str) -> String {
    let mut values: Vec<HeaderValue> = Vec::new();
    Authorization::basic(user, password).encode(&mut values);

    values
        .first()
        .expect("Authorization header was not encoded")
        .to_str()
        .expect("Could not convert to str")
        .to_owned()
}

/// A registry with the transactions 1, 2 and 3.
pub(crate) fn sample_registry() -> TransactionRegistry {
    TransactionRegistry::from_imported(vec![
        imported(1, "deposit", 1000.0, "Bank", "Alice", "completed"),
        imported(2, "payment", 49.99, "Alice", "Grocer", "pending"),
        imported(3, "transfer", 250.0, "Alice", "Bob", "failed"),
    ])
}

fn imported(
    id: i64,
    kind: &str,
    amount: f64,
    sender: &str,
    receiver: &str,
    status: &str,
) -> ImportedTransaction {
    ImportedTransaction {
        id: Some(id),
        kind: kind.to_owned(),
        amount,
        sender: sender.to_owned(),
        receiver: receiver.to_owned(),
        timestamp: format!("2024-01-0{id}T10:00:00Z"),
        status: status.to_owned(),
    }
}
