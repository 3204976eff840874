//! Decides whether a request's credentials let it through to the registry.

use std::{collections::HashMap, fmt::Display, fs, path::Path};

use axum::http::HeaderValue;
use axum_extra::headers::{Authorization, Header, authorization::Basic};
use serde::{Deserialize, Serialize};

use crate::Error;

/// A bcrypt hash as it appears in the credentials file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used when none is given.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `raw_password` with the given bcrypt `cost`.
    ///
    /// # Errors
    /// Returns [Error::HashingError] if `cost` is out of range.
    pub fn hash(raw_password: &str, cost: u32) -> Result<Self, Error> {
        bcrypt::hash(raw_password, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Whether `raw_password` hashes to this value. A hash that bcrypt cannot
    /// read matches nothing.
    fn matches(&self, raw_password: &str) -> bool {
        bcrypt::verify(raw_password, &self.0).unwrap_or_else(|error| {
            tracing::error!("Error verifying password: {error}");
            false
        })
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts or rejects the credential token presented with a request.
///
/// `token` is the raw value of the request's `Authorization` header.
pub trait CredentialGate: Send + Sync {
    /// Whether `token` grants access.
    fn accept(&self, token: &str) -> bool;
}

/// A [CredentialGate] for HTTP Basic authentication against a fixed set of
/// users.
#[derive(Debug, Clone, Default)]
pub struct BasicAuthGate {
    users: HashMap<String, PasswordHash>,
}

impl BasicAuthGate {
    /// Create a gate that accepts the given users, keyed by user name.
    pub fn new(users: HashMap<String, PasswordHash>) -> Self {
        Self { users }
    }

    /// Load users from a JSON file mapping user names to bcrypt hashes, e.g.
    /// `{"admin": "$2b$12$..."}`.
    ///
    /// # Errors
    /// Returns [Error::InvalidCredentialsFile] if the file cannot be read or
    /// does not have the expected shape.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path).map_err(|error| {
            Error::InvalidCredentialsFile(format!("{}: {error}", path.display()))
        })?;
        let users: HashMap<String, PasswordHash> = serde_json::from_str(&text).map_err(|error| {
            Error::InvalidCredentialsFile(format!("{}: {error}", path.display()))
        })?;

        if users.is_empty() {
            tracing::warn!(
                "No users found in {}, every request will be rejected.",
                path.display()
            );
        }

        Ok(Self::new(users))
    }
}

impl CredentialGate for BasicAuthGate {
    fn accept(&self, token: &str) -> bool {
        let Ok(header_value) = HeaderValue::from_str(token) else {
            return false;
        };
        let Ok(Authorization(credentials)) =
            Authorization::<Basic>::decode(&mut std::iter::once(&header_value))
        else {
            return false;
        };

        let Some(password_hash) = self.users.get(credentials.username()) else {
            tracing::debug!("Unknown user \"{}\"", credentials.username());
            return false;
        };

        password_hash.matches(credentials.password())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::{BTreeMap, HashMap},
        io::Write,
    };

    use tempfile::NamedTempFile;

    use crate::{
        Error,
        auth::{BasicAuthGate, CredentialGate, PasswordHash},
        test_utils::basic_token,
    };

    fn get_gate() -> BasicAuthGate {
        let hash = PasswordHash::hash("password", 4).unwrap();

        BasicAuthGate::new(HashMap::from([("admin".to_owned(), hash)]))
    }

    fn write_credentials(text: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{text}").unwrap();
        file
    }

    #[test]
    fn accepts_valid_credentials() {
        assert!(get_gate().accept(&basic_token("admin", "password")));
    }

    #[test]
    fn rejects_wrong_password() {
        assert!(!get_gate().accept(&basic_token("admin", "wrongpass")));
    }

    #[test]
    fn rejects_unknown_user() {
        assert!(!get_gate().accept(&basic_token("mallory", "password")));
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        let gate = get_gate();

        assert!(!gate.accept("Bearer token123"));
        assert!(!gate.accept("Basic not-base64!"));
        assert!(!gate.accept(""));
    }

    #[test]
    fn credentials_written_by_hash_tool_can_be_loaded() {
        let entries = BTreeMap::from([
            ("alice".to_owned(), PasswordHash::hash("alicepass", 4).unwrap()),
            ("bob".to_owned(), PasswordHash::hash("bobpass", 4).unwrap()),
        ]);
        let file = write_credentials(&serde_json::to_string_pretty(&entries).unwrap());

        let gate = BasicAuthGate::from_file(file.path()).unwrap();

        assert!(gate.accept(&basic_token("alice", "alicepass")));
        assert!(gate.accept(&basic_token("bob", "bobpass")));
        assert!(!gate.accept(&basic_token("alice", "bobpass")));
    }

    #[test]
    fn hash_is_stored_as_plain_string() {
        let hash = PasswordHash::hash("devpass", 4).unwrap();

        let json = serde_json::to_value(BTreeMap::from([("dev", &hash)])).unwrap();

        assert_eq!(json["dev"].as_str(), Some(hash.to_string().as_str()));
        assert!(hash.to_string().starts_with("$2"));
    }

    #[test]
    fn unreadable_hash_in_file_rejects_user() {
        let file = write_credentials(r#"{"admin": "not a bcrypt hash"}"#);

        let gate = BasicAuthGate::from_file(file.path()).unwrap();

        assert!(!gate.accept(&basic_token("admin", "not a bcrypt hash")));
    }

    #[test]
    fn rejects_malformed_credentials_file() {
        let file = write_credentials("[\"admin\", \"password\"]");

        let result = BasicAuthGate::from_file(file.path());

        assert!(matches!(result, Err(Error::InvalidCredentialsFile(_))));
    }

    #[test]
    fn missing_credentials_file_is_an_error() {
        let file = write_credentials("{}");
        let path = file.path().to_owned();
        drop(file);

        let result = BasicAuthGate::from_file(&path);

        assert!(matches!(result, Err(Error::InvalidCredentialsFile(_))));
    }

    #[test]
    fn hashing_with_invalid_cost_fails() {
        assert!(matches!(
            PasswordHash::hash("password", 99),
            Err(Error::HashingError(_))
        ));
    }
}
