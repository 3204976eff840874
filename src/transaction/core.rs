//! Defines the core data models for transactions and the coercion rules
//! applied when a transaction enters the registry.

use serde::{Deserialize, Serialize};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// Alias for the integer type used for transaction IDs.
pub type TransactionId = i64;

/// The status given to transactions that do not specify one.
pub const DEFAULT_STATUS: &str = "pending";

/// A transfer of money between a sender and a receiver.
///
/// Values are stored already coerced, so `amount` is always a finite number
/// and the optional text fields have had their defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The ID of the transaction, unique within a registry.
    pub id: TransactionId,
    /// A short category label, e.g. "deposit" or "transfer".
    #[serde(rename = "type")]
    pub kind: String,
    /// The amount of money moved. No sign or currency rules are applied.
    pub amount: f64,
    /// Who sent the money.
    pub sender: String,
    /// Who received the money.
    pub receiver: String,
    /// When the transaction happened, as free-form text.
    pub timestamp: String,
    /// The processing status, e.g. "pending" or "completed".
    pub status: String,
}

/// A transaction read from a record file, before it has been given a place
/// in a registry.
///
/// Unlike [Transaction], the ID may be missing because the source record did
/// not provide a usable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportedTransaction {
    /// The ID given by the source record, if any.
    pub id: Option<TransactionId>,
    /// See [Transaction::kind].
    #[serde(rename = "type")]
    pub kind: String,
    /// See [Transaction::amount].
    pub amount: f64,
    /// See [Transaction::sender].
    pub sender: String,
    /// See [Transaction::receiver].
    pub receiver: String,
    /// See [Transaction::timestamp].
    pub timestamp: String,
    /// See [Transaction::status].
    pub status: String,
}

impl ImportedTransaction {
    /// Attach `id` to the imported fields to get a stored [Transaction].
    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            kind: self.kind,
            amount: self.amount,
            sender: self.sender,
            receiver: self.receiver,
            timestamp: self.timestamp,
            status: self.status,
        }
    }
}

/// An amount as supplied by a client, either a JSON number or a string
/// holding a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AmountInput {
    /// A JSON number.
    Number(f64),
    /// Text that should hold a number, e.g. `"12.50"`.
    Text(String),
}

impl AmountInput {
    /// Convert the amount to a finite floating point number.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the text is not a number, or the
    /// number is infinite or NaN.
    pub fn coerce(&self) -> Result<f64, Error> {
        let amount = match self {
            AmountInput::Number(amount) => *amount,
            AmountInput::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| Error::InvalidAmount(text.to_owned()))?,
        };

        if amount.is_finite() {
            Ok(amount)
        } else {
            Err(Error::InvalidAmount(amount.to_string()))
        }
    }
}

impl From<f64> for AmountInput {
    fn from(value: f64) -> Self {
        AmountInput::Number(value)
    }
}

impl From<&str> for AmountInput {
    fn from(value: &str) -> Self {
        AmountInput::Text(value.to_owned())
    }
}

/// The fields a client supplies to create a transaction.
///
/// Every field is optional at the type level so that all missing required
/// fields can be reported together. Any `id` in the request body is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    /// Required, sent as `type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// Required.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// Defaults to the empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// Defaults to [DEFAULT_STATUS].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl NewTransaction {
    /// Start a request with all four required fields set.
    pub fn build(
        kind: &str,
        amount: impl Into<AmountInput>,
        sender: &str,
        receiver: &str,
    ) -> Self {
        Self {
            kind: Some(kind.to_owned()),
            amount: Some(amount.into()),
            sender: Some(sender.to_owned()),
            receiver: Some(receiver.to_owned()),
            timestamp: None,
            status: None,
        }
    }

    /// Set the timestamp for the transaction.
    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = Some(timestamp.to_owned());
        self
    }

    /// Set the status for the transaction.
    pub fn status(mut self, status: &str) -> Self {
        self.status = Some(status.to_owned());
        self
    }

    /// The names of the required fields that were not supplied, in the order
    /// `type`, `amount`, `sender`, `receiver`.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("type", self.kind.is_none()),
            ("amount", self.amount.is_none()),
            ("sender", self.sender.is_none()),
            ("receiver", self.receiver.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, is_missing)| is_missing.then_some(name))
        .collect()
    }

    /// Check the request and turn it into a transaction with the ID `id`.
    ///
    /// # Errors
    /// Returns [Error::MissingFields] naming every missing required field, or
    /// [Error::InvalidAmount] if the amount is not a number.
    pub(crate) fn finalise(self, id: TransactionId) -> Result<Transaction, Error> {
        let missing_fields = self.missing_fields();

        match (self.kind, self.amount, self.sender, self.receiver) {
            (Some(kind), Some(amount), Some(sender), Some(receiver)) => Ok(Transaction {
                id,
                kind,
                amount: amount.coerce()?,
                sender,
                receiver,
                timestamp: self.timestamp.unwrap_or_default(),
                status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
            }),
            _ => Err(Error::MissingFields(missing_fields)),
        }
    }
}

/// A partial update to a transaction, only the supplied fields are changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionPatch {
    /// The new category label, sent as `type`.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// The new amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<AmountInput>,
    /// The new sender.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// The new receiver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver: Option<String>,
    /// The new timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    /// The new status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl TransactionPatch {
    /// Apply the patch to `transaction`.
    ///
    /// The amount is coerced before any field is written, so on error
    /// `transaction` is left exactly as it was.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not a number.
    pub(crate) fn apply(self, transaction: &mut Transaction) -> Result<(), Error> {
        let amount = self.amount.as_ref().map(AmountInput::coerce).transpose()?;

        if let Some(kind) = self.kind {
            transaction.kind = kind;
        }
        if let Some(amount) = amount {
            transaction.amount = amount;
        }
        if let Some(sender) = self.sender {
            transaction.sender = sender;
        }
        if let Some(receiver) = self.receiver {
            transaction.receiver = receiver;
        }
        if let Some(timestamp) = self.timestamp {
            transaction.timestamp = timestamp;
        }
        if let Some(status) = self.status {
            transaction.status = status;
        }

        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================


#[cfg(test)]
mod new_transaction_tests {
    use crate::{
        Error,
        transaction::{DEFAULT_STATUS, NewTransaction},
    };

    #[test]
    fn names_every_missing_field() {
        let request: NewTransaction =
            serde_json::from_str(r#"{"type": "transfer", "sender": "A"}"#).unwrap();

        assert_eq!(request.missing_fields(), vec!["amount", "receiver"]);
        assert_eq!(
            request.finalise(1),
            Err(Error::MissingFields(vec!["amount", "receiver"]))
        );
    }

    #[test]
    fn null_counts_as_missing() {
        let request: NewTransaction = serde_json::from_str(
            r#"{"type": null, "amount": 1, "sender": "A", "receiver": "B"}"#,
        )
        .unwrap();

        assert_eq!(request.missing_fields(), vec!["type"]);
    }

    #[test]
    fn applies_defaults() {
        let transaction = NewTransaction::build("deposit", 10.0, "Bank", "Jane")
            .finalise(7)
            .unwrap();

        assert_eq!(transaction.id, 7);
        assert_eq!(transaction.timestamp, "");
        assert_eq!(transaction.status, DEFAULT_STATUS);
    }

    #[test]
    fn ignores_id_in_request_body() {
        let request: NewTransaction = serde_json::from_str(
            r#"{"id": 99, "type": "t", "amount": "2", "sender": "A", "receiver": "B"}"#,
        )
        .unwrap();

        let transaction = request.finalise(3).unwrap();

        assert_eq!(transaction.id, 3);
        assert_eq!(transaction.amount, 2.0);
    }
}

#[cfg(test)]
mod patch_tests {
    use crate::{
        Error,
        transaction::{AmountInput, NewTransaction, TransactionPatch},
    };

    #[test]
    fn empty_patch_changes_nothing() {
        let mut transaction = NewTransaction::build("payment", 5.0, "A", "B")
            .timestamp("2024-05-01 10:00:00")
            .finalise(1)
            .unwrap();
        let before = transaction.clone();

        TransactionPatch::default().apply(&mut transaction).unwrap();

        assert_eq!(transaction, before);
    }

    #[test]
    fn invalid_amount_leaves_transaction_untouched() {
        let mut transaction = NewTransaction::build("payment", 5.0, "A", "B")
            .finalise(1)
            .unwrap();
        let before = transaction.clone();
        let patch = TransactionPatch {
            status: Some("completed".to_owned()),
            amount: Some(AmountInput::from("five")),
            ..Default::default()
        };

        let result = patch.apply(&mut transaction);

        assert_eq!(result, Err(Error::InvalidAmount("five".to_owned())));
        assert_eq!(transaction, before);
    }
}
