//! Loads transactions from an XML record file.
//!
//! The file has a single root element whose `<transaction>` children are the
//! records:
//!
//! ```xml
//! <transactions>
//!     <transaction id="1">
//!         <type>deposit</type>
//!         <amount>5000</amount>
//!         <sender>Bank</sender>
//!         <receiver>Jane Smith</receiver>
//!         <timestamp>2024-05-10 16:30:51</timestamp>
//!         <status>completed</status>
//!     </transaction>
//! </transactions>
//! ```
//!
//! Missing fields get defaults rather than rejecting the record, see
//! [parse_records].

use std::{fs, path::Path};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::{
    Error,
    transaction::{AmountInput, DEFAULT_STATUS, ImportedTransaction, TransactionId},
};

const RECORD_TAG: &[u8] = b"transaction";

/// Load the transactions in the XML file at `path`.
///
/// This function never fails. If the file is missing, unreadable or not
/// well-formed XML, the problem is logged and an empty list is returned so
/// that the application can start without any transactions.
pub fn ingest(path: impl AsRef<Path>) -> Vec<ImportedTransaction> {
    let path = path.as_ref();

    match read_records(path) {
        Ok(transactions) => {
            tracing::info!(
                "Loaded {} transactions from {}",
                transactions.len(),
                path.display()
            );
            transactions
        }
        Err(error) => {
            tracing::error!("{error}. Starting with no transactions.");
            Vec::new()
        }
    }
}

/// Read and parse the XML file at `path`.
///
/// # Errors
/// This function will return a:
/// - [Error::SourceUnreadable] if the file cannot be read as UTF-8 text,
/// - or [Error::MalformedSource] if the text is not well-formed XML.
pub fn read_records(path: &Path) -> Result<Vec<ImportedTransaction>, Error> {
    let text = fs::read_to_string(path)
        .map_err(|error| Error::SourceUnreadable(format!("{}: {error}", path.display())))?;

    parse_records(&text)
}

/// Parse the `<transaction>` records found directly under the root element
/// of `text`, in document order.
///
/// For each record:
/// - `id` is read from the `id` attribute, and is `None` if the attribute is
///   missing, empty or not an integer,
/// - `amount` defaults to `0.0` if missing, empty or not a number,
/// - `type`, `sender`, `receiver` and `timestamp` default to an empty string,
/// - `status` defaults to [DEFAULT_STATUS].
///
/// Unknown elements are ignored.
///
/// # Errors
/// Returns [Error::MalformedSource] if `text` is not a well-formed XML
/// document with exactly one root element.
pub fn parse_records(text: &str) -> Result<Vec<ImportedTransaction>, Error> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut transactions = Vec::new();
    let mut depth = 0usize;
    let mut seen_root = false;
    let mut record: Option<RecordFields> = None;
    let mut field: Option<Field> = None;

    loop {
        let event = reader.read_event().map_err(|error| {
            Error::MalformedSource(format!(
                "{error} at byte {}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(start) => {
                match depth {
                    0 => enter_root(&mut seen_root)?,
                    1 if start.name().as_ref() == RECORD_TAG => {
                        record = Some(RecordFields::from_start(&start)?);
                    }
                    2 => {
                        field = record.as_mut().and_then(|record| {
                            let field = Field::from_tag(start.name().as_ref())?;
                            record.open(field).then_some(field)
                        });
                    }
                    _ => {}
                }
                depth += 1;
            }
            Event::Empty(start) => match depth {
                0 => enter_root(&mut seen_root)?,
                1 if start.name().as_ref() == RECORD_TAG => {
                    transactions.push(RecordFields::from_start(&start)?.finish());
                }
                2 => {
                    if let (Some(record), Some(field)) =
                        (record.as_mut(), Field::from_tag(start.name().as_ref()))
                    {
                        record.open(field);
                    }
                }
                _ => {}
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
                match depth {
                    1 => {
                        if let Some(record) = record.take() {
                            transactions.push(record.finish());
                        }
                    }
                    2 => field = None,
                    _ => {}
                }
            }
            Event::Text(text) => {
                if depth == 0 {
                    return Err(Error::MalformedSource(
                        "text found outside the root element".to_owned(),
                    ));
                }

                if depth == 3 {
                    let text = text
                        .unescape()
                        .map_err(|error| Error::MalformedSource(error.to_string()))?;
                    push_text(record.as_mut(), field, &text);
                }
            }
            Event::CData(data) => {
                if depth == 3 {
                    let data = data.into_inner();
                    push_text(record.as_mut(), field, &String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !seen_root {
        return Err(Error::MalformedSource("no root element found".to_owned()));
    }

    if depth != 0 {
        return Err(Error::MalformedSource(
            "unexpected end of file inside an element".to_owned(),
        ));
    }

    Ok(transactions)
}

fn enter_root(seen_root: &mut bool) -> Result<(), Error> {
    if *seen_root {
        return Err(Error::MalformedSource(
            "found more than one root element".to_owned(),
        ));
    }

    *seen_root = true;
    Ok(())
}

fn push_text(record: Option<&mut RecordFields>, field: Option<Field>, text: &str) {
    if let (Some(record), Some(field)) = (record, field) {
        if let Some(value) = record.slot(field) {
            value.push_str(text);
        }
    }
}

/// The child elements of a record that hold transaction fields.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Type,
    Amount,
    Sender,
    Receiver,
    Timestamp,
    Status,
}

impl Field {
    fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"type" => Some(Field::Type),
            b"amount" => Some(Field::Amount),
            b"sender" => Some(Field::Sender),
            b"receiver" => Some(Field::Receiver),
            b"timestamp" => Some(Field::Timestamp),
            b"status" => Some(Field::Status),
            _ => None,
        }
    }
}

/// The raw text of a record, `None` for fields that were not present.
#[derive(Debug, Default)]
struct RecordFields {
    id: Option<String>,
    kind: Option<String>,
    amount: Option<String>,
    sender: Option<String>,
    receiver: Option<String>,
    timestamp: Option<String>,
    status: Option<String>,
}

impl RecordFields {
    fn from_start(start: &BytesStart) -> Result<Self, Error> {
        let id = start
            .try_get_attribute("id")
            .map_err(|error| Error::MalformedSource(error.to_string()))?
            .map(|attribute| attribute.unescape_value().map(|value| value.into_owned()))
            .transpose()
            .map_err(|error| Error::MalformedSource(error.to_string()))?;

        Ok(Self {
            id,
            ..Default::default()
        })
    }

    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Type => &mut self.kind,
            Field::Amount => &mut self.amount,
            Field::Sender => &mut self.sender,
            Field::Receiver => &mut self.receiver,
            Field::Timestamp => &mut self.timestamp,
            Field::Status => &mut self.status,
        }
    }

    /// Mark `field` as present. Returns false if it was already present, in
    /// which case the first occurrence is kept.
    fn open(&mut self, field: Field) -> bool {
        let slot = self.slot(field);
        if slot.is_some() {
            return false;
        }

        *slot = Some(String::new());
        true
    }

    fn finish(self) -> ImportedTransaction {
        let id = self.id.filter(|id| !id.trim().is_empty()).and_then(|id| {
            id.trim()
                .parse::<TransactionId>()
                .inspect_err(|_| tracing::warn!("Ignoring transaction ID \"{id}\": not an integer."))
                .ok()
        });

        let amount = match self.amount {
            Some(amount) if !amount.trim().is_empty() => AmountInput::Text(amount)
                .coerce()
                .unwrap_or_else(|error| {
                    tracing::warn!("{error} for transaction {id:?}, using 0.0 instead.");
                    0.0
                }),
            _ => 0.0,
        };

        ImportedTransaction {
            id,
            kind: self.kind.unwrap_or_default(),
            amount,
            sender: self.sender.unwrap_or_default(),
            receiver: self.receiver.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_default(),
            status: self.status.unwrap_or_else(|| DEFAULT_STATUS.to_owned()),
        }
    }
}
