//! The in-memory store that holds every transaction in insertion order along
//! with an index for looking them up by ID.

use std::collections::HashMap;

use crate::{
    Error,
    transaction::{
        ImportedTransaction, NewTransaction, Transaction, TransactionId, TransactionPatch,
    },
};

/// Build an index that maps each transaction ID to its position in
/// `transactions`.
///
/// If an ID appears more than once, the later position wins.
pub fn build_index(transactions: &[Transaction]) -> HashMap<TransactionId, usize> {
    transactions
        .iter()
        .enumerate()
        .map(|(position, transaction)| (transaction.id, position))
        .collect()
}

/// Owns the transactions and keeps the ordered list and the ID index in
/// agreement.
///
/// `index` maps an ID to the slot in `entries` holding that transaction, so
/// a lookup through the index reaches the same stored value as iterating
/// over `entries`.
#[derive(Debug)]
pub struct TransactionRegistry {
    entries: Vec<Transaction>,
    index: HashMap<TransactionId, usize>,
    /// `None` once every ID up to [TransactionId::MAX] has been handed out.
    next_id: Option<TransactionId>,
}

impl TransactionRegistry {
    /// Create an empty registry. The first created transaction gets the ID 1.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            next_id: Some(1),
        }
    }

    /// Create a registry from the records produced by [crate::ingest].
    ///
    /// The next ID is one more than the largest imported ID, or 1 if no
    /// record had an ID. Records without an ID are then numbered from the
    /// next ID in source order, so the next ID ends up past those as well.
    /// If the source repeats an ID, the later record replaces the earlier one.
    ///
    /// Records without an ID are dropped once the ID space is used up.
    pub fn from_imported(imported: Vec<ImportedTransaction>) -> Self {
        let mut next_id = imported
            .iter()
            .filter_map(|transaction| transaction.id)
            .max()
            .map_or(Some(1), |max_id| max_id.checked_add(1));

        let transactions: Vec<Transaction> = imported
            .into_iter()
            .filter_map(|transaction| {
                let id = match transaction.id {
                    Some(id) => id,
                    None => {
                        let Some(id) = next_id else {
                            tracing::warn!(
                                "Dropping imported transaction without an ID: no IDs left to assign."
                            );
                            return None;
                        };
                        next_id = id.checked_add(1);
                        tracing::debug!("Assigned ID {id} to an imported transaction without one.");
                        id
                    }
                };

                Some(transaction.into_transaction(id))
            })
            .collect();

        let index = build_index(&transactions);
        let entries = if index.len() == transactions.len() {
            transactions
        } else {
            transactions
                .into_iter()
                .enumerate()
                .filter(|(position, transaction)| {
                    let is_latest = index.get(&transaction.id) == Some(position);
                    if !is_latest {
                        tracing::warn!(
                            "Dropping imported transaction with duplicate ID {}.",
                            transaction.id
                        );
                    }
                    is_latest
                })
                .map(|(_, transaction)| transaction)
                .collect()
        };

        Self {
            index: build_index(&entries),
            entries,
            next_id,
        }
    }

    /// All transactions in insertion order.
    pub fn list(&self) -> &[Transaction] {
        &self.entries
    }

    /// The number of transactions in the registry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry holds no transactions.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The ID the next created transaction will get, `None` if no IDs are
    /// left.
    pub fn next_id(&self) -> Option<TransactionId> {
        self.next_id
    }

    /// Retrieve a transaction by its `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a transaction.
    pub fn get(&self, id: TransactionId) -> Result<&Transaction, Error> {
        self.index
            .get(&id)
            .map(|&position| &self.entries[position])
            .ok_or(Error::NotFound(id))
    }

    /// Find a transaction by checking each one in order.
    ///
    /// This gives the same answer as [TransactionRegistry::get] and exists
    /// to compare lookup strategies.
    pub fn find_linear(&self, id: TransactionId) -> Option<&Transaction> {
        self.entries.iter().find(|transaction| transaction.id == id)
    }

    /// Create a new transaction with the next available ID.
    ///
    /// The ID counter only advances when the transaction is stored.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::IdSpaceExhausted] if every ID has already been used,
    /// - [Error::MissingFields] naming every missing required field,
    /// - or [Error::InvalidAmount] if the amount is not a number.
    pub fn create(&mut self, request: NewTransaction) -> Result<Transaction, Error> {
        let id = self.next_id.ok_or(Error::IdSpaceExhausted)?;
        let transaction = request.finalise(id)?;
        self.next_id = id.checked_add(1);

        self.index.insert(transaction.id, self.entries.len());
        self.entries.push(transaction.clone());

        Ok(transaction)
    }

    /// Apply `patch` to the transaction with the given `id`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NotFound] if `id` does not refer to a transaction,
    /// - or [Error::InvalidAmount] if the amount is not a number, in which
    ///   case the transaction is not changed.
    pub fn update(
        &mut self,
        id: TransactionId,
        patch: TransactionPatch,
    ) -> Result<Transaction, Error> {
        let position = *self.index.get(&id).ok_or(Error::NotFound(id))?;
        let transaction = &mut self.entries[position];

        patch.apply(transaction)?;

        Ok(transaction.clone())
    }

    /// Remove the transaction with the given `id`, keeping the order of the
    /// remaining transactions.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if `id` does not refer to a transaction.
    pub fn delete(&mut self, id: TransactionId) -> Result<Transaction, Error> {
        let position = self.index.remove(&id).ok_or(Error::NotFound(id))?;
        let removed = self.entries.remove(position);

        for transaction in &self.entries[position..] {
            if let Some(slot) = self.index.get_mut(&transaction.id) {
                *slot -= 1;
            }
        }

        Ok(removed)
    }

    /// Whether every entry is indexed at its own slot and nothing else is
    /// indexed.
    #[cfg(test)]
    pub(crate) fn is_consistent(&self) -> bool {
        self.index.len() == self.entries.len()
            && self
                .entries
                .iter()
                .enumerate()
                .all(|(position, transaction)| self.index.get(&transaction.id) == Some(&position))
    }
}

impl Default for TransactionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
