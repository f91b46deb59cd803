use std::collections::HashSet;

use crate::error::{PostbookError, Result};
use crate::filter::{self, FilterSpec};
use crate::importer::canonicalize;
use crate::models::{Category, MergeResult, RecordId, Selector, TransactionRecord};

/// The authoritative record collection for one category.
///
/// Every record gets a [`RecordId`] when it enters the store so callers that
/// hold on to a row can address it even if its `(date, name, address)` key
/// is temporarily shared with another row.
#[derive(Debug, Clone)]
pub struct CategoryStore {
    category: Category,
    entries: Vec<(RecordId, TransactionRecord)>,
    next_id: u64,
}

impl CategoryStore {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_records(category: Category, records: Vec<TransactionRecord>) -> Self {
        let mut store = Self::new(category);
        store.replace(records);
        store
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn posted_count(&self) -> usize {
        self.entries.iter().filter(|(_, r)| r.posted).count()
    }

    /// Copies of every record, in store order.
    pub fn records(&self) -> Vec<TransactionRecord> {
        self.entries.iter().map(|(_, r)| r.clone()).collect()
    }

    pub fn entries(&self) -> &[(RecordId, TransactionRecord)] {
        &self.entries
    }

    pub fn get(&self, id: RecordId) -> Option<&TransactionRecord> {
        self.entries.iter().find(|(i, _)| *i == id).map(|(_, r)| r)
    }

    fn issue_id(&mut self) -> RecordId {
        let id = RecordId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Replace the whole collection, as done after a load.
    pub fn replace(&mut self, records: Vec<TransactionRecord>) {
        self.entries.clear();
        for record in records {
            let id = self.issue_id();
            self.entries.push((id, record));
        }
    }

    /// Merge a normalized batch into the store.
    ///
    /// Existing records are re-canonicalized and placed ahead of the batch,
    /// then the first occurrence of each `(date, name, address)` key is kept.
    /// An existing record therefore always beats an imported duplicate,
    /// including its `posted` flag. Duplicates inside the batch collapse too.
    pub fn import_merge(&mut self, incoming: Vec<TransactionRecord>) -> MergeResult {
        let mut seen = HashSet::new();
        let mut merged = Vec::with_capacity(self.entries.len() + incoming.len());

        for (id, record) in self.entries.drain(..) {
            let record = canonicalize(&record);
            if seen.insert(record.key()) {
                merged.push((id, record));
            }
        }

        let mut result = MergeResult::default();
        for record in incoming {
            if seen.insert(record.key()) {
                merged.push((self.issue_id(), record));
                result.added += 1;
            } else {
                result.skipped += 1;
            }
        }

        self.entries = merged;
        log::debug!(
            "{}: merged {} new, {} duplicate(s), {} total",
            self.category,
            result.added,
            result.skipped,
            self.entries.len()
        );
        result
    }

    /// Set `posted` on every record matching any selector. Returns the number
    /// of records updated.
    pub fn set_posted(&mut self, selectors: &[Selector], value: bool) -> Result<usize> {
        if selectors.is_empty() {
            return Err(PostbookError::NoSelection);
        }
        let mut updated = 0;
        for (_, record) in self.entries.iter_mut() {
            if selectors.iter().any(|s| s.matches(record)) {
                record.posted = value;
                updated += 1;
            }
        }
        Ok(updated)
    }

    /// Remove every record matching any selector. Returns the number removed.
    pub fn delete(&mut self, selectors: &[Selector]) -> Result<usize> {
        if selectors.is_empty() {
            return Err(PostbookError::NoSelection);
        }
        let before = self.entries.len();
        self.entries
            .retain(|(_, record)| !selectors.iter().any(|s| s.matches(record)));
        Ok(before - self.entries.len())
    }

    pub fn set_posted_ids(&mut self, ids: &[RecordId], value: bool) -> Result<usize> {
        if ids.is_empty() {
            return Err(PostbookError::NoSelection);
        }
        let mut updated = 0;
        for (id, record) in self.entries.iter_mut() {
            if ids.contains(id) {
                record.posted = value;
                updated += 1;
            }
        }
        Ok(updated)
    }

    pub fn delete_ids(&mut self, ids: &[RecordId]) -> Result<usize> {
        if ids.is_empty() {
            return Err(PostbookError::NoSelection);
        }
        let before = self.entries.len();
        self.entries.retain(|(id, _)| !ids.contains(id));
        Ok(before - self.entries.len())
    }

    /// Matching records, copied. The store is never modified.
    pub fn filter(&self, spec: &FilterSpec) -> Result<Vec<TransactionRecord>> {
        filter::filter(self.entries.iter().map(|(_, r)| r), spec)
    }
}
