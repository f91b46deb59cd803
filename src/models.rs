use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::error::PostbookError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Canonical column names, in file order.
pub const COL_DATE: &str = "Date";
pub const COL_NAME: &str = "Name";
pub const COL_ADDRESS: &str = "Address";
pub const COL_POSTED: &str = "Posted";
pub const CANONICAL_COLUMNS: [&str; 4] = [COL_DATE, COL_NAME, COL_ADDRESS, COL_POSTED];

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Ratified,
    Sold,
    Listed,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Ratified, Category::Sold, Category::Listed];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ratified => "Ratified",
            Self::Sold => "Sold",
            Self::Listed => "Listed",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Ratified => 0,
            Self::Sold => 1,
            Self::Listed => 2,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.csv", self.name())
    }

    /// Source column -> canonical column, as exported by the upstream system
    /// for this category. Only the date column differs between categories.
    pub fn column_map(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Listed => &[
                ("owner_name", COL_NAME),
                ("full_address", COL_ADDRESS),
                ("listing_date", COL_DATE),
            ],
            Self::Ratified => &[
                ("owner_name", COL_NAME),
                ("full_address", COL_ADDRESS),
                ("acceptance_date", COL_DATE),
            ],
            Self::Sold => &[
                ("owner_name", COL_NAME),
                ("full_address", COL_ADDRESS),
                ("closing_date", COL_DATE),
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Category {
    type Err = PostbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PostbookError::UnknownCategory(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Surrogate id assigned by a store when a record enters it. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    pub date: NaiveDate,
    pub name: String,
    pub address: String,
    pub posted: bool,
}

/// The `(date, name, address)` triple that identifies "the same" transaction.
pub type DedupKey = (NaiveDate, String, String);

impl TransactionRecord {
    pub fn display_date(&self) -> String {
        self.date.format(DATE_FORMAT).to_string()
    }

    pub fn key(&self) -> DedupKey {
        (self.date, self.name.clone(), self.address.clone())
    }
}

/// Identifies target records by their displayed `(date, name, address)` values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub date: String,
    pub name: String,
    pub address: String,
}

impl Selector {
    pub fn new(date: impl Into<String>, name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn of(record: &TransactionRecord) -> Self {
        Self::new(record.display_date(), record.name.clone(), record.address.clone())
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        self.date == record.display_date() && self.name == record.name && self.address == record.address
    }
}

impl FromStr for Selector {
    type Err = PostbookError;

    /// Parses `DATE|NAME|ADDRESS`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('|').collect();
        if parts.len() != 3 {
            return Err(PostbookError::InvalidSelector(s.to_string()));
        }
        Ok(Selector::new(parts[0].trim(), parts[1].trim(), parts[2].trim()))
    }
}

/// Outcome of merging an imported batch into a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeResult {
    pub added: usize,
    pub skipped: usize,
}
