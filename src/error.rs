use std::path::PathBuf;

use thiserror::Error;

use crate::models::Category;

/// A source row whose date column could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadDate {
    /// 1-based data row number (the header is not counted).
    pub row: usize,
    pub value: String,
}

#[derive(Error, Debug)]
pub enum PostbookError {
    #[error("CSV file is missing required columns: {}", .missing.join(", "))]
    Schema { missing: Vec<String> },

    #[error("Some dates could not be parsed ({}). Please check your CSV format.", describe_bad_dates(.rows))]
    InvalidDate { rows: Vec<BadDate> },

    #[error("Invalid filter parameters: {0}")]
    Filter(String),

    #[error("No items selected")]
    NoSelection,

    #[error("Error accessing {category} data at {}: {source}", .path.display())]
    Persistence {
        category: Category,
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown category: {0} (expected Ratified, Sold or Listed)")]
    UnknownCategory(String),

    #[error("Invalid selector '{0}', expected DATE|NAME|ADDRESS")]
    InvalidSelector(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, PostbookError>;

impl PostbookError {
    pub fn persistence(
        category: Category,
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        PostbookError::Persistence {
            category,
            path: path.into(),
            source: source.into(),
        }
    }
}

const BAD_DATES_SHOWN: usize = 5;

fn describe_bad_dates(rows: &[BadDate]) -> String {
    let mut parts: Vec<String> = rows
        .iter()
        .take(BAD_DATES_SHOWN)
        .map(|b| format!("row {}: '{}'", b.row, b.value))
        .collect();
    if rows.len() > BAD_DATES_SHOWN {
        parts.push(format!("and {} more", rows.len() - BAD_DATES_SHOWN));
    }
    parts.join(", ")
}
