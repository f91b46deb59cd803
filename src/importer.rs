use std::io::Read;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::error::{BadDate, PostbookError, Result};
use crate::models::{Category, TransactionRecord, COL_ADDRESS, COL_DATE, COL_NAME};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %I:%M:%S %p",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%Y%m%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%b. %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B, %Y",
];

// Tried last: a four-digit year format happily reads "24" as year 24.
const SHORT_YEAR_FORMATS: &[&str] = &["%m/%d/%y", "%m-%d-%y", "%d-%b-%y"];

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    (date.year() >= 1000).then_some(date)
}

/// Parse a date written in any of the common export formats.
///
/// Slash- and dash-separated numeric dates are read month first. Time parts
/// and offsets are accepted and dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return plausible(dt.date_naive());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            if let Some(d) = plausible(dt.date()) {
                return Some(d);
            }
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            if let Some(d) = plausible(d) {
                return Some(d);
            }
        }
    }
    SHORT_YEAR_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Word-initial letters upper case, every other letter lower case. A "word"
/// starts after any non-letter, so digits and apostrophes break words too.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_is_letter = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if prev_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(c);
            prev_is_letter = false;
        }
    }
    out
}

/// Canonical form for names and addresses.
pub fn canonical_text(s: &str) -> String {
    title_case(s.trim())
}

/// Re-apply text canonicalization to a record that may have been stored in
/// an older or hand-edited form.
pub fn canonicalize(record: &TransactionRecord) -> TransactionRecord {
    TransactionRecord {
        date: record.date,
        name: canonical_text(&record.name),
        address: canonical_text(&record.address),
        posted: record.posted,
    }
}

// ---------------------------------------------------------------------------
// RawTable
// ---------------------------------------------------------------------------

/// Rows as they came out of an external CSV export, before column mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new<H, R, C>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: rows
                .into_iter()
                .map(|r| r.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            if record.iter().all(|f| f.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(Self { headers, rows })
    }

    /// Position of a column by exact (already trimmed) header name.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Cell value, empty when the row is shorter than the header.
    pub fn cell(row: &[String], idx: usize) -> &str {
        row.get(idx).map(String::as_str).unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

/// Rename source headers to canonical column names using the category's map.
/// Headers without a mapping keep their own name.
pub fn map_columns(category: Category, headers: &[String]) -> Vec<String> {
    headers
        .iter()
        .map(|h| {
            let h = h.trim();
            category
                .column_map()
                .iter()
                .find(|(from, _)| *from == h)
                .map(|(_, to)| to.to_string())
                .unwrap_or_else(|| h.to_string())
        })
        .collect()
}

/// Turn an external export into canonical records for `category`.
///
/// The batch is all-or-nothing: a missing column fails with
/// [`PostbookError::Schema`], and any unparseable date fails with
/// [`PostbookError::InvalidDate`] listing every offending row. Imported
/// records always start unposted.
pub fn normalize(category: Category, table: &RawTable) -> Result<Vec<TransactionRecord>> {
    let columns = map_columns(category, &table.headers);
    let find = |name: &str| columns.iter().position(|c| c == name);

    let (idx_date, idx_name, idx_address) = match (find(COL_DATE), find(COL_NAME), find(COL_ADDRESS)) {
        (Some(d), Some(n), Some(a)) => (d, n, a),
        (d, n, a) => {
            let missing = [(COL_DATE, d), (COL_NAME, n), (COL_ADDRESS, a)]
                .into_iter()
                .filter(|(_, idx)| idx.is_none())
                .map(|(col, _)| col.to_string())
                .collect();
            return Err(PostbookError::Schema { missing });
        }
    };

    let mut records = Vec::with_capacity(table.rows.len());
    let mut bad_dates = Vec::new();
    for (i, row) in table.rows.iter().enumerate() {
        let raw_date = RawTable::cell(row, idx_date);
        let Some(date) = parse_date(raw_date) else {
            bad_dates.push(BadDate {
                row: i + 1,
                value: raw_date.to_string(),
            });
            continue;
        };
        records.push(TransactionRecord {
            date,
            name: canonical_text(RawTable::cell(row, idx_name)),
            address: canonical_text(RawTable::cell(row, idx_address)),
            posted: false,
        });
    }

    if !bad_dates.is_empty() {
        return Err(PostbookError::InvalidDate { rows: bad_dates });
    }
    log::debug!("normalized {} {} row(s)", records.len(), category);
    Ok(records)
}

/// Read and normalize a CSV export from disk.
pub fn normalize_file(category: Category, path: &Path) -> Result<Vec<TransactionRecord>> {
    let table = RawTable::from_path(path)?;
    log::debug!("read {} row(s) from {}", table.rows.len(), path.display());
    normalize(category, &table)
}
