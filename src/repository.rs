use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{PostbookError, Result};
use crate::importer::{parse_date, RawTable};
use crate::models::{Category, TransactionRecord, CANONICAL_COLUMNS, COL_ADDRESS, COL_DATE, COL_NAME, COL_POSTED};

/// Per-category CSV files (`Ratified.csv`, `Sold.csv`, `Listed.csv`) in one
/// data directory. Every save rewrites the whole file.
#[derive(Debug, Clone)]
pub struct Repository {
    dir: PathBuf,
}

pub fn format_posted(posted: bool) -> &'static str {
    if posted {
        "True"
    } else {
        "False"
    }
}

pub fn parse_posted(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "1.0" => Some(true),
        "false" | "0" | "no" | "n" | "0.0" | "" => Some(false),
        _ => None,
    }
}

fn write_records<W: Write>(wtr: &mut csv::Writer<W>, records: &[TransactionRecord]) -> csv::Result<()> {
    for r in records {
        wtr.write_record([
            r.display_date().as_str(),
            r.name.as_str(),
            r.address.as_str(),
            format_posted(r.posted),
        ])?;
    }
    Ok(())
}

/// Decode a persisted table. Errors are plain messages; the caller adds the
/// category and path.
fn decode(table: &RawTable) -> std::result::Result<Vec<TransactionRecord>, String> {
    let col = |name: &str| table.column(name).ok_or_else(|| format!("missing column '{name}'"));
    let idx_date = col(COL_DATE)?;
    let idx_name = col(COL_NAME)?;
    let idx_address = col(COL_ADDRESS)?;
    // Files written by hand sometimes drop the flag; treat that as unposted.
    let idx_posted = table.column(COL_POSTED);

    let mut records = Vec::with_capacity(table.rows.len());
    for (i, row) in table.rows.iter().enumerate() {
        let raw_date = RawTable::cell(row, idx_date);
        let date = parse_date(raw_date)
            .ok_or_else(|| format!("row {}: unparseable date '{raw_date}'", i + 1))?;
        let posted = match idx_posted {
            Some(idx) => {
                let raw = RawTable::cell(row, idx);
                parse_posted(raw)
                    .ok_or_else(|| format!("row {}: invalid Posted value '{raw}'", i + 1))?
            }
            None => false,
        };
        records.push(TransactionRecord {
            date,
            name: RawTable::cell(row, idx_name).to_string(),
            address: RawTable::cell(row, idx_address).to_string(),
            posted,
        });
    }
    Ok(records)
}

impl Repository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Records persisted for `category`. A missing file is the normal first
    /// run state and yields an empty collection.
    pub fn load(&self, category: Category) -> Result<Vec<TransactionRecord>> {
        let path = self.path_for(category);
        let table = match RawTable::from_path(&path) {
            Ok(table) => table,
            Err(PostbookError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("{category}: no saved data at {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(PostbookError::persistence(category, &path, e)),
        };
        let records = decode(&table).map_err(|msg| PostbookError::persistence(category, &path, msg))?;
        log::info!("{category}: loaded {} record(s) from {}", records.len(), path.display());
        Ok(records)
    }

    /// Overwrite the category file with `records`. The data is written to a
    /// sibling temp file first and renamed into place.
    pub fn save(&self, category: Category, records: &[TransactionRecord]) -> Result<()> {
        let path = self.path_for(category);
        let tmp = self.dir.join(format!(".{}.tmp", category.file_name()));
        let write = || -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
            std::fs::create_dir_all(&self.dir)?;
            let mut wtr = csv::Writer::from_writer(File::create(&tmp)?);
            wtr.write_record(CANONICAL_COLUMNS)?;
            write_records(&mut wtr, records)?;
            let file = wtr.into_inner().map_err(|e| e.into_error())?;
            file.sync_all()?;
            std::fs::rename(&tmp, &path)?;
            Ok(())
        };
        if let Err(e) = write() {
            let _ = std::fs::remove_file(&tmp);
            return Err(PostbookError::persistence(category, &path, e));
        }
        log::info!("{category}: saved {} record(s) to {}", records.len(), path.display());
        Ok(())
    }
}

/// Write every group's records into a single CSV with the canonical header
/// and no category column.
pub fn export_csv(path: &Path, groups: &[(Category, Vec<TransactionRecord>)]) -> Result<usize> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(CANONICAL_COLUMNS)?;
    let mut total = 0;
    for (category, records) in groups {
        write_records(&mut wtr, records)?;
        log::debug!("export: {} {category} record(s)", records.len());
        total += records.len();
    }
    wtr.flush()?;
    log::info!("exported {total} record(s) to {}", path.display());
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(date: &str, name: &str, address: &str, posted: bool) -> TransactionRecord {
        TransactionRecord {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            name: name.to_string(),
            address: address.to_string(),
            posted,
        }
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        assert!(repo.load(Category::Sold).unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path().join("data"));
        let records = vec![
            record("2024-03-01", "Jane Doe", "12 Elm St", false),
            record("2024-03-02", "O'Brien, Pat", "7 \"The Oaks\" Ln", true),
        ];
        repo.save(Category::Ratified, &records).unwrap();
        assert_eq!(repo.load(Category::Ratified).unwrap(), records);
    }

    #[test]
    fn test_saved_file_format() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        repo.save(Category::Listed, &[record("2024-03-01", "Jane Doe", "12 Elm St", true)])
            .unwrap();
        let content = std::fs::read_to_string(dir.path().join("Listed.csv")).unwrap();
        assert_eq!(content, "Date,Name,Address,Posted\n2024-03-01,Jane Doe,12 Elm St,True\n");
        assert!(!dir.path().join(".Listed.csv.tmp").exists());
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Repository::new(dir.path());
        repo.save(Category::Sold, &[record("2024-01-01", "A", "1 St", false)]).unwrap();
        repo.save(Category::Sold, &[]).unwrap();
        assert!(repo.load(Category::Sold).unwrap().is_empty());
    }

    #[test]
    fn test_load_normalizes_dates_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("Sold.csv"),
            "Date,Name,Address,Posted\n03/01/2024,Jane Doe,12 Elm St,true\n2024-03-02 00:00:00,Bob,1 St,0\n",
        )
        .unwrap();
        let repo = Repository::new(dir.path());
        let records = repo.load(Category::Sold).unwrap();
        assert_eq!(records[0], record("2024-03-01", "Jane Doe", "12 Elm St", true));
        assert_eq!(records[1], record("2024-03-02", "Bob", "1 St", false));
    }

    #[test]
    fn test_load_without_posted_column() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Listed.csv"), "Date,Name,Address\n2024-01-01,A,1 St\n").unwrap();
        let records = Repository::new(dir.path()).load(Category::Listed).unwrap();
        assert!(!records[0].posted);
    }

    #[test]
    fn test_load_bad_file_reports_context() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Sold.csv"), "Date,Name,Address,Posted\nsoon,A,1 St,False\n").unwrap();
        let err = Repository::new(dir.path()).load(Category::Sold).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, PostbookError::Persistence { category: Category::Sold, .. }));
        assert!(msg.contains("Sold.csv"));
        assert!(msg.contains("row 1: unparseable date 'soon'"));
    }

    #[test]
    fn test_parse_posted() {
        assert_eq!(parse_posted("True"), Some(true));
        assert_eq!(parse_posted(" FALSE "), Some(false));
        assert_eq!(parse_posted("1"), Some(true));
        assert_eq!(parse_posted(""), Some(false));
        assert_eq!(parse_posted("maybe"), None);
    }

    #[test]
    fn test_export_concatenates_without_category_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("all.csv");
        let groups = vec![
            (Category::Ratified, vec![record("2024-01-01", "A", "1 St", false)]),
            (Category::Sold, vec![]),
            (Category::Listed, vec![record("2024-01-03", "C", "3 St", true)]),
        ];
        let total = export_csv(&path, &groups).unwrap();
        assert_eq!(total, 2);
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Date,Name,Address,Posted\n2024-01-01,A,1 St,False\n2024-01-03,C,3 St,True\n"
        );
    }
}
