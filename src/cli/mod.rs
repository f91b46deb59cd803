pub mod delete;
pub mod export;
pub mod import;
pub mod init;
pub mod list;
pub mod mark;
pub mod status;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};

use crate::error::{PostbookError, Result};
use crate::ledger::Ledger;
use crate::models::{Category, Selector};

#[derive(Parser)]
#[command(name = "postbook", about = "Daily transaction post manager for Ratified, Sold and Listed records.")]
pub struct Cli {
    /// Data directory holding Ratified.csv, Sold.csv and Listed.csv
    /// (default: the directory chosen with `postbook init`)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<String>,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose the data directory and create it.
    Init,
    /// Import a CSV export and merge it into a category, skipping duplicates.
    Import {
        /// Path to the CSV file
        file: PathBuf,
        /// Ratified, Sold or Listed
        #[arg(long, short)]
        category: Category,
    },
    /// Show a category's records, optionally filtered.
    List {
        /// Ratified, Sold or Listed
        #[arg(long, short)]
        category: Category,
        /// Start of the date range (inclusive)
        #[arg(long)]
        from: Option<String>,
        /// End of the date range (inclusive)
        #[arg(long)]
        to: Option<String>,
        /// Only names containing this text (case-insensitive)
        #[arg(long)]
        name: Option<String>,
        /// all, posted or unposted
        #[arg(long)]
        status: Option<String>,
    },
    /// Mark the selected records as posted.
    Post(SelectionArgs),
    /// Mark the selected records as unposted.
    Unpost(SelectionArgs),
    /// Delete the selected records.
    Delete(SelectionArgs),
    /// Export every category into one CSV file.
    Export {
        /// Output CSV path
        path: PathBuf,
    },
    /// Show the data directory and record counts.
    Status,
}

/// Which records a mutation applies to, by their displayed values.
#[derive(Args, Debug, Clone)]
pub struct SelectionArgs {
    /// Ratified, Sold or Listed
    #[arg(long, short)]
    pub category: Category,
    /// Date as displayed (YYYY-MM-DD)
    #[arg(long, requires_all = ["name", "address"])]
    pub date: Option<String>,
    /// Name as displayed
    #[arg(long, requires_all = ["date", "address"])]
    pub name: Option<String>,
    /// Address as displayed
    #[arg(long, requires_all = ["date", "name"])]
    pub address: Option<String>,
    /// Additional selection, repeatable
    #[arg(long = "select", value_name = "DATE|NAME|ADDRESS")]
    pub select: Vec<Selector>,
}

impl SelectionArgs {
    pub fn selectors(&self) -> Vec<Selector> {
        let mut out = Vec::with_capacity(self.select.len() + 1);
        if let (Some(date), Some(name), Some(address)) = (&self.date, &self.name, &self.address) {
            out.push(Selector::new(date.trim(), name.trim(), address.trim()));
        }
        out.extend(self.select.iter().cloned());
        out
    }
}

/// Open the ledger for a command that will modify `category`.
///
/// Other categories that fail to load are only warned about, but the target
/// category must load cleanly: saving it afterwards would replace an
/// unreadable file with an empty one.
pub(crate) fn open_for_update(data_dir: &Path, category: Category) -> Result<Ledger> {
    let (ledger, failures) = Ledger::open(data_dir);
    for failure in failures {
        if matches!(&failure, PostbookError::Persistence { category: c, .. } if *c == category) {
            return Err(failure);
        }
    }
    Ok(ledger)
}

/// Open the ledger for a command that reads every category, failing on the
/// first category that could not be loaded.
pub(crate) fn open_all(data_dir: &Path) -> Result<Ledger> {
    let (ledger, failures) = Ledger::open(data_dir);
    match failures.into_iter().next() {
        Some(failure) => Err(failure),
        None => Ok(ledger),
    }
}
