pub mod cli;
pub mod error;
pub mod filter;
pub mod fmt;
pub mod importer;
pub mod ledger;
pub mod logger;
pub mod models;
pub mod repository;
pub mod settings;
pub mod store;

pub use error::{PostbookError, Result};
pub use filter::{FilterSpec, PostedStatus};
pub use importer::RawTable;
pub use ledger::Ledger;
pub use models::{Category, MergeResult, RecordId, Selector, TransactionRecord};
pub use store::CategoryStore;
