use std::path::{Path, PathBuf};

use crate::error::{PostbookError, Result};
use crate::filter::FilterSpec;
use crate::importer::{normalize, normalize_file, RawTable};
use crate::models::{Category, MergeResult, Selector, TransactionRecord};
use crate::repository::{export_csv, Repository};
use crate::store::CategoryStore;

/// Counts shown by `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySummary {
    pub category: Category,
    pub total: usize,
    pub posted: usize,
}

/// The three category stores plus the directory they persist to.
///
/// The stores never reference each other; a front end that needs concurrent
/// access can lock each one independently.
#[derive(Debug)]
pub struct Ledger {
    repo: Repository,
    stores: [CategoryStore; 3],
}

impl Ledger {
    /// A ledger with empty stores; nothing is read from disk.
    pub fn empty(dir: impl Into<PathBuf>) -> Self {
        Self {
            repo: Repository::new(dir),
            stores: Category::ALL.map(CategoryStore::new),
        }
    }

    /// Load every category from `dir`. A category whose file cannot be read
    /// starts empty; its error is returned alongside the ledger so the caller
    /// can report it.
    pub fn open(dir: impl Into<PathBuf>) -> (Self, Vec<PostbookError>) {
        let mut ledger = Self::empty(dir);
        let mut failures = Vec::new();
        for category in Category::ALL {
            if let Err(e) = ledger.load(category) {
                log::warn!("{category}: starting empty, {e}");
                failures.push(e);
            }
        }
        (ledger, failures)
    }

    pub fn store(&self, category: Category) -> &CategoryStore {
        &self.stores[category.index()]
    }

    pub fn store_mut(&mut self, category: Category) -> &mut CategoryStore {
        &mut self.stores[category.index()]
    }

    /// Normalize a raw export and merge it into the category. Nothing changes
    /// when normalization fails.
    pub fn import_merge(&mut self, category: Category, table: &RawTable) -> Result<MergeResult> {
        let records = normalize(category, table)?;
        Ok(self.store_mut(category).import_merge(records))
    }

    pub fn import_file(&mut self, category: Category, path: &Path) -> Result<MergeResult> {
        let records = normalize_file(category, path)?;
        Ok(self.store_mut(category).import_merge(records))
    }

    pub fn set_posted(&mut self, category: Category, selectors: &[Selector], value: bool) -> Result<usize> {
        self.store_mut(category).set_posted(selectors, value)
    }

    pub fn delete(&mut self, category: Category, selectors: &[Selector]) -> Result<usize> {
        self.store_mut(category).delete(selectors)
    }

    pub fn filter(&self, category: Category, spec: &FilterSpec) -> Result<Vec<TransactionRecord>> {
        self.store(category).filter(spec)
    }

    pub fn get_all(&self, category: Category) -> Vec<TransactionRecord> {
        self.store(category).records()
    }

    /// Replace the category's records with what is on disk. On failure the
    /// store is left empty.
    pub fn load(&mut self, category: Category) -> Result<()> {
        let loaded = self.repo.load(category);
        let store = self.store_mut(category);
        match loaded {
            Ok(records) => {
                store.replace(records);
                Ok(())
            }
            Err(e) => {
                store.replace(Vec::new());
                Err(e)
            }
        }
    }

    pub fn save(&self, category: Category) -> Result<()> {
        self.repo.save(category, &self.get_all(category))
    }

    /// Save every category, attempting all of them. The first failure is
    /// returned after the rest have been tried.
    pub fn save_all(&self) -> Result<()> {
        let mut first_err = None;
        for category in Category::ALL {
            if let Err(e) = self.save(category) {
                log::warn!("{e}");
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Write all categories, in Ratified, Sold, Listed order, to one CSV.
    pub fn export_all(&self, path: &Path) -> Result<usize> {
        let groups: Vec<(Category, Vec<TransactionRecord>)> =
            Category::ALL.iter().map(|c| (*c, self.get_all(*c))).collect();
        export_csv(path, &groups)
    }

    pub fn summary(&self) -> Vec<CategorySummary> {
        self.stores
            .iter()
            .map(|s| CategorySummary {
                category: s.category(),
                total: s.len(),
                posted: s.posted_count(),
            })
            .collect()
    }
}
