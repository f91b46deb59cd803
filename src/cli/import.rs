use std::path::Path;

use crate::cli::open_for_update;
use crate::error::Result;
use crate::models::Category;

pub fn run(data_dir: &Path, file: &Path, category: Category) -> Result<()> {
    let mut ledger = open_for_update(data_dir, category)?;
    let result = ledger.import_file(category, file)?;
    ledger.save(category)?;
    println!("{} imported, {} skipped (duplicates)", result.added, result.skipped);
    Ok(())
}
