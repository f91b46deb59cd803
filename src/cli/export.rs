use std::path::Path;

use crate::cli::open_all;
use crate::error::Result;
use crate::fmt::plural;

pub fn run(data_dir: &Path, path: &Path) -> Result<()> {
    let ledger = open_all(data_dir)?;
    let total = ledger.export_all(path)?;
    println!("Exported {} to {}", plural(total, "record", "records"), path.display());
    Ok(())
}
