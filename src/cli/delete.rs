use std::path::Path;

use crate::cli::{open_for_update, SelectionArgs};
use crate::error::Result;
use crate::fmt::plural;

pub fn run(data_dir: &Path, args: &SelectionArgs) -> Result<()> {
    let selectors = args.selectors();
    let mut ledger = open_for_update(data_dir, args.category)?;
    let removed = ledger.delete(args.category, &selectors)?;
    if removed == 0 {
        println!("No {} records matched the selection.", args.category);
        return Ok(());
    }
    ledger.save(args.category)?;
    println!("Deleted {}", plural(removed, "record", "records"));
    Ok(())
}
