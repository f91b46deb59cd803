use std::path::Path;

use crate::cli::{open_for_update, SelectionArgs};
use crate::error::Result;
use crate::fmt::plural;

pub fn run(data_dir: &Path, args: &SelectionArgs, posted: bool) -> Result<()> {
    let selectors = args.selectors();
    let mut ledger = open_for_update(data_dir, args.category)?;
    let updated = ledger.set_posted(args.category, &selectors, posted)?;
    if updated == 0 {
        println!("No {} records matched the selection.", args.category);
        return Ok(());
    }
    ledger.save(args.category)?;
    let label = if posted { "posted" } else { "unposted" };
    println!("Marked {} as {label}", plural(updated, "record", "records"));
    Ok(())
}
