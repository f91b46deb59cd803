use std::path::Path;

use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::ledger::Ledger;

pub fn run(data_dir: &Path) -> Result<()> {
    println!("Data dir:   {}", data_dir.display());
    if !data_dir.exists() {
        println!();
        println!("Data directory not found. Run `postbook init` or import a file to create it.");
        return Ok(());
    }

    let (ledger, failures) = Ledger::open(data_dir);
    let mut table = Table::new();
    table.set_header(vec!["Category", "Records", "Posted", "Unposted"]);
    for s in ledger.summary() {
        table.add_row(vec![
            Cell::new(s.category),
            Cell::new(s.total),
            Cell::new(s.posted),
            Cell::new(s.total - s.posted),
        ]);
    }
    println!("{table}");
    if !failures.is_empty() {
        println!();
        for e in &failures {
            println!("Unreadable: {e}");
        }
    }
    Ok(())
}
