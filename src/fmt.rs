use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::models::TransactionRecord;

/// Posted flag as shown to the user.
pub fn yes_no(posted: bool) -> &'static str {
    if posted {
        "Yes"
    } else {
        "No"
    }
}

/// One row per record; posted rows green, unposted red.
pub fn records_table(records: &[TransactionRecord]) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Name", "Address", "Posted"]);
    for r in records {
        let posted = if r.posted {
            yes_no(true).green().to_string()
        } else {
            yes_no(false).red().to_string()
        };
        table.add_row(vec![
            Cell::new(r.display_date()),
            Cell::new(&r.name),
            Cell::new(&r.address),
            Cell::new(posted),
        ]);
    }
    table
}

pub fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}
