use std::path::Path;

use crate::error::Result;
use crate::filter::FilterSpec;
use crate::fmt::{plural, records_table};
use crate::ledger::Ledger;
use crate::models::Category;

pub fn run(
    data_dir: &Path,
    category: Category,
    from: Option<&str>,
    to: Option<&str>,
    name: Option<&str>,
    status: Option<&str>,
) -> Result<()> {
    let spec = FilterSpec::from_inputs(from, to, name, status)?;
    let (ledger, _) = Ledger::open(data_dir);
    let total = ledger.store(category).len();
    let rows = if spec.is_empty() {
        ledger.get_all(category)
    } else {
        ledger.filter(category, &spec)?
    };

    if rows.is_empty() {
        println!("No {category} records to show.");
        return Ok(());
    }
    println!("{category}\n{}", records_table(&rows));
    if spec.is_empty() {
        println!("{}", plural(total, "record", "records"));
    } else {
        println!("{} of {}", rows.len(), plural(total, "record", "records"));
    }
    Ok(())
}
