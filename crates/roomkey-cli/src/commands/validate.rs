//! Validate command: check a rule table without deciding anything.

use std::path::Path;

use anyhow::Result;

use crate::style;

pub fn run(path: &Path) -> Result<()> {
    let table = super::load_rules(path)?;

    style::print_success(&format!(
        "Rule table is valid: {} rule{}",
        table.len(),
        if table.len() == 1 { "" } else { "s" }
    ));
    style::print_labeled("Path", &path.display().to_string());
    style::print_labeled("Version", table.version().unwrap_or("unversioned"));
    Ok(())
}
