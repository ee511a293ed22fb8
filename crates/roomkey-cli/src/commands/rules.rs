//! Rules command: list a rule table in evaluation order.

use std::path::Path;

use anyhow::Result;
use roomkey_policy::Outcome;

use crate::OutputFormat;
use crate::style::{self, colors::SemanticStyle};

pub fn run(path: &Path, format: OutputFormat) -> Result<()> {
    let table = super::load_rules(path)?;

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&table.to_source())?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Rule table".header(),
        table.version().unwrap_or("unversioned").muted()
    );

    let rows: Vec<Vec<String>> = table
        .rules()
        .iter()
        .enumerate()
        .map(|(index, rule)| {
            vec![
                (index + 1).to_string(),
                rule.name.clone(),
                rule.when.to_string(),
                effect(&rule.then),
                rule.then.reason.clone(),
            ]
        })
        .collect();
    style::print_result_table(&["#", "Rule", "When", "Effect", "Reason"], &rows, "rule");

    let default = table.default_outcome();
    style::print_labeled(
        "Default",
        &format!("{} ({})", effect(default), default.reason),
    );
    Ok(())
}

fn effect(outcome: &Outcome) -> String {
    if outcome.access_granted {
        "grant".to_string()
    } else {
        "deny".to_string()
    }
}
