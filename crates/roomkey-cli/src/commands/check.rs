//! Check command: decide one access request.

use std::process::ExitCode;

use anyhow::{Context, Result};
use roomkey_access::AccessDecision;
use roomkey_config::RoomkeyConfig;
use roomkey_policy::RuleTrace;
use roomkey_types::{LocationId, SubjectId};

use crate::OutputFormat;
use crate::style::{self, colors::SemanticStyle};

/// Exit code for a denial under `--strict`.
const DENIED: u8 = 2;

pub fn run(
    config: &RoomkeyConfig,
    subject: &str,
    location: &str,
    format: OutputFormat,
    strict: bool,
    explain: bool,
) -> Result<ExitCode> {
    let hotel = super::open_hotel(config)?;
    let decision = hotel
        .check_access(&SubjectId::from(subject), &LocationId::from(location))
        .context("Access check failed")?;

    let trace = match (&decision.context, explain) {
        (Some(context), true) => {
            let table = hotel.engine().snapshot()?;
            Some(roomkey_policy::explain(context, &table)?)
        }
        _ => None,
    };

    match format {
        OutputFormat::Json => {
            let json = match &trace {
                Some(trace) => serde_json::json!({ "decision": decision, "trace": trace }),
                None => serde_json::to_value(&decision)?,
            };
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        OutputFormat::Text => {
            print_decision(&format!("{subject} -> {location}"), &decision);
            if let Some(trace) = &trace {
                println!();
                print_trace(trace);
            }
        }
    }

    if strict && !decision.access_granted {
        Ok(ExitCode::from(DENIED))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// Prints a decision the way `check` and `demo` show it.
pub fn print_decision(title: &str, decision: &AccessDecision) {
    style::print_verdict(decision.access_granted, title);
    style::print_labeled("Reason", &decision.reason);
    if let Some(rule) = &decision.matched_rule {
        style::print_labeled("Rule", &rule.code());
    }
    if let Some(subject) = &decision.subject {
        style::print_labeled("Subject", &format!("{} ({})", subject.name, subject.role));
    }
    if let Some(location) = &decision.location {
        style::print_labeled(
            "Location",
            &format!("{} ({})", location.name, location.location_type),
        );
    }
}

fn print_trace(trace: &[RuleTrace]) {
    let rows: Vec<Vec<String>> = trace
        .iter()
        .enumerate()
        .map(|(index, step)| {
            vec![
                (index + 1).to_string(),
                step.rule.clone(),
                if step.matched { "yes" } else { "no" }.to_string(),
                step.failed_matcher
                    .map_or_else(String::new, |matcher| format!("{matcher:?}")),
            ]
        })
        .collect();
    style::print_result_table(&["#", "Rule", "Matched", "Failed on"], &rows, "rule");
}
