//! Rule table evaluation engine.
//!
//! Scans the table top-down and stops at the first rule whose predicate is
//! satisfied by the context. If no rule matches, the table's default outcome
//! applies verbatim. Evaluation is pure and never blocks, so one table can be
//! shared read-only across any number of threads.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::EvaluationContext;
use crate::error::Result;
use crate::table::{Predicate, RoleMatcher, RuleTable};
use crate::template;

// ============================================================================
// Decision
// ============================================================================

/// The result of evaluating a context against a rule table.
///
/// Equal `(context, table)` pairs always produce equal decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    pub access_granted: bool,
    /// Rendered justification of the outcome.
    pub reason: String,
    /// The rule that matched, or `None` if the default applied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
    /// The context the decision was made for.
    pub context: EvaluationContext,
}

/// One field matcher of a predicate, as reported by [`explain`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Matcher {
    Role,
    MinRank,
    LocationType,
    IsBookedRoom,
    RoomTier,
}

/// How a single rule fared against a context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleTrace {
    pub rule: String,
    pub matched: bool,
    /// The first matcher that rejected the context.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failed_matcher: Option<Matcher>,
}

// ============================================================================
// Public API
// ============================================================================

/// Evaluates a context against a rule table.
///
/// # Errors
///
/// Returns [`PolicyError::InvalidContext`](crate::PolicyError::InvalidContext)
/// when the context is internally inconsistent. Such a context is never
/// turned into a default denial.
pub fn evaluate(context: &EvaluationContext, table: &RuleTable) -> Result<Decision> {
    context.validate()?;

    for rule in table.rules() {
        if first_mismatch(&rule.when, context).is_none() {
            debug!(
                rule = %rule.name,
                role = %context.role,
                location_type = %context.location_type,
                granted = rule.then.access_granted,
                "Rule matched"
            );
            return Ok(Decision {
                access_granted: rule.then.access_granted,
                reason: template::render(&rule.then.reason, context),
                matched_rule: Some(rule.name.clone()),
                context: *context,
            });
        }
    }

    let default = table.default_outcome();
    debug!(
        role = %context.role,
        location_type = %context.location_type,
        granted = default.access_granted,
        "No rule matched; applying default outcome"
    );
    Ok(Decision {
        access_granted: default.access_granted,
        reason: default.reason.clone(),
        matched_rule: None,
        context: *context,
    })
}

/// Traces every rule of the table against a context, in order.
///
/// Unlike [`evaluate`] this does not stop at the first match; it is meant
/// for auditing why a table decides the way it does. The first trace with
/// `matched == true` is the rule `evaluate` would pick.
pub fn explain(context: &EvaluationContext, table: &RuleTable) -> Result<Vec<RuleTrace>> {
    context.validate()?;

    Ok(table
        .rules()
        .iter()
        .map(|rule| {
            let failed_matcher = first_mismatch(&rule.when, context);
            RuleTrace {
                rule: rule.name.clone(),
                matched: failed_matcher.is_none(),
                failed_matcher,
            }
        })
        .collect())
}

// ============================================================================
// Predicate Matching
// ============================================================================

/// Returns the first matcher of `predicate` that `context` fails, or `None`
/// if the whole conjunction holds.
fn first_mismatch(predicate: &Predicate, context: &EvaluationContext) -> Option<Matcher> {
    match &predicate.role {
        RoleMatcher::Any => {}
        RoleMatcher::OneOf(roles) => {
            if !roles.contains(&context.role) {
                return Some(Matcher::Role);
            }
        }
        RoleMatcher::MinRank(min) => {
            if context.rank < *min {
                return Some(Matcher::MinRank);
            }
        }
    }

    if let Some(types) = &predicate.location_types {
        if !types.contains(&context.location_type) {
            return Some(Matcher::LocationType);
        }
    }

    if let Some(booked) = predicate.is_booked_room {
        if booked != context.is_booked_room {
            return Some(Matcher::IsBookedRoom);
        }
    }

    // A tier matcher needs a tier: contexts without a booked room never satisfy it.
    if let Some(tiers) = &predicate.room_tiers {
        if !context.room_tier.is_some_and(|tier| tiers.contains(&tier)) {
            return Some(Matcher::RoomTier);
        }
    }

    None
}

// ============================================================================
// Tests
// ============================================================================
