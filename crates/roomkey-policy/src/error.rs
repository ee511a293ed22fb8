//! Policy error types.

use thiserror::Error;

/// Errors raised while loading a rule table or evaluating a context.
///
/// Neither variant is ever downgraded into a denial: a broken table must
/// stop the service from starting, and a malformed context is a caller bug.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The rule table source failed validation.
    #[error("invalid rule table{}: {message}", rule_suffix(.rule.as_deref()))]
    InvalidRuleTable {
        /// Name of the offending rule, when the failure is local to one rule.
        rule: Option<String>,
        message: String,
    },

    /// The evaluation context violates its own invariants.
    #[error("invalid evaluation context: {0}")]
    InvalidContext(String),
}

impl PolicyError {
    pub(crate) fn table(message: impl Into<String>) -> Self {
        Self::InvalidRuleTable {
            rule: None,
            message: message.into(),
        }
    }

    pub(crate) fn rule(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidRuleTable {
            rule: Some(name.to_string()),
            message: message.into(),
        }
    }
}

fn rule_suffix(rule: Option<&str>) -> String {
    rule.map(|name| format!(" (rule '{name}')"))
        .unwrap_or_default()
}

/// Result type for policy operations.
pub type Result<T> = std::result::Result<T, PolicyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_rule() {
        let err = PolicyError::rule("guest-booked-room", "reason must not be empty");
        assert_eq!(
            err.to_string(),
            "invalid rule table (rule 'guest-booked-room'): reason must not be empty"
        );

        let err = PolicyError::table("missing field `default`");
        assert_eq!(err.to_string(), "invalid rule table: missing field `default`");
    }
}
