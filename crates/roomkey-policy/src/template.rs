//! Reason templates.
//!
//! Rule reasons may reference context fields as `{role}`, `{rank}`,
//! `{locationType}` and `{roomTier}`. Placeholders are checked when the
//! table loads, so rendering at evaluation time cannot fail.

use crate::context::EvaluationContext;

/// Placeholder names accepted in reason templates.
pub const PLACEHOLDERS: [&str; 4] = ["role", "rank", "locationType", "roomTier"];

/// Checks that every `{...}` in `template` is closed and known.
pub(crate) fn check(template: &str) -> Result<(), String> {
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| format!("unterminated placeholder in reason '{template}'"))?;
        let name = &after[..close];
        if !PLACEHOLDERS.contains(&name) {
            return Err(format!(
                "unknown placeholder '{{{name}}}' in reason (expected one of {})",
                PLACEHOLDERS.join(", ")
            ));
        }
        rest = &after[close + 1..];
    }
    Ok(())
}

/// Renders `template` against `context`.
///
/// Unknown placeholders are copied through untouched; tables that went
/// through validation never contain any.
pub(crate) fn render(template: &str, context: &EvaluationContext) -> String {
    if !template.contains('{') {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        match &after[..close] {
            "role" => out.push_str(context.role.as_str()),
            "rank" => out.push_str(&context.rank.to_string()),
            "locationType" => out.push_str(context.location_type.as_str()),
            "roomTier" => out.push_str(context.room_tier.map_or("none", |tier| tier.as_str())),
            other => {
                out.push('{');
                out.push_str(other);
                out.push('}');
            }
        }
        rest = &after[close + 1..];
    }
    out.push_str(rest);
    out
}
