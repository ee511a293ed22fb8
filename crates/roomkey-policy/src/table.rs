//! Rule table definitions.
//!
//! A rule table is an ordered list of rules plus one mandatory default
//! outcome. Each rule pairs a predicate (a conjunction of field matchers)
//! with an outcome. Order is semantically meaningful: the evaluator stops
//! at the first rule whose predicate matches, so authors place specific
//! rules above general ones.
//!
//! Tables are immutable once built. Replacing the active table is the
//! engine's job and always swaps the whole table.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use roomkey_types::{LocationType, Role, RoomTier, TypesError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PolicyError, Result};
use crate::template;

// ============================================================================
// Outcome
// ============================================================================

/// What a matching rule (or the default) decides.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Outcome {
    pub access_granted: bool,
    /// Human-readable justification. For rules this is a template, see
    /// [`crate::template`]; the default outcome is returned verbatim.
    pub reason: String,
}

impl Outcome {
    pub fn grant(reason: impl Into<String>) -> Self {
        Self {
            access_granted: true,
            reason: reason.into(),
        }
    }

    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            access_granted: false,
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Predicate
// ============================================================================

/// How a rule constrains the subject's role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RoleMatcher {
    /// Any role.
    #[default]
    Any,
    /// The role must be one of these.
    OneOf(Vec<Role>),
    /// The role's rank must be at least this value.
    MinRank(u8),
}

/// A conjunction of field matchers. `None` fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Predicate {
    pub role: RoleMatcher,
    pub location_types: Option<Vec<LocationType>>,
    pub is_booked_room: Option<bool>,
    pub room_tiers: Option<Vec<RoomTier>>,
}

impl Predicate {
    /// A predicate that matches every context.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.role = RoleMatcher::OneOf(roles.into_iter().collect());
        self
    }

    pub fn min_rank(mut self, rank: u8) -> Self {
        self.role = RoleMatcher::MinRank(rank);
        self
    }

    pub fn location_types(mut self, types: impl IntoIterator<Item = LocationType>) -> Self {
        self.location_types = Some(types.into_iter().collect());
        self
    }

    pub fn booked(mut self, is_booked_room: bool) -> Self {
        self.is_booked_room = Some(is_booked_room);
        self
    }

    pub fn room_tiers(mut self, tiers: impl IntoIterator<Item = RoomTier>) -> Self {
        self.room_tiers = Some(tiers.into_iter().collect());
        self
    }
}

impl fmt::Display for Predicate {
    /// Renders the predicate as a compact condition, e.g.
    /// `rank >= 4 and locationType in [guest-room]`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        match &self.role {
            RoleMatcher::Any => {}
            RoleMatcher::OneOf(roles) => parts.push(format!("role in [{}]", join(roles))),
            RoleMatcher::MinRank(rank) => parts.push(format!("rank >= {rank}")),
        }
        if let Some(types) = &self.location_types {
            parts.push(format!("locationType in [{}]", join(types)));
        }
        if let Some(booked) = self.is_booked_room {
            parts.push(format!("isBookedRoom = {booked}"));
        }
        if let Some(tiers) = &self.room_tiers {
            parts.push(format!("roomTier in [{}]", join(tiers)));
        }

        if parts.is_empty() {
            f.write_str("always")
        } else {
            f.write_str(&parts.join(" and "))
        }
    }
}

fn join<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// Rule
// ============================================================================

/// A single row of the decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    /// Unique name, reported in decisions for audit purposes.
    pub name: String,
    pub when: Predicate,
    pub then: Outcome,
}

impl Rule {
    pub fn new(name: impl Into<String>, when: Predicate, then: Outcome) -> Self {
        Self {
            name: name.into(),
            when,
            then,
        }
    }

    fn validate(&self) -> Result<()> {
        let name = self.name.as_str();

        match &self.when.role {
            RoleMatcher::OneOf(roles) if roles.is_empty() => {
                return Err(PolicyError::rule(name, "`role` must not be an empty set"));
            }
            RoleMatcher::Any | RoleMatcher::OneOf(_) => {}
            RoleMatcher::MinRank(rank) => {
                if !(Role::MIN_RANK..=Role::MAX_RANK).contains(rank) {
                    return Err(PolicyError::rule(
                        name,
                        format!(
                            "`minRank` {rank} is outside the role hierarchy ({}..={})",
                            Role::MIN_RANK,
                            Role::MAX_RANK
                        ),
                    ));
                }
            }
        }

        if self.when.location_types.as_ref().is_some_and(Vec::is_empty) {
            return Err(PolicyError::rule(
                name,
                "`locationType` must not be an empty set",
            ));
        }

        if let Some(tiers) = &self.when.room_tiers {
            if tiers.is_empty() {
                return Err(PolicyError::rule(name, "`roomTier` must not be an empty set"));
            }
            if self.when.is_booked_room == Some(false) {
                return Err(PolicyError::rule(
                    name,
                    "`roomTier` can never match together with `isBookedRoom: false`",
                ));
            }
        }

        if self.then.reason.trim().is_empty() {
            return Err(PolicyError::rule(name, "reason must not be empty"));
        }
        template::check(&self.then.reason).map_err(|message| PolicyError::rule(name, message))
    }
}

// ============================================================================
// RuleTable
// ============================================================================

/// An ordered, immutable decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    version: Option<String>,
    rules: Vec<Rule>,
    default: Outcome,
}

impl RuleTable {
    /// Parses and validates a rule table from its JSON source.
    ///
    /// Performs no I/O; the caller owns reading the source.
    pub fn load(source: &str) -> Result<Self> {
        let raw: RuleTableSource =
            serde_json::from_str(source).map_err(|e| PolicyError::table(e.to_string()))?;
        Self::from_source(raw)
    }

    /// Validates an already-deserialized source.
    pub fn from_source(source: RuleTableSource) -> Result<Self> {
        let table = source.into_table()?;
        table.validate()?;
        info!(
            version = table.version().unwrap_or("unversioned"),
            rules = table.len(),
            "Rule table loaded"
        );
        Ok(table)
    }

    /// Starts building a table in code.
    pub fn builder(default: Outcome) -> RuleTableBuilder {
        RuleTableBuilder {
            version: None,
            rules: Vec::new(),
            default,
        }
    }

    /// Checks every structural requirement of a table.
    pub fn validate(&self) -> Result<()> {
        if self.default.reason.trim().is_empty() {
            return Err(PolicyError::table("default outcome must carry a reason"));
        }

        let mut seen = HashSet::with_capacity(self.rules.len());
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(PolicyError::table("rule names must not be empty"));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(PolicyError::rule(&rule.name, "duplicate rule name"));
            }
            rule.validate()?;
        }
        Ok(())
    }

    /// The rules, in evaluation order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Outcome applied when no rule matches.
    pub fn default_outcome(&self) -> &Outcome {
        &self.default
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Looks up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.name == name)
    }

    /// Converts the table back into its JSON source form.
    pub fn to_source(&self) -> RuleTableSource {
        RuleTableSource {
            version: self.version.clone(),
            rules: self.rules.iter().map(RuleSource::from_rule).collect(),
            default: self.default.clone(),
        }
    }

    /// The standard hotel policy.
    ///
    /// Mirrors `rules/access-control.json`:
    /// - Administrator: everywhere
    /// - Manager: guest rooms, wellness areas, plus everything staff gets
    /// - Staff: staff areas and common areas
    /// - Premium guest: own booked room and wellness areas
    /// - Standard guest: own booked room only
    pub fn standard() -> Self {
        let guests = [Role::PremiumGuest, Role::StandardGuest];
        Self {
            version: Some("hotel-standard-1".to_string()),
            rules: vec![
                Rule::new(
                    "admin-full-access",
                    Predicate::any().min_rank(Role::Administrator.rank()),
                    Outcome::grant("administrators have unrestricted access"),
                ),
                Rule::new(
                    "manager-guest-rooms",
                    Predicate::any()
                        .min_rank(Role::Manager.rank())
                        .location_types([LocationType::GuestRoom]),
                    Outcome::grant("managers may enter any guest room"),
                ),
                Rule::new(
                    "manager-wellness",
                    Predicate::any()
                        .min_rank(Role::Manager.rank())
                        .location_types([LocationType::WellnessArea]),
                    Outcome::grant("managers may enter wellness areas"),
                ),
                Rule::new(
                    "staff-operational-areas",
                    Predicate::any()
                        .min_rank(Role::Staff.rank())
                        .location_types([LocationType::StaffArea, LocationType::CommonArea]),
                    Outcome::grant("{role} may enter {locationType} locations"),
                ),
                Rule::new(
                    "guest-booked-room",
                    Predicate::any()
                        .roles(guests)
                        .location_types([LocationType::GuestRoom])
                        .booked(true),
                    Outcome::grant("guest holds an active {roomTier} booking for this room"),
                ),
                Rule::new(
                    "premium-wellness-perk",
                    Predicate::any()
                        .roles([Role::PremiumGuest])
                        .location_types([LocationType::WellnessArea]),
                    Outcome::grant("wellness access is a premium-guest perk"),
                ),
                Rule::new(
                    "guest-foreign-room",
                    Predicate::any()
                        .roles(guests)
                        .location_types([LocationType::GuestRoom])
                        .booked(false),
                    Outcome::deny("guest has no active booking for this room"),
                ),
            ],
            default: Outcome::deny("no rule grants access to this location"),
        }
    }
}

/// Builds a [`RuleTable`] in code, validating it on [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct RuleTableBuilder {
    version: Option<String>,
    rules: Vec<Rule>,
    default: Outcome,
}

impl RuleTableBuilder {
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Appends a rule below every rule added so far.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn build(self) -> Result<RuleTable> {
        let table = RuleTable {
            version: self.version,
            rules: self.rules,
            default: self.default,
        };
        table.validate()?;
        Ok(table)
    }
}

// ============================================================================
// Source format
// ============================================================================

/// The JSON source form of a rule table.
///
/// ```json
/// {
///   "version": "hotel-standard-1",
///   "rules": [
///     { "name": "admin-full-access",
///       "when": { "minRank": 5 },
///       "then": { "accessGranted": true, "reason": "administrators have unrestricted access" } }
///   ],
///   "default": { "accessGranted": false, "reason": "no rule grants access to this location" }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleTableSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub rules: Vec<RuleSource>,
    pub default: Outcome,
}

/// One rule in source form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RuleSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub when: WhenSource,
    pub then: Outcome,
}

/// Field matchers in source form. Omitted fields are wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WhenSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_rank: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_type: Option<OneOrMany>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_booked_room: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room_tier: Option<OneOrMany>,
}

/// A single value or a set of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    fn values(&self) -> &[String] {
        match self {
            OneOrMany::One(value) => std::slice::from_ref(value),
            OneOrMany::Many(values) => values,
        }
    }

    fn from_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut names: Vec<String> = names.into_iter().map(str::to_string).collect();
        if names.len() == 1 {
            OneOrMany::One(names.remove(0))
        } else {
            OneOrMany::Many(names)
        }
    }
}

impl RuleTableSource {
    fn into_table(self) -> Result<RuleTable> {
        let rules = self
            .rules
            .into_iter()
            .enumerate()
            .map(|(index, rule)| rule.into_rule(index))
            .collect::<Result<Vec<_>>>()?;

        Ok(RuleTable {
            version: self.version,
            rules,
            default: self.default,
        })
    }
}

impl RuleSource {
    fn into_rule(self, index: usize) -> Result<Rule> {
        let name = self.name.unwrap_or_else(|| format!("rule-{}", index + 1));
        let when = self.when;

        let role = match (when.role, when.min_rank) {
            (Some(_), Some(_)) => {
                return Err(PolicyError::rule(
                    &name,
                    "`role` and `minRank` are mutually exclusive",
                ));
            }
            (Some(roles), None) => RoleMatcher::OneOf(parse_set(&name, "role", &roles)?),
            (None, Some(rank)) => RoleMatcher::MinRank(rank),
            (None, None) => RoleMatcher::Any,
        };

        let location_types = when
            .location_type
            .map(|types| parse_set(&name, "locationType", &types))
            .transpose()?;
        let room_tiers = when
            .room_tier
            .map(|tiers| parse_set(&name, "roomTier", &tiers))
            .transpose()?;

        Ok(Rule {
            name,
            when: Predicate {
                role,
                location_types,
                is_booked_room: when.is_booked_room,
                room_tiers,
            },
            then: self.then,
        })
    }

    fn from_rule(rule: &Rule) -> Self {
        let (role, min_rank) = match &rule.when.role {
            RoleMatcher::Any => (None, None),
            RoleMatcher::OneOf(roles) => (
                Some(OneOrMany::from_names(roles.iter().map(|r| r.as_str()))),
                None,
            ),
            RoleMatcher::MinRank(rank) => (None, Some(*rank)),
        };

        Self {
            name: Some(rule.name.clone()),
            when: WhenSource {
                role,
                min_rank,
                location_type: rule
                    .when
                    .location_types
                    .as_ref()
                    .map(|types| OneOrMany::from_names(types.iter().map(|t| t.as_str()))),
                is_booked_room: rule.when.is_booked_room,
                room_tier: rule
                    .when
                    .room_tiers
                    .as_ref()
                    .map(|tiers| OneOrMany::from_names(tiers.iter().map(|t| t.as_str()))),
            },
            then: rule.then.clone(),
        }
    }
}

fn parse_set<T>(rule: &str, field: &str, values: &OneOrMany) -> Result<Vec<T>>
where
    T: FromStr<Err = TypesError>,
{
    let values = values.values();
    if values.is_empty() {
        return Err(PolicyError::rule(
            rule,
            format!("`{field}` must not be an empty set"),
        ));
    }
    values
        .iter()
        .map(|value| {
            value
                .parse::<T>()
                .map_err(|e| PolicyError::rule(rule, e.to_string()))
        })
        .collect()
}
