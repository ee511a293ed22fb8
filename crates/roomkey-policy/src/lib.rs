//! # roomkey-policy: Rule-table access decisions
//!
//! Grants or denies a subject's access to a physical location from a
//! declarative, auditable rule table instead of conditionals spread across
//! the code base.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Domain facts                                │
//! │  (Role + Location + active Booking)          │
//! └─────────────────┬───────────────────────────┘
//!                   │  context::build
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  EvaluationContext                           │
//! │  {role, rank, locationType,                  │
//! │   isBookedRoom, roomTier}                    │
//! └─────────────────┬───────────────────────────┘
//!                   │  evaluator::evaluate
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  RuleTable (ordered, first match wins)       │
//! │  ├─ Match predicates top-down                │
//! │  └─ Fall back to the default outcome         │
//! └─────────────────┬───────────────────────────┘
//!                   │
//!                   ▼
//! ┌─────────────────────────────────────────────┐
//! │  Decision                                    │
//! │  - accessGranted                             │
//! │  - Rendered reason                           │
//! │  - Matched rule name                         │
//! │  - Echoed context                            │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Examples
//!
//! ```
//! use roomkey_policy::{context, evaluate, RuleTable};
//! use roomkey_types::{Location, LocationType, Role};
//!
//! let table = RuleTable::standard();
//! let office = Location::area("office", "Office", LocationType::AdminArea);
//!
//! let ctx = context::build(Role::Administrator, &office, None);
//! let decision = evaluate(&ctx, &table)?;
//! assert!(decision.access_granted);
//! # Ok::<(), roomkey_policy::PolicyError>(())
//! ```
//!
//! Tables are usually authored as JSON:
//!
//! ```
//! use roomkey_policy::RuleTable;
//!
//! let table = RuleTable::load(r#"{
//!     "rules": [
//!         { "when": { "role": "staff", "locationType": "staff-area" },
//!           "then": { "accessGranted": true, "reason": "staff only" } }
//!     ],
//!     "default": { "accessGranted": false, "reason": "denied" }
//! }"#)?;
//! assert_eq!(table.len(), 1);
//! # Ok::<(), roomkey_policy::PolicyError>(())
//! ```

pub mod context;
pub mod error;
pub mod evaluator;
pub mod table;
pub mod template;


pub use context::{EvaluationContext, build as build_context, select_active_booking};
pub use error::{PolicyError, Result};
pub use evaluator::{Decision, Matcher, RuleTrace, evaluate, explain};
pub use table::{
    OneOrMany, Outcome, Predicate, RoleMatcher, Rule, RuleSource, RuleTable, RuleTableBuilder,
    RuleTableSource, WhenSource,
};
