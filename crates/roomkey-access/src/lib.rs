//! # roomkey-access: Access control for hotel locks
//!
//! The entry point a door controller or an API layer calls. Given a subject
//! id and a location id it resolves the facts through three collaborator
//! stores, builds an evaluation context and asks the policy engine.
//!
//! ```text
//! check_access(subject, location)
//!     │
//!     ├─ IdentityStore ── not found ──► deny "subject not found"
//!     ├─ LocationStore ── not found ──► deny "location not found"
//!     ├─ BookingStore ─── select_active_booking
//!     │
//!     ├─ build_context(role, location, booking)
//!     └─ PolicyEngine::evaluate(snapshot) ──► AccessDecision
//! ```
//!
//! Store failures surface as [`AccessError`], never as a denial.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use roomkey_access::{AccessControl, Fixtures, PolicyEngine};
//!
//! let (identities, locations, bookings) = Fixtures::sample().into_stores(None);
//! let access = AccessControl::new(
//!     identities,
//!     locations,
//!     bookings,
//!     Arc::new(PolicyEngine::standard()),
//! );
//!
//! let decision = access.check_access(&"user-customer-standard-001".into(), &"room-101".into())?;
//! assert!(decision.access_granted);
//! # Ok::<(), roomkey_access::AccessError>(())
//! ```

pub mod engine;
pub mod error;
pub mod facade;
pub mod memory;
pub mod store;

pub use engine::PolicyEngine;
pub use error::{AccessError, FixtureError, Result, StoreError};
pub use facade::{
    AccessControl, AccessDecision, DenialKind, LOCATION_NOT_FOUND, SUBJECT_NOT_FOUND,
    SubjectSummary,
};
pub use memory::{Fixtures, InMemoryBookingStore, InMemoryIdentityStore, InMemoryLocationStore};
pub use store::{BookingStore, IdentityStore, LocationStore};
