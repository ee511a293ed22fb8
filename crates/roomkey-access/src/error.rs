//! Error types for access checks and collaborator stores.

use roomkey_policy::PolicyError;
use roomkey_types::{BookingId, LocationId, SubjectId, TypesError};
use thiserror::Error;

/// Failure reported by a collaborator store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store answered with data that violates the domain invariants.
    #[error("store returned corrupt data: {0}")]
    Corrupt(String),
}

/// Error type for access checks.
///
/// None of these is a policy denial. Callers must be able to tell
/// "denied by policy" (an `Ok` decision) from "could not evaluate policy".
#[derive(Debug, Error)]
pub enum AccessError {
    /// A collaborator store failed.
    #[error("{collaborator} unavailable: {source}")]
    CollaboratorUnavailable {
        collaborator: &'static str,
        #[source]
        source: StoreError,
    },

    /// The policy layer rejected the context or a replacement table.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// The engine's table slot is unusable (poisoned lock).
    #[error("policy engine unavailable: {0}")]
    EngineUnavailable(String),
}

impl AccessError {
    pub(crate) fn unavailable(collaborator: &'static str, source: StoreError) -> Self {
        Self::CollaboratorUnavailable {
            collaborator,
            source,
        }
    }
}

/// Result type for access checks.
pub type Result<T> = std::result::Result<T, AccessError>;

/// Errors raised while loading fixture data into the in-memory stores.
#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("failed to parse fixtures: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] TypesError),

    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("booking '{booking}' references unknown subject '{subject}'")]
    UnknownSubject {
        booking: BookingId,
        subject: SubjectId,
    },

    #[error("booking '{booking}' references unknown room '{room}'")]
    UnknownRoom { booking: BookingId, room: LocationId },

    #[error("booking '{booking}' targets '{room}', which is not a guest room")]
    NotAGuestRoom { booking: BookingId, room: LocationId },

    #[error("booking '{booking}' records a different tier than room '{room}'")]
    TierMismatch { booking: BookingId, room: LocationId },
}
