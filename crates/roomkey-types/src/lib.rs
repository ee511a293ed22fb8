//! # roomkey-types: Core types for `roomkey`
//!
//! This crate contains the domain vocabulary shared across the `roomkey` system:
//! - Entity IDs ([`SubjectId`], [`LocationId`], [`BookingId`])
//! - Subject roles and their hierarchy ranks ([`Role`])
//! - Physical locations ([`Location`], [`LocationType`], [`RoomTier`])
//! - Room bookings ([`Booking`])
//! - Subjects resolved from the identity store ([`Subject`])
//!
//! Nothing in here performs I/O. Stores that own this data live behind the
//! collaborator traits in `roomkey-access`.

use std::fmt::{Debug, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod booking;
mod location;
mod role;

pub use booking::Booking;
pub use location::{Location, LocationType, RoomTier};
pub use role::Role;

// ============================================================================
// Entity IDs
// ============================================================================

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id! {
    /// Identifier of a subject (guest, employee) known to the identity store.
    SubjectId
}

string_id! {
    /// Identifier of a physical location (room, sauna, office...).
    ///
    /// Booking-to-room matching compares these exactly; display names and
    /// location codes never participate.
    LocationId
}

string_id! {
    /// Identifier of a booking.
    BookingId
}

// ============================================================================
// Subject
// ============================================================================

/// A subject as resolved by the identity store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
}

impl Subject {
    pub fn new(id: impl Into<SubjectId>, name: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: None,
            role,
        }
    }

    /// Sets the contact email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Structural violations of the domain invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    /// A guest room was defined without a room tier.
    #[error("location '{0}' is a guest room but has no room tier")]
    MissingRoomTier(LocationId),

    /// A room tier was attached to something that is not a guest room.
    #[error("location '{id}' is a {location_type} and cannot carry a room tier")]
    UnexpectedRoomTier {
        id: LocationId,
        location_type: LocationType,
    },

    /// A booking whose stay ends on or before it starts.
    #[error("booking '{0}' checks out before it checks in")]
    InvalidStay(BookingId),

    /// A rank outside the role hierarchy.
    #[error("no role has rank {0}")]
    UnknownRank(u8),

    /// An enumerated value that is not part of the vocabulary.
    #[error("unknown {kind} '{value}'")]
    UnknownValue { kind: &'static str, value: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = LocationId::from("room-101");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"room-101\"");
        let back: LocationId = serde_json::from_str("\"room-101\"").unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "room-101");
    }

    #[test]
    fn subject_email_is_optional() {
        let subject: Subject =
            serde_json::from_str(r#"{"id":"user-staff-001","name":"Charlie Staff","role":"staff"}"#)
                .unwrap();
        assert_eq!(subject.role, Role::Staff);
        assert!(subject.email.is_none());

        let json = serde_json::to_string(&subject).unwrap();
        assert!(!json.contains("email"));
    }
}
