//! Collaborator contracts.
//!
//! The facade never owns hotel data. It asks three stores for the facts of
//! one request:
//! - **Identity**: who is asking (subject and role)
//! - **Location**: what is being opened (type and tier)
//! - **Booking**: which stay, if any, the subject currently holds
//!
//! Implementations must be `Send + Sync`; a single facade serves concurrent
//! requests. "Not found" is `Ok(None)` (or an empty list); `Err` is reserved
//! for stores that cannot answer at all.

use std::sync::Arc;

use roomkey_types::{Booking, Location, LocationId, Subject, SubjectId};

use crate::error::StoreError;

/// Resolves subjects by id.
pub trait IdentityStore: Send + Sync {
    fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError>;
}

/// Resolves locations by id.
pub trait LocationStore: Send + Sync {
    fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, StoreError>;
}

/// Lists the bookings a subject holds right now.
///
/// More than one booking may come back; the facade narrows the list with
/// [`roomkey_policy::select_active_booking`].
pub trait BookingStore: Send + Sync {
    fn find_active_for_subject(&self, subject: &SubjectId) -> Result<Vec<Booking>, StoreError>;
}

// ============================================================================
// Shared handles
// ============================================================================

impl<T: IdentityStore + ?Sized> IdentityStore for Arc<T> {
    fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError> {
        (**self).find_by_id(id)
    }
}

impl<T: LocationStore + ?Sized> LocationStore for Arc<T> {
    fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, StoreError> {
        (**self).find_by_id(id)
    }
}

impl<T: BookingStore + ?Sized> BookingStore for Arc<T> {
    fn find_active_for_subject(&self, subject: &SubjectId) -> Result<Vec<Booking>, StoreError> {
        (**self).find_active_for_subject(subject)
    }
}
