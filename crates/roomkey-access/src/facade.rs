//! The access control facade.
//!
//! Answers "may subject S open location L right now?" by resolving the
//! subject, the location and the subject's active booking through the
//! collaborator stores, then asking the policy engine.

use std::sync::Arc;

use roomkey_policy::{Decision, EvaluationContext, build_context, select_active_booking};
use roomkey_types::{Location, LocationId, Role, Subject, SubjectId};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use crate::engine::PolicyEngine;
use crate::error::{AccessError, Result, StoreError};
use crate::store::{BookingStore, IdentityStore, LocationStore};

/// Reason returned when the subject id resolves to nothing.
pub const SUBJECT_NOT_FOUND: &str = "subject not found";

/// Reason returned when the location id resolves to nothing.
pub const LOCATION_NOT_FOUND: &str = "location not found";

// ============================================================================
// AccessDecision
// ============================================================================

/// The caller-facing answer to one access request.
///
/// Serializes as `{accessGranted, reason, matchedRule?, context?, location?,
/// subject?}`. Lookup denials carry no context because the policy was never
/// consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub access_granted: bool,
    pub reason: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_rule: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<EvaluationContext>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<SubjectSummary>,
}

/// The subject fields echoed back with a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSummary {
    pub id: SubjectId,
    pub name: String,
    pub role: Role,
}

impl From<&Subject> for SubjectSummary {
    fn from(subject: &Subject) -> Self {
        Self {
            id: subject.id.clone(),
            name: subject.name.clone(),
            role: subject.role,
        }
    }
}

/// Why a request was denied before the policy was consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenialKind {
    SubjectNotFound,
    LocationNotFound,
}

impl AccessDecision {
    fn subject_not_found() -> Self {
        Self {
            access_granted: false,
            reason: SUBJECT_NOT_FOUND.to_string(),
            matched_rule: None,
            context: None,
            location: None,
            subject: None,
        }
    }

    fn location_not_found(subject: &Subject) -> Self {
        Self {
            access_granted: false,
            reason: LOCATION_NOT_FOUND.to_string(),
            matched_rule: None,
            context: None,
            location: None,
            subject: Some(subject.into()),
        }
    }

    fn evaluated(decision: Decision, subject: &Subject, location: Location) -> Self {
        Self {
            access_granted: decision.access_granted,
            reason: decision.reason,
            matched_rule: decision.matched_rule,
            context: Some(decision.context),
            location: Some(location),
            subject: Some(subject.into()),
        }
    }

    /// Returns the lookup failure behind this denial, if any.
    ///
    /// `None` for every decision produced by the policy engine, granted or
    /// not.
    pub fn denial_kind(&self) -> Option<DenialKind> {
        if self.access_granted || self.context.is_some() {
            return None;
        }
        match self.reason.as_str() {
            SUBJECT_NOT_FOUND => Some(DenialKind::SubjectNotFound),
            LOCATION_NOT_FOUND => Some(DenialKind::LocationNotFound),
            _ => None,
        }
    }
}

// ============================================================================
// AccessControl
// ============================================================================

/// Composes the collaborator stores with a shared policy engine.
#[derive(Debug)]
pub struct AccessControl<I, L, B> {
    identities: I,
    locations: L,
    bookings: B,
    engine: Arc<PolicyEngine>,
}

impl<I, L, B> AccessControl<I, L, B>
where
    I: IdentityStore,
    L: LocationStore,
    B: BookingStore,
{
    pub fn new(identities: I, locations: L, bookings: B, engine: Arc<PolicyEngine>) -> Self {
        Self {
            identities,
            locations,
            bookings,
            engine,
        }
    }

    /// The engine this facade evaluates against.
    pub fn engine(&self) -> &Arc<PolicyEngine> {
        &self.engine
    }

    /// Decides whether `subject_id` may open `location_id`.
    ///
    /// Unknown subjects and locations are ordinary denials. Store failures
    /// and inconsistent contexts are errors: an unavailable collaborator must
    /// never be reported as "access denied".
    pub fn check_access(
        &self,
        subject_id: &SubjectId,
        location_id: &LocationId,
    ) -> Result<AccessDecision> {
        let Some(subject) = self
            .identities
            .find_by_id(subject_id)
            .map_err(|e| unavailable("identity store", e))?
        else {
            warn!(subject = %subject_id, location = %location_id, "Access denied: subject not found");
            return Ok(AccessDecision::subject_not_found());
        };

        let Some(location) = self
            .locations
            .find_by_id(location_id)
            .map_err(|e| unavailable("location store", e))?
        else {
            warn!(subject = %subject_id, location = %location_id, "Access denied: location not found");
            return Ok(AccessDecision::location_not_found(&subject));
        };

        let bookings = self
            .bookings
            .find_active_for_subject(subject_id)
            .map_err(|e| unavailable("booking store", e))?;
        let booking = select_active_booking(&bookings);
        if bookings.len() > 1 {
            debug!(
                subject = %subject_id,
                active = bookings.len(),
                selected = booking.map(|b| b.id.as_str()),
                "Multiple active bookings"
            );
        }

        let context = build_context(subject.role, &location, booking);
        let decision = self.engine.evaluate(&context)?;

        if decision.access_granted {
            info!(
                subject = %subject_id,
                location = %location_id,
                rule = decision.matched_rule.as_deref(),
                "Access granted"
            );
        } else {
            warn!(
                subject = %subject_id,
                location = %location_id,
                role = %subject.role,
                reason = %decision.reason,
                "Access denied"
            );
        }

        Ok(AccessDecision::evaluated(decision, &subject, location))
    }
}

fn unavailable(collaborator: &'static str, source: StoreError) -> AccessError {
    error!(collaborator, error = %source, "Collaborator lookup failed");
    AccessError::unavailable(collaborator, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roomkey_types::{LocationType, RoomTier};

    fn summary() -> Subject {
        Subject::new("user-staff-001", "Charlie Staff", Role::Staff)
    }

    #[test]
    fn test_denial_kind() {
        assert_eq!(
            AccessDecision::subject_not_found().denial_kind(),
            Some(DenialKind::SubjectNotFound)
        );
        assert_eq!(
            AccessDecision::location_not_found(&summary()).denial_kind(),
            Some(DenialKind::LocationNotFound)
        );
    }

    #[test]
    fn test_policy_denial_has_no_denial_kind() {
        // A table whose default reason collides with a lookup constant.
        let room = Location::guest_room("room-101", "Room 101", RoomTier::Standard);
        let context = build_context(Role::Staff, &room, None);
        let decision = Decision {
            access_granted: false,
            reason: SUBJECT_NOT_FOUND.to_string(),
            matched_rule: None,
            context,
        };
        let access = AccessDecision::evaluated(decision, &summary(), room);
        assert_eq!(access.denial_kind(), None);
    }

    #[test]
    fn test_wire_format() {
        let lobby = Location::area("lobby", "Main Lobby", LocationType::CommonArea);
        let context = build_context(Role::Staff, &lobby, None);
        let decision = Decision {
            access_granted: true,
            reason: "staff may enter operational areas".to_string(),
            matched_rule: Some("staff-operational-areas".to_string()),
            context,
        };
        let json = serde_json::to_value(AccessDecision::evaluated(decision, &summary(), lobby)).unwrap();

        assert_eq!(json["accessGranted"], true);
        assert_eq!(json["matchedRule"], "staff-operational-areas");
        assert_eq!(json["context"]["locationType"], "common-area");
        assert_eq!(json["location"]["type"], "common-area");
        assert_eq!(json["subject"]["role"], "staff");

        let json = serde_json::to_value(AccessDecision::subject_not_found()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "accessGranted": false, "reason": "subject not found" })
        );
    }
}
