//! Evaluation context construction.
//!
//! Flattens the domain facts of one access request (who, where, which
//! booking) into the only input the evaluator ever sees.

use roomkey_types::{Booking, Location, LocationType, Role, RoomTier};
use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, Result};

/// The flattened decision input.
///
/// Built fresh per request and never mutated afterwards. The evaluator has
/// no knowledge of subjects, locations or bookings beyond these fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EvaluationContext {
    pub role: Role,
    /// Always `role.rank()`; carried so rank matchers read a plain field.
    pub rank: u8,
    pub location_type: LocationType,
    pub is_booked_room: bool,
    /// The booked tier, set only when `is_booked_room` is true.
    pub room_tier: Option<RoomTier>,
}

impl EvaluationContext {
    /// Parses a context from JSON, reporting every failure as
    /// [`PolicyError::InvalidContext`].
    pub fn from_json(source: &str) -> Result<Self> {
        let context: Self = serde_json::from_str(source)
            .map_err(|e| PolicyError::InvalidContext(e.to_string()))?;
        context.validate()?;
        Ok(context)
    }

    /// Checks the internal consistency of the context.
    pub fn validate(&self) -> Result<()> {
        if self.rank != self.role.rank() {
            return Err(PolicyError::InvalidContext(format!(
                "rank {} does not belong to role {}",
                self.rank, self.role
            )));
        }
        match (self.is_booked_room, self.room_tier) {
            (true, None) => Err(PolicyError::InvalidContext(
                "booked room without a room tier".to_string(),
            )),
            (false, Some(tier)) => Err(PolicyError::InvalidContext(format!(
                "room tier {tier} set without a booked room"
            ))),
            _ => Ok(()),
        }
    }
}

/// Builds the evaluation context for one request.
///
/// `is_booked_room` is true iff `active_booking` is present and its room id
/// equals `location.id`. The room tier comes from the booking, never from
/// the probed location: a guest with no booking for this room gets no tier
/// even when the location is itself a guest room.
pub fn build(role: Role, location: &Location, active_booking: Option<&Booking>) -> EvaluationContext {
    let booked = active_booking.filter(|booking| booking.room_id == location.id);

    EvaluationContext {
        role,
        rank: role.rank(),
        location_type: location.location_type,
        is_booked_room: booked.is_some(),
        room_tier: booked.map(|booking| booking.room_tier),
    }
}

/// Picks the canonical booking when a store reports several active ones.
///
/// The latest check-in wins; equal check-ins fall back to the greatest
/// booking id so the choice never depends on store iteration order.
pub fn select_active_booking(bookings: &[Booking]) -> Option<&Booking> {
    bookings
        .iter()
        .max_by(|a, b| a.check_in.cmp(&b.check_in).then_with(|| a.id.cmp(&b.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use roomkey_types::{BookingId, LocationId, SubjectId};

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, day).unwrap()
    }

    fn booking(id: &str, room: &str, tier: RoomTier, check_in: u32) -> Booking {
        Booking {
            id: BookingId::from(id),
            subject_id: SubjectId::from("user-customer-standard-001"),
            room_id: LocationId::from(room),
            room_tier: tier,
            check_in: date(check_in),
            check_out: date(check_in + 5),
        }
    }

    #[test]
    fn test_booked_room_carries_booking_tier() {
        let room = Location::guest_room("room-101", "Room 101", RoomTier::Standard);
        let b = booking("booking-002", "room-101", RoomTier::Standard, 1);

        let ctx = build(Role::StandardGuest, &room, Some(&b));
        assert!(ctx.is_booked_room);
        assert_eq!(ctx.room_tier, Some(RoomTier::Standard));
        assert_eq!(ctx.rank, 1);
        assert_eq!(ctx.location_type, LocationType::GuestRoom);
        assert!(ctx.validate().is_ok());
    }

    #[test]
    fn test_other_room_has_no_tier() {
        // Room 102 is itself a standard guest room, but not the booked one.
        let room = Location::guest_room("room-102", "Room 102", RoomTier::Standard);
        let b = booking("booking-002", "room-101", RoomTier::Standard, 1);

        let ctx = build(Role::StandardGuest, &room, Some(&b));
        assert!(!ctx.is_booked_room);
        assert_eq!(ctx.room_tier, None);
    }

    #[test]
    fn test_no_booking_is_not_an_error() {
        let office = Location::area("office", "Office", LocationType::AdminArea);
        let ctx = build(Role::Administrator, &office, None);
        assert!(!ctx.is_booked_room);
        assert_eq!(ctx.room_tier, None);
        assert_eq!(ctx.rank, 5);
    }

    #[test]
    fn test_match_uses_identity_not_name() {
        let mut room = Location::guest_room("room-201", "Room 101", RoomTier::Premium);
        room.code = Some("room-101".to_string());
        let b = booking("booking-002", "room-101", RoomTier::Standard, 1);

        assert!(!build(Role::StandardGuest, &room, Some(&b)).is_booked_room);
    }

    #[test]
    fn test_booking_tier_change_does_not_flip_match() {
        let room = Location::guest_room("room-101", "Room 101", RoomTier::Standard);
        let standard = booking("booking-002", "room-101", RoomTier::Standard, 1);
        let mut premium = standard.clone();
        premium.room_tier = RoomTier::Premium;

        let a = build(Role::PremiumGuest, &room, Some(&standard));
        let b = build(Role::PremiumGuest, &room, Some(&premium));
        assert_eq!(a.is_booked_room, b.is_booked_room);
        assert_eq!(b.room_tier, Some(RoomTier::Premium));
    }

    #[test]
    fn test_select_latest_check_in() {
        let bookings = vec![
            booking("booking-a", "room-101", RoomTier::Standard, 1),
            booking("booking-b", "room-102", RoomTier::Standard, 4),
            booking("booking-c", "room-201", RoomTier::Premium, 2),
        ];
        assert_eq!(
            select_active_booking(&bookings).map(|b| b.id.as_str()),
            Some("booking-b")
        );
    }

    #[test]
    fn test_select_breaks_ties_by_id() {
        let forward = vec![
            booking("booking-a", "room-101", RoomTier::Standard, 3),
            booking("booking-z", "room-102", RoomTier::Standard, 3),
        ];
        let mut reversed = forward.clone();
        reversed.reverse();

        assert_eq!(
            select_active_booking(&forward).map(|b| b.id.as_str()),
            Some("booking-z")
        );
        assert_eq!(
            select_active_booking(&forward),
            select_active_booking(&reversed)
        );
        assert!(select_active_booking(&[]).is_none());
    }

    #[test]
    fn test_validate_rejects_inconsistent_contexts() {
        let ctx = EvaluationContext {
            role: Role::Staff,
            rank: 5,
            location_type: LocationType::StaffArea,
            is_booked_room: false,
            room_tier: None,
        };
        assert!(matches!(ctx.validate(), Err(PolicyError::InvalidContext(_))));

        let ctx = EvaluationContext {
            role: Role::Staff,
            rank: 3,
            location_type: LocationType::GuestRoom,
            is_booked_room: false,
            room_tier: Some(RoomTier::Standard),
        };
        assert!(matches!(ctx.validate(), Err(PolicyError::InvalidContext(_))));

        let ctx = EvaluationContext {
            role: Role::Staff,
            rank: 3,
            location_type: LocationType::GuestRoom,
            is_booked_room: true,
            room_tier: None,
        };
        assert!(matches!(ctx.validate(), Err(PolicyError::InvalidContext(_))));
    }

    #[test]
    fn test_from_json_rejects_unknown_values() {
        let ok = r#"{"role":"staff","rank":3,"locationType":"staff-area","isBookedRoom":false,"roomTier":null}"#;
        assert_eq!(EvaluationContext::from_json(ok).unwrap().role, Role::Staff);

        let bad = r#"{"role":"janitor","rank":3,"locationType":"staff-area","isBookedRoom":false,"roomTier":null}"#;
        assert!(matches!(
            EvaluationContext::from_json(bad),
            Err(PolicyError::InvalidContext(_))
        ));
    }
}
