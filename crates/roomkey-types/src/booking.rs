//! Room bookings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{BookingId, LocationId, RoomTier, SubjectId, TypesError};

/// Links a subject to one guest room for a date range.
///
/// `room_tier` is denormalized from the room so context construction does
/// not need a second location lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: BookingId,
    #[serde(alias = "userId")]
    pub subject_id: SubjectId,
    pub room_id: LocationId,
    #[serde(alias = "roomType")]
    pub room_tier: RoomTier,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl Booking {
    /// Returns whether the stay covers `date`.
    ///
    /// Check-in day is inclusive, check-out day is exclusive.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Checks that the stay is at least one night long.
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.check_out > self.check_in {
            Ok(())
        } else {
            Err(TypesError::InvalidStay(self.id.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn booking(check_in: NaiveDate, check_out: NaiveDate) -> Booking {
        Booking {
            id: BookingId::from("booking-001"),
            subject_id: SubjectId::from("user-customer-deluxe-001"),
            room_id: LocationId::from("room-201"),
            room_tier: RoomTier::Premium,
            check_in,
            check_out,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_active_window_is_half_open() {
        let b = booking(date(2025, 12, 1), date(2025, 12, 10));
        assert!(!b.is_active_on(date(2025, 11, 30)));
        assert!(b.is_active_on(date(2025, 12, 1)));
        assert!(b.is_active_on(date(2025, 12, 9)));
        assert!(!b.is_active_on(date(2025, 12, 10)));
    }

    #[test]
    fn test_validate_rejects_empty_stay() {
        assert!(booking(date(2025, 12, 1), date(2025, 12, 2)).validate().is_ok());
        assert_eq!(
            booking(date(2025, 12, 1), date(2025, 12, 1)).validate(),
            Err(TypesError::InvalidStay(BookingId::from("booking-001")))
        );
    }

    #[test]
    fn test_legacy_field_names() {
        let json = r#"{
            "id": "booking-002",
            "userId": "user-customer-standard-001",
            "roomId": "room-101",
            "roomType": "standard",
            "checkIn": "2025-12-01",
            "checkOut": "2025-12-08"
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.subject_id, SubjectId::from("user-customer-standard-001"));
        assert_eq!(b.room_tier, RoomTier::Standard);
        assert_eq!(b.check_out, date(2025, 12, 8));
    }
}
