//! In-memory collaborators and fixture loading.
//!
//! Backs the demo, the CLI and the integration tests with the sample hotel.
//! Lookups never fail, so these stores only ever return `Ok`.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use roomkey_types::{
    Booking, Location, LocationId, LocationType, Role, RoomTier, Subject, SubjectId,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{FixtureError, StoreError};
use crate::store::{BookingStore, IdentityStore, LocationStore};

// ============================================================================
// Stores
// ============================================================================

/// Subjects keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityStore {
    subjects: HashMap<SubjectId, Subject>,
}

impl InMemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a subject.
    pub fn insert(&mut self, subject: Subject) {
        self.subjects.insert(subject.id.clone(), subject);
    }

    /// Looks a subject up by email, ignoring ASCII case.
    pub fn find_by_email(&self, email: &str) -> Option<&Subject> {
        self.subjects.values().find(|subject| {
            subject
                .email
                .as_deref()
                .is_some_and(|known| known.eq_ignore_ascii_case(email))
        })
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }
}

impl FromIterator<Subject> for InMemoryIdentityStore {
    fn from_iter<T: IntoIterator<Item = Subject>>(iter: T) -> Self {
        let mut store = Self::new();
        for subject in iter {
            store.insert(subject);
        }
        store
    }
}

impl IdentityStore for InMemoryIdentityStore {
    fn find_by_id(&self, id: &SubjectId) -> Result<Option<Subject>, StoreError> {
        Ok(self.subjects.get(id).cloned())
    }
}

/// Locations keyed by id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLocationStore {
    locations: HashMap<LocationId, Location>,
}

impl InMemoryLocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a location.
    pub fn insert(&mut self, location: Location) {
        self.locations.insert(location.id.clone(), location);
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }
}

impl FromIterator<Location> for InMemoryLocationStore {
    fn from_iter<T: IntoIterator<Item = Location>>(iter: T) -> Self {
        let mut store = Self::new();
        for location in iter {
            store.insert(location);
        }
        store
    }
}

impl LocationStore for InMemoryLocationStore {
    fn find_by_id(&self, id: &LocationId) -> Result<Option<Location>, StoreError> {
        Ok(self.locations.get(id).cloned())
    }
}

/// Bookings in insertion order.
///
/// With a reference date only stays covering that date count as active.
/// Without one every stored booking does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBookingStore {
    bookings: Vec<Booking>,
    reference_date: Option<NaiveDate>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins "active" to stays covering `date`.
    #[must_use]
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = Some(date);
        self
    }

    pub fn reference_date(&self) -> Option<NaiveDate> {
        self.reference_date
    }

    pub fn insert(&mut self, booking: Booking) {
        self.bookings.push(booking);
    }

    pub fn len(&self) -> usize {
        self.bookings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

impl FromIterator<Booking> for InMemoryBookingStore {
    fn from_iter<T: IntoIterator<Item = Booking>>(iter: T) -> Self {
        Self {
            bookings: iter.into_iter().collect(),
            reference_date: None,
        }
    }
}

impl BookingStore for InMemoryBookingStore {
    fn find_active_for_subject(&self, subject: &SubjectId) -> Result<Vec<Booking>, StoreError> {
        Ok(self
            .bookings
            .iter()
            .filter(|booking| &booking.subject_id == subject)
            .filter(|booking| {
                self.reference_date
                    .is_none_or(|date| booking.is_active_on(date))
            })
            .cloned()
            .collect())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

/// A hotel's worth of subjects, locations and bookings.
///
/// The JSON form uses the keys `users`, `locations` and `bookings`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub users: Vec<Subject>,
    #[serde(default)]
    pub locations: Vec<Location>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Fixtures {
    /// Parses and validates fixtures from JSON.
    pub fn from_json_str(source: &str) -> Result<Self, FixtureError> {
        let fixtures: Self = serde_json::from_str(source)?;
        fixtures.validate()?;
        debug!(
            users = fixtures.users.len(),
            locations = fixtures.locations.len(),
            bookings = fixtures.bookings.len(),
            "Fixtures loaded"
        );
        Ok(fixtures)
    }

    /// Checks that the data set is self-consistent.
    ///
    /// Every location and booking must satisfy its own invariants, ids must
    /// be unique, and every booking must point at a known subject and a
    /// known guest room of the same tier.
    pub fn validate(&self) -> Result<(), FixtureError> {
        let mut subjects = HashSet::with_capacity(self.users.len());
        for subject in &self.users {
            if !subjects.insert(&subject.id) {
                return Err(duplicate("subject", subject.id.as_str()));
            }
        }

        let mut locations = HashMap::with_capacity(self.locations.len());
        for location in &self.locations {
            location.validate()?;
            if locations.insert(&location.id, location).is_some() {
                return Err(duplicate("location", location.id.as_str()));
            }
        }

        let mut bookings = HashSet::with_capacity(self.bookings.len());
        for booking in &self.bookings {
            booking.validate()?;
            if !bookings.insert(&booking.id) {
                return Err(duplicate("booking", booking.id.as_str()));
            }
            if !subjects.contains(&booking.subject_id) {
                return Err(FixtureError::UnknownSubject {
                    booking: booking.id.clone(),
                    subject: booking.subject_id.clone(),
                });
            }
            let Some(room) = locations.get(&booking.room_id) else {
                return Err(FixtureError::UnknownRoom {
                    booking: booking.id.clone(),
                    room: booking.room_id.clone(),
                });
            };
            if room.location_type != LocationType::GuestRoom {
                return Err(FixtureError::NotAGuestRoom {
                    booking: booking.id.clone(),
                    room: booking.room_id.clone(),
                });
            }
            if room.room_tier != Some(booking.room_tier) {
                return Err(FixtureError::TierMismatch {
                    booking: booking.id.clone(),
                    room: booking.room_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// The sample hotel: five staff and guest accounts, four guest rooms,
    /// five shared areas and two December 2025 stays.
    pub fn sample() -> Self {
        Self {
            users: vec![
                Subject::new("user-admin-001", "Alice Admin", Role::Administrator)
                    .with_email("alice@hotel.com"),
                Subject::new("user-manager-001", "Bob Manager", Role::Manager)
                    .with_email("bob@hotel.com"),
                Subject::new("user-staff-001", "Charlie Staff", Role::Staff)
                    .with_email("charlie@hotel.com"),
                Subject::new("user-customer-deluxe-001", "David Customer", Role::PremiumGuest)
                    .with_email("david@example.com"),
                Subject::new(
                    "user-customer-standard-001",
                    "Emma Customer",
                    Role::StandardGuest,
                )
                .with_email("emma@example.com"),
            ],
            locations: vec![
                Location::guest_room("room-101", "Room 101", RoomTier::Standard),
                Location::guest_room("room-102", "Room 102", RoomTier::Standard),
                Location::guest_room("room-201", "Room 201", RoomTier::Premium),
                Location::guest_room("room-202", "Room 202", RoomTier::Premium),
                Location::area("sauna-1", "Sauna", LocationType::WellnessArea),
                Location::area("lobby", "Lobby", LocationType::CommonArea),
                Location::area("gym", "Gym", LocationType::CommonArea),
                Location::area("staff-room", "Staff Room", LocationType::StaffArea),
                Location::area("office", "Office", LocationType::AdminArea),
            ],
            bookings: vec![
                Booking {
                    id: "booking-001".into(),
                    subject_id: "user-customer-deluxe-001".into(),
                    room_id: "room-201".into(),
                    room_tier: RoomTier::Premium,
                    check_in: december(1),
                    check_out: december(10),
                },
                Booking {
                    id: "booking-002".into(),
                    subject_id: "user-customer-standard-001".into(),
                    room_id: "room-101".into(),
                    room_tier: RoomTier::Standard,
                    check_in: december(1),
                    check_out: december(8),
                },
            ],
        }
    }

    /// Splits the fixtures into the three collaborator stores.
    pub fn into_stores(
        self,
        reference_date: Option<NaiveDate>,
    ) -> (
        InMemoryIdentityStore,
        InMemoryLocationStore,
        InMemoryBookingStore,
    ) {
        let mut bookings: InMemoryBookingStore = self.bookings.into_iter().collect();
        bookings.reference_date = reference_date;
        (
            self.users.into_iter().collect(),
            self.locations.into_iter().collect(),
            bookings,
        )
    }
}

fn duplicate(kind: &'static str, id: &str) -> FixtureError {
    FixtureError::Duplicate {
        kind,
        id: id.to_string(),
    }
}

fn december(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 12, day).unwrap_or_default()
}
