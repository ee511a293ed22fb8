//! End-to-end access checks against the sample hotel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use roomkey_access::{
    AccessControl, AccessError, BookingStore, DenialKind, Fixtures, IdentityStore,
    InMemoryBookingStore, InMemoryIdentityStore, InMemoryLocationStore, LocationStore,
    PolicyEngine, StoreError,
};
use roomkey_policy::{Outcome, Predicate, Rule, RuleTable};
use roomkey_types::{Booking, LocationId, LocationType, Role, RoomTier, SubjectId};

type SampleHotel = AccessControl<InMemoryIdentityStore, InMemoryLocationStore, InMemoryBookingStore>;

fn hotel() -> SampleHotel {
    let (identities, locations, bookings) = Fixtures::sample().into_stores(None);
    AccessControl::new(identities, locations, bookings, Arc::new(PolicyEngine::standard()))
}

fn check(hotel: &SampleHotel, subject: &str, location: &str) -> roomkey_access::AccessDecision {
    hotel
        .check_access(&SubjectId::from(subject), &LocationId::from(location))
        .unwrap()
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn scenario_a_administrator_enters_admin_area() {
    let decision = check(&hotel(), "user-admin-001", "office");
    assert!(decision.access_granted);
    assert_eq!(decision.matched_rule.as_deref(), Some("admin-full-access"));
    assert_eq!(decision.context.unwrap().location_type, LocationType::AdminArea);
}

#[test]
fn scenario_b_guest_opens_booked_room() {
    let decision = check(&hotel(), "user-customer-standard-001", "room-101");
    assert!(decision.access_granted);

    let context = decision.context.unwrap();
    assert!(context.is_booked_room);
    assert_eq!(context.room_tier, Some(RoomTier::Standard));
}

#[test]
fn scenario_c_guest_denied_foreign_room() {
    let decision = check(&hotel(), "user-customer-standard-001", "room-102");
    assert!(!decision.access_granted);
    assert_eq!(decision.denial_kind(), None);

    let context = decision.context.unwrap();
    assert!(!context.is_booked_room);
    assert_eq!(context.room_tier, None);
}

#[test]
fn scenario_d_wellness_is_a_premium_perk() {
    let hotel = hotel();
    assert!(check(&hotel, "user-customer-deluxe-001", "sauna-1").access_granted);
    assert!(!check(&hotel, "user-customer-standard-001", "sauna-1").access_granted);
}

#[test]
fn scenario_e_unknown_subject_skips_evaluation() {
    let hotel = hotel();
    let decision = check(&hotel, "user-ghost", "room-101");

    assert!(!decision.access_granted);
    assert_eq!(decision.reason, "subject not found");
    assert_eq!(decision.denial_kind(), Some(DenialKind::SubjectNotFound));
    assert!(decision.context.is_none());
    assert_eq!(hotel.engine().evaluations(), 0);
}

#[test]
fn unknown_location_skips_evaluation() {
    let hotel = hotel();
    let decision = check(&hotel, "user-staff-001", "room-999");

    assert_eq!(decision.denial_kind(), Some(DenialKind::LocationNotFound));
    assert_eq!(decision.subject.unwrap().role, Role::Staff);
    assert_eq!(hotel.engine().evaluations(), 0);
}

#[test]
fn sample_hotel_matrix() {
    let hotel = hotel();
    let expectations = [
        ("user-admin-001", "room-202", true),
        ("user-manager-001", "room-102", true),
        ("user-manager-001", "sauna-1", true),
        ("user-manager-001", "lobby", true),
        ("user-manager-001", "office", false),
        ("user-staff-001", "staff-room", true),
        ("user-staff-001", "gym", true),
        ("user-staff-001", "room-101", false),
        ("user-staff-001", "office", false),
        ("user-customer-deluxe-001", "room-201", true),
        ("user-customer-deluxe-001", "room-202", false),
        ("user-customer-deluxe-001", "lobby", false),
        ("user-customer-standard-001", "staff-room", false),
    ];

    for (subject, location, granted) in expectations {
        let decision = check(&hotel, subject, location);
        assert_eq!(
            decision.access_granted, granted,
            "{subject} -> {location}: {}",
            decision.reason
        );
    }
    assert_eq!(hotel.engine().evaluations(), expectations.len() as u64);
}

#[test]
fn expired_booking_no_longer_opens_room() {
    let (identities, locations, bookings) = Fixtures::sample().into_stores(None);
    let bookings = bookings.with_reference_date(chrono::NaiveDate::from_ymd_opt(2025, 12, 9).unwrap());
    let hotel = AccessControl::new(identities, locations, bookings, Arc::new(PolicyEngine::standard()));

    // Emma checked out on the 8th, David stays until the 10th.
    assert!(!check(&hotel, "user-customer-standard-001", "room-101").access_granted);
    assert!(check(&hotel, "user-customer-deluxe-001", "room-201").access_granted);
}

#[test]
fn latest_of_several_active_bookings_wins() {
    let (identities, locations, mut bookings) = Fixtures::sample().into_stores(None);
    bookings.insert(Booking {
        id: "booking-003".into(),
        subject_id: "user-customer-standard-001".into(),
        room_id: "room-102".into(),
        room_tier: RoomTier::Standard,
        check_in: chrono::NaiveDate::from_ymd_opt(2025, 12, 5).unwrap(),
        check_out: chrono::NaiveDate::from_ymd_opt(2025, 12, 8).unwrap(),
    });
    let hotel = AccessControl::new(identities, locations, bookings, Arc::new(PolicyEngine::standard()));

    assert!(check(&hotel, "user-customer-standard-001", "room-102").access_granted);
    assert!(!check(&hotel, "user-customer-standard-001", "room-101").access_granted);
}

// ============================================================================
// Collaborator failures
// ============================================================================

struct Offline;

impl IdentityStore for Offline {
    fn find_by_id(
        &self,
        _id: &SubjectId,
    ) -> Result<Option<roomkey_types::Subject>, StoreError> {
        Err(StoreError::Unavailable("identity service timed out".to_string()))
    }
}

impl LocationStore for Offline {
    fn find_by_id(
        &self,
        _id: &LocationId,
    ) -> Result<Option<roomkey_types::Location>, StoreError> {
        Err(StoreError::Unavailable("location service timed out".to_string()))
    }
}

impl BookingStore for Offline {
    fn find_active_for_subject(&self, _subject: &SubjectId) -> Result<Vec<Booking>, StoreError> {
        Err(StoreError::Unavailable("booking service timed out".to_string()))
    }
}

#[test]
fn unavailable_identity_store_is_not_a_denial() {
    let (_, locations, bookings) = Fixtures::sample().into_stores(None);
    let engine = Arc::new(PolicyEngine::standard());
    let access = AccessControl::new(Offline, locations, bookings, Arc::clone(&engine));

    let err = access
        .check_access(&"user-admin-001".into(), &"office".into())
        .unwrap_err();
    assert!(matches!(
        err,
        AccessError::CollaboratorUnavailable {
            collaborator: "identity store",
            ..
        }
    ));
    assert_eq!(engine.evaluations(), 0);
}

#[test]
fn unavailable_booking_store_is_not_a_denial() {
    let (identities, locations, _) = Fixtures::sample().into_stores(None);
    let access = AccessControl::new(
        identities,
        locations,
        Offline,
        Arc::new(PolicyEngine::standard()),
    );

    let err = access
        .check_access(&"user-customer-standard-001".into(), &"room-101".into())
        .unwrap_err();
    assert!(err.to_string().contains("booking store unavailable"));
}

#[test]
fn unavailable_location_store_is_not_a_denial() {
    let (identities, _, bookings) = Fixtures::sample().into_stores(None);
    let access = AccessControl::new(
        identities,
        Offline,
        bookings,
        Arc::new(PolicyEngine::standard()),
    );

    assert!(matches!(
        access.check_access(&"user-staff-001".into(), &"lobby".into()),
        Err(AccessError::CollaboratorUnavailable { .. })
    ));
}

// ============================================================================
// Hot reload
// ============================================================================

fn lobby_open_to_all() -> RuleTable {
    RuleTable::builder(Outcome::deny("closed for renovation"))
        .version("renovation")
        .rule(Rule::new(
            "lobby-only",
            Predicate::any().location_types([LocationType::CommonArea]),
            Outcome::grant("lobby is open"),
        ))
        .build()
        .unwrap()
}

#[test]
fn reload_applies_to_later_checks() {
    let hotel = hotel();
    assert!(!check(&hotel, "user-customer-standard-001", "lobby").access_granted);

    hotel.engine().reload(lobby_open_to_all()).unwrap();
    assert!(check(&hotel, "user-customer-standard-001", "lobby").access_granted);
    assert!(!check(&hotel, "user-admin-001", "office").access_granted);
}

#[test]
fn concurrent_reload_never_mixes_tables() {
    const READERS: usize = 4;
    const ROUNDS: usize = 200;

    let hotel = Arc::new(hotel());
    let barrier = Arc::new(Barrier::new(READERS + 1));
    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..READERS)
        .map(|_| {
            let hotel = Arc::clone(&hotel);
            let barrier = Arc::clone(&barrier);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                barrier.wait();
                let mut checks = 0;
                while !done.load(Ordering::Acquire) || checks < ROUNDS {
                    let decision = check(&hotel, "user-admin-001", "office");
                    // Each decision comes from exactly one of the two tables.
                    match decision.matched_rule.as_deref() {
                        Some("admin-full-access") => assert!(decision.access_granted),
                        None => {
                            assert!(!decision.access_granted);
                            assert_eq!(decision.reason, "closed for renovation");
                        }
                        other => panic!("unexpected rule {other:?}"),
                    }
                    checks += 1;
                }
                checks
            })
        })
        .collect();

    barrier.wait();
    for round in 0..ROUNDS {
        let table = if round % 2 == 0 {
            lobby_open_to_all()
        } else {
            RuleTable::standard()
        };
        hotel.engine().reload(table).unwrap();
    }
    done.store(true, Ordering::Release);

    let total: usize = readers.into_iter().map(|r| r.join().unwrap()).sum();
    assert!(total >= READERS * ROUNDS);
    assert_eq!(hotel.engine().evaluations(), total as u64);
}
