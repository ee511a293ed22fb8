//! Demo command: walk the sample hotel through the standard scenarios.

use anyhow::{Context, Result};
use roomkey_access::Fixtures;
use roomkey_config::RoomkeyConfig;
use roomkey_types::{LocationId, SubjectId};

use crate::style::{self, banner, colors::SemanticStyle};

/// One demo request: who, where, and how to describe it.
struct Probe {
    subject: &'static str,
    location: &'static str,
    title: &'static str,
}

const fn probe(subject: &'static str, location: &'static str, title: &'static str) -> Probe {
    Probe {
        subject,
        location,
        title,
    }
}

const ADMIN: &str = "user-admin-001";
const MANAGER: &str = "user-manager-001";
const STAFF: &str = "user-staff-001";
const PREMIUM: &str = "user-customer-deluxe-001";
const STANDARD: &str = "user-customer-standard-001";

const TEST_SETS: &[(&str, &[Probe])] = &[
    (
        "Administrator access",
        &[
            probe(ADMIN, "office", "Administrator opening the Office (admin area)"),
            probe(ADMIN, "room-101", "Administrator opening Room 101"),
        ],
    ),
    (
        "Manager access",
        &[
            probe(MANAGER, "staff-room", "Manager opening the Staff Room"),
            probe(MANAGER, "office", "Manager opening the Office (admin area)"),
            probe(MANAGER, "sauna-1", "Manager opening the Sauna"),
        ],
    ),
    (
        "Staff access",
        &[
            probe(STAFF, "staff-room", "Staff opening the Staff Room"),
            probe(STAFF, "lobby", "Staff opening the Lobby (common area)"),
            probe(STAFF, "room-101", "Staff opening Room 101"),
        ],
    ),
    (
        "Premium guest access",
        &[
            probe(PREMIUM, "room-201", "Premium guest opening their booked room (201)"),
            probe(PREMIUM, "room-101", "Premium guest opening another room (101)"),
            probe(PREMIUM, "sauna-1", "Premium guest opening the Sauna"),
            probe(PREMIUM, "lobby", "Premium guest opening the Lobby"),
            probe(PREMIUM, "staff-room", "Premium guest opening the Staff Room"),
        ],
    ),
    (
        "Standard guest access",
        &[
            probe(STANDARD, "room-101", "Standard guest opening their booked room (101)"),
            probe(STANDARD, "sauna-1", "Standard guest opening the Sauna"),
            probe(STANDARD, "lobby", "Standard guest opening the Lobby"),
        ],
    ),
];

pub fn run(config: &RoomkeyConfig) -> Result<()> {
    banner::print_banner();

    let fixtures = super::load_fixtures(&config.data.fixtures_path)?;
    print_inventory(&fixtures);

    let hotel = super::open_hotel(config)?;
    let mut granted = 0;
    let mut total = 0;

    for (title, probes) in TEST_SETS {
        banner::print_section(title);
        for probe in *probes {
            let decision = hotel
                .check_access(
                    &SubjectId::from(probe.subject),
                    &LocationId::from(probe.location),
                )
                .with_context(|| format!("{} failed", probe.title))?;
            println!();
            super::check::print_decision(probe.title, &decision);

            total += 1;
            if decision.access_granted {
                granted += 1;
            }
        }
    }

    println!();
    style::print_success(&format!(
        "Demo completed: {granted} of {total} requests granted"
    ));
    Ok(())
}

fn print_inventory(fixtures: &Fixtures) {
    println!("{} {}", "Users:".header(), fixtures.users.len());
    for user in &fixtures.users {
        println!("  - {} ({})", user.name, user.role.to_string().muted());
    }

    println!("{} {}", "Locations:".header(), fixtures.locations.len());
    for location in &fixtures.locations {
        println!(
            "  - {} ({})",
            location.name,
            location.location_type.to_string().muted()
        );
    }

    println!("{} {}", "Bookings:".header(), fixtures.bookings.len());
    for booking in &fixtures.bookings {
        let guest = fixtures
            .users
            .iter()
            .find(|user| user.id == booking.subject_id)
            .map_or(booking.subject_id.as_str(), |user| user.name.as_str());
        println!(
            "  - {guest}: {} ({}, {} to {})",
            booking.room_id.code(),
            booking.room_tier,
            booking.check_in,
            booking.check_out
        );
    }
}
