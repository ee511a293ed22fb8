//! CLI command implementations.

pub mod check;
pub mod config;
pub mod demo;
pub mod rules;
pub mod validate;

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use roomkey_access::{
    AccessControl, Fixtures, InMemoryBookingStore, InMemoryIdentityStore, InMemoryLocationStore,
    PolicyEngine,
};
use roomkey_config::RoomkeyConfig;
use roomkey_policy::RuleTable;

/// The facade over the fixture-backed stores.
pub type Hotel = AccessControl<InMemoryIdentityStore, InMemoryLocationStore, InMemoryBookingStore>;

/// Reads and validates a rule table file.
pub fn load_rules(path: &Path) -> Result<RuleTable> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read rule table at {}", path.display()))?;
    RuleTable::load(&source)
        .with_context(|| format!("Rule table at {} is invalid", path.display()))
}

/// Reads and validates the fixture file.
pub fn load_fixtures(path: &Path) -> Result<Fixtures> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("Failed to read fixtures at {}", path.display()))?;
    Fixtures::from_json_str(&source)
        .with_context(|| format!("Fixtures at {} are invalid", path.display()))
}

/// Wires the configured rule table and fixtures into a facade.
pub fn open_hotel(config: &RoomkeyConfig) -> Result<Hotel> {
    let table = load_rules(&config.policy.rules_path)?;
    let fixtures = load_fixtures(&config.data.fixtures_path)?;
    let (identities, locations, bookings) = fixtures.into_stores(config.data.reference_date);

    Ok(AccessControl::new(
        identities,
        locations,
        bookings,
        Arc::new(PolicyEngine::new(table)),
    ))
}
