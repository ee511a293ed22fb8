//! Role definitions.
//!
//! Five roles with escalating privileges, each pinned to a hierarchy rank:
//! - StandardGuest (1): own booked room
//! - PremiumGuest (2): own booked room plus wellness perks
//! - Staff (3): staff and common areas
//! - Manager (4): additionally guest rooms and wellness areas
//! - Administrator (5): everything

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::TypesError;

/// Role of a subject in the access control system.
///
/// Roles are ordered from least to most privileged, so the derived `Ord`
/// agrees with [`Role::rank`]:
/// StandardGuest < PremiumGuest < Staff < Manager < Administrator
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    /// Guest holding a standard-tier booking.
    #[serde(alias = "customer_standard")]
    StandardGuest,

    /// Guest holding a premium-tier booking.
    ///
    /// Premium guests get the wellness-area perk on top of their own room.
    #[serde(alias = "customer_deluxe")]
    PremiumGuest,

    /// Hotel staff.
    Staff,

    /// Floor or property manager.
    Manager,

    /// Administrator with unrestricted access.
    #[serde(alias = "admin")]
    Administrator,
}

impl Role {
    /// Every role, least privileged first.
    pub const ALL: [Role; 5] = [
        Role::StandardGuest,
        Role::PremiumGuest,
        Role::Staff,
        Role::Manager,
        Role::Administrator,
    ];

    /// Lowest rank in the hierarchy.
    pub const MIN_RANK: u8 = 1;

    /// Highest rank in the hierarchy.
    pub const MAX_RANK: u8 = 5;

    /// Returns the hierarchy rank (higher = more privileged).
    ///
    /// Ranks are fixed at definition time and never change at runtime.
    pub fn rank(self) -> u8 {
        match self {
            Role::StandardGuest => 1,
            Role::PremiumGuest => 2,
            Role::Staff => 3,
            Role::Manager => 4,
            Role::Administrator => 5,
        }
    }

    /// Returns the role holding `rank`.
    pub fn from_rank(rank: u8) -> Result<Self, TypesError> {
        Role::ALL
            .into_iter()
            .find(|role| role.rank() == rank)
            .ok_or(TypesError::UnknownRank(rank))
    }

    /// Returns whether this role is a hotel guest rather than an employee.
    pub fn is_guest(self) -> bool {
        matches!(self, Role::StandardGuest | Role::PremiumGuest)
    }

    /// Returns the canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::StandardGuest => "standard-guest",
            Role::PremiumGuest => "premium-guest",
            Role::Staff => "staff",
            Role::Manager => "manager",
            Role::Administrator => "administrator",
        }
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard-guest" | "customer_standard" => Ok(Role::StandardGuest),
            "premium-guest" | "customer_deluxe" => Ok(Role::PremiumGuest),
            "staff" => Ok(Role::Staff),
            "manager" => Ok(Role::Manager),
            "administrator" | "admin" => Ok(Role::Administrator),
            other => Err(TypesError::UnknownValue {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_ordering_matches_rank() {
        for pair in Role::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
            assert!(pair[0].rank() < pair[1].rank());
        }
        assert_eq!(Role::StandardGuest.rank(), Role::MIN_RANK);
        assert_eq!(Role::Administrator.rank(), Role::MAX_RANK);
    }

    #[test]
    fn test_every_rank_has_exactly_one_role() {
        for rank in Role::MIN_RANK..=Role::MAX_RANK {
            let role = Role::from_rank(rank).unwrap();
            assert_eq!(role.rank(), rank);
            assert_eq!(Role::ALL.iter().filter(|r| r.rank() == rank).count(), 1);
        }
        assert_eq!(Role::from_rank(0), Err(TypesError::UnknownRank(0)));
        assert_eq!(Role::from_rank(6), Err(TypesError::UnknownRank(6)));
    }

    #[test]
    fn test_guest_roles() {
        assert!(Role::StandardGuest.is_guest());
        assert!(Role::PremiumGuest.is_guest());
        assert!(!Role::Staff.is_guest());
        assert!(!Role::Administrator.is_guest());
    }

    #[test]
    fn test_wire_names_and_legacy_aliases() {
        let role: Role = serde_json::from_str("\"premium-guest\"").unwrap();
        assert_eq!(role, Role::PremiumGuest);
        let role: Role = serde_json::from_str("\"customer_deluxe\"").unwrap();
        assert_eq!(role, Role::PremiumGuest);
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Administrator);

        assert_eq!(
            serde_json::to_string(&Role::StandardGuest).unwrap(),
            "\"standard-guest\""
        );
        assert!(serde_json::from_str::<Role>("\"janitor\"").is_err());
    }

    #[test]
    fn test_from_str_agrees_with_display() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert_eq!("customer_standard".parse::<Role>().unwrap(), Role::StandardGuest);
        assert!("root".parse::<Role>().is_err());
    }
}
