//! Physical locations.

use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{LocationId, TypesError};

/// Category of a physical location. Immutable per location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocationType {
    /// A bookable guest room.
    #[serde(alias = "room")]
    GuestRoom,
    /// Sauna, spa and similar perks.
    #[serde(alias = "sauna")]
    WellnessArea,
    /// Lobby, gym and other shared spaces.
    #[serde(alias = "common_area")]
    CommonArea,
    /// Back-of-house areas.
    #[serde(alias = "staff_area")]
    StaffArea,
    /// Offices and server rooms.
    #[serde(alias = "admin_area")]
    AdminArea,
}

impl LocationType {
    pub const ALL: [LocationType; 5] = [
        LocationType::GuestRoom,
        LocationType::WellnessArea,
        LocationType::CommonArea,
        LocationType::StaffArea,
        LocationType::AdminArea,
    ];

    /// Returns the canonical wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationType::GuestRoom => "guest-room",
            LocationType::WellnessArea => "wellness-area",
            LocationType::CommonArea => "common-area",
            LocationType::StaffArea => "staff-area",
            LocationType::AdminArea => "admin-area",
        }
    }
}

impl Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationType {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "guest-room" | "room" => Ok(LocationType::GuestRoom),
            "wellness-area" | "sauna" => Ok(LocationType::WellnessArea),
            "common-area" | "common_area" => Ok(LocationType::CommonArea),
            "staff-area" | "staff_area" => Ok(LocationType::StaffArea),
            "admin-area" | "admin_area" => Ok(LocationType::AdminArea),
            other => Err(TypesError::UnknownValue {
                kind: "location type",
                value: other.to_string(),
            }),
        }
    }
}

/// Quality tier of a guest room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RoomTier {
    Standard,
    #[serde(alias = "deluxe")]
    Premium,
}

impl RoomTier {
    pub const ALL: [RoomTier; 2] = [RoomTier::Standard, RoomTier::Premium];

    pub fn as_str(self) -> &'static str {
        match self {
            RoomTier::Standard => "standard",
            RoomTier::Premium => "premium",
        }
    }
}

impl Display for RoomTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoomTier {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "standard" => Ok(RoomTier::Standard),
            "premium" | "deluxe" => Ok(RoomTier::Premium),
            other => Err(TypesError::UnknownValue {
                kind: "room tier",
                value: other.to_string(),
            }),
        }
    }
}

/// A physical location behind a smart lock.
///
/// Administered by an external collaborator; the access core only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: LocationId,
    /// Short door code printed on the lock, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    pub name: String,
    #[serde(rename = "type")]
    pub location_type: LocationType,
    /// Present iff `location_type` is [`LocationType::GuestRoom`].
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "roomType")]
    pub room_tier: Option<RoomTier>,
}

impl Location {
    /// Creates a guest room.
    pub fn guest_room(id: impl Into<LocationId>, name: impl Into<String>, tier: RoomTier) -> Self {
        Self {
            id: id.into(),
            code: None,
            name: name.into(),
            location_type: LocationType::GuestRoom,
            room_tier: Some(tier),
        }
    }

    /// Creates any location that is not a guest room.
    ///
    /// Passing [`LocationType::GuestRoom`] yields a location that fails
    /// [`Location::validate`]; use [`Location::guest_room`] instead.
    pub fn area(
        id: impl Into<LocationId>,
        name: impl Into<String>,
        location_type: LocationType,
    ) -> Self {
        Self {
            id: id.into(),
            code: None,
            name: name.into(),
            location_type,
            room_tier: None,
        }
    }

    /// Sets the door code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Checks that a room tier is present iff this is a guest room.
    pub fn validate(&self) -> Result<(), TypesError> {
        match (self.location_type, self.room_tier) {
            (LocationType::GuestRoom, None) => Err(TypesError::MissingRoomTier(self.id.clone())),
            (LocationType::GuestRoom, Some(_)) | (_, None) => Ok(()),
            (location_type, Some(_)) => Err(TypesError::UnexpectedRoomTier {
                id: self.id.clone(),
                location_type,
            }),
        }
    }
}
