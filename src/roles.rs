//! Actor roles

use std::fmt;

use serde::{Deserialize, Serialize};

/// Permission tier of the staff member performing an action.
///
/// Role strings that are not recognised deserialize to [`ActorRole::Unrecognised`], which is the
/// most restricted tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActorRole {
    /// Studio owner.
    Owner,

    /// Studio administrator.
    Admin,

    /// Photographer assigned to sessions.
    Photographer,

    /// Staff handling print packaging and shipping.
    PackagingStaff,

    /// Any role outside the known set.
    #[serde(other)]
    Unrecognised,
}

impl ActorRole {
    /// Every role.
    pub const ALL: [ActorRole; 5] = [
        ActorRole::Owner,
        ActorRole::Admin,
        ActorRole::Photographer,
        ActorRole::PackagingStaff,
        ActorRole::Unrecognised,
    ];

    /// Parse a role name. Unknown names map to [`ActorRole::Unrecognised`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "OWNER" => ActorRole::Owner,
            "ADMIN" => ActorRole::Admin,
            "PHOTOGRAPHER" => ActorRole::Photographer,
            "PACKAGING_STAFF" => ActorRole::PackagingStaff,
            _ => ActorRole::Unrecognised,
        }
    }

    /// Owners and admins may override the lifecycle order.
    pub const fn is_administrative(self) -> bool {
        matches!(self, ActorRole::Owner | ActorRole::Admin)
    }

    /// Wire name, e.g. `PACKAGING_STAFF`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ActorRole::Owner => "OWNER",
            ActorRole::Admin => "ADMIN",
            ActorRole::Photographer => "PHOTOGRAPHER",
            ActorRole::PackagingStaff => "PACKAGING_STAFF",
            ActorRole::Unrecognised => "UNRECOGNISED",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for ActorRole {
    fn from(value: &str) -> Self {
        ActorRole::parse(value)
    }
}
