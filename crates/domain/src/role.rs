use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rolegate_core::AppError;
use serde::{Deserialize, Serialize};

/// Rank assigned to an actor whose role is not in the hierarchy table.
pub const UNKNOWN_ACTOR_RANK: u8 = 0;

/// Rank demanded when a required role is not in the hierarchy table.
///
/// Differs from [`UNKNOWN_ACTOR_RANK`]: an unknown actor role is
/// the least privileged, an unknown required role is treated as super-admin.
pub const UNKNOWN_REQUIRED_RANK: u8 = 100;

/// Fixed role hierarchy, ordered from most to least privileged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform operator.
    Root,
    /// Platform-wide administrator.
    SuperAdmin,
    /// Administrator of an agency organization.
    AgencyAdmin,
    /// Member of an agency organization.
    AgencyMember,
    /// Administrator of a brand organization.
    BrandAdmin,
    /// Member of a brand organization.
    BrandMember,
    /// Content creator.
    Creator,
    /// Read-only viewer.
    Viewer,
}

impl Role {
    /// Returns a stable transport value for this role.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::SuperAdmin => "super_admin",
            Self::AgencyAdmin => "agency_admin",
            Self::AgencyMember => "agency_member",
            Self::BrandAdmin => "brand_admin",
            Self::BrandMember => "brand_member",
            Self::Creator => "creator",
            Self::Viewer => "viewer",
        }
    }

    /// Returns the rank of this role in the hierarchy table.
    #[must_use]
    pub fn rank(&self) -> u8 {
        match self {
            Self::Root => 110,
            Self::SuperAdmin => 100,
            Self::AgencyAdmin => 80,
            Self::AgencyMember => 60,
            Self::BrandAdmin => 50,
            Self::BrandMember => 40,
            Self::Creator => 20,
            Self::Viewer => 10,
        }
    }

    /// Returns all known roles, most privileged first.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[Role] = &[
            Role::Root,
            Role::SuperAdmin,
            Role::AgencyAdmin,
            Role::AgencyMember,
            Role::BrandAdmin,
            Role::BrandMember,
            Role::Creator,
            Role::Viewer,
        ];

        ALL
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "root" => Ok(Self::Root),
            "super_admin" => Ok(Self::SuperAdmin),
            "agency_admin" => Ok(Self::AgencyAdmin),
            "agency_member" => Ok(Self::AgencyMember),
            "brand_admin" => Ok(Self::BrandAdmin),
            "brand_member" => Ok(Self::BrandMember),
            "creator" => Ok(Self::Creator),
            "viewer" => Ok(Self::Viewer),
            _ => Err(AppError::Validation(format!("unknown role value '{value}'"))),
        }
    }
}

impl Display for Role {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Role as received from an external source, which may name a role outside
/// the hierarchy table.
///
/// Serializes as the plain role string, so unknown values round-trip intact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoleRef {
    /// A role present in the hierarchy table.
    Known(Role),
    /// A role string the hierarchy table does not recognise.
    Unknown(String),
}

impl RoleRef {
    /// Classifies a raw role string.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        Role::from_str(value)
            .map(Self::Known)
            .unwrap_or_else(|_| Self::Unknown(value.to_owned()))
    }

    /// Returns the known role, if any.
    #[must_use]
    pub fn known(&self) -> Option<Role> {
        match self {
            Self::Known(role) => Some(*role),
            Self::Unknown(_) => None,
        }
    }

    /// Rank when this value is the actor's own role.
    #[must_use]
    pub fn actor_rank(&self) -> u8 {
        self.known()
            .map(|role| role.rank())
            .unwrap_or(UNKNOWN_ACTOR_RANK)
    }

    /// Rank when this value is a required minimum role.
    #[must_use]
    pub fn required_rank(&self) -> u8 {
        self.known()
            .map(|role| role.rank())
            .unwrap_or(UNKNOWN_REQUIRED_RANK)
    }

    /// Returns the role string as received.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(role) => role.as_str(),
            Self::Unknown(value) => value.as_str(),
        }
    }
}

impl From<Role> for RoleRef {
    fn from(value: Role) -> Self {
        Self::Known(value)
    }
}

impl From<String> for RoleRef {
    fn from(value: String) -> Self {
        match Role::from_str(value.as_str()) {
            Ok(role) => Self::Known(role),
            Err(_) => Self::Unknown(value),
        }
    }
}

impl From<RoleRef> for String {
    fn from(value: RoleRef) -> Self {
        match value {
            RoleRef::Known(role) => role.as_str().to_owned(),
            RoleRef::Unknown(value) => value,
        }
    }
}

impl Display for RoleRef {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> std::fmt::Result {
        formatter.write_str(self.as_str())
    }
}
