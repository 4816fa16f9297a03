//! Administrator roles.
//!
//! Roles form a strict hierarchy. Permission checks compare ranks as integers
//! rather than looking names up in a list.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown role name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid administrator role: {0}")]
pub struct RoleError(pub String);

/// Administrator role, ordered from least to most privileged.
///
/// The derived `Ord` follows declaration order, so `Role::Admin < Role::Owner`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Operates bets and winners.
    #[serde(rename = "ADMIN")]
    Admin,
    /// Can see the administrator list.
    #[serde(rename = "SUPERADMIN")]
    SuperAdmin,
    /// Can pay winners, read logs and manage lower administrators.
    #[serde(rename = "SUPERSUPERADMIN")]
    SuperSuperAdmin,
    /// Owner tier. The only role allowed to create administrators.
    #[serde(rename = "ODONODAPORRATODA")]
    Owner,
}

impl Role {
    /// Every role, lowest rank first.
    pub const ALL: [Self; 4] = [Self::Admin, Self::SuperAdmin, Self::SuperSuperAdmin, Self::Owner];

    /// Ordinal position in the hierarchy (0 = lowest).
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Admin => 0,
            Self::SuperAdmin => 1,
            Self::SuperSuperAdmin => 2,
            Self::Owner => 3,
        }
    }

    /// Wire name used by the backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPERADMIN",
            Self::SuperSuperAdmin => "SUPERSUPERADMIN",
            Self::Owner => "ODONODAPORRATODA",
        }
    }

    /// Human label shown in forms.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::SuperAdmin => "SUPER ADMIN",
            Self::SuperSuperAdmin => "SUPER SUPER ADMIN",
            Self::Owner => "DONO",
        }
    }

    /// Whether this role ranks at least as high as `required`.
    #[must_use]
    pub const fn at_least(self, required: Self) -> bool {
        self.rank() >= required.rank()
    }

    /// Roles strictly below this one, lowest first.
    ///
    /// These are the roles an administrator of this rank may assign.
    #[must_use]
    pub fn below(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|role| role.rank() < self.rank())
            .collect()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "SUPERADMIN" => Ok(Self::SuperAdmin),
            "SUPERSUPERADMIN" => Ok(Self::SuperSuperAdmin),
            "ODONODAPORRATODA" => Ok(Self::Owner),
            _ => Err(RoleError(s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_strictly_increasing() {
        let ranks: Vec<u8> = Role::ALL.iter().map(|r| r.rank()).collect();
        assert_eq!(ranks, vec![0, 1, 2, 3]);
        assert!(Role::Admin < Role::SuperAdmin);
        assert!(Role::SuperAdmin < Role::SuperSuperAdmin);
        assert!(Role::SuperSuperAdmin < Role::Owner);
    }

    #[test]
    fn test_wire_names_round_trip() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
            let json = serde_json::to_string(&role).unwrap();
            assert_eq!(json, format!("\"{}\"", role.as_str()));
        }
    }

    #[test]
    fn test_unknown_role_rejected() {
        let err = "ROOT".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "invalid administrator role: ROOT");
    }

    #[test]
    fn test_below() {
        assert!(Role::Admin.below().is_empty());
        assert_eq!(
            Role::Owner.below(),
            vec![Role::Admin, Role::SuperAdmin, Role::SuperSuperAdmin]
        );
        assert_eq!(Role::SuperSuperAdmin.below(), vec![Role::Admin, Role::SuperAdmin]);
    }

    #[test]
    fn test_at_least() {
        assert!(Role::Owner.at_least(Role::SuperSuperAdmin));
        assert!(Role::SuperSuperAdmin.at_least(Role::SuperSuperAdmin));
        assert!(!Role::SuperAdmin.at_least(Role::SuperSuperAdmin));
    }
}
