//! Role-gated navigation and actions.
//!
//! Every navigation entry and every mutating action declares the minimum
//! [`Role`] it needs. An entry is shown (and an action allowed) when the
//! current administrator's rank is at least that minimum. Editing or deleting
//! another administrator additionally requires a strictly higher rank than
//! the target and never applies to oneself.

use crate::types::{AdministratorId, Role};

/// An entry in the side navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavEntry {
    /// Link target.
    pub href: &'static str,
    /// Menu label.
    pub label: &'static str,
    /// Lowest role that sees the entry.
    pub min_role: Role,
}

/// Side navigation, in display order.
pub const NAVIGATION: [NavEntry; 6] = [
    NavEntry {
        href: "/app/bet",
        label: "Apostas",
        min_role: Role::Admin,
    },
    NavEntry {
        href: "/app/pending",
        label: "Apostas pendentes",
        min_role: Role::Admin,
    },
    NavEntry {
        href: "/app/winner",
        label: "Vencedores",
        min_role: Role::Admin,
    },
    NavEntry {
        href: "/app/animal",
        label: "Animais",
        min_role: Role::Admin,
    },
    NavEntry {
        href: "/app/log",
        label: "Logs",
        min_role: Action::ViewLogs.min_role(),
    },
    NavEntry {
        href: "/app/administrator",
        label: "Administradores",
        min_role: Action::ViewAdministrators.min_role(),
    },
];

/// Navigation entries visible to `role`.
pub fn visible_entries(role: Role) -> impl Iterator<Item = &'static NavEntry> {
    NAVIGATION
        .iter()
        .filter(move |entry| role.at_least(entry.min_role))
}

/// Something an administrator can attempt in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Open the administrator list.
    ViewAdministrators,
    /// Open the audit log.
    ViewLogs,
    /// Mark a winner as paid.
    PayWinner,
    /// Register a new administrator.
    CreateAdministrator,
    /// Edit another administrator (see [`can_modify`]).
    EditAdministrator,
    /// Delete another administrator (see [`can_modify`]).
    DeleteAdministrator,
    /// Delete a confirmed bet.
    DeleteBet,
    /// Confirm a pending bet by its token.
    ValidateBet,
}

impl Action {
    /// Lowest role allowed to perform the action.
    #[must_use]
    pub const fn min_role(self) -> Role {
        match self {
            Self::DeleteBet | Self::ValidateBet => Role::Admin,
            Self::ViewAdministrators => Role::SuperAdmin,
            Self::ViewLogs
            | Self::PayWinner
            | Self::EditAdministrator
            | Self::DeleteAdministrator => Role::SuperSuperAdmin,
            Self::CreateAdministrator => Role::Owner,
        }
    }
}

/// Whether `role` ranks high enough for `action`.
#[must_use]
pub const fn can(role: Role, action: Action) -> bool {
    role.at_least(action.min_role())
}

/// An administrator identity as far as permission checks care.
#[derive(Debug, Clone, Copy)]
pub struct Principal<'a> {
    /// Administrator ID.
    pub id: &'a AdministratorId,
    /// Administrator role.
    pub role: Role,
}

impl<'a> Principal<'a> {
    /// Build a principal.
    #[must_use]
    pub const fn new(id: &'a AdministratorId, role: Role) -> Self {
        Self { id, role }
    }
}

/// Whether `actor` may edit or delete `target`.
///
/// Requires the edit/delete rank, a strictly higher rank than the target, and
/// a different identity.
#[must_use]
pub fn can_modify(actor: Principal<'_>, target: Principal<'_>) -> bool {
    actor.id != target.id
        && can(actor.role, Action::EditAdministrator)
        && actor.role.rank() > target.role.rank()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hrefs(role: Role) -> Vec<&'static str> {
        visible_entries(role).map(|e| e.href).collect()
    }

    #[test]
    fn test_admin_navigation() {
        assert_eq!(
            hrefs(Role::Admin),
            vec!["/app/bet", "/app/pending", "/app/winner", "/app/animal"]
        );
    }

    #[test]
    fn test_super_admin_sees_administrators_not_logs() {
        let entries = hrefs(Role::SuperAdmin);
        assert!(entries.contains(&"/app/administrator"));
        assert!(!entries.contains(&"/app/log"));
    }

    #[test]
    fn test_owner_sees_everything() {
        assert_eq!(hrefs(Role::Owner).len(), NAVIGATION.len());
    }

    #[test]
    fn test_action_gates() {
        assert!(can(Role::Admin, Action::DeleteBet));
        assert!(!can(Role::SuperAdmin, Action::PayWinner));
        assert!(can(Role::SuperSuperAdmin, Action::PayWinner));
        assert!(!can(Role::SuperSuperAdmin, Action::CreateAdministrator));
        assert!(can(Role::Owner, Action::CreateAdministrator));
    }

    #[test]
    fn test_super_admin_cannot_delete_higher_rank() {
        let me = AdministratorId::new("a");
        let other = AdministratorId::new("b");
        assert!(!can_modify(
            Principal::new(&me, Role::SuperAdmin),
            Principal::new(&other, Role::SuperSuperAdmin),
        ));
    }

    #[test]
    fn test_modify_requires_strictly_higher_rank() {
        let me = AdministratorId::new("a");
        let other = AdministratorId::new("b");
        assert!(!can_modify(
            Principal::new(&me, Role::SuperSuperAdmin),
            Principal::new(&other, Role::SuperSuperAdmin),
        ));
        assert!(can_modify(
            Principal::new(&me, Role::SuperSuperAdmin),
            Principal::new(&other, Role::SuperAdmin),
        ));
        assert!(can_modify(
            Principal::new(&me, Role::Owner),
            Principal::new(&other, Role::SuperSuperAdmin),
        ));
    }

    #[test]
    fn test_cannot_modify_self() {
        let me = AdministratorId::new("a");
        assert!(!can_modify(
            Principal::new(&me, Role::Owner),
            Principal::new(&me, Role::Admin),
        ));
    }

    #[test]
    fn test_super_admin_cannot_modify_anyone() {
        let me = AdministratorId::new("a");
        let other = AdministratorId::new("b");
        assert!(!can_modify(
            Principal::new(&me, Role::SuperAdmin),
            Principal::new(&other, Role::Admin),
        ));
    }
}
