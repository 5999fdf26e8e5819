//! Tenancy guard: the single authorization gate for role/tenant rules.
//!
//! Every handler routes its role and dormitory checks through
//! [`authorize`], so the rules live (and are tested) in one place instead
//! of being re-derived per endpoint.

use thiserror::Error;
use uuid::Uuid;

use crate::models::UserRole;

/// The authenticated principal as seen by the guard.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: Uuid,
    pub role: UserRole,
    pub dormitory_id: Option<Uuid>,
    pub is_active: bool,
}

/// What the principal is trying to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Create a dormitory: the bootstrap action for an admin without one.
    CreateDormitory,
    /// Admin-only mutations: schedule create/update/delete, device
    /// assignment, configuration, user-role changes.
    AdminWrite,
    /// Staff-level mutations: attendance records, student/room upkeep.
    StaffWrite,
    /// Tenancy-scoped reads.
    Read,
    /// The RFID scan-ingestion operation.
    IngestScan,
}

/// Machine-distinguishable denial reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("account is not active")]
    Inactive,

    #[error("operation not permitted for this role")]
    Forbidden,

    #[error("principal has no dormitory assigned")]
    NoDormitory,

    #[error("resource belongs to a different dormitory")]
    WrongTenant,
}

/// Evaluates whether `principal` may perform `action` on a resource owned
/// by `target_dormitory` (`None` for resources with global scope, e.g. the
/// unknown-tag ledger).
///
/// Rules, in order:
/// 1. Inactive principals are always denied.
/// 2. IO devices may only ingest scans; nobody else may.
/// 3. An admin without a dormitory may only bootstrap dormitory creation.
/// 4. An admin with a dormitory is confined to it for everything else.
/// 5. Staff and supervisors are confined to their dormitory and denied
///    admin-only actions.
pub fn authorize(
    principal: &Principal,
    action: Action,
    target_dormitory: Option<Uuid>,
) -> Result<(), AccessDenied> {
    if !principal.is_active {
        return Err(AccessDenied::Inactive);
    }

    if principal.role == UserRole::IoDevice {
        return match action {
            Action::IngestScan => Ok(()),
            _ => Err(AccessDenied::Forbidden),
        };
    }
    if action == Action::IngestScan {
        return Err(AccessDenied::Forbidden);
    }

    match principal.role {
        UserRole::Admin => match (action, principal.dormitory_id) {
            (Action::CreateDormitory, None) => Ok(()),
            (_, None) => Err(AccessDenied::NoDormitory),
            (Action::CreateDormitory, Some(_)) => Err(AccessDenied::Forbidden),
            (_, Some(own)) => check_tenant(own, target_dormitory),
        },
        UserRole::Staff | UserRole::Supervisor => match action {
            Action::CreateDormitory | Action::AdminWrite => Err(AccessDenied::Forbidden),
            Action::StaffWrite | Action::Read => {
                let own = principal.dormitory_id.ok_or(AccessDenied::NoDormitory)?;
                check_tenant(own, target_dormitory)
            }
            Action::IngestScan => Err(AccessDenied::Forbidden),
        },
        // Already handled by the early return; a denial keeps the match
        // total without a panic path.
        UserRole::IoDevice => Err(AccessDenied::Forbidden),
    }
}

fn check_tenant(own: Uuid, target: Option<Uuid>) -> Result<(), AccessDenied> {
    match target {
        None => Ok(()),
        Some(t) if t == own => Ok(()),
        Some(_) => Err(AccessDenied::WrongTenant),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(role: UserRole, dormitory_id: Option<Uuid>) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
            dormitory_id,
            is_active: true,
        }
    }

    #[test]
    fn test_inactive_principal_always_denied() {
        let mut p = principal(UserRole::Admin, Some(Uuid::new_v4()));
        p.is_active = false;
        assert_eq!(
            authorize(&p, Action::Read, p.dormitory_id),
            Err(AccessDenied::Inactive)
        );
    }

    #[test]
    fn test_unassigned_admin_may_only_bootstrap() {
        let p = principal(UserRole::Admin, None);
        assert_eq!(authorize(&p, Action::CreateDormitory, None), Ok(()));
        assert_eq!(
            authorize(&p, Action::AdminWrite, Some(Uuid::new_v4())),
            Err(AccessDenied::NoDormitory)
        );
        assert_eq!(
            authorize(&p, Action::Read, None),
            Err(AccessDenied::NoDormitory)
        );
    }

    #[test]
    fn test_assigned_admin_confined_to_own_dormitory() {
        let dorm = Uuid::new_v4();
        let p = principal(UserRole::Admin, Some(dorm));

        assert_eq!(authorize(&p, Action::AdminWrite, Some(dorm)), Ok(()));
        assert_eq!(authorize(&p, Action::StaffWrite, Some(dorm)), Ok(()));
        assert_eq!(
            authorize(&p, Action::AdminWrite, Some(Uuid::new_v4())),
            Err(AccessDenied::WrongTenant)
        );
        assert_eq!(
            authorize(&p, Action::CreateDormitory, None),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_admin_may_read_global_resources() {
        let p = principal(UserRole::Admin, Some(Uuid::new_v4()));
        assert_eq!(authorize(&p, Action::Read, None), Ok(()));
    }

    #[test]
    fn test_staff_denied_admin_actions() {
        let dorm = Uuid::new_v4();
        let p = principal(UserRole::Staff, Some(dorm));

        assert_eq!(
            authorize(&p, Action::AdminWrite, Some(dorm)),
            Err(AccessDenied::Forbidden)
        );
        assert_eq!(
            authorize(&p, Action::CreateDormitory, None),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_staff_confined_to_own_dormitory() {
        let dorm = Uuid::new_v4();
        let p = principal(UserRole::Staff, Some(dorm));

        assert_eq!(authorize(&p, Action::StaffWrite, Some(dorm)), Ok(()));
        assert_eq!(authorize(&p, Action::Read, Some(dorm)), Ok(()));
        assert_eq!(
            authorize(&p, Action::StaffWrite, Some(Uuid::new_v4())),
            Err(AccessDenied::WrongTenant)
        );
    }

    #[test]
    fn test_supervisor_treated_as_staff() {
        let dorm = Uuid::new_v4();
        let p = principal(UserRole::Supervisor, Some(dorm));

        assert_eq!(authorize(&p, Action::Read, Some(dorm)), Ok(()));
        assert_eq!(
            authorize(&p, Action::AdminWrite, Some(dorm)),
            Err(AccessDenied::Forbidden)
        );
    }

    #[test]
    fn test_staff_without_dormitory_denied() {
        let p = principal(UserRole::Staff, None);
        assert_eq!(
            authorize(&p, Action::Read, Some(Uuid::new_v4())),
            Err(AccessDenied::NoDormitory)
        );
    }

    #[test]
    fn test_io_device_may_only_ingest() {
        let p = principal(UserRole::IoDevice, None);

        assert_eq!(authorize(&p, Action::IngestScan, None), Ok(()));
        for action in [
            Action::Read,
            Action::StaffWrite,
            Action::AdminWrite,
            Action::CreateDormitory,
        ] {
            assert_eq!(
                authorize(&p, action, None),
                Err(AccessDenied::Forbidden),
                "{:?} should be denied for io-device",
                action
            );
        }
    }

    #[test]
    fn test_only_io_device_may_ingest() {
        for role in [UserRole::Admin, UserRole::Staff, UserRole::Supervisor] {
            let p = principal(role, Some(Uuid::new_v4()));
            assert_eq!(
                authorize(&p, Action::IngestScan, None),
                Err(AccessDenied::Forbidden),
                "{:?} should not ingest scans",
                role
            );
        }
    }
}
