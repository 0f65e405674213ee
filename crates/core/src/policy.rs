//! Ownership and approval checks for mutating operations.
//!
//! Two orthogonal rules govern writes to cinemas, auditoriums, and
//! showtimes: non-admin principals must organize the target cinema, and
//! showtime creation additionally requires the cinema to be approved.
//! Both checks run before any state change.

use crate::approval::APPROVAL_APPROVED;
use crate::error::CoreError;
use crate::roles::{ROLE_ADMIN, ROLE_ORGANIZER};

/// The verified caller, extracted from the JWT at the edge. The core never
/// re-validates tokens; `id` is an opaque string issued by the identity
/// service.
#[derive(Debug, Clone)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ADMIN)
    }

    pub fn is_organizer(&self) -> bool {
        self.roles.iter().any(|r| r == ROLE_ORGANIZER)
    }
}

/// Non-admin principals may only mutate resources under a cinema they
/// organize. Admins bypass the ownership check.
pub fn ensure_owner(principal: &Principal, organizer_id: &str) -> Result<(), CoreError> {
    if principal.is_admin() || principal.id == organizer_id {
        Ok(())
    } else {
        Err(CoreError::Forbidden(
            "not the owning organizer of this cinema".into(),
        ))
    }
}

/// Creating a showtime requires the parent cinema to be approved. Updates
/// and deletes of existing showtimes deliberately skip this check.
pub fn ensure_cinema_approved(approval_status: &str) -> Result<(), CoreError> {
    if approval_status == APPROVAL_APPROVED {
        Ok(())
    } else {
        Err(CoreError::Conflict(format!(
            "cinema is {approval_status}, not approved"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::approval::{APPROVAL_PENDING, APPROVAL_REJECTED};

    fn organizer(id: &str) -> Principal {
        Principal {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            roles: vec![ROLE_ORGANIZER.to_string()],
        }
    }

    fn admin() -> Principal {
        Principal {
            id: "admin-1".to_string(),
            email: "admin@example.com".to_string(),
            roles: vec![ROLE_ADMIN.to_string()],
        }
    }

    #[test]
    fn owner_passes_ownership_check() {
        assert!(ensure_owner(&organizer("org-a"), "org-a").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        assert!(matches!(
            ensure_owner(&organizer("org-b"), "org-a"),
            Err(CoreError::Forbidden(_))
        ));
    }

    #[test]
    fn admin_bypasses_ownership() {
        assert!(ensure_owner(&admin(), "org-a").is_ok());
    }

    #[test]
    fn showtime_creation_requires_approved_cinema() {
        assert!(ensure_cinema_approved(APPROVAL_APPROVED).is_ok());
        assert!(matches!(
            ensure_cinema_approved(APPROVAL_PENDING),
            Err(CoreError::Conflict(_))
        ));
        assert!(ensure_cinema_approved(APPROVAL_REJECTED).is_err());
    }
}
