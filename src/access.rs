//! Role-based visibility and authorization.
//!
//! The acting user is always passed in explicitly as an [`Identity`]; there
//! is no ambient session. Checks return [`BackofficeError::Unauthenticated`]
//! when no identity is present and [`BackofficeError::Forbidden`] when the
//! identity's role does not allow the action.

use crate::error::{BackofficeError, BackofficeResult};
use crate::models::{Customer, Role, User};

/// Roles allowed to act on other users' records.
pub const MANAGERIAL_ROLES: [Role; 2] = [Role::Manager, Role::Owner];

/// Roles whose attendance is tracked.
pub const ATTENDANCE_ROLES: [Role; 2] = [Role::Cast, Role::Staff];

/// The acting user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// The user's id.
    pub id: String,
    /// The user's role.
    pub role: Role,
}

impl Identity {
    /// Creates an identity.
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role,
        }
    }

    /// Returns true if this identity holds a managerial role.
    pub fn is_manager(&self) -> bool {
        can_manage(self.role)
    }
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Identity::new(user.id.clone(), user.role)
    }
}

/// Returns true if `role` may act on other users' records.
///
/// # Examples
///
/// ```
/// use venue_backoffice::access::can_manage;
/// use venue_backoffice::models::Role;
///
/// assert!(can_manage(Role::Owner));
/// assert!(!can_manage(Role::Cast));
/// ```
pub fn can_manage(role: Role) -> bool {
    MANAGERIAL_ROLES.contains(&role)
}

/// Unwraps an optional identity, failing when none is present.
pub fn require_identity(identity: Option<&Identity>) -> BackofficeResult<&Identity> {
    identity.ok_or(BackofficeError::Unauthenticated)
}

/// Fails unless the identity holds a managerial role.
pub fn require_manager(identity: &Identity) -> BackofficeResult<()> {
    if identity.is_manager() {
        Ok(())
    } else {
        Err(BackofficeError::forbidden(format!(
            "role '{}' is not managerial",
            identity.role
        )))
    }
}

/// Fails unless the identity may view, schedule or edit `target_user_id`'s attendance.
pub fn authorize_attendance_view(identity: &Identity, target_user_id: &str) -> BackofficeResult<()> {
    if identity.id == target_user_id {
        return Ok(());
    }
    require_manager(identity)
}

/// Fails unless the identity is punching its own clock.
///
/// Managers may correct other users' records but never punch for them.
pub fn authorize_punch(identity: &Identity, target_user_id: &str) -> BackofficeResult<()> {
    if identity.id == target_user_id {
        Ok(())
    } else {
        Err(BackofficeError::forbidden(
            "clock actions are only available for your own attendance",
        ))
    }
}

/// Fails unless the identity may register a user with `role`.
///
/// Staff and cast are registered by managers; managers and owners only by
/// an owner.
pub fn authorize_registration(identity: Option<&Identity>, role: Role) -> BackofficeResult<()> {
    let identity = require_identity(identity)?;
    let allowed = if can_manage(role) {
        identity.role == Role::Owner
    } else {
        identity.is_manager()
    };
    if allowed {
        Ok(())
    } else {
        Err(BackofficeError::forbidden(format!(
            "role '{}' may not register a {role}",
            identity.role
        )))
    }
}

/// Returns true if the identity may see the customer.
pub fn can_view_customer(identity: &Identity, customer: &Customer) -> bool {
    identity.is_manager() || customer.cast_id == identity.id
}

/// Keeps the customers visible to the identity.
pub fn visible_customers(identity: &Identity, customers: Vec<Customer>) -> Vec<Customer> {
    customers
        .into_iter()
        .filter(|c| can_view_customer(identity, c))
        .collect()
}

/// Returns the users a manager may pick as an attendance target.
pub fn attendance_candidates(users: &[User]) -> Vec<&User> {
    users
        .iter()
        .filter(|u| ATTENDANCE_ROLES.contains(&u.role))
        .collect()
}
