//! Role checks for hiding screens and actions.
//!
//! These only shape what the UI offers. The backend enforces authorization
//! on its own; nothing here is a security boundary.

use lms_admin_shared::{ApiError, Deck, Role, User};

use crate::auth_session::AuthContext;

/// Case-insensitive membership check. A missing or blank role never passes.
pub fn has_role(current: Option<&str>, allowed: &[&str]) -> bool {
    let Some(current) = current.map(str::trim).filter(|r| !r.is_empty()) else {
        return false;
    };
    allowed.iter().any(|a| a.trim().eq_ignore_ascii_case(current))
}

/// A set of roles allowed through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleGate {
    allowed: Vec<String>,
}

impl RoleGate {
    pub fn new<I, S>(allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: allowed.into_iter().map(Into::into).collect(),
        }
    }

    pub fn of(roles: &[Role]) -> Self {
        Self::new(roles.iter().map(Role::as_str))
    }

    pub fn teacher_or_admin() -> Self {
        Self::of(&[Role::Teacher, Role::Admin])
    }

    pub fn admin() -> Self {
        Self::of(&[Role::Admin])
    }

    pub fn allowed(&self) -> &[String] {
        &self.allowed
    }

    pub fn allows(&self, role: Option<&str>) -> bool {
        let allowed: Vec<&str> = self.allowed.iter().map(String::as_str).collect();
        has_role(role, &allowed)
    }

    /// Run `handler` only when the role passes; otherwise it is never called.
    pub fn run<R>(&self, role: Option<&str>, handler: impl FnOnce() -> R) -> Option<R> {
        if self.allows(role) {
            Some(handler())
        } else {
            None
        }
    }

    /// `Err(ApiError::Forbidden)` when the role does not pass.
    pub fn guard(&self, role: Option<&str>) -> Result<(), ApiError> {
        if self.allows(role) {
            Ok(())
        } else {
            crate::log_debug!(
                "role {:?} refused, requires one of {:?}",
                role,
                self.allowed
            );
            Err(ApiError::Forbidden {
                required: self.allowed.clone(),
            })
        }
    }
}

/// Role questions about the signed-in user.
#[derive(Debug, Clone)]
pub struct RolePermission {
    role: Option<String>,
}

impl RolePermission {
    pub fn from_auth(auth: &AuthContext) -> Self {
        Self { role: auth.role() }
    }

    pub fn from_user(user: Option<&User>) -> Self {
        Self {
            role: user
                .map(|u| u.role.trim().to_ascii_uppercase())
                .filter(|r| !r.is_empty()),
        }
    }

    pub fn has_role(&self, roles: &[&str]) -> bool {
        has_role(self.role.as_deref(), roles)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(&[Role::Admin.as_str()])
    }

    pub fn is_teacher(&self) -> bool {
        self.has_role(&[Role::Teacher.as_str()])
    }

    pub fn is_student(&self) -> bool {
        self.has_role(&[Role::Student.as_str()])
    }

    pub fn is_teacher_or_admin(&self) -> bool {
        self.has_role(&[Role::Teacher.as_str(), Role::Admin.as_str()])
    }

    /// Upper-cased role, empty when signed out.
    pub fn user_role(&self) -> String {
        self.role.clone().unwrap_or_default()
    }
}

/// Admins manage every deck; teachers only their own.
pub fn can_manage_deck(user: Option<&User>, deck: &Deck) -> bool {
    let Some(user) = user else {
        return false;
    };
    match user.role_kind() {
        Some(Role::Admin) => true,
        Some(Role::Teacher) => deck.instructor_id == user.id.to_string(),
        _ => false,
    }
}
