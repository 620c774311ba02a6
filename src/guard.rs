//! Route-guard decision for protected views. Pure: callers re-evaluate
//! whenever any input changes. While the session is still restoring there is
//! nothing to decide, so neither content nor a redirect should render yet.

use crate::identity::UserRole;
use crate::session::SessionSnapshot;

/// Redirect targets used by guard decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardPaths {
    pub login: String,
    pub home: String,
}

impl Default for GuardPaths {
    fn default() -> Self {
        Self {
            login: "/login".into(),
            home: "/".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Navigate away and surface the notice to the user.
    Redirect { to: String, notice: String },
}

pub const NOTICE_LOGIN_REQUIRED: &str = "You must be logged in to access this page";
pub const NOTICE_FORBIDDEN: &str = "You do not have permission to access this page";

/// Compute the access decision for a view requiring `required_roles` (empty
/// means any authenticated user). Returns `None` while the session is still
/// loading.
pub fn evaluate(
    snapshot: &SessionSnapshot,
    required_roles: &[UserRole],
    paths: &GuardPaths,
) -> Option<GuardDecision> {
    if snapshot.is_loading {
        return None;
    }
    if !snapshot.is_authenticated {
        return Some(GuardDecision::Redirect {
            to: paths.login.clone(),
            notice: NOTICE_LOGIN_REQUIRED.into(),
        });
    }
    if !required_roles.is_empty() {
        let allowed = snapshot
            .user
            .as_ref()
            .map(|u| required_roles.contains(&u.role))
            .unwrap_or(false);
        if !allowed {
            return Some(GuardDecision::Redirect {
                to: paths.home.clone(),
                notice: NOTICE_FORBIDDEN.into(),
            });
        }
    }
    Some(GuardDecision::Allow)
}
