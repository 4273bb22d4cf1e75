//! Access decision layer
//!
//! Decides, for one protected surface, whether to render it, defer, or deny.
//! Evaluated fresh from the current session state and the caller's policy on
//! every render; nothing is memoized. Denial is always one of the explicit
//! non-granted states, never an error.

use crate::session::{Role, SessionState};

/// Caller-declared policy for a protected surface.
///
/// Ephemeral by design: built at the call site, evaluated, and dropped.
/// `allowed_roles` keeps declaration order because the denial notice names
/// the required roles verbatim in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    pub allowed_roles: Vec<Role>,
    /// Optional replacement for the generic denial notice.
    pub fallback: Option<String>,
}

impl AccessPolicy {
    /// Policy allowing the given roles.
    pub fn roles(allowed: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed_roles: allowed.into_iter().collect(),
            fallback: None,
        }
    }

    /// Policy allowing any authenticated role.
    pub fn any_authenticated() -> Self {
        Self::roles([Role::SuperAdmin, Role::Admin, Role::User])
    }

    /// Replace the generic denial notice for this surface.
    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }
}

/// Outcome of evaluating a policy against the current session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Handshake not finished; show a loading placeholder, never redirect.
    Pending,
    /// No session; send the shell to the login entry point, replacing the
    /// current navigation entry.
    DeniedNoSession,
    /// Session present but its role is not in the allowed set; render the
    /// policy fallback if one was supplied, else the generic notice.
    DeniedWrongRole {
        required: Vec<Role>,
        fallback: Option<String>,
    },
    /// Render the guarded surface unmodified.
    Granted,
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted)
    }
}

/// Evaluate `policy` against `state`.
///
/// Membership is plain set-containment: no role implies any other role, so an
/// Admin session does not pass a SuperAdmin-only gate. That is a confirmed
/// design choice, not missing hierarchy.
pub fn evaluate(state: &SessionState, policy: &AccessPolicy) -> AccessDecision {
    if !state.initialized {
        // A stale session may already sit in memory; the decision is still
        // deferred until the handshake completes.
        return AccessDecision::Pending;
    }

    let session = match &state.session {
        Some(session) => session,
        None => return AccessDecision::DeniedNoSession,
    };

    if policy.allowed_roles.contains(&session.role) {
        AccessDecision::Granted
    } else {
        AccessDecision::DeniedWrongRole {
            required: policy.allowed_roles.clone(),
            fallback: policy.fallback.clone(),
        }
    }
}

/// Generic denial notice naming the required roles in declaration order.
pub fn denial_notice(required: &[Role]) -> String {
    let roles = required
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "Access denied. You don't have permission to access this resource. Required roles: {}",
        roles
    )
}
