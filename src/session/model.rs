//! Session and role models

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for authorization.
///
/// Roles are membership-tested against a policy's allowed set. There is
/// deliberately no hierarchy: Admin does not satisfy a SuperAdmin-only gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Full administrative access, including role assignment
    SuperAdmin,
    /// Administrative access to user management surfaces
    Admin,
    /// Regular authenticated user
    User,
}

impl Role {
    /// Parse a role from a provider claim name. Only exact, recognized
    /// names match.
    pub fn from_claim(s: &str) -> Option<Role> {
        match s {
            "SuperAdmin" => Some(Role::SuperAdmin),
            "Admin" => Some(Role::Admin),
            "User" => Some(Role::User),
            _ => None,
        }
    }

    /// Name as it appears in provider claims and storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SuperAdmin => "SuperAdmin",
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The currently authenticated identity.
///
/// One canonical shape serves both login variants: token material is present
/// for provider-backed sessions and absent for demo sessions. Being logged in
/// is encoded by the presence of a `Session`, not by a flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Unique user identifier
    pub id: String,
    /// Username for display
    pub username: String,
    /// Role extracted at login time
    pub role: Role,
    /// Bearer token for API calls (provider variant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Refresh token (provider variant only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    /// Create a session without token material (demo variant).
    pub fn new(id: impl Into<String>, username: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            role,
            token: None,
            refresh_token: None,
        }
    }

    /// Attach token material (provider variant).
    pub fn with_tokens(mut self, token: String, refresh_token: Option<String>) -> Self {
        self.token = Some(token);
        self.refresh_token = refresh_token;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_from_claim() {
        assert_eq!(Role::from_claim("SuperAdmin"), Some(Role::SuperAdmin));
        assert_eq!(Role::from_claim("Admin"), Some(Role::Admin));
        assert_eq!(Role::from_claim("User"), Some(Role::User));
        // No case folding, no aliases
        assert_eq!(Role::from_claim("admin"), None);
        assert_eq!(Role::from_claim("superadmin"), None);
        assert_eq!(Role::from_claim("offline_access"), None);
    }

    #[test]
    fn test_role_display_round_trip() {
        for role in [Role::SuperAdmin, Role::Admin, Role::User] {
            assert_eq!(Role::from_claim(&role.to_string()), Some(role));
        }
    }

    #[test]
    fn test_session_serde_round_trip() {
        let session = Session::new("1", "demo", Role::SuperAdmin);
        let json = serde_json::to_string(&session).unwrap();
        let restored: Session = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, session);
    }

    #[test]
    fn test_session_omits_absent_tokens() {
        let session = Session::new("1", "demo", Role::SuperAdmin);
        let json = serde_json::to_string(&session).unwrap();
        assert!(!json.contains("token"));
    }
}
