//! Claims issued by the identity provider

use crate::session::Role;
use serde::{Deserialize, Serialize};

/// Realm-level role names carried inside provider tokens.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RealmAccess {
    #[serde(default)]
    pub roles: Vec<String>,
}

/// Claims parsed from a provider-issued access token.
///
/// Only the fields this application consumes; everything else in the token
/// is the provider's business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderClaims {
    /// Subject, the canonical user identifier
    pub sub: String,

    /// Username for display
    #[serde(default)]
    pub preferred_username: Option<String>,

    /// Expiration timestamp (seconds since epoch)
    #[serde(default)]
    pub exp: i64,

    /// Realm roles granted to this identity
    #[serde(default)]
    pub realm_access: RealmAccess,
}

impl ProviderClaims {
    /// Map provider role names onto the application role.
    ///
    /// Precedence is SuperAdmin > Admin, first match wins; anything else
    /// (including unrecognized names) falls back to User.
    pub fn role(&self) -> Role {
        let roles = &self.realm_access.roles;
        if roles.iter().any(|r| r == "SuperAdmin") {
            Role::SuperAdmin
        } else if roles.iter().any(|r| r == "Admin") {
            Role::Admin
        } else {
            Role::User
        }
    }

    /// Display name: preferred username when the provider sent one, the
    /// subject otherwise.
    pub fn display_name(&self) -> &str {
        self.preferred_username.as_deref().unwrap_or(&self.sub)
    }

    /// Seconds until the token expires; negative once it has.
    pub fn seconds_until_expiry(&self, now: i64) -> i64 {
        self.exp - now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_with_roles(roles: &[&str]) -> ProviderClaims {
        ProviderClaims {
            sub: "user-1".to_string(),
            preferred_username: Some("alice".to_string()),
            exp: 0,
            realm_access: RealmAccess {
                roles: roles.iter().map(|r| r.to_string()).collect(),
            },
        }
    }

    #[test]
    fn test_superadmin_wins_over_admin() {
        let claims = claims_with_roles(&["Admin", "SuperAdmin"]);
        assert_eq!(claims.role(), Role::SuperAdmin);
    }

    #[test]
    fn test_admin_when_no_superadmin() {
        let claims = claims_with_roles(&["offline_access", "Admin"]);
        assert_eq!(claims.role(), Role::Admin);
    }

    #[test]
    fn test_defaults_to_user() {
        assert_eq!(claims_with_roles(&[]).role(), Role::User);
        assert_eq!(claims_with_roles(&["uma_authorization"]).role(), Role::User);
        // Case matters; lowercase names are not recognized
        assert_eq!(claims_with_roles(&["admin"]).role(), Role::User);
    }

    #[test]
    fn test_display_name_falls_back_to_sub() {
        let mut claims = claims_with_roles(&[]);
        claims.preferred_username = None;
        assert_eq!(claims.display_name(), "user-1");
    }

    #[test]
    fn test_deserializes_without_realm_access() {
        let claims: ProviderClaims =
            serde_json::from_str(r#"{"sub": "u", "exp": 123}"#).unwrap();
        assert!(claims.realm_access.roles.is_empty());
        assert_eq!(claims.role(), Role::User);
    }
}
