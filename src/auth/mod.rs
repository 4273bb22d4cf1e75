//! Authentication: demo credentials and the provider-backed redirect flow

pub mod callback;
pub mod claims;
pub mod keycloak;
pub mod provider;

pub use claims::{ProviderClaims, RealmAccess};
pub use keycloak::KeycloakProvider;
pub use provider::{AuthorizationRequest, IdentityProvider};

use crate::error::{Error, Result};
use crate::session::{Role, Session, SessionStore};
use std::sync::Arc;
use std::time::Duration;

/// Refresh look-ahead window: a token expiring within this window is
/// refreshed before reuse.
pub const TOKEN_REFRESH_WINDOW: Duration = Duration::from_secs(30);

/// The fixed demo credential pair.
const DEMO_USERNAME: &str = "demo";
const DEMO_PASSWORD: &str = "password";

/// Drives login and logout against the session store.
///
/// Two variants share one service: the demo variant validates the fixed
/// credential pair locally, the provider variant delegates verification to
/// the external identity provider through the two-phase redirect flow.
#[derive(Clone)]
pub struct AuthService {
    store: SessionStore,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl AuthService {
    /// Demo-only service; no identity provider involved.
    pub fn demo(store: SessionStore) -> Self {
        Self {
            store,
            provider: None,
        }
    }

    /// Provider-backed service.
    pub fn with_provider(store: SessionStore, provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            store,
            provider: Some(provider),
        }
    }

    /// Complete the startup handshake.
    ///
    /// For the provider variant this hands persisted token material back to
    /// the provider and validates it with one refresh; a rehydrated session
    /// whose tokens can no longer be refreshed is discarded. The demo variant
    /// has nothing to do. Either way the store is marked initialized when
    /// this returns, and consumers may start trusting access decisions.
    pub async fn initialize(&self) {
        if let Some(provider) = &self.provider {
            if let Some(session) = self.store.session() {
                match session.token.clone() {
                    Some(token) => {
                        provider.adopt_tokens(token, session.refresh_token.clone());
                        if let Err(e) = provider.update_token(TOKEN_REFRESH_WINDOW).await {
                            tracing::warn!("Persisted session is no longer valid: {}", e);
                            self.store.clear_session();
                        } else {
                            self.refresh_session_tokens();
                        }
                    }
                    // A persisted demo session carries no tokens; leave it be
                    None => {}
                }
            }
        }
        self.store.mark_initialized();
    }

    /// Demo-credential login. Validates the fixed pair synchronously; on
    /// success installs a SuperAdmin session, on failure leaves the current
    /// state untouched.
    pub fn login_demo(&self, username: &str, password: &str) -> Result<Session> {
        if username != DEMO_USERNAME || password != DEMO_PASSWORD {
            return Err(Error::InvalidCredentials);
        }
        let session = Session::new("1", DEMO_USERNAME, Role::SuperAdmin);
        self.store.set_session(session.clone());
        tracing::info!("Demo login for '{}'", DEMO_USERNAME);
        Ok(session)
    }

    /// First phase of the provider login: build the authorization request.
    /// The shell is responsible for navigation and for delivering the
    /// callback code to [`AuthService::complete_login`].
    pub fn begin_login(&self) -> Result<AuthorizationRequest> {
        self.require_provider()?.begin_login()
    }

    /// Second phase: exchange the callback code and populate the session.
    pub async fn complete_login(&self, code: &str, redirect_uri: &str) -> Result<Session> {
        let provider = self.require_provider()?;
        provider.exchange_code(code, redirect_uri).await?;
        self.on_auth_callback()
    }

    /// Observe a successful provider authentication and derive the session
    /// from its claims.
    pub fn on_auth_callback(&self) -> Result<Session> {
        let provider = self.require_provider()?;
        let claims = provider.claims().ok_or_else(|| {
            Error::AuthProvider("provider produced no readable claims".to_string())
        })?;
        let token = provider.token().ok_or_else(|| {
            Error::AuthProvider("provider produced no access token".to_string())
        })?;

        let session = Session::new(claims.sub.clone(), claims.display_name(), claims.role())
            .with_tokens(token, provider.refresh_token());
        self.store.set_session(session.clone());
        tracing::info!(
            "Provider login for '{}' with role {}",
            session.username,
            session.role
        );
        Ok(session)
    }

    /// Clear the session, remove the storage entry, and (provider variant)
    /// end the provider-side session. The local state is cleared even when
    /// the provider notification fails.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear_session();
        if let Some(provider) = &self.provider {
            provider.end_session().await?;
        }
        tracing::info!("Logged out");
        Ok(())
    }

    /// Re-mirror the provider's current token material into the session.
    /// Called after refreshes so the persisted copy stays usable.
    pub fn refresh_session_tokens(&self) {
        let Some(provider) = &self.provider else {
            return;
        };
        let (Some(session), Some(token)) = (self.store.session(), provider.token()) else {
            return;
        };
        self.store
            .set_session(session.with_tokens(token, provider.refresh_token()));
    }

    /// The session store this service mutates.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// The identity provider, if this service has one.
    pub fn provider(&self) -> Option<Arc<dyn IdentityProvider>> {
        self.provider.clone()
    }

    fn require_provider(&self) -> Result<&Arc<dyn IdentityProvider>> {
        self.provider
            .as_ref()
            .ok_or_else(|| Error::AuthProvider("no identity provider configured".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{Storage, USER_KEY};
    use tempfile::tempdir;

    fn demo_service(dir: &tempfile::TempDir) -> AuthService {
        let store = SessionStore::new(Storage::open(dir.path().join("state.json")));
        AuthService::demo(store)
    }

    #[test]
    fn test_demo_login_success() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        let session = service.login_demo("demo", "password").unwrap();

        assert_eq!(session.role, Role::SuperAdmin);
        assert_eq!(session.username, "demo");
        assert!(session.token.is_none());
        assert_eq!(service.store().session(), Some(session));
    }

    #[test]
    fn test_demo_login_wrong_password() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        let result = service.login_demo("demo", "wrong");

        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(service.store().session().is_none());
    }

    #[test]
    fn test_failed_login_leaves_existing_session_untouched() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        service.login_demo("demo", "password").unwrap();

        let result = service.login_demo("demo", "nope");
        assert!(matches!(result, Err(Error::InvalidCredentials)));
        assert!(service.store().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_session_and_storage() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        service.login_demo("demo", "password").unwrap();

        service.logout().await.unwrap();
        assert!(service.store().session().is_none());
        assert!(!service.store().storage().contains(USER_KEY).unwrap());
    }

    #[tokio::test]
    async fn test_demo_initialize_is_instant() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        assert!(!service.store().snapshot().initialized);
        service.initialize().await;
        assert!(service.store().snapshot().initialized);
    }

    #[test]
    fn test_begin_login_requires_a_provider() {
        let dir = tempdir().unwrap();
        let service = demo_service(&dir);
        assert!(matches!(
            service.begin_login(),
            Err(Error::AuthProvider(_))
        ));
    }
}
