//! Provider-backed login flow tests
//!
//! Exercises the two-phase flow against a KeycloakProvider seeded with
//! locally minted tokens, so no provider needs to be running.

use admin_console::auth::{AuthService, IdentityProvider, KeycloakProvider, ProviderClaims, RealmAccess};
use admin_console::config::ProviderConfig;
use admin_console::session::{Role, Session, SessionStore};
use admin_console::storage::{Storage, USER_KEY};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::sync::Arc;
use tempfile::tempdir;

fn provider_config() -> ProviderConfig {
    ProviderConfig {
        url: "http://localhost:8081".to_string(),
        realm: "admin-console".to_string(),
        client_id: "admin-console".to_string(),
        callback_port: 8917,
    }
}

fn minted_token(roles: &[&str], expires_in: i64) -> String {
    let claims = ProviderClaims {
        sub: "f3a2-user".to_string(),
        preferred_username: Some("alice".to_string()),
        exp: chrono::Utc::now().timestamp() + expires_in,
        realm_access: RealmAccess {
            roles: roles.iter().map(|r| r.to_string()).collect(),
        },
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"test-secret"),
    )
    .unwrap()
}

fn service_with_provider(
    dir: &tempfile::TempDir,
) -> (AuthService, Arc<KeycloakProvider>) {
    let store = SessionStore::new(Storage::open(dir.path().join("state.json")));
    let provider = Arc::new(KeycloakProvider::new(provider_config()));
    let auth = AuthService::with_provider(store, provider.clone());
    (auth, provider)
}

#[tokio::test]
async fn test_callback_populates_session_from_claims() {
    let dir = tempdir().unwrap();
    let (auth, provider) = service_with_provider(&dir);

    provider.adopt_tokens(minted_token(&["Admin"], 300), Some("refresh-1".to_string()));
    let session = auth.on_auth_callback().unwrap();

    assert_eq!(session.id, "f3a2-user");
    assert_eq!(session.username, "alice");
    assert_eq!(session.role, Role::Admin);
    assert!(session.token.is_some());
    assert_eq!(session.refresh_token.as_deref(), Some("refresh-1"));

    // Mirrored to storage under the `user` key
    let persisted: Option<Session> = auth.store().storage().get(USER_KEY).unwrap();
    assert_eq!(persisted, Some(session));
}

#[tokio::test]
async fn test_role_precedence_superadmin_first_match_wins() {
    let dir = tempdir().unwrap();
    let (auth, provider) = service_with_provider(&dir);

    provider.adopt_tokens(
        minted_token(&["User", "Admin", "SuperAdmin"], 300),
        None,
    );
    let session = auth.on_auth_callback().unwrap();
    assert_eq!(session.role, Role::SuperAdmin);
}

#[tokio::test]
async fn test_unrecognized_roles_default_to_user() {
    let dir = tempdir().unwrap();
    let (auth, provider) = service_with_provider(&dir);

    provider.adopt_tokens(
        minted_token(&["offline_access", "uma_authorization"], 300),
        None,
    );
    let session = auth.on_auth_callback().unwrap();
    assert_eq!(session.role, Role::User);
}

#[tokio::test]
async fn test_initialize_discards_unrefreshable_provider_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    // Persist a provider session whose token is expired and has no refresh
    // token, so the startup handshake cannot revive it
    {
        let store = SessionStore::new(Storage::open(&path));
        store.set_session(
            Session::new("f3a2-user", "alice", Role::Admin)
                .with_tokens(minted_token(&["Admin"], -60), None),
        );
    }

    let store = SessionStore::restore(Storage::open(&path));
    let provider = Arc::new(KeycloakProvider::new(provider_config()));
    let auth = AuthService::with_provider(store, provider);
    auth.initialize().await;

    let state = auth.store().snapshot();
    assert!(state.initialized);
    assert!(state.session.is_none());
    assert!(!auth.store().storage().contains(USER_KEY).unwrap());
}

#[tokio::test]
async fn test_initialize_keeps_valid_provider_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = SessionStore::new(Storage::open(&path));
        store.set_session(
            Session::new("f3a2-user", "alice", Role::Admin)
                .with_tokens(minted_token(&["Admin"], 600), None),
        );
    }

    let store = SessionStore::restore(Storage::open(&path));
    let provider = Arc::new(KeycloakProvider::new(provider_config()));
    let auth = AuthService::with_provider(store, provider.clone());
    auth.initialize().await;

    let state = auth.store().snapshot();
    assert!(state.initialized);
    assert!(state.session.is_some());
    // The provider now holds the adopted token
    assert!(provider.authenticated());
}

#[tokio::test]
async fn test_initialize_leaves_demo_session_alone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    {
        let store = SessionStore::new(Storage::open(&path));
        store.set_session(Session::new("1", "demo", Role::SuperAdmin));
    }

    let store = SessionStore::restore(Storage::open(&path));
    let provider = Arc::new(KeycloakProvider::new(provider_config()));
    let auth = AuthService::with_provider(store, provider);
    auth.initialize().await;

    let state = auth.store().snapshot();
    assert!(state.initialized);
    assert_eq!(state.session.map(|s| s.username), Some("demo".to_string()));
}
