//! Session lifecycle and persistence tests

use admin_console::auth::AuthService;
use admin_console::error::Error;
use admin_console::session::{Role, Session, SessionStore};
use admin_console::storage::{Storage, USER_KEY};
use tempfile::tempdir;

#[tokio::test]
async fn test_demo_login_produces_superadmin_session() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(Storage::open(dir.path().join("state.json")));
    let auth = AuthService::demo(store);
    auth.initialize().await;

    let session = auth.login_demo("demo", "password").unwrap();
    assert_eq!(session.role, Role::SuperAdmin);
    assert_eq!(session.username, "demo");
    assert_eq!(session.id, "1");
}

#[tokio::test]
async fn test_wrong_credentials_leave_session_null() {
    let dir = tempdir().unwrap();
    let store = SessionStore::new(Storage::open(dir.path().join("state.json")));
    let auth = AuthService::demo(store);
    auth.initialize().await;

    let result = auth.login_demo("demo", "wrong");
    assert!(matches!(result, Err(Error::InvalidCredentials)));
    assert!(auth.store().session().is_none());
    assert!(!auth.store().storage().contains(USER_KEY).unwrap());
}

#[tokio::test]
async fn test_persist_and_restore_reproduce_identical_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");

    let original = {
        let store = SessionStore::new(Storage::open(&path));
        let auth = AuthService::demo(store);
        auth.initialize().await;
        auth.login_demo("demo", "password").unwrap()
    };

    // Cold start: a fresh store rehydrates from the same file
    let restored = SessionStore::restore(Storage::open(&path));
    assert_eq!(restored.session(), Some(original.clone()));

    // Persisting the restored session again changes nothing
    restored.set_session(restored.session().unwrap());
    let again = SessionStore::restore(Storage::open(&path));
    assert_eq!(again.session(), Some(original));
}

#[tokio::test]
async fn test_logout_clears_memory_and_storage() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = SessionStore::new(Storage::open(&path));
    let auth = AuthService::demo(store);
    auth.initialize().await;

    auth.login_demo("demo", "password").unwrap();
    assert!(auth.store().storage().contains(USER_KEY).unwrap());

    auth.logout().await.unwrap();
    assert!(auth.store().session().is_none());
    assert!(!auth.store().storage().contains(USER_KEY).unwrap());

    // A cold start after logout comes up unauthenticated
    let restored = SessionStore::restore(Storage::open(&path));
    assert!(restored.session().is_none());
}

#[test]
fn test_storage_is_cache_not_truth() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state.json");
    let store = SessionStore::new(Storage::open(&path));

    store.set_session(Session::new("1", "demo", Role::SuperAdmin));

    // Someone scribbles over the storage file behind our back; the in-memory
    // value stays canonical
    std::fs::write(&path, "{}").unwrap();
    assert_eq!(
        store.session().map(|s| s.username),
        Some("demo".to_string())
    );
}

#[test]
fn test_preferences_survive_alongside_session() {
    use admin_console::prefs::{Language, Preferences, Theme};

    let dir = tempdir().unwrap();
    let storage = Storage::open(dir.path().join("state.json"));
    let store = SessionStore::new(storage.clone());
    let prefs = Preferences::new(storage);

    prefs.set_theme(Theme::Dark).unwrap();
    prefs.set_language(Language::De).unwrap();
    store.set_session(Session::new("1", "demo", Role::SuperAdmin));
    store.clear_session();

    // Clearing the session removes only the `user` key
    assert_eq!(prefs.theme(), Theme::Dark);
    assert_eq!(prefs.language(), Language::De);
}
