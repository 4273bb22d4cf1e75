//! Session state holder
//!
//! Owns the canonical in-memory session and notifies subscribers on every
//! change. Mutations are mirrored to durable storage under the `user` key,
//! strictly after the in-memory update; mirror failures are logged and never
//! surfaced to the caller.

use crate::session::model::Session;
use crate::storage::{Storage, USER_KEY};
use tokio::sync::watch;

/// Snapshot of the authentication state, as seen by consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    /// False until the owning auth service completes its handshake.
    /// Consumers must treat this as "decision deferred", not "unauthenticated".
    pub initialized: bool,
    /// The current session, if any. `None` means unauthenticated.
    pub session: Option<Session>,
}

impl SessionState {
    /// Whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Holds the canonical session with subscribe/notify semantics.
///
/// Cloning shares the same underlying state, so a store can be handed to the
/// API client, the guard layer, and the shell without ambient globals.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tx: watch::Sender<SessionState>,
    storage: Storage,
}

impl SessionStore {
    /// Create an empty, uninitialized store.
    pub fn new(storage: Storage) -> Self {
        let (tx, _rx) = watch::channel(SessionState {
            initialized: false,
            session: None,
        });
        Self { tx, storage }
    }

    /// Create a store rehydrated from durable storage.
    ///
    /// An unreadable storage entry is treated as no session; cold start must
    /// never fail on a bad cache.
    pub fn restore(storage: Storage) -> Self {
        let session = match storage.get::<Session>(USER_KEY) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Ignoring unreadable persisted session: {}", e);
                None
            }
        };
        let (tx, _rx) = watch::channel(SessionState {
            initialized: false,
            session,
        });
        Self { tx, storage }
    }

    /// Current state snapshot.
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.tx.borrow().session.clone()
    }

    /// Whether a session is present.
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().session.is_some()
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Install a new session and mirror it to storage.
    pub fn set_session(&self, session: Session) {
        self.tx.send_modify(|state| {
            state.session = Some(session.clone());
        });
        // Memory is truth; the storage write comes after and is best-effort.
        if let Err(e) = self.storage.put(USER_KEY, &session) {
            tracing::warn!("Failed to persist session: {}", e);
        }
    }

    /// Clear the session and remove the storage entry.
    pub fn clear_session(&self) {
        self.tx.send_modify(|state| {
            state.session = None;
        });
        if let Err(e) = self.storage.remove(USER_KEY) {
            tracing::warn!("Failed to remove persisted session: {}", e);
        }
    }

    /// Mark the auth handshake as complete.
    pub fn mark_initialized(&self) {
        self.tx.send_modify(|state| {
            state.initialized = true;
        });
    }

    /// The storage this store mirrors into.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}
