//! Loopback callback listener for the redirect login flow
//!
//! Plays the hosting-shell role: after `begin_login` sends the user to the
//! provider, this listener waits for the provider to redirect back with the
//! authorization code, hands it to the caller, and shuts down.

use crate::error::{Error, Result};
use axum::extract::{Query, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::oneshot;
use tower_http::trace::TraceLayer;

/// How long to wait for the user to finish the provider login.
const CALLBACK_TIMEOUT: Duration = Duration::from_secs(300);

/// Parameters the provider appends to the redirect.
#[derive(Debug, Clone, Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

struct CallbackChannel {
    tx: Mutex<Option<oneshot::Sender<CallbackParams>>>,
}

async fn handle_callback(
    State(channel): State<Arc<CallbackChannel>>,
    Query(params): Query<CallbackParams>,
) -> Html<&'static str> {
    if let Some(tx) = channel.tx.lock().unwrap().take() {
        let _ = tx.send(params);
    }
    Html("<html><body><p>Login complete. You can close this window and return to the terminal.</p></body></html>")
}

/// Wait for a single authorization code on `127.0.0.1:{port}/callback`.
///
/// `expected_state` must match the state echoed by the provider; a mismatch
/// is rejected, as is a provider-reported error or a missing code.
pub async fn receive_code(port: u16, expected_state: &str) -> Result<String> {
    let (tx, rx) = oneshot::channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let channel = Arc::new(CallbackChannel {
        tx: Mutex::new(Some(tx)),
    });

    let app = Router::new()
        .route("/callback", get(handle_callback))
        .layer(TraceLayer::new_for_http())
        .with_state(channel);

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tracing::debug!("Waiting for auth callback on 127.0.0.1:{}", port);

    let server = tokio::spawn(async move {
        let _ = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await;
    });

    let params = tokio::time::timeout(CALLBACK_TIMEOUT, rx).await;
    let _ = shutdown_tx.send(());
    let _ = server.await;

    let params = params
        .map_err(|_| Error::AuthProvider("login timed out waiting for the callback".to_string()))?
        .map_err(|_| Error::AuthProvider("callback listener closed unexpectedly".to_string()))?;

    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or_default();
        return Err(Error::AuthProvider(format!("{} {}", error, detail).trim().to_string()));
    }

    match params.state.as_deref() {
        Some(state) if state == expected_state => {}
        _ => {
            return Err(Error::AuthProvider(
                "callback state did not match the login request".to_string(),
            ))
        }
    }

    params
        .code
        .ok_or_else(|| Error::AuthProvider("callback carried no authorization code".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_receives_code_from_redirect() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let waiter = tokio::spawn(async move { receive_code(port, "xyz").await });

        // Give the listener a moment to bind
        tokio::time::sleep(Duration::from_millis(100)).await;
        let url = format!("http://127.0.0.1:{}/callback?code=abc123&state=xyz", port);
        reqwest::get(&url).await.unwrap();

        let code = waiter.await.unwrap().unwrap();
        assert_eq!(code, "abc123");
    }

    #[tokio::test]
    async fn test_rejects_state_mismatch() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let waiter = tokio::spawn(async move { receive_code(port, "expected").await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let url = format!("http://127.0.0.1:{}/callback?code=abc&state=wrong", port);
        reqwest::get(&url).await.unwrap();

        let result = waiter.await.unwrap();
        assert!(matches!(result, Err(Error::AuthProvider(_))));
    }

    #[tokio::test]
    async fn test_rejects_provider_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let waiter = tokio::spawn(async move { receive_code(port, "xyz").await });

        tokio::time::sleep(Duration::from_millis(100)).await;
        let url = format!(
            "http://127.0.0.1:{}/callback?error=access_denied&state=xyz",
            port
        );
        reqwest::get(&url).await.unwrap();

        let result = waiter.await.unwrap();
        match result {
            Err(Error::AuthProvider(message)) => assert!(message.contains("access_denied")),
            other => panic!("expected AuthProvider error, got {:?}", other),
        }
    }
}
