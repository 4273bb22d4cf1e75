//! Authenticated HTTP client
//!
//! Wraps outbound calls with the bearer token and handles expiry: a 401
//! triggers exactly one token refresh and one retry, never more. The retried
//! response is returned as-is; a failed refresh is a terminal session expiry.

use crate::auth::{IdentityProvider, TOKEN_REFRESH_WINDOW};
use crate::error::{Error, Result};
use crate::session::SessionStore;
use reqwest::header::HeaderMap;
use reqwest::{Method, Response, StatusCode};
use std::sync::Arc;
use url::Url;

/// HTTP client for the users API.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    store: SessionStore,
    provider: Option<Arc<dyn IdentityProvider>>,
}

impl ApiClient {
    /// Create a client against `base_url`. The provider, when present, is
    /// the refresh capability used on 401 responses.
    pub fn new(
        base_url: &str,
        store: SessionStore,
        provider: Option<Arc<dyn IdentityProvider>>,
    ) -> Result<Self> {
        // A trailing slash keeps Url::join from eating the last path segment
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };
        Ok(Self {
            http: reqwest::Client::new(),
            base_url: Url::parse(&normalized)?,
            store,
            provider,
        })
    }

    /// Issue `method path` with the bearer token injected, honoring the
    /// single-refresh-single-retry contract.
    ///
    /// Caller headers are passed through untouched except for the bearer
    /// header, which is always injected when a token is available.
    pub async fn request<B: serde::Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        headers: HeaderMap,
    ) -> Result<Response> {
        let url = self.base_url.join(path)?;
        let response = self
            .send_once(&method, &url, body, &headers, self.current_token())
            .await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            let Some(provider) = &self.provider else {
                // Nothing to refresh with; the session is gone
                return Err(Error::SessionExpired);
            };
            return match provider.update_token(TOKEN_REFRESH_WINDOW).await {
                Ok(()) => {
                    self.mirror_refreshed_tokens(provider);
                    tracing::debug!("Retrying {} {} after token refresh", method, url);
                    // One retry with the fresh token, returned regardless of
                    // its status. No further refresh, no loop.
                    self.send_once(&method, &url, body, &headers, provider.token())
                        .await
                }
                Err(e) => {
                    tracing::warn!("Token refresh failed: {}", e);
                    Err(Error::SessionExpired)
                }
            };
        }

        if !response.status().is_success() {
            return Err(Error::Http {
                status: response.status().as_u16(),
            });
        }
        Ok(response)
    }

    /// GET without extra headers.
    pub async fn get(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::GET, path, None, HeaderMap::new())
            .await
    }

    /// POST a JSON body.
    pub async fn post<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::POST, path, Some(body), HeaderMap::new())
            .await
    }

    /// PUT a JSON body.
    pub async fn put<B: serde::Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Response> {
        self.request(Method::PUT, path, Some(body), HeaderMap::new())
            .await
    }

    /// DELETE without a body.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.request::<()>(Method::DELETE, path, None, HeaderMap::new())
            .await
    }

    async fn send_once<B: serde::Serialize + ?Sized>(
        &self,
        method: &Method,
        url: &Url,
        body: Option<&B>,
        headers: &HeaderMap,
        token: Option<String>,
    ) -> Result<Response> {
        let mut request = self
            .http
            .request(method.clone(), url.clone())
            .headers(headers.clone());
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Keep the persisted session copy consistent with the provider after a
    /// refresh. Memory first, storage mirrored behind it.
    fn mirror_refreshed_tokens(&self, provider: &Arc<dyn IdentityProvider>) {
        if let (Some(session), Some(token)) = (self.store.session(), provider.token()) {
            self.store
                .set_session(session.with_tokens(token, provider.refresh_token()));
        }
    }

    /// Token to attach: the provider holds the freshest copy; a demo session
    /// has none and the request goes out without a bearer header.
    fn current_token(&self) -> Option<String> {
        if let Some(provider) = &self.provider {
            if let Some(token) = provider.token() {
                return Some(token);
            }
        }
        self.store.session().and_then(|s| s.token)
    }
}
