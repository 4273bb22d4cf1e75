//! Keycloak-style OIDC identity provider
//!
//! Speaks the standard `openid-connect` endpoints of a realm: authorization
//! URL construction, code-for-token exchange, refresh grants, and session
//! termination. Claims are decoded from the access token payload without
//! signature verification: this process is the token's audience, not its
//! verifier, and the API backend performs the real validation.

use crate::auth::claims::ProviderClaims;
use crate::auth::provider::{AuthorizationRequest, IdentityProvider};
use crate::config::ProviderConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::RwLock;
use std::time::Duration;
use url::Url;
use uuid::Uuid;

/// Token material held between calls.
#[derive(Debug, Clone)]
struct TokenSet {
    access_token: String,
    refresh_token: Option<String>,
}

/// Response of the token endpoint for both the code and refresh grants.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
}

/// Identity provider backed by a Keycloak-style realm.
pub struct KeycloakProvider {
    config: ProviderConfig,
    http: reqwest::Client,
    tokens: RwLock<Option<TokenSet>>,
}

impl KeycloakProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            tokens: RwLock::new(None),
        }
    }

    fn realm_endpoint(&self, suffix: &str) -> Result<Url> {
        let base = format!(
            "{}/realms/{}/protocol/openid-connect/{}",
            self.config.url.trim_end_matches('/'),
            self.config.realm,
            suffix
        );
        Ok(Url::parse(&base)?)
    }

    fn redirect_uri(&self) -> String {
        format!("http://127.0.0.1:{}/callback", self.config.callback_port)
    }

    fn decode_claims(&self, token: &str) -> Option<ProviderClaims> {
        match jsonwebtoken::dangerous::insecure_decode::<ProviderClaims>(token) {
            Ok(data) => Some(data.claims),
            Err(e) => {
                tracing::debug!("Could not decode access token claims: {}", e);
                None
            }
        }
    }

    fn store_tokens(&self, response: TokenResponse) {
        let mut tokens = self.tokens.write().unwrap();
        // A refresh response may omit the refresh token; keep the old one then
        let refresh_token = response
            .refresh_token
            .or_else(|| tokens.as_ref().and_then(|t| t.refresh_token.clone()));
        *tokens = Some(TokenSet {
            access_token: response.access_token,
            refresh_token,
        });
    }
}

#[async_trait]
impl IdentityProvider for KeycloakProvider {
    fn begin_login(&self) -> Result<AuthorizationRequest> {
        let state = Uuid::new_v4().to_string();
        let redirect_uri = self.redirect_uri();
        let mut url = self.realm_endpoint("auth")?;
        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", "openid")
            .append_pair("state", &state);
        Ok(AuthorizationRequest {
            url,
            state,
            redirect_uri,
        })
    }

    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<()> {
        let response = self
            .http
            .post(self.realm_endpoint("token")?)
            .form(&[
                ("grant_type", "authorization_code"),
                ("client_id", self.config.client_id.as_str()),
                ("code", code),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .map_err(|e| Error::AuthProvider(format!("token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::AuthProvider(format!(
                "token exchange rejected with status {}",
                response.status().as_u16()
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::AuthProvider(format!("malformed token response: {}", e)))?;
        self.store_tokens(tokens);
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        let refresh_token = {
            let mut tokens = self.tokens.write().unwrap();
            match tokens.take() {
                Some(set) => set.refresh_token,
                None => return Ok(()),
            }
        };

        let Some(refresh_token) = refresh_token else {
            return Ok(());
        };

        let response = self
            .http
            .post(self.realm_endpoint("logout")?)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::AuthProvider(format!("logout failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::AuthProvider(format!(
                "logout rejected with status {}",
                response.status().as_u16()
            )));
        }
        Ok(())
    }

    async fn update_token(&self, min_validity: Duration) -> Result<()> {
        let (needs_refresh, refresh_token) = {
            let tokens = self.tokens.read().unwrap();
            let Some(set) = tokens.as_ref() else {
                return Err(Error::TokenRefresh("no token to refresh".to_string()));
            };
            let now = chrono::Utc::now().timestamp();
            let needs_refresh = match self.decode_claims(&set.access_token) {
                Some(claims) => {
                    claims.seconds_until_expiry(now) <= min_validity.as_secs() as i64
                }
                // An undecodable expiry means refresh now
                None => true,
            };
            (needs_refresh, set.refresh_token.clone())
        };

        if !needs_refresh {
            return Ok(());
        }

        let refresh_token =
            refresh_token.ok_or_else(|| Error::TokenRefresh("no refresh token".to_string()))?;

        let response = self
            .http
            .post(self.realm_endpoint("token")?)
            .form(&[
                ("grant_type", "refresh_token"),
                ("client_id", self.config.client_id.as_str()),
                ("refresh_token", refresh_token.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::TokenRefresh(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::TokenRefresh(format!(
                "refresh rejected with status {}",
                response.status().as_u16()
            )));
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::TokenRefresh(format!("malformed refresh response: {}", e)))?;
        self.store_tokens(tokens);
        tracing::debug!("Access token refreshed");
        Ok(())
    }

    fn adopt_tokens(&self, token: String, refresh_token: Option<String>) {
        let mut tokens = self.tokens.write().unwrap();
        *tokens = Some(TokenSet {
            access_token: token,
            refresh_token,
        });
    }

    fn authenticated(&self) -> bool {
        self.tokens.read().unwrap().is_some()
    }

    fn token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap()
            .as_ref()
            .map(|t| t.access_token.clone())
    }

    fn refresh_token(&self) -> Option<String> {
        self.tokens
            .read()
            .unwrap()
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    fn claims(&self) -> Option<ProviderClaims> {
        let token = self.token()?;
        self.decode_claims(&token)
    }
}
