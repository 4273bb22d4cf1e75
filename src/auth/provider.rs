//! Identity provider capability
//!
//! The provider performs the actual credential verification and token
//! issuance; this application only consumes the capability surface below and
//! never looks inside the protocol.

use crate::auth::claims::ProviderClaims;
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use url::Url;

/// The first phase of the redirect login flow: a URL for the user to visit,
/// plus the state value the callback must echo back.
#[derive(Debug, Clone)]
pub struct AuthorizationRequest {
    pub url: Url,
    pub state: String,
    /// Where the provider will deliver the authorization code.
    pub redirect_uri: String,
}

/// External identity provider boundary.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Build the authorization request that starts the redirect flow.
    fn begin_login(&self) -> Result<AuthorizationRequest>;

    /// Exchange the authorization code delivered to the callback for tokens.
    async fn exchange_code(&self, code: &str, redirect_uri: &str) -> Result<()>;

    /// Terminate the provider-side session.
    async fn end_session(&self) -> Result<()>;

    /// Refresh the token if it expires within `min_validity`.
    /// A token with more remaining validity is left alone.
    async fn update_token(&self, min_validity: Duration) -> Result<()>;

    /// Seed the provider with previously persisted token material.
    fn adopt_tokens(&self, token: String, refresh_token: Option<String>);

    /// Whether the provider currently holds a token.
    fn authenticated(&self) -> bool;

    /// Current access token, if any.
    fn token(&self) -> Option<String>;

    /// Current refresh token, if any.
    fn refresh_token(&self) -> Option<String>;

    /// Claims parsed from the current access token, if any.
    fn claims(&self) -> Option<ProviderClaims>;
}
