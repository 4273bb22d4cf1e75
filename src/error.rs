//! Error types for the admin console

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Identity provider error: {0}")]
    AuthProvider(String),

    #[error("Token refresh failed: {0}")]
    TokenRefresh(String),

    #[error("Session expired. Please login again.")]
    SessionExpired,

    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'admin-console init' first.")]
    ConfigNotFound,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("User '{0}' not found")]
    UserNotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
