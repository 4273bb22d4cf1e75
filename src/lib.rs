//! Admin console - role-gated user management over an external identity provider
//!
//! This is the library interface for the admin console: session state,
//! access decisions, the authenticated API client, and the terminal shell.

pub mod access;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod prefs;
pub mod session;
pub mod storage;
pub mod ui;

pub use config::Config;
pub use error::Error;
pub use session::{Role, Session};
