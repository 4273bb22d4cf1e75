//! HTTP API access with bearer auth and single-retry refresh handling

pub mod client;
pub mod users;

pub use client::ApiClient;
pub use users::{NewUser, UserRecord, UserUpdate};
