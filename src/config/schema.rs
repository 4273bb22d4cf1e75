//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Identity provider connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider
    #[serde(default = "default_provider_url")]
    pub url: String,

    /// Realm to authenticate against
    #[serde(default = "default_realm")]
    pub realm: String,

    /// Client identifier registered with the provider
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// Loopback port for the login callback
    #[serde(default = "default_callback_port")]
    pub callback_port: u16,
}

fn default_provider_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_realm() -> String {
    "admin-console".to_string()
}

fn default_client_id() -> String {
    "admin-console".to_string()
}

fn default_callback_port() -> u16 {
    8917
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            url: default_provider_url(),
            realm: default_realm(),
            client_id: default_client_id(),
            callback_port: default_callback_port(),
        }
    }
}

/// Users API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the users API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

/// Local state storage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path of the JSON state file
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./.admin-console/state.json")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}
