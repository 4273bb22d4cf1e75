//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "admin-console.toml";

/// Load configuration from admin-console.toml
pub fn load_config() -> Result<Config> {
    match find_config_file() {
        Ok(config_path) => load_config_from_path(&config_path),
        // No file means defaults; the console works against localhost out of
        // the box
        Err(Error::ConfigNotFound) => Ok(Config::default()),
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // This regex is a compile-time constant, panicking is acceptable here
    // as it indicates a programming error in the codebase, not a runtime issue
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Admin Console Configuration

[provider]
url = "${AUTH_PROVIDER_URL:-http://localhost:8081}"
realm = "admin-console"
client_id = "admin-console"
callback_port = 8917

[api]
base_url = "${API_BASE_URL:-http://localhost:3001}"

[storage]
path = "./.admin-console/state.json"
"#
}
