//! Theme and language preference glue
//!
//! Thin wrappers over the `theme` and `language` storage keys. Unreadable or
//! absent values fall back to the defaults rather than erroring.

use crate::storage::{Storage, LANGUAGE_KEY, THEME_KEY};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Display theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    Auto,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => write!(f, "light"),
            Theme::Dark => write!(f, "dark"),
            Theme::Auto => write!(f, "auto"),
        }
    }
}

/// Interface language preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    De,
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::En => write!(f, "en"),
            Language::De => write!(f, "de"),
        }
    }
}

/// Preference accessors over a storage handle.
#[derive(Debug, Clone)]
pub struct Preferences {
    storage: Storage,
}

impl Preferences {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn theme(&self) -> Theme {
        self.storage.get(THEME_KEY).ok().flatten().unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> crate::error::Result<()> {
        self.storage.put(THEME_KEY, &theme)
    }

    pub fn language(&self) -> Language {
        self.storage.get(LANGUAGE_KEY).ok().flatten().unwrap_or_default()
    }

    pub fn set_language(&self, language: Language) -> crate::error::Result<()> {
        self.storage.put(LANGUAGE_KEY, &language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_unset() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(Storage::open(dir.path().join("state.json")));
        assert_eq!(prefs.theme(), Theme::Auto);
        assert_eq!(prefs.language(), Language::En);
    }

    #[test]
    fn test_set_and_get() {
        let dir = tempdir().unwrap();
        let prefs = Preferences::new(Storage::open(dir.path().join("state.json")));
        prefs.set_theme(Theme::Dark).unwrap();
        prefs.set_language(Language::De).unwrap();
        assert_eq!(prefs.theme(), Theme::Dark);
        assert_eq!(prefs.language(), Language::De);
    }

    #[test]
    fn test_unreadable_value_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.json");
        std::fs::write(&path, r#"{"theme": 42}"#).unwrap();
        let prefs = Preferences::new(Storage::open(&path));
        assert_eq!(prefs.theme(), Theme::Auto);
    }
}
