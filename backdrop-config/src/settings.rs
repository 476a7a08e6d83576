//! JSON-file persistence for the global preference.
//!
//! The record is a single object, `{"style": "<id>"}`. Loading never fails: a missing file,
//! unreadable JSON, or an unknown identifier all yield the configured fallback.

use backdrop_core::{BackdropError, GlobalPreference, SettingsStore, StyleId};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct JsonSettingsStore {
    path: PathBuf,
    fallback: StyleId,
}

impl JsonSettingsStore {
    pub fn new(path: impl AsRef<Path>, fallback: StyleId) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            fallback,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsStore {
    fn load(&self) -> GlobalPreference {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                log::debug!("no settings at {}: {err}", self.path.display());
                return GlobalPreference::new(self.fallback);
            }
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(value) => {
                GlobalPreference::from_stored(value.get("style").and_then(Value::as_str), self.fallback)
            }
            Err(err) => {
                log::warn!("ignoring unreadable settings {}: {err}", self.path.display());
                GlobalPreference::new(self.fallback)
            }
        }
    }

    fn save(&mut self, preference: &GlobalPreference) -> Result<(), BackdropError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(preference)
            .map_err(|err| BackdropError::Settings(err.to_string()))?;
        fs::write(&self.path, json)?;
        log::debug!("saved style {} to {}", preference.style, self.path.display());
        Ok(())
    }
}
