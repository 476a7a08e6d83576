//! Shared configuration loader for backdrop.
//!
//! `defaults/backdrop.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BackdropConfig`].
//!
//! The persisted global preference is not part of this file; it lives in the JSON settings
//! record handled by [`JsonSettingsStore`].

use backdrop_core::{CoordinatorOptions, ObservationRoot, StyleId};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

mod settings;

pub use settings::JsonSettingsStore;

const DEFAULT_TOML: &str = include_str!("../defaults/backdrop.default.toml");

/// Top-level configuration consumed by backdrop applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BackdropConfig {
    pub appearance: AppearanceConfig,
    pub blocks: BlocksConfig,
    pub observer: ObserverConfig,
    pub viewport: ViewportConfig,
    pub settings: SettingsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppearanceConfig {
    pub style: StyleId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BlocksConfig {
    pub fence: String,
}

/// Threshold and root margin of the observation channel.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ObserverConfig {
    pub threshold: f64,
    pub bottom_margin: f64,
}

impl From<ObserverConfig> for ObservationRoot {
    fn from(config: ObserverConfig) -> Self {
        ObservationRoot {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
        }
    }
}

/// Geometry used when laying out rendered documents by source line.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ViewportConfig {
    pub height: f64,
    pub line_height: f64,
    pub marker_height: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SettingsConfig {
    pub path: PathBuf,
}

impl BackdropConfig {
    /// Coordinator options derived from the `[blocks]` and `[observer]` tables.
    pub fn coordinator_options(&self) -> CoordinatorOptions {
        CoordinatorOptions {
            fence: self.blocks.fence.clone(),
            observer: self.observer.into(),
        }
    }

    /// Range checks that deserialization alone cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let observer = &self.observer;
        if !(0.0..=1.0).contains(&observer.threshold) {
            return Err(invalid(
                "observer.threshold",
                "must be between 0 and 1",
                observer.threshold,
            ));
        }
        if !(0.0..1.0).contains(&observer.bottom_margin) {
            return Err(invalid(
                "observer.bottom_margin",
                "must be at least 0 and below 1",
                observer.bottom_margin,
            ));
        }
        for (key, value) in [
            ("viewport.height", self.viewport.height),
            ("viewport.line_height", self.viewport.line_height),
            ("viewport.marker_height", self.viewport.marker_height),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(invalid(key, "must be a positive number", value));
            }
        }
        if self.blocks.fence.trim().is_empty() {
            return Err(ConfigError::Message("blocks.fence must not be empty".to_string()));
        }
        Ok(())
    }

    /// Settings store at the configured path, falling back to `[appearance] style`.
    pub fn settings_store(&self) -> JsonSettingsStore {
        JsonSettingsStore::new(&self.settings.path, self.appearance.style)
    }
}

fn invalid(key: &str, rule: &str, value: f64) -> ConfigError {
    ConfigError::Message(format!("{key} {rule} (got {value})"))
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder, deserialize, and reject values the engine cannot use.
    pub fn build(self) -> Result<BackdropConfig, ConfigError> {
        let config: BackdropConfig = self.builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BackdropConfig, ConfigError> {
    Loader::new().build()
}
