//! Global preference and its persistence seam

use crate::catalog::StyleId;
use crate::error::BackdropError;
use serde::{Deserialize, Deserializer, Serialize};

/// Document-wide default style, used when a block does not pick its own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GlobalPreference {
    #[serde(default, deserialize_with = "lenient_style")]
    pub style: StyleId,
}

impl GlobalPreference {
    pub fn new(style: StyleId) -> Self {
        Self { style }
    }

    /// Build from a stored raw value; unknown or missing values fall back to `fallback`.
    pub fn from_stored(raw: Option<&str>, fallback: StyleId) -> Self {
        let style = match raw {
            Some(raw) => StyleId::parse(raw).unwrap_or_else(|| {
                log::debug!("ignoring stored style '{raw}'");
                fallback
            }),
            None => fallback,
        };
        Self { style }
    }
}

/// Unknown identifiers deserialize to the default instead of failing the whole record.
fn lenient_style<'de, D>(deserializer: D) -> Result<StyleId, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(GlobalPreference::from_stored(raw.as_deref(), StyleId::default()).style)
}

/// Loads and persists the global preference
pub trait SettingsStore {
    /// Stored preference merged over the defaults. Never fails.
    fn load(&self) -> GlobalPreference;

    fn save(&mut self, preference: &GlobalPreference) -> Result<(), BackdropError>;
}

/// Keeps the preference in memory
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    stored: Option<GlobalPreference>,
    saves: usize,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(preference: GlobalPreference) -> Self {
        Self {
            stored: Some(preference),
            saves: 0,
        }
    }

    /// Number of successful saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl SettingsStore for MemorySettings {
    fn load(&self) -> GlobalPreference {
        self.stored.unwrap_or_default()
    }

    fn save(&mut self, preference: &GlobalPreference) -> Result<(), BackdropError> {
        self.stored = Some(*preference);
        self.saves += 1;
        Ok(())
    }
}
