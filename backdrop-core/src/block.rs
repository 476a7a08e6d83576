//! Block parsing
//!
//! A backdrop block is a fenced span of `key: value` lines:
//!
//! ```text
//! path: images/dusk.png
//! blur: 4
//! opacity: 0.6
//! style: frost
//! ```
//!
//! Parsing is total. Every input produces a fully defaulted [`BlockConfig`]; malformed lines,
//! unknown keys and invalid style names are dropped on the floor. The only condition callers
//! must act on is an empty `image_path`, which [`BlockConfig::validate`] reports as
//! [`BackdropError::MissingPath`] so the host can show it inline.
//!
//! Rules:
//! - Lines split on the first colon only, so `path: https://host/a.png` keeps its scheme.
//! - Keys are trimmed and lower-cased; values are trimmed.
//! - Later occurrences of a key overwrite earlier ones.
//! - `blur` gains a `px` unit unless it already ends in `px`/`rem` or is exactly `0`.

use crate::catalog::StyleId;
use crate::error::BackdropError;
use crate::host::PathResolver;
use serde::{Deserialize, Serialize};

pub const DEFAULT_BLUR: &str = "0px";
pub const DEFAULT_OPACITY: &str = "1";
pub const DEFAULT_SIZE: &str = "cover";
pub const DEFAULT_POSITION: &str = "center center";
pub const DEFAULT_REPEAT: &str = "no-repeat";

/// Normalized configuration of one block
///
/// Immutable once parsed. Serialized onto its marker element so the visibility tracker can
/// read it back without a side table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockConfig {
    /// Addressable image reference; empty when the path was missing or unresolved
    pub image_path: String,
    /// The `path` value as authored
    #[serde(default)]
    pub reference: String,
    pub blur: String,
    pub opacity: String,
    pub size: String,
    pub position: String,
    pub repeat: String,
    /// Per-block override of the global preference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<StyleId>,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            reference: String::new(),
            blur: DEFAULT_BLUR.to_string(),
            opacity: DEFAULT_OPACITY.to_string(),
            size: DEFAULT_SIZE.to_string(),
            position: DEFAULT_POSITION.to_string(),
            repeat: DEFAULT_REPEAT.to_string(),
            style: None,
        }
    }
}

impl BlockConfig {
    /// `Err(MissingPath)` when there is nothing to display.
    pub fn validate(&self) -> Result<(), BackdropError> {
        if self.image_path.is_empty() {
            Err(BackdropError::MissingPath(self.reference.clone()))
        } else {
            Ok(())
        }
    }

    pub fn has_blur(&self) -> bool {
        !matches!(self.blur.trim(), "" | "0" | "0px" | "0rem")
    }

    /// Style actually shown for this block.
    pub fn effective_style(&self, global_default: StyleId) -> StyleId {
        self.style.unwrap_or(global_default)
    }

    /// Last path segment of the reference, without wiki-link brackets, query or fragment.
    pub fn display_name(&self) -> String {
        let source = if self.reference.is_empty() {
            &self.image_path
        } else {
            &self.reference
        };
        let stripped = strip_wiki_link(source);
        let without_query = stripped
            .split(['?', '#'])
            .next()
            .unwrap_or(stripped)
            .trim_end_matches('/');
        without_query
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(without_query)
            .to_string()
    }
}

/// Remove `![[...]]` / `[[...]]` wrappers and a trailing `|alias`.
pub fn strip_wiki_link(reference: &str) -> &str {
    let trimmed = reference.trim();
    let inner = trimmed
        .strip_prefix('!')
        .unwrap_or(trimmed)
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"));
    match inner {
        Some(inner) => inner.split('|').next().unwrap_or(inner).trim(),
        None => trimmed,
    }
}

/// Parse one block. `context_path` is the document the block lives in; relative image
/// references are resolved against it by `resolver`.
pub fn parse_block(source: &str, context_path: &str, resolver: &dyn PathResolver) -> BlockConfig {
    let mut config = BlockConfig::default();

    for line in source.lines() {
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim();
        if key.is_empty() {
            continue;
        }

        match key.as_str() {
            "path" => {
                config.reference = value.to_string();
                config.image_path = resolver.resolve(value, context_path).unwrap_or_default();
            }
            "blur" => config.blur = normalize_blur(value),
            "opacity" => config.opacity = value.to_string(),
            "size" => config.size = value.to_string(),
            "position" => config.position = value.to_string(),
            "repeat" => config.repeat = value.to_string(),
            "style" => {
                if let Some(id) = StyleId::parse(value) {
                    config.style = Some(id);
                }
            }
            _ => {}
        }
    }

    config
}

fn normalize_blur(value: &str) -> String {
    if value.ends_with("px") || value.ends_with("rem") || value == "0" {
        value.to_string()
    } else {
        format!("{value}px")
    }
}
