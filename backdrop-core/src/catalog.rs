//! Style catalog
//!
//! The closed registry of named presentation presets. Every other component asks this module
//! for labels, class names and validation, so adding a preset only means adding a variant here
//! (plus its rule block in `css/backdrop.css`).
//!
//! | Identifier | Label | Class         |
//! |------------|-------|---------------|
//! | `glass`    | Glass | `style-glass` |
//! | `frost`    | Frost | `style-frost` |
//! | `mist`     | Mist  | `style-mist`  |
//! | `crisp`    | Crisp | `style-crisp` |
//! | `card`     | Card  | `style-card`  |
//! | `float`    | Float | `style-float` |
//! | `zen`      | Zen   | `style-zen`   |
//! | `off`      | Off   | `style-off`   |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Prefix shared by every style class.
pub const CLASS_PREFIX: &str = "style-";

/// Named presentation preset for the text container
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    /// Translucent panel over the image (hard-coded default)
    #[default]
    Glass,
    Frost,
    Mist,
    Crisp,
    Card,
    Float,
    Zen,
    /// Image only, no panel treatment
    Off,
}

/// Declaration order; drives every listing and selection UI.
const ALL_STYLES: [StyleId; 8] = [
    StyleId::Glass,
    StyleId::Frost,
    StyleId::Mist,
    StyleId::Crisp,
    StyleId::Card,
    StyleId::Float,
    StyleId::Zen,
    StyleId::Off,
];

static ALL_CLASS_NAMES: Lazy<Vec<String>> =
    Lazy::new(|| ALL_STYLES.iter().map(|id| id.class_name()).collect());

impl StyleId {
    /// The identifier as written in blocks and settings.
    pub fn as_str(self) -> &'static str {
        match self {
            StyleId::Glass => "glass",
            StyleId::Frost => "frost",
            StyleId::Mist => "mist",
            StyleId::Crisp => "crisp",
            StyleId::Card => "card",
            StyleId::Float => "float",
            StyleId::Zen => "zen",
            StyleId::Off => "off",
        }
    }

    /// Human readable label for settings UIs.
    pub fn label(self) -> &'static str {
        match self {
            StyleId::Glass => "Glass",
            StyleId::Frost => "Frost",
            StyleId::Mist => "Mist",
            StyleId::Crisp => "Crisp",
            StyleId::Card => "Card",
            StyleId::Float => "Float",
            StyleId::Zen => "Zen",
            StyleId::Off => "Off",
        }
    }

    /// CSS class applied to containers and the workspace body.
    pub fn class_name(self) -> String {
        format!("{CLASS_PREFIX}{}", self.as_str())
    }

    /// Narrow a raw string to a known identifier. Case and surrounding whitespace are ignored.
    pub fn parse(raw: &str) -> Option<Self> {
        let wanted = raw.trim().to_ascii_lowercase();
        ALL_STYLES.iter().copied().find(|id| id.as_str() == wanted)
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no catalog entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStyle(pub String);

impl fmt::Display for UnknownStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let valid: Vec<&str> = ALL_STYLES.iter().map(|id| id.as_str()).collect();
        write!(
            f,
            "Unknown style '{}' (expected one of: {})",
            self.0,
            valid.join(", ")
        )
    }
}

impl std::error::Error for UnknownStyle {}

impl FromStr for StyleId {
    type Err = UnknownStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StyleId::parse(s).ok_or_else(|| UnknownStyle(s.to_string()))
    }
}

pub fn label_of(id: StyleId) -> &'static str {
    id.label()
}

pub fn class_of(id: StyleId) -> String {
    id.class_name()
}

/// Whether `raw` names a catalog entry.
pub fn is_valid(raw: &str) -> bool {
    StyleId::parse(raw).is_some()
}

/// All identifiers in declaration order.
pub fn all_identifiers() -> &'static [StyleId] {
    &ALL_STYLES
}

/// Every style class, used for bulk removal.
pub fn all_class_names() -> &'static [String] {
    &ALL_CLASS_NAMES
}

/// One aligned `id  label  class` line per identifier.
pub fn describe() -> String {
    let mut out = String::new();
    for id in all_identifiers() {
        out.push_str(&format!(
            "{:<6} {:<6} {}\n",
            id.as_str(),
            id.label(),
            id.class_name()
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    #[test]
    fn class_names_are_derived_from_identifiers() {
        assert_eq!(class_of(StyleId::Frost), "style-frost");
        assert_eq!(label_of(StyleId::Off), "Off");
    }

    #[test]
    fn parse_ignores_case_and_whitespace() {
        assert_eq!(StyleId::parse("  Crisp "), Some(StyleId::Crisp));
        assert_eq!("ZEN".parse::<StyleId>(), Ok(StyleId::Zen));
    }

    #[test]
    fn unknown_values_are_rejected() {
        assert!(!is_valid("neon"));
        assert!(!is_valid(""));
        let err = "neon".parse::<StyleId>().unwrap_err();
        assert!(err.to_string().contains("glass, frost"));
    }

    #[test]
    fn identifiers_keep_declaration_order() {
        let names: Vec<&str> = all_identifiers().iter().map(|id| id.as_str()).collect();
        assert_eq!(
            names,
            vec!["glass", "frost", "mist", "crisp", "card", "float", "zen", "off"]
        );
    }

    #[test]
    fn class_set_covers_every_identifier() {
        assert_eq!(all_class_names().len(), all_identifiers().len());
        assert!(all_class_names().contains(&"style-zen".to_string()));
    }

    #[test]
    fn default_is_glass() {
        assert_eq!(StyleId::default(), StyleId::Glass);
    }

    #[test]
    fn serde_uses_lowercase_identifiers() {
        let json = serde_json::to_string(&StyleId::Float).unwrap();
        assert_eq!(json, "\"float\"");
        let back: StyleId = serde_json::from_str("\"mist\"").unwrap();
        assert_eq!(back, StyleId::Mist);
    }

    #[test]
    fn describe_lists_every_style() {
        assert_snapshot!(describe().trim_end(), @r"
        glass  Glass  style-glass
        frost  Frost  style-frost
        mist   Mist   style-mist
        crisp  Crisp  style-crisp
        card   Card   style-card
        float  Float  style-float
        zen    Zen    style-zen
        off    Off    style-off
        ");
    }
}
