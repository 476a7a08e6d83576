//! Embedded stylesheet
//!
//! Hosts inject this once; it positions the layer, hides edit-mode annotations outside edit
//! mode and defines one rule block per catalog preset.

const STYLESHEET: &str = include_str!("../css/backdrop.css");

/// The stylesheet shipped with the crate.
pub fn stylesheet() -> &'static str {
    STYLESHEET
}
