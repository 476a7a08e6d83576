//! Parser totality over arbitrary input.

use crate::common::identity;
use backdrop_core::block::{BlockConfig, DEFAULT_OPACITY};
use backdrop_core::catalog;
use backdrop_core::parse_block;
use proptest::prelude::*;

proptest! {
    #[test]
    fn parse_never_panics_and_blur_has_a_unit(source in ".*") {
        let config = parse_block(&source, "doc.md", &identity);
        prop_assert!(
            config.blur == "0" || config.blur.ends_with("px") || config.blur.ends_with("rem")
        );
        if let Some(style) = config.style {
            prop_assert!(catalog::is_valid(style.as_str()));
        }
    }

    #[test]
    fn text_without_colons_keeps_defaults(source in "[^:]*") {
        let config = parse_block(&source, "doc.md", &identity);
        prop_assert_eq!(config, BlockConfig::default());
    }

    #[test]
    fn last_opacity_wins(first in "[0-9.]{1,4}", second in "[0-9.]{1,4}") {
        let source = format!("opacity: {first}\npath: x.png\nopacity: {second}");
        let config = parse_block(&source, "doc.md", &identity);
        prop_assert_eq!(config.opacity, second);
        prop_assert_ne!(config.image_path.as_str(), "");
    }
}

#[test]
fn opacity_default_is_one() {
    assert_eq!(parse_block("", "doc.md", &identity).opacity, DEFAULT_OPACITY);
}
