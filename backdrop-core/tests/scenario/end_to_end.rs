//! Scroll through a two-block document and switch away from it.

use crate::common::{two_block_document, Harness};
use backdrop_core::dom;
use backdrop_core::resolver::{self, ENABLED_CLASS};
use backdrop_core::Handle;

fn style_classes(node: &Handle) -> Vec<String> {
    dom::classes(node)
        .into_iter()
        .filter(|c| c.starts_with("style-"))
        .collect()
}

fn layer_image(container: &Handle) -> Option<String> {
    resolver::layer_of(container).and_then(|layer| dom::style_property(&layer, "background-image"))
}

fn layer_count(container: &Handle) -> usize {
    dom::element_children(container)
        .iter()
        .filter(|c| dom::has_class(c, resolver::LAYER_CLASS))
        .count()
}

#[test]
fn background_follows_the_reader() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    assert_eq!(doc.block_lines.len(), 2);

    // Nothing intersected yet: only the global preset shows.
    assert_eq!(style_classes(&h.workspace.body()), vec!["style-glass"]);
    assert!(style_classes(&doc.container).is_empty());
    assert!(!dom::has_class(&doc.container, ENABLED_CLASS));
    assert!(resolver::layer_of(&doc.container).is_none());

    // First block reaches reading position.
    h.scroll_to_line(&doc, 1, 0.0);
    assert!(dom::has_class(&doc.container, ENABLED_CLASS));
    assert_eq!(style_classes(&doc.container), vec!["style-glass"]);
    assert_eq!(layer_image(&doc.container).as_deref(), Some("url(\"a.png\")"));

    // Second block, with its own preset.
    h.scroll_to_line(&doc, doc.block_lines[1], 100.0);
    assert_eq!(style_classes(&doc.container), vec!["style-crisp"]);
    assert_eq!(layer_image(&doc.container).as_deref(), Some("url(\"b.png\")"));
    assert_eq!(layer_count(&doc.container), 1);

    // Switching documents resets the old container but keeps the global preset.
    h.open("other.md", "# Other\n\nNo blocks here.\n");
    assert!(style_classes(&doc.container).is_empty());
    assert!(!dom::has_class(&doc.container, ENABLED_CLASS));
    assert!(resolver::layer_of(&doc.container).is_none());
    assert_eq!(style_classes(&h.workspace.body()), vec!["style-glass"]);
}

#[test]
fn block_in_lower_half_does_not_take_over() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&doc, 1, 0.0);

    // Second block is on screen, but below the middle.
    h.scroll_to_line(&doc, doc.block_lines[1], 600.0);
    assert_eq!(layer_image(&doc.container).as_deref(), Some("url(\"a.png\")"));
    assert_eq!(style_classes(&doc.container), vec!["style-glass"]);
}

#[test]
fn scrolling_back_up_restores_first_block() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&doc, 1, 0.0);
    h.scroll_to_line(&doc, doc.block_lines[1], 100.0);
    h.scroll_to_line(&doc, 1, 0.0);

    assert_eq!(layer_image(&doc.container).as_deref(), Some("url(\"a.png\")"));
    assert_eq!(style_classes(&doc.container), vec!["style-glass"]);
    assert_eq!(layer_count(&doc.container), 1);
}

#[test]
fn repeated_scroll_events_leave_identical_tree() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&doc, 1, 0.0);
    let before = dom::to_html(&h.workspace.body()).unwrap();
    h.scroll_to_line(&doc, 1, 0.0);
    h.scroll_to_line(&doc, 2, 0.0);
    assert_eq!(dom::to_html(&h.workspace.body()).unwrap(), before);
}

#[test]
fn global_preference_applies_to_blocks_without_style() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    h.coordinator.set_style(backdrop_core::StyleId::Zen);
    h.scroll_to_line(&doc, 1, 0.0);

    assert_eq!(style_classes(&h.workspace.body()), vec!["style-zen"]);
    assert_eq!(style_classes(&doc.container), vec!["style-zen"]);
}
