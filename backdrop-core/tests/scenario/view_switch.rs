//! View switches, unmounted documents and teardown.

use crate::common::{two_block_document, Harness};
use backdrop_core::dom;
use backdrop_core::lifecycle::{ERROR_CLASS, MARKER_CLASS};
use backdrop_core::resolver::{self, ENABLED_CLASS, LAYER_CLASS};
use backdrop_core::{GlobalPreference, IntersectionEntry, MemorySettings, StyleId};

#[test]
fn returning_to_a_document_starts_fresh() {
    let mut h = Harness::new();
    let first = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&first, first.block_lines[1], 100.0);
    h.open("other.md", "Plain.\n");

    let (previous, next) = h.workspace.activate(&first.container);
    h.coordinator
        .on_view_switch(previous.as_ref(), next.as_ref());
    assert!(resolver::layer_of(&first.container).is_none());

    h.scroll_to_line(&first, 1, 0.0);
    let layer = resolver::layer_of(&first.container).expect("layer after scrolling");
    assert_eq!(
        dom::style_property(&layer, "background-image").as_deref(),
        Some("url(\"a.png\")")
    );
}

#[test]
fn returning_at_the_same_position_restores_the_background() {
    let mut h = Harness::new();
    let first = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&first, 1, 0.0);
    assert!(resolver::layer_of(&first.container).is_some());

    h.open("other.md", "Plain.\n");
    let (previous, next) = h.workspace.activate(&first.container);
    h.coordinator
        .on_view_switch(previous.as_ref(), next.as_ref());
    assert!(resolver::layer_of(&first.container).is_none());

    // Same reading position as before the switch.
    h.scroll_to_line(&first, 1, 0.0);
    let layer = resolver::layer_of(&first.container).expect("layer after returning");
    assert_eq!(
        dom::style_property(&layer, "background-image").as_deref(),
        Some("url(\"a.png\")")
    );
    assert!(dom::has_class(&first.container, ENABLED_CLASS));

    // Further scrolling within the same block keeps it.
    h.scroll_to_line(&first, 2, 0.0);
    assert!(resolver::layer_of(&first.container).is_some());
}

#[test]
fn notifications_for_unmounted_markers_are_ignored() {
    let mut h = Harness::new();
    let first = h.open("journey.md", &two_block_document());
    let markers: Vec<_> = dom::descendants(&first.container)
        .into_iter()
        .filter(|n| dom::has_class(n, MARKER_CLASS))
        .collect();
    assert_eq!(markers.len(), 2);

    let second = h.open("other.md", "Plain.\n");
    h.workspace.close(&first.container);
    h.coordinator
        .on_intersections(&[IntersectionEntry::new(&markers[0], 1.0, true)]);

    assert!(resolver::layer_of(&second.container).is_none());
    assert!(!dom::has_class(&second.container, ENABLED_CLASS));
}

#[test]
fn missing_paths_render_inline_errors() {
    let mut h = Harness::new();
    let doc = h.open(
        "broken.md",
        "```backdrop\nblur: 4\n```\n\n```backdrop\npath: ok.png\n```\n",
    );
    let errors: Vec<_> = dom::descendants(&doc.container)
        .into_iter()
        .filter(|n| dom::has_class(n, ERROR_CLASS))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(h.coordinator.tracker().observed_count(), 1);
}

#[test]
fn stored_preference_is_loaded_on_start() {
    let h = Harness::with_settings(MemorySettings::with(GlobalPreference::new(StyleId::Mist)));
    assert_eq!(h.coordinator.preference().style, StyleId::Mist);
    assert!(dom::has_class(&h.workspace.body(), "style-mist"));
}

#[test]
fn teardown_removes_all_state() {
    let mut h = Harness::new();
    let doc = h.open("journey.md", &two_block_document());
    h.scroll_to_line(&doc, 1, 0.0);

    h.coordinator.teardown();
    let leftovers = dom::descendants(&h.workspace.body())
        .into_iter()
        .filter(|n| {
            dom::has_class(n, LAYER_CLASS)
                || dom::has_class(n, ENABLED_CLASS)
                || dom::classes(n).iter().any(|c| c.starts_with("style-"))
        })
        .count();
    assert_eq!(leftovers, 0);
    assert!(!h.coordinator.tracker().is_connected());

    // Events after teardown change nothing.
    h.scroll_to_line(&doc, 1, 0.0);
    assert!(resolver::layer_of(&doc.container).is_none());
}
