//! Style resolution and application
//!
//! Turns an active [`BlockConfig`] into render tree state on the current view container:
//!
//! ```text
//! <div class="markdown-preview-view backdrop-enabled style-frost">
//!   <div class="backdrop-layer" style="background-image: url(&quot;...&quot;); ..."></div>
//!   ...document content...
//! </div>
//! ```
//!
//! Every operation converges: [`apply`] fully supersedes whatever an earlier call left behind,
//! and [`reset`] strips everything [`apply`] can add. Only this module writes the layer
//! element and the style classes.

use crate::block::BlockConfig;
use crate::catalog::{self, StyleId};
use crate::dom;
use markup5ever_rcdom::Handle;

/// State class marking a container that shows a background.
pub const ENABLED_CLASS: &str = "backdrop-enabled";
/// Class of the background layer element.
pub const LAYER_CLASS: &str = "backdrop-layer";
/// Cross-fade between consecutive backgrounds.
pub const LAYER_TRANSITION: &str = "background-image 0.6s ease, opacity 0.6s ease, filter 0.6s ease";

/// Show `config` on `container`, using `global_default` unless the block overrides the style.
pub fn apply(container: &Handle, config: &BlockConfig, global_default: StyleId) {
    if config.validate().is_err() {
        log::debug!("refusing to apply a block without an image");
        return;
    }

    dom::add_class(container, ENABLED_CLASS);
    set_style_class(container, config.effective_style(global_default));

    let layer = ensure_layer(container);
    dom::set_style(
        &layer,
        &[
            ("background-image", css_url(&config.image_path)),
            ("background-size", config.size.clone()),
            ("background-position", config.position.clone()),
            ("background-repeat", config.repeat.clone()),
            ("opacity", config.opacity.clone()),
            ("filter", format!("blur({})", config.blur)),
            ("transition", LAYER_TRANSITION.to_string()),
        ],
    );
    log::debug!(
        "applied '{}' with style {}",
        config.display_name(),
        config.effective_style(global_default)
    );
}

/// Remove everything [`apply`] adds to `container`.
pub fn reset(container: &Handle) {
    dom::remove_class(container, ENABLED_CLASS);
    dom::remove_classes(container, catalog::all_class_names());
    while let Some(layer) = dom::find_child_with_class(container, LAYER_CLASS) {
        dom::detach(&layer);
    }
}

/// Put only the global default style class on the workspace body.
pub fn apply_global_default(workspace: &Handle, preference: StyleId) {
    set_style_class(workspace, preference);
}

/// Strip every class and layer this crate may have added anywhere below `root`.
pub fn teardown(root: &Handle) {
    for node in dom::descendants(root) {
        if dom::has_class(&node, LAYER_CLASS) {
            dom::detach(&node);
            continue;
        }
        dom::remove_class(&node, ENABLED_CLASS);
        dom::remove_classes(&node, catalog::all_class_names());
    }
}

/// The layer currently shown in `container`, if any.
pub fn layer_of(container: &Handle) -> Option<Handle> {
    dom::find_child_with_class(container, LAYER_CLASS)
}

fn set_style_class(node: &Handle, style: StyleId) {
    dom::remove_classes(node, catalog::all_class_names());
    dom::add_class(node, &style.class_name());
}

/// Find or create the single layer and keep it as the first child. Extra layers are dropped.
fn ensure_layer(container: &Handle) -> Handle {
    let mut layers = dom::element_children(container)
        .into_iter()
        .filter(|child| dom::has_class(child, LAYER_CLASS));
    let Some(layer) = layers.next() else {
        let layer = dom::element("div", vec![("class", LAYER_CLASS)]);
        dom::prepend(container, layer.clone());
        return layer;
    };
    for extra in layers {
        dom::detach(&extra);
    }

    let is_first = container
        .children
        .borrow()
        .first()
        .is_some_and(|first| std::rc::Rc::ptr_eq(first, &layer));
    if !is_first {
        dom::prepend(container, layer.clone());
    }
    layer
}

fn css_url(path: &str) -> String {
    let escaped = path.replace('\\', "\\\\").replace('"', "\\\"");
    format!("url(\"{escaped}\")")
}
