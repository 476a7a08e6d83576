//! Lifecycle coordination
//!
//! Wires the pieces to the host's three event sources:
//!
//! 1. Block renders: parse, then either register a marker or show an inline error.
//! 2. Intersection batches: select the active block and apply it to the current container.
//! 3. View switches: reset containers and fall back to the global default.
//!
//! Every handler is total. Nothing here returns an error to the host; failures are logged and
//! absorbed, and a missing container simply makes the call a no-op until the next event.

use crate::block::{parse_block, BlockConfig};
use crate::catalog::StyleId;
use crate::dom;
use crate::host::{PathResolver, ViewHost};
use crate::resolver;
use crate::settings::{GlobalPreference, SettingsStore};
use crate::tracker::{IntersectionEntry, VisibilityTracker};
use crate::viewport::{Layout, ObservationRoot, Viewport};
use markup5ever_rcdom::Handle;

pub const DEFAULT_FENCE: &str = "backdrop";
pub const MARKER_CLASS: &str = "backdrop-marker";
pub const INFO_CLASS: &str = "backdrop-info";
pub const ERROR_CLASS: &str = "backdrop-error";

#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Info string of the fenced blocks this coordinator handles
    pub fence: String,
    pub observer: ObservationRoot,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            fence: DEFAULT_FENCE.to_string(),
            observer: ObservationRoot::default(),
        }
    }
}

/// What happened to a rendered block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockOutcome {
    /// Marker created and observed
    Registered(BlockConfig),
    /// No usable image; an inline error was rendered instead
    MissingPath(BlockConfig),
}

pub struct Coordinator {
    host: Box<dyn ViewHost>,
    resolver: Box<dyn PathResolver>,
    store: Box<dyn SettingsStore>,
    options: CoordinatorOptions,
    preference: GlobalPreference,
    tracker: VisibilityTracker,
}

impl Coordinator {
    pub fn new(
        host: Box<dyn ViewHost>,
        resolver: Box<dyn PathResolver>,
        store: Box<dyn SettingsStore>,
        options: CoordinatorOptions,
    ) -> Self {
        let tracker = VisibilityTracker::new(options.observer);
        Self {
            host,
            resolver,
            store,
            options,
            preference: GlobalPreference::default(),
            tracker,
        }
    }

    pub fn fence(&self) -> &str {
        &self.options.fence
    }

    pub fn preference(&self) -> GlobalPreference {
        self.preference
    }

    pub fn tracker(&self) -> &VisibilityTracker {
        &self.tracker
    }

    /// Load the preference, show it globally and open the observation channel.
    pub fn start(&mut self) {
        self.preference = self.store.load();
        self.apply_global_default();
        self.tracker.connect();
        log::debug!("started with global style {}", self.preference.style);
    }

    /// Handle one rendered block.
    pub fn on_block(&mut self, text: &str, target: &Handle, context_path: &str) -> BlockOutcome {
        let config = parse_block(text, context_path, self.resolver.as_ref());

        if let Err(err) = config.validate() {
            let error = dom::element("div", vec![("class", ERROR_CLASS)]);
            dom::append(&error, dom::text(&err.to_string()));
            dom::append(target, error);
            log::debug!("block in '{context_path}' rendered as error: {err}");
            return BlockOutcome::MissingPath(config);
        }

        let marker = dom::element("div", vec![("class", MARKER_CLASS)]);
        dom::append(target, marker.clone());
        dom::append(target, info_annotation(&config));
        self.tracker.register(&marker, &config);
        BlockOutcome::Registered(config)
    }

    /// Apply the block selected from a delivered batch, if any.
    pub fn on_intersections(&mut self, batch: &[IntersectionEntry]) {
        let Some(config) = self.tracker.select(batch) else {
            return;
        };
        match self.host.current_container() {
            Some(container) => resolver::apply(&container, &config, self.preference.style),
            None => log::debug!("no active container; skipping apply"),
        }
    }

    /// Observe the current layout and react to the resulting batch.
    pub fn on_scroll(&mut self, viewport: Viewport, layout: &dyn Layout) {
        let batch = self.tracker.observe(viewport, layout);
        if !batch.is_empty() {
            self.on_intersections(&batch);
        }
    }

    /// Reset both containers and the tracker's reported state, then show only the global default.
    pub fn on_view_switch(&mut self, previous: Option<&Handle>, next: Option<&Handle>) {
        if let Some(previous) = previous {
            resolver::reset(previous);
        }
        if let Some(next) = next {
            resolver::reset(next);
        }
        // Re-report every marker on the next observation.
        self.tracker.invalidate();
        self.apply_global_default();
    }

    /// Change the global preference from the settings UI.
    pub fn set_style(&mut self, style: StyleId) {
        self.preference.style = style;
        if let Err(err) = self.store.save(&self.preference) {
            log::warn!("could not persist style preference: {err}");
        }
        self.apply_global_default();
    }

    /// Re-add the workspace-wide default class.
    pub fn apply_global_default(&self) {
        match self.host.workspace() {
            Some(workspace) => resolver::apply_global_default(&workspace, self.preference.style),
            None => log::debug!("no workspace element; skipping global style"),
        }
    }

    /// Disconnect observation and strip everything this crate added. Safe to call at any time.
    pub fn teardown(&mut self) {
        self.tracker.disconnect();
        if let Some(workspace) = self.host.workspace() {
            resolver::teardown(&workspace);
        }
        if let Some(container) = self.host.current_container() {
            resolver::reset(&container);
        }
        log::debug!("torn down");
    }
}

/// Edit-mode annotation naming the image (and blur when set).
fn info_annotation(config: &BlockConfig) -> Handle {
    let mut label = config.display_name();
    if config.has_blur() {
        label.push_str(&format!(" · blur {}", config.blur));
    }
    let info = dom::element("div", vec![("class", INFO_CLASS)]);
    dom::append(&info, dom::text(&label));
    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::Workspace;
    use crate::settings::MemorySettings;

    fn identity(reference: &str, _context: &str) -> Option<String> {
        (!reference.is_empty()).then(|| reference.to_string())
    }

    fn coordinator(ws: &Workspace) -> Coordinator {
        Coordinator::new(
            Box::new(ws.clone()),
            Box::new(identity),
            Box::new(MemorySettings::new()),
            CoordinatorOptions::default(),
        )
    }

    #[test]
    fn start_applies_global_style() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.start();
        assert!(dom::has_class(&ws.body(), "style-glass"));
        assert!(coord.tracker().is_connected());
    }

    #[test]
    fn block_with_path_gets_marker_and_info() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.start();
        let target = dom::element("div", vec![]);

        let outcome = coord.on_block("path: img/a.png\nblur: 3", &target, "doc.md");
        assert!(matches!(outcome, BlockOutcome::Registered(_)));
        let children = dom::element_children(&target);
        assert!(dom::has_class(&children[0], MARKER_CLASS));
        assert_eq!(dom::text_content(&children[1]), "a.png · blur 3px");
        assert_eq!(coord.tracker().observed_count(), 1);
    }

    #[test]
    fn info_omits_zero_blur() {
        let config = BlockConfig {
            image_path: "a.png".to_string(),
            reference: "a.png".to_string(),
            ..BlockConfig::default()
        };
        assert_eq!(dom::text_content(&info_annotation(&config)), "a.png");
    }

    #[test]
    fn block_without_path_renders_error() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.start();
        let target = dom::element("div", vec![]);

        let outcome = coord.on_block("blur: 3", &target, "doc.md");
        assert!(matches!(outcome, BlockOutcome::MissingPath(_)));
        assert!(dom::has_class(&dom::element_children(&target)[0], ERROR_CLASS));
        assert_eq!(coord.tracker().observed_count(), 0);
    }

    #[test]
    fn set_style_persists_and_updates_body() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.start();
        coord.set_style(StyleId::Zen);

        assert_eq!(coord.preference().style, StyleId::Zen);
        assert!(dom::has_class(&ws.body(), "style-zen"));
        assert!(!dom::has_class(&ws.body(), "style-glass"));
    }

    #[test]
    fn teardown_before_start_is_harmless() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.teardown();
        coord.teardown();
        assert!(dom::classes(&ws.body()).is_empty());
    }

    #[test]
    fn intersections_without_container_are_ignored() {
        let ws = Workspace::new();
        let mut coord = coordinator(&ws);
        coord.start();
        let target = dom::element("div", vec![]);
        dom::append(&ws.body(), target.clone());
        coord.on_block("path: a.png", &target, "doc.md");
        let marker = dom::element_children(&target)[0].clone();

        coord.on_intersections(&[IntersectionEntry::new(&marker, 1.0, true)]);
        assert!(dom::descendants(&ws.body())
            .iter()
            .all(|n| !dom::has_class(n, resolver::LAYER_CLASS)));
    }
}
