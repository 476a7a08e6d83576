//! Headless render of one or more documents into a standalone HTML page.
//!
//! Drives the same coordinator a host would: each document is opened as a new view (which
//! resets the previous one), its blocks are fed in order, and the last document is scrolled to
//! each requested line.

use backdrop_config::BackdropConfig;
use backdrop_core::host::{render_markdown, LineLayout, PathResolver, Workspace};
use backdrop_core::{
    css, dom, BackdropError, BlockOutcome, Coordinator, GlobalPreference, Handle, MemorySettings,
    SettingsStore, StyleId, Viewport,
};
use std::fs;

/// One document to open, with the path blocks resolve relative to.
pub struct Document {
    pub path: String,
    pub source: String,
}

impl Document {
    pub fn read(path: &str) -> Result<Self, BackdropError> {
        let source = fs::read_to_string(path)
            .map_err(|err| BackdropError::Io(format!("reading '{path}': {err}")))?;
        Ok(Self {
            path: path.to_string(),
            source,
        })
    }
}

pub struct Snapshot {
    workspace: Workspace,
    coordinator: Coordinator,
    config: BackdropConfig,
    last: Option<Handle>,
    errors: usize,
}

impl Snapshot {
    /// `style` overrides the stored preference for this render only.
    pub fn new(
        config: BackdropConfig,
        resolver: Box<dyn PathResolver>,
        style: Option<StyleId>,
    ) -> Self {
        let stored = config.settings_store().load();
        let preference = style.map(GlobalPreference::new).unwrap_or(stored);
        let workspace = Workspace::new();
        let mut coordinator = Coordinator::new(
            Box::new(workspace.clone()),
            resolver,
            Box::new(MemorySettings::with(preference)),
            config.coordinator_options(),
        );
        coordinator.start();
        Self {
            workspace,
            coordinator,
            config,
            last: None,
            errors: 0,
        }
    }

    pub fn open(&mut self, document: &Document) {
        let rendered = render_markdown(&document.source, self.coordinator.fence());
        let (previous, next) = self.workspace.open(&document.path, rendered.container.clone());
        self.coordinator
            .on_view_switch(previous.as_ref(), next.as_ref());

        for block in &rendered.blocks {
            let outcome = self
                .coordinator
                .on_block(&block.text, &block.target, &document.path);
            if let BlockOutcome::MissingPath(config) = outcome {
                self.errors += 1;
                log::warn!(
                    "{}:{}: {}",
                    document.path,
                    block.line,
                    BackdropError::MissingPath(config.reference)
                );
            }
        }
        self.last = Some(rendered.container);
    }

    /// Put `line` of the last opened document at the top of the viewport.
    pub fn scroll_to(&mut self, line: usize) {
        let Some(container) = &self.last else {
            return;
        };
        let viewport = &self.config.viewport;
        let layout = LineLayout::new(container, viewport.line_height, viewport.marker_height);
        let top = layout.offset_of_line(line);
        self.coordinator
            .on_scroll(Viewport::new(top, viewport.height), &layout);
    }

    /// Blocks that rendered as inline errors so far.
    pub fn errors(&self) -> usize {
        self.errors
    }

    pub fn to_html(&self) -> Result<String, BackdropError> {
        let body = dom::to_html(&self.workspace.body())?;
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<style>\n{}</style>\n</head>\n{}\n</html>\n",
            css::stylesheet(),
            body
        ))
    }
}
