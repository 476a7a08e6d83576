//! Shared harness: an in-memory workspace driven through the coordinator the way a host would.

use backdrop_core::host::{render_markdown, LineLayout, Workspace};
use backdrop_core::{Coordinator, CoordinatorOptions, Handle, MemorySettings, Viewport};

pub const LINE_HEIGHT: f64 = 24.0;
pub const VIEWPORT_HEIGHT: f64 = 800.0;

/// Resolves every non-empty reference to itself.
pub fn identity(reference: &str, _context: &str) -> Option<String> {
    (!reference.is_empty()).then(|| reference.to_string())
}

/// Two blocks far apart: the first uses the global style, the second overrides it.
pub fn two_block_document() -> String {
    let mut doc = String::from("# Journey\n\n```backdrop\npath: a.png\n```\n\n");
    for i in 0..60 {
        doc.push_str(&format!("Paragraph {i} of the first section.\n\n"));
    }
    doc.push_str("```backdrop\npath: b.png\nstyle: crisp\n```\n\nThe end.\n");
    doc
}

pub struct OpenedDocument {
    pub container: Handle,
    pub block_lines: Vec<usize>,
}

pub struct Harness {
    pub workspace: Workspace,
    pub coordinator: Coordinator,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_settings(MemorySettings::new())
    }

    pub fn with_settings(settings: MemorySettings) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        let workspace = Workspace::new();
        let mut coordinator = Coordinator::new(
            Box::new(workspace.clone()),
            Box::new(identity),
            Box::new(settings),
            CoordinatorOptions::default(),
        );
        coordinator.start();
        Self {
            workspace,
            coordinator,
        }
    }

    /// Render, mount and activate a document, then feed its blocks to the coordinator.
    pub fn open(&mut self, path: &str, source: &str) -> OpenedDocument {
        let rendered = render_markdown(source, self.coordinator.fence());
        let (previous, next) = self.workspace.open(path, rendered.container.clone());
        self.coordinator
            .on_view_switch(previous.as_ref(), next.as_ref());
        for block in &rendered.blocks {
            self.coordinator.on_block(&block.text, &block.target, path);
        }
        OpenedDocument {
            container: rendered.container,
            block_lines: rendered.blocks.iter().map(|b| b.line).collect(),
        }
    }

    /// Scroll the document so `line` sits `lead` pixels below the top of the viewport.
    pub fn scroll_to_line(&mut self, doc: &OpenedDocument, line: usize, lead: f64) {
        let layout = LineLayout::new(&doc.container, LINE_HEIGHT, LINE_HEIGHT);
        let top = (layout.offset_of_line(line) - lead).max(0.0);
        self.coordinator
            .on_scroll(Viewport::new(top, VIEWPORT_HEIGHT), &layout);
    }
}
