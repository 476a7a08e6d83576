//! Line-based layout
//!
//! Places markers by source line: a marker sits at `(line - 1) * line_height`, where `line` is
//! the `data-line` of its nearest annotated ancestor. Markers outside the given container are
//! not laid out, which is how hidden views drop out of observation.

use crate::dom;
use crate::viewport::{Layout, Span};
use markup5ever_rcdom::Handle;
use std::rc::Rc;

pub const LINE_ATTR: &str = "data-line";

#[derive(Debug, Clone)]
pub struct LineLayout {
    container: Handle,
    line_height: f64,
    marker_height: f64,
}

impl LineLayout {
    pub fn new(container: &Handle, line_height: f64, marker_height: f64) -> Self {
        Self {
            container: container.clone(),
            line_height,
            marker_height,
        }
    }

    /// Document offset of a 1-based source line.
    pub fn offset_of_line(&self, line: usize) -> f64 {
        line.saturating_sub(1) as f64 * self.line_height
    }
}

impl Layout for LineLayout {
    fn span_of(&self, marker: &Handle) -> Option<Span> {
        let mut line = None;
        let mut current = Some(marker.clone());
        while let Some(node) = current {
            if Rc::ptr_eq(&node, &self.container) {
                let line: usize = line?;
                return Some(Span::new(self.offset_of_line(line), self.marker_height));
            }
            if line.is_none() {
                line = dom::attr(&node, LINE_ATTR).and_then(|raw| raw.parse().ok());
            }
            current = dom::parent(&node);
        }
        None
    }
}
