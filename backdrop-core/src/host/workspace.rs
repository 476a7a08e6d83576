//! In-memory workspace host
//!
//! Holds an `RcDom` shaped like a document editor's window:
//!
//! ```text
//! <html><body>
//!   <div class="workspace-leaf" data-path="notes/a.md">
//!     <div class="markdown-preview-view">...</div>
//!   </div>
//!   ...
//! </body></html>
//! ```
//!
//! Only one leaf is active at a time. Clones share the same tree and active view.

use super::ViewHost;
use crate::dom;
use markup5ever_rcdom::{Handle, RcDom};
use std::cell::RefCell;
use std::rc::Rc;

pub const LEAF_CLASS: &str = "workspace-leaf";
pub const CONTAINER_CLASS: &str = "markdown-preview-view";
pub const ACTIVE_CLASS: &str = "is-active";

#[derive(Clone)]
pub struct Workspace {
    dom: Rc<RcDom>,
    body: Handle,
    active: Rc<RefCell<Option<Handle>>>,
}

impl Workspace {
    pub fn new() -> Self {
        let dom = RcDom::default();
        let html = dom::element("html", vec![]);
        let body = dom::element("body", vec![]);
        dom::append(&dom.document, html.clone());
        dom::append(&html, body.clone());
        Self {
            dom: Rc::new(dom),
            body,
            active: Rc::new(RefCell::new(None)),
        }
    }

    pub fn document(&self) -> Handle {
        self.dom.document.clone()
    }

    pub fn body(&self) -> Handle {
        self.body.clone()
    }

    /// Mount `container` as a new leaf for `path` and make it active.
    ///
    /// Returns the `(previous, next)` containers for the view-switch notification.
    pub fn open(&self, path: &str, container: Handle) -> (Option<Handle>, Option<Handle>) {
        let leaf = dom::element("div", vec![("class", LEAF_CLASS), ("data-path", path)]);
        dom::append(&leaf, container.clone());
        dom::append(&self.body, leaf);
        self.activate(&container)
    }

    /// Make an already mounted container the active one.
    pub fn activate(&self, container: &Handle) -> (Option<Handle>, Option<Handle>) {
        let previous = self.active.borrow_mut().replace(container.clone());
        if let Some(prev_leaf) = previous.as_ref().and_then(dom::parent) {
            dom::remove_class(&prev_leaf, ACTIVE_CLASS);
        }
        if let Some(leaf) = dom::parent(container) {
            dom::add_class(&leaf, ACTIVE_CLASS);
        }
        (previous, Some(container.clone()))
    }

    /// Unmount the leaf holding `container`. Markers inside it become stale.
    pub fn close(&self, container: &Handle) {
        if let Some(leaf) = dom::parent(container) {
            dom::detach(&leaf);
        }
        let mut active = self.active.borrow_mut();
        if active.as_ref().is_some_and(|a| Rc::ptr_eq(a, container)) {
            *active = None;
        }
    }

    /// Containers of all mounted leaves, in mount order.
    pub fn containers(&self) -> Vec<Handle> {
        dom::element_children(&self.body)
            .iter()
            .filter(|leaf| dom::has_class(leaf, LEAF_CLASS))
            .filter_map(|leaf| dom::find_child_with_class(leaf, CONTAINER_CLASS))
            .collect()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewHost for Workspace {
    fn current_container(&self) -> Option<Handle> {
        self.active.borrow().clone()
    }

    fn workspace(&self) -> Option<Handle> {
        Some(self.body.clone())
    }
}
