//! Visibility tracking
//!
//! One observation channel watches every registered marker. Each marker carries its own
//! [`BlockConfig`] as JSON in the `data-backdrop` attribute, so registration and lookup can
//! never drift apart.
//!
//! Selection is deliberately simple: among the entries of one notification batch, the first
//! intersecting marker in delivery order wins. No geometric ranking is attempted. An empty
//! selection leaves the current background untouched.

use crate::block::BlockConfig;
use crate::dom;
use crate::viewport::{Layout, ObservationRoot, Viewport};
use markup5ever_rcdom::{Handle, WeakHandle};
use std::rc::Rc;

/// Attribute holding the serialized block configuration.
pub const CONFIG_ATTR: &str = "data-backdrop";

/// One change notification for an observed marker
#[derive(Debug, Clone)]
pub struct IntersectionEntry {
    pub marker: WeakHandle,
    pub ratio: f64,
    pub is_intersecting: bool,
}

impl IntersectionEntry {
    pub fn new(marker: &Handle, ratio: f64, is_intersecting: bool) -> Self {
        Self {
            marker: Rc::downgrade(marker),
            ratio,
            is_intersecting,
        }
    }
}

#[derive(Debug)]
struct Observed {
    marker: WeakHandle,
    /// Last reported state; `None` until the first observation
    last: Option<bool>,
}

/// Tracks registered markers and picks the active block
#[derive(Debug)]
pub struct VisibilityTracker {
    root: ObservationRoot,
    observed: Vec<Observed>,
    connected: bool,
}

impl VisibilityTracker {
    pub fn new(root: ObservationRoot) -> Self {
        Self {
            root,
            observed: Vec::new(),
            connected: false,
        }
    }

    /// Open the observation channel. Idempotent.
    pub fn connect(&mut self) {
        self.connected = true;
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn root(&self) -> ObservationRoot {
        self.root
    }

    /// Number of live observed markers.
    pub fn observed_count(&self) -> usize {
        self.observed
            .iter()
            .filter(|o| o.marker.upgrade().is_some())
            .count()
    }

    /// Store `config` on `marker` and start observing it.
    pub fn register(&mut self, marker: &Handle, config: &BlockConfig) {
        match serde_json::to_string(config) {
            Ok(json) => dom::set_attr(marker, CONFIG_ATTR, &json),
            Err(err) => {
                log::warn!("could not serialize block config: {err}");
                return;
            }
        }

        if self
            .observed
            .iter()
            .any(|o| o.marker.upgrade().is_some_and(|m| Rc::ptr_eq(&m, marker)))
        {
            return;
        }
        self.observed.push(Observed {
            marker: Rc::downgrade(marker),
            last: None,
        });
        log::debug!(
            "registered marker for '{}' ({} observed)",
            config.display_name(),
            self.observed.len()
        );
    }

    /// Forget the last reported state so the next observation re-reports every marker.
    pub fn invalidate(&mut self) {
        for observed in &mut self.observed {
            observed.last = None;
        }
    }

    /// Stop observing everything.
    pub fn disconnect(&mut self) {
        self.observed.clear();
        self.connected = false;
    }

    /// Compute the batch the host would deliver for `viewport`: one entry per marker whose
    /// intersecting state changed, in registration order.
    pub fn observe(&mut self, viewport: Viewport, layout: &dyn Layout) -> Vec<IntersectionEntry> {
        if !self.connected {
            return Vec::new();
        }
        self.observed.retain(|o| o.marker.upgrade().is_some());

        let root = self.root;
        let mut batch = Vec::new();
        for observed in &mut self.observed {
            let Some(marker) = observed.marker.upgrade() else {
                continue;
            };
            let (ratio, intersecting) = match layout.span_of(&marker) {
                Some(span) => (
                    root.intersection_ratio(span, viewport),
                    root.is_intersecting(span, viewport),
                ),
                None => (0.0, false),
            };
            if observed.last != Some(intersecting) {
                observed.last = Some(intersecting);
                batch.push(IntersectionEntry::new(&marker, ratio, intersecting));
            }
        }
        log::trace!("observation produced {} entries", batch.len());
        batch
    }

    /// First intersecting, still mounted marker in delivery order.
    pub fn select(&self, batch: &[IntersectionEntry]) -> Option<BlockConfig> {
        if !self.connected {
            return None;
        }
        batch
            .iter()
            .filter(|entry| entry.is_intersecting)
            .find_map(|entry| {
                let Some(marker) = entry.marker.upgrade() else {
                    log::debug!("ignoring notification for a dropped marker");
                    return None;
                };
                if !dom::is_connected(&marker) {
                    log::debug!("ignoring notification for an unmounted marker");
                    return None;
                }
                read_config(&marker)
            })
    }
}

impl Default for VisibilityTracker {
    fn default() -> Self {
        Self::new(ObservationRoot::default())
    }
}

/// Read the configuration stored on a marker.
pub fn read_config(marker: &Handle) -> Option<BlockConfig> {
    let raw = dom::attr(marker, CONFIG_ATTR)?;
    match serde_json::from_str(&raw) {
        Ok(config) => Some(config),
        Err(err) => {
            log::warn!("marker carries an unreadable config: {err}");
            None
        }
    }
}
