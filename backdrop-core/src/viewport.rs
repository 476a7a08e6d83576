//! Viewport geometry for visibility observation
//!
//! Models the host's intersection primitive: markers occupy vertical spans in document
//! coordinates, the reader sees a viewport, and the observation root is that viewport shrunk
//! from the bottom. With the default root only the top half of the screen counts, so a block
//! activates once the reader has scrolled up to it rather than when it peeks in from below.

use markup5ever_rcdom::Handle;

pub const DEFAULT_THRESHOLD: f64 = 0.01;
pub const DEFAULT_BOTTOM_MARGIN: f64 = 0.5;

/// Vertical extent of an element in document coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub height: f64,
}

impl Span {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            height: height.max(0.0),
        }
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// The visible window onto the document
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scroll_top: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(scroll_top: f64, height: f64) -> Self {
        Self { scroll_top, height }
    }
}

/// Threshold and root margin of the observation channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationRoot {
    /// Minimum visible fraction for a marker to count as intersecting
    pub threshold: f64,
    /// Fraction of the viewport height cut from the bottom of the root
    pub bottom_margin: f64,
}

impl Default for ObservationRoot {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            bottom_margin: DEFAULT_BOTTOM_MARGIN,
        }
    }
}

impl ObservationRoot {
    /// Root rectangle for `viewport`, as a span.
    pub fn root_span(&self, viewport: Viewport) -> Span {
        let margin = self.bottom_margin.clamp(0.0, 1.0);
        Span::new(viewport.scroll_top, viewport.height * (1.0 - margin))
    }

    /// Visible fraction of `target` inside the root, in `[0, 1]`.
    pub fn intersection_ratio(&self, target: Span, viewport: Viewport) -> f64 {
        let root = self.root_span(viewport);
        if target.height == 0.0 {
            return if target.top >= root.top && target.top <= root.bottom() {
                1.0
            } else {
                0.0
            };
        }
        let overlap = target.bottom().min(root.bottom()) - target.top.max(root.top);
        (overlap / target.height).clamp(0.0, 1.0)
    }

    pub fn is_intersecting(&self, target: Span, viewport: Viewport) -> bool {
        let ratio = self.intersection_ratio(target, viewport);
        ratio > 0.0 && ratio >= self.threshold
    }
}

/// Where the host laid out a marker
///
/// `None` means the marker is not currently laid out (hidden view, unmounted document) and
/// counts as not intersecting.
pub trait Layout {
    fn span_of(&self, marker: &Handle) -> Option<Span>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_keeps_top_half() {
        let root = ObservationRoot::default();
        let span = root.root_span(Viewport::new(100.0, 800.0));
        assert_eq!(span, Span::new(100.0, 400.0));
    }

    #[test]
    fn marker_in_lower_half_does_not_count() {
        let root = ObservationRoot::default();
        let viewport = Viewport::new(0.0, 800.0);
        assert!(!root.is_intersecting(Span::new(600.0, 24.0), viewport));
        assert!(root.is_intersecting(Span::new(200.0, 24.0), viewport));
    }

    #[test]
    fn partial_visibility_reports_fraction() {
        let root = ObservationRoot::default();
        let viewport = Viewport::new(0.0, 800.0);
        let ratio = root.intersection_ratio(Span::new(390.0, 20.0), viewport);
        assert!((ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn below_threshold_is_not_intersecting() {
        let root = ObservationRoot {
            threshold: 0.5,
            bottom_margin: 0.5,
        };
        let viewport = Viewport::new(0.0, 800.0);
        assert!(!root.is_intersecting(Span::new(395.0, 20.0), viewport));
    }

    #[test]
    fn zero_height_marker_counts_when_inside() {
        let root = ObservationRoot::default();
        let viewport = Viewport::new(0.0, 800.0);
        assert!(root.is_intersecting(Span::new(10.0, 0.0), viewport));
        assert!(!root.is_intersecting(Span::new(500.0, 0.0), viewport));
    }

    #[test]
    fn scrolled_past_marker_is_not_intersecting() {
        let root = ObservationRoot::default();
        let viewport = Viewport::new(1000.0, 800.0);
        assert!(!root.is_intersecting(Span::new(200.0, 24.0), viewport));
    }
}
