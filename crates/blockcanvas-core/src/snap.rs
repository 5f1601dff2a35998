//! Alignment guides for snapping a dragged block against its neighbours.

use kurbo::{Point, Rect, Size};

/// Default distance (in canvas pixels) within which a guide captures the
/// dragged block. The comparison is strict.
pub const SNAP_TOLERANCE: f64 = 5.0;

/// A candidate alignment on one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuideLine {
    /// Anchor `left`/`top` value that lines the anchor up with the candidate.
    pub trigger: f64,
    /// Where the guide is drawn.
    pub display: f64,
}

impl GuideLine {
    pub fn new(trigger: f64, display: f64) -> Self {
        Self { trigger, display }
    }
}

/// Candidate guides for both axes, in registration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GuideLines {
    /// Vertical guides, matched against the anchor's `left`.
    pub vertical: Vec<GuideLine>,
    /// Horizontal guides, matched against the anchor's `top`.
    pub horizontal: Vec<GuideLine>,
}

impl GuideLines {
    /// Build five rules per axis for each candidate rectangle.
    ///
    /// For the horizontal axis, relative to candidate A and anchor B:
    /// top to top, B's bottom to A's top, centre to centre, B's top to A's
    /// bottom, bottom to bottom. The vertical axis mirrors this with left
    /// and right edges.
    pub fn build(anchor: Size, candidates: impl IntoIterator<Item = Rect>) -> Self {
        let mut lines = Self::default();
        for a in candidates {
            let (a_top, a_left) = (a.y0, a.x0);
            let (a_width, a_height) = (a.width(), a.height());

            lines.horizontal.extend([
                GuideLine::new(a_top, a_top),
                GuideLine::new(a_top - anchor.height, a_top),
                GuideLine::new(a_top + a_height / 2.0 - anchor.height / 2.0, a_top + a_height / 2.0),
                GuideLine::new(a_top + a_height, a_top + a_height),
                GuideLine::new(a_top + a_height - anchor.height, a_top + a_height),
            ]);

            lines.vertical.extend([
                GuideLine::new(a_left, a_left),
                GuideLine::new(a_left - anchor.width, a_left),
                GuideLine::new(a_left + a_width / 2.0 - anchor.width / 2.0, a_left + a_width / 2.0),
                GuideLine::new(a_left + a_width, a_left + a_width),
                GuideLine::new(a_left + a_width - anchor.width, a_left + a_width),
            ]);
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        self.vertical.is_empty() && self.horizontal.is_empty()
    }
}

/// Find the first guide within tolerance of a prospective coordinate.
///
/// Registration order decides, not proximity.
pub fn snap_axis(lines: &[GuideLine], prospective: f64, tolerance: f64) -> Option<&GuideLine> {
    lines
        .iter()
        .find(|line| (line.trigger - prospective).abs() < tolerance)
}

/// Guides currently shown, by display coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Guides {
    /// Vertical guide at this x.
    pub x: Option<f64>,
    /// Horizontal guide at this y.
    pub y: Option<f64>,
}

impl Guides {
    pub fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }
}

/// Result of snapping a prospective anchor position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// Snapped top-left (`x` = left, `y` = top).
    pub point: Point,
    pub guides: Guides,
}

impl SnapResult {
    /// Check if any snapping occurred.
    pub fn is_snapped(&self) -> bool {
        !self.guides.is_empty()
    }
}

/// Snap both axes independently.
pub fn snap_position(lines: &GuideLines, prospective: Point, tolerance: f64) -> SnapResult {
    let mut point = prospective;
    let mut guides = Guides::default();

    if let Some(line) = snap_axis(&lines.horizontal, prospective.y, tolerance) {
        point.y = line.trigger;
        guides.y = Some(line.display);
    }
    if let Some(line) = snap_axis(&lines.vertical, prospective.x, tolerance) {
        point.x = line.trigger;
        guides.x = Some(line.display);
    }

    SnapResult { point, guides }
}
