//! Rectangles and axis arithmetic.
//!
//! Everything the snap calculator needs to reason about a single axis of a
//! window lives here: the occupied ratio, whether that ratio splits the
//! screen into whole slots, and whether the window touches an edge.

use crate::command::Direction;
use serde::{Deserialize, Serialize};

/// Tolerance when deciding whether a ratio divides the screen evenly.
pub const TILE_EPSILON: f64 = 0.01;

/// Default pixel distance within which a window counts as touching an edge.
pub const DEFAULT_EDGE_TOLERANCE: f64 = 10.0;

/// An axis-aligned rectangle in screen coordinates (pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The `(position, size)` pair along `axis`.
    pub fn span(&self, axis: Axis) -> Span {
        match axis {
            Axis::Horizontal => Span {
                start: self.x,
                len: self.w,
            },
            Axis::Vertical => Span {
                start: self.y,
                len: self.h,
            },
        }
    }

    /// Return a copy with the span along `axis` replaced.
    pub fn with_span(self, axis: Axis, span: Span) -> Self {
        match axis {
            Axis::Horizontal => Self {
                x: span.start,
                w: span.len,
                ..self
            },
            Axis::Vertical => Self {
                y: span.start,
                h: span.len,
                ..self
            },
        }
    }
}

/// The two movement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn opposite(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

/// Which end of an axis a window is pinned against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Left or top.
    Start,
    /// Right or bottom.
    End,
}

impl Edge {
    /// The edge a direction travels toward.
    pub fn toward(direction: Direction) -> Edge {
        match direction {
            Direction::Left | Direction::Up => Edge::Start,
            Direction::Right | Direction::Down => Edge::End,
        }
    }
}

/// One-dimensional interval: a window or screen projected onto an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub start: f64,
    pub len: f64,
}

impl Span {
    pub fn end(&self) -> f64 {
        self.start + self.len
    }

    /// Fraction of `screen` this span occupies, clamped to `(0, 1]`.
    ///
    /// Degenerate screens report a full ratio.
    pub fn ratio_of(&self, screen: Span) -> f64 {
        if screen.len <= 0.0 {
            return 1.0;
        }
        (self.len / screen.len).clamp(f64::MIN_POSITIVE, 1.0)
    }

    /// Whether this span touches `edge` of `screen` within `tolerance` pixels.
    pub fn touches(&self, screen: Span, edge: Edge, tolerance: f64) -> bool {
        let distance = match edge {
            Edge::Start => self.start - screen.start,
            Edge::End => screen.end() - self.end(),
        };
        distance.abs() <= tolerance
    }

    /// A span of `ratio × screen` pinned against `edge`.
    pub fn pinned(screen: Span, ratio: f64, edge: Edge) -> Span {
        let len = ratio * screen.len;
        let start = match edge {
            Edge::Start => screen.start,
            Edge::End => screen.end() - len,
        };
        Span { start, len }
    }
}

/// Number of whole slots `ratio` divides the screen into, if any.
///
/// `1/2` gives `Some(2)`, `1/3` gives `Some(3)`, `2/3` gives `None`.
pub fn slot_count(ratio: f64) -> Option<usize> {
    if !(ratio > 0.0) {
        return None;
    }
    let slots = (1.0 / ratio).round();
    if slots < 1.0 {
        return None;
    }
    if (ratio - 1.0 / slots).abs() < TILE_EPSILON {
        Some(slots as usize)
    } else {
        None
    }
}

/// Whether two ratios are the same size for snapping purposes.
pub fn same_ratio(a: f64, b: f64) -> bool {
    (a - b).abs() < TILE_EPSILON
}

#[cfg(test)]
mod tests {
    use super::*;

    fn screen() -> Span {
        Span {
            start: 0.0,
            len: 1000.0,
        }
    }

    #[test]
    fn halves_and_thirds_tile() {
        assert_eq!(slot_count(0.5), Some(2));
        assert_eq!(slot_count(1.0 / 3.0), Some(3));
        assert_eq!(slot_count(0.25), Some(4));
        assert_eq!(slot_count(1.0), Some(1));
    }

    #[test]
    fn two_thirds_does_not_tile() {
        assert_eq!(slot_count(2.0 / 3.0), None);
        assert_eq!(slot_count(0.6), None);
    }

    #[test]
    fn near_tiling_ratio_counts_within_epsilon() {
        // 333px on a 1000px screen is a third for all practical purposes.
        assert_eq!(slot_count(0.333), Some(3));
    }

    #[test]
    fn zero_ratio_never_tiles() {
        assert_eq!(slot_count(0.0), None);
        assert_eq!(slot_count(f64::NAN), None);
    }

    #[test]
    fn edge_within_tolerance() {
        let w = Span {
            start: 10.0,
            len: 500.0,
        };
        assert!(w.touches(screen(), Edge::Start, 10.0));
    }

    #[test]
    fn edge_one_pixel_beyond_tolerance() {
        let w = Span {
            start: 11.0,
            len: 500.0,
        };
        assert!(!w.touches(screen(), Edge::Start, 10.0));
    }

    #[test]
    fn far_edge_detection_ignores_sub_pixel_offset() {
        let w = Span {
            start: 500.4,
            len: 499.3,
        };
        assert!(w.touches(screen(), Edge::End, 10.0));
    }

    #[test]
    fn pinned_end_sits_flush_with_far_edge() {
        let s = Span::pinned(screen(), 0.25, Edge::End);
        assert_eq!(s.start, 750.0);
        assert_eq!(s.len, 250.0);
    }

    #[test]
    fn ratio_clamps_oversized_windows() {
        let w = Span {
            start: -20.0,
            len: 1200.0,
        };
        assert_eq!(w.ratio_of(screen()), 1.0);
    }

    #[test]
    fn with_span_replaces_only_one_axis() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0).with_span(
            Axis::Vertical,
            Span {
                start: 20.0,
                len: 40.0,
            },
        );
        assert_eq!(r, Rect::new(1.0, 20.0, 3.0, 40.0));
    }
}
