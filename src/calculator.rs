//! The snap calculator.
//!
//! [`SnapCalculator::compute`] is a pure function of the window frame, the
//! usable screen area, the requested direction, the modifier flag and the
//! window's previous [`WindowState`].  It decides, in order:
//!
//! 1. **Cycle** — the window already touches the edge it is moving toward:
//!    advance to the next configured size and stay pinned to that edge.
//! 2. **Slot** — the modifier is held and the window's ratio divides the
//!    screen into whole slots: move one slot over, keeping the size.
//! 3. **Snap** — otherwise: move to the edge, keeping the size.
//!
//! Edge contact is measured in pixels, never derived from a slot index, so
//! sizes like 2/3 that have no slot grid behave the same as halves when they
//! sit against an edge.

use crate::command::Direction;
use crate::geometry::{same_ratio, slot_count, Axis, Edge, Rect, Span, TILE_EPSILON};
use crate::policy::{EdgeBehavior, OppositeAxisPolicy, SnapPolicy};
use crate::sizes::Sizes;
use crate::state::{AxisIndex, SavedFrame, WindowState};

/// How a placement was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementKind {
    Cycle,
    Slot,
    Snap,
    Fill,
    Restore,
}

/// The outcome of a calculation: where the window goes and the state to
/// remember for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub frame: Rect,
    pub state: WindowState,
    pub kind: PlacementKind,
}

/// Computes snap placements for a fixed size sequence and policy.
#[derive(Debug, Clone)]
pub struct SnapCalculator {
    sizes: Sizes,
    policy: SnapPolicy,
    edge_tolerance: f64,
}

impl SnapCalculator {
    pub fn new(sizes: Sizes, policy: SnapPolicy, edge_tolerance: f64) -> Self {
        Self {
            sizes,
            policy,
            edge_tolerance,
        }
    }

    pub fn sizes(&self) -> &Sizes {
        &self.sizes
    }

    pub fn policy(&self) -> &SnapPolicy {
        &self.policy
    }

    /// Compute the next frame for a move toward `direction`.
    pub fn compute(
        &self,
        frame: Rect,
        screen: Rect,
        direction: Direction,
        modifier: bool,
        state: WindowState,
    ) -> Placement {
        let axis = direction.axis();
        let edge = Edge::toward(direction);
        let screen_span = screen.span(axis);
        let span = frame.span(axis);
        let ratio = span.ratio_of(screen_span);
        let current = axis_index(&state, axis).resolve(ratio, &self.sizes);

        let (kind, index, moved) = if span.touches(screen_span, edge, self.edge_tolerance) {
            let index = self.edge_step(current, ratio);
            let moved = Span::pinned(screen_span, index.ratio(&self.sizes), edge);
            (PlacementKind::Cycle, index, moved)
        } else if let Some(moved) = modifier
            .then(|| slot_move(span, screen_span, ratio, direction))
            .flatten()
        {
            (PlacementKind::Slot, current, moved)
        } else {
            let reversed = last_direction(&state, axis).is_some_and(|last| last != direction);
            if self.policy.reset_on_direction_change && reversed {
                let index = AxisIndex::Size(0);
                let moved = Span::pinned(screen_span, index.ratio(&self.sizes), edge);
                (PlacementKind::Snap, index, moved)
            } else {
                (PlacementKind::Snap, current, Span::pinned(screen_span, ratio, edge))
            }
        };

        let mut next = state;
        next.saved = None;
        set_axis(&mut next, axis, index, direction);
        let mut frame = frame.with_span(axis, moved);

        if self.resets_opposite(axis, kind, modifier) {
            let opposite = axis.opposite();
            let reset_ratio = match axis {
                Axis::Horizontal => self.policy.reset.height,
                Axis::Vertical => self.policy.reset.width,
            };
            let opp_screen = screen.span(opposite);
            let opp_span = frame.span(opposite);
            let anchor = if opp_span.touches(opp_screen, Edge::End, self.edge_tolerance)
                && !opp_span.touches(opp_screen, Edge::Start, self.edge_tolerance)
            {
                Edge::End
            } else {
                Edge::Start
            };
            frame = frame.with_span(opposite, Span::pinned(opp_screen, reset_ratio, anchor));
            let opp_index = AxisIndex::Full.resolve(reset_ratio, &self.sizes);
            match opposite {
                Axis::Horizontal => next.width = opp_index,
                Axis::Vertical => next.height = opp_index,
            }
        }

        Placement {
            frame,
            state: next,
            kind,
        }
    }

    /// Fill the screen, or restore the frame saved by the previous fill.
    ///
    /// The saved frame is only restored while the window still fills the
    /// screen; if it was moved in the meantime, the toggle fills again.
    pub fn toggle_fill(&self, frame: Rect, screen: Rect, state: WindowState) -> Placement {
        let fills = [Axis::Horizontal, Axis::Vertical].iter().all(|&axis| {
            let s = screen.span(axis);
            let f = frame.span(axis);
            f.touches(s, Edge::Start, self.edge_tolerance)
                && f.touches(s, Edge::End, self.edge_tolerance)
        });

        if let (true, Some(saved)) = (fills, state.saved) {
            let next = WindowState {
                width: saved.width,
                height: saved.height,
                saved: None,
                ..state
            };
            return Placement {
                frame: saved.frame,
                state: next,
                kind: PlacementKind::Restore,
            };
        }

        let width = state
            .width
            .resolve(frame.span(Axis::Horizontal).ratio_of(screen.span(Axis::Horizontal)), &self.sizes);
        let height = state
            .height
            .resolve(frame.span(Axis::Vertical).ratio_of(screen.span(Axis::Vertical)), &self.sizes);
        let next = WindowState {
            width: AxisIndex::Full,
            height: AxisIndex::Full,
            saved: Some(SavedFrame {
                frame,
                width,
                height,
            }),
            ..state
        };
        Placement {
            frame: screen,
            state: next,
            kind: PlacementKind::Fill,
        }
    }

    /// Index reached by pressing toward an edge the window already touches.
    fn edge_step(&self, current: AxisIndex, ratio: f64) -> AxisIndex {
        if self.policy.edge == EdgeBehavior::Complement {
            let complement = 1.0 - ratio;
            if complement > TILE_EPSILON && !same_ratio(complement, ratio) {
                if let Some(i) = self.sizes.position(complement) {
                    return AxisIndex::Size(i);
                }
            }
        }
        current.advance(&self.sizes)
    }

    fn resets_opposite(&self, axis: Axis, kind: PlacementKind, modifier: bool) -> bool {
        match self.policy.opposite_axis {
            OppositeAxisPolicy::ResetOnHorizontal => axis == Axis::Horizontal,
            OppositeAxisPolicy::Independent => false,
            OppositeAxisPolicy::ResetUnlessCyclingOrModifier => {
                kind != PlacementKind::Cycle && !modifier
            }
        }
    }
}

/// One slot over in `direction`, if the ratio has a slot grid and the
/// neighbouring slot is on screen.  The window keeps its length; only the
/// start snaps to the grid.
fn slot_move(span: Span, screen: Span, ratio: f64, direction: Direction) -> Option<Span> {
    let slots = slot_count(ratio)?;
    if slots < 2 {
        return None;
    }
    let slot_len = screen.len / slots as f64;
    let current = ((span.start - screen.start) / slot_len).round();
    let target = current + direction.step() as f64;
    if target < 0.0 || target >= slots as f64 {
        return None;
    }
    Some(Span {
        start: screen.start + target * slot_len,
        len: span.len,
    })
}

fn axis_index(state: &WindowState, axis: Axis) -> AxisIndex {
    match axis {
        Axis::Horizontal => state.width,
        Axis::Vertical => state.height,
    }
}

fn last_direction(state: &WindowState, axis: Axis) -> Option<Direction> {
    match axis {
        Axis::Horizontal => state.last_horizontal,
        Axis::Vertical => state.last_vertical,
    }
}

fn set_axis(state: &mut WindowState, axis: Axis, index: AxisIndex, direction: Direction) {
    match axis {
        Axis::Horizontal => {
            state.width = index;
            state.last_horizontal = Some(direction);
        }
        Axis::Vertical => {
            state.height = index;
            state.last_vertical = Some(direction);
        }
    }
}
