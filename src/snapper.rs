//! The orchestrator that ties the calculator, the per-window state, the
//! tiling gate and the window host together.
//!
//! [`Snapper`] owns the [`StateStore`] and reacts to [`Command`]s by asking
//! the gate whether it may touch the focused window, computing the next
//! frame and handing it to the [`WindowHost`].

use crate::bindings::{Action, Bindings, Chord};
use crate::calculator::{Placement, PlacementKind, SnapCalculator};
use crate::command::{Command, Direction, FocusedWindow, WindowId};
use crate::geometry::Rect;
use crate::state::{StateStore, WindowState};
use crate::traits::{TiledWindowGate, WindowHost};
use log::{debug, info};

/// Possible errors from the snapper.
#[derive(Debug, thiserror::Error)]
pub enum SnapperError {
    /// The window host returned an error.
    #[error("window host error: {0}")]
    Host(String),
    /// A pressed chord could not be parsed.
    #[error("bad chord: {0}")]
    Chord(#[from] crate::bindings::BindingError),
    /// A pressed chord is not bound to anything.
    #[error("chord {0} is not bound")]
    Unbound(String),
}

/// What a command did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// The window was moved to `frame`.
    Placed { frame: Rect, kind: PlacementKind },
    /// The window belongs to the tiling manager and was left alone.
    Tiled,
    /// Nothing has focus.
    NoWindow,
    /// State for this many windows was forgotten.
    Reset(usize),
}

/// Orchestrates snap calculations and window-host calls.
///
/// Generic over any [`WindowHost`] and [`TiledWindowGate`], so it is
/// independent of the platform and of any particular tiling manager.
/// Each instance has its own state; two snappers never share cycling
/// history.
///
/// # Typical usage
///
/// ```ignore
/// let mut snapper = Snapper::new(host, NeverTiled, config.calculator());
/// snapper.handle(Command::Move { direction: Direction::Left, modifier: false })?;
/// ```
pub struct Snapper<H: WindowHost, G: TiledWindowGate> {
    host: H,
    gate: G,
    calculator: SnapCalculator,
    states: StateStore,
    bindings: Bindings,
}

impl<H: WindowHost, G: TiledWindowGate> Snapper<H, G> {
    /// Create a snapper with no tracked windows and no key bindings.
    pub fn new(host: H, gate: G, calculator: SnapCalculator) -> Self {
        Self {
            host,
            gate,
            calculator,
            states: StateStore::new(),
            bindings: Bindings::default(),
        }
    }

    /// Install the chord table used for [`Command::Press`].
    pub fn set_bindings(&mut self, bindings: Bindings) {
        self.bindings = bindings;
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    /// Stored state for `window` (the untouched default if none).
    pub fn state(&self, window: &WindowId) -> WindowState {
        self.states.get(window)
    }

    /// Whether `window` has been moved since it was last reset.
    pub fn is_tracked(&self, window: &WindowId) -> bool {
        self.states.contains(window)
    }

    /// Process a single [`Command`].
    pub fn handle(&mut self, cmd: Command) -> Result<Outcome, SnapperError> {
        match cmd {
            Command::Move {
                direction,
                modifier,
            } => self.move_focused(direction, modifier),
            Command::Press(chord) => {
                let chord: Chord = chord.parse()?;
                let resolved = self
                    .bindings
                    .resolve(&chord)
                    .ok_or_else(|| SnapperError::Unbound(chord.to_string()))?;
                debug!("{} → {} (modifier: {})", chord, resolved.action, resolved.modifier);
                match resolved.action {
                    Action::Move(direction) => self.move_focused(direction, resolved.modifier),
                    Action::ToggleFill => self.toggle_fill(),
                }
            }
            Command::ToggleFill => self.toggle_fill(),
            Command::Reset(window) => Ok(Outcome::Reset(self.reset(Some(&window)))),
            Command::ResetAll => Ok(Outcome::Reset(self.reset(None))),
        }
    }

    /// Snap the focused window toward `direction`.
    pub fn move_focused(
        &mut self,
        direction: Direction,
        modifier: bool,
    ) -> Result<Outcome, SnapperError> {
        let window = match self.focused_untiled(Some(direction))? {
            Ok(window) => window,
            Err(skipped) => return Ok(skipped),
        };
        info!("move {} {} (modifier: {})", window.id, direction, modifier);
        let placement = self.calculator.compute(
            window.frame,
            window.screen,
            direction,
            modifier,
            self.states.get(&window.id),
        );
        self.apply(window.id, placement)
    }

    /// Fill the focused window's screen, or restore its previous frame.
    pub fn toggle_fill(&mut self) -> Result<Outcome, SnapperError> {
        let window = match self.focused_untiled(None)? {
            Ok(window) => window,
            Err(skipped) => return Ok(skipped),
        };
        info!("toggle fill {}", window.id);
        let placement =
            self.calculator
                .toggle_fill(window.frame, window.screen, self.states.get(&window.id));
        self.apply(window.id, placement)
    }

    /// Forget the state of `window`, or of every window when `None`.
    pub fn reset(&mut self, window: Option<&WindowId>) -> usize {
        let n = self.states.reset(window);
        match window {
            Some(id) => info!("reset {} ({} entry dropped)", id, n),
            None => info!("reset all ({} entries dropped)", n),
        }
        n
    }

    //  Internal

    /// The focused window, or the outcome explaining why there is nothing
    /// to move.  A move refused because the window is tiled is delegated to
    /// the tiling manager.
    fn focused_untiled(
        &self,
        direction: Option<Direction>,
    ) -> Result<Result<FocusedWindow, Outcome>, SnapperError> {
        let window = self
            .host
            .focused_window()
            .map_err(|e| SnapperError::Host(e.to_string()))?;
        let Some(window) = window else {
            debug!("no focused window, nothing to do");
            return Ok(Err(Outcome::NoWindow));
        };
        if self.gate.is_tiled(&window.id) {
            info!("{} is tiled, leaving it to the tiling manager", window.id);
            if let Some(direction) = direction {
                self.gate.delegate(direction);
            }
            return Ok(Err(Outcome::Tiled));
        }
        Ok(Ok(window))
    }

    /// Apply a placement; state is only stored once the host accepted it.
    fn apply(&mut self, window: WindowId, placement: Placement) -> Result<Outcome, SnapperError> {
        debug!("{} → {:?} ({:?})", window, placement.frame, placement.kind);
        self.host
            .set_frame(&window, placement.frame)
            .map_err(|e| SnapperError::Host(e.to_string()))?;
        self.states.insert(window, placement.state);
        Ok(Outcome::Placed {
            frame: placement.frame,
            kind: placement.kind,
        })
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::BindingsConfig;
    use crate::gate::NeverTiled;
    use crate::policy::Preset;
    use crate::sizes::Sizes;
    use crate::state::AxisIndex;
    use std::cell::{Cell, RefCell};

    const SCREEN: Rect = Rect {
        x: 0.0,
        y: 0.0,
        w: 1000.0,
        h: 800.0,
    };

    /// Host with one focused window whose frame follows every `set_frame`.
    #[derive(Debug)]
    struct RecorderHost {
        focused: RefCell<Option<FocusedWindow>>,
        applied: RefCell<Vec<(WindowId, Rect)>>,
        fail: Cell<bool>,
    }

    impl RecorderHost {
        fn with_window(id: &str, frame: Rect) -> Self {
            Self {
                focused: RefCell::new(Some(FocusedWindow {
                    id: id.into(),
                    frame,
                    screen: SCREEN,
                })),
                applied: RefCell::new(Vec::new()),
                fail: Cell::new(false),
            }
        }

        fn empty() -> Self {
            Self {
                focused: RefCell::new(None),
                applied: RefCell::new(Vec::new()),
                fail: Cell::new(false),
            }
        }

        fn focus(&self, id: &str, frame: Rect) {
            *self.focused.borrow_mut() = Some(FocusedWindow {
                id: id.into(),
                frame,
                screen: SCREEN,
            });
        }

        fn frame(&self) -> Rect {
            self.focused.borrow().as_ref().map(|w| w.frame).unwrap_or_default()
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("recorder error")]
    struct RecorderErr;

    impl WindowHost for RecorderHost {
        type Error = RecorderErr;

        fn focused_window(&self) -> Result<Option<FocusedWindow>, RecorderErr> {
            Ok(self.focused.borrow().clone())
        }

        fn set_frame(&self, window: &WindowId, frame: Rect) -> Result<(), RecorderErr> {
            if self.fail.get() {
                return Err(RecorderErr);
            }
            self.applied.borrow_mut().push((window.clone(), frame));
            if let Some(w) = self.focused.borrow_mut().as_mut() {
                if &w.id == window {
                    w.frame = frame;
                }
            }
            Ok(())
        }
    }

    /// Gate that reports every window as tiled and counts delegations.
    #[derive(Debug, Default)]
    struct AlwaysTiled {
        delegated: RefCell<Vec<Direction>>,
    }

    impl TiledWindowGate for AlwaysTiled {
        fn is_tiled(&self, _window: &WindowId) -> bool {
            true
        }

        fn delegate(&self, direction: Direction) {
            self.delegated.borrow_mut().push(direction);
        }
    }

    fn calculator() -> SnapCalculator {
        SnapCalculator::new(Sizes::default(), Preset::SlotBased.policy(), 10.0)
    }

    fn make_snapper(frame: Rect) -> Snapper<RecorderHost, NeverTiled> {
        Snapper::new(RecorderHost::with_window("w1", frame), NeverTiled, calculator())
    }

    fn left() -> Command {
        Command::Move {
            direction: Direction::Left,
            modifier: false,
        }
    }

    #[test]
    fn first_move_creates_state() {
        let mut s = make_snapper(SCREEN);
        assert!(!s.is_tracked(&"w1".into()));
        let out = s.handle(left()).unwrap();
        assert_eq!(
            out,
            Outcome::Placed {
                frame: Rect::new(0.0, 0.0, 500.0, 800.0),
                kind: PlacementKind::Cycle
            }
        );
        assert!(s.is_tracked(&"w1".into()));
        assert_eq!(s.state(&"w1".into()).width, AxisIndex::Size(0));
    }

    #[test]
    fn repeated_left_cycles_through_sizes() {
        let mut s = make_snapper(SCREEN);
        for _ in 0..4 {
            s.handle(left()).unwrap();
        }
        let widths: Vec<f64> = s.host.applied.borrow().iter().map(|(_, r)| r.w).collect();
        assert_eq!(widths.len(), 4);
        assert_eq!(widths[0], 500.0);
        assert!((widths[1] - 1000.0 / 3.0).abs() < 1e-6);
        assert!((widths[2] - 2000.0 / 3.0).abs() < 1e-6);
        assert_eq!(widths[3], 500.0);
        assert!(s.host.applied.borrow().iter().all(|(_, r)| r.x == 0.0));
    }

    #[test]
    fn modifier_moves_one_slot() {
        let mut s = make_snapper(Rect::new(0.0, 0.0, 500.0, 600.0));
        let out = s
            .handle(Command::Move {
                direction: Direction::Right,
                modifier: true,
            })
            .unwrap();
        assert_eq!(
            out,
            Outcome::Placed {
                frame: Rect::new(500.0, 0.0, 500.0, 600.0),
                kind: PlacementKind::Slot
            }
        );
    }

    #[test]
    fn no_focused_window_is_noop() {
        let mut s = Snapper::new(RecorderHost::empty(), NeverTiled, calculator());
        assert_eq!(s.handle(left()).unwrap(), Outcome::NoWindow);
        assert_eq!(s.handle(Command::ToggleFill).unwrap(), Outcome::NoWindow);
        assert!(s.host.applied.borrow().is_empty());
    }

    #[test]
    fn tiled_window_is_left_untouched() {
        let frame = Rect::new(10.0, 20.0, 300.0, 400.0);
        let mut s = Snapper::new(
            RecorderHost::with_window("w1", frame),
            AlwaysTiled::default(),
            calculator(),
        );
        assert_eq!(s.handle(left()).unwrap(), Outcome::Tiled);
        assert_eq!(s.host.frame(), frame);
        assert!(s.host.applied.borrow().is_empty());
        assert!(!s.is_tracked(&"w1".into()));
        assert_eq!(*s.gate.delegated.borrow(), vec![Direction::Left]);
    }

    #[test]
    fn tiled_window_fill_is_not_delegated() {
        let mut s = Snapper::new(
            RecorderHost::with_window("w1", SCREEN),
            AlwaysTiled::default(),
            calculator(),
        );
        assert_eq!(s.handle(Command::ToggleFill).unwrap(), Outcome::Tiled);
        assert!(s.gate.delegated.borrow().is_empty());
    }

    #[test]
    fn host_failure_does_not_store_state() {
        let mut s = make_snapper(SCREEN);
        s.host.fail.set(true);
        assert!(matches!(s.handle(left()), Err(SnapperError::Host(_))));
        assert!(!s.is_tracked(&"w1".into()));
    }

    #[test]
    fn reset_one_window_behaves_like_new() {
        let mut s = make_snapper(SCREEN);
        s.handle(left()).unwrap();
        s.handle(left()).unwrap();

        // Back to full screen, forget, and the first step is taken again.
        s.host.focus("w1", SCREEN);
        assert_eq!(s.handle(Command::Reset("w1".into())).unwrap(), Outcome::Reset(1));
        let fresh = make_snapper(SCREEN).handle(left()).unwrap();
        assert_eq!(s.handle(left()).unwrap(), fresh);
    }

    #[test]
    fn reset_all_clears_every_window() {
        let mut s = make_snapper(SCREEN);
        s.handle(left()).unwrap();
        s.host.focus("w2", SCREEN);
        s.handle(left()).unwrap();
        assert_eq!(s.handle(Command::ResetAll).unwrap(), Outcome::Reset(2));
        assert!(!s.is_tracked(&"w1".into()));
        assert!(!s.is_tracked(&"w2".into()));
    }

    #[test]
    fn reset_does_not_move_windows() {
        let mut s = make_snapper(SCREEN);
        s.handle(left()).unwrap();
        s.handle(Command::ResetAll).unwrap();
        assert_eq!(s.host.applied.borrow().len(), 1);
    }

    #[test]
    fn states_are_per_window() {
        let mut s = make_snapper(SCREEN);
        s.handle(left()).unwrap();
        s.handle(left()).unwrap();
        s.host.focus("w2", SCREEN);
        s.handle(left()).unwrap();
        assert_eq!(s.state(&"w1".into()).width, AxisIndex::Size(1));
        assert_eq!(s.state(&"w2".into()).width, AxisIndex::Size(0));
    }

    #[test]
    fn independent_snappers_do_not_share_state() {
        let mut a = make_snapper(SCREEN);
        let b = make_snapper(SCREEN);
        a.handle(left()).unwrap();
        assert!(a.is_tracked(&"w1".into()));
        assert!(!b.is_tracked(&"w1".into()));
    }

    #[test]
    fn toggle_fill_round_trip() {
        let original = Rect::new(0.0, 0.0, 500.0, 800.0);
        let mut s = make_snapper(original);
        s.handle(Command::ToggleFill).unwrap();
        assert_eq!(s.host.frame(), SCREEN);
        s.handle(Command::ToggleFill).unwrap();
        assert_eq!(s.host.frame(), original);
    }

    #[test]
    fn press_resolves_bound_chords() {
        let mut s = make_snapper(Rect::new(0.0, 0.0, 500.0, 600.0));
        s.set_bindings(Bindings::from_config(&BindingsConfig::default()).unwrap());
        let out = s.handle(Command::Press("shift+ctrl+alt+right".into())).unwrap();
        assert!(matches!(
            out,
            Outcome::Placed {
                kind: PlacementKind::Slot,
                ..
            }
        ));
        let out = s.handle(Command::Press("ctrl+alt+return".into())).unwrap();
        assert!(matches!(
            out,
            Outcome::Placed {
                kind: PlacementKind::Fill,
                ..
            }
        ));
    }

    #[test]
    fn press_unbound_or_malformed_chord_errors() {
        let mut s = make_snapper(SCREEN);
        s.set_bindings(Bindings::from_config(&BindingsConfig::default()).unwrap());
        assert!(matches!(
            s.handle(Command::Press("cmd+q".into())),
            Err(SnapperError::Unbound(_))
        ));
        assert!(matches!(
            s.handle(Command::Press("hyper+left".into())),
            Err(SnapperError::Chord(_))
        ));
        assert!(s.host.applied.borrow().is_empty());
    }
}
