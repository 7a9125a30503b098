//! Core traits that decouple ratiosnap from any specific window platform,
//! tiling manager or transport mechanism.
//!
//! Every concrete backend (the request relay, the tiling-manager CLI, a
//! Unix-socket listener, a test harness, …) implements one of these traits.
//! The [`Snapper`](crate::snapper::Snapper) only depends on these
//! abstractions.

use crate::command::{Direction, FocusedWindow, Request, Response, WindowId};
use crate::geometry::Rect;
use std::sync::mpsc;

/// Abstraction over the platform that owns the windows.
///
/// An implementation might talk to an accessibility API, relay frames to a
/// remote binding layer, or be a recording stub used in tests.
pub trait WindowHost {
    /// The error type produced by this host.
    type Error: std::error::Error + Send + 'static;

    /// Return the focused window with its frame and the usable frame of its
    /// screen, or `None` if nothing is focused.
    fn focused_window(&self) -> Result<Option<FocusedWindow>, Self::Error>;

    /// Move and resize `window` to `frame`, without animation.
    fn set_frame(&self, window: &WindowId, frame: Rect) -> Result<(), Self::Error>;
}

/// Answers whether a window is currently under an external tiling manager.
///
/// Implementations must fail open: if the manager is absent, slow, or
/// returns garbage, the answer is `false` and snapping proceeds.
pub trait TiledWindowGate {
    /// Whether `window` is tiled and must be left alone.
    fn is_tiled(&self, window: &WindowId) -> bool;

    /// Hand a move that was refused because the window is tiled over to the
    /// tiling manager.  Best effort; the default does nothing.
    fn delegate(&self, _direction: Direction) {}
}

impl<G: TiledWindowGate + ?Sized> TiledWindowGate for Box<G> {
    fn is_tiled(&self, window: &WindowId) -> bool {
        (**self).is_tiled(window)
    }

    fn delegate(&self, direction: Direction) {
        (**self).delegate(direction)
    }
}

//  Command Source

/// A decoded [`Request`] together with the channel its [`Response`] goes
/// back on.
#[derive(Debug)]
pub struct Envelope {
    pub request: Request,
    pub reply: mpsc::Sender<Response>,
}

/// A source of [`Request`]s.
///
/// Implementations listen on some transport — a Unix socket, an in-memory
/// channel, … — and forward decoded requests into the provided
/// [`mpsc::Sender`].  All requests from all sources end up on one consumer,
/// so moves for the same window are applied strictly one after another.
///
/// # Contract
///
/// * [`run`](CommandSource::run) **blocks** until the source is exhausted or
///   an unrecoverable error occurs.
/// * Each received request must be sent through `sink` exactly once.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait CommandSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Start listening and forward every incoming request into `sink`.
    ///
    /// This method blocks the calling thread.  To run multiple sources
    /// concurrently, spawn each one on its own thread.
    fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use std::cell::{Cell, RefCell};

    //  Mock WindowHost

    /// A test double that records every frame applied to it.
    #[derive(Debug, Default)]
    struct MockHost {
        applied: RefCell<Vec<(WindowId, Rect)>>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("mock error")]
    struct MockError;

    impl WindowHost for MockHost {
        type Error = MockError;

        fn focused_window(&self) -> Result<Option<FocusedWindow>, MockError> {
            Ok(Some(FocusedWindow {
                id: "0xdead".into(),
                frame: Rect::new(0.0, 0.0, 800.0, 600.0),
                screen: Rect::new(0.0, 0.0, 1600.0, 900.0),
            }))
        }

        fn set_frame(&self, window: &WindowId, frame: Rect) -> Result<(), MockError> {
            self.applied.borrow_mut().push((window.clone(), frame));
            Ok(())
        }
    }

    #[test]
    fn mock_host_records_frames() {
        let host = MockHost::default();
        let w = host.focused_window().unwrap().unwrap();
        host.set_frame(&w.id, w.screen).unwrap();
        assert_eq!(host.applied.borrow().len(), 1);
        assert_eq!(host.applied.borrow()[0].1, Rect::new(0.0, 0.0, 1600.0, 900.0));
    }

    //  Gate through a box

    struct CountingGate {
        delegated: Cell<usize>,
    }

    impl TiledWindowGate for CountingGate {
        fn is_tiled(&self, _window: &WindowId) -> bool {
            true
        }

        fn delegate(&self, _direction: Direction) {
            self.delegated.set(self.delegated.get() + 1);
        }
    }

    #[test]
    fn boxed_gate_forwards_both_methods() {
        let gate: Box<CountingGate> = Box::new(CountingGate {
            delegated: Cell::new(0),
        });
        assert!(gate.is_tiled(&"x".into()));
        TiledWindowGate::delegate(&gate, Direction::Up);
        assert_eq!(gate.delegated.get(), 1);
    }

    //  Mock CommandSource

    /// A test double that emits a fixed sequence of requests.
    struct MockSource {
        requests: Vec<Request>,
    }

    impl CommandSource for MockSource {
        type Error = MockError;

        fn run(&mut self, sink: mpsc::Sender<Envelope>) -> Result<(), MockError> {
            for request in self.requests.drain(..) {
                let (reply, _rx) = mpsc::channel();
                let _ = sink.send(Envelope { request, reply });
            }
            Ok(())
        }
    }

    #[test]
    fn mock_source_emits_requests() {
        let mut src = MockSource {
            requests: vec![
                Request {
                    command: Command::Move {
                        direction: Direction::Right,
                        modifier: false,
                    },
                    focused: None,
                },
                Request {
                    command: Command::ResetAll,
                    focused: None,
                },
            ],
        };
        let (tx, rx) = mpsc::channel();
        src.run(tx).unwrap();
        let got: Vec<Command> = rx.try_iter().map(|e| e.request.command).collect();
        assert_eq!(got.len(), 2);
        assert_eq!(got[1], Command::ResetAll);
    }
}
