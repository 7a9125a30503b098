//! [`WindowHost`] for daemon mode.
//!
//! In daemon mode the window platform lives on the other side of the
//! socket: each [`Request`] carries the focused window as the binding layer
//! saw it, and the frame to apply goes back in the [`Response`].
//! [`RelayHost`] bridges the two.  [`serve`] stages the request's window,
//! runs the command and collects whatever frame the snapper applied.

use crate::command::{FocusedWindow, Request, Response, WindowId};
use crate::geometry::Rect;
use crate::snapper::{Outcome, Snapper};
use crate::traits::{TiledWindowGate, WindowHost};
use log::{debug, warn};
use std::cell::RefCell;

/// Errors from the relay host.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// A frame was set for a window other than the staged one.
    #[error("window {0} is not the focused window of this request")]
    UnknownWindow(WindowId),
}

/// Window host fed by request snapshots.
#[derive(Debug, Default)]
pub struct RelayHost {
    focused: RefCell<Option<FocusedWindow>>,
    applied: RefCell<Option<Rect>>,
}

impl RelayHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `focused` the window the next command operates on, discarding
    /// any frame left over from the previous request.
    pub fn stage(&self, focused: Option<FocusedWindow>) {
        *self.focused.borrow_mut() = focused;
        self.applied.borrow_mut().take();
    }

    /// The frame applied since the last [`stage`](Self::stage), if any.
    pub fn take_applied(&self) -> Option<Rect> {
        self.applied.borrow_mut().take()
    }
}

impl WindowHost for RelayHost {
    type Error = RelayError;

    fn focused_window(&self) -> Result<Option<FocusedWindow>, RelayError> {
        Ok(self.focused.borrow().clone())
    }

    fn set_frame(&self, window: &WindowId, frame: Rect) -> Result<(), RelayError> {
        let mut focused = self.focused.borrow_mut();
        match focused.as_mut() {
            Some(w) if &w.id == window => {
                w.frame = frame;
                *self.applied.borrow_mut() = Some(frame);
                Ok(())
            }
            _ => Err(RelayError::UnknownWindow(window.clone())),
        }
    }
}

/// Run one request against `snapper` and build its response.
pub fn serve<G: TiledWindowGate>(snapper: &mut Snapper<RelayHost, G>, request: Request) -> Response {
    snapper.host().stage(request.focused);
    match snapper.handle(request.command) {
        Ok(outcome) => {
            if let Outcome::Tiled = outcome {
                debug!("request refused: window is tiled");
            }
            Response::frame(snapper.host().take_applied())
        }
        Err(e) => {
            warn!("request failed: {}", e);
            Response::error(e.to_string())
        }
    }
}
