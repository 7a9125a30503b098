//! Commands and types used throughout ratiosnap.
//!
//! This module defines the vocabulary that all components share:
//! [`Command`] describes every action the snapper can perform,
//! and [`Direction`] / [`WindowId`] / [`FocusedWindow`] provide the
//! supporting data types.
//!
//! Direction strings are parsed leniently ("left", "Left", " LEFT ") but
//! anything other than the four compass values is rejected when the command
//! is decoded, so the snapper never sees an unknown direction.

use crate::geometry::{Axis, Rect};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Direction of a snap move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// The axis this direction moves along.
    pub fn axis(self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// Step along the axis: `-1` toward the origin, `+1` away from it.
    pub fn step(self) -> isize {
        match self {
            Direction::Left | Direction::Up => -1,
            Direction::Right | Direction::Down => 1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
            Direction::Up => write!(f, "up"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Parse a direction string (case-insensitive).
pub fn parse_direction(s: &str) -> Option<Direction> {
    match s.trim().to_lowercase().as_str() {
        "left" => Some(Direction::Left),
        "right" => Some(Direction::Right),
        "up" => Some(Direction::Up),
        "down" => Some(Direction::Down),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_direction(&s).ok_or_else(|| DeError::custom(format!("invalid direction: {:?}", s)))
    }
}

/// Opaque identifier of a window, as reported by the host platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WindowId(pub String);

impl From<&str> for WindowId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The currently focused window and the usable area of its screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusedWindow {
    pub id: WindowId,
    /// Current window rectangle.
    pub frame: Rect,
    /// Usable rectangle of the screen containing the window (menu bar and
    /// dock excluded).
    pub screen: Rect,
}

/// Every action the snapper can perform.
///
/// Commands are produced by [`CommandSource`](crate::traits::CommandSource)
/// implementations and consumed by the [`Snapper`](crate::snapper::Snapper).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Snap the focused window toward `direction`.
    ///
    /// `modifier` is whether the designated modifier key was held when the
    /// binding fired; it enables slot-by-slot movement and preserves the
    /// opposite axis.
    Move {
        direction: Direction,
        #[serde(default)]
        modifier: bool,
    },

    /// A key chord pressed in the binding layer, e.g. `"ctrl+alt+left"`.
    ///
    /// Resolved against the configured [`Bindings`](crate::bindings::Bindings);
    /// unbound chords are reported as errors.
    Press(String),

    /// Toggle the focused window between filling its screen and the frame
    /// it had before.
    ToggleFill,

    /// Forget the cycling state of one window.
    Reset(WindowId),

    /// Forget the cycling state of every window.
    ResetAll,
}

/// One line on the socket: a command plus the focused window as the
/// binding layer saw it when the key fired.
///
/// ```json
/// {"command":{"Move":{"direction":"left","modifier":true}},
///  "focused":{"id":"42","frame":{...},"screen":{...}}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub command: Command,
    /// `None` when no window has focus.
    #[serde(default)]
    pub focused: Option<FocusedWindow>,
}

/// The answer to a [`Request`]: the frame to apply, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub frame: Option<Rect>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn frame(frame: Option<Rect>) -> Self {
        Self { frame, error: None }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            frame: None,
            error: Some(message.into()),
        }
    }
}
