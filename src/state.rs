//! Per-window cycling state.
//!
//! A window has no entry in the [`StateStore`] until it is moved for the
//! first time; a missing entry is read as [`WindowState::default`], i.e. a
//! window filling its screen.  Entries live in memory only and are dropped
//! by [`StateStore::reset`].

use crate::command::{Direction, WindowId};
use crate::geometry::Rect;
use crate::sizes::Sizes;
use std::collections::HashMap;

/// Where an axis sits in the size sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisIndex {
    /// The whole screen extent (100%), outside the configured sequence.
    #[default]
    Full,
    /// An offset into the configured [`Sizes`].
    Size(usize),
}

impl AxisIndex {
    /// The ratio this index stands for.
    pub fn ratio(self, sizes: &Sizes) -> f64 {
        match self {
            AxisIndex::Full => 1.0,
            AxisIndex::Size(i) => sizes.get(i),
        }
    }

    /// The next index in the cycle: `Full` enters the sequence at its first
    /// entry, the last entry wraps back to the first.
    pub fn advance(self, sizes: &Sizes) -> AxisIndex {
        match self {
            AxisIndex::Full => AxisIndex::Size(0),
            AxisIndex::Size(i) => AxisIndex::Size((i + 1) % sizes.len()),
        }
    }

    /// Index for a window currently occupying `ratio` of the screen.
    ///
    /// The stored index wins when it still describes the window, so
    /// duplicate entries in the sequence keep their order.  Otherwise the
    /// first matching size is used, and anything unrecognised counts as
    /// full so the next cycle starts from the beginning.
    pub fn resolve(self, ratio: f64, sizes: &Sizes) -> AxisIndex {
        if crate::geometry::same_ratio(self.ratio(sizes), ratio) {
            return self;
        }
        match sizes.position(ratio) {
            Some(i) => AxisIndex::Size(i),
            None => AxisIndex::Full,
        }
    }
}

/// Frame and indices remembered by the fill toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SavedFrame {
    pub frame: Rect,
    pub width: AxisIndex,
    pub height: AxisIndex,
}

/// Cycling state of one window.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowState {
    pub width: AxisIndex,
    pub height: AxisIndex,
    pub last_horizontal: Option<Direction>,
    pub last_vertical: Option<Direction>,
    /// Set while the window is filled by the fill toggle.
    pub saved: Option<SavedFrame>,
}

/// Owns the state of every window that has been moved.
#[derive(Debug, Default)]
pub struct StateStore {
    windows: HashMap<WindowId, WindowState>,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// State for `id`, or the untouched default.
    pub fn get(&self, id: &WindowId) -> WindowState {
        self.windows.get(id).copied().unwrap_or_default()
    }

    /// Whether `id` has been moved since the last reset.
    pub fn contains(&self, id: &WindowId) -> bool {
        self.windows.contains_key(id)
    }

    pub fn insert(&mut self, id: WindowId, state: WindowState) {
        self.windows.insert(id, state);
    }

    /// Forget one window, or every window when `id` is `None`.
    ///
    /// Returns how many entries were dropped.
    pub fn reset(&mut self, id: Option<&WindowId>) -> usize {
        match id {
            Some(id) => usize::from(self.windows.remove(id).is_some()),
            None => {
                let n = self.windows.len();
                self.windows.clear();
                n
            }
        }
    }
}
