//! **ratiosnap** — snap windows to screen edges and cycle their size.
//!
//! Pressing a direction moves the focused window against that screen edge;
//! pressing it again while the window is already there cycles its size
//! through a configured list of ratios (½ → ⅓ → ⅔ → ½ by default).  With a
//! modifier held, windows whose size divides the screen evenly step slot by
//! slot instead.  Windows owned by an external tiling manager are left
//! alone.
//!
//! # Architecture
//!
//! The decision logic is a pure function, [`calculator::SnapCalculator`],
//! driven by per-window [`state::WindowState`] and a [`policy::SnapPolicy`].
//! The [`snapper::Snapper`] wires it to three traits:
//!
//! * [`traits::WindowHost`] — reads the focused window and applies frames.
//! * [`traits::TiledWindowGate`] — asks whether a tiling manager owns the
//!   window ([`gate::cli::CliGate`] shells out to its CLI).
//! * [`traits::CommandSource`] — delivers requests ([`ipc`] listens on a
//!   Unix socket; [`relay::RelayHost`] answers with the frame to apply).

pub mod bindings;
pub mod calculator;
pub mod command;
pub mod config;
pub mod gate;
pub mod geometry;
pub mod ipc;
pub mod policy;
pub mod relay;
pub mod sizes;
pub mod snapper;
pub mod state;
pub mod traits;
