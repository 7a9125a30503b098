//! Tiled-window gates.
//!
//! Before a window is snapped, the [`TiledWindowGate`] decides whether an
//! external tiling manager owns it.  [`NeverTiled`] is used when no manager
//! is configured; [`cli::CliGate`] asks the manager's command-line client.

pub mod cache;
pub mod cli;

use crate::command::WindowId;
use crate::config::TilingConfig;
use crate::traits::TiledWindowGate;
use log::info;

/// Gate for setups without a tiling manager: nothing is ever tiled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverTiled;

impl TiledWindowGate for NeverTiled {
    fn is_tiled(&self, _window: &WindowId) -> bool {
        false
    }
}

/// Build the gate described by `config`.
///
/// Without a `binary` the integration is disabled entirely.
pub fn from_config(config: &TilingConfig) -> Box<dyn TiledWindowGate> {
    match &config.binary {
        Some(binary) => {
            info!("tiling manager integration via {}", binary.display());
            Box::new(cli::CliGate::new(binary.clone(), config))
        }
        None => {
            info!("no tiling manager configured");
            Box::new(NeverTiled)
        }
    }
}
