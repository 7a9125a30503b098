//! Application configuration.
//!
//! The configuration is loaded from a JSON file (see `main.rs` for the
//! path).  Every section is optional and unknown keys are ignored, so a
//! minimal `{}` file is valid.  Values that would only blow up at move time
//! (an empty size list, a ratio above 1, a chord bound twice) are rejected
//! by [`Config::load`] instead.
//!
//! # Example
//!
//! ```json
//! {
//!   "sizes": [0.5, 0.3333, 0.6667],
//!   "edge_tolerance": 10.0,
//!   "policy": "slot-based",
//!   "tiling": {
//!     "binary": "/opt/homebrew/bin/aerospace",
//!     "marker": "TilingContainer",
//!     "delegate_args": ["focus", "{direction}"]
//!   },
//!   "bindings": { "modifier": "shift", "left": "ctrl+alt+h" }
//! }
//! ```

use crate::bindings::{Bindings, BindingsConfig};
use crate::calculator::SnapCalculator;
use crate::geometry::DEFAULT_EDGE_TOLERANCE;
use crate::policy::{deserialize_policy, SnapPolicy};
use crate::sizes::Sizes;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ratios cycled through at a screen edge.
    #[serde(default)]
    pub sizes: Sizes,

    /// Pixel distance within which a window counts as touching an edge.
    #[serde(default = "default_edge_tolerance")]
    pub edge_tolerance: f64,

    /// Preset name or explicit policy object.
    #[serde(default, deserialize_with = "deserialize_policy")]
    pub policy: SnapPolicy,

    /// External tiling manager integration.
    #[serde(default)]
    pub tiling: TilingConfig,

    /// Key chords for the binding layer.
    #[serde(default)]
    pub bindings: BindingsConfig,
}

fn default_edge_tolerance() -> f64 {
    DEFAULT_EDGE_TOLERANCE
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sizes: Sizes::default(),
            edge_tolerance: DEFAULT_EDGE_TOLERANCE,
            policy: SnapPolicy::default(),
            tiling: TilingConfig::default(),
            bindings: BindingsConfig::default(),
        }
    }
}

/// How to ask an external tiling manager about the focused window.
///
/// Argument lists are passed to `binary` verbatim except for the
/// placeholders `{id}` (in `describe_args`) and `{direction}` (in
/// `delegate_args`).  The defaults target AeroSpace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilingConfig {
    /// Path of the manager's CLI.  `None` disables the integration.
    pub binary: Option<PathBuf>,
    /// Prints the manager's id of the focused window.
    pub focused_args: Vec<String>,
    /// Prints a description of window `{id}`.
    pub describe_args: Vec<String>,
    /// Substring of the description that marks a tiled window.
    pub marker: String,
    /// Run instead of snapping when the window is tiled.
    pub delegate_args: Option<Vec<String>>,
    /// Limit for each CLI invocation (ms).
    pub timeout_ms: u64,
    /// How long an answer is reused for the same window (ms).
    pub cache_ttl_ms: u64,
}

impl Default for TilingConfig {
    fn default() -> Self {
        let args = |a: &[&str]| a.iter().map(|s| s.to_string()).collect();
        Self {
            binary: None,
            focused_args: args(&["list-windows", "--focused", "--format", "%{window-id}"]),
            describe_args: args(&["debug-windows", "--window-id", "{id}"]),
            marker: "TilingContainer".into(),
            delegate_args: None,
            timeout_ms: 500,
            cache_ttl_ms: 3000,
        }
    }
}

impl Config {
    /// Load and validate configuration from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read {}: {}", path.display(), e)))?;
        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| ConfigError(format!("failed to parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.edge_tolerance.is_finite() && self.edge_tolerance >= 0.0) {
            return Err(ConfigError(format!(
                "edge_tolerance must be a non-negative number, got {}",
                self.edge_tolerance
            )));
        }
        let reset = self.policy.reset;
        for (name, ratio) in [("height", reset.height), ("width", reset.width)] {
            if !(ratio > 0.0 && ratio <= 1.0) {
                return Err(ConfigError(format!(
                    "policy.reset.{} is {}, expected a ratio in (0, 1]",
                    name, ratio
                )));
            }
        }
        if self.tiling.binary.is_some() {
            if self.tiling.focused_args.is_empty() {
                return Err(ConfigError("tiling.focused_args must not be empty".into()));
            }
            if self.tiling.describe_args.is_empty() {
                return Err(ConfigError("tiling.describe_args must not be empty".into()));
            }
            // An empty marker is contained in every description.
            if self.tiling.marker.is_empty() {
                return Err(ConfigError("tiling.marker must not be empty".into()));
            }
        }
        self.key_bindings()?;
        Ok(())
    }

    /// The calculator described by this configuration.
    pub fn calculator(&self) -> SnapCalculator {
        SnapCalculator::new(self.sizes.clone(), self.policy, self.edge_tolerance)
    }

    /// The validated chord table.
    pub fn key_bindings(&self) -> Result<Bindings, ConfigError> {
        Bindings::from_config(&self.bindings).map_err(|e| ConfigError(format!("bindings: {}", e)))
    }
}

/// Error from loading, parsing or validating a configuration file.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(String);
