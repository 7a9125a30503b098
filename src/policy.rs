//! Snap policy: the knobs that distinguish one snapping style from another.
//!
//! All styles share the same decision table (cycle at the edge, move by
//! slot with the modifier, otherwise snap to the edge).  They differ in what
//! happens at the edge, what happens to the axis the window is *not* moving
//! along, and whether reversing direction starts the size sequence over.
//! [`Preset`] names the combinations that are useful in practice.
//!
//! In the config file the policy is either a preset name or a full object:
//!
//! ```json
//! { "policy": "windows-style" }
//! { "policy": { "edge": "complement", "opposite_axis": "independent" } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// What a repeated press does once the window is already at the edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeBehavior {
    /// Advance to the next configured size, wrapping around.
    Cycle,
    /// Jump to the complementary size (`1/3` ↔ `2/3`) when it is
    /// configured; otherwise cycle.
    Complement,
}

/// What happens to the axis perpendicular to the move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OppositeAxisPolicy {
    /// Horizontal moves always reset the height; vertical moves leave the
    /// width alone.
    ResetOnHorizontal,
    /// The axes are managed independently and never reset each other.
    Independent,
    /// Either move resets the other axis, unless the move cycled at the
    /// edge or the modifier was held.
    ResetUnlessCyclingOrModifier,
}

/// Ratios the opposite axis is reset to.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetRatios {
    /// Height applied by a horizontal move.
    pub height: f64,
    /// Width applied by a vertical move.
    pub width: f64,
}

impl Default for ResetRatios {
    fn default() -> Self {
        Self {
            height: 1.0,
            width: 0.5,
        }
    }
}

/// The full set of snapping knobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapPolicy {
    pub edge: EdgeBehavior,
    pub opposite_axis: OppositeAxisPolicy,
    /// Start over at the first configured size when the direction on an
    /// axis reverses and the window has to travel to the other edge.
    pub reset_on_direction_change: bool,
    pub reset: ResetRatios,
}

impl Default for SnapPolicy {
    fn default() -> Self {
        Preset::SlotBased.policy()
    }
}

/// Named policy combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// Cycle at the edge, slot moves with the modifier, the modifier also
    /// preserves the opposite axis.
    SlotBased,
    /// Left/right give full-height columns; reversing starts the size
    /// sequence over.
    WindowsStyle,
    /// Width and height are tuned separately and never interfere.
    FineGrained,
    /// Repeated presses flip between a size and its complement.
    Complement,
}

impl Preset {
    pub fn policy(self) -> SnapPolicy {
        let reset = ResetRatios::default();
        match self {
            Preset::SlotBased => SnapPolicy {
                edge: EdgeBehavior::Cycle,
                opposite_axis: OppositeAxisPolicy::ResetUnlessCyclingOrModifier,
                reset_on_direction_change: false,
                reset,
            },
            Preset::WindowsStyle => SnapPolicy {
                edge: EdgeBehavior::Cycle,
                opposite_axis: OppositeAxisPolicy::ResetOnHorizontal,
                reset_on_direction_change: true,
                reset,
            },
            Preset::FineGrained => SnapPolicy {
                edge: EdgeBehavior::Cycle,
                opposite_axis: OppositeAxisPolicy::Independent,
                reset_on_direction_change: false,
                reset,
            },
            Preset::Complement => SnapPolicy {
                edge: EdgeBehavior::Complement,
                opposite_axis: OppositeAxisPolicy::Independent,
                reset_on_direction_change: false,
                reset,
            },
        }
    }
}

/// Config-file form of a policy: a preset name or an explicit object.
#[derive(Deserialize)]
#[serde(untagged)]
enum PolicySpec {
    Preset(Preset),
    Custom(SnapPolicy),
}

/// Deserialize a [`SnapPolicy`] from either a preset name or an object.
///
/// Used with `#[serde(deserialize_with = ...)]` on the config field.
pub fn deserialize_policy<'de, D>(deserializer: D) -> Result<SnapPolicy, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match PolicySpec::deserialize(deserializer)? {
        PolicySpec::Preset(p) => p.policy(),
        PolicySpec::Custom(p) => p,
    })
}
