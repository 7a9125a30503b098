//! Key chords and what they do.
//!
//! The binding layer that actually captures keys lives outside ratiosnap.
//! It registers the chords from the same `bindings` config section, each
//! plain and with the designated modifier added, and forwards every press
//! as [`Command::Press`](crate::command::Command::Press).  The derived
//! chord turns the same action into its modifier variant (slot moves,
//! opposite axis preserved).  The daemon logs the resolved table at
//! startup.
//!
//! Chords are written `"ctrl+alt+left"`: modifiers in any order, key last,
//! case-insensitive.

use crate::command::Direction;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// A modifier key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modifier {
    Cmd,
    Ctrl,
    Alt,
    Shift,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Modifier::Cmd => write!(f, "cmd"),
            Modifier::Ctrl => write!(f, "ctrl"),
            Modifier::Alt => write!(f, "alt"),
            Modifier::Shift => write!(f, "shift"),
        }
    }
}

impl FromStr for Modifier {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cmd" | "command" | "super" | "meta" => Ok(Modifier::Cmd),
            "ctrl" | "control" => Ok(Modifier::Ctrl),
            "alt" | "option" | "opt" => Ok(Modifier::Alt),
            "shift" => Ok(Modifier::Shift),
            _ => Err(BindingError::UnknownModifier(s.to_string())),
        }
    }
}

impl Serialize for Modifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A set of modifiers plus one key, normalised so equal chords compare
/// equal regardless of spelling order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    mods: BTreeSet<Modifier>,
    key: String,
}

impl Chord {
    pub fn new(mods: impl IntoIterator<Item = Modifier>, key: &str) -> Self {
        Self {
            mods: mods.into_iter().collect(),
            key: key.trim().to_lowercase(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn has(&self, modifier: Modifier) -> bool {
        self.mods.contains(&modifier)
    }

    /// This chord with `modifier` added.
    pub fn with(&self, modifier: Modifier) -> Chord {
        let mut mods = self.mods.clone();
        mods.insert(modifier);
        Chord {
            mods,
            key: self.key.clone(),
        }
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.mods {
            write!(f, "{}+", m)?;
        }
        f.write_str(&self.key)
    }
}

impl FromStr for Chord {
    type Err = BindingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts: Vec<&str> = s.split('+').map(str::trim).collect();
        let key = parts.pop().unwrap_or_default();
        if key.is_empty() {
            return Err(BindingError::EmptyKey(s.to_string()));
        }
        let mods = parts
            .into_iter()
            .map(Modifier::from_str)
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Chord {
            mods,
            key: key.to_lowercase(),
        })
    }
}

impl Serialize for Chord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// What a chord triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Move(Direction),
    ToggleFill,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move(d) => write!(f, "move {}", d),
            Action::ToggleFill => write!(f, "toggle fill"),
        }
    }
}

/// A chord resolved to an action, with whether it is the modifier variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub action: Action,
    pub modifier: bool,
}

/// Errors from parsing or validating key bindings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BindingError {
    #[error("unknown modifier {0:?}")]
    UnknownModifier(String),
    #[error("chord {0:?} has no key")]
    EmptyKey(String),
    #[error("chord {chord} is bound to both {first} and {second}")]
    Duplicate {
        chord: String,
        first: Action,
        second: Action,
    },
    #[error("chord {chord} already contains the derived modifier {modifier}")]
    ModifierInChord { chord: String, modifier: Modifier },
}

/// Config-file section mapping actions to chords.
///
/// ```json
/// { "modifier": "shift", "left": "ctrl+alt+h", "fill": null }
/// ```
///
/// A `null` chord leaves the action unbound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BindingsConfig {
    /// Modifier added to each chord to derive its modifier variant.
    pub modifier: Modifier,
    pub left: Option<Chord>,
    pub right: Option<Chord>,
    pub up: Option<Chord>,
    pub down: Option<Chord>,
    pub fill: Option<Chord>,
}

impl Default for BindingsConfig {
    fn default() -> Self {
        let base = |key: &str| Some(Chord::new([Modifier::Ctrl, Modifier::Alt], key));
        Self {
            modifier: Modifier::Shift,
            left: base("left"),
            right: base("right"),
            up: base("up"),
            down: base("down"),
            fill: base("return"),
        }
    }
}

/// Validated lookup table from chord to action.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    table: HashMap<Chord, Resolved>,
}

impl Bindings {
    /// Build the table, deriving the modifier chord for every configured one.
    pub fn from_config(config: &BindingsConfig) -> Result<Self, BindingError> {
        let configured = [
            (Action::Move(Direction::Left), &config.left),
            (Action::Move(Direction::Right), &config.right),
            (Action::Move(Direction::Up), &config.up),
            (Action::Move(Direction::Down), &config.down),
            (Action::ToggleFill, &config.fill),
        ];

        let mut bindings = Bindings::default();
        for (action, chord) in configured {
            let Some(chord) = chord else { continue };
            if chord.has(config.modifier) {
                return Err(BindingError::ModifierInChord {
                    chord: chord.to_string(),
                    modifier: config.modifier,
                });
            }
            bindings.bind(chord.clone(), action, false)?;
            bindings.bind(chord.with(config.modifier), action, true)?;
        }
        Ok(bindings)
    }

    fn bind(&mut self, chord: Chord, action: Action, modifier: bool) -> Result<(), BindingError> {
        if let Some(existing) = self.table.get(&chord) {
            return Err(BindingError::Duplicate {
                chord: chord.to_string(),
                first: existing.action,
                second: action,
            });
        }
        self.table.insert(chord, Resolved { action, modifier });
        Ok(())
    }

    /// Look up a pressed chord.
    pub fn resolve(&self, chord: &Chord) -> Option<Resolved> {
        self.table.get(chord).copied()
    }

    /// Every resolvable chord, derived ones included.
    pub fn iter(&self) -> impl Iterator<Item = (&Chord, &Resolved)> {
        self.table.iter()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
