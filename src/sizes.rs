//! The configured sequence of size ratios.
//!
//! [`Sizes`] can only be built through [`Sizes::new`] (or deserialization,
//! which routes through it), so an empty list or an out-of-range ratio is
//! rejected when the configuration is read rather than on the first move.

use serde::{Deserialize, Deserializer, Serialize};

/// Ordered, non-empty list of ratios in `(0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Sizes(Vec<f64>);

/// Why a sizes list was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SizesError {
    #[error("sizes list must not be empty")]
    Empty,
    #[error("size #{index} is {value}, expected a ratio in (0, 1]")]
    OutOfRange { index: usize, value: f64 },
}

impl Sizes {
    /// Validate and wrap a ratio list.
    pub fn new(ratios: Vec<f64>) -> Result<Self, SizesError> {
        if ratios.is_empty() {
            return Err(SizesError::Empty);
        }
        for (index, &value) in ratios.iter().enumerate() {
            // Also rejects NaN.
            if !(value > 0.0 && value <= 1.0) {
                return Err(SizesError::OutOfRange { index, value });
            }
        }
        Ok(Self(ratios))
    }

    /// Ratio at `index`.  Callers hold indices produced by this list, so an
    /// out-of-range index falls back to a full ratio instead of panicking.
    pub fn get(&self, index: usize) -> f64 {
        self.0.get(index).copied().unwrap_or(1.0)
    }

    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    /// Index of the first entry matching `ratio`.
    pub fn position(&self, ratio: f64) -> Option<usize> {
        self.0
            .iter()
            .position(|&r| crate::geometry::same_ratio(r, ratio))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }
}

impl Default for Sizes {
    fn default() -> Self {
        Self(vec![1.0 / 2.0, 1.0 / 3.0, 2.0 / 3.0])
    }
}

impl<'de> Deserialize<'de> for Sizes {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let ratios = Vec::<f64>::deserialize(deserializer)?;
        Sizes::new(ratios).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_list_rejected() {
        assert_eq!(Sizes::new(vec![]), Err(SizesError::Empty));
    }

    #[test]
    fn zero_and_above_one_rejected() {
        assert_eq!(
            Sizes::new(vec![0.5, 0.0]),
            Err(SizesError::OutOfRange {
                index: 1,
                value: 0.0
            })
        );
        assert!(matches!(
            Sizes::new(vec![1.5]),
            Err(SizesError::OutOfRange { index: 0, .. })
        ));
        assert!(Sizes::new(vec![f64::NAN]).is_err());
    }

    #[test]
    fn full_ratio_accepted() {
        let s = Sizes::new(vec![1.0, 0.5]).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get(0), 1.0);
    }

    #[test]
    fn default_is_half_third_two_thirds() {
        let s = Sizes::default();
        let v: Vec<f64> = s.iter().collect();
        assert_eq!(v, vec![0.5, 1.0 / 3.0, 2.0 / 3.0]);
    }

    #[test]
    fn position_matches_within_epsilon() {
        let s = Sizes::default();
        assert_eq!(s.position(0.333), Some(1));
        assert_eq!(s.position(0.8), None);
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<Sizes>("[]").is_err());
        assert!(serde_json::from_str::<Sizes>("[0.5, 2.0]").is_err());
        let s: Sizes = serde_json::from_str("[0.25, 0.75]").unwrap();
        assert_eq!(s.get(1), 0.75);
    }
}
