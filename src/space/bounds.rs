//! Bounds for search-space dimensions
//!
//! This module provides the per-dimension bounds type used by the continuous
//! search space and by the optional velocity clamp.

use serde::{Deserialize, Serialize};

use crate::error::SwarmError;

/// Inclusive bounds for a single dimension
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    /// Lower bound (inclusive)
    pub min: f64,
    /// Upper bound (inclusive)
    pub max: f64,
}

impl Bounds {
    /// Create new bounds
    ///
    /// # Panics
    /// Panics if min > max
    pub fn new(min: f64, max: f64) -> Self {
        assert!(
            min <= max,
            "Invalid bounds: min ({}) must be <= max ({})",
            min,
            max
        );
        Self { min, max }
    }

    /// Fallible constructor for bounds sourced from configuration
    pub fn try_new(min: f64, max: f64) -> Result<Self, SwarmError> {
        if min > max {
            return Err(SwarmError::Configuration(format!(
                "Invalid bounds: min ({min}) must be <= max ({max})"
            )));
        }
        Ok(Self { min, max })
    }

    /// Create symmetric bounds centered at 0
    pub fn symmetric(half_width: f64) -> Self {
        Self::new(-half_width, half_width)
    }

    /// Get the range (max - min)
    pub fn range(&self) -> f64 {
        self.max - self.min
    }

    /// Check if a value is within bounds
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Clamp a value to be within bounds
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

impl From<(f64, f64)> for Bounds {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

/// Per-dimension bounds for a continuous search space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiBounds {
    /// Bounds for each dimension
    pub bounds: Vec<Bounds>,
}

impl MultiBounds {
    /// Create new multi-dimensional bounds
    pub fn new(bounds: Vec<Bounds>) -> Self {
        Self { bounds }
    }

    /// Create uniform bounds for all dimensions
    pub fn uniform(bound: Bounds, dimension: usize) -> Self {
        Self {
            bounds: vec![bound; dimension],
        }
    }

    /// Create symmetric bounds for all dimensions
    pub fn symmetric(half_width: f64, dimension: usize) -> Self {
        Self::uniform(Bounds::symmetric(half_width), dimension)
    }

    /// Get number of dimensions
    pub fn dimension(&self) -> usize {
        self.bounds.len()
    }

    /// Get bounds for a specific dimension
    pub fn get(&self, index: usize) -> Option<&Bounds> {
        self.bounds.get(index)
    }

    /// Clamp a vector in place
    pub fn clamp_vec(&self, values: &mut [f64]) {
        for (value, b) in values.iter_mut().zip(self.bounds.iter()) {
            *value = b.clamp(*value);
        }
    }

    /// Check if all values are within bounds
    pub fn contains_vec(&self, values: &[f64]) -> bool {
        values.len() == self.bounds.len()
            && values
                .iter()
                .zip(self.bounds.iter())
                .all(|(&v, b)| b.contains(v))
    }

    /// Reject empty or inverted bounds at construction time
    ///
    /// Inverted bounds can reach here through deserialization or a struct
    /// literal, bypassing the panicking constructor.
    pub fn validate(&self) -> Result<(), SwarmError> {
        if self.bounds.is_empty() {
            return Err(SwarmError::Configuration(
                "Bounds must cover at least one dimension".to_string(),
            ));
        }
        for b in &self.bounds {
            Bounds::try_new(b.min, b.max)?;
        }
        Ok(())
    }
}

impl FromIterator<(f64, f64)> for MultiBounds {
    fn from_iter<I: IntoIterator<Item = (f64, f64)>>(iter: I) -> Self {
        Self {
            bounds: iter.into_iter().map(Bounds::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_new() {
        let b = Bounds::new(-100.0, 100.0);
        assert_eq!(b.min, -100.0);
        assert_eq!(b.max, 100.0);
        assert_eq!(b.range(), 200.0);
    }

    #[test]
    #[should_panic(expected = "Invalid bounds")]
    fn test_bounds_inverted() {
        Bounds::new(5.0, -5.0);
    }

    #[test]
    fn test_bounds_contains_and_clamp() {
        let b = Bounds::symmetric(10.0);
        assert!(b.contains(0.0));
        assert!(b.contains(-10.0));
        assert!(!b.contains(10.1));
        assert_eq!(b.clamp(42.0), 10.0);
        assert_eq!(b.clamp(-42.0), -10.0);
        assert_eq!(b.clamp(3.0), 3.0);
    }

    #[test]
    fn test_multi_bounds_from_tuples() {
        let mb: MultiBounds = vec![(-100.0, 100.0), (-100.0, 100.0)].into_iter().collect();
        assert_eq!(mb.dimension(), 2);
        assert_eq!(mb.get(0), Some(&Bounds::new(-100.0, 100.0)));
        assert_eq!(mb.get(2), None);
    }

    #[test]
    fn test_multi_bounds_clamp_vec() {
        let mb = MultiBounds::symmetric(5.0, 3);
        let mut values = vec![-10.0, 0.0, 10.0];
        mb.clamp_vec(&mut values);
        assert_eq!(values, vec![-5.0, 0.0, 5.0]);
    }

    #[test]
    fn test_multi_bounds_contains_vec() {
        let mb = MultiBounds::symmetric(5.0, 3);
        assert!(mb.contains_vec(&[0.0, -5.0, 5.0]));
        assert!(!mb.contains_vec(&[0.0, -5.1, 5.0]));
        // dimension mismatch is never "contained"
        assert!(!mb.contains_vec(&[0.0, 0.0]));
    }

    #[test]
    fn test_multi_bounds_validate_empty() {
        let mb = MultiBounds::new(vec![]);
        assert!(mb.validate().is_err());
        assert!(MultiBounds::symmetric(1.0, 1).validate().is_ok());
    }

    #[test]
    fn test_bounds_try_new() {
        assert_eq!(Bounds::try_new(-1.0, 1.0), Ok(Bounds::new(-1.0, 1.0)));
        assert!(matches!(
            Bounds::try_new(1.0, -1.0),
            Err(SwarmError::Configuration(_))
        ));
    }

    #[test]
    fn test_multi_bounds_validate_inverted() {
        // a literal (or deserialized) inverted bound never went through the
        // panicking constructor; validation must still reject it
        let mb = MultiBounds::new(vec![
            Bounds::new(-1.0, 1.0),
            Bounds {
                min: 5.0,
                max: -5.0,
            },
        ]);
        assert!(matches!(
            mb.validate(),
            Err(SwarmError::Configuration(_))
        ));
    }
}
