//! Position and velocity vectors
//!
//! A position is an ordered sequence of D real numbers; in the binary search
//! space every coordinate is constrained to exactly 0.0 or 1.0 after each
//! update. A velocity is an unconstrained real vector of the same length.

use serde::{Deserialize, Serialize};

/// A candidate solution in the search space
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    coords: Vec<f64>,
}

impl Position {
    /// Create a new position from coordinates
    pub fn new(coords: Vec<f64>) -> Self {
        Self { coords }
    }

    /// Create a zero-filled position of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            coords: vec![0.0; dimension],
        }
    }

    /// Get the dimensionality
    pub fn dimension(&self) -> usize {
        self.coords.len()
    }

    /// Get the coordinates as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.coords
    }

    /// Get the coordinates as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.coords
    }

    /// Take the underlying vector
    pub fn into_inner(self) -> Vec<f64> {
        self.coords
    }

    /// Indices of nonzero coordinates (the active feature mask, binary case)
    pub fn active_indices(&self) -> Vec<usize> {
        self.coords
            .iter()
            .enumerate()
            .filter(|(_, &c)| c != 0.0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of nonzero coordinates
    pub fn active_count(&self) -> usize {
        self.coords.iter().filter(|&&c| c != 0.0).count()
    }

    /// True when every coordinate is zero (the infeasible binary mask)
    pub fn is_all_zero(&self) -> bool {
        self.coords.iter().all(|&c| c == 0.0)
    }
}

impl std::ops::Index<usize> for Position {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.coords[index]
    }
}

impl std::ops::IndexMut<usize> for Position {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.coords[index]
    }
}

impl From<Vec<f64>> for Position {
    fn from(coords: Vec<f64>) -> Self {
        Self { coords }
    }
}

impl From<Position> for Vec<f64> {
    fn from(position: Position) -> Self {
        position.coords
    }
}

impl<const N: usize> From<[f64; N]> for Position {
    fn from(arr: [f64; N]) -> Self {
        Self {
            coords: arr.to_vec(),
        }
    }
}

impl<'a> IntoIterator for &'a Position {
    type Item = &'a f64;
    type IntoIter = std::slice::Iter<'a, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}

/// An agent's velocity vector
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    components: Vec<f64>,
}

impl Velocity {
    /// Create a new velocity from components
    pub fn new(components: Vec<f64>) -> Self {
        Self { components }
    }

    /// Create a zero velocity of the given dimension
    pub fn zeros(dimension: usize) -> Self {
        Self {
            components: vec![0.0; dimension],
        }
    }

    /// Get the dimensionality
    pub fn dimension(&self) -> usize {
        self.components.len()
    }

    /// Get the components as a slice
    pub fn as_slice(&self) -> &[f64] {
        &self.components
    }

    /// Get the components as a mutable slice
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.components
    }
}

impl std::ops::Index<usize> for Velocity {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.components[index]
    }
}

impl std::ops::IndexMut<usize> for Velocity {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.components[index]
    }
}

impl From<Vec<f64>> for Velocity {
    fn from(components: Vec<f64>) -> Self {
        Self { components }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_new() {
        let p = Position::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(p.dimension(), 3);
        assert_eq!(p.as_slice(), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_position_indexing() {
        let mut p = Position::zeros(3);
        p[1] = 42.0;
        assert_eq!(p[0], 0.0);
        assert_eq!(p[1], 42.0);
    }

    #[test]
    fn test_position_active_mask() {
        let p = Position::new(vec![1.0, 0.0, 1.0, 0.0, 1.0]);
        assert_eq!(p.active_indices(), vec![0, 2, 4]);
        assert_eq!(p.active_count(), 3);
        assert!(!p.is_all_zero());
    }

    #[test]
    fn test_position_all_zero() {
        assert!(Position::zeros(5).is_all_zero());
        assert_eq!(Position::zeros(5).active_count(), 0);
    }

    #[test]
    fn test_position_conversions() {
        let p: Position = [1.0, 2.0].into();
        let v: Vec<f64> = p.clone().into();
        assert_eq!(v, vec![1.0, 2.0]);
        assert_eq!(Position::from(v), p);
    }

    #[test]
    fn test_velocity_new() {
        let mut v = Velocity::zeros(2);
        v[0] = -1.5;
        assert_eq!(v.dimension(), 2);
        assert_eq!(v.as_slice(), &[-1.5, 0.0]);
    }

    #[test]
    fn test_position_serialization() {
        let p = Position::new(vec![1.0, 0.0, 1.0]);
        let json = serde_json::to_string(&p).unwrap();
        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(p, back);
    }
}
