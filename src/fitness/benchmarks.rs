//! Benchmark objectives
//!
//! Closed-form mathematical objectives for the continuous search space.
//! Both are minimization problems with their optimum at the origin.

use std::f64::consts::PI;

use crate::error::EvaluatorError;
use crate::fitness::traits::{Evaluation, Evaluator};
use crate::space::Position;

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable.
#[derive(Clone, Debug, Default)]
pub struct Sphere;

impl Sphere {
    /// Create a new Sphere objective
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the raw function
    pub fn evaluate_raw(x: &[f64]) -> f64 {
        x.iter().map(|xi| xi * xi).sum()
    }
}

impl Evaluator for Sphere {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation::score(Self::evaluate_raw(position.as_slice())))
    }
}

/// Rastrigin function: f(x) = Σ(xᵢ² - 10cos(2πxᵢ) + 10)
///
/// Highly multimodal with many local minima.
#[derive(Clone, Debug, Default)]
pub struct Rastrigin;

impl Rastrigin {
    /// Create a new Rastrigin objective
    pub fn new() -> Self {
        Self
    }

    /// Evaluate the raw function
    pub fn evaluate_raw(x: &[f64]) -> f64 {
        x.iter()
            .map(|xi| xi * xi - 10.0 * (2.0 * PI * xi).cos() + 10.0)
            .sum()
    }
}

impl Evaluator for Rastrigin {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        Ok(Evaluation::score(Self::evaluate_raw(position.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_at_origin() {
        assert_eq!(Sphere::evaluate_raw(&[0.0, 0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_sphere_value() {
        let eval = Sphere::new()
            .evaluate(&Position::new(vec![1.0, 2.0, 3.0]))
            .unwrap();
        assert_relative_eq!(eval.error, 14.0);
    }

    #[test]
    fn test_rastrigin_at_origin() {
        assert_relative_eq!(Rastrigin::evaluate_raw(&[0.0; 5]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rastrigin_away_from_origin_positive() {
        let eval = Rastrigin::new()
            .evaluate(&Position::new(vec![2.5, -3.1]))
            .unwrap();
        assert!(eval.error > 0.0);
    }
}
