//! Fitness traits
//!
//! This module defines the evaluator seam between the optimizer and the
//! caller-supplied fitness function, plus the explicit optimization
//! direction. The direction is always configuration, never inferred from the
//! evaluator: closed-form objectives are typically minimized while model-fit
//! scores (out-of-bag style) reward higher values.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::EvaluatorError;
use crate::space::Position;

/// Whether lower or higher errors are better
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Lower is better (closed-form objectives; the default)
    #[default]
    Minimize,
    /// Higher is better (model-fit scores)
    Maximize,
}

impl Direction {
    /// True when `candidate` strictly improves on `incumbent`
    ///
    /// Ties are never improvements: the incumbent (first found) wins.
    pub fn improves(&self, candidate: f64, incumbent: f64) -> bool {
        match self {
            Self::Minimize => candidate < incumbent,
            Self::Maximize => candidate > incumbent,
        }
    }

    /// The infeasible sentinel: strictly worse than any attainable score
    pub fn worst(&self) -> f64 {
        match self {
            Self::Minimize => f64::INFINITY,
            Self::Maximize => f64::NEG_INFINITY,
        }
    }
}

/// Auxiliary per-evaluation diagnostics (e.g. feature importances)
pub type Diagnostics = BTreeMap<String, f64>;

/// The outcome of one fitness evaluation
#[derive(Clone, Debug, PartialEq)]
pub struct Evaluation {
    /// The scalar error/score for the evaluated position
    pub error: f64,
    /// Optional evaluator-defined diagnostics, captured on the agent when
    /// the evaluation improves its personal best
    pub diagnostics: Option<Diagnostics>,
}

impl Evaluation {
    /// An evaluation carrying only a scalar
    pub fn score(error: f64) -> Self {
        Self {
            error,
            diagnostics: None,
        }
    }

    /// Attach diagnostics
    pub fn with_diagnostics(mut self, diagnostics: Diagnostics) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }
}

/// Fitness evaluator seam
///
/// Maps a candidate position to a scalar error plus optional diagnostics.
/// Must be a pure function of the position and whatever fixed state it
/// closes over; may be arbitrarily expensive (the optimizer treats its cost
/// as opaque). Errors propagate to the caller of `Swarm::run` and abort the
/// run.
pub trait Evaluator: Send + Sync {
    /// Evaluate a candidate position
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError>;
}

/// A closure-backed evaluator
pub struct FnEvaluator<F>
where
    F: Fn(&Position) -> Result<Evaluation, EvaluatorError>,
{
    f: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&Position) -> Result<Evaluation, EvaluatorError>,
{
    /// Wrap a fallible closure
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Evaluator for FnEvaluator<F>
where
    F: Fn(&Position) -> Result<Evaluation, EvaluatorError> + Send + Sync,
{
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        (self.f)(position)
    }
}

/// An infallible closure over the raw coordinates, for simple objectives
pub struct ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64,
{
    f: F,
}

impl<F> ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64,
{
    /// Wrap a plain objective function
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Evaluator for ObjectiveFn<F>
where
    F: Fn(&[f64]) -> f64 + Send + Sync,
{
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        let error = (self.f)(position.as_slice());
        if !error.is_finite() {
            return Err(EvaluatorError::NonFiniteScore(error));
        }
        Ok(Evaluation::score(error))
    }
}
