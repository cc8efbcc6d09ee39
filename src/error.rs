//! Error types for geneswarm
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for evaluator failures
///
/// Raised by a fitness evaluator for a syntactically valid position. The
/// all-zero binary mask is *not* an evaluator error; the swarm recovers it
/// locally with the infeasible sentinel before the evaluator is ever called.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvaluatorError {
    /// The evaluator received a position of the wrong dimensionality
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// The underlying model fit failed
    #[error("Model fit failed: {0}")]
    FitFailed(String),

    /// The evaluator produced a non-finite score
    #[error("Non-finite score produced: {0}")]
    NonFiniteScore(f64),

    /// Any other evaluator-defined failure
    #[error("Evaluation failed: {0}")]
    Other(String),
}

/// Top-level error type for swarm operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SwarmError {
    /// Invalid construction parameters; the run never starts
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// An injected evaluator failed mid-run; the run aborts
    #[error("Evaluator failed for agent {agent_id} at iteration {iteration}: {source}")]
    Evaluator {
        agent_id: usize,
        iteration: usize,
        source: EvaluatorError,
    },
}

impl SwarmError {
    /// Wrap an evaluator failure with the agent/iteration context needed to reproduce it
    pub fn from_evaluator(agent_id: usize, iteration: usize, source: EvaluatorError) -> Self {
        Self::Evaluator {
            agent_id,
            iteration,
            source,
        }
    }
}

/// Result type alias for swarm operations
pub type SwarmResult<T> = Result<T, SwarmError>;
