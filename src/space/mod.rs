//! Search-space representation
//!
//! The engine optimizes over one of two mutually exclusive space kinds: a
//! continuous space with per-dimension bounds, or a binary space whose
//! coordinates are constrained to {0, 1} (the gene on/off mask).

pub mod bounds;
pub mod position;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::SwarmError;

pub use bounds::{Bounds, MultiBounds};
pub use position::{Position, Velocity};

/// Default initial-velocity range for the continuous space
const CONTINUOUS_VELOCITY_RANGE: (f64, f64) = (-1.0, 1.0);

/// Default initial-velocity range for the binary space
const BINARY_VELOCITY_RANGE: (f64, f64) = (-4.0, 4.0);

/// The kind of search space an optimization run operates in
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SearchSpace {
    /// Real-valued coordinates constrained by per-dimension bounds
    Continuous(MultiBounds),
    /// Feature on/off mask; coordinates are exactly 0 or 1
    Binary { dimensions: usize },
}

impl SearchSpace {
    /// Convenience constructor from (min, max) tuples
    pub fn continuous<I: IntoIterator<Item = (f64, f64)>>(bounds: I) -> Self {
        Self::Continuous(bounds.into_iter().collect())
    }

    /// Convenience constructor for a binary space
    pub fn binary(dimensions: usize) -> Self {
        Self::Binary { dimensions }
    }

    /// Problem dimensionality
    pub fn dimension(&self) -> usize {
        match self {
            Self::Continuous(bounds) => bounds.dimension(),
            Self::Binary { dimensions } => *dimensions,
        }
    }

    /// True for the binary (feature-mask) space
    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary { .. })
    }

    /// Reject empty or inconsistent spaces at construction time
    pub fn validate(&self) -> Result<(), SwarmError> {
        match self {
            Self::Continuous(bounds) => bounds.validate(),
            Self::Binary { dimensions } => {
                if *dimensions == 0 {
                    Err(SwarmError::Configuration(
                        "Binary space must have at least one dimension".to_string(),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Default initial-velocity range for this space kind
    pub fn default_velocity_range(&self) -> Bounds {
        let (min, max) = match self {
            Self::Continuous(_) => CONTINUOUS_VELOCITY_RANGE,
            Self::Binary { .. } => BINARY_VELOCITY_RANGE,
        };
        Bounds::new(min, max)
    }

    /// Draw a uniformly random position inside this space
    pub fn random_position<R: Rng>(&self, rng: &mut R) -> Position {
        match self {
            Self::Continuous(bounds) => Position::new(
                bounds
                    .bounds
                    .iter()
                    .map(|b| rng.gen_range(b.min..=b.max))
                    .collect(),
            ),
            Self::Binary { dimensions } => Position::new(
                (0..*dimensions)
                    .map(|_| if rng.gen::<f64>() > 0.5 { 1.0 } else { 0.0 })
                    .collect(),
            ),
        }
    }

    /// Draw an initial velocity uniformly from the given range
    pub fn random_velocity<R: Rng>(&self, rng: &mut R, range: &Bounds) -> Velocity {
        Velocity::new(
            (0..self.dimension())
                .map(|_| rng.gen_range(range.min..=range.max))
                .collect(),
        )
    }

    /// Constrain a position to this space after an additive move
    ///
    /// Only the continuous space clamps; binary positions are produced
    /// directly in {0, 1} by the transfer rule and need no correction.
    pub fn constrain(&self, position: &mut Position) {
        if let Self::Continuous(bounds) = self {
            bounds.clamp_vec(position.as_mut_slice());
        }
    }
}
