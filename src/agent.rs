//! Agent state machine
//!
//! One particle: a position, a velocity, and the best position/error the
//! agent has personally observed. Agents are created once at swarm
//! construction and mutated in place every iteration; all randomized steps
//! draw from the caller-supplied generator so seeded runs are reproducible.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::EvaluatorError;
use crate::fitness::{Diagnostics, Direction, Evaluator};
use crate::init::Initializer;
use crate::space::{Bounds, Position, SearchSpace, Velocity};
use crate::swarm::Hyperparameters;

/// One particle of the swarm
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Agent {
    /// Unique sequential id (creation order)
    pub id: usize,
    /// Current position in the search space
    pub position: Position,
    /// Current velocity
    pub velocity: Velocity,
    /// Error of the most recent evaluation; `None` before the first one
    pub current_error: Option<f64>,
    /// Best position this agent has observed
    pub best_position: Position,
    /// Error at `best_position`; `None` before the first evaluation
    pub best_error: Option<f64>,
    /// Diagnostics captured from the evaluation that produced the best
    #[serde(skip)]
    pub diagnostics: Option<Diagnostics>,
}

impl Agent {
    /// Create an agent with a random (or seeded) position and a random
    /// velocity drawn uniformly from `velocity_range`
    pub fn new<R: Rng>(
        id: usize,
        space: &SearchSpace,
        velocity_range: &Bounds,
        initializer: Option<&dyn Initializer>,
        rng: &mut R,
    ) -> Self {
        let position = match initializer {
            Some(init) => init.init(id, space.dimension()),
            None => space.random_position(rng),
        };
        let velocity = space.random_velocity(rng, velocity_range);
        let best_position = position.clone();

        Self {
            id,
            position,
            velocity,
            current_error: None,
            best_position,
            best_error: None,
            diagnostics: None,
        }
    }

    /// Evaluate the current position
    ///
    /// In the binary space an all-zero mask short-circuits to the infeasible
    /// sentinel without invoking the evaluator; the sentinel is strictly
    /// worse than any finite score, so it can only ever become a best while
    /// no feasible evaluation has happened yet. Evaluator failures propagate
    /// untouched.
    pub fn evaluate(
        &mut self,
        evaluator: &dyn Evaluator,
        direction: Direction,
        space: &SearchSpace,
    ) -> Result<(), EvaluatorError> {
        let (error, diagnostics) = if space.is_binary() && self.position.is_all_zero() {
            (direction.worst(), None)
        } else {
            let evaluation = evaluator.evaluate(&self.position)?;
            (evaluation.error, evaluation.diagnostics)
        };

        self.current_error = Some(error);

        let improved = match self.best_error {
            None => true,
            Some(best) => direction.improves(error, best),
        };
        if improved {
            self.best_position = self.position.clone();
            self.best_error = Some(error);
            self.diagnostics = diagnostics;
        }
        Ok(())
    }

    /// Update the velocity toward the personal and global bests
    ///
    /// Per dimension: `v' = w·v + c1·r1·(pbest − x) + c2·r2·(gbest − x)`
    /// with r1, r2 drawn independently from U[0, 1). The optional clamp
    /// constrains each component afterwards.
    pub fn update_velocity<R: Rng>(
        &mut self,
        global_best_position: &Position,
        params: &Hyperparameters,
        rng: &mut R,
    ) {
        for d in 0..self.velocity.dimension() {
            let r1: f64 = rng.gen();
            let r2: f64 = rng.gen();

            let cognitive = params.c1 * r1 * (self.best_position[d] - self.position[d]);
            let social = params.c2 * r2 * (global_best_position[d] - self.position[d]);

            let mut v = params.weight * self.velocity[d] + cognitive + social;
            if let Some(clamp) = &params.velocity_clamp {
                v = clamp.clamp(v);
            }
            self.velocity[d] = v;
        }
    }

    /// Move the position by the current velocity
    ///
    /// Continuous: additive move, clamped to the bounds. Binary: each
    /// coordinate switches on with probability sigmoid(v), so velocity
    /// magnitude biases the feature toward on/off rather than mapping its
    /// sign deterministically.
    pub fn update_position<R: Rng>(&mut self, space: &SearchSpace, rng: &mut R) {
        match space {
            SearchSpace::Continuous(_) => {
                for d in 0..self.position.dimension() {
                    self.position[d] += self.velocity[d];
                }
                space.constrain(&mut self.position);
            }
            SearchSpace::Binary { .. } => {
                for d in 0..self.position.dimension() {
                    let p = sigmoid(self.velocity[d]);
                    let u: f64 = rng.gen();
                    self.position[d] = if p > u { 1.0 } else { 0.0 };
                }
            }
        }
    }
}

/// Logistic velocity→probability transfer for the binary space
fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}
