//! # geneswarm
//!
//! A Particle Swarm Optimization Engine for Rust.
//!
//! This library runs a swarm of agents over either a continuous real-valued
//! search space or a binary feature-mask space, driving a caller-supplied
//! fitness evaluator toward its minimum (or maximum). The binary mode was
//! built for gene selection: finding the subset of expression columns that
//! best predicts a clinical target.
//!
//! ## Core Concepts
//!
//! - **Agents, not gradients**: candidates move under inertia plus pulls
//!   toward their personal best and the swarm's global best
//! - **One evaluator seam**: anything mapping a position to a score plugs in,
//!   from closed-form benchmarks to held-out model fits
//! - **Iteration-synchronous**: every agent is evaluated before the global
//!   best moves, so a run is reproducible from its RNG seed alone
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use geneswarm::prelude::*;
//! use rand::SeedableRng;
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//!
//! let mut swarm = Swarm::builder()
//!     .space(SearchSpace::continuous(vec![(-100.0, 100.0); 10]))
//!     .agents(30)
//!     .evaluator(Sphere::new())
//!     .build(&mut rng)?;
//!
//! let outcome = swarm.run(50, &mut rng)?;
//! ```

pub mod agent;
pub mod control;
pub mod error;
pub mod fitness;
pub mod genes;
pub mod init;
pub mod report;
pub mod space;
pub mod swarm;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::agent::Agent;
    pub use crate::control::{RunStatus, StopFlag};
    pub use crate::error::{EvaluatorError, SwarmError, SwarmResult};
    pub use crate::fitness::{
        Diagnostics, Direction, Evaluation, Evaluator, FnEvaluator, ObjectiveFn,
        ObjectiveRegistry, Rastrigin, Sphere,
    };
    pub use crate::genes::{
        Covariate, FeatureEncoder, GeneDataset, GeneSubsetEvaluator, LinearOobScorer,
        SubsetScorer, DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE,
    };
    pub use crate::init::{BasisInit, FixedInit, Initializer};
    pub use crate::report::{
        IterationSnapshot, NullReporter, Reporter, RunRecord, RunRecorder, SnapshotDetail,
    };
    pub use crate::space::{Bounds, MultiBounds, Position, SearchSpace, Velocity};
    pub use crate::swarm::{GlobalBest, Hyperparameters, RunOutcome, Swarm, SwarmBuilder};
}
