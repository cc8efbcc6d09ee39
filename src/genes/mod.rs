//! Gene-selection problem glue
//!
//! Everything that turns an expression dataset into a binary optimization
//! problem: covariate encoding, the correlation pre-filter, and the
//! model-fit evaluator the swarm drives.

pub mod dataset;
pub mod encoding;
pub mod evaluator;

pub use dataset::{GeneDataset, DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE};
pub use encoding::{Covariate, FeatureEncoder};
pub use evaluator::{GeneSubsetEvaluator, LinearOobScorer, ScoredFit, SubsetScorer};
