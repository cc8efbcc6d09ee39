//! Fitness evaluation
//!
//! The evaluator seam, benchmark objectives, and the named objective
//! registry.

pub mod benchmarks;
pub mod registry;
pub mod traits;

pub use benchmarks::{Rastrigin, Sphere};
pub use registry::ObjectiveRegistry;
pub use traits::{Diagnostics, Direction, Evaluation, Evaluator, FnEvaluator, ObjectiveFn};
