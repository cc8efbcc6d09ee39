//! Objective registry
//!
//! A named table of evaluators for drivers that let a remote observer pick
//! the objective between runs (the visualization server use case). The
//! registry is handed to the swarm at construction and only ever replaced
//! between runs, never mutated mid-run.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::fitness::traits::Evaluator;

/// Named evaluator table
#[derive(Clone, Default)]
pub struct ObjectiveRegistry {
    objectives: BTreeMap<String, Arc<dyn Evaluator>>,
}

impl ObjectiveRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an evaluator under a name, replacing any previous entry
    pub fn register(&mut self, name: impl Into<String>, evaluator: Arc<dyn Evaluator>) {
        self.objectives.insert(name.into(), evaluator);
    }

    /// Look up an evaluator by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Evaluator>> {
        self.objectives.get(name).cloned()
    }

    /// Registered objective names, sorted
    pub fn names(&self) -> Vec<&str> {
        self.objectives.keys().map(String::as_str).collect()
    }

    /// Number of registered objectives
    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    /// True when no objective is registered
    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }
}

impl std::fmt::Debug for ObjectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectiveRegistry")
            .field("names", &self.names())
            .finish()
    }
}
