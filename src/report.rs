//! Iteration reporting
//!
//! Exactly one snapshot is emitted per completed iteration, after every
//! agent has been evaluated and the global best folded in. Reporters are the
//! seam for streaming progress to a UI, logging, or recording a run for
//! offline analysis.

use serde::{Deserialize, Serialize};

use crate::space::Position;
use crate::swarm::GlobalBest;

/// How much per-iteration state a snapshot carries
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnapshotDetail {
    /// Every agent's position and error, plus the global best
    #[default]
    Full,
    /// Global best only; the per-agent list is left empty
    BestOnly,
}

/// One agent's state at an iteration boundary
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Agent id
    pub id: usize,
    /// Position at the time of evaluation
    pub position: Position,
    /// Error of that evaluation (the infeasible sentinel is non-finite)
    pub error: f64,
}

/// State of the swarm after one full iteration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationSnapshot {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Per-agent state; empty under [`SnapshotDetail::BestOnly`]
    pub agents: Vec<AgentSnapshot>,
    /// Global best after this iteration's fold, if any evaluation succeeded
    pub global_best: Option<GlobalBest>,
}

/// Observer invoked once per completed iteration
pub trait Reporter {
    /// Receive the snapshot for one iteration
    fn on_iteration(&mut self, snapshot: &IterationSnapshot);
}

/// Reporter that discards every snapshot
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_iteration(&mut self, _snapshot: &IterationSnapshot) {}
}

/// Per-iteration summary retained by [`RunRecorder`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IterationRecord {
    /// Zero-based iteration index
    pub iteration: usize,
    /// Best error known after this iteration
    pub best_error: Option<f64>,
    /// Position of that best
    pub best_position: Option<Position>,
    /// Mean of the finite agent errors this iteration
    pub mean_error: Option<f64>,
    /// Population standard deviation of the finite agent errors
    pub std_error: Option<f64>,
    /// Active coordinates in the best position (mask cardinality)
    pub active_count: Option<usize>,
}

/// Full trace of a run, suitable for serialization
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RunRecord {
    /// One record per completed iteration, in order
    pub iterations: Vec<IterationRecord>,
}

impl RunRecord {
    /// Number of recorded iterations
    pub fn len(&self) -> usize {
        self.iterations.len()
    }

    /// True when nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.iterations.is_empty()
    }

    /// The last recorded best error, if any
    pub fn final_best_error(&self) -> Option<f64> {
        self.iterations.iter().rev().find_map(|r| r.best_error)
    }
}

/// Reporter that accumulates a [`RunRecord`]
#[derive(Clone, Debug, Default)]
pub struct RunRecorder {
    record: RunRecord,
}

impl RunRecorder {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the recorder and return the accumulated record
    pub fn into_record(self) -> RunRecord {
        self.record
    }

    /// Borrow the record accumulated so far
    pub fn record(&self) -> &RunRecord {
        &self.record
    }
}

impl Reporter for RunRecorder {
    fn on_iteration(&mut self, snapshot: &IterationSnapshot) {
        let finite: Vec<f64> = snapshot
            .agents
            .iter()
            .map(|a| a.error)
            .filter(|e| e.is_finite())
            .collect();

        let mean_error = if finite.is_empty() {
            None
        } else {
            Some(finite.iter().sum::<f64>() / finite.len() as f64)
        };
        let std_error = mean_error.map(|mean| {
            let var =
                finite.iter().map(|e| (e - mean) * (e - mean)).sum::<f64>() / finite.len() as f64;
            var.sqrt()
        });

        self.record.iterations.push(IterationRecord {
            iteration: snapshot.iteration,
            best_error: snapshot.global_best.as_ref().map(|b| b.error),
            best_position: snapshot.global_best.as_ref().map(|b| b.position.clone()),
            mean_error,
            std_error,
            active_count: snapshot
                .global_best
                .as_ref()
                .map(|b| b.position.active_count()),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn snapshot(iteration: usize, errors: &[f64], best: Option<(Vec<f64>, f64)>) -> IterationSnapshot {
        IterationSnapshot {
            iteration,
            agents: errors
                .iter()
                .enumerate()
                .map(|(id, &error)| AgentSnapshot {
                    id,
                    position: Position::zeros(2),
                    error,
                })
                .collect(),
            global_best: best.map(|(coords, error)| GlobalBest {
                position: Position::new(coords),
                error,
                agent_id: 0,
            }),
        }
    }

    #[test]
    fn test_recorder_statistics() {
        let mut recorder = RunRecorder::new();
        recorder.on_iteration(&snapshot(0, &[2.0, 4.0, 6.0], Some((vec![1.0, 0.0], 2.0))));

        let record = recorder.into_record();
        assert_eq!(record.len(), 1);
        let iter = &record.iterations[0];
        assert_relative_eq!(iter.mean_error.unwrap(), 4.0);
        assert_relative_eq!(iter.std_error.unwrap(), (8.0f64 / 3.0).sqrt());
        assert_eq!(iter.best_error, Some(2.0));
        assert_eq!(iter.active_count, Some(1));
    }

    #[test]
    fn test_recorder_filters_sentinel_errors() {
        let mut recorder = RunRecorder::new();
        recorder.on_iteration(&snapshot(0, &[f64::INFINITY, 3.0], Some((vec![1.0, 1.0], 3.0))));

        let record = recorder.into_record();
        assert_relative_eq!(record.iterations[0].mean_error.unwrap(), 3.0);
    }

    #[test]
    fn test_recorder_all_infeasible() {
        let mut recorder = RunRecorder::new();
        recorder.on_iteration(&snapshot(0, &[f64::INFINITY, f64::INFINITY], None));

        let record = recorder.into_record();
        assert!(record.iterations[0].mean_error.is_none());
        assert!(record.iterations[0].best_error.is_none());
        assert!(record.final_best_error().is_none());
    }

    #[test]
    fn test_final_best_error_takes_last() {
        let mut recorder = RunRecorder::new();
        recorder.on_iteration(&snapshot(0, &[5.0], Some((vec![0.0, 0.0], 5.0))));
        recorder.on_iteration(&snapshot(1, &[2.0], Some((vec![0.0, 0.0], 2.0))));
        assert_eq!(recorder.record().final_best_error(), Some(2.0));
    }

    #[test]
    fn test_run_record_serializes() {
        let mut recorder = RunRecorder::new();
        recorder.on_iteration(&snapshot(0, &[1.0], Some((vec![1.0, 0.0], 1.0))));
        let json = serde_json::to_string(recorder.record()).unwrap();
        assert!(json.contains("\"iteration\":0"));
    }
}
