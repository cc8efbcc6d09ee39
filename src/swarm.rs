//! Swarm orchestration
//!
//! The swarm owns the agents and drives the iteration protocol: evaluate
//! every agent, fold the results into the global best, report one snapshot,
//! then move every agent. The fold is serialized in agent order so ties
//! resolve first-found-wins regardless of how evaluation was scheduled.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::control::{RunStatus, StopFlag};
use crate::error::{SwarmError, SwarmResult};
use crate::fitness::{Direction, Evaluator};
use crate::init::Initializer;
use crate::report::{AgentSnapshot, IterationSnapshot, NullReporter, Reporter, SnapshotDetail};
use crate::space::{Bounds, Position, SearchSpace};

/// Velocity-update coefficients, fixed for the duration of a run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Hyperparameters {
    /// Inertia weight w
    pub weight: f64,
    /// Cognitive coefficient c1 (pull toward the personal best)
    pub c1: f64,
    /// Social coefficient c2 (pull toward the global best)
    pub c2: f64,
    /// Optional per-component velocity clamp
    pub velocity_clamp: Option<Bounds>,
}

impl Default for Hyperparameters {
    fn default() -> Self {
        Self {
            weight: 0.5,
            c1: 1.0,
            c2: 2.0,
            velocity_clamp: None,
        }
    }
}

/// The best position any agent has found, and who found it
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GlobalBest {
    /// Position of the best evaluation so far
    pub position: Position,
    /// Error at that position
    pub error: f64,
    /// Agent that produced it
    pub agent_id: usize,
}

/// Result of a finished (or cancelled) run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutcome {
    /// Best found across the whole run, `None` if nothing feasible was seen
    pub best: Option<GlobalBest>,
    /// Whether the run completed or was cancelled
    pub status: RunStatus,
    /// Iterations actually executed
    pub iterations: usize,
}

/// Builder for [`Swarm`]
///
/// Construction is fallible: zero agents, an empty space, or a missing
/// evaluator are configuration errors.
pub struct SwarmBuilder {
    space: Option<SearchSpace>,
    num_agents: usize,
    hyperparameters: Hyperparameters,
    direction: Direction,
    evaluator: Option<Arc<dyn Evaluator>>,
    initializer: Option<Box<dyn Initializer>>,
    initial_velocity_range: Option<Bounds>,
    snapshot_detail: SnapshotDetail,
    pacing: Option<Duration>,
    stop: StopFlag,
}

impl Default for SwarmBuilder {
    fn default() -> Self {
        Self {
            space: None,
            num_agents: 0,
            hyperparameters: Hyperparameters::default(),
            direction: Direction::default(),
            evaluator: None,
            initializer: None,
            initial_velocity_range: None,
            snapshot_detail: SnapshotDetail::default(),
            pacing: None,
            stop: StopFlag::new(),
        }
    }
}

impl SwarmBuilder {
    /// Start an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the search space
    pub fn space(mut self, space: SearchSpace) -> Self {
        self.space = Some(space);
        self
    }

    /// Set the number of agents
    pub fn agents(mut self, num_agents: usize) -> Self {
        self.num_agents = num_agents;
        self
    }

    /// Set the fitness evaluator
    pub fn evaluator(mut self, evaluator: impl Evaluator + 'static) -> Self {
        self.evaluator = Some(Arc::new(evaluator));
        self
    }

    /// Set a shared fitness evaluator (e.g. one pulled from a registry)
    pub fn shared_evaluator(mut self, evaluator: Arc<dyn Evaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Set the inertia weight
    pub fn weight(mut self, weight: f64) -> Self {
        self.hyperparameters.weight = weight;
        self
    }

    /// Set the cognitive coefficient
    pub fn c1(mut self, c1: f64) -> Self {
        self.hyperparameters.c1 = c1;
        self
    }

    /// Set the social coefficient
    pub fn c2(mut self, c2: f64) -> Self {
        self.hyperparameters.c2 = c2;
        self
    }

    /// Clamp velocity components into the given range after every update
    pub fn velocity_clamp(mut self, clamp: Bounds) -> Self {
        self.hyperparameters.velocity_clamp = Some(clamp);
        self
    }

    /// Set the optimization direction (default: minimize)
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Seed agent positions from an initializer instead of random draws
    pub fn initializer(mut self, initializer: impl Initializer + 'static) -> Self {
        self.initializer = Some(Box::new(initializer));
        self
    }

    /// Override the initial-velocity range (default depends on the space)
    pub fn initial_velocity_range(mut self, range: Bounds) -> Self {
        self.initial_velocity_range = Some(range);
        self
    }

    /// Choose how much state each snapshot carries
    pub fn snapshot_detail(mut self, detail: SnapshotDetail) -> Self {
        self.snapshot_detail = detail;
        self
    }

    /// Sleep after each snapshot, to pace a live observer
    pub fn pacing(mut self, delay: Duration) -> Self {
        self.pacing = Some(delay);
        self
    }

    /// Attach a cancellation flag; the caller keeps a clone to trigger it
    pub fn stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    /// Validate the configuration and create the agents
    pub fn build<R: Rng>(self, rng: &mut R) -> SwarmResult<Swarm> {
        let space = self
            .space
            .ok_or_else(|| SwarmError::Configuration("No search space specified".to_string()))?;
        space.validate()?;

        if self.num_agents == 0 {
            return Err(SwarmError::Configuration(
                "Swarm must have at least one agent".to_string(),
            ));
        }
        let evaluator = self
            .evaluator
            .ok_or_else(|| SwarmError::Configuration("No evaluator specified".to_string()))?;

        let mut hyperparameters = self.hyperparameters;
        if hyperparameters.velocity_clamp.is_none() && space.is_binary() {
            hyperparameters.velocity_clamp = Some(space.default_velocity_range());
        }
        let velocity_range = self
            .initial_velocity_range
            .unwrap_or_else(|| space.default_velocity_range());

        let initializer = self.initializer.as_deref();
        let mut agents = Vec::with_capacity(self.num_agents);
        for id in 0..self.num_agents {
            let agent = Agent::new(id, &space, &velocity_range, initializer, rng);
            if agent.position.dimension() != space.dimension() {
                return Err(SwarmError::Configuration(format!(
                    "Initializer produced a position of dimension {}, expected {}",
                    agent.position.dimension(),
                    space.dimension()
                )));
            }
            agents.push(agent);
        }

        Ok(Swarm {
            agents,
            space,
            hyperparameters,
            direction: self.direction,
            evaluator,
            snapshot_detail: self.snapshot_detail,
            pacing: self.pacing,
            stop: self.stop,
            best: None,
        })
    }
}

/// A swarm of agents plus the run-wide bookkeeping
pub struct Swarm {
    agents: Vec<Agent>,
    space: SearchSpace,
    hyperparameters: Hyperparameters,
    direction: Direction,
    evaluator: Arc<dyn Evaluator>,
    snapshot_detail: SnapshotDetail,
    pacing: Option<Duration>,
    stop: StopFlag,
    best: Option<GlobalBest>,
}

impl std::fmt::Debug for Swarm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Swarm")
            .field("agents", &self.agents.len())
            .field("space", &self.space)
            .field("direction", &self.direction)
            .field("hyperparameters", &self.hyperparameters)
            .field("best", &self.best)
            .finish_non_exhaustive()
    }
}

impl Swarm {
    /// Start building a swarm
    pub fn builder() -> SwarmBuilder {
        SwarmBuilder::new()
    }

    /// The agents, in creation order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// The search space the swarm operates in
    pub fn space(&self) -> &SearchSpace {
        &self.space
    }

    /// The best found so far
    pub fn best(&self) -> Option<&GlobalBest> {
        self.best.as_ref()
    }

    /// Run without reporting
    pub fn run<R: Rng>(&mut self, max_iterations: usize, rng: &mut R) -> SwarmResult<RunOutcome> {
        self.run_with(max_iterations, rng, &mut NullReporter)
    }

    /// Run the iteration protocol, streaming one snapshot per iteration
    ///
    /// Each iteration: poll the stop flag, evaluate every agent, fold the
    /// global best in agent order, report, then update velocities and
    /// positions against the just-finalized best. Velocity updates never see
    /// a best from a partially evaluated iteration. An evaluator failure
    /// aborts the run before that iteration's snapshot.
    pub fn run_with<R: Rng>(
        &mut self,
        max_iterations: usize,
        rng: &mut R,
        reporter: &mut dyn Reporter,
    ) -> SwarmResult<RunOutcome> {
        info!(
            "Starting run: {} agents, {} dimensions, {} iterations max",
            self.agents.len(),
            self.space.dimension(),
            max_iterations
        );

        for iteration in 0..max_iterations {
            if self.stop.should_stop() {
                info!("Cancelled at iteration {iteration}");
                return Ok(self.outcome(RunStatus::Cancelled, iteration));
            }

            self.evaluate_all(iteration)?;
            self.fold_global_best();
            debug!(
                "Iteration {iteration}: best error {:?}",
                self.best.as_ref().map(|b| b.error)
            );

            reporter.on_iteration(&self.snapshot(iteration));
            if let Some(delay) = self.pacing {
                std::thread::sleep(delay);
            }

            self.advance_agents(rng);
        }

        Ok(self.outcome(RunStatus::Completed, max_iterations))
    }

    fn outcome(&self, status: RunStatus, iterations: usize) -> RunOutcome {
        RunOutcome {
            best: self.best.clone(),
            status,
            iterations,
        }
    }

    #[cfg(not(feature = "parallel"))]
    fn evaluate_all(&mut self, iteration: usize) -> SwarmResult<()> {
        for agent in &mut self.agents {
            agent
                .evaluate(self.evaluator.as_ref(), self.direction, &self.space)
                .map_err(|source| SwarmError::from_evaluator(agent.id, iteration, source))?;
        }
        Ok(())
    }

    #[cfg(feature = "parallel")]
    fn evaluate_all(&mut self, iteration: usize) -> SwarmResult<()> {
        use rayon::prelude::*;

        let evaluator = Arc::clone(&self.evaluator);
        let direction = self.direction;
        let space = &self.space;

        // all evaluations are joined here; on failure the lowest agent id
        // wins so the reported error matches the sequential schedule
        let failures: Vec<_> = self
            .agents
            .par_iter_mut()
            .filter_map(|agent| {
                agent
                    .evaluate(evaluator.as_ref(), direction, space)
                    .err()
                    .map(|source| (agent.id, source))
            })
            .collect();

        match failures.into_iter().min_by_key(|(id, _)| *id) {
            Some((agent_id, source)) => {
                Err(SwarmError::from_evaluator(agent_id, iteration, source))
            }
            None => Ok(()),
        }
    }

    /// Fold this iteration's results into the global best, in agent order
    ///
    /// The infeasible sentinel is non-finite and never enters the global
    /// best; ties keep the incumbent.
    fn fold_global_best(&mut self) {
        for agent in &self.agents {
            let error = match agent.current_error {
                Some(error) if error.is_finite() => error,
                _ => continue,
            };
            let improves = match &self.best {
                None => true,
                Some(best) => self.direction.improves(error, best.error),
            };
            if improves {
                self.best = Some(GlobalBest {
                    position: agent.position.clone(),
                    error,
                    agent_id: agent.id,
                });
            }
        }
    }

    fn snapshot(&self, iteration: usize) -> IterationSnapshot {
        let agents = match self.snapshot_detail {
            SnapshotDetail::BestOnly => Vec::new(),
            SnapshotDetail::Full => self
                .agents
                .iter()
                .map(|agent| AgentSnapshot {
                    id: agent.id,
                    position: agent.position.clone(),
                    error: agent.current_error.unwrap_or_else(|| self.direction.worst()),
                })
                .collect(),
        };
        IterationSnapshot {
            iteration,
            agents,
            global_best: self.best.clone(),
        }
    }

    /// Velocity then position update for every agent
    ///
    /// Before any feasible evaluation exists the agent's own best stands in
    /// for the global one, leaving only the cognitive pull.
    fn advance_agents<R: Rng>(&mut self, rng: &mut R) {
        let global = self.best.as_ref().map(|b| b.position.clone());
        for agent in &mut self.agents {
            let toward = global
                .clone()
                .unwrap_or_else(|| agent.best_position.clone());
            agent.update_velocity(&toward, &self.hyperparameters, rng);
            agent.update_position(&self.space, rng);
        }
    }
}
