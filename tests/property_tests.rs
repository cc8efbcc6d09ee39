//! Property-based tests for geneswarm
//!
//! Uses proptest to verify invariants of the optimizer, plus a few scripted
//! end-to-end scenarios.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use geneswarm::prelude::*;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Evaluator that counts its invocations
struct CountingEvaluator {
    calls: Arc<AtomicUsize>,
    error: f64,
}

impl Evaluator for CountingEvaluator {
    fn evaluate(&self, _position: &Position) -> Result<Evaluation, EvaluatorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Evaluation::score(self.error))
    }
}

fn sphere_swarm(agents: usize, dims: usize, rng: &mut StdRng) -> Swarm {
    Swarm::builder()
        .space(SearchSpace::continuous(vec![(-10.0, 10.0); dims]))
        .agents(agents)
        .weight(0.5)
        .c1(1.0)
        .c2(2.0)
        .evaluator(Sphere::new())
        .build(rng)
        .unwrap()
}

proptest! {
    // ==================== Search Space Properties ====================

    #[test]
    fn continuous_positions_stay_in_bounds(
        seed in 0u64..500,
        dims in 1usize..12,
        half_width in 0.5f64..50.0
    ) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = Swarm::builder()
            .space(SearchSpace::Continuous(MultiBounds::symmetric(half_width, dims)))
            .agents(4)
            .evaluator(Sphere::new())
            .build(&mut rng)
            .unwrap();
        swarm.run(5, &mut rng).unwrap();

        for agent in swarm.agents() {
            for &x in agent.position.as_slice() {
                prop_assert!(x >= -half_width && x <= half_width);
            }
        }
    }

    #[test]
    fn binary_positions_are_always_bits(
        seed in 0u64..500,
        dims in 1usize..40,
        agents in 1usize..8
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = Swarm::builder()
            .space(SearchSpace::binary(dims))
            .agents(agents)
            .evaluator(CountingEvaluator { calls, error: 0.3 })
            .build(&mut rng)
            .unwrap();
        swarm.run(6, &mut rng).unwrap();

        for agent in swarm.agents() {
            prop_assert!(agent.position.as_slice().iter().all(|&x| x == 0.0 || x == 1.0));
            prop_assert!(agent.best_position.as_slice().iter().all(|&x| x == 0.0 || x == 1.0));
        }
    }

    // ==================== Best Bookkeeping Properties ====================

    #[test]
    fn best_error_never_worsens(seed in 0u64..500) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = sphere_swarm(4, 3, &mut rng);
        let mut recorder = RunRecorder::new();
        swarm.run_with(10, &mut rng, &mut recorder).unwrap();

        let errors: Vec<f64> = recorder
            .record()
            .iterations
            .iter()
            .map(|r| r.best_error.unwrap())
            .collect();
        prop_assert!(errors.windows(2).all(|w| w[1] <= w[0]));
    }

    #[test]
    fn global_best_dominates_every_agent(seed in 0u64..500, agents in 1usize..10) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = sphere_swarm(agents, 2, &mut rng);
        swarm.run(8, &mut rng).unwrap();

        let best = swarm.best().unwrap().error;
        for agent in swarm.agents() {
            prop_assert!(best <= agent.current_error.unwrap());
            prop_assert!(best <= agent.best_error.unwrap());
        }
    }

    #[test]
    fn personal_best_dominates_current(seed in 0u64..500) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = sphere_swarm(5, 4, &mut rng);
        swarm.run(8, &mut rng).unwrap();

        for agent in swarm.agents() {
            prop_assert!(agent.best_error.unwrap() <= agent.current_error.unwrap());
        }
    }

    // ==================== Determinism ====================

    #[test]
    fn seeded_runs_reproduce_exactly(seed in 0u64..500) {
        let run = |seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut swarm = sphere_swarm(3, 2, &mut rng);
            let mut recorder = RunRecorder::new();
            swarm.run_with(6, &mut rng, &mut recorder).unwrap();
            recorder.into_record()
        };
        let a = run(seed);
        let b = run(seed);
        prop_assert_eq!(a.len(), b.len());
        for (ra, rb) in a.iterations.iter().zip(&b.iterations) {
            prop_assert_eq!(ra.best_error, rb.best_error);
            prop_assert_eq!(ra.best_position.clone(), rb.best_position.clone());
        }
    }

    // ==================== Run Protocol ====================

    #[test]
    fn one_snapshot_per_iteration(seed in 0u64..500, iterations in 0usize..12) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut swarm = sphere_swarm(3, 2, &mut rng);
        let mut recorder = RunRecorder::new();

        let outcome = swarm.run_with(iterations, &mut rng, &mut recorder).unwrap();
        prop_assert_eq!(outcome.status, RunStatus::Completed);
        prop_assert_eq!(outcome.iterations, iterations);
        prop_assert_eq!(recorder.record().len(), iterations);
    }
}

// ==================== Scripted Scenarios ====================

#[test]
fn sphere_scenario_makes_progress() {
    // 3 agents on a 2-dimensional sphere bowl, 5 iterations
    let mut rng = StdRng::seed_from_u64(42);
    let mut swarm = sphere_swarm(3, 2, &mut rng);
    let mut recorder = RunRecorder::new();

    let outcome = swarm.run_with(5, &mut rng, &mut recorder).unwrap();
    let record = recorder.into_record();
    assert_eq!(record.len(), 5);

    let first = record.iterations[0].best_error.unwrap();
    let last = record.final_best_error().unwrap();
    assert!(last < first);
    assert_eq!(outcome.best.unwrap().error, last);
}

#[test]
fn constant_binary_scenario_first_feasible_wins() {
    // a constant 0.8 objective: the first feasible evaluation sets the best
    // and ties never displace it
    let calls = Arc::new(AtomicUsize::new(0));
    let mut rng = StdRng::seed_from_u64(11);
    let mut swarm = Swarm::builder()
        .space(SearchSpace::binary(8))
        .agents(4)
        .weight(0.4)
        .c1(2.0)
        .c2(2.0)
        .evaluator(CountingEvaluator {
            calls: calls.clone(),
            error: 0.8,
        })
        .build(&mut rng)
        .unwrap();

    let mut recorder = RunRecorder::new();
    let outcome = swarm.run_with(4, &mut rng, &mut recorder).unwrap();

    let best = outcome.best.unwrap();
    assert_eq!(best.error, 0.8);
    for record in &recorder.record().iterations {
        assert_eq!(record.best_error, Some(0.8));
    }
    // only feasible (non-all-zero) positions reached the evaluator
    assert!(calls.load(Ordering::SeqCst) <= 4 * 4);
}

#[test]
fn all_zero_masks_never_reach_the_evaluator() {
    // seed every agent at the all-zero mask: iteration 0 must not invoke the
    // evaluator at all, and the fold produces no global best from sentinels
    struct ZeroThenCount {
        calls: Arc<AtomicUsize>,
    }
    impl Evaluator for ZeroThenCount {
        fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
            assert!(!position.is_all_zero());
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Evaluation::score(0.5))
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let mut rng = StdRng::seed_from_u64(3);
    let mut swarm = Swarm::builder()
        .space(SearchSpace::binary(5))
        .agents(3)
        .initializer(FixedInit::new(vec![0.0; 5]))
        .evaluator(ZeroThenCount {
            calls: calls.clone(),
        })
        .build(&mut rng)
        .unwrap();

    let mut recorder = RunRecorder::new();
    swarm.run_with(1, &mut rng, &mut recorder).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(recorder.record().iterations[0].best_error.is_none());
    for agent in swarm.agents() {
        assert_eq!(agent.current_error, Some(f64::INFINITY));
        // with no feasible evaluation yet, the sentinel is the personal best
        assert_eq!(agent.best_error, Some(f64::INFINITY));
    }
}

#[test]
fn cancellation_stops_after_current_iteration() {
    struct CancelOnFirst {
        stop: StopFlag,
        snapshots: usize,
    }
    impl Reporter for CancelOnFirst {
        fn on_iteration(&mut self, _snapshot: &IterationSnapshot) {
            self.snapshots += 1;
            self.stop.trigger();
        }
    }

    let stop = StopFlag::new();
    let mut rng = StdRng::seed_from_u64(17);
    let mut swarm = Swarm::builder()
        .space(SearchSpace::continuous(vec![(-10.0, 10.0); 2]))
        .agents(3)
        .evaluator(Sphere::new())
        .stop_flag(stop.clone())
        .build(&mut rng)
        .unwrap();

    let mut reporter = CancelOnFirst { stop, snapshots: 0 };
    let outcome = swarm.run_with(10, &mut rng, &mut reporter).unwrap();

    assert_eq!(outcome.status, RunStatus::Cancelled);
    assert_eq!(outcome.iterations, 1);
    assert_eq!(reporter.snapshots, 1);
    assert!(outcome.best.is_some());
}

#[test]
fn gene_selection_end_to_end() {
    // 20 genes, 2 of which linearly determine the target; a maximizing swarm
    // over held-out R² should find a subset scoring well above chance
    let samples = 16;
    let mut gene_names = Vec::new();
    let mut expression = Vec::new();
    for g in 0..20 {
        gene_names.push(format!("g{g}"));
        let column: Vec<f64> = (0..samples)
            .map(|s| ((s * 7 + g * 13) % 11) as f64)
            .collect();
        expression.push(column);
    }
    let target: Vec<f64> = (0..samples)
        .map(|s| 2.0 * expression[3][s] - 1.5 * expression[12][s] + 4.0)
        .collect();

    let dataset = Arc::new(GeneDataset::new(gene_names, expression, target, vec![]).unwrap());
    let mut rng = StdRng::seed_from_u64(7);
    let mut swarm = Swarm::builder()
        .space(dataset.search_space())
        .agents(dataset.suggested_agent_count().max(6))
        .direction(Direction::Maximize)
        .weight(0.4)
        .c1(2.0)
        .c2(2.0)
        .evaluator(GeneSubsetEvaluator::new(
            Arc::clone(&dataset),
            LinearOobScorer::default(),
        ))
        .build(&mut rng)
        .unwrap();

    let outcome = swarm.run(25, &mut rng).unwrap();
    let best = outcome.best.expect("some feasible subset must be found");
    assert!(best.error.is_finite());
    assert!(best.position.active_count() >= 1);

    // the winning agent carries importances for its selected columns
    let winner = &swarm.agents()[best.agent_id];
    let diagnostics = winner.diagnostics.as_ref().expect("importances captured");
    assert!(!diagnostics.is_empty());
    let total: f64 = diagnostics.values().sum();
    assert!((total - 1.0).abs() < 1e-9);
}
