//! Continuous optimization demo: minimize a named benchmark objective
//!
//! Run with `cargo run --example sphere -- [sphere|rastrigin]`. Set
//! RUST_LOG=debug to watch the per-iteration best.

use std::sync::Arc;

use geneswarm::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> SwarmResult<()> {
    env_logger::init();

    let mut registry = ObjectiveRegistry::new();
    registry.register("sphere", Arc::new(Sphere::new()));
    registry.register("rastrigin", Arc::new(Rastrigin::new()));

    let name = std::env::args().nth(1).unwrap_or_else(|| "sphere".to_string());
    let objective = registry.get(&name).ok_or_else(|| {
        SwarmError::Configuration(format!(
            "Unknown objective '{name}', expected one of {:?}",
            registry.names()
        ))
    })?;

    let mut rng = StdRng::seed_from_u64(42);
    let mut swarm = Swarm::builder()
        .space(SearchSpace::continuous(vec![(-100.0, 100.0); 10]))
        .agents(30)
        .weight(0.5)
        .c1(1.0)
        .c2(2.0)
        .shared_evaluator(objective)
        .build(&mut rng)?;

    let mut recorder = RunRecorder::new();
    let outcome = swarm.run_with(100, &mut rng, &mut recorder)?;

    let best = outcome.best.expect("benchmarks are evaluable everywhere");
    println!(
        "{name}: {:?} after {} iterations",
        outcome.status, outcome.iterations
    );
    println!("best error: {:.6}", best.error);
    println!("best position: {:?}", best.position.as_slice());

    let record = recorder.into_record();
    println!(
        "trace: {}",
        serde_json::to_string_pretty(&record).expect("record serializes")
    );
    Ok(())
}
