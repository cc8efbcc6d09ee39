//! Binary feature-selection demo on a synthetic expression dataset
//!
//! Builds 150 pseudo-random gene columns where a handful linearly determine
//! the target, pre-filters by correlation, then runs a maximizing swarm over
//! held-out R². Run with `cargo run --example gene_selection`.

use std::sync::Arc;

use geneswarm::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NUM_GENES: usize = 150;
const NUM_SAMPLES: usize = 60;
const MAX_EPOCHS: usize = 50;

fn main() -> SwarmResult<()> {
    env_logger::init();

    let mut rng = StdRng::seed_from_u64(7);

    let mut gene_names = Vec::with_capacity(NUM_GENES);
    let mut expression = Vec::with_capacity(NUM_GENES);
    for g in 0..NUM_GENES {
        gene_names.push(format!("gene_{g:03}"));
        expression.push((0..NUM_SAMPLES).map(|_| rng.gen_range(0.0..10.0)).collect());
    }
    // three causal genes plus mild noise
    let expr: &Vec<Vec<f64>> = &expression;
    let target: Vec<f64> = (0..NUM_SAMPLES)
        .map(|s| 3.0 * expr[5][s] - 2.0 * expr[47][s] + 0.5 * expr[110][s] + rng.gen_range(-0.5..0.5))
        .collect();

    let covariates = vec![Covariate::new(
        "sex",
        (0..NUM_SAMPLES)
            .map(|s| if s % 2 == 0 { "f".to_string() } else { "m".to_string() })
            .collect(),
        FeatureEncoder::BinaryPair,
    )];

    let dataset = GeneDataset::new(gene_names, expression, target, covariates)?
        .filter_by_correlation(DEFAULT_LOWER_PERCENTILE, DEFAULT_UPPER_PERCENTILE)?;
    println!(
        "pre-filter kept {} of {NUM_GENES} genes",
        dataset.num_genes()
    );

    let dataset = Arc::new(dataset);
    let mut swarm = Swarm::builder()
        .space(dataset.search_space())
        .agents(dataset.suggested_agent_count())
        .direction(Direction::Maximize)
        .weight(0.4)
        .c1(2.0)
        .c2(2.0)
        .evaluator(GeneSubsetEvaluator::new(
            Arc::clone(&dataset),
            LinearOobScorer::default(),
        ))
        .build(&mut rng)?;

    let mut recorder = RunRecorder::new();
    let outcome = swarm.run_with(MAX_EPOCHS, &mut rng, &mut recorder)?;

    match outcome.best {
        Some(best) => {
            println!("held-out R²: {:.4}", best.error);
            let selected: Vec<&str> = best
                .position
                .active_indices()
                .into_iter()
                .map(|i| dataset.gene_names()[i].as_str())
                .collect();
            println!("selected {} genes: {selected:?}", selected.len());

            if let Some(diagnostics) = &swarm.agents()[best.agent_id].diagnostics {
                let mut ranked: Vec<(&String, &f64)> = diagnostics.iter().collect();
                ranked.sort_by(|a, b| b.1.total_cmp(a.1));
                println!("top importances:");
                for (name, weight) in ranked.iter().take(10) {
                    println!("  {name}: {weight:.4}");
                }
            }
        }
        None => println!("no feasible subset found"),
    }

    println!(
        "final iteration record: {}",
        serde_json::to_string(&recorder.record().iterations.last()).expect("record serializes")
    );
    Ok(())
}
