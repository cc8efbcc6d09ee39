//! Gene-subset fitness
//!
//! Bridges a binary gene mask to the model-fit score that drives selection.
//! The scorer is a capability: an opaque, possibly slow model fit over the
//! extracted columns. The built-in scorer fits ordinary least squares on a
//! training split and scores R² on the held-out samples, the same
//! generalization-not-memorization role an out-of-bag score plays for a
//! forest. Fit scores are higher-is-better, so run these with
//! [`Direction::Maximize`](crate::fitness::Direction).

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::error::EvaluatorError;
use crate::fitness::{Diagnostics, Evaluation, Evaluator};
use crate::genes::dataset::GeneDataset;
use crate::space::Position;

/// A fitted model's score and per-column coefficients
#[derive(Clone, Debug)]
pub struct ScoredFit {
    /// Held-out fit score, higher is better
    pub score: f64,
    /// One coefficient per input column (intercept excluded)
    pub coefficients: Vec<f64>,
}

/// Model-fit capability over an extracted column subset
pub trait SubsetScorer: Send + Sync {
    /// Fit a model on the columns and score it against the target
    fn score(&self, columns: &[Vec<f64>], target: &[f64]) -> Result<ScoredFit, EvaluatorError>;
}

/// Least-squares fit scored on held-out samples
///
/// Every `holdout_every`-th sample is withheld from the fit and used to
/// compute the R² score. The split is positional and deterministic, so a
/// given mask always scores the same.
#[derive(Clone, Debug)]
pub struct LinearOobScorer {
    holdout_every: usize,
}

impl Default for LinearOobScorer {
    fn default() -> Self {
        Self { holdout_every: 4 }
    }
}

impl LinearOobScorer {
    /// Withhold every n-th sample (n >= 2)
    pub fn new(holdout_every: usize) -> Self {
        Self {
            holdout_every: holdout_every.max(2),
        }
    }
}

impl SubsetScorer for LinearOobScorer {
    fn score(&self, columns: &[Vec<f64>], target: &[f64]) -> Result<ScoredFit, EvaluatorError> {
        if columns.is_empty() {
            return Err(EvaluatorError::Other(
                "No active columns to fit".to_string(),
            ));
        }
        for column in columns {
            if column.len() != target.len() {
                return Err(EvaluatorError::DimensionMismatch {
                    expected: target.len(),
                    actual: column.len(),
                });
            }
        }

        let (train, holdout): (Vec<usize>, Vec<usize>) =
            (0..target.len()).partition(|i| i % self.holdout_every != 0);
        if train.is_empty() || holdout.is_empty() {
            return Err(EvaluatorError::FitFailed(format!(
                "{} samples are too few for a holdout split",
                target.len()
            )));
        }

        // design matrix with a leading intercept column
        let a = DMatrix::from_fn(train.len(), columns.len() + 1, |r, c| {
            if c == 0 {
                1.0
            } else {
                columns[c - 1][train[r]]
            }
        });
        let b = DVector::from_iterator(train.len(), train.iter().map(|&i| target[i]));

        let solution = a
            .svd(true, true)
            .solve(&b, 1e-12)
            .map_err(|e| EvaluatorError::FitFailed(e.to_string()))?;
        let intercept = solution[0];
        let coefficients: Vec<f64> = solution.iter().skip(1).copied().collect();

        let holdout_mean =
            holdout.iter().map(|&i| target[i]).sum::<f64>() / holdout.len() as f64;
        let mut ss_res = 0.0;
        let mut ss_tot = 0.0;
        for &i in &holdout {
            let predicted = intercept
                + coefficients
                    .iter()
                    .zip(columns)
                    .map(|(coef, column)| coef * column[i])
                    .sum::<f64>();
            ss_res += (target[i] - predicted) * (target[i] - predicted);
            ss_tot += (target[i] - holdout_mean) * (target[i] - holdout_mean);
        }
        if ss_tot == 0.0 {
            return Err(EvaluatorError::FitFailed(
                "Held-out target has zero variance".to_string(),
            ));
        }

        Ok(ScoredFit {
            score: 1.0 - ss_res / ss_tot,
            coefficients,
        })
    }
}

/// Evaluates a binary gene mask by fitting a model on the selected columns
pub struct GeneSubsetEvaluator<S: SubsetScorer> {
    dataset: Arc<GeneDataset>,
    scorer: S,
}

impl<S: SubsetScorer> GeneSubsetEvaluator<S> {
    /// Create an evaluator over a shared dataset
    pub fn new(dataset: Arc<GeneDataset>, scorer: S) -> Self {
        Self { dataset, scorer }
    }

    /// Sum the absolute coefficients per column name and normalize
    ///
    /// Covariate columns share their covariate's name, so multi-column
    /// encodings collapse back into one importance entry.
    fn importances(names: &[String], coefficients: &[f64]) -> Diagnostics {
        let mut grouped = Diagnostics::new();
        for (name, coef) in names.iter().zip(coefficients) {
            *grouped.entry(name.clone()).or_insert(0.0) += coef.abs();
        }
        let total: f64 = grouped.values().sum();
        if total > 0.0 {
            for value in grouped.values_mut() {
                *value /= total;
            }
        }
        grouped
    }
}

impl<S: SubsetScorer> Evaluator for GeneSubsetEvaluator<S> {
    fn evaluate(&self, position: &Position) -> Result<Evaluation, EvaluatorError> {
        let (columns, names) = self.dataset.subset_columns(position)?;
        let fit = self.scorer.score(&columns, self.dataset.target())?;
        if !fit.score.is_finite() {
            return Err(EvaluatorError::NonFiniteScore(fit.score));
        }
        Ok(Evaluation::score(fit.score)
            .with_diagnostics(Self::importances(&names, &fit.coefficients)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_linear_scorer_recovers_exact_relation() {
        // y = 2x + 1 exactly, so the held-out R² is 1
        let x: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|xi| 2.0 * xi + 1.0).collect();

        let fit = LinearOobScorer::default()
            .score(&[x], &y)
            .unwrap();
        assert_relative_eq!(fit.score, 1.0, epsilon = 1e-8);
        assert_eq!(fit.coefficients.len(), 1);
        assert_relative_eq!(fit.coefficients[0], 2.0, epsilon = 1e-8);
    }

    #[test]
    fn test_linear_scorer_noise_column_scores_low() {
        let x = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let y = vec![0.0, 10.0, 0.0, 10.0, 5.0, 10.0, 0.0, 10.0];
        let fit = LinearOobScorer::default().score(&[x], &y).unwrap();
        assert!(fit.score < 1.0);
    }

    #[test]
    fn test_linear_scorer_constant_holdout_target_fails() {
        // every 4th sample is withheld; targets 0.0 at indices 0 and 4 leave
        // the holdout with zero variance, which cannot be scored
        let x = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let y = vec![0.0, 10.0, 0.0, 10.0, 0.0, 10.0, 0.0, 10.0];
        let err = LinearOobScorer::default().score(&[x], &y).unwrap_err();
        assert!(matches!(err, EvaluatorError::FitFailed(_)));
    }

    #[test]
    fn test_linear_scorer_rejects_empty_subset() {
        let err = LinearOobScorer::default()
            .score(&[], &[1.0, 2.0])
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::Other(_)));
    }

    #[test]
    fn test_linear_scorer_rejects_ragged_columns() {
        let err = LinearOobScorer::default()
            .score(&[vec![1.0, 2.0]], &[1.0, 2.0, 3.0])
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::DimensionMismatch { .. }));
    }

    #[test]
    fn test_linear_scorer_too_few_samples() {
        let err = LinearOobScorer::default()
            .score(&[vec![1.0]], &[1.0])
            .unwrap_err();
        assert!(matches!(err, EvaluatorError::FitFailed(_)));
    }

    #[test]
    fn test_subset_evaluator_scores_predictive_gene() {
        let target: Vec<f64> = (0..8).map(|i| 3.0 * i as f64 - 2.0).collect();
        let predictive: Vec<f64> = (0..8).map(|i| i as f64).collect();
        let noise = vec![2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0];

        let dataset = Arc::new(
            GeneDataset::new(
                vec!["sig".to_string(), "noise".to_string()],
                vec![predictive, noise],
                target,
                vec![],
            )
            .unwrap(),
        );
        let evaluator = GeneSubsetEvaluator::new(dataset, LinearOobScorer::default());

        let eval = evaluator
            .evaluate(&Position::new(vec![1.0, 0.0]))
            .unwrap();
        assert_relative_eq!(eval.error, 1.0, epsilon = 1e-8);

        let diagnostics = eval.diagnostics.unwrap();
        assert_relative_eq!(diagnostics["sig"], 1.0);
        assert!(!diagnostics.contains_key("noise"));
    }

    #[test]
    fn test_importances_group_by_name() {
        let names = vec!["g1".to_string(), "sex".to_string(), "sex".to_string()];
        let importances =
            GeneSubsetEvaluator::<LinearOobScorer>::importances(&names, &[1.0, 0.5, -0.5]);
        assert_relative_eq!(importances["g1"], 0.5);
        assert_relative_eq!(importances["sex"], 0.5);
    }
}
