//! Gene-expression dataset
//!
//! Column-major expression matrix (one column per gene), the regression
//! target, and the clinical covariates that accompany every fit. The
//! correlation pre-filter trims the matrix to the genes most (anti-)related
//! to the target before a swarm is ever built, which is what keeps the
//! binary search space tractable.

use crate::error::{EvaluatorError, SwarmError, SwarmResult};
use crate::genes::encoding::Covariate;
use crate::space::{Position, SearchSpace};

/// Default lower percentile kept by the correlation pre-filter
pub const DEFAULT_LOWER_PERCENTILE: f64 = 5.0;

/// Default upper percentile kept by the correlation pre-filter
pub const DEFAULT_UPPER_PERCENTILE: f64 = 95.0;

/// Expression matrix, target, and covariates for one selection problem
#[derive(Clone, Debug)]
pub struct GeneDataset {
    gene_names: Vec<String>,
    /// One column per gene, each with one entry per sample
    expression: Vec<Vec<f64>>,
    target: Vec<f64>,
    covariates: Vec<Covariate>,
}

impl GeneDataset {
    /// Create a dataset, validating that every column matches the sample count
    pub fn new(
        gene_names: Vec<String>,
        expression: Vec<Vec<f64>>,
        target: Vec<f64>,
        covariates: Vec<Covariate>,
    ) -> SwarmResult<Self> {
        if gene_names.is_empty() {
            return Err(SwarmError::Configuration(
                "Dataset must contain at least one gene".to_string(),
            ));
        }
        if gene_names.len() != expression.len() {
            return Err(SwarmError::Configuration(format!(
                "{} gene names for {} expression columns",
                gene_names.len(),
                expression.len()
            )));
        }
        if target.is_empty() {
            return Err(SwarmError::Configuration(
                "Dataset must contain at least one sample".to_string(),
            ));
        }
        let samples = target.len();
        for (name, column) in gene_names.iter().zip(&expression) {
            if column.len() != samples {
                return Err(SwarmError::Configuration(format!(
                    "Gene '{name}' has {} samples, expected {samples}",
                    column.len()
                )));
            }
        }
        for covariate in &covariates {
            if covariate.values.len() != samples {
                return Err(SwarmError::Configuration(format!(
                    "Covariate '{}' has {} samples, expected {samples}",
                    covariate.name,
                    covariate.values.len()
                )));
            }
        }
        Ok(Self {
            gene_names,
            expression,
            target,
            covariates,
        })
    }

    /// Number of genes (columns)
    pub fn num_genes(&self) -> usize {
        self.gene_names.len()
    }

    /// Number of samples (rows)
    pub fn num_samples(&self) -> usize {
        self.target.len()
    }

    /// Gene names, in column order
    pub fn gene_names(&self) -> &[String] {
        &self.gene_names
    }

    /// The regression target
    pub fn target(&self) -> &[f64] {
        &self.target
    }

    /// The binary search space matching this dataset
    pub fn search_space(&self) -> SearchSpace {
        SearchSpace::binary(self.num_genes())
    }

    /// Swarm size heuristic: one agent per ten genes, at least one
    pub fn suggested_agent_count(&self) -> usize {
        (self.num_genes() / 10).max(1)
    }

    /// Pearson correlation of each gene column with the target
    ///
    /// A zero-variance column correlates as 0.0 so it sits in neither tail.
    pub fn correlations(&self) -> Vec<f64> {
        self.expression
            .iter()
            .map(|column| pearson(column, &self.target))
            .collect()
    }

    /// Keep only the genes whose target correlation falls in the extreme
    /// tails (at or below `lower_percentile`, at or above `upper_percentile`)
    pub fn filter_by_correlation(
        &self,
        lower_percentile: f64,
        upper_percentile: f64,
    ) -> SwarmResult<Self> {
        if !(0.0..=100.0).contains(&lower_percentile)
            || !(0.0..=100.0).contains(&upper_percentile)
            || lower_percentile > upper_percentile
        {
            return Err(SwarmError::Configuration(format!(
                "Invalid percentile pair ({lower_percentile}, {upper_percentile})"
            )));
        }

        let correlations = self.correlations();
        let lower = percentile(&correlations, lower_percentile);
        let upper = percentile(&correlations, upper_percentile);

        let keep: Vec<usize> = correlations
            .iter()
            .enumerate()
            .filter(|(_, &c)| c <= lower || c >= upper)
            .map(|(i, _)| i)
            .collect();
        if keep.is_empty() {
            return Err(SwarmError::Configuration(
                "Correlation filter removed every gene".to_string(),
            ));
        }

        Ok(Self {
            gene_names: keep.iter().map(|&i| self.gene_names[i].clone()).collect(),
            expression: keep.iter().map(|&i| self.expression[i].clone()).collect(),
            target: self.target.clone(),
            covariates: self.covariates.clone(),
        })
    }

    /// Extract the model columns for an on/off gene mask
    ///
    /// Returns the active gene columns followed by the encoded covariate
    /// columns, with a parallel list of names (covariate columns repeat the
    /// covariate's name so importances can be grouped back onto it).
    pub fn subset_columns(
        &self,
        mask: &Position,
    ) -> Result<(Vec<Vec<f64>>, Vec<String>), EvaluatorError> {
        if mask.dimension() != self.num_genes() {
            return Err(EvaluatorError::DimensionMismatch {
                expected: self.num_genes(),
                actual: mask.dimension(),
            });
        }

        let mut columns = Vec::new();
        let mut names = Vec::new();
        for index in mask.active_indices() {
            columns.push(self.expression[index].clone());
            names.push(self.gene_names[index].clone());
        }
        for covariate in &self.covariates {
            let encoded = covariate
                .encode()
                .map_err(|e| EvaluatorError::Other(e.to_string()))?;
            for column in encoded {
                columns.push(column);
                names.push(covariate.name.clone());
            }
        }
        Ok((columns, names))
    }
}

/// Pearson correlation coefficient; 0.0 when either side has no variance
fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return 0.0;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

/// Nearest-rank percentile over an unsorted slice
fn percentile(values: &[f64], pct: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let rank = (pct / 100.0 * (sorted.len() - 1) as f64).round() as usize;
    sorted[rank]
}
