//! Covariate encoding
//!
//! Clinical covariates (age, tissue type, sex, ...) ride along with the
//! selected gene columns in every model fit. Each covariate declares how its
//! raw string values become numeric columns; the encoder is configuration,
//! chosen per covariate, not hard-wired per feature.

use crate::error::SwarmError;

/// How a covariate column is turned into numeric model columns
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FeatureEncoder {
    /// Parse values as numbers; one column, unchanged
    Identity,
    /// One indicator column per distinct category, in sorted order
    OneHot,
    /// A two-category variable as a complementary indicator pair
    BinaryPair,
}

impl FeatureEncoder {
    /// Encode raw values into numeric columns
    ///
    /// Every returned column has one entry per input value. Unparseable
    /// numbers (Identity) and category-count mismatches (BinaryPair) are
    /// configuration errors.
    pub fn encode(&self, values: &[String]) -> Result<Vec<Vec<f64>>, SwarmError> {
        match self {
            Self::Identity => {
                let column = values
                    .iter()
                    .map(|v| {
                        v.parse::<f64>().map_err(|_| {
                            SwarmError::Configuration(format!(
                                "Identity-encoded covariate value '{v}' is not numeric"
                            ))
                        })
                    })
                    .collect::<Result<Vec<f64>, _>>()?;
                Ok(vec![column])
            }
            Self::OneHot => {
                let categories = sorted_categories(values);
                Ok(categories
                    .iter()
                    .map(|cat| {
                        values
                            .iter()
                            .map(|v| if v == cat { 1.0 } else { 0.0 })
                            .collect()
                    })
                    .collect())
            }
            Self::BinaryPair => {
                let categories = sorted_categories(values);
                if categories.len() != 2 {
                    return Err(SwarmError::Configuration(format!(
                        "BinaryPair covariate needs exactly 2 categories, found {}",
                        categories.len()
                    )));
                }
                let first = &categories[0];
                let column: Vec<f64> = values
                    .iter()
                    .map(|v| if v == first { 1.0 } else { 0.0 })
                    .collect();
                let complement: Vec<f64> = column.iter().map(|&x| 1.0 - x).collect();
                Ok(vec![column, complement])
            }
        }
    }
}

fn sorted_categories(values: &[String]) -> Vec<String> {
    let mut categories: Vec<String> = values.to_vec();
    categories.sort();
    categories.dedup();
    categories
}

/// A named covariate column with its encoding
#[derive(Clone, Debug)]
pub struct Covariate {
    /// Name used for importance grouping
    pub name: String,
    /// Raw per-sample values
    pub values: Vec<String>,
    /// How the values become model columns
    pub encoder: FeatureEncoder,
}

impl Covariate {
    /// Create a covariate
    pub fn new(
        name: impl Into<String>,
        values: Vec<String>,
        encoder: FeatureEncoder,
    ) -> Self {
        Self {
            name: name.into(),
            values,
            encoder,
        }
    }

    /// Encode into numeric columns; all columns share this covariate's name
    pub fn encode(&self) -> Result<Vec<Vec<f64>>, SwarmError> {
        self.encoder.encode(&self.values)
    }
}
