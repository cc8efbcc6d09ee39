//! Position initializers
//!
//! By default agents start from uniformly random positions; this module
//! provides the seam for caller-supplied seeding strategies, such as rows of
//! a principal-component basis precomputed from the dataset.

use crate::space::Position;

/// Non-default position seeding strategy
///
/// `init` must return a position of the swarm's dimensionality; the swarm
/// validates this at construction and rejects mismatches as configuration
/// errors.
pub trait Initializer: Send + Sync {
    /// Produce the initial position for the given agent
    fn init(&self, agent_id: usize, dimensions: usize) -> Position;
}

/// Seeds each agent from one row of a precomputed basis matrix
///
/// Each coordinate activates when its magnitude exceeds the row's mean, so a
/// component row becomes an on/off feature mask. Agents beyond the last row
/// wrap around.
#[derive(Clone, Debug)]
pub struct BasisInit {
    rows: Vec<Vec<f64>>,
}

impl BasisInit {
    /// Create an initializer from basis rows (e.g. principal components)
    ///
    /// # Panics
    /// Panics if `rows` is empty
    pub fn new(rows: Vec<Vec<f64>>) -> Self {
        assert!(!rows.is_empty(), "BasisInit needs at least one row");
        Self { rows }
    }

    /// Number of basis rows available
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }
}

impl Initializer for BasisInit {
    fn init(&self, agent_id: usize, dimensions: usize) -> Position {
        let row = &self.rows[agent_id % self.rows.len()];
        let mean = row.iter().sum::<f64>() / row.len() as f64;
        let mask: Vec<f64> = row
            .iter()
            .take(dimensions)
            .map(|&c| if c.abs() > mean { 1.0 } else { 0.0 })
            .collect();
        Position::new(mask)
    }
}

/// A fixed-seed initializer handing every agent the same starting vector
#[derive(Clone, Debug)]
pub struct FixedInit {
    seed: Vec<f64>,
}

impl FixedInit {
    /// Create an initializer that always returns `seed`
    pub fn new(seed: Vec<f64>) -> Self {
        Self { seed }
    }
}

impl Initializer for FixedInit {
    fn init(&self, _agent_id: usize, _dimensions: usize) -> Position {
        Position::new(self.seed.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_init_thresholds_row() {
        // mean = 0.25; |c| > 0.25 activates
        let init = BasisInit::new(vec![vec![0.9, 0.1, -0.5, 0.5]]);
        let p = init.init(0, 4);
        assert_eq!(p.as_slice(), &[1.0, 0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_basis_init_wraps_rows() {
        let init = BasisInit::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(init.num_rows(), 2);
        assert_eq!(init.init(0, 2), init.init(2, 2));
        assert_eq!(init.init(1, 2), init.init(3, 2));
    }

    #[test]
    fn test_basis_init_truncates_to_dimension() {
        let init = BasisInit::new(vec![vec![1.0, 1.0, 1.0, 1.0]]);
        assert_eq!(init.init(0, 2).dimension(), 2);
    }

    #[test]
    fn test_fixed_init() {
        let init = FixedInit::new(vec![1.0, 0.0, 1.0]);
        assert_eq!(init.init(0, 3).as_slice(), &[1.0, 0.0, 1.0]);
        assert_eq!(init.init(5, 3).as_slice(), &[1.0, 0.0, 1.0]);
    }
}
