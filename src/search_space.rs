use ndarray::Array1;
use rand::Rng;

use crate::error::{EvolveError, Result};

/// Per-dimension inclusive bounds constraining valid agent values.
///
/// Immutable once built; the engine uses it to draw the initial population
/// and to clamp mutated values back into range.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchSpace {
    bounds: Vec<(f64, f64)>,
}

impl SearchSpace {
    /// Build a search space covering `dim` dimensions.
    ///
    /// `pairs` must hold one `(lower, upper)` pair per dimension, or a
    /// single pair which is broadcast to every dimension. Each pair must
    /// satisfy `lower <= upper`.
    pub fn broadcast(pairs: &[(f64, f64)], dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(EvolveError::InvalidDimension);
        }
        let bounds: Vec<(f64, f64)> = if pairs.len() == dim {
            pairs.to_vec()
        } else if pairs.len() == 1 {
            vec![pairs[0]; dim]
        } else {
            return Err(EvolveError::SearchSpaceMismatch { expected: dim, got: pairs.len() });
        };
        for (i, &(lower, upper)) in bounds.iter().enumerate() {
            if lower > upper {
                return Err(EvolveError::InvalidBounds { index: i, lower, upper });
            }
        }
        Ok(Self { bounds })
    }

    /// Number of dimensions covered.
    pub fn dim(&self) -> usize {
        self.bounds.len()
    }

    /// The bound pairs, one per dimension.
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Clamp `value` into the bounds of dimension `i`.
    pub fn clamp(&self, i: usize, value: f64) -> f64 {
        let (lower, upper) = self.bounds[i];
        value.clamp(lower, upper)
    }

    /// Clamp every coordinate of `agent` in place.
    pub(crate) fn clamp_agent(&self, agent: &mut Array1<f64>) {
        for i in 0..agent.len() {
            agent[i] = self.clamp(i, agent[i]);
        }
    }

    /// Draw a uniform value from dimension `i`.
    pub fn sample<R: Rng + ?Sized>(&self, i: usize, rng: &mut R) -> f64 {
        let (lower, upper) = self.bounds[i];
        lower + (upper - lower) * rng.random::<f64>()
    }

    /// Whether every coordinate of `agent` lies within its bounds.
    pub fn contains(&self, agent: &Array1<f64>) -> bool {
        agent.len() == self.dim()
            && agent
                .iter()
                .zip(&self.bounds)
                .all(|(&v, &(lower, upper))| v >= lower && v <= upper)
    }
}
