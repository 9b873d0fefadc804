//! Error types for the evolution engine.

use thiserror::Error;

/// Errors surfaced by [`Evolver`](crate::Evolver).
///
/// Every variant except [`NotInitialized`](EvolveError::NotInitialized)
/// indicates a configuration mistake and is reported by
/// [`Evolver::new`](crate::Evolver::new); once an engine is constructed and
/// initialized, no operation can fail.
#[derive(Debug, Error)]
pub enum EvolveError {
    /// Agent dimension is zero.
    #[error("agent dimension must be greater than 0")]
    InvalidDimension,

    /// The search space can be neither used directly nor broadcast.
    #[error("search space mismatch: expected 1 or {expected} bound pairs, got {got}")]
    SearchSpaceMismatch {
        /// Agent dimension the search space must cover
        expected: usize,
        /// Number of bound pairs supplied
        got: usize,
    },

    /// A lower bound exceeds its upper bound.
    #[error("invalid bounds at index {index}: lower ({lower}) > upper ({upper})")]
    InvalidBounds {
        /// Index of the offending pair
        index: usize,
        /// The lower bound
        lower: f64,
        /// The upper bound
        upper: f64,
    },

    /// Population is too small for mutation to pick three distinct agents
    /// besides the reference.
    #[error("population size ({size}) must be >= 4")]
    PopulationTooSmall {
        /// The invalid population size
        size: usize,
    },

    /// Crossover rate outside `[0, 1]`.
    #[error("invalid crossover rate: {rate} (must be in [0, 1])")]
    InvalidCrossoverRate {
        /// The invalid rate
        rate: f64,
    },

    /// Stall factor outside `[0, 1]`.
    #[error("invalid stall factor: {factor} (must be in [0, 1])")]
    InvalidStallFactor {
        /// The invalid factor
        factor: f64,
    },

    /// `evolve_one_generation` was called before `initialize`.
    #[error("population not initialized")]
    NotInitialized,
}

/// A specialized `Result` for engine operations.
pub type Result<T> = std::result::Result<T, EvolveError>;

impl EvolveError {
    /// Returns `true` for errors raised while validating engine configuration.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, EvolveError::NotInitialized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EvolveError::SearchSpaceMismatch { expected: 4, got: 2 };
        assert_eq!(err.to_string(), "search space mismatch: expected 1 or 4 bound pairs, got 2");

        let err = EvolveError::PopulationTooSmall { size: 3 };
        assert_eq!(err.to_string(), "population size (3) must be >= 4");
    }

    #[test]
    fn test_is_config_error() {
        assert!(EvolveError::InvalidCrossoverRate { rate: 1.5 }.is_config_error());
        assert!(EvolveError::InvalidBounds { index: 0, lower: 2.0, upper: 1.0 }.is_config_error());
        assert!(!EvolveError::NotInitialized.is_config_error());
    }
}
