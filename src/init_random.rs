use ndarray::Array2;
use rand::Rng;

use crate::search_space::SearchSpace;

/// Draw a fresh population of `npop` agents, every coordinate uniform
/// within its search-space bounds.
pub(crate) fn init_random<R: Rng + ?Sized>(
    npop: usize,
    space: &SearchSpace,
    rng: &mut R,
) -> Array2<f64> {
    let n = space.dim();
    let mut pop = Array2::<f64>::zeros((npop, n));
    for i in 0..npop {
        for j in 0..n {
            pop[(i, j)] = space.sample(j, rng);
        }
    }
    pop
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn population_has_requested_shape_and_is_in_bounds() {
        let space = SearchSpace::broadcast(&[(-1.0, 1.0), (5.0, 6.0), (0.0, 0.0)], 3).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        let pop = init_random(20, &space, &mut rng);
        assert_eq!(pop.nrows(), 20);
        assert_eq!(pop.ncols(), 3);
        for row in pop.outer_iter() {
            assert!(space.contains(&row.to_owned()));
        }
        // degenerate range collapses to its single value
        for i in 0..20 {
            assert_eq!(pop[(i, 2)], 0.0);
        }
    }
}
