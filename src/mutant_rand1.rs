use ndarray::{Array1, Array2};
use rand::Rng;

use crate::distinct_indices::distinct_indices;
use crate::search_space::SearchSpace;

/// DE/rand/1 mutant for slot `i`: `a + f * (c - b)` built from three
/// distinct population members other than `i`, then clamped per dimension
/// into the search space.
///
/// The sampled rows are copied out of `pop`; the population is never
/// written to.
pub(crate) fn mutant_rand1<R: Rng + ?Sized>(
    i: usize,
    pop: &Array2<f64>,
    f: f64,
    space: &SearchSpace,
    rng: &mut R,
) -> Array1<f64> {
    let idxs = distinct_indices(i, 3, pop.nrows(), rng);
    let a = pop.row(idxs[0]).to_owned();
    let b = pop.row(idxs[1]).to_owned();
    let c = pop.row(idxs[2]).to_owned();
    let mut mutant = &a + &((c - b) * f);
    space.clamp_agent(&mut mutant);
    mutant
}
