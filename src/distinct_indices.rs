use rand::seq::SliceRandom;
use rand::Rng;

/// Sample `count` distinct indices from `0..pool_size`, never returning
/// `exclude`. Uniform without replacement.
pub(crate) fn distinct_indices<R: Rng + ?Sized>(
    exclude: usize,
    count: usize,
    pool_size: usize,
    rng: &mut R,
) -> Vec<usize> {
    debug_assert!(count < pool_size);
    let mut idxs: Vec<usize> = (0..pool_size).filter(|&i| i != exclude).collect();
    idxs.shuffle(rng);
    idxs.truncate(count);
    idxs
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn indices_are_distinct_and_never_the_excluded_one() {
        let mut rng = StdRng::seed_from_u64(3);
        for pool_size in 4..10 {
            for exclude in 0..pool_size {
                for _ in 0..200 {
                    let idxs = distinct_indices(exclude, 3, pool_size, &mut rng);
                    assert_eq!(idxs.len(), 3);
                    assert!(idxs.iter().all(|&i| i != exclude && i < pool_size));
                    assert_ne!(idxs[0], idxs[1]);
                    assert_ne!(idxs[0], idxs[2]);
                    assert_ne!(idxs[1], idxs[2]);
                }
            }
        }
    }

    #[test]
    fn minimal_pool_uses_all_other_indices() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut idxs = distinct_indices(1, 3, 4, &mut rng);
        idxs.sort_unstable();
        assert_eq!(idxs, vec![0, 2, 3]);
    }
}
