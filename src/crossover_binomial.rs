use ndarray::Array1;
use rand::Rng;

/// Binomial crossover producing a trial vector from `reference` and
/// `mutant`.
///
/// One index, drawn uniformly, always takes the mutant value so the trial
/// differs from the reference in at least one dimension; every other
/// dimension takes the mutant value when an independent uniform draw
/// satisfies `u <= cr`.
pub(crate) fn binomial_crossover<R: Rng + ?Sized>(
    reference: &Array1<f64>,
    mutant: &Array1<f64>,
    cr: f64,
    rng: &mut R,
) -> Array1<f64> {
    let n = reference.len();
    let forced = rng.random_range(0..n);
    let mut trial = reference.clone();
    for j in 0..n {
        if j == forced || rng.random::<f64>() <= cr {
            trial[j] = mutant[j];
        }
    }
    trial
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn zero_rate_still_crosses_the_forced_index() {
        let reference = array![0.0, 0.0, 0.0, 0.0];
        let mutant = array![1.0, 2.0, 3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..500 {
            let trial = binomial_crossover(&reference, &mutant, 0.0, &mut rng);
            let differing = trial.iter().zip(reference.iter()).filter(|(t, r)| t != r).count();
            assert!(differing >= 1, "trial must differ from the reference somewhere");
        }
    }

    #[test]
    fn full_rate_takes_every_mutant_value() {
        let reference = array![0.0, 0.0, 0.0];
        let mutant = array![1.0, 2.0, 3.0];
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            let trial = binomial_crossover(&reference, &mutant, 1.0, &mut rng);
            assert_eq!(trial, mutant);
        }
    }

    #[test]
    fn operands_are_left_unmodified() {
        let reference = array![1.0, 2.0];
        let mutant = array![3.0, 4.0];
        let mut rng = StdRng::seed_from_u64(9);
        let _ = binomial_crossover(&reference, &mutant, 0.5, &mut rng);
        assert_eq!(reference, array![1.0, 2.0]);
        assert_eq!(mutant, array![3.0, 4.0]);
    }
}
