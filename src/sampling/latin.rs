use rand::seq::SliceRandom;
use rand::Rng;

/// Latin hypercube design in the unit cube: `dims` columns of `n` samples each.
/// Every column holds exactly one sample in each stratum `[k/n, (k+1)/n)`, and the
/// strata of different columns are paired by independent random permutations.
pub fn latin_hypercube<R: Rng + ?Sized>(dims: usize, n: usize, rng: &mut R) -> Vec<Vec<f64>> {
    (0..dims)
        .map(|_| {
            let mut strata: Vec<usize> = (0..n).collect();
            strata.shuffle(rng);
            strata
                .into_iter()
                .map(|k| (k as f64 + rng.gen::<f64>()) / n as f64)
                .collect()
        })
        .collect()
}
