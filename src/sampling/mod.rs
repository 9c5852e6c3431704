//! Value generation for parameter studies.
//!
//! A study selects some parameters, each with a [`SelectionSpec`], and a
//! [`SamplingStrategy`]. [`generate_values`] turns them into a [`SamplePlan`]:
//! one column of values per selection, one row per case.

#[cfg(feature = "latin-hypercube")]
mod latin;
mod selection;
mod strategy;

#[cfg(test)]
mod tests;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};

use crate::types::ParamValue;

pub use selection::{ParameterSelection, SelectionError, SelectionSpec};
pub use strategy::{SamplingStrategy, StrategyResolution};

/// Values for every case of a study
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePlan {
    pub resolution: StrategyResolution,
    pub case_count: usize,
    /// `values[selection][case]`, in the order the selections were given
    pub values: Vec<Vec<ParamValue>>,
}

impl SamplePlan {
    /// Values of one case, one per selection
    pub fn case_values(&self, case_index: usize) -> Vec<&ParamValue> {
        self.values.iter().map(|column| &column[case_index]).collect()
    }
}

/// `n` evenly spaced points from `start` to `end` inclusive.
/// A single point is `start`; zero points is empty.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}

/// `n` geometrically spaced points from `start` to `end`; both must be positive
fn logspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    linspace(start.log10(), end.log10(), n)
        .into_iter()
        .enumerate()
        .map(|(i, exponent)| match i {
            0 => start,
            _ if i == n - 1 => end,
            _ => 10f64.powf(exponent),
        })
        .collect()
}

/// Produces the values of every case.
///
/// Grid search ignores `requested_count` and yields the full Cartesian product,
/// with the first selection varying slowest. Every other strategy yields exactly
/// `requested_count` cases. `seed` makes the random strategies reproducible.
pub fn generate_values(
    selections: &[ParameterSelection],
    strategy: SamplingStrategy,
    requested_count: usize,
    seed: Option<u64>,
) -> SamplePlan {
    let resolution = StrategyResolution::resolve(strategy);
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    if resolution.effective == SamplingStrategy::GridSearch {
        return grid_plan(selections, resolution);
    }

    let n = requested_count;

    #[cfg(feature = "latin-hypercube")]
    let mut design = if resolution.effective == SamplingStrategy::LatinHypercube {
        let dims = selections.iter().filter(|s| s.spec.is_numeric()).count();
        latin::latin_hypercube(dims, n, &mut rng).into_iter()
    } else {
        Vec::new().into_iter()
    };

    let mut values = Vec::with_capacity(selections.len());
    for selection in selections {
        let Some((start, end)) = selection.spec.bounds() else {
            values.push(vec![selection.held_value(); n]);
            continue;
        };
        let (low, high) = (start.min(end), start.max(end));

        let raw: Vec<f64> = match resolution.effective {
            SamplingStrategy::Uniform => linspace(start, end, n),
            SamplingStrategy::Normal => normal_samples(low, high, n, &mut rng),
            SamplingStrategy::Logarithmic => {
                if start > 0.0 && end > 0.0 {
                    logspace(start, end, n)
                } else {
                    tracing::warn!(
                        "Logarithmic spacing needs positive bounds, {} spans {}..{}; using linear spacing",
                        selection.key(),
                        start,
                        end
                    );
                    linspace(start, end, n)
                }
            }
            #[cfg(feature = "latin-hypercube")]
            SamplingStrategy::LatinHypercube => design
                .next()
                .unwrap_or_default()
                .into_iter()
                .map(|u| low + u * (high - low))
                .collect(),
            _ => (0..n).map(|_| low + rng.gen::<f64>() * (high - low)).collect(),
        };

        values.push(raw.into_iter().map(|sample| selection.spec.coerce(sample)).collect());
    }

    SamplePlan {
        resolution,
        case_count: n,
        values,
    }
}

fn grid_plan(selections: &[ParameterSelection], resolution: StrategyResolution) -> SamplePlan {
    let options: Vec<Vec<ParamValue>> = selections.iter().map(ParameterSelection::grid_values).collect();
    let case_count = if options.is_empty() {
        0
    } else {
        options.iter().map(Vec::len).product()
    };

    // stride of column j is the product of the option counts after it
    let mut strides = vec![1usize; options.len()];
    for j in (0..options.len().saturating_sub(1)).rev() {
        strides[j] = strides[j + 1] * options[j + 1].len();
    }

    let values = options
        .iter()
        .zip(&strides)
        .map(|(column, stride)| {
            (0..case_count)
                .map(|case| column[(case / stride) % column.len()].clone())
                .collect()
        })
        .collect();

    SamplePlan {
        resolution,
        case_count,
        values,
    }
}

fn normal_samples<R: Rng + ?Sized>(low: f64, high: f64, n: usize, rng: &mut R) -> Vec<f64> {
    let mean = (low + high) / 2.0;
    let std_dev = (high - low) / 6.0;
    match Normal::new(mean, std_dev) {
        Ok(normal) => (0..n).map(|_| normal.sample(rng).clamp(low, high)).collect(),
        Err(_) => vec![mean; n],
    }
}
