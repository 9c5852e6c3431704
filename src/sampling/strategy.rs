use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How values are drawn for the selected parameters
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    /// Cartesian product of every selection's option set
    GridSearch,
    /// Evenly spaced points from start to end
    Uniform,
    /// Normal around the midpoint with sigma = range / 6, clipped to the range
    Normal,
    /// Geometrically spaced points; needs strictly positive bounds
    Logarithmic,
    /// One sample per stratum and parameter, strata paired at random
    LatinHypercube,
    /// Independent uniform draws
    RandomUniform,
}

impl SamplingStrategy {
    pub const ALL: [SamplingStrategy; 6] = [
        SamplingStrategy::GridSearch,
        SamplingStrategy::Uniform,
        SamplingStrategy::Normal,
        SamplingStrategy::Logarithmic,
        SamplingStrategy::LatinHypercube,
        SamplingStrategy::RandomUniform,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SamplingStrategy::GridSearch => "grid_search",
            SamplingStrategy::Uniform => "uniform",
            SamplingStrategy::Normal => "normal",
            SamplingStrategy::Logarithmic => "logarithmic",
            SamplingStrategy::LatinHypercube => "latin_hypercube",
            SamplingStrategy::RandomUniform => "random_uniform",
        }
    }
}

impl Default for SamplingStrategy {
    fn default() -> Self {
        SamplingStrategy::Uniform
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SamplingStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SamplingStrategy::ALL
            .iter()
            .copied()
            .find(|strategy| strategy.as_str() == normalized)
            .ok_or_else(|| format!("Unknown sampling strategy: {}", s))
    }
}

/// The strategy a study asked for and the one that actually ran
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResolution {
    pub requested: SamplingStrategy,
    pub effective: SamplingStrategy,
    /// Why `effective` differs from `requested`
    pub reason: Option<String>,
}

impl StrategyResolution {
    /// Settles which sampler runs for `requested`. Latin hypercube needs the
    /// `latin-hypercube` feature and degrades to random uniform without it.
    pub fn resolve(requested: SamplingStrategy) -> Self {
        #[cfg(not(feature = "latin-hypercube"))]
        if requested == SamplingStrategy::LatinHypercube {
            let reason = "latin hypercube sampler not built (feature `latin-hypercube` disabled)".to_string();
            tracing::warn!("{}; falling back to {}", reason, SamplingStrategy::RandomUniform);
            return Self {
                requested,
                effective: SamplingStrategy::RandomUniform,
                reason: Some(reason),
            };
        }

        Self {
            requested,
            effective: requested,
            reason: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.requested != self.effective
    }
}
