//! Weighted A/B experiments over template versions.

use super::DEFAULT_VERSION;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One arm of an experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentVariant {
    /// Template version rendered when this arm is drawn.
    pub version: String,
    /// Share of draws; weights are not renormalized.
    pub weight: f64,
}

impl ExperimentVariant {
    /// Creates an arm.
    #[must_use]
    pub fn new(version: impl Into<String>, weight: f64) -> Self {
        Self {
            version: version.into(),
            weight,
        }
    }
}

/// A named set of weighted template versions.
///
/// Selection walks the variants accumulating weight and returns the first
/// whose cumulative weight exceeds the draw. When the weights sum to less
/// than the draw the last variant wins.
///
/// # Examples
///
/// ```
/// use atelier::prompt::domain::{Experiment, ExperimentVariant};
///
/// let experiment = Experiment::new("tone")
///     .with_variant(ExperimentVariant::new("formal", 0.25))
///     .with_variant(ExperimentVariant::new("casual", 0.75));
/// assert_eq!(experiment.select(0.1), "formal");
/// assert_eq!(experiment.select(0.5), "casual");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experiment {
    /// Experiment name, recorded with rendered prompts.
    pub name: String,
    /// Arms in selection order.
    pub variants: Vec<ExperimentVariant>,
}

impl Experiment {
    /// Creates an experiment with no arms.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variants: Vec::new(),
        }
    }

    /// Appends an arm.
    #[must_use]
    pub fn with_variant(mut self, variant: ExperimentVariant) -> Self {
        self.variants.push(variant);
        self
    }

    /// Returns the version selected by `draw`, a value in `[0, 1)`.
    ///
    /// An experiment without arms selects the default version.
    #[expect(clippy::float_arithmetic, reason = "cumulative weight walk")]
    #[must_use]
    pub fn select(&self, draw: f64) -> &str {
        let mut cumulative = 0.0;
        for variant in &self.variants {
            cumulative += variant.weight;
            if cumulative > draw {
                return &variant.version;
            }
        }
        self.variants
            .last()
            .map_or(DEFAULT_VERSION, |variant| variant.version.as_str())
    }

    /// Draws a version using `rng`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.select(rng.gen_range(0.0..1.0))
    }
}
