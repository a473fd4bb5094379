//! Stochastic parameter values and the sampler that draws from them.
//!
//! Every economic input is either a fixed number or a normally distributed
//! quantity described by its mean and standard deviation. The sampler takes
//! the random generator explicitly so that a single seeded generator can be
//! threaded through an entire analysis run.

use crate::errors::{PineconeError, PineconeResult};
use crate::FloatValue;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

/// A parameter that is either known exactly or uncertain.
///
/// Uncertain values are interpreted as $\mathcal{N}(\mu, \sigma)$.
///
/// In configuration files a fixed value is written as a bare number and an
/// uncertain value as either `{ mean = 7.5, std = 1.0 }` or `[7.5, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StochasticValueRepr", into = "StochasticValueRepr")]
pub enum StochasticValue {
    Fixed(FloatValue),
    Uncertain { mean: FloatValue, std: FloatValue },
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum StochasticValueRepr {
    Fixed(FloatValue),
    Pair([FloatValue; 2]),
    Uncertain {
        mean: FloatValue,
        #[serde(default)]
        std: FloatValue,
    },
}

impl From<StochasticValueRepr> for StochasticValue {
    fn from(value: StochasticValueRepr) -> Self {
        match value {
            StochasticValueRepr::Fixed(v) => StochasticValue::Fixed(v),
            StochasticValueRepr::Pair([mean, std]) => StochasticValue::Uncertain { mean, std },
            StochasticValueRepr::Uncertain { mean, std } => {
                StochasticValue::Uncertain { mean, std }
            }
        }
    }
}

impl From<StochasticValue> for StochasticValueRepr {
    fn from(value: StochasticValue) -> Self {
        match value {
            StochasticValue::Fixed(v) => StochasticValueRepr::Fixed(v),
            StochasticValue::Uncertain { mean, std } => {
                StochasticValueRepr::Uncertain { mean, std }
            }
        }
    }
}

impl StochasticValue {
    pub fn fixed(value: FloatValue) -> Self {
        StochasticValue::Fixed(value)
    }

    pub fn uncertain(mean: FloatValue, std: FloatValue) -> Self {
        StochasticValue::Uncertain { mean, std }
    }

    /// Expected value of the parameter.
    pub fn mean(&self) -> FloatValue {
        match self {
            StochasticValue::Fixed(v) => *v,
            StochasticValue::Uncertain { mean, .. } => *mean,
        }
    }

    /// Standard deviation of the parameter (zero for fixed values).
    pub fn std(&self) -> FloatValue {
        match self {
            StochasticValue::Fixed(_) => 0.0,
            StochasticValue::Uncertain { std, .. } => *std,
        }
    }

    /// Multiply both the mean and the spread by `factor`.
    ///
    /// The spread is scaled by `|factor|` so that a negative factor still
    /// yields a valid distribution.
    pub fn scale(&self, factor: FloatValue) -> Self {
        match self {
            StochasticValue::Fixed(v) => StochasticValue::Fixed(v * factor),
            StochasticValue::Uncertain { mean, std } => StochasticValue::Uncertain {
                mean: mean * factor,
                std: std * factor.abs(),
            },
        }
    }

    /// Check that the value describes a finite, well-formed distribution.
    pub fn validate(&self, name: &str) -> PineconeResult<()> {
        match self {
            StochasticValue::Fixed(v) => {
                if !v.is_finite() {
                    return Err(PineconeError::invalid(
                        name,
                        format!("fixed value must be finite, got {}", v),
                    ));
                }
            }
            StochasticValue::Uncertain { mean, std } => {
                if !mean.is_finite() {
                    return Err(PineconeError::invalid(
                        name,
                        format!("mean must be finite, got {}", mean),
                    ));
                }
                if !std.is_finite() || *std < 0.0 {
                    return Err(PineconeError::invalid(
                        name,
                        format!("standard deviation must be finite and >= 0, got {}", std),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Draw a single value.
    ///
    /// Fixed values are returned unchanged and consume no randomness.
    /// Uncertain values always consume exactly one standard normal draw, even
    /// when `std == 0`, in which case `mean` is returned exactly.
    pub fn sample<R: Rng + ?Sized>(&self, name: &str, rng: &mut R) -> PineconeResult<FloatValue> {
        self.validate(name)?;

        match self {
            StochasticValue::Fixed(v) => Ok(*v),
            StochasticValue::Uncertain { mean, std } => {
                let z: FloatValue = rng.sample(StandardNormal);
                if *std == 0.0 {
                    Ok(*mean)
                } else {
                    Ok(mean + std * z)
                }
            }
        }
    }
}

impl From<FloatValue> for StochasticValue {
    fn from(value: FloatValue) -> Self {
        StochasticValue::Fixed(value)
    }
}

impl From<(FloatValue, FloatValue)> for StochasticValue {
    fn from((mean, std): (FloatValue, FloatValue)) -> Self {
        StochasticValue::Uncertain { mean, std }
    }
}

/// Draw one value for `param` from `rng`.
pub fn sample<R: Rng + ?Sized>(
    name: &str,
    param: &StochasticValue,
    rng: &mut R,
) -> PineconeResult<FloatValue> {
    param.sample(name, rng)
}
