//! Summary Aggregator
//!
//! Reduces a sequence of Monte Carlo draws to descriptive statistics.
//! Statistics are population statistics over every draw; nothing is trimmed.

use crate::errors::{PineconeError, PineconeResult};
use crate::FloatValue;
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};

/// Descriptive statistics of a set of draws.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub mean: FloatValue,
    /// Population standard deviation (ddof = 0).
    pub std: FloatValue,
    pub median: FloatValue,
    pub q25: FloatValue,
    pub q75: FloatValue,
    pub min: FloatValue,
    pub max: FloatValue,
}

impl SummaryStatistics {
    /// Standard error of the mean for `n` draws.
    pub fn standard_error(&self, n: usize) -> FloatValue {
        self.std / (n as FloatValue).sqrt()
    }
}

/// Summarise `samples`.
///
/// Quartiles and the median interpolate linearly between order statistics
/// at position $q (n - 1)$.
///
/// Requires at least one finite sample.
pub fn summarize(samples: ArrayView1<'_, FloatValue>) -> PineconeResult<SummaryStatistics> {
    if samples.is_empty() {
        return Err(PineconeError::invalid(
            "samples",
            "at least one sample is required",
        ));
    }
    if let Some(bad) = samples.iter().find(|v| !v.is_finite()) {
        return Err(PineconeError::invalid(
            "samples",
            format!("samples must be finite, got {}", bad),
        ));
    }

    let mut sorted = samples.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let n = sorted.len() as FloatValue;
    let mean = sorted.iter().sum::<FloatValue>() / n;
    let variance = sorted.iter().map(|&x| (x - mean).powi(2)).sum::<FloatValue>() / n;

    Ok(SummaryStatistics {
        mean,
        std: variance.sqrt(),
        median: quantile_sorted(&sorted, 0.5),
        q25: quantile_sorted(&sorted, 0.25),
        q75: quantile_sorted(&sorted, 0.75),
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

/// Summarise a slice of draws.
pub fn summarize_slice(samples: &[FloatValue]) -> PineconeResult<SummaryStatistics> {
    summarize(ArrayView1::from(samples))
}

/// Linearly interpolated quantile of non-empty sorted data.
fn quantile_sorted(sorted: &[FloatValue], q: FloatValue) -> FloatValue {
    let position = q * (sorted.len() - 1) as FloatValue;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;

    if lower == upper {
        return sorted[lower];
    }

    let fraction = position - lower as FloatValue;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}
