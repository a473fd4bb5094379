//! Simulation Driver
//!
//! Repeats the TEV Model for a zone, optionally scaling each draw by the
//! zone's acreage, and packages the draws with their summary statistics.

use crate::errors::{PineconeError, PineconeResult};
use crate::parameters::{EconomicParameterSet, ZoneClass};
use crate::summary::{summarize, SummaryStatistics};
use crate::tev::{evaluate, TevComponents};
use crate::FloatValue;
use ndarray::Array1;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Whether draws are per acre or totals for the whole zone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueBasis {
    PerAcre,
    ZoneTotal { acres: FloatValue },
}

impl ValueBasis {
    /// Basis implied by an acreage: totals for a positive acreage, per acre otherwise.
    pub fn from_acreage(acreage: Option<FloatValue>) -> Self {
        match acreage {
            Some(acres) if acres > 0.0 && acres.is_finite() => ValueBasis::ZoneTotal { acres },
            _ => ValueBasis::PerAcre,
        }
    }

    pub fn factor(&self) -> FloatValue {
        match self {
            ValueBasis::PerAcre => 1.0,
            ValueBasis::ZoneTotal { acres } => *acres,
        }
    }

    pub fn acres(&self) -> Option<FloatValue> {
        match self {
            ValueBasis::PerAcre => None,
            ValueBasis::ZoneTotal { acres } => Some(*acres),
        }
    }
}

/// Raw draws for a zone on an explicit basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSamples {
    pub values: Array1<FloatValue>,
    pub basis: ValueBasis,
    /// Mean of each component over all draws, on the same basis.
    pub component_means: TevComponents,
}

impl SimulationSamples {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Run `num_simulations` independent TEV draws for `zone_id`.
///
/// A positive `acreage` multiplies every draw, giving zone totals. Zero,
/// negative or absent acreage leaves the draws per acre. The returned
/// [`SimulationSamples::basis`] records which was applied.
pub fn run<R: Rng + ?Sized>(
    zone_id: &str,
    params: &EconomicParameterSet,
    acreage: Option<FloatValue>,
    num_simulations: usize,
    rng: &mut R,
) -> PineconeResult<SimulationSamples> {
    if num_simulations == 0 {
        return Err(PineconeError::invalid(
            "num_simulations",
            "at least one simulation is required",
        ));
    }
    params.validate()?;

    let basis = ValueBasis::from_acreage(acreage);
    let factor = basis.factor();

    let mut values = Array1::zeros(num_simulations);
    let mut component_sum = TevComponents::default();

    for value in values.iter_mut() {
        let components = evaluate(params, rng)?;
        component_sum += components;
        *value = components.total() * factor;
    }

    debug!(
        zone = zone_id,
        draws = num_simulations,
        ?basis,
        "Completed Monte Carlo draws"
    );

    Ok(SimulationSamples {
        values,
        basis,
        component_means: component_sum.scale(factor / num_simulations as FloatValue),
    })
}

/// Simulation output for one zone.
///
/// Results are immutable: rerunning a zone produces a new result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    zone: String,
    method: String,
    class: ZoneClass,
    samples: SimulationSamples,
    summary: SummaryStatistics,
}

impl SimulationResult {
    pub fn new(
        zone: impl Into<String>,
        method: impl Into<String>,
        class: ZoneClass,
        samples: SimulationSamples,
    ) -> PineconeResult<Self> {
        let summary = summarize(samples.values.view())?;
        Ok(Self {
            zone: zone.into(),
            method: method.into(),
            class,
            samples,
            summary,
        })
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    /// Biomass product the timber volume was derived from.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn class(&self) -> ZoneClass {
        self.class
    }

    pub fn basis(&self) -> ValueBasis {
        self.samples.basis
    }

    pub fn samples(&self) -> &Array1<FloatValue> {
        &self.samples.values
    }

    pub fn component_means(&self) -> &TevComponents {
        &self.samples.component_means
    }

    pub fn summary(&self) -> &SummaryStatistics {
        &self.summary
    }

    pub fn num_simulations(&self) -> usize {
        self.samples.len()
    }
}
