//! Analysis runs across zones.
//!
//! An [`Analysis`] resolves, simulates and summarises every zone in a
//! [`ZoneInputs`] with one seeded generator. Zones are processed in the order
//! given by [`ZoneInputs::zone_ids`], so the same inputs and seed always give
//! the same report.
//!
//! Problems with a single zone never stop the run; the zone is recorded in
//! [`AnalysisReport::skipped`] and the remaining zones proceed.

use crate::config::{AnalysisConfig, BasisMode};
use crate::errors::{PineconeError, PineconeResult, ZoneWarning};
use crate::measurement::ZoneInputs;
use crate::resolver::resolve;
use crate::simulation::{run, SimulationResult, ValueBasis};
use crate::FloatValue;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Why a zone has no simulation result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingInput { input: String },
    InvalidAcreage { acreage: Option<FloatValue> },
    InvalidParameter { name: String, reason: String },
    Failed { message: String },
}

impl From<PineconeError> for SkipReason {
    fn from(error: PineconeError) -> Self {
        match error {
            PineconeError::MissingInput { input, .. } => SkipReason::MissingInput {
                input: input.to_string(),
            },
            PineconeError::InvalidParameter { name, reason } => {
                SkipReason::InvalidParameter { name, reason }
            }
            other => SkipReason::Failed {
                message: other.to_string(),
            },
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::MissingInput { input } => write!(f, "missing {} measurements", input),
            SkipReason::InvalidAcreage { acreage: Some(a) } => {
                write!(f, "invalid acreage {}", a)
            }
            SkipReason::InvalidAcreage { acreage: None } => write!(f, "no acreage"),
            SkipReason::InvalidParameter { name, reason } => {
                write!(f, "invalid parameter {}: {}", name, reason)
            }
            SkipReason::Failed { message } => write!(f, "{}", message),
        }
    }
}

/// A zone that produced no result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedZone {
    pub zone: String,
    pub reason: SkipReason,
}

/// One row of the summary table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRow {
    #[serde(rename = "Case")]
    pub case: String,
    #[serde(rename = "Method")]
    pub method: String,
    /// `None` for per-acre results.
    #[serde(rename = "Acres")]
    pub acres: Option<FloatValue>,
    #[serde(rename = "Mean_TEV")]
    pub mean_tev: FloatValue,
    #[serde(rename = "Std_TEV")]
    pub std_tev: FloatValue,
    #[serde(rename = "Median_TEV")]
    pub median_tev: FloatValue,
    #[serde(rename = "Q25_TEV")]
    pub q25_tev: FloatValue,
    #[serde(rename = "Q75_TEV")]
    pub q75_tev: FloatValue,
    #[serde(rename = "Min_TEV")]
    pub min_tev: FloatValue,
    #[serde(rename = "Max_TEV")]
    pub max_tev: FloatValue,
}

impl From<&SimulationResult> for SummaryRow {
    fn from(result: &SimulationResult) -> Self {
        let stats = result.summary();
        Self {
            case: result.zone().to_string(),
            method: result.method().to_string(),
            acres: result.basis().acres(),
            mean_tev: stats.mean,
            std_tev: stats.std,
            median_tev: stats.median,
            q25_tev: stats.q25,
            q75_tev: stats.q75,
            min_tev: stats.min,
            max_tev: stats.max,
        }
    }
}

/// Difference between two zone results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    pub baseline: String,
    pub alternative: String,
    /// Mean TEV of the alternative minus mean TEV of the baseline.
    pub mean_difference: FloatValue,
    pub median_difference: FloatValue,
}

/// The outcome of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    seed: u64,
    num_simulations: usize,
    results: Vec<SimulationResult>,
    skipped: Vec<SkippedZone>,
    warnings: Vec<ZoneWarning>,
}

impl AnalysisReport {
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn num_simulations(&self) -> usize {
        self.num_simulations
    }

    /// Results for every zone that was simulated, in simulation order.
    pub fn results(&self) -> &[SimulationResult] {
        &self.results
    }

    pub fn skipped(&self) -> &[SkippedZone] {
        &self.skipped
    }

    pub fn warnings(&self) -> &[ZoneWarning] {
        &self.warnings
    }

    pub fn result(&self, zone: &str) -> PineconeResult<&SimulationResult> {
        self.results
            .iter()
            .find(|r| r.zone() == zone)
            .ok_or_else(|| PineconeError::UnknownZone(zone.to_string()))
    }

    pub fn rows(&self) -> Vec<SummaryRow> {
        self.results.iter().map(SummaryRow::from).collect()
    }

    /// Sum of mean TEV over all zones reported as totals.
    pub fn total_mean_tev(&self) -> FloatValue {
        self.results
            .iter()
            .filter(|r| matches!(r.basis(), ValueBasis::ZoneTotal { .. }))
            .map(|r| r.summary().mean)
            .sum()
    }

    /// Compare two zones reported on the same kind of basis.
    pub fn compare(&self, baseline: &str, alternative: &str) -> PineconeResult<ScenarioComparison> {
        let base = self.result(baseline)?;
        let alt = self.result(alternative)?;

        if base.basis().acres().is_some() != alt.basis().acres().is_some() {
            return Err(PineconeError::invalid(
                "basis",
                format!(
                    "cannot compare {} and {}: one is per acre and the other a zone total",
                    baseline, alternative
                ),
            ));
        }

        Ok(ScenarioComparison {
            baseline: baseline.to_string(),
            alternative: alternative.to_string(),
            mean_difference: alt.summary().mean - base.summary().mean,
            median_difference: alt.summary().median - base.summary().median,
        })
    }
}

/// A configured Monte Carlo analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    config: AnalysisConfig,
}

impl Analysis {
    pub fn new(config: AnalysisConfig) -> PineconeResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run every zone with a generator seeded from the configuration.
    pub fn run(&self, inputs: &ZoneInputs) -> AnalysisReport {
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.run_with_rng(inputs, &mut rng)
    }

    /// Run every zone drawing from `rng`.
    pub fn run_with_rng<R: Rng + ?Sized>(&self, inputs: &ZoneInputs, rng: &mut R) -> AnalysisReport {
        let zones = inputs.zone_ids();
        info!(
            zones = zones.len(),
            num_simulations = self.config.num_simulations,
            seed = self.config.seed,
            "Starting TEV analysis"
        );
        self.warn_unmatched_config(&zones);

        let mut results = Vec::new();
        let mut skipped = Vec::new();
        let mut warnings = Vec::new();

        for zone in zones {
            match self.run_zone(zone, inputs, rng, &mut warnings) {
                Ok(result) => results.push(result),
                Err(reason) => {
                    warn!(zone, reason = %reason, "Skipping zone");
                    skipped.push(SkippedZone {
                        zone: zone.to_string(),
                        reason,
                    });
                }
            }
        }

        info!(
            succeeded = results.len(),
            skipped = skipped.len(),
            "Finished TEV analysis"
        );

        AnalysisReport {
            seed: self.config.seed,
            num_simulations: self.config.num_simulations,
            results,
            skipped,
            warnings,
        }
    }

    /// Log configured overrides and class assignments naming no input zone.
    fn warn_unmatched_config(&self, zones: &[&str]) {
        let overridden = self.config.overrides.keys().map(String::as_str);
        for zone in overridden.filter(|z| !zones.contains(z)) {
            warn!(zone, "Overrides given for a zone that is not in the inputs");
        }
        let assigned = self.config.zone_classes.assigned_zones();
        for zone in assigned.filter(|z| !zones.contains(z)) {
            warn!(zone, "Zone class assigned to a zone that is not in the inputs");
        }
    }

    fn run_zone<R: Rng + ?Sized>(
        &self,
        zone: &str,
        inputs: &ZoneInputs,
        rng: &mut R,
        warnings: &mut Vec<ZoneWarning>,
    ) -> Result<SimulationResult, SkipReason> {
        let biomass = inputs.biomass(zone);
        let resolution = resolve(
            zone,
            biomass,
            inputs.emissions(zone),
            inputs.water_yield(zone),
            self.config.overrides.get(zone),
            &self.config.zone_classes,
            self.config.carbon_credit_price,
        )?;
        warnings.extend(resolution.warnings);

        let acreage = match self.config.basis {
            BasisMode::PerAcre => None,
            BasisMode::Totals => {
                let acreage = inputs.acreage(zone);
                if !matches!(ValueBasis::from_acreage(acreage), ValueBasis::ZoneTotal { .. }) {
                    let warning = ZoneWarning::InvalidAcreage {
                        zone: zone.to_string(),
                        acreage,
                    };
                    warn!(zone, "{}", warning);
                    warnings.push(warning);
                    return Err(SkipReason::InvalidAcreage { acreage });
                }
                acreage
            }
        };

        debug!(zone, class = %resolution.class, "Running zone");
        let samples = run(
            zone,
            &resolution.params,
            acreage,
            self.config.num_simulations,
            rng,
        )?;

        let method = biomass.map(|b| b.method()).unwrap_or_default();
        let result = SimulationResult::new(zone, method, resolution.class, samples)?;
        Ok(result)
    }
}
