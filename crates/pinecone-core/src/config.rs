//! Analysis configuration
//!
//! Settings for one Monte Carlo analysis run, read from TOML.
//!
//! ```toml
//! seed = 42
//! num_simulations = 10000
//! carbon_credit_price = 10.0
//! basis = "totals"
//!
//! [zone_classes]
//! EIA_CS1_LLP = "severe"
//!
//! [overrides.EIA_CS1_LLP]
//! E_Pt = { mean = 7.5, std = 1.0 }
//! R_t_lease = [50, 20, 0, 0, 0]
//! T_lease = 5
//! ```

use crate::errors::{PineconeError, PineconeResult};
use crate::parameters::{ParameterOverrides, ZoneClassTable};
use crate::FloatValue;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Whether the analysis reports zone totals or per-acre values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasisMode {
    /// Scale each zone by its acreage; zones without a valid acreage are skipped.
    #[default]
    Totals,
    /// Report per-acre values for every zone regardless of acreage.
    PerAcre,
}

/// Configuration of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Seed for the analysis random generator.
    /// default: 42
    pub seed: u64,

    /// Monte Carlo draws per zone.
    /// default: 10000
    pub num_simulations: usize,

    /// Price of one ton of CO2-equivalent ($/ton).
    /// default: 10.0
    pub carbon_credit_price: FloatValue,

    /// default: totals
    pub basis: BasisMode,

    /// Explicit zone class assignments.
    pub zone_classes: ZoneClassTable,

    /// Per-zone parameter overrides.
    pub overrides: IndexMap<String, ParameterOverrides>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            num_simulations: 10_000,
            carbon_credit_price: 10.0,
            basis: BasisMode::Totals,
            zone_classes: ZoneClassTable::default(),
            overrides: IndexMap::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> PineconeResult<Self> {
        let config: AnalysisConfig = toml::from_str(content)
            .map_err(|e| PineconeError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> PineconeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> PineconeResult<()> {
        if self.num_simulations == 0 {
            return Err(PineconeError::invalid(
                "num_simulations",
                "at least one simulation is required",
            ));
        }
        if !self.carbon_credit_price.is_finite() {
            return Err(PineconeError::invalid(
                "carbon_credit_price",
                format!("must be finite, got {}", self.carbon_credit_price),
            ));
        }
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    pub fn with_override(mut self, zone: &str, overrides: ParameterOverrides) -> Self {
        self.overrides.insert(zone.to_string(), overrides);
        self
    }
}
