//! Per-zone biophysical measurements supplied by the remote-sensing pipeline.
//!
//! The pipeline reduces rasters over each management zone and reports a mean
//! and standard deviation per acre. Field names follow the pipeline's output
//! keys as aliases so its JSON can be read directly.

use crate::errors::{PineconeError, PineconeResult};
use crate::stochastic::StochasticValue;
use crate::FloatValue;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;
use tracing::debug;

/// Biomass product label used when a measurement does not name one.
pub const DEFAULT_METHOD: &str = "ESA";

/// Relative spread assumed for water yield when only a mean is reported.
pub const WATER_YIELD_DEFAULT_RELATIVE_STD: FloatValue = 0.1;

/// Placeholder water-yield value (USD/acre) used when no usable entry exists.
pub const WATER_YIELD_FALLBACK: StochasticValue = StochasticValue::Uncertain {
    mean: 100.0,
    std: 2.0,
};

/// A per-acre mean with its uncertainty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    #[serde(alias = "AGB_per_acre_tons", alias = "CO2_mean_tons_per_acre")]
    pub mean: FloatValue,

    /// default: 0.0
    #[serde(
        default,
        alias = "AGB_StdDev_per_acre_tons",
        alias = "CO2_std_tons_per_acre"
    )]
    pub std: FloatValue,

    /// Name of the product the measurement was derived from (e.g. "ESA").
    #[serde(default, alias = "Method", skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
}

impl Measurement {
    pub fn new(mean: FloatValue, std: FloatValue) -> Self {
        Self {
            mean,
            std,
            method: None,
        }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn as_stochastic(&self) -> StochasticValue {
        StochasticValue::uncertain(self.mean, self.std)
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or(DEFAULT_METHOD)
    }
}

/// A water-yield entry as reported by the pipeline.
///
/// Both fields are optional on the wire: an entry without a mean is
/// malformed and is replaced by [`WATER_YIELD_FALLBACK`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaterYieldRecord {
    #[serde(alias = "water_yield_per_acre_usd")]
    pub mean: Option<FloatValue>,

    #[serde(alias = "water_yield_std_per_acre_usd")]
    pub std: Option<FloatValue>,
}

impl WaterYieldRecord {
    pub fn new(mean: FloatValue, std: Option<FloatValue>) -> Self {
        Self {
            mean: Some(mean),
            std,
        }
    }

    /// Convert to a stochastic value, or `None` if the entry has no usable mean.
    pub fn to_stochastic(&self) -> Option<StochasticValue> {
        let mean = self.mean.filter(|m| m.is_finite())?;
        let std = self
            .std
            .unwrap_or(mean.abs() * WATER_YIELD_DEFAULT_RELATIVE_STD);
        Some(StochasticValue::uncertain(mean, std))
    }
}

/// All externally supplied per-zone tables for one analysis.
///
/// Tables are keyed by zone id and keep insertion order, which fixes the
/// order zones are simulated in.
///
/// Entries are parsed one zone at a time. A biomass or emissions entry that
/// cannot be read is kept as `None` so the zone fails on its own with a
/// missing-input error. An unreadable acreage is likewise `None` and the zone
/// is treated as having no acreage. An unreadable water-yield entry becomes
/// an empty record and takes the fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ZoneInputs {
    #[serde(deserialize_with = "lenient_entries")]
    pub biomass: IndexMap<String, Option<Measurement>>,
    #[serde(deserialize_with = "lenient_entries")]
    pub emissions: IndexMap<String, Option<Measurement>>,
    #[serde(deserialize_with = "lenient_water_entries")]
    pub water_yield: IndexMap<String, WaterYieldRecord>,
    #[serde(deserialize_with = "lenient_entries")]
    pub acreage: IndexMap<String, Option<FloatValue>>,
}

fn parse_entry<T: DeserializeOwned>(zone: &str, value: serde_json::Value) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(entry) => Some(entry),
        Err(e) => {
            debug!(zone, error = %e, "Unreadable zone entry");
            None
        }
    }
}

fn lenient_entries<'de, D, T>(deserializer: D) -> Result<IndexMap<String, Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(zone, value)| {
            let entry: Option<T> = parse_entry(&zone, value);
            (zone, entry)
        })
        .collect())
}

fn lenient_water_entries<'de, D>(
    deserializer: D,
) -> Result<IndexMap<String, WaterYieldRecord>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = IndexMap::<String, serde_json::Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(zone, value)| {
            let record: WaterYieldRecord = parse_entry(&zone, value).unwrap_or_default();
            (zone, record)
        })
        .collect())
}

impl ZoneInputs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json_str(content: &str) -> PineconeResult<Self> {
        serde_json::from_str(content)
            .map_err(|e| PineconeError::Config(format!("Failed to parse zone inputs: {}", e)))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> PineconeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn with_biomass(mut self, zone: &str, measurement: Measurement) -> Self {
        self.biomass.insert(zone.to_string(), Some(measurement));
        self
    }

    pub fn with_emissions(mut self, zone: &str, measurement: Measurement) -> Self {
        self.emissions.insert(zone.to_string(), Some(measurement));
        self
    }

    pub fn with_water_yield(mut self, zone: &str, record: WaterYieldRecord) -> Self {
        self.water_yield.insert(zone.to_string(), record);
        self
    }

    pub fn with_acreage(mut self, zone: &str, acres: FloatValue) -> Self {
        self.acreage.insert(zone.to_string(), Some(acres));
        self
    }

    /// Zone ids in simulation order.
    ///
    /// Biomass zones come first in their insertion order, followed by any
    /// zones that only appear in the emissions table.
    pub fn zone_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.biomass.keys().map(String::as_str).collect();
        for zone in self.emissions.keys() {
            if !self.biomass.contains_key(zone) {
                ids.push(zone.as_str());
            }
        }
        ids
    }

    /// Biomass for `zone`, `None` if absent or unreadable.
    pub fn biomass(&self, zone: &str) -> Option<&Measurement> {
        self.biomass.get(zone).and_then(Option::as_ref)
    }

    pub fn emissions(&self, zone: &str) -> Option<&Measurement> {
        self.emissions.get(zone).and_then(Option::as_ref)
    }

    pub fn water_yield(&self, zone: &str) -> Option<&WaterYieldRecord> {
        self.water_yield.get(zone)
    }

    /// Acreage for `zone`, `None` if absent or unreadable.
    pub fn acreage(&self, zone: &str) -> Option<FloatValue> {
        self.acreage.get(zone).copied().flatten()
    }
}
