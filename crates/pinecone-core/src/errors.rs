use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The biophysical input a zone was expected to supply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Biomass,
    Emissions,
}

impl std::fmt::Display for InputKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputKind::Biomass => write!(f, "biomass"),
            InputKind::Emissions => write!(f, "emissions"),
        }
    }
}

/// Error type for invalid operations.
#[derive(Error, Debug)]
pub enum PineconeError {
    #[error("Zone {zone} is missing required {input} measurements")]
    MissingInput { zone: String, input: InputKind },
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },
    #[error("No simulation result for zone {0}")]
    UnknownZone(String),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PineconeError {
    pub(crate) fn invalid(name: impl Into<String>, reason: impl Into<String>) -> Self {
        PineconeError::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Convenience type for `Result<T, PineconeError>`.
pub type PineconeResult<T> = Result<T, PineconeError>;

/// Non-fatal problems found while processing a zone.
///
/// Warnings never abort the analysis. They are logged when raised and kept on
/// the report so the caller can see which fallbacks were taken.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneWarning {
    /// Acreage is zero, negative or absent; the zone cannot contribute totals.
    InvalidAcreage { zone: String, acreage: Option<f64> },
    /// A water-yield entry exists but has no per-acre mean; the fallback was used.
    MalformedWaterData { zone: String },
}

impl ZoneWarning {
    pub fn zone(&self) -> &str {
        match self {
            ZoneWarning::InvalidAcreage { zone, .. } => zone,
            ZoneWarning::MalformedWaterData { zone } => zone,
        }
    }
}

impl std::fmt::Display for ZoneWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneWarning::InvalidAcreage {
                zone,
                acreage: Some(acres),
            } => write!(f, "Zone {} has invalid acreage {}", zone, acres),
            ZoneWarning::InvalidAcreage {
                zone,
                acreage: None,
            } => write!(f, "Zone {} has no acreage", zone),
            ZoneWarning::MalformedWaterData { zone } => write!(
                f,
                "Zone {} has a water-yield entry without a per-acre mean; using the default",
                zone
            ),
        }
    }
}
