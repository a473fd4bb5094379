//! Monte Carlo Total Economic Value (TEV) engine for prescribed-fire management
//!
//! This crate estimates the economic value of forest management zones by
//! combining remotely-sensed biophysical measurements with stochastic
//! economic parameters.
//!
//! # Module Organisation
//!
//! - `stochastic`: fixed or normally distributed parameters and the sampler
//! - `measurement`: per-zone biomass, emissions, water-yield and acreage tables
//! - `parameters`: resolved parameter sets, user overrides and zone-class defaults
//! - `resolver`: merges measurements, overrides and defaults per zone
//! - `tev`: the four-component TEV Model for one draw
//! - `simulation`: repeated draws per zone and the per-zone result
//! - `summary`: descriptive statistics over draws
//! - `analysis`: runs all zones with one seeded generator and reports
//! - `config`: analysis settings read from TOML
//!
//! # Example
//!
//! ```
//! use pinecone_core::analysis::Analysis;
//! use pinecone_core::config::AnalysisConfig;
//! use pinecone_core::measurement::{Measurement, ZoneInputs};
//!
//! let inputs = ZoneInputs::new()
//!     .with_biomass("Severe", Measurement::new(50.0, 5.0))
//!     .with_emissions("Severe", Measurement::new(10.0, 1.0))
//!     .with_acreage("Severe", 651.06);
//!
//! let analysis = Analysis::new(AnalysisConfig::default().with_num_simulations(100)).unwrap();
//! let report = analysis.run(&inputs);
//!
//! assert_eq!(report.rows()[0].case, "Severe");
//! ```

pub mod analysis;
pub mod config;
pub mod errors;
pub mod measurement;
pub mod parameters;
pub mod resolver;
pub mod simulation;
pub mod stochastic;
pub mod summary;
pub mod tev;

/// Floating point type used for all monetary and physical quantities.
pub type FloatValue = f64;
