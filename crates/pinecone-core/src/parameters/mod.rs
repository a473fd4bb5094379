//! Economic parameters
//!
//! This module contains the parameter structures consumed by the TEV Model,
//! the per-zone override structure, and the zone-class default tables that
//! fill in anything not measured or overridden.

mod economic;
mod zone_class;

pub use economic::{EconomicParameterSet, ParameterOverrides, MAX_LEASE_HORIZON};
pub use zone_class::{ClassDefaults, ZoneClass, ZoneClassTable, NAMING_RULES, SPECIES_WTP_BASE};
