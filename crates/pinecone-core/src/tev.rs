//! TEV Model
//!
//! Evaluates the Total Economic Value of one zone for a single Monte Carlo
//! draw. TEV is the sum of four per-acre components:
//!
//! $$TEV = \underbrace{(E[P_t] + \epsilon_t) V_t - g}_{\text{timber}}
//!       + \underbrace{PVC}_{\text{carbon}}
//!       + \underbrace{W + WTP}_{\text{ecosystem}}
//!       + \underbrace{\sum_{t=1}^{T} \frac{R_t}{(1 + r)^t}}_{\text{lease}}$$
//!
//! Each stochastic field is sampled once per evaluation. Draws are never
//! shared between components, and the discount rate is held fixed across all
//! lease years of an evaluation.

use crate::errors::{PineconeError, PineconeResult};
use crate::parameters::EconomicParameterSet;
use crate::FloatValue;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Per-acre value of each TEV component for one draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TevComponents {
    /// Timber value (PV).
    pub timber: FloatValue,
    /// Carbon benefit (PVC).
    pub carbon: FloatValue,
    /// Ecosystem services (PE).
    pub ecosystem: FloatValue,
    /// Land value from hunting leases (L).
    pub lease: FloatValue,
}

impl TevComponents {
    pub fn total(&self) -> FloatValue {
        self.timber + self.carbon + self.ecosystem + self.lease
    }

    pub fn scale(&self, factor: FloatValue) -> Self {
        Self {
            timber: self.timber * factor,
            carbon: self.carbon * factor,
            ecosystem: self.ecosystem * factor,
            lease: self.lease * factor,
        }
    }

    fn check_finite(&self) -> PineconeResult<()> {
        let named = [
            ("timber", self.timber),
            ("carbon", self.carbon),
            ("ecosystem", self.ecosystem),
            ("lease", self.lease),
        ];
        match named.iter().find(|(_, v)| !v.is_finite()) {
            Some((name, value)) => Err(PineconeError::invalid(
                *name,
                format!("component evaluated to a non-finite value ({})", value),
            )),
            None => Ok(()),
        }
    }
}

impl Add for TevComponents {
    type Output = TevComponents;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            timber: self.timber + rhs.timber,
            carbon: self.carbon + rhs.carbon,
            ecosystem: self.ecosystem + rhs.ecosystem,
            lease: self.lease + rhs.lease,
        }
    }
}

impl AddAssign for TevComponents {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

/// Evaluate the TEV components for one draw.
///
/// Fields are sampled in a fixed order (stumpage price, price shock, timber
/// volume, regeneration cost, carbon value, water value, species WTP,
/// discount rate) so that a seeded generator reproduces the same sequence.
pub fn evaluate<R: Rng + ?Sized>(
    params: &EconomicParameterSet,
    rng: &mut R,
) -> PineconeResult<TevComponents> {
    // 1. Timber value
    let stumpage_price = params.stumpage_price.sample("stumpage_price", rng)?;
    let price_shock = params.price_shock.sample("price_shock", rng)?;
    let timber_volume = params.timber_volume.sample("timber_volume", rng)?;
    let regeneration_cost = params.regeneration_cost.sample("regeneration_cost", rng)?;
    let timber = (stumpage_price + price_shock) * timber_volume - regeneration_cost;

    // 2. Carbon benefits
    let carbon = params.carbon_value.sample("carbon_value", rng)?;

    // 3. Ecosystem services
    let water = params.water_value.sample("water_value", rng)?;
    let species = params.species_wtp.sample("species_wtp", rng)?;
    let ecosystem = water + species;

    // 4. Land value for leases
    let discount_rate = params
        .lease_discount_rate
        .sample("lease_discount_rate", rng)?;
    if discount_rate <= -1.0 {
        return Err(PineconeError::invalid(
            "lease_discount_rate",
            format!("drew {}, rates at or below -1 cannot discount", discount_rate),
        ));
    }
    let lease = params.lease_present_value(discount_rate);

    let components = TevComponents {
        timber,
        carbon,
        ecosystem,
        lease,
    };
    components.check_finite()?;
    Ok(components)
}

/// Evaluate the total per-acre TEV for one draw.
pub fn evaluate_total<R: Rng + ?Sized>(
    params: &EconomicParameterSet,
    rng: &mut R,
) -> PineconeResult<FloatValue> {
    evaluate(params, rng).map(|c| c.total())
}
