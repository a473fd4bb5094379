//! Economic Parameters
//!
//! The fully resolved parameter set consumed by one TEV evaluation, and the
//! partial overrides a user may supply per zone.
//!
//! Field aliases match the symbols used in the TEV literature and in the
//! case-study parameter tables (`E_Pt`, `g`, `R_t_lease`, ...).

use crate::errors::{PineconeError, PineconeResult};
use crate::stochastic::StochasticValue;
use crate::FloatValue;
use serde::{Deserialize, Serialize};

/// Longest lease horizon accepted, in years.
pub const MAX_LEASE_HORIZON: u32 = 1_000;

/// Complete inputs to a single TEV Model evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicParameterSet {
    /// Expected stumpage price ($/ton), $E[P_t]$.
    #[serde(alias = "E_Pt")]
    pub stumpage_price: StochasticValue,

    /// Deviation of the realised price from its expectation ($/ton), $\epsilon_t$.
    #[serde(alias = "epsilon_t")]
    pub price_shock: StochasticValue,

    /// Merchantable timber volume (tons/acre), $V_t$. Taken from biomass.
    #[serde(alias = "V_t")]
    pub timber_volume: StochasticValue,

    /// Regeneration cost ($/acre), $g$.
    #[serde(alias = "g")]
    pub regeneration_cost: StochasticValue,

    /// Carbon benefit ($/acre). Emissions already multiplied by the credit price.
    #[serde(alias = "pvc_per_acre")]
    pub carbon_value: StochasticValue,

    /// Ecosystem water-yield value ($/acre).
    #[serde(alias = "water_quality_value")]
    pub water_value: StochasticValue,

    /// Willingness-to-pay for endangered species protection ($/acre).
    #[serde(alias = "WTP", alias = "endangered_species_WTP")]
    pub species_wtp: StochasticValue,

    /// Annual lease revenue for years 1, 2, ... ($/acre), $R_t$.
    #[serde(alias = "R_t_lease")]
    pub lease_revenues: Vec<FloatValue>,

    /// Number of lease years discounted, $T$.
    #[serde(alias = "T_lease")]
    pub lease_horizon: u32,

    /// Lease discount rate, $r$.
    #[serde(alias = "r_lease")]
    pub lease_discount_rate: StochasticValue,
}

impl EconomicParameterSet {
    /// Stochastic fields paired with their names, in sampling order.
    pub fn stochastic_fields(&self) -> [(&'static str, &StochasticValue); 8] {
        [
            ("stumpage_price", &self.stumpage_price),
            ("price_shock", &self.price_shock),
            ("timber_volume", &self.timber_volume),
            ("regeneration_cost", &self.regeneration_cost),
            ("carbon_value", &self.carbon_value),
            ("water_value", &self.water_value),
            ("species_wtp", &self.species_wtp),
            ("lease_discount_rate", &self.lease_discount_rate),
        ]
    }

    /// Check the invariants required before the set enters the TEV Model.
    pub fn validate(&self) -> PineconeResult<()> {
        for (name, value) in self.stochastic_fields() {
            value.validate(name)?;
        }

        if self.lease_horizon == 0 {
            return Err(PineconeError::invalid(
                "lease_horizon",
                "must be a positive number of years",
            ));
        }
        if self.lease_horizon > MAX_LEASE_HORIZON {
            return Err(PineconeError::invalid(
                "lease_horizon",
                format!(
                    "{} years exceeds the maximum of {}",
                    self.lease_horizon, MAX_LEASE_HORIZON
                ),
            ));
        }

        if let Some(bad) = self.lease_revenues.iter().find(|r| !r.is_finite()) {
            return Err(PineconeError::invalid(
                "lease_revenues",
                format!("revenues must be finite, got {}", bad),
            ));
        }

        Ok(())
    }

    /// Lease revenue in year `t` (1-indexed), zero past the supplied schedule.
    pub fn lease_revenue(&self, t: u32) -> FloatValue {
        t.checked_sub(1)
            .and_then(|i| self.lease_revenues.get(i as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Present value of the lease schedule at a given discount rate.
    ///
    /// $$L = \sum_{t=1}^{T} \frac{R_t}{(1 + r)^t}$$
    pub fn lease_present_value(&self, discount_rate: FloatValue) -> FloatValue {
        let growth = 1.0 + discount_rate;
        (1..=self.lease_horizon)
            .map(|t| self.lease_revenue(t) / growth.powi(t as i32))
            .sum()
    }

    /// TEV per acre when every stochastic field is at its mean.
    ///
    /// This equals the expected TEV when the discount rate is fixed, since
    /// every other term is linear in independent parameters.
    pub fn expected_value_at_means(&self) -> FloatValue {
        let timber = (self.stumpage_price.mean() + self.price_shock.mean())
            * self.timber_volume.mean()
            - self.regeneration_cost.mean();
        let ecosystem = self.water_value.mean() + self.species_wtp.mean();

        timber
            + self.carbon_value.mean()
            + ecosystem
            + self.lease_present_value(self.lease_discount_rate.mean())
    }
}

/// Per-zone user overrides.
///
/// Every field is optional; missing fields are taken from the zone-class
/// defaults. Biophysical fields (timber volume, carbon, water) are not
/// overridable because they come from measurements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParameterOverrides {
    #[serde(alias = "E_Pt", skip_serializing_if = "Option::is_none")]
    pub stumpage_price: Option<StochasticValue>,

    #[serde(alias = "epsilon_t", skip_serializing_if = "Option::is_none")]
    pub price_shock: Option<StochasticValue>,

    #[serde(alias = "g", skip_serializing_if = "Option::is_none")]
    pub regeneration_cost: Option<StochasticValue>,

    #[serde(
        alias = "WTP",
        alias = "endangered_species_WTP",
        skip_serializing_if = "Option::is_none"
    )]
    pub species_wtp: Option<StochasticValue>,

    #[serde(alias = "R_t_lease", skip_serializing_if = "Option::is_none")]
    pub lease_revenues: Option<Vec<FloatValue>>,

    #[serde(alias = "T_lease", skip_serializing_if = "Option::is_none")]
    pub lease_horizon: Option<u32>,

    #[serde(alias = "r_lease", skip_serializing_if = "Option::is_none")]
    pub lease_discount_rate: Option<StochasticValue>,
}
