//! Parameter Resolver
//!
//! Merges measured biophysical inputs with user overrides and zone-class
//! defaults into one [`EconomicParameterSet`] per zone.

use crate::errors::{InputKind, PineconeError, PineconeResult, ZoneWarning};
use crate::measurement::{Measurement, WaterYieldRecord, WATER_YIELD_FALLBACK};
use crate::parameters::{EconomicParameterSet, ParameterOverrides, ZoneClass, ZoneClassTable};
use crate::stochastic::StochasticValue;
use crate::FloatValue;
use tracing::{debug, warn};

/// The outcome of resolving one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub params: EconomicParameterSet,
    /// Class whose defaults filled the non-measured fields.
    pub class: ZoneClass,
    pub warnings: Vec<ZoneWarning>,
}

/// Resolve the parameter set for `zone_id`.
///
/// * `biomass` becomes the timber volume pair verbatim.
/// * `emissions` is multiplied by `carbon_credit_price` to give the carbon value.
/// * `water` is used if it carries a mean, otherwise [`WATER_YIELD_FALLBACK`].
/// * Everything else comes from `overrides` where set, else from the defaults
///   of the class `classes` assigns to the zone.
///
/// Returns [`PineconeError::MissingInput`] when biomass or emissions are absent.
pub fn resolve(
    zone_id: &str,
    biomass: Option<&Measurement>,
    emissions: Option<&Measurement>,
    water: Option<&WaterYieldRecord>,
    overrides: Option<&ParameterOverrides>,
    classes: &ZoneClassTable,
    carbon_credit_price: FloatValue,
) -> PineconeResult<Resolution> {
    let biomass = biomass.ok_or_else(|| PineconeError::MissingInput {
        zone: zone_id.to_string(),
        input: InputKind::Biomass,
    })?;
    let emissions = emissions.ok_or_else(|| PineconeError::MissingInput {
        zone: zone_id.to_string(),
        input: InputKind::Emissions,
    })?;

    let mut warnings = Vec::new();
    let water_value = resolve_water(zone_id, water, &mut warnings);

    let class = classes.classify(zone_id);
    let defaults = match overrides {
        Some(o) => class.defaults().with_overrides(o),
        None => class.defaults(),
    };
    debug!(
        zone = zone_id,
        class = %class,
        has_overrides = overrides.is_some(),
        "Resolved zone class"
    );

    let params = EconomicParameterSet {
        stumpage_price: defaults.stumpage_price,
        price_shock: defaults.price_shock,
        timber_volume: biomass.as_stochastic(),
        regeneration_cost: defaults.regeneration_cost,
        carbon_value: emissions.as_stochastic().scale(carbon_credit_price),
        water_value,
        species_wtp: defaults.species_wtp,
        lease_revenues: defaults.lease_revenues,
        lease_horizon: defaults.lease_horizon,
        lease_discount_rate: defaults.lease_discount_rate,
    };
    params.validate()?;

    if params.lease_horizon as usize > params.lease_revenues.len() {
        debug!(
            zone = zone_id,
            horizon = params.lease_horizon,
            revenues = params.lease_revenues.len(),
            "Lease horizon exceeds revenue schedule; later years contribute zero"
        );
    }

    Ok(Resolution {
        params,
        class,
        warnings,
    })
}

fn resolve_water(
    zone_id: &str,
    water: Option<&WaterYieldRecord>,
    warnings: &mut Vec<ZoneWarning>,
) -> StochasticValue {
    match water {
        None => {
            debug!(zone = zone_id, "No water-yield data; using default");
            WATER_YIELD_FALLBACK
        }
        Some(record) => match record.to_stochastic() {
            Some(value) => value,
            None => {
                let warning = ZoneWarning::MalformedWaterData {
                    zone: zone_id.to_string(),
                };
                warn!(zone = zone_id, "{}", warning);
                warnings.push(warning);
                WATER_YIELD_FALLBACK
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn biomass() -> Measurement {
        Measurement::new(50.0, 5.0)
    }

    fn emissions() -> Measurement {
        Measurement::new(10.0, 1.0)
    }

    #[test]
    fn test_measurements_flow_through() {
        let resolution = resolve(
            "Severe",
            Some(&biomass()),
            Some(&emissions()),
            None,
            None,
            &ZoneClassTable::new(),
            10.0,
        )
        .unwrap();

        let params = resolution.params;
        assert_eq!(params.timber_volume, StochasticValue::uncertain(50.0, 5.0));
        assert_eq!(params.carbon_value, StochasticValue::uncertain(100.0, 10.0));
        assert_eq!(params.water_value, WATER_YIELD_FALLBACK);
        assert_eq!(resolution.class, ZoneClass::Severe);
        assert!(resolution.warnings.is_empty());
    }

    #[test]
    fn test_missing_biomass() {
        let result = resolve(
            "Severe",
            None,
            Some(&emissions()),
            None,
            None,
            &ZoneClassTable::new(),
            10.0,
        );
        assert!(matches!(
            result,
            Err(PineconeError::MissingInput {
                input: InputKind::Biomass,
                ..
            })
        ));
    }

    #[test]
    fn test_missing_emissions() {
        let result = resolve(
            "Severe",
            Some(&biomass()),
            None,
            None,
            None,
            &ZoneClassTable::new(),
            10.0,
        );
        assert!(matches!(
            result,
            Err(PineconeError::MissingInput {
                input: InputKind::Emissions,
                ..
            })
        ));
    }

    #[test]
    fn test_water_yield_used_when_valid() {
        let water = WaterYieldRecord::new(110.56, Some(2.04));
        let resolution = resolve(
            "Severe",
            Some(&biomass()),
            Some(&emissions()),
            Some(&water),
            None,
            &ZoneClassTable::new(),
            10.0,
        )
        .unwrap();

        assert_eq!(
            resolution.params.water_value,
            StochasticValue::uncertain(110.56, 2.04)
        );
    }

    #[test]
    fn test_malformed_water_yield_warns_and_falls_back() {
        let water = WaterYieldRecord {
            mean: None,
            std: Some(3.0),
        };
        let resolution = resolve(
            "Severe",
            Some(&biomass()),
            Some(&emissions()),
            Some(&water),
            None,
            &ZoneClassTable::new(),
            10.0,
        )
        .unwrap();

        assert_eq!(resolution.params.water_value, WATER_YIELD_FALLBACK);
        assert_eq!(
            resolution.warnings,
            vec![ZoneWarning::MalformedWaterData {
                zone: "Severe".to_string()
            }]
        );
    }

    #[test]
    fn test_overrides_take_precedence() {
        let overrides = ParameterOverrides {
            stumpage_price: Some(StochasticValue::fixed(12.0)),
            lease_discount_rate: Some(StochasticValue::uncertain(0.07, 0.01)),
            ..Default::default()
        };
        let resolution = resolve(
            "Healthy",
            Some(&biomass()),
            Some(&emissions()),
            None,
            Some(&overrides),
            &ZoneClassTable::new(),
            10.0,
        )
        .unwrap();

        let params = resolution.params;
        assert_eq!(params.stumpage_price, StochasticValue::fixed(12.0));
        assert_eq!(
            params.lease_discount_rate,
            StochasticValue::uncertain(0.07, 0.01)
        );
        // Healthy default
        assert_eq!(params.regeneration_cost, StochasticValue::uncertain(50.0, 10.0));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let overrides = ParameterOverrides {
            lease_horizon: Some(0),
            ..Default::default()
        };
        let result = resolve(
            "Severe",
            Some(&biomass()),
            Some(&emissions()),
            None,
            Some(&overrides),
            &ZoneClassTable::new(),
            10.0,
        );
        assert!(matches!(result, Err(PineconeError::InvalidParameter { .. })));
    }

    #[test]
    fn test_class_table_is_consulted() {
        let mut classes = ZoneClassTable::new();
        classes.assign("EIA_CS3_LLP", ZoneClass::Severe);

        let resolution = resolve(
            "EIA_CS3_LLP",
            Some(&biomass()),
            Some(&emissions()),
            None,
            None,
            &classes,
            10.0,
        )
        .unwrap();

        assert_eq!(resolution.class, ZoneClass::Severe);
        assert_eq!(
            resolution.params.stumpage_price,
            StochasticValue::uncertain(7.5, 1.0)
        );
    }
}
