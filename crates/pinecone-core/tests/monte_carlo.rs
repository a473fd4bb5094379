//! Statistical and end-to-end tests for the TEV engine.
//!
//! These tests check the laws the Monte Carlo engine must satisfy:
//! - determinism under zero variance and under a fixed seed
//! - convergence of the sample mean onto the analytic expectation
//! - the acreage scaling law and the water-yield fallback law

use approx::assert_relative_eq;
use pinecone_core::analysis::Analysis;
use pinecone_core::config::{AnalysisConfig, BasisMode};
use pinecone_core::measurement::{Measurement, WaterYieldRecord, ZoneInputs};
use pinecone_core::parameters::{EconomicParameterSet, ParameterOverrides};
use pinecone_core::simulation::{run, ValueBasis};
use pinecone_core::stochastic::StochasticValue;
use pinecone_core::summary::summarize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const SEVERE_ACRES: f64 = 651.06;

fn severe_overrides() -> ParameterOverrides {
    ParameterOverrides {
        stumpage_price: Some(StochasticValue::uncertain(7.5, 1.0)),
        regeneration_cost: Some(StochasticValue::uncertain(375.0, 50.0)),
        species_wtp: Some(StochasticValue::uncertain(1.3, 1.0)),
        lease_revenues: Some(vec![50.0, 20.0, 0.0, 0.0, 0.0]),
        lease_horizon: Some(5),
        lease_discount_rate: Some(StochasticValue::uncertain(0.06, 0.0)),
        ..Default::default()
    }
}

fn severe_inputs() -> ZoneInputs {
    ZoneInputs::new()
        .with_biomass("Severe", Measurement::new(50.0, 5.0))
        .with_emissions("Severe", Measurement::new(10.0, 1.0))
        .with_acreage("Severe", SEVERE_ACRES)
}

fn severe_config(num_simulations: usize) -> AnalysisConfig {
    AnalysisConfig::default()
        .with_seed(42)
        .with_num_simulations(num_simulations)
        .with_override("Severe", severe_overrides())
}

mod end_to_end {
    use super::*;

    /// Expected per-acre TEV for the Severe scenario.
    ///
    /// timber:    E[(P + eps) V] - E[g] = 7.5 * 50 - 375 = 0
    /// carbon:    10 tons * $10 = 100
    /// ecosystem: 100 (water fallback) + 1.3 = 101.3
    /// lease:     50 / 1.06 + 20 / 1.06^2 ~= 64.97
    fn expected_per_acre() -> f64 {
        0.0 + 100.0 + 101.3 + 50.0 / 1.06 + 20.0 / 1.06_f64.powi(2)
    }

    /// Analytic standard deviation of the per-acre TEV.
    ///
    /// Var(PV) = sP^2 sV^2 + sP^2 mV^2 + sV^2 mP^2 = 1*25 + 1*2500 + 25*56.25
    /// plus Var(g) = 2500, Var(carbon) = 100, Var(water) = 4, Var(WTP) = 1.
    fn expected_std_per_acre() -> f64 {
        (25.0 + 2500.0 + 1406.25 + 2500.0 + 100.0 + 4.0 + 1.0_f64).sqrt()
    }

    #[test]
    fn test_severe_scenario() {
        let n = 10_000;
        let report = Analysis::new(severe_config(n)).unwrap().run(&severe_inputs());

        assert!(report.skipped().is_empty());
        let result = report.result("Severe").unwrap();
        assert_eq!(result.num_simulations(), n);
        assert_eq!(result.basis(), ValueBasis::ZoneTotal { acres: SEVERE_ACRES });

        let stats = result.summary();
        let expected = expected_per_acre() * SEVERE_ACRES;

        // Within four standard errors of the analytic mean (~$2,100)
        let tolerance = 4.0 * stats.standard_error(n);
        assert!(
            (stats.mean - expected).abs() < tolerance,
            "mean {} differs from expected {} by more than {}",
            stats.mean,
            expected,
            tolerance
        );
        assert_relative_eq!(
            stats.std,
            expected_std_per_acre() * SEVERE_ACRES,
            max_relative = 0.05
        );
        assert!(stats.min <= stats.q25 && stats.q25 <= stats.median);
        assert!(stats.median <= stats.q75 && stats.q75 <= stats.max);
    }

    #[test]
    fn test_severe_row() {
        let report = Analysis::new(severe_config(10_000))
            .unwrap()
            .run(&severe_inputs());
        let rows = report.rows();
        assert_eq!(rows.len(), 1);

        let row = serde_json::to_value(&rows[0]).unwrap();
        assert_eq!(row["Case"], "Severe");
        assert_eq!(row["Acres"], 651.06);
        for key in [
            "Mean_TEV",
            "Std_TEV",
            "Median_TEV",
            "Q25_TEV",
            "Q75_TEV",
            "Min_TEV",
            "Max_TEV",
        ] {
            let value = row[key].as_f64().unwrap_or(f64::NAN);
            assert!(value.is_finite(), "{} is not finite: {}", key, row[key]);
        }
    }

    #[test]
    fn test_reproducible_across_runs() {
        let first = Analysis::new(severe_config(1_000))
            .unwrap()
            .run(&severe_inputs());
        let second = Analysis::new(severe_config(1_000))
            .unwrap()
            .run(&severe_inputs());

        assert_eq!(first.results()[0].samples(), second.results()[0].samples());
    }
}

mod laws {
    use super::*;

    #[test]
    fn test_single_simulation() {
        let report = Analysis::new(severe_config(1)).unwrap().run(&severe_inputs());
        let result = report.result("Severe").unwrap();
        let sample = result.samples()[0];
        let stats = result.summary();

        assert_eq!(stats.std, 0.0);
        assert_eq!(stats.mean, sample);
        assert_eq!(stats.median, sample);
        assert_eq!(stats.min, sample);
        assert_eq!(stats.max, sample);
    }

    #[test]
    fn test_zero_variance_is_deterministic() {
        let inputs = ZoneInputs::new()
            .with_biomass("Severe", Measurement::new(50.0, 0.0))
            .with_emissions("Severe", Measurement::new(10.0, 0.0))
            .with_water_yield("Severe", WaterYieldRecord::new(100.0, Some(0.0)))
            .with_acreage("Severe", SEVERE_ACRES);
        let overrides = ParameterOverrides {
            stumpage_price: Some(StochasticValue::uncertain(7.5, 0.0)),
            price_shock: Some(StochasticValue::uncertain(0.0, 0.0)),
            regeneration_cost: Some(StochasticValue::uncertain(375.0, 0.0)),
            species_wtp: Some(StochasticValue::uncertain(1.3, 0.0)),
            lease_discount_rate: Some(StochasticValue::uncertain(0.06, 0.0)),
            ..Default::default()
        };
        let config = AnalysisConfig::default()
            .with_num_simulations(500)
            .with_override("Severe", overrides);

        let report = Analysis::new(config).unwrap().run(&inputs);
        let samples = report.result("Severe").unwrap().samples();

        let first = samples[0];
        assert!(samples.iter().all(|&s| s == first));
        assert_eq!(
            report.result("Severe").unwrap().summary().min,
            report.result("Severe").unwrap().summary().max
        );
    }

    #[test]
    fn test_scaling_law() {
        let per_acre_config = AnalysisConfig {
            basis: BasisMode::PerAcre,
            ..severe_config(2_000)
        };
        let per_acre = Analysis::new(per_acre_config)
            .unwrap()
            .run(&severe_inputs());
        let totals = Analysis::new(severe_config(2_000))
            .unwrap()
            .run(&severe_inputs());

        let per_acre = per_acre.result("Severe").unwrap();
        let totals = totals.result("Severe").unwrap();
        assert_eq!(per_acre.basis(), ValueBasis::PerAcre);

        for (p, t) in per_acre.samples().iter().zip(totals.samples().iter()) {
            assert_relative_eq!(*t, p * SEVERE_ACRES, max_relative = 1e-12);
        }
    }

    #[test]
    fn test_water_fallback_law() {
        let omitted = Analysis::new(severe_config(2_000))
            .unwrap()
            .run(&severe_inputs());

        let explicit_inputs =
            severe_inputs().with_water_yield("Severe", WaterYieldRecord::new(100.0, Some(2.0)));
        let explicit = Analysis::new(severe_config(2_000))
            .unwrap()
            .run(&explicit_inputs);

        assert_eq!(omitted.results(), explicit.results());
        assert!(omitted.warnings().is_empty());
        assert!(explicit.warnings().is_empty());
    }

    #[test]
    fn test_summarize_idempotent() {
        let report = Analysis::new(severe_config(500)).unwrap().run(&severe_inputs());
        let samples = report.result("Severe").unwrap().samples();

        assert_eq!(
            summarize(samples.view()).unwrap(),
            summarize(samples.view()).unwrap()
        );
        assert_eq!(
            &summarize(samples.view()).unwrap(),
            report.result("Severe").unwrap().summary()
        );
    }
}

mod convergence {
    use super::*;

    fn params() -> EconomicParameterSet {
        EconomicParameterSet {
            stumpage_price: StochasticValue::uncertain(21.0, 3.0),
            price_shock: StochasticValue::uncertain(0.0, 1.0),
            timber_volume: StochasticValue::uncertain(40.0, 4.0),
            regeneration_cost: StochasticValue::uncertain(200.0, 30.0),
            carbon_value: StochasticValue::uncertain(50.0, 5.0),
            water_value: StochasticValue::uncertain(100.16, 1.38),
            species_wtp: StochasticValue::uncertain(6.685, 2.0),
            lease_revenues: vec![200.0, 100.0, 50.0, 20.0, 10.0],
            lease_horizon: 5,
            lease_discount_rate: StochasticValue::fixed(0.055),
        }
    }

    #[test]
    fn test_mean_converges_to_expected_value() {
        let params = params();
        let expected = params.expected_value_at_means();

        for n in [100, 1_000, 10_000, 100_000] {
            let mut rng = ChaCha8Rng::seed_from_u64(42);
            let samples = run("Mitigated", &params, None, n, &mut rng).unwrap();
            let stats = summarize(samples.values.view()).unwrap();

            let tolerance = 4.0 * stats.standard_error(n);
            assert!(
                (stats.mean - expected).abs() < tolerance,
                "n = {}: mean {} vs expected {} (tolerance {})",
                n,
                stats.mean,
                expected,
                tolerance
            );
        }
    }

    #[test]
    fn test_standard_error_shrinks() {
        let params = params();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let small = run("Mitigated", &params, None, 1_000, &mut rng).unwrap();
        let small = summarize(small.values.view()).unwrap();

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let large = run("Mitigated", &params, None, 100_000, &mut rng).unwrap();
        let large = summarize(large.values.view()).unwrap();

        assert!(large.standard_error(100_000) < small.standard_error(1_000) / 5.0);
    }
}
