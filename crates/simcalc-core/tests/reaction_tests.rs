use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use simcalc_core::reaction::percentile::{
    density_curve, estimate_rank, norm_cdf, RankSide, ReactionInput, ReferencePopulation,
    MAX_CURVE_MEAN_MS,
};
use simcalc_core::SimCalcError;

fn population(mean: Decimal, sd: Decimal) -> ReferencePopulation {
    ReferencePopulation {
        mean,
        standard_deviation: sd,
    }
}

#[test]
fn test_five_identical_samples_at_mean() {
    let out = estimate_rank(&ReactionInput {
        samples_ms: vec![250, 250, 250, 250, 250],
        population: population(dec!(250), dec!(50)),
    })
    .unwrap();
    assert!((out.result.percentile - dec!(50)).abs() < dec!(0.0001));
}

#[test]
fn test_population_defaults_apply_when_omitted_from_json() {
    let input: ReactionInput =
        serde_json::from_str(r#"{ "samples_ms": [300, 320, 310] }"#).unwrap();
    assert_eq!(input.population, ReferencePopulation::default());
    let r = estimate_rank(&input).unwrap().result;
    assert!(r.faster_than_population);
    assert_eq!(r.rank_side, RankSide::Top);
}

#[test]
fn test_density_curve_integrates_to_about_one() {
    let pop = population(dec!(350), dec!(50));
    let curve = density_curve(&pop, dec!(350)).unwrap();
    // Riemann sum over 150..=550 (±4 SD) at 10 ms spacing
    let area: Decimal = curve.iter().map(|p| p.density * dec!(10)).sum();
    assert!((area - Decimal::ONE).abs() < dec!(0.001));
}

#[test]
fn test_density_curve_size_is_bounded() {
    let pop = ReferencePopulation::default();
    assert!(matches!(
        density_curve(&pop, dec!(5_000_000)),
        Err(SimCalcError::InvalidInput { ref field, .. }) if field == "player_mean"
    ));
    let widest = density_curve(&pop, MAX_CURVE_MEAN_MS).unwrap();
    assert!(widest.len() <= 1_000);
}

#[test]
fn test_slowest_possible_samples_still_rank() {
    let r = estimate_rank(&ReactionInput {
        samples_ms: vec![u32::MAX, u32::MAX],
        population: ReferencePopulation::default(),
    })
    .unwrap()
    .result;
    assert_eq!(r.rank_side, RankSide::Bottom);
    assert_eq!(r.rank_position, 1);
}

#[test]
fn test_vanishing_population_spread_is_rejected() {
    let result = estimate_rank(&ReactionInput {
        samples_ms: vec![4_000_000_000],
        population: population(dec!(350), dec!(0.0000000000000000000000000001)),
    });
    assert!(matches!(result, Err(SimCalcError::InvalidInput { .. })));
}

#[test]
fn test_repeat_calls_are_identical() {
    let input = ReactionInput {
        samples_ms: vec![301, 287, 344, 298, 276],
        population: ReferencePopulation::default(),
    };
    assert_eq!(estimate_rank(&input).unwrap(), estimate_rank(&input).unwrap());
}

proptest! {
    #[test]
    fn cdf_stays_in_unit_interval_and_is_monotone(a in -600i64..600, b in -600i64..600) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let lo = Decimal::new(lo, 2);
        let hi = Decimal::new(hi, 2);
        let (p_lo, p_hi) = (norm_cdf(lo), norm_cdf(hi));
        prop_assert!(p_lo >= Decimal::ZERO && p_hi <= Decimal::ONE);
        prop_assert!(p_lo <= p_hi + dec!(0.0000002));
    }

    #[test]
    fn faster_mean_means_top_rank(samples in prop::collection::vec(1u32..2_000, 1..20)) {
        let r = estimate_rank(&ReactionInput {
            samples_ms: samples,
            population: ReferencePopulation::default(),
        })
        .unwrap()
        .result;
        prop_assert_eq!(r.faster_than_population, r.mean < dec!(350));
        prop_assert_eq!(r.faster_than_population, r.rank_side == RankSide::Top);
        prop_assert!(r.rank_percent >= dec!(0.1));
        prop_assert!(r.rank_percent <= dec!(100));
        prop_assert!(r.standard_deviation >= Decimal::ZERO);
        if r.faster_than_population {
            prop_assert!(r.percentile < dec!(50));
        }
    }
}
