//! Reaction-time ranking against a reference normal population.
//!
//! Lower latency is better, so the "top" side of the distribution is the
//! left tail. The CDF uses the Zelen & Severo polynomial with 7-digit
//! coefficients (absolute error about 2.1e-7 over |z| <= 6), which is fine
//! for a displayed rank but not for inference.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimCalcError;
use crate::numeric::{exp_decimal, mean, population_std_dev, sqrt_decimal};
use crate::types::*;
use crate::SimCalcResult;

/// Displayed rank never reads as 0% (or, mirrored, 100%).
const MIN_RANK_PERCENT: Decimal = dec!(0.1);
const HUNDRED: Decimal = dec!(100);

const CURVE_STEP_MS: Decimal = dec!(10);
const CURVE_MIN_MS: Decimal = dec!(150);
const CURVE_MAX_MS: Decimal = dec!(550);
const CURVE_MARGIN_MS: Decimal = dec!(100);
/// Slowest player mean the curve window will stretch to (at most ~1,000 points).
pub const MAX_CURVE_MEAN_MS: Decimal = dec!(10_000);
/// Beyond this |z| the tails are zero at 28 digits and z^2 could overflow.
const Z_SATURATION: Decimal = dec!(40);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Reference distribution the player is ranked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferencePopulation {
    pub mean: Decimal,
    pub standard_deviation: Decimal,
}

impl Default for ReferencePopulation {
    /// Typical browser tap latency: 350 ms ± 50 ms.
    fn default() -> Self {
        Self {
            mean: dec!(350),
            standard_deviation: dec!(50),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReactionInput {
    /// Observed latencies in milliseconds
    pub samples_ms: Vec<u32>,
    #[serde(default)]
    pub population: ReferencePopulation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankSide {
    /// Faster than the population mean
    Top,
    /// At or slower than the population mean
    Bottom,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankEstimate {
    pub sample_count: usize,
    pub mean: Decimal,
    /// Population standard deviation of the samples (divides by N)
    pub standard_deviation: Decimal,
    pub z_score: Decimal,
    /// Share of the reference population with a lower latency, 0..100
    pub percentile: Decimal,
    pub faster_than_population: bool,
    pub rank_side: RankSide,
    /// "Top X%" / "bottom X%" as displayed, never below 0.1
    pub rank_percent: Decimal,
    /// ceil(rank_percent): position counted from the ranked side out of 100
    pub rank_position: u32,
}

/// A sample of the reference density, for drawing the bell curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DensityPoint {
    pub latency_ms: Decimal,
    pub density: Decimal,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Summarise the samples and place their mean on the reference distribution.
pub fn estimate_rank(input: &ReactionInput) -> SimCalcResult<ComputationOutput<RankEstimate>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_input(input)?;

    let samples: Vec<Decimal> = input.samples_ms.iter().map(|&s| Decimal::from(s)).collect();
    let sample_mean = mean(&samples)?;
    let sample_sd = population_std_dev(&samples)?;

    if samples.len() == 1 {
        warnings.push("Single sample: standard deviation is zero".into());
    }

    let pop = &input.population;
    let z = sample_mean
        .checked_sub(pop.mean)
        .and_then(|distance| distance.checked_div(pop.standard_deviation))
        .ok_or_else(|| {
            SimCalcError::invalid(
                "population.standard_deviation",
                "too small for the distance between sample and population means",
            )
        })?;
    let cdf = norm_cdf(z);
    let faster = z < Decimal::ZERO;

    let (rank_side, tail) = if faster {
        (RankSide::Top, cdf)
    } else {
        (RankSide::Bottom, Decimal::ONE - cdf)
    };
    let rank_percent = (tail * HUNDRED).max(MIN_RANK_PERCENT);
    let rank_position = rank_position(rank_percent);

    tracing::debug!(
        samples = samples.len(),
        mean = %sample_mean,
        z = %z,
        rank = %rank_percent,
        "reaction rank estimated"
    );

    let estimate = RankEstimate {
        sample_count: samples.len(),
        mean: sample_mean,
        standard_deviation: sample_sd,
        z_score: z,
        percentile: cdf * HUNDRED,
        faster_than_population: faster,
        rank_side,
        rank_percent,
        rank_position,
    };

    let assumptions = serde_json::json!({
        "population_mean_ms": pop.mean.to_string(),
        "population_sd_ms": pop.standard_deviation.to_string(),
        "cdf": "Zelen & Severo polynomial, 7-digit coefficients, |error| about 2.1e-7",
        "sample_sd": "population (divide by N)",
        "better": "lower latency",
    });

    Ok(with_metadata(
        "Normal-distribution rank of mean reaction time",
        &assumptions,
        warnings,
        estimate,
    ))
}

/// Reference density sampled every 10 ms over a window that always covers
/// 150..550 ms and stretches to keep `player_mean` 100 ms from either edge.
/// `player_mean` must lie in `0..=MAX_CURVE_MEAN_MS`.
pub fn density_curve(
    population: &ReferencePopulation,
    player_mean: Decimal,
) -> SimCalcResult<Vec<DensityPoint>> {
    validate_population(population)?;
    if player_mean < Decimal::ZERO || player_mean > MAX_CURVE_MEAN_MS {
        return Err(SimCalcError::InvalidInput {
            field: "player_mean".into(),
            reason: format!("must be between 0 and {MAX_CURVE_MEAN_MS} ms"),
        });
    }

    let lo = CURVE_MIN_MS.min(player_mean - CURVE_MARGIN_MS);
    let hi = CURVE_MAX_MS.max(player_mean + CURVE_MARGIN_MS);

    let mut points = Vec::new();
    let mut x = lo;
    while x <= hi {
        points.push(DensityPoint {
            latency_ms: x,
            density: normal_pdf(x, population),
        });
        x += CURVE_STEP_MS;
    }
    Ok(points)
}

// ---------------------------------------------------------------------------
// Distribution helpers
// ---------------------------------------------------------------------------

/// Standard normal CDF, Zelen & Severo (Abramowitz & Stegun 26.2.17).
/// Phi(z) = 1 - phi(z) * (b1*t + b2*t^2 + b3*t^3 + b4*t^4 + b5*t^5)
/// where t = 1 / (1 + 0.2316419 * |z|), mirrored for z < 0.
pub fn norm_cdf(z: Decimal) -> Decimal {
    let b1 = dec!(0.3193815);
    let b2 = dec!(-0.3565638);
    let b3 = dec!(1.781478);
    let b4 = dec!(-1.821256);
    let b5 = dec!(1.330274);
    let p = dec!(0.2316419);

    let abs_z = z.abs();
    if abs_z > Z_SATURATION {
        return if z > Decimal::ZERO { Decimal::ONE } else { Decimal::ZERO };
    }
    let t = Decimal::ONE / (Decimal::ONE + p * abs_z);
    let density = dec!(0.3989423) * exp_decimal(-(abs_z * abs_z) / dec!(2));

    // Lower tail: P(Z <= -|z|)
    let lower = density * t * (b1 + t * (b2 + t * (b3 + t * (b4 + t * b5))));

    if z > Decimal::ZERO {
        Decimal::ONE - lower
    } else {
        lower
    }
}

fn normal_pdf(x: Decimal, population: &ReferencePopulation) -> Decimal {
    let two_pi = dec!(6.283185307179586);
    let sd = population.standard_deviation;
    let z = match x.checked_sub(population.mean).and_then(|d| d.checked_div(sd)) {
        Some(z) if z.abs() <= Z_SATURATION => z,
        _ => return Decimal::ZERO,
    };
    exp_decimal(-(z * z) / dec!(2)) / (sd * sqrt_decimal(two_pi))
}

/// rank_percent is clamped to 0.1..=100, so the position is 1..=100.
fn rank_position(rank_percent: Decimal) -> u32 {
    rank_percent.ceil().to_u32().unwrap_or(100).clamp(1, 100)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &ReactionInput) -> SimCalcResult<()> {
    if input.samples_ms.is_empty() {
        return Err(SimCalcError::InvalidInput {
            field: "samples_ms".into(),
            reason: "At least one reaction time is required".into(),
        });
    }
    if input.samples_ms.contains(&0) {
        return Err(SimCalcError::InvalidInput {
            field: "samples_ms".into(),
            reason: "Reaction times must be positive".into(),
        });
    }
    validate_population(&input.population)
}

fn validate_population(population: &ReferencePopulation) -> SimCalcResult<()> {
    if population.standard_deviation <= Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "population.standard_deviation".into(),
            reason: "must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Observed worst case for the 7-digit coefficients is ~2.1e-7.
    const CDF_TOLERANCE: Decimal = dec!(0.000001);

    fn input(samples: &[u32], mean: Decimal, sd: Decimal) -> ReactionInput {
        ReactionInput {
            samples_ms: samples.to_vec(),
            population: ReferencePopulation {
                mean,
                standard_deviation: sd,
            },
        }
    }

    #[test]
    fn test_cdf_reference_values() {
        assert!((norm_cdf(Decimal::ZERO) - dec!(0.5)).abs() < CDF_TOLERANCE);
        assert!((norm_cdf(dec!(1)) - dec!(0.8413447460685429)).abs() < CDF_TOLERANCE);
        assert!((norm_cdf(dec!(-1)) - dec!(0.15865525393145707)).abs() < CDF_TOLERANCE);
        assert!((norm_cdf(dec!(1.96)) - dec!(0.9750021048517795)).abs() < CDF_TOLERANCE);
        assert!((norm_cdf(dec!(-2.5)) - dec!(0.006209665325776132)).abs() < CDF_TOLERANCE);
    }

    #[test]
    fn test_cdf_is_symmetric() {
        for z in [dec!(0.3), dec!(1.2), dec!(2.7)] {
            let sum = norm_cdf(z) + norm_cdf(-z);
            assert!((sum - Decimal::ONE).abs() < dec!(0.0000000001));
        }
    }

    #[test]
    fn test_at_population_mean_is_fiftieth_percentile() {
        let r = estimate_rank(&input(&[250; 5], dec!(250), dec!(50))).unwrap().result;
        assert_eq!(r.mean, dec!(250));
        assert_eq!(r.standard_deviation, Decimal::ZERO);
        assert_eq!(r.z_score, Decimal::ZERO);
        assert!((r.percentile - dec!(50)).abs() < dec!(0.0001));
        assert!(!r.faster_than_population);
        assert_eq!(r.rank_side, RankSide::Bottom);
    }

    #[test]
    fn test_faster_than_mean_ranks_top() {
        // mean 300 vs 350 ± 50: z = -1, about the top 15.9%
        let r = estimate_rank(&input(&[280, 300, 320, 290, 310], dec!(350), dec!(50)))
            .unwrap()
            .result;
        assert_eq!(r.mean, dec!(300));
        assert_eq!(r.z_score, dec!(-1));
        assert!(r.faster_than_population);
        assert!(r.percentile < dec!(50));
        assert_eq!(r.rank_side, RankSide::Top);
        assert!((r.rank_percent - dec!(15.865525)).abs() < dec!(0.0001));
        assert_eq!(r.rank_position, 16);
        // population SD of 280,300,320,290,310 = sqrt(200)
        assert!((r.standard_deviation - dec!(14.142135623730950)).abs() < dec!(0.000000001));
    }

    #[test]
    fn test_slower_than_mean_ranks_bottom() {
        let r = estimate_rank(&input(&[400], dec!(350), dec!(50))).unwrap();
        assert_eq!(r.result.rank_side, RankSide::Bottom);
        assert!(r.result.percentile > dec!(50));
        assert!((r.result.rank_percent - dec!(15.865525)).abs() < dec!(0.0001));
        assert_eq!(r.warnings.len(), 1);
    }

    #[test]
    fn test_extreme_rank_is_clamped() {
        let r = estimate_rank(&input(&[100, 100, 100], dec!(350), dec!(50)))
            .unwrap()
            .result;
        assert_eq!(r.rank_percent, dec!(0.1));
        assert_eq!(r.rank_position, 1);
        assert!(r.percentile > Decimal::ZERO);
    }

    #[test]
    fn test_default_population() {
        let input = ReactionInput {
            samples_ms: vec![350],
            population: ReferencePopulation::default(),
        };
        let r = estimate_rank(&input).unwrap().result;
        assert_eq!(r.z_score, Decimal::ZERO);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            estimate_rank(&input(&[], dec!(350), dec!(50))),
            Err(SimCalcError::InvalidInput { .. })
        ));
        assert!(estimate_rank(&input(&[0, 200], dec!(350), dec!(50))).is_err());
        assert!(estimate_rank(&input(&[200], dec!(350), Decimal::ZERO)).is_err());
    }

    #[test]
    fn test_density_curve_window() {
        let pop = ReferencePopulation::default();
        let curve = density_curve(&pop, dec!(300)).unwrap();
        assert_eq!(curve.first().unwrap().latency_ms, dec!(150));
        assert_eq!(curve.last().unwrap().latency_ms, dec!(550));
        assert_eq!(curve.len(), 41);

        let peak = curve.iter().find(|p| p.latency_ms == dec!(350)).unwrap();
        // 1 / (50 * sqrt(2 pi)) ≈ 0.0079788
        assert!((peak.density - dec!(0.00797884560802865)).abs() < dec!(0.0000000001));

        let wide = density_curve(&pop, dec!(700)).unwrap();
        assert_eq!(wide.last().unwrap().latency_ms, dec!(800));
    }

    #[test]
    fn test_density_curve_rejects_out_of_range_mean() {
        let pop = ReferencePopulation::default();
        assert!(density_curve(&pop, dec!(5_000_000)).is_err());
        assert!(density_curve(&pop, dec!(-1)).is_err());

        let slowest = density_curve(&pop, MAX_CURVE_MEAN_MS).unwrap();
        assert_eq!(slowest.len(), 996);
        assert_eq!(slowest.last().unwrap().density, Decimal::ZERO);
    }

    #[test]
    fn test_assumptions_quote_cdf_error_bound() {
        let out = estimate_rank(&input(&[300], dec!(350), dec!(50))).unwrap();
        let cdf_note = out.assumptions["cdf"].as_str().unwrap();
        assert!(cdf_note.contains("2.1e-7"));
    }

    #[test]
    fn test_far_tails_saturate() {
        assert_eq!(norm_cdf(dec!(1_000_000_000_000_000)), Decimal::ONE);
        assert_eq!(norm_cdf(dec!(-1_000_000_000_000_000)), Decimal::ZERO);
    }
}
