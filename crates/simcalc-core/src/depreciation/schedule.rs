//! Depreciation schedules with a 1-unit memorandum residual.
//!
//! Straight-line spreads `floor(cost / life)` over every year and lets the
//! final year absorb the rounding drift. Double-rate declining balance applies
//! `2 / life` to the prior book value and, past the midpoint of the useful
//! life, switches to equal installments of the remaining book value once the
//! rate-based amount falls below the straight-line amount. That switch is a
//! simplified stand-in for the statutory guarantee-rate test, not a copy of
//! the published tables.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimCalcError;
use crate::numeric::RESIDUAL_VALUE;
use crate::types::*;
use crate::SimCalcResult;

const MIN_USEFUL_LIFE_YEARS: u32 = 2;
const MAX_USEFUL_LIFE_YEARS: u32 = 100;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepreciationMethod {
    StraightLine,
    DecliningBalance,
}

/// Which rule produced a period's depreciation amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepreciationBasis {
    /// Year 0: the asset as acquired, nothing depreciated yet
    Acquisition,
    /// `floor(cost / life)`
    StraightLine,
    /// `floor(book_value * 2 / life)`
    Rate,
    /// `floor((book_value - 1) / years_remaining)` after the switchover
    EqualInstallment,
    /// Final year, or any earlier year clamped to leave the residual
    Terminal,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepreciationInput {
    pub acquisition_cost: Money,
    pub useful_life_years: u32,
    pub method: DepreciationMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationPeriod {
    pub year: u32,
    pub depreciation_amount: Money,
    pub book_value: Money,
    pub basis: DepreciationBasis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationSchedule {
    pub method: DepreciationMethod,
    pub periods: Vec<DepreciationPeriod>,
    pub total_depreciation: Money,
    pub residual_value: Money,
    /// `floor(cost / life)`; also the switchover threshold for declining balance
    pub straight_line_reference: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declining_rate: Option<Rate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switchover_year: Option<u32>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build the year-by-year schedule from acquisition (year 0) to the end of
/// the useful life. The returned `periods` has `useful_life_years + 1` rows and
/// always ends at a book value of exactly 1.
pub fn build_depreciation_schedule(
    input: &DepreciationInput,
) -> SimCalcResult<ComputationOutput<DepreciationSchedule>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_input(input)?;

    let cost = input.acquisition_cost;
    let life = input.useful_life_years;
    let life_dec = Decimal::from(life);
    let reference = (cost / life_dec).floor();
    let declining_rate = dec!(2) / life_dec;

    if reference.is_zero() {
        warnings.push(format!(
            "Acquisition cost {cost} is below the useful life of {life} years; \
             annual straight-line amount rounds down to 0"
        ));
    }

    let mut periods = Vec::with_capacity(life as usize + 1);
    periods.push(DepreciationPeriod {
        year: 0,
        depreciation_amount: Decimal::ZERO,
        book_value: cost,
        basis: DepreciationBasis::Acquisition,
    });

    let mut book_value = cost;
    let mut switchover_year: Option<u32> = None;

    for year in 1..=life {
        let (mut amount, mut basis) = match input.method {
            DepreciationMethod::StraightLine => (reference, DepreciationBasis::StraightLine),
            DepreciationMethod::DecliningBalance => {
                let tentative = (book_value * declining_rate).floor();
                if switchover_year.is_none() && tentative < reference && 2 * year > life {
                    switchover_year = Some(year);
                }
                if switchover_year.is_some() {
                    let years_remaining = Decimal::from(life - year + 1);
                    (
                        ((book_value - RESIDUAL_VALUE) / years_remaining).floor(),
                        DepreciationBasis::EqualInstallment,
                    )
                } else {
                    (tentative, DepreciationBasis::Rate)
                }
            }
        };

        if year == life || book_value - amount < RESIDUAL_VALUE {
            amount = book_value - RESIDUAL_VALUE;
            basis = DepreciationBasis::Terminal;
        }

        book_value -= amount;
        periods.push(DepreciationPeriod {
            year,
            depreciation_amount: amount,
            book_value,
            basis,
        });
    }

    tracing::debug!(
        method = ?input.method,
        %cost,
        life,
        ?switchover_year,
        "depreciation schedule built"
    );

    let schedule = DepreciationSchedule {
        method: input.method,
        periods,
        total_depreciation: cost - book_value,
        residual_value: book_value,
        straight_line_reference: reference,
        declining_rate: match input.method {
            DepreciationMethod::DecliningBalance => Some(declining_rate),
            DepreciationMethod::StraightLine => None,
        },
        switchover_year,
    };

    let (methodology, assumptions) = match input.method {
        DepreciationMethod::StraightLine => (
            "Straight-line depreciation to a 1-unit residual",
            serde_json::json!({
                "annual_amount": "floor(cost / life)",
                "final_year": "book_value - 1",
            }),
        ),
        DepreciationMethod::DecliningBalance => (
            "200% declining balance with switchover to equal installments",
            serde_json::json!({
                "rate": declining_rate.to_string(),
                "switchover_test": "floor(bv * rate) < floor(cost / life) and year > life / 2",
                "after_switchover": "floor((bv - 1) / years_remaining)",
                "final_year": "book_value - 1",
            }),
        ),
    };

    Ok(with_metadata(methodology, &assumptions, warnings, schedule))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &DepreciationInput) -> SimCalcResult<()> {
    if input.acquisition_cost <= Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "acquisition_cost".into(),
            reason: "must be positive".into(),
        });
    }
    if input.acquisition_cost < RESIDUAL_VALUE {
        return Err(SimCalcError::InvalidInput {
            field: "acquisition_cost".into(),
            reason: format!("must be at least the residual value of {RESIDUAL_VALUE}"),
        });
    }
    if input.useful_life_years < MIN_USEFUL_LIFE_YEARS {
        return Err(SimCalcError::InvalidInput {
            field: "useful_life_years".into(),
            reason: format!("must be at least {MIN_USEFUL_LIFE_YEARS}"),
        });
    }
    if input.useful_life_years > MAX_USEFUL_LIFE_YEARS {
        return Err(SimCalcError::InvalidInput {
            field: "useful_life_years".into(),
            reason: format!("must not exceed {MAX_USEFUL_LIFE_YEARS}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn input(method: DepreciationMethod) -> DepreciationInput {
        DepreciationInput {
            acquisition_cost: dec!(1_000_000),
            useful_life_years: 5,
            method,
        }
    }

    fn amounts(schedule: &DepreciationSchedule) -> Vec<Money> {
        schedule.periods.iter().map(|p| p.depreciation_amount).collect()
    }

    #[test]
    fn test_straight_line_example() {
        let out = build_depreciation_schedule(&input(DepreciationMethod::StraightLine)).unwrap();
        let s = &out.result;
        assert_eq!(
            amounts(s),
            vec![
                dec!(0),
                dec!(200_000),
                dec!(200_000),
                dec!(200_000),
                dec!(200_000),
                dec!(199_999)
            ]
        );
        assert_eq!(s.periods[5].book_value, dec!(1));
        assert_eq!(s.periods[5].basis, DepreciationBasis::Terminal);
        assert_eq!(s.total_depreciation, dec!(999_999));
        assert_eq!(s.switchover_year, None);
        assert_eq!(s.declining_rate, None);
    }

    #[test]
    fn test_declining_balance_switchover() {
        let out =
            build_depreciation_schedule(&input(DepreciationMethod::DecliningBalance)).unwrap();
        let s = &out.result;
        // y1 400,000; y2 240,000; y3 rate amount 144,000 < 200,000 and 3 > 2.5
        // so the remaining 359,999 is spread over 3 years.
        assert_eq!(
            amounts(s),
            vec![
                dec!(0),
                dec!(400_000),
                dec!(240_000),
                dec!(119_999),
                dec!(120_000),
                dec!(120_000)
            ]
        );
        assert_eq!(s.switchover_year, Some(3));
        assert_eq!(s.declining_rate, Some(dec!(0.4)));
        assert_eq!(s.periods[3].basis, DepreciationBasis::EqualInstallment);
        assert_eq!(s.periods[5].book_value, dec!(1));
    }

    #[test]
    fn test_declining_balance_no_switch_before_midpoint() {
        // life 10: rate 0.2. Year 5 rate amount 81,920 < 100,000 but 5 is not > 5.
        let out = build_depreciation_schedule(&DepreciationInput {
            acquisition_cost: dec!(1_000_000),
            useful_life_years: 10,
            method: DepreciationMethod::DecliningBalance,
        })
        .unwrap();
        let s = &out.result;
        assert_eq!(s.periods[5].basis, DepreciationBasis::Rate);
        assert_eq!(s.periods[5].depreciation_amount, dec!(81_920));
        assert_eq!(s.switchover_year, Some(6));
        assert_eq!(s.periods[10].book_value, dec!(1));
    }

    #[test]
    fn test_two_year_declining_clamps_first_year() {
        // rate = 2 / 2 = 100%: the first year would zero the asset.
        let out = build_depreciation_schedule(&DepreciationInput {
            acquisition_cost: dec!(500),
            useful_life_years: 2,
            method: DepreciationMethod::DecliningBalance,
        })
        .unwrap();
        let s = &out.result;
        assert_eq!(s.periods[1].depreciation_amount, dec!(499));
        assert_eq!(s.periods[1].book_value, dec!(1));
        assert_eq!(s.periods[1].basis, DepreciationBasis::Terminal);
        assert_eq!(s.periods[2].depreciation_amount, dec!(0));
        assert_eq!(s.periods[2].book_value, dec!(1));
    }

    #[test]
    fn test_tiny_cost_warns() {
        let out = build_depreciation_schedule(&DepreciationInput {
            acquisition_cost: dec!(3),
            useful_life_years: 5,
            method: DepreciationMethod::StraightLine,
        })
        .unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("rounds down to 0")));
        assert_eq!(out.result.periods[5].depreciation_amount, dec!(2));
        assert_eq!(out.result.residual_value, dec!(1));
    }

    #[test]
    fn test_invalid_inputs() {
        let mut bad = input(DepreciationMethod::StraightLine);
        bad.acquisition_cost = Decimal::ZERO;
        assert!(matches!(
            build_depreciation_schedule(&bad),
            Err(SimCalcError::InvalidInput { ref field, .. }) if field == "acquisition_cost"
        ));

        let mut bad = input(DepreciationMethod::StraightLine);
        bad.acquisition_cost = dec!(0.5);
        assert!(build_depreciation_schedule(&bad).is_err());

        let mut bad = input(DepreciationMethod::DecliningBalance);
        bad.useful_life_years = 1;
        assert!(matches!(
            build_depreciation_schedule(&bad),
            Err(SimCalcError::InvalidInput { ref field, .. }) if field == "useful_life_years"
        ));
    }
}
