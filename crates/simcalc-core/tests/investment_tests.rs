use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use simcalc_core::investment::growth::{project_investment, InvestmentInput};
use simcalc_core::SimCalcError;

#[test]
fn test_initial_amount_only_compounds_monthly() {
    let p = project_investment(&InvestmentInput {
        initial_amount: dec!(1_200_000),
        monthly_contribution: Decimal::ZERO,
        annual_rate_percent: dec!(12),
        years: 1,
    })
    .unwrap()
    .result;
    // 1% a month for 12 months: 1.2M * 1.01^12 ≈ 1,352,190.04
    assert!((p.final_value - dec!(1_352_190.04)).abs() < dec!(0.01));
    assert_eq!(p.total_contributed, dec!(1_200_000));
}

#[test]
fn test_contributions_only_at_zero_rate() {
    let p = project_investment(&InvestmentInput {
        initial_amount: Decimal::ZERO,
        monthly_contribution: dec!(10_000),
        annual_rate_percent: Decimal::ZERO,
        years: 3,
    })
    .unwrap()
    .result;
    let values: Vec<Decimal> = p.periods.iter().map(|c| c.total_value).collect();
    assert_eq!(
        values,
        vec![dec!(0), dec!(120_000), dec!(240_000), dec!(360_000)]
    );
}

#[test]
fn test_repeat_calls_are_identical() {
    let input = InvestmentInput {
        initial_amount: dec!(1_000_000),
        monthly_contribution: dec!(30_000),
        annual_rate_percent: dec!(5),
        years: 20,
    };
    assert_eq!(
        project_investment(&input).unwrap(),
        project_investment(&input).unwrap()
    );
}

#[test]
fn test_runaway_growth_is_rejected_not_panicking() {
    // 100% a year for a century leaves the Decimal range well before month 1,200.
    let result = project_investment(&InvestmentInput {
        initial_amount: dec!(1_000_000),
        monthly_contribution: dec!(30_000),
        annual_rate_percent: dec!(100),
        years: 100,
    });
    assert!(matches!(
        result,
        Err(SimCalcError::InvalidInput { ref field, .. }) if field == "annual_rate_percent"
    ));
}

#[test]
fn test_high_rate_that_fits_still_projects() {
    let p = project_investment(&InvestmentInput {
        initial_amount: dec!(1_000_000),
        monthly_contribution: dec!(30_000),
        annual_rate_percent: dec!(30),
        years: 100,
    })
    .unwrap()
    .result;
    assert_eq!(p.periods.len(), 101);
    assert!(p.final_value > p.total_contributed);
}

proptest! {
    #[test]
    fn value_never_below_principal_for_non_negative_rates(
        initial in 0u64..100_000_000,
        monthly in 0u64..1_000_000,
        rate_tenths in 0u32..=150,
        years in 1u32..=50,
    ) {
        let p = project_investment(&InvestmentInput {
            initial_amount: Decimal::from(initial),
            monthly_contribution: Decimal::from(monthly),
            annual_rate_percent: Decimal::new(rate_tenths as i64, 1),
            years,
        })
        .unwrap()
        .result;

        prop_assert_eq!(p.periods.len() as u32, years + 1);
        for c in &p.periods {
            prop_assert!(c.total_value >= c.contributed_principal);
        }
        for pair in p.periods.windows(2) {
            prop_assert!(pair[1].contributed_principal >= pair[0].contributed_principal);
            prop_assert!(pair[1].total_value >= pair[0].total_value);
        }
        prop_assert_eq!(
            p.total_contributed,
            Decimal::from(initial) + Decimal::from(monthly) * Decimal::from(years * 12)
        );
    }
}
