use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::SimCalcError;
use crate::numeric::checked_or_reject;
use crate::types::{Money, Percent, Rate};
use crate::SimCalcResult;

const MONTHS_PER_YEAR: Decimal = dec!(12);
const HUNDRED: Decimal = dec!(100);

/// Convert an annual percentage (1.5 = 1.5%) to the nominal monthly rate
/// (`pct / 100 / 12`). No effective-rate compounding is applied.
pub fn monthly_rate_from_percent(annual_percent: Percent) -> Rate {
    annual_percent / HUNDRED / MONTHS_PER_YEAR
}

/// Compound growth factor `(1 + rate)^nper`.
pub fn growth_factor(rate: Rate, nper: u32) -> SimCalcResult<Decimal> {
    (Decimal::ONE + rate)
        .checked_powu(u64::from(nper))
        .ok_or_else(|| SimCalcError::invalid("rate", format!("(1 + {rate})^{nper} overflows")))
}

/// Level payment that amortises `present_value` over `nper` periods.
///
/// Returned as a positive amount. A zero rate degenerates to simple division
/// with no compounding. Computed as `pv * r * (f / (f - 1))` so the large
/// growth factor is divided out before it meets the principal; anything
/// that still overflows is rejected as an out-of-range rate.
pub fn annuity_payment(rate: Rate, nper: u32, present_value: Money) -> SimCalcResult<Money> {
    if nper == 0 {
        return Err(SimCalcError::invalid("nper", "Number of periods must be > 0"));
    }

    if rate.is_zero() {
        return Ok(present_value / Decimal::from(nper));
    }

    let factor = growth_factor(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(SimCalcError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    let annuity_ratio =
        checked_or_reject(factor.checked_div(denominator), "rate", "annuity factor")?;
    let payment = present_value
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(annuity_ratio));
    checked_or_reject(payment, "rate", "level payment")
}
