//! Decimal helpers shared by the schedule generators.
//!
//! Everything here stays in `Decimal`; the core never touches `f64`.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::SimCalcError;
use crate::SimCalcResult;

/// Nominal residual left on a fully depreciated asset.
pub const RESIDUAL_VALUE: Decimal = Decimal::ONE;

/// Below this exponent `exp` is indistinguishable from zero at 28 digits.
const EXP_FLOOR: Decimal = dec!(-60);

const SQRT_ITERATIONS: u32 = 60;

/// Taylor series exp(x) with range reduction for |x| > 2.
/// exp(x) = exp(x/2)^2 when |x| > 2, then Taylor with 25 terms.
pub fn exp_decimal(x: Decimal) -> Decimal {
    if x < EXP_FLOOR {
        return Decimal::ZERO;
    }
    let two = dec!(2);
    if x > two || x < -two {
        let half = exp_decimal(x / two);
        return half * half;
    }

    let mut sum = Decimal::ONE;
    let mut term = Decimal::ONE;
    for n in 1u32..=25 {
        term = term * x / Decimal::from(n);
        sum += term;
    }
    sum
}

/// Newton's method sqrt: y_{n+1} = (y_n + x/y_n) / 2.
pub fn sqrt_decimal(x: Decimal) -> Decimal {
    if x <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    if x == Decimal::ONE {
        return Decimal::ONE;
    }
    let two = dec!(2);
    let mut guess = if x > dec!(100) {
        dec!(10)
    } else if x < dec!(0.01) {
        dec!(0.1)
    } else {
        x / two
    };
    for _ in 0..SQRT_ITERATIONS {
        let next = (guess + x / guess) / two;
        if next == guess {
            break;
        }
        guess = next;
    }
    guess
}

/// Arithmetic mean. Rejects an empty slice rather than returning zero.
pub fn mean(values: &[Decimal]) -> SimCalcResult<Decimal> {
    if values.is_empty() {
        return Err(SimCalcError::InsufficientData(
            "mean requires at least one value".into(),
        ));
    }
    let sum: Decimal = values.iter().sum();
    Ok(sum / Decimal::from(values.len() as u64))
}

/// Population standard deviation (divides by N, not N - 1).
pub fn population_std_dev(values: &[Decimal]) -> SimCalcResult<Decimal> {
    let m = mean(values)?;
    let n = Decimal::from(values.len() as u64);
    let variance: Decimal = values.iter().map(|v| (*v - m) * (*v - m)).sum::<Decimal>() / n;
    Ok(sqrt_decimal(variance))
}

/// Number of monthly periods in a whole number of years.
pub fn months_in(years: u32) -> SimCalcResult<u32> {
    years.checked_mul(12).ok_or_else(|| {
        SimCalcError::invalid("years", format!("{years} years overflows the month counter"))
    })
}

/// Unwrap a checked Decimal operation, rejecting `field` when it overflowed.
pub fn checked_or_reject(
    value: Option<Decimal>,
    field: &str,
    what: &str,
) -> SimCalcResult<Decimal> {
    value.ok_or_else(|| {
        SimCalcError::invalid(field, format!("{what} exceeds the representable Decimal range"))
    })
}
