//! Equal-payment (annuity) loan amortization.
//!
//! Every month is computed and kept; charts that only want one point per
//! year use [`annual_checkpoints`] on the finished schedule. The balance
//! after the final payment is left exactly as the arithmetic produces it,
//! so a sub-unit residual is expected rather than corrected.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimCalcError;
use crate::numeric::{checked_or_reject, months_in};
use crate::time_value::{annuity_payment, monthly_rate_from_percent};
use crate::types::*;
use crate::SimCalcResult;

const MAX_TERM_YEARS: u32 = 100;
const RESIDUAL_TOLERANCE: Decimal = Decimal::ONE;
const RATE_FIELD: &str = "annual_rate_percent";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    pub principal: Money,
    /// Annual nominal rate as a percentage (1.5 = 1.5%)
    pub annual_rate_percent: Percent,
    pub term_years: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPeriod {
    /// Month number (1-indexed)
    pub period: u32,
    /// Repayment year the month falls in (1-indexed)
    pub year: u32,
    pub payment: Money,
    pub interest_portion: Money,
    pub principal_portion: Money,
    pub remaining_balance: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub monthly_payment: Money,
    pub total_interest: Money,
    pub total_payment: Money,
    pub number_of_payments: u32,
    /// Balance left after the last payment; rounding drift, not forced to zero
    pub residual_balance: Money,
    pub periods: Vec<LoanPeriod>,
}

/// Build the month-by-month schedule for an equal total-payment loan.
pub fn build_loan_schedule(input: &LoanInput) -> SimCalcResult<ComputationOutput<LoanSchedule>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_input(input)?;

    let monthly_rate = monthly_rate_from_percent(input.annual_rate_percent);
    let n = months_in(input.term_years)?;
    let monthly_payment =
        annuity_payment(monthly_rate, n, input.principal).map_err(|e| match e {
            SimCalcError::InvalidInput { reason, .. } => SimCalcError::InvalidInput {
                field: RATE_FIELD.into(),
                reason,
            },
            other => other,
        })?;

    let mut periods = Vec::with_capacity(n as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;

    for period in 1..=n {
        let interest_portion = checked_or_reject(
            balance.checked_mul(monthly_rate),
            RATE_FIELD,
            "monthly interest",
        )?;
        let principal_portion = checked_or_reject(
            monthly_payment.checked_sub(interest_portion),
            RATE_FIELD,
            "principal portion",
        )?;
        balance = checked_or_reject(balance.checked_sub(principal_portion), RATE_FIELD, "balance")?;
        total_interest = checked_or_reject(
            total_interest.checked_add(interest_portion),
            RATE_FIELD,
            "total interest",
        )?;

        periods.push(LoanPeriod {
            period,
            year: period.div_ceil(12),
            payment: monthly_payment,
            interest_portion,
            principal_portion,
            remaining_balance: balance,
        });
    }

    if balance.abs() > RESIDUAL_TOLERANCE {
        warnings.push(format!(
            "Residual balance {balance} after {n} payments exceeds one currency unit"
        ));
    }

    tracing::debug!(
        principal = %input.principal,
        rate_pct = %input.annual_rate_percent,
        months = n,
        payment = %monthly_payment,
        residual = %balance,
        "loan schedule built"
    );

    let total_payment = checked_or_reject(
        input.principal.checked_add(total_interest),
        RATE_FIELD,
        "total payment",
    )?;

    let schedule = LoanSchedule {
        monthly_payment,
        total_interest,
        total_payment,
        number_of_payments: n,
        residual_balance: balance,
        periods,
    };

    let assumptions = serde_json::json!({
        "monthly_rate": monthly_rate.to_string(),
        "payments": n,
        "compounding": "monthly, nominal annual rate / 12",
        "zero_rate": "principal / payments",
    });

    Ok(with_metadata(
        "Equal total-payment amortization (annuity method)",
        &assumptions,
        warnings,
        schedule,
    ))
}

/// First month plus the last month of every year: the granularity the
/// repayment chart plots. Reuses the computed rows as-is.
pub fn annual_checkpoints(schedule: &LoanSchedule) -> Vec<LoanPeriod> {
    schedule
        .periods
        .iter()
        .filter(|p| p.period == 1 || p.period % 12 == 0)
        .cloned()
        .collect()
}

fn validate_input(input: &LoanInput) -> SimCalcResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "principal".into(),
            reason: "Loan principal must be positive".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Interest rate cannot be negative".into(),
        });
    }
    if input.term_years == 0 {
        return Err(SimCalcError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if input.term_years > MAX_TERM_YEARS {
        return Err(SimCalcError::InvalidInput {
            field: "term_years".into(),
            reason: format!("Term must not exceed {MAX_TERM_YEARS} years"),
        });
    }
    Ok(())
}
