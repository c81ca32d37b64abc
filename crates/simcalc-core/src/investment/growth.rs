use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::SimCalcError;
use crate::numeric::{checked_or_reject, months_in};
use crate::time_value::monthly_rate_from_percent;
use crate::types::*;
use crate::SimCalcResult;

const MAX_YEARS: u32 = 100;

/// Input for a contribution-plus-compounding projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentInput {
    pub initial_amount: Money,
    pub monthly_contribution: Money,
    /// Annual nominal return as a percentage (5 = 5%); may be negative
    pub annual_rate_percent: Percent,
    pub years: u32,
}

/// Year-end checkpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentPeriod {
    pub year: u32,
    pub contributed_principal: Money,
    pub total_value: Money,
    pub investment_gain: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentProjection {
    pub final_value: Money,
    pub total_contributed: Money,
    pub total_gain: Money,
    pub periods: Vec<InvestmentPeriod>,
}

/// Compound monthly for `years * 12` months, contributing at the end of
/// each month, and record one checkpoint per completed year plus year 0.
pub fn project_investment(
    input: &InvestmentInput,
) -> SimCalcResult<ComputationOutput<InvestmentProjection>> {
    let mut warnings: Vec<String> = Vec::new();
    validate_input(input)?;

    let monthly_rate = monthly_rate_from_percent(input.annual_rate_percent);
    let growth = Decimal::ONE + monthly_rate;
    if growth <= Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "Monthly growth factor must stay positive (rate > -1200%)".into(),
        });
    }
    if input.annual_rate_percent < Decimal::ZERO {
        warnings.push("Negative return: projected value may fall below contributions".into());
    }
    let months = months_in(input.years)?;

    let mut balance = input.initial_amount;
    let mut contributed = input.initial_amount;
    let mut periods = Vec::with_capacity(input.years as usize + 1);
    periods.push(checkpoint(0, contributed, balance));

    for month in 1..=months {
        let grown = balance
            .checked_mul(growth)
            .and_then(|v| v.checked_add(input.monthly_contribution));
        balance = checked_or_reject(grown, "annual_rate_percent", "projected value")?;
        contributed = checked_or_reject(
            contributed.checked_add(input.monthly_contribution),
            "monthly_contribution",
            "contributed principal",
        )?;
        if month % 12 == 0 {
            periods.push(checkpoint(month / 12, contributed, balance));
        }
    }

    tracing::debug!(
        initial = %input.initial_amount,
        monthly = %input.monthly_contribution,
        rate_pct = %input.annual_rate_percent,
        years = input.years,
        final_value = %balance,
        "investment projection built"
    );

    let projection = InvestmentProjection {
        final_value: balance,
        total_contributed: contributed,
        total_gain: balance - contributed,
        periods,
    };

    let assumptions = serde_json::json!({
        "monthly_rate": monthly_rate.to_string(),
        "contribution_timing": "end of month",
        "adjustments": "none (nominal, pre-tax, no inflation)",
    });

    Ok(with_metadata(
        "Monthly compounding with level monthly contributions",
        &assumptions,
        warnings,
        projection,
    ))
}

fn checkpoint(year: u32, contributed: Money, value: Money) -> InvestmentPeriod {
    InvestmentPeriod {
        year,
        contributed_principal: contributed,
        total_value: value,
        investment_gain: value - contributed,
    }
}

fn validate_input(input: &InvestmentInput) -> SimCalcResult<()> {
    if input.initial_amount < Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "initial_amount".into(),
            reason: "cannot be negative".into(),
        });
    }
    if input.monthly_contribution < Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "cannot be negative".into(),
        });
    }
    if input.years == 0 || input.years > MAX_YEARS {
        return Err(SimCalcError::InvalidInput {
            field: "years".into(),
            reason: format!("must be between 1 and {MAX_YEARS}"),
        });
    }
    Ok(())
}
