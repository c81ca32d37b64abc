//! Cost-volume-profit break-even analysis.
//!
//! Units are whole: the break-even volume is rounded up to the first unit
//! count whose cumulative contribution margin covers the fixed cost.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::SimCalcError;
use crate::numeric::checked_or_reject;
use crate::types::*;
use crate::SimCalcResult;

/// Chart range extends this far past the break-even volume.
const CHART_HEADROOM: Decimal = dec!(1.5);
/// Target number of grid intervals on the chart.
const CHART_INTERVALS: Decimal = dec!(20);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CvpInput {
    pub fixed_cost: Money,
    pub unit_price: Money,
    pub unit_variable_cost: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvpResult {
    /// Whole units; always an integer value
    pub break_even_units: Decimal,
    pub break_even_revenue: Money,
    pub contribution_margin_per_unit: Money,
    /// Margin / price, in 0..1
    pub contribution_margin_ratio: Rate,
}

/// One sample of the revenue and total-cost lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvpChartPoint {
    pub units: Decimal,
    pub sales: Money,
    pub total_cost: Money,
    pub fixed_cost: Money,
    pub is_break_even: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Break-even volume, revenue and contribution margin ratio.
///
/// Returns [`SimCalcError::NoBreakEven`] when the price does not exceed the
/// variable cost; callers should surface that as a warning on the form.
pub fn calculate_break_even(input: &CvpInput) -> SimCalcResult<ComputationOutput<CvpResult>> {
    let mut warnings: Vec<String> = Vec::new();
    let result = solve(input)?;

    if input.fixed_cost.is_zero() {
        warnings.push("Fixed cost is zero; every unit sold is already profitable".into());
    }

    tracing::debug!(
        fixed = %input.fixed_cost,
        price = %input.unit_price,
        variable = %input.unit_variable_cost,
        units = %result.break_even_units,
        "break-even computed"
    );

    let assumptions = serde_json::json!({
        "units": "ceil(fixed_cost / (unit_price - unit_variable_cost))",
        "revenue": "break_even_units * unit_price",
        "cost_behaviour": "linear, constant unit price and variable cost",
    });

    Ok(with_metadata(
        "Cost-volume-profit break-even (whole units)",
        &assumptions,
        warnings,
        result,
    ))
}

/// Revenue and total-cost lines from zero to 1.5x the break-even volume in
/// about 20 steps, with the exact break-even point included and flagged.
pub fn build_cvp_chart(input: &CvpInput) -> SimCalcResult<Vec<CvpChartPoint>> {
    let result = solve(input)?;
    let bep_units = result.break_even_units;

    let max_units = checked_or_reject(
        bep_units.checked_mul(CHART_HEADROOM),
        "fixed_cost",
        "chart range",
    )?
    .ceil();
    let step = (max_units / CHART_INTERVALS).ceil().max(Decimal::ONE);

    let mut points = Vec::new();
    let mut units = Decimal::ZERO;
    while units <= max_units {
        points.push(chart_point(input, units, units == bep_units)?);
        match units.checked_add(step) {
            Some(next) => units = next,
            None => break,
        }
    }
    if !points.iter().any(|p| p.is_break_even) {
        points.push(chart_point(input, bep_units, true)?);
        points.sort_by(|a, b| a.units.cmp(&b.units));
    }

    Ok(points)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn solve(input: &CvpInput) -> SimCalcResult<CvpResult> {
    validate_input(input)?;

    let margin = input.unit_price - input.unit_variable_cost;
    if margin <= Decimal::ZERO {
        return Err(SimCalcError::NoBreakEven {
            unit_price: input.unit_price,
            unit_variable_cost: input.unit_variable_cost,
        });
    }

    let break_even_units = checked_or_reject(
        input.fixed_cost.checked_div(margin),
        "fixed_cost",
        "break-even volume",
    )?
    .ceil();
    let break_even_revenue = checked_or_reject(
        break_even_units.checked_mul(input.unit_price),
        "fixed_cost",
        "break-even revenue",
    )?;
    Ok(CvpResult {
        break_even_units,
        break_even_revenue,
        contribution_margin_per_unit: margin,
        contribution_margin_ratio: margin / input.unit_price,
    })
}

fn chart_point(
    input: &CvpInput,
    units: Decimal,
    is_break_even: bool,
) -> SimCalcResult<CvpChartPoint> {
    let sales = checked_or_reject(
        units.checked_mul(input.unit_price),
        "fixed_cost",
        "chart sales",
    )?;
    let total_cost = units
        .checked_mul(input.unit_variable_cost)
        .and_then(|variable| variable.checked_add(input.fixed_cost));
    Ok(CvpChartPoint {
        units,
        sales,
        total_cost: checked_or_reject(total_cost, "fixed_cost", "chart total cost")?,
        fixed_cost: input.fixed_cost,
        is_break_even,
    })
}

fn validate_input(input: &CvpInput) -> SimCalcResult<()> {
    if input.fixed_cost < Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "fixed_cost".into(),
            reason: "cannot be negative".into(),
        });
    }
    if input.unit_price <= Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "unit_price".into(),
            reason: "must be positive".into(),
        });
    }
    if input.unit_variable_cost < Decimal::ZERO {
        return Err(SimCalcError::InvalidInput {
            field: "unit_variable_cost".into(),
            reason: "cannot be negative".into(),
        });
    }
    Ok(())
}
