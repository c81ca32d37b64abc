use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use simcalc_core::cvp::break_even::{self, CvpInput};

use crate::input;

/// Arguments shared by the break-even and chart commands
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Fixed cost for the period
    #[arg(long, default_value = "1000000")]
    pub fixed_cost: Decimal,

    /// Selling price per unit
    #[arg(long, default_value = "1000")]
    pub price: Decimal,

    /// Variable cost per unit
    #[arg(long, default_value = "300")]
    pub variable_cost: Decimal,
}

impl BreakEvenArgs {
    fn to_input(&self) -> Result<CvpInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
        Ok(CvpInput {
            fixed_cost: self.fixed_cost,
            unit_price: self.price,
            unit_variable_cost: self.variable_cost,
        })
    }
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let result = break_even::calculate_break_even(&args.to_input()?)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cvp_chart(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let points = break_even::build_cvp_chart(&args.to_input()?)?;
    Ok(serde_json::to_value(points)?)
}
