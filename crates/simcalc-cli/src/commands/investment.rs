use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use simcalc_core::investment::growth::{self, InvestmentInput};

use crate::input;

/// Arguments for an investment growth projection
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InvestmentArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Lump sum invested at the start
    #[arg(long, default_value = "1000000")]
    pub initial: Decimal,

    /// Amount added at the end of every month
    #[arg(long, default_value = "30000")]
    pub monthly: Decimal,

    /// Expected annual return in percent; may be negative
    #[arg(long, default_value = "5")]
    pub rate: Decimal,

    /// Investment horizon in years
    #[arg(long, default_value_t = 20)]
    pub years: u32,
}

pub fn run_investment(args: InvestmentArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inv_input: InvestmentInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        InvestmentInput {
            initial_amount: args.initial,
            monthly_contribution: args.monthly,
            annual_rate_percent: args.rate,
            years: args.years,
        }
    };

    let result = growth::project_investment(&inv_input)?;
    Ok(serde_json::to_value(result)?)
}
