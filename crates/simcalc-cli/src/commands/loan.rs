use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use simcalc_core::loan::amortization::{self, LoanInput};

use crate::input;

/// Arguments for a loan amortization schedule
#[derive(Args)]
pub struct LoanArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long, default_value = "30000000")]
    pub principal: Decimal,

    /// Annual interest rate in percent (1.5 = 1.5%)
    #[arg(long, default_value = "1.5")]
    pub rate: Decimal,

    /// Repayment term in years
    #[arg(long, default_value_t = 35)]
    pub years: u32,

    /// Print only the first month and each year-end instead of every month
    #[arg(long)]
    pub annual: bool,
}

impl LoanArgs {
    fn to_input(&self) -> Result<LoanInput, Box<dyn std::error::Error>> {
        if let Some(ref path) = self.input {
            return input::file::read_json(path);
        }
        if let Some(data) = input::stdin::read_stdin()? {
            return Ok(serde_json::from_value(data)?);
        }
        Ok(LoanInput {
            principal: self.principal,
            annual_rate_percent: self.rate,
            term_years: self.years,
        })
    }
}

pub fn run_loan(args: LoanArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan_input = args.to_input()?;
    let mut output = amortization::build_loan_schedule(&loan_input)?;

    if args.annual {
        output.result.periods = amortization::annual_checkpoints(&output.result);
    }
    Ok(serde_json::to_value(output)?)
}
