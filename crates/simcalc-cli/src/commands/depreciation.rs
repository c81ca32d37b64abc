use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use simcalc_core::depreciation::schedule::{
    self, DepreciationInput, DepreciationMethod,
};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum MethodArg {
    /// Equal annual amounts
    Straight,
    /// 200% declining balance with switchover
    Declining,
}

impl From<MethodArg> for DepreciationMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Straight => DepreciationMethod::StraightLine,
            MethodArg::Declining => DepreciationMethod::DecliningBalance,
        }
    }
}

/// Arguments for a depreciation schedule
#[derive(Args)]
pub struct DepreciationArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Acquisition cost
    #[arg(long, default_value = "1000000")]
    pub cost: Decimal,

    /// Useful life in years (at least 2)
    #[arg(long, default_value_t = 5)]
    pub life: u32,

    /// Depreciation method
    #[arg(long, value_enum, default_value = "straight")]
    pub method: MethodArg,
}

pub fn run_depreciation(args: DepreciationArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dep_input: DepreciationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DepreciationInput {
            acquisition_cost: args.cost,
            useful_life_years: args.life,
            method: args.method.into(),
        }
    };

    let result = schedule::build_depreciation_schedule(&dep_input)?;
    Ok(serde_json::to_value(result)?)
}
