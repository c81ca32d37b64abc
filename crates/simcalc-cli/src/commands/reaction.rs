use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use simcalc_core::reaction::percentile::{self, ReactionInput, ReferencePopulation};

use crate::input;

/// Arguments for ranking a set of reaction times
#[derive(Args)]
pub struct RankArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Comma-separated reaction times in ms (e.g. "312,290,305,331,298")
    #[arg(long, value_delimiter = ',')]
    pub samples: Option<Vec<u32>>,

    /// Reference population mean in ms
    #[arg(long, default_value = "350")]
    pub population_mean: Decimal,

    /// Reference population standard deviation in ms
    #[arg(long, default_value = "50")]
    pub population_sd: Decimal,
}

/// Arguments for sampling the reference bell curve
#[derive(Args)]
pub struct DensityArgs {
    /// Player's mean reaction time in ms; widens the window if far out
    #[arg(long, default_value = "350")]
    pub mean: Decimal,

    /// Reference population mean in ms
    #[arg(long, default_value = "350")]
    pub population_mean: Decimal,

    /// Reference population standard deviation in ms
    #[arg(long, default_value = "50")]
    pub population_sd: Decimal,
}

pub fn run_rank(args: RankArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rank_input: ReactionInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        ReactionInput {
            samples_ms: args
                .samples
                .ok_or("--samples is required (or provide --input)")?,
            population: ReferencePopulation {
                mean: args.population_mean,
                standard_deviation: args.population_sd,
            },
        }
    };

    let result = percentile::estimate_rank(&rank_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_density(args: DensityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let population = ReferencePopulation {
        mean: args.population_mean,
        standard_deviation: args.population_sd,
    };
    let curve = percentile::density_curve(&population, args.mean)?;
    Ok(serde_json::to_value(curve)?)
}
