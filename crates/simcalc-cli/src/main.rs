mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::cvp::BreakEvenArgs;
use commands::depreciation::DepreciationArgs;
use commands::investment::InvestmentArgs;
use commands::loan::LoanArgs;
use commands::reaction::{DensityArgs, RankArgs};

/// Depreciation, loan, investment, break-even and reaction-time calculators
#[derive(Parser)]
#[command(
    name = "simcalc",
    version,
    about = "Deterministic schedule generators for everyday finance calculators",
    long_about = "Builds depreciation schedules (straight-line and 200% declining balance), \
                  equal-payment loan amortization tables, compound investment projections, \
                  cost-volume-profit break-even points and normal-distribution reaction-time ranks. \
                  Input comes from --input, piped JSON on stdin, or flags."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a depreciation schedule to a 1-unit residual
    Depreciation(DepreciationArgs),
    /// Build an equal-payment loan amortization schedule
    Loan(LoanArgs),
    /// Project compound growth with monthly contributions
    Investment(InvestmentArgs),
    /// Compute the cost-volume-profit break-even point
    BreakEven(BreakEvenArgs),
    /// Sample revenue and total-cost lines around the break-even point
    CvpChart(BreakEvenArgs),
    /// Rank reaction times against a reference population
    ReactionRank(RankArgs),
    /// Sample the reference population's density curve
    DensityCurve(DensityArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    // stdout carries results; logs go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Depreciation(args) => commands::depreciation::run_depreciation(args),
        Commands::Loan(args) => commands::loan::run_loan(args),
        Commands::Investment(args) => commands::investment::run_investment(args),
        Commands::BreakEven(args) => commands::cvp::run_break_even(args),
        Commands::CvpChart(args) => commands::cvp::run_cvp_chart(args),
        Commands::ReactionRank(args) => commands::reaction::run_rank(args),
        Commands::DensityCurve(args) => commands::reaction::run_density(args),
        Commands::Version => {
            println!("simcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
