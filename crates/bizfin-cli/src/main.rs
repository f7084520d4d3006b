mod commands;
mod config;
mod input;
mod output;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use commands::break_even::BreakEvenArgs;
use commands::cash_flow::CashFlowArgs;
use commands::scenarios::{RebalanceArgs, ScenariosArgs};
use commands::startup_costs::StartupCostArgs;
use commands::valuation::ValuationArgs;
use commands::validate::ValidateArgs;

/// Small-business financial modeling from the command line
#[derive(Parser)]
#[command(
    name = "bizfin",
    version,
    about = "Small-business financial modeling calculators",
    long_about = "Break-even analysis, multi-method business valuation, monthly cash-flow \
                  projection, probability-weighted scenario planning and startup cost \
                  estimates, computed with exact decimal arithmetic. Inputs are JSON \
                  documents passed with --input or piped on stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// TOML file with engine defaults (valuation multiples, acquisition rate)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate raw form values against a numeric rule
    Validate(ValidateArgs),
    /// Break-even units, price or units for a profit target
    BreakEven(BreakEvenArgs),
    /// Asset, market, earnings and DCF valuation with a summary range
    Valuation(ValuationArgs),
    /// Month-by-month cash-flow projection
    CashFlow(CashFlowArgs),
    /// Probability-weighted expected outcomes across scenarios
    Scenarios(ScenariosArgs),
    /// Set one scenario's probability and rebalance the others to 100
    Rebalance(RebalanceArgs),
    /// Capital needed to launch and run until revenue catches up
    StartupCosts(StartupCostArgs),
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

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let engine_config = match config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Validate(args) => commands::validate::run_validate(args),
        Commands::BreakEven(args) => commands::break_even::run_break_even(args),
        Commands::Valuation(args) => commands::valuation::run_valuation(args, &engine_config),
        Commands::CashFlow(args) => commands::cash_flow::run_cash_flow(args, &engine_config),
        Commands::Scenarios(args) => commands::scenarios::run_scenarios(args),
        Commands::Rebalance(args) => commands::scenarios::run_rebalance(args),
        Commands::StartupCosts(args) => commands::startup_costs::run_startup_costs(args),
        Commands::Version => {
            println!("bizfin {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
