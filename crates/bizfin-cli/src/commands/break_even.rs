use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use bizfin_core::break_even::{self, BreakEvenInput, BreakEvenMode, ProfitTarget};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Standard,
    FindPrice,
    FindUnits,
    ProfitTarget,
}

impl From<ModeArg> for BreakEvenMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Standard => BreakEvenMode::Standard,
            ModeArg::FindPrice => BreakEvenMode::FindPrice,
            ModeArg::FindUnits => BreakEvenMode::FindUnits,
            ModeArg::ProfitTarget => BreakEvenMode::ProfitTarget,
        }
    }
}

/// Arguments for break-even analysis
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct BreakEvenArgs {
    /// Fixed costs for the period
    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    /// Variable cost per unit
    #[arg(long)]
    pub variable_cost: Option<Decimal>,

    /// Selling price per unit
    #[arg(long)]
    pub price: Option<Decimal>,

    /// What to solve for
    #[arg(long, value_enum, default_value = "standard")]
    pub mode: ModeArg,

    /// Target volume (find-price mode)
    #[arg(long)]
    pub target_units: Option<Decimal>,

    /// Target profit amount (profit-target mode)
    #[arg(long, conflicts_with = "target_profit_pct")]
    pub target_profit: Option<Decimal>,

    /// Target profit as a percentage of revenue, e.g. 20 (profit-target mode)
    #[arg(long)]
    pub target_profit_pct: Option<Decimal>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_break_even(args: BreakEvenArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let be_input: BreakEvenInput = match input::read_document(args.input.as_deref())? {
        Some(data) => serde_json::from_value(data)?,
        None => input_from_flags(&args)?,
    };

    let result = break_even::calculate_break_even(&be_input)?;
    Ok(serde_json::to_value(result)?)
}

fn input_from_flags(args: &BreakEvenArgs) -> Result<BreakEvenInput, Box<dyn std::error::Error>> {
    let target_profit = match (args.target_profit, args.target_profit_pct) {
        (Some(amount), _) => Some(ProfitTarget::Amount(amount)),
        (None, Some(pct)) => Some(ProfitTarget::Percentage(pct)),
        (None, None) => None,
    };

    Ok(BreakEvenInput {
        fixed_costs: args
            .fixed_costs
            .ok_or("--fixed-costs is required (or provide --input)")?,
        variable_cost_per_unit: args
            .variable_cost
            .ok_or("--variable-cost is required (or provide --input)")?,
        selling_price_per_unit: match args.mode {
            // solved for, so the flag may be omitted
            ModeArg::FindPrice => args.price.unwrap_or(Decimal::ZERO),
            _ => args.price.ok_or("--price is required (or provide --input)")?,
        },
        mode: args.mode.into(),
        target_units: args.target_units,
        target_profit,
    })
}
