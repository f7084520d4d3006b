use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bizfin_core::cash_flow::{self, CashFlowData};
use bizfin_core::EngineConfig;

use crate::input;

/// Arguments for cash-flow projection
#[derive(Args)]
pub struct CashFlowArgs {
    /// Path to JSON file with revenue streams, expenses and growth parameters
    #[arg(long)]
    pub input: Option<String>,

    /// Number of monthly periods to project
    #[arg(long, default_value = "12")]
    pub periods: u32,

    /// New subscribers per period as a fraction of the previous count
    /// (overrides config; a value in the input document wins over both)
    #[arg(long)]
    pub acquisition_rate: Option<Decimal>,
}

pub fn run_cash_flow(
    args: CashFlowArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let document = input::read_document(args.input.as_deref())?.ok_or(
        "cash-flow data required: pass --input <file> or pipe JSON on stdin",
    )?;
    let data = CashFlowData::from_json(document)?;

    let mut defaults = config.projection.clone();
    if let Some(rate) = args.acquisition_rate {
        defaults.customer_acquisition_rate = rate;
    }

    let result = cash_flow::project_cash_flows(&data, args.periods, &defaults)?;
    Ok(serde_json::to_value(result)?)
}
