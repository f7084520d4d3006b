use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use bizfin_core::startup_costs::{self, StartupCostInput};

use crate::input;

/// Arguments for startup cost estimation
#[derive(Args)]
pub struct StartupCostArgs {
    /// Path to JSON file with one-time, fixed and variable expenses
    #[arg(long)]
    pub input: Option<String>,

    /// Months of operating costs to hold in reserve (overrides input)
    #[arg(long)]
    pub runway_months: Option<u32>,

    /// Contingency buffer in percent (overrides input)
    #[arg(long)]
    pub contingency: Option<Decimal>,

    /// Funding already secured (overrides input)
    #[arg(long)]
    pub funding: Option<Decimal>,
}

pub fn run_startup_costs(args: StartupCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut sc_input: StartupCostInput = input::require_document(args.input.as_deref(), "startup cost data")?;
    apply_overrides(&mut sc_input, &args);

    let result = startup_costs::estimate_startup_costs(&sc_input)?;
    Ok(serde_json::to_value(result)?)
}

fn apply_overrides(sc_input: &mut StartupCostInput, args: &StartupCostArgs) {
    if let Some(months) = args.runway_months {
        sc_input.runway_months = Some(months);
    }
    if let Some(pct) = args.contingency {
        sc_input.contingency_percentage = Some(pct);
    }
    if let Some(funding) = args.funding {
        sc_input.available_funding = Some(funding);
    }
}
