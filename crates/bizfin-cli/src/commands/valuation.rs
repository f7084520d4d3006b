use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use bizfin_core::config::ValuationAssumptions;
use bizfin_core::valuation::{self, FinancialMetrics};
use bizfin_core::EngineConfig;

use crate::input;

/// Arguments for business valuation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct ValuationArgs {
    /// Annual revenue
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Annual net income
    #[arg(long)]
    pub net_income: Option<Decimal>,

    /// Total assets
    #[arg(long)]
    pub assets: Option<Decimal>,

    /// Total liabilities
    #[arg(long)]
    pub liabilities: Option<Decimal>,

    /// Annual free cash flow
    #[arg(long)]
    pub cash_flow: Option<Decimal>,

    /// Expected annual growth in percent (e.g. 5 for 5%)
    #[arg(long)]
    pub growth_rate: Option<Decimal>,

    /// Revenue multiple for the market method (overrides config)
    #[arg(long)]
    pub revenue_multiple: Option<Decimal>,

    /// P/E ratio for the earnings method (overrides config)
    #[arg(long)]
    pub pe_ratio: Option<Decimal>,

    /// DCF discount rate as a decimal, e.g. 0.10 (overrides config)
    #[arg(long)]
    pub discount_rate: Option<Decimal>,

    /// Explicit DCF forecast years (overrides config)
    #[arg(long)]
    pub years: Option<u32>,

    /// Path to JSON input file (overrides metric flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Input document: the metrics, optionally with an `assumptions` object.
#[derive(Deserialize)]
struct ValuationRequest {
    #[serde(flatten)]
    metrics: FinancialMetrics,
    #[serde(default)]
    assumptions: Option<ValuationAssumptions>,
}

pub fn run_valuation(
    args: ValuationArgs,
    config: &EngineConfig,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (metrics, doc_assumptions) = match input::read_document(args.input.as_deref())? {
        Some(data) => {
            let request: ValuationRequest = serde_json::from_value(data)?;
            (request.metrics, request.assumptions)
        }
        None => (metrics_from_flags(&args)?, None),
    };

    let assumptions = resolve_assumptions(&args, doc_assumptions, config);
    let result = valuation::calculate_valuations(&metrics, &assumptions)?;
    Ok(serde_json::to_value(result)?)
}

fn metrics_from_flags(args: &ValuationArgs) -> Result<FinancialMetrics, Box<dyn std::error::Error>> {
    Ok(FinancialMetrics {
        revenue: args
            .revenue
            .ok_or("--revenue is required (or provide --input)")?,
        net_income: args
            .net_income
            .ok_or("--net-income is required (or provide --input)")?,
        assets: args.assets.ok_or("--assets is required (or provide --input)")?,
        liabilities: args.liabilities.unwrap_or(Decimal::ZERO),
        cash_flow: args
            .cash_flow
            .ok_or("--cash-flow is required (or provide --input)")?,
        growth_rate: args.growth_rate.unwrap_or(Decimal::ZERO),
    })
}

/// Flags beat the input document, which beats the config file.
fn resolve_assumptions(
    args: &ValuationArgs,
    from_document: Option<ValuationAssumptions>,
    config: &EngineConfig,
) -> ValuationAssumptions {
    let base = from_document.unwrap_or_else(|| config.valuation.clone());
    ValuationAssumptions {
        revenue_multiple: args.revenue_multiple.unwrap_or(base.revenue_multiple),
        pe_ratio: args.pe_ratio.unwrap_or(base.pe_ratio),
        discount_rate: args.discount_rate.unwrap_or(base.discount_rate),
        projection_years: args.years.unwrap_or(base.projection_years),
    }
}
