use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::{json, Value};

use bizfin_core::scenarios::{self, Scenario};

use crate::input;

/// Arguments for scenario analysis
#[derive(Args)]
pub struct ScenariosArgs {
    /// Path to JSON file with the scenario set
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for probability rebalancing
#[derive(Args)]
pub struct RebalanceArgs {
    /// Path to JSON file with the scenario set
    #[arg(long)]
    pub input: Option<String>,

    /// Id of the scenario whose probability changes
    #[arg(long)]
    pub id: String,

    /// New probability in percent (0-100)
    #[arg(long)]
    pub probability: Decimal,

    /// Also compute expected values for the rebalanced set
    #[arg(long)]
    pub expected: bool,
}

/// Either a bare array or `{"scenarios": [...]}`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ScenarioDocument {
    List(Vec<Scenario>),
    Wrapped { scenarios: Vec<Scenario> },
}

impl ScenarioDocument {
    fn into_scenarios(self) -> Vec<Scenario> {
        match self {
            ScenarioDocument::List(s) | ScenarioDocument::Wrapped { scenarios: s } => s,
        }
    }
}

fn read_scenarios(path: Option<&str>) -> Result<Vec<Scenario>, Box<dyn std::error::Error>> {
    let doc: ScenarioDocument = input::require_document(path, "scenario set")?;
    Ok(doc.into_scenarios())
}

pub fn run_scenarios(args: ScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios = read_scenarios(args.input.as_deref())?;
    let result = scenarios::compute_expected(&scenarios)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_rebalance(args: RebalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios = read_scenarios(args.input.as_deref())?;
    let rebalanced = scenarios::rebalance_probabilities(&scenarios, &args.id, args.probability)?;

    if args.expected {
        let result = scenarios::compute_expected(&rebalanced)?;
        return Ok(json!({
            "scenarios": rebalanced,
            "expected": result,
        }));
    }

    let total: Decimal = rebalanced.iter().map(|s| s.probability).sum();
    Ok(json!({
        "scenarios": rebalanced,
        "total_probability": total,
    }))
}
