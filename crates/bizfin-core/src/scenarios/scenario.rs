use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BizFinError;
use crate::types::*;
use crate::validation::check_bounds;
use crate::BizFinResult;

/// Business metrics under one scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioMetrics {
    pub revenue: Money,
    pub costs: Money,
    /// Market share, in percent
    pub market_share: Percent,
    /// Customer growth, in percent
    pub customer_growth: Percent,
    pub operating_expenses: Money,
    /// Profit margin, in percent, as entered by the caller
    pub profit_margin: Percent,
}

/// A named scenario with its probability (0-100).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub metrics: ScenarioMetrics,
    pub probability: Percent,
}

impl Scenario {
    /// revenue - costs - operating expenses
    pub fn profit(&self) -> Money {
        self.metrics.revenue - self.metrics.costs - self.metrics.operating_expenses
    }

    /// probability as a fraction
    pub fn weight(&self) -> Rate {
        self.probability / dec!(100)
    }
}

/// Derived figures for a single scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub id: String,
    pub name: String,
    pub probability: Percent,
    pub weight: Rate,
    pub profit: Money,
    /// profit / revenue, in percent
    pub realized_margin: Percent,
    /// profit x weight
    pub weighted_profit: Money,
}

/// Output of scenario analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioOutput {
    pub scenarios: Vec<ScenarioResult>,
    pub expected_revenue: Money,
    pub expected_costs: Money,
    pub expected_operating_expenses: Money,
    pub expected_profit: Money,
    /// Unweighted min/max across scenarios
    pub market_share_range: ValueRange,
    /// Unweighted min/max across scenarios
    pub customer_growth_range: ValueRange,
    /// Sum of the probabilities as given
    pub total_probability: Percent,
}

/// Probability-weighted expectations across a scenario set.
///
/// Probabilities are used as given. A set that does not sum to 100 gets a
/// warning, not a renormalization.
pub fn compute_expected(scenarios: &[Scenario]) -> BizFinResult<ComputationOutput<ScenarioOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    if scenarios.is_empty() {
        return Err(BizFinError::InsufficientData(
            "At least one scenario required".into(),
        ));
    }

    for s in scenarios {
        check_bounds(
            &format!("scenario:{} probability", s.id),
            s.probability,
            Some(Decimal::ZERO),
            Some(dec!(100)),
        )?;
    }

    let total_probability: Percent = scenarios.iter().map(|s| s.probability).sum();
    if total_probability != dec!(100) {
        warnings.push(format!(
            "Probabilities sum to {total_probability}, not 100; expected values are not renormalized"
        ));
    }

    let mut expected_revenue = Decimal::ZERO;
    let mut expected_costs = Decimal::ZERO;
    let mut expected_operating_expenses = Decimal::ZERO;
    let mut expected_profit = Decimal::ZERO;
    let mut results = Vec::with_capacity(scenarios.len());

    for s in scenarios {
        let weight = s.weight();
        let profit = s.profit();
        expected_revenue += s.metrics.revenue * weight;
        expected_costs += s.metrics.costs * weight;
        expected_operating_expenses += s.metrics.operating_expenses * weight;
        expected_profit += profit * weight;

        let realized_margin = if s.metrics.revenue.is_zero() {
            Decimal::ZERO
        } else {
            profit / s.metrics.revenue * dec!(100)
        };

        results.push(ScenarioResult {
            id: s.id.clone(),
            name: s.name.clone(),
            probability: s.probability,
            weight,
            profit,
            realized_margin,
            weighted_profit: profit * weight,
        });
    }

    let range_of = |f: fn(&Scenario) -> Decimal| {
        ValueRange::spanning(scenarios.iter().map(f)).ok_or_else(|| {
            BizFinError::InsufficientData("At least one scenario required".into())
        })
    };
    let market_share_range = range_of(|s| s.metrics.market_share)?;
    let customer_growth_range = range_of(|s| s.metrics.customer_growth)?;

    tracing::debug!(
        scenarios = scenarios.len(),
        expected_revenue = %expected_revenue,
        expected_profit = %expected_profit,
        "scenario expectations computed"
    );

    let output = ScenarioOutput {
        scenarios: results,
        expected_revenue,
        expected_costs,
        expected_operating_expenses,
        expected_profit,
        market_share_range,
        customer_growth_range,
        total_probability,
    };

    Ok(with_metadata(
        "Probability-weighted scenario analysis",
        &serde_json::json!({
            "num_scenarios": scenarios.len(),
            "total_probability": total_probability.to_string(),
        }),
        warnings,
        output,
    ))
}
