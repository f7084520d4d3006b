use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::cash_flow::{ExpenseCategory, FixedExpenses, OneTimeExpenses, VariableExpenses};
use crate::error::{BizFinError, ValidationError};
use crate::types::*;
use crate::validation::{check_bounds, require_non_negative};
use crate::BizFinResult;

/// Input for a startup capital estimate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartupCostInput {
    #[serde(default)]
    pub one_time: OneTimeExpenses,
    #[serde(default)]
    pub fixed: FixedExpenses,
    #[serde(default)]
    pub variable: VariableExpenses,
    /// Months of operating costs to hold in reserve (default 6)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runway_months: Option<u32>,
    /// Buffer on top of the subtotal, in percent (default 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contingency_percentage: Option<Percent>,
    /// Cash already committed to the venture
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_funding: Option<Money>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupLineItem {
    pub category: String,
    pub name: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartupCostOutput {
    pub one_time_total: Money,
    pub monthly_operating_cost: Money,
    pub runway_months: u32,
    pub operating_reserve: Money,
    pub subtotal: Money,
    pub contingency: Money,
    pub total_required: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub funding_gap: Option<Money>,
    /// Months of operating cost the funding covers after launch costs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub months_covered: Option<Decimal>,
    /// Non-zero items, largest first
    pub line_items: Vec<StartupLineItem>,
}

const DEFAULT_RUNWAY_MONTHS: u32 = 6;
const DEFAULT_CONTINGENCY_PCT: Percent = dec!(10);

/// Capital needed to open the doors and run until revenue catches up.
pub fn estimate_startup_costs(
    input: &StartupCostInput,
) -> BizFinResult<ComputationOutput<StartupCostOutput>> {
    let mut warnings: Vec<String> = Vec::new();

    let runway_months = input.runway_months.unwrap_or(DEFAULT_RUNWAY_MONTHS);
    if runway_months == 0 {
        return Err(ValidationError::out_of_range(
            "runway_months",
            Decimal::ZERO,
            Some(Decimal::ONE),
            None,
        )
        .into());
    }
    let contingency_pct = input.contingency_percentage.unwrap_or(DEFAULT_CONTINGENCY_PCT);
    check_bounds(
        "contingency_percentage",
        contingency_pct,
        Some(Decimal::ZERO),
        Some(dec!(100)),
    )?;
    if let Some(funding) = input.available_funding {
        require_non_negative("available_funding", funding)?;
    }

    let mut line_items = Vec::new();
    collect_items(&input.one_time, &mut line_items)?;
    collect_items(&input.fixed, &mut line_items)?;
    collect_items(&input.variable, &mut line_items)?;
    line_items.retain(|item| !item.amount.is_zero());
    line_items.sort_by(|a, b| b.amount.cmp(&a.amount));

    let one_time_total = input.one_time.total()?;
    let monthly_operating_cost = checked_sum(
        "monthly_operating_cost",
        [input.fixed.total()?, input.variable.total()?],
    )?;
    let operating_reserve = checked_product(
        "operating_reserve",
        monthly_operating_cost,
        Decimal::from(runway_months),
    )?;
    let subtotal = checked_sum("subtotal", [one_time_total, operating_reserve])?;
    let contingency = subtotal * (contingency_pct / dec!(100));
    let total_required = checked_sum("total_required", [subtotal, contingency])?;

    let (funding_gap, months_covered) = match input.available_funding {
        Some(funding) => {
            let gap = (total_required - funding).max(Decimal::ZERO);
            if gap > Decimal::ZERO {
                warnings.push(format!("Available funding falls short by {gap}"));
            }
            let covered = if monthly_operating_cost.is_zero() {
                None
            } else {
                let months = (funding - one_time_total)
                    .checked_div(monthly_operating_cost)
                    .ok_or_else(|| BizFinError::overflow("months_covered"))?;
                Some(months.max(Decimal::ZERO))
            };
            (Some(gap), covered)
        }
        None => (None, None),
    };

    if one_time_total.is_zero() && monthly_operating_cost.is_zero() {
        warnings.push("No costs entered".into());
    }

    tracing::debug!(
        total_required = %total_required,
        runway_months,
        "startup costs estimated"
    );

    let output = StartupCostOutput {
        one_time_total,
        monthly_operating_cost,
        runway_months,
        operating_reserve,
        subtotal,
        contingency,
        total_required,
        funding_gap,
        months_covered,
        line_items,
    };

    Ok(with_metadata(
        "Startup capital: one-time costs + operating runway + contingency",
        input,
        warnings,
        output,
    ))
}

fn collect_items<C: ExpenseCategory>(category: &C, out: &mut Vec<StartupLineItem>) -> BizFinResult<()> {
    for (name, amount) in category.line_items() {
        require_non_negative(&format!("{}.{}", C::CATEGORY, name), amount)?;
        out.push(StartupLineItem {
            category: C::CATEGORY.to_string(),
            name,
            amount,
        });
    }
    Ok(())
}
