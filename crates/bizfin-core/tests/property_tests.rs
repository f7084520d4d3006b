//! Property tests for the calculators: exactness of break-even, DCF
//! monotonicity, cumulative cash flow consistency, determinism, and
//! probability rebalancing.

use bizfin_core::break_even::{calculate_break_even, BreakEvenInput, BreakEvenMode};
use bizfin_core::cash_flow::{project_cash_flows, CashFlowData, GrowthModel, ServiceIncome};
use bizfin_core::config::ProjectionDefaults;
use bizfin_core::scenarios::{rebalance_probabilities, Scenario, ScenarioMetrics};
use bizfin_core::valuation::dcf::discounted_cash_flow;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cents(v: u32) -> Decimal {
    Decimal::from(v) / dec!(100)
}

fn scenario(i: usize, probability: Decimal) -> Scenario {
    Scenario {
        id: format!("s{i}"),
        name: format!("Scenario {i}"),
        metrics: ScenarioMetrics {
            revenue: dec!(1000),
            costs: dec!(600),
            market_share: dec!(1),
            customer_growth: dec!(1),
            operating_expenses: dec!(100),
            profit_margin: dec!(30),
        },
        probability,
    }
}

fn model_strategy() -> impl Strategy<Value = GrowthModel> {
    prop_oneof![
        Just(GrowthModel::Linear),
        Just(GrowthModel::Exponential),
        Just(GrowthModel::Seasonal),
    ]
}

fn plan(monthly_revenue: Decimal, rent: Decimal, growth_pct: u32, model: GrowthModel) -> CashFlowData {
    let mut data = CashFlowData::default();
    data.revenue.service_income.push(ServiceIncome {
        name: "work".into(),
        rate: monthly_revenue,
        expected_volume_per_month: Decimal::ONE,
    });
    data.expenses.fixed.rent = rent;
    data.growth.revenue_growth_rate = Decimal::from(growth_pct);
    data.growth.expense_growth_rate = Decimal::from(growth_pct) / dec!(2);
    data.growth.model = model;
    data
}

proptest! {
    #[test]
    fn break_even_units_recover_fixed_costs(
        fixed_cents in 0u32..100_000_000,
        variable_cents in 0u32..1_000_000,
        margin_cents in 1u32..1_000_000,
    ) {
        let fixed = cents(fixed_cents);
        let variable = cents(variable_cents);
        let input = BreakEvenInput {
            fixed_costs: fixed,
            variable_cost_per_unit: variable,
            selling_price_per_unit: variable + cents(margin_cents),
            mode: BreakEvenMode::Standard,
            target_units: None,
            target_profit: None,
        };
        let out = calculate_break_even(&input).unwrap();
        let units = out.result.break_even_units.unwrap();
        let recovered = units * out.result.contribution_margin;
        prop_assert!((recovered - fixed).abs() < dec!(0.000001));
    }

    #[test]
    fn dcf_increases_with_cash_flow(
        base in 1u32..10_000_000,
        bump in 1u32..1_000_000,
        growth in 0u32..8,
        years in 1u32..15,
    ) {
        let g = Decimal::from(growth);
        let low = discounted_cash_flow(Decimal::from(base), g, dec!(0.10), years).unwrap();
        let high = discounted_cash_flow(Decimal::from(base + bump), g, dec!(0.10), years).unwrap();
        prop_assert!(low.value > Decimal::ZERO);
        prop_assert!(high.value > low.value);
        prop_assert_eq!(low.years.len(), years as usize);
    }

    #[test]
    fn cumulative_is_running_sum(
        revenue_cents in 0u32..10_000_000,
        rent_cents in 0u32..10_000_000,
        growth in 0u32..30,
        periods in 1u32..60,
        model in model_strategy(),
    ) {
        let data = plan(cents(revenue_cents), cents(rent_cents), growth, model);
        let out = project_cash_flows(&data, periods, &ProjectionDefaults::default()).unwrap();
        let rows = &out.result.projections;
        prop_assert_eq!(rows.len(), periods as usize);

        let mut running = Decimal::ZERO;
        for row in rows {
            prop_assert_eq!(row.net_cash_flow, row.revenue - row.expenses);
            running += row.net_cash_flow;
            prop_assert_eq!(row.cumulative_cash_flow, running);
        }
        prop_assert_eq!(out.result.totals.net_cash_flow, running);
    }

    #[test]
    fn projection_is_deterministic(
        revenue_cents in 0u32..10_000_000,
        rent_cents in 0u32..10_000_000,
        growth in 0u32..30,
        periods in 1u32..36,
        model in model_strategy(),
    ) {
        let data = plan(cents(revenue_cents), cents(rent_cents), growth, model);
        let defaults = ProjectionDefaults::default();
        let first = serde_json::to_value(project_cash_flows(&data, periods, &defaults).unwrap()).unwrap();
        let second = serde_json::to_value(project_cash_flows(&data, periods, &defaults).unwrap()).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn rebalanced_probabilities_sum_to_hundred(
        weights in prop::collection::vec(0u32..10_000, 2..8),
        pick in any::<prop::sample::Index>(),
        new_value_bps in 0u32..=10_000,
    ) {
        let total: u32 = weights.iter().sum();
        let scenarios: Vec<Scenario> = weights
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let p = if total == 0 {
                    Decimal::ZERO
                } else {
                    (Decimal::from(*w) * dec!(100) / Decimal::from(total)).round_dp(2)
                };
                scenario(i, p.min(dec!(100)))
            })
            .collect();
        let changed = pick.index(scenarios.len());
        let new_value = Decimal::from(new_value_bps) / dec!(100);

        let out = rebalance_probabilities(&scenarios, &scenarios[changed].id, new_value).unwrap();
        let sum: Decimal = out.iter().map(|s| s.probability).sum();
        prop_assert_eq!(sum, dec!(100));
        prop_assert_eq!(out[changed].probability, new_value);
        prop_assert!(out.iter().all(|s| s.probability >= Decimal::ZERO));
    }
}
