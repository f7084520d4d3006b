use bizfin_core::error::BizFinError;
use bizfin_core::scenarios::{
    compute_expected, rebalance_probabilities, Scenario, ScenarioMetrics,
};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn scenario(id: &str, revenue: Decimal, costs: Decimal, probability: Decimal) -> Scenario {
    Scenario {
        id: id.into(),
        name: id.to_uppercase(),
        metrics: ScenarioMetrics {
            revenue,
            costs,
            market_share: dec!(3),
            customer_growth: dec!(12),
            operating_expenses: dec!(10000),
            profit_margin: dec!(15),
        },
        probability,
    }
}

fn launch_plan() -> Vec<Scenario> {
    vec![
        scenario("pessimistic", dec!(80000), dec!(60000), dec!(20)),
        scenario("realistic", dec!(120000), dec!(75000), dec!(50)),
        scenario("optimistic", dec!(200000), dec!(110000), dec!(30)),
    ]
}

// ===========================================================================
// Expected values
// ===========================================================================

#[test]
fn test_launch_plan_expectations() {
    let out = compute_expected(&launch_plan()).unwrap();
    let r = &out.result;
    // 0.2*80000 + 0.5*120000 + 0.3*200000
    assert_eq!(r.expected_revenue, dec!(136000));
    // 0.2*60000 + 0.5*75000 + 0.3*110000
    assert_eq!(r.expected_costs, dec!(82500));
    assert_eq!(r.expected_operating_expenses, dec!(10000));
    assert_eq!(r.expected_profit, dec!(43500));
    assert_eq!(r.total_probability, dec!(100));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_per_scenario_results() {
    let out = compute_expected(&launch_plan()).unwrap();
    let pessimistic = &out.result.scenarios[0];
    assert_eq!(pessimistic.profit, dec!(10000));
    assert_eq!(pessimistic.weight, dec!(0.2));
    assert_eq!(pessimistic.weighted_profit, dec!(2000));
    assert_eq!(pessimistic.realized_margin, dec!(12.5));
}

#[test]
fn test_scenarios_from_json() {
    let scenarios: Vec<Scenario> = serde_json::from_str(
        r#"[{
            "id": "base",
            "name": "Base",
            "probability": "100",
            "metrics": {
                "revenue": "1000", "costs": "400", "market_share": "2",
                "customer_growth": "5", "operating_expenses": "100", "profit_margin": "50"
            }
        }]"#,
    )
    .unwrap();
    let out = compute_expected(&scenarios).unwrap();
    assert_eq!(out.result.expected_profit, dec!(500));
}

#[test]
fn test_no_scenarios() {
    assert!(matches!(
        compute_expected(&[]).unwrap_err(),
        BizFinError::InsufficientData(_)
    ));
}

// ===========================================================================
// Rebalancing
// ===========================================================================

#[test]
fn test_rebalance_then_expect() {
    let rebalanced = rebalance_probabilities(&launch_plan(), "optimistic", dec!(50)).unwrap();
    // remaining 50 split 20:50
    assert_eq!(rebalanced[0].probability, dec!(14.29));
    assert_eq!(rebalanced[1].probability, dec!(35.71));
    assert_eq!(rebalanced[2].probability, dec!(50));
    let out = compute_expected(&rebalanced).unwrap();
    assert_eq!(out.result.total_probability, dec!(100));
    assert!(out.warnings.is_empty());
}

#[test]
fn test_rebalance_to_certainty() {
    let rebalanced = rebalance_probabilities(&launch_plan(), "realistic", dec!(100)).unwrap();
    assert_eq!(rebalanced[0].probability, Decimal::ZERO);
    assert_eq!(rebalanced[2].probability, Decimal::ZERO);
    let out = compute_expected(&rebalanced).unwrap();
    assert_eq!(out.result.expected_revenue, dec!(120000));
}
