use bizfin_core::cash_flow::{project_cash_flows, CashFlowData, GrowthModel};
use bizfin_core::config::ProjectionDefaults;
use bizfin_core::error::{BizFinError, ValidationError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::json;

fn consultancy() -> CashFlowData {
    CashFlowData::from_json(json!({
        "revenue": {
            "service_income": [
                { "name": "advisory", "rate": "100", "expected_volume_per_month": "50" }
            ]
        },
        "expenses": {
            "fixed": { "rent": "2000", "salaries": "1000" },
            "one_time": { "equipment": "6000" }
        },
        "growth": { "model": "exponential" }
    }))
    .unwrap()
}

fn services_only(monthly: Decimal, model: &str, growth: Decimal) -> CashFlowData {
    CashFlowData::from_json(json!({
        "revenue": {
            "service_income": [
                { "rate": monthly.to_string(), "expected_volume_per_month": "1" }
            ]
        },
        "growth": { "model": model, "revenue_growth_rate": growth.to_string() }
    }))
    .unwrap()
}

// ===========================================================================
// Flat plan
// ===========================================================================

#[test]
fn test_flat_plan_monthly_rows() {
    let out = project_cash_flows(&consultancy(), 24, &ProjectionDefaults::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.projections.len(), 24);
    let first = &r.projections[0];
    assert_eq!(first.period, 1);
    assert_eq!(first.month, "Month 1");
    assert_eq!(first.revenue, dec!(5000));
    assert_eq!(first.expenses, dec!(3000));
    assert_eq!(first.net_cash_flow, dec!(2000));
    assert_eq!(r.projections[23].cumulative_cash_flow, dec!(48000));
}

#[test]
fn test_one_time_costs_drive_funding_need() {
    let out = project_cash_flows(&consultancy(), 24, &ProjectionDefaults::default()).unwrap();
    let r = &out.result;
    assert_eq!(r.first_cash_positive_period, Some(3));
    assert_eq!(r.peak_funding_requirement, dec!(6000));
    assert_eq!(r.totals.one_time_expenses, dec!(6000));
    assert_eq!(r.totals.net_after_one_time, dec!(42000));
}

#[test]
fn test_yearly_rollup() {
    let out = project_cash_flows(&consultancy(), 18, &ProjectionDefaults::default()).unwrap();
    let yearly = &out.result.yearly;
    assert_eq!(yearly.len(), 2);
    assert_eq!(yearly[0].periods, 12);
    assert_eq!(yearly[0].revenue, dec!(60000));
    assert_eq!(yearly[1].periods, 6);
    assert_eq!(yearly[1].closing_cumulative_cash_flow, dec!(36000));
}

// ===========================================================================
// Growth models
// ===========================================================================

#[test]
fn test_exponential_growth_compounds_yearly() {
    let data = services_only(dec!(1000), "exponential", dec!(10));
    let out = project_cash_flows(&data, 25, &ProjectionDefaults::default()).unwrap();
    let p = &out.result.projections;
    assert_eq!(p[11].revenue, dec!(1000));
    assert_eq!(p[12].revenue, dec!(1100));
    assert_eq!(p[24].revenue, dec!(1210));
}

#[test]
fn test_linear_growth_adds_fixed_step() {
    let data = services_only(dec!(1000), "linear", dec!(10));
    let out = project_cash_flows(&data, 25, &ProjectionDefaults::default()).unwrap();
    assert_eq!(out.result.projections[24].revenue, dec!(1200));
    assert_eq!(out.result.growth_model, GrowthModel::Linear);
}

#[test]
fn test_seasonal_repeats_first_year() {
    let data = services_only(dec!(1000), "seasonal", dec!(10));
    let out = project_cash_flows(&data, 25, &ProjectionDefaults::default()).unwrap();
    assert_eq!(out.result.projections[24].revenue, dec!(1000));
    assert!(out.warnings.iter().any(|w| w.contains("Seasonal")));
}

#[test]
fn test_seasonality_follows_calendar() {
    let data = CashFlowData::from_json(json!({
        "revenue": {
            "product_sales": [{
                "name": "wreaths",
                "units_sold": "10",
                "price_per_unit": "5",
                "seasonality": { "12": "2" }
            }]
        },
        "start_month": "2025-11-01"
    }))
    .unwrap();
    let out = project_cash_flows(&data, 3, &ProjectionDefaults::default()).unwrap();
    let p = &out.result.projections;
    assert_eq!(p[0].month, "Nov 2025");
    assert_eq!(p[0].revenue, dec!(50));
    assert_eq!(p[1].month, "Dec 2025");
    assert_eq!(p[1].revenue, dec!(100));
    assert_eq!(p[2].month, "Jan 2026");
}

// ===========================================================================
// Subscriptions
// ===========================================================================

#[test]
fn test_subscribers_churn_and_acquire() {
    let data = CashFlowData::from_json(json!({
        "revenue": {
            "subscriptions": [
                { "name": "pro", "monthly_fee": "10", "subscribers": "100", "churn_rate": "0.1" }
            ]
        }
    }))
    .unwrap();
    let out = project_cash_flows(&data, 2, &ProjectionDefaults::default()).unwrap();
    let p = &out.result.projections;
    // 10 * 100 * (1 - 0.1)
    assert_eq!(p[0].revenue, dec!(900));
    // 100 * (1 - 0.1 + 0.2)
    assert_eq!(p[1].subscribers, dec!(110));
    assert_eq!(p[1].revenue, dec!(990));
    assert_eq!(out.result.customer_acquisition_rate, dec!(0.20));
}

#[test]
fn test_acquisition_rate_override() {
    let data = CashFlowData::from_json(json!({
        "revenue": {
            "subscriptions": [
                { "monthly_fee": "10", "subscribers": "100", "churn_rate": "0" }
            ]
        },
        "growth": { "customer_acquisition_rate": "0" }
    }))
    .unwrap();
    let out = project_cash_flows(&data, 12, &ProjectionDefaults::default()).unwrap();
    assert!(out
        .result
        .projections
        .iter()
        .all(|p| p.subscribers == dec!(100)));
}

// ===========================================================================
// Error paths
// ===========================================================================

#[test]
fn test_zero_periods_rejected() {
    let err = project_cash_flows(&consultancy(), 0, &ProjectionDefaults::default()).unwrap_err();
    assert!(matches!(
        err,
        BizFinError::Validation(ValidationError::OutOfRange { .. })
    ));
}

#[test]
fn test_periods_above_cap_rejected() {
    let defaults = ProjectionDefaults {
        max_periods: 36,
        ..Default::default()
    };
    assert!(project_cash_flows(&consultancy(), 37, &defaults).is_err());
    assert!(project_cash_flows(&consultancy(), 36, &defaults).is_ok());
}

#[test]
fn test_wrong_type_is_malformed() {
    let err = CashFlowData::from_json(json!({
        "expenses": { "fixed": { "rent": [1, 2] } }
    }))
    .unwrap_err();
    assert!(matches!(err, BizFinError::MalformedCashFlowData(_)));
}

#[test]
fn test_negative_expense_is_malformed() {
    let err = CashFlowData::from_json_str(r#"{"expenses":{"variable":{"shipping":"-5"}}}"#)
        .unwrap_err();
    assert!(matches!(err, BizFinError::MalformedCashFlowData(_)));
}

#[test]
fn test_empty_plan_is_cash_neutral() {
    let out = project_cash_flows(&CashFlowData::default(), 6, &ProjectionDefaults::default())
        .unwrap();
    assert_eq!(out.result.totals.revenue, Decimal::ZERO);
    assert_eq!(out.result.first_cash_positive_period, Some(1));
}

#[test]
fn test_compounding_subscribers_overflow_is_an_error() {
    // 100 * 1.2^n passes the decimal range well before the period cap
    let data = CashFlowData::from_json(json!({
        "revenue": {
            "subscriptions": [
                { "monthly_fee": "10", "subscribers": "100", "churn_rate": "0" }
            ]
        }
    }))
    .unwrap();
    let defaults = ProjectionDefaults::default();
    let err = project_cash_flows(&data, defaults.max_periods, &defaults).unwrap_err();
    assert!(matches!(err, BizFinError::InvalidInput { .. }));
    assert!(project_cash_flows(&data, 120, &defaults).is_ok());
}

#[test]
fn test_negative_default_acquisition_rate_rejected() {
    let data = CashFlowData::from_json(json!({
        "revenue": {
            "subscriptions": [
                { "monthly_fee": "10", "subscribers": "100", "churn_rate": "0" }
            ]
        }
    }))
    .unwrap();
    let defaults = ProjectionDefaults {
        customer_acquisition_rate: dec!(-2),
        ..Default::default()
    };
    let err = project_cash_flows(&data, 3, &defaults).unwrap_err();
    match err {
        BizFinError::Validation(ValidationError::OutOfRange { field, value, .. }) => {
            assert_eq!(field, "customer_acquisition_rate");
            assert_eq!(value, dec!(-2));
        }
        other => panic!("unexpected error: {other}"),
    }
}
