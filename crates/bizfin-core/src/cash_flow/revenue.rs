use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BizFinError;
use crate::types::{checked_product, checked_sum, Money, Rate};
use crate::BizFinResult;

/// Physical product line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductSales {
    #[serde(default)]
    pub name: String,
    /// Baseline units sold per month
    pub units_sold: Decimal,
    pub price_per_unit: Money,
    #[serde(default)]
    pub production_cost_per_unit: Money,
    /// Calendar month (1-12) to multiplier on baseline units; absent months are 1
    #[serde(default)]
    pub seasonality: BTreeMap<u32, Decimal>,
}

impl ProductSales {
    pub fn seasonal_factor(&self, month: u32) -> Decimal {
        self.seasonality.get(&month).copied().unwrap_or(Decimal::ONE)
    }

    pub fn revenue_for_month(&self, month: u32) -> BizFinResult<Money> {
        let units = checked_product("product_sales", self.units_sold, self.seasonal_factor(month))?;
        checked_product("product_sales", units, self.price_per_unit)
    }

    /// Production cost of the month's units. Reported, not expensed: the
    /// plan's variable expenses carry the operating cost.
    pub fn production_cost_for_month(&self, month: u32) -> BizFinResult<Money> {
        let units = checked_product("production_cost", self.units_sold, self.seasonal_factor(month))?;
        checked_product("production_cost", units, self.production_cost_per_unit)
    }
}

/// Billable services.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceIncome {
    #[serde(default)]
    pub name: String,
    /// Hourly rate or per-engagement price
    pub rate: Money,
    pub expected_volume_per_month: Decimal,
}

impl ServiceIncome {
    pub fn monthly_revenue(&self) -> BizFinResult<Money> {
        checked_product("service_income", self.rate, self.expected_volume_per_month)
    }
}

/// Recurring subscription plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRevenue {
    #[serde(default)]
    pub name: String,
    pub monthly_fee: Money,
    /// Subscribers at the start of the first period
    pub subscribers: Decimal,
    /// Fraction of subscribers lost per period, in [0, 1]
    pub churn_rate: Rate,
}

impl SubscriptionRevenue {
    /// Revenue billed to `subscribers` after the period's churn.
    pub fn revenue_for(&self, subscribers: Decimal) -> BizFinResult<Money> {
        let retained = checked_product("subscriptions", subscribers, Decimal::ONE - self.churn_rate)?;
        checked_product("subscriptions", self.monthly_fee, retained)
    }

    /// Subscriber count carried into the next period.
    pub fn next_subscribers(&self, previous: Decimal, acquisition_rate: Rate) -> BizFinResult<Decimal> {
        let retention = (Decimal::ONE - self.churn_rate)
            .checked_add(acquisition_rate)
            .ok_or_else(|| BizFinError::overflow("subscribers"))?;
        checked_product("subscribers", previous, retention)
    }
}

/// Royalty income on a licensee's volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicensingRoyalties {
    #[serde(default)]
    pub name: String,
    pub royalty_rate: Rate,
    /// Licensee sales volume (currency) per month
    pub expected_volume: Money,
}

impl LicensingRoyalties {
    pub fn monthly_revenue(&self) -> BizFinResult<Money> {
        checked_product("licensing", self.royalty_rate, self.expected_volume)
    }
}

/// Miscellaneous monthly income.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OtherRevenue {
    pub affiliate_income: Money,
    pub advertising_revenue: Money,
    pub grants_and_donations: Money,
}

impl OtherRevenue {
    pub fn monthly_revenue(&self) -> BizFinResult<Money> {
        checked_sum(
            "other",
            [self.affiliate_income, self.advertising_revenue, self.grants_and_donations],
        )
    }
}

/// Every revenue stream of a plan, grouped by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueStreams {
    pub product_sales: Vec<ProductSales>,
    pub service_income: Vec<ServiceIncome>,
    pub subscriptions: Vec<SubscriptionRevenue>,
    pub licensing: Vec<LicensingRoyalties>,
    pub other: OtherRevenue,
}

/// Revenue of one period split by stream kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevenueBreakdown {
    pub product_sales: Money,
    pub services: Money,
    pub subscriptions: Money,
    pub licensing: Money,
    pub other: Money,
}

impl RevenueBreakdown {
    pub fn total(&self) -> BizFinResult<Money> {
        checked_sum(
            "revenue",
            [self.product_sales, self.services, self.subscriptions, self.licensing, self.other],
        )
    }

    /// Same split with every component multiplied by `factor`.
    pub fn scaled(&self, factor: Decimal) -> BizFinResult<Self> {
        Ok(Self {
            product_sales: checked_product("product_sales", self.product_sales, factor)?,
            services: checked_product("service_income", self.services, factor)?,
            subscriptions: checked_product("subscriptions", self.subscriptions, factor)?,
            licensing: checked_product("licensing", self.licensing, factor)?,
            other: checked_product("other", self.other, factor)?,
        })
    }
}

impl RevenueStreams {
    /// Unscaled revenue for a calendar month, given each subscription's
    /// subscriber count for the period (same order as `subscriptions`).
    pub fn breakdown_for(&self, month: u32, subscribers: &[Decimal]) -> BizFinResult<RevenueBreakdown> {
        let product_sales = self
            .product_sales
            .iter()
            .map(|p| p.revenue_for_month(month))
            .collect::<BizFinResult<Vec<_>>>()?;
        let services = self
            .service_income
            .iter()
            .map(ServiceIncome::monthly_revenue)
            .collect::<BizFinResult<Vec<_>>>()?;
        let subscriptions = self
            .subscriptions
            .iter()
            .zip(subscribers)
            .map(|(s, count)| s.revenue_for(*count))
            .collect::<BizFinResult<Vec<_>>>()?;
        let licensing = self
            .licensing
            .iter()
            .map(LicensingRoyalties::monthly_revenue)
            .collect::<BizFinResult<Vec<_>>>()?;

        Ok(RevenueBreakdown {
            product_sales: checked_sum("product_sales", product_sales)?,
            services: checked_sum("service_income", services)?,
            subscriptions: checked_sum("subscriptions", subscriptions)?,
            licensing: checked_sum("licensing", licensing)?,
            other: self.other.monthly_revenue()?,
        })
    }

    pub fn production_cost_for(&self, month: u32) -> BizFinResult<Money> {
        let costs = self
            .product_sales
            .iter()
            .map(|p| p.production_cost_for_month(month))
            .collect::<BizFinResult<Vec<_>>>()?;
        checked_sum("production_cost", costs)
    }

    pub fn initial_subscribers(&self) -> Vec<Decimal> {
        self.subscriptions.iter().map(|s| s.subscribers).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn widget() -> ProductSales {
        ProductSales {
            name: "widget".into(),
            units_sold: dec!(100),
            price_per_unit: dec!(25),
            production_cost_per_unit: dec!(10),
            seasonality: BTreeMap::from([(12, dec!(1.5)), (1, dec!(0.5))]),
        }
    }

    #[test]
    fn test_seasonal_factor_applies() {
        let p = widget();
        assert_eq!(p.revenue_for_month(6).unwrap(), dec!(2500));
        assert_eq!(p.revenue_for_month(12).unwrap(), dec!(3750));
        assert_eq!(p.revenue_for_month(1).unwrap(), dec!(1250));
        assert_eq!(p.production_cost_for_month(12).unwrap(), dec!(1500));
    }

    #[test]
    fn test_subscription_churn() {
        let s = SubscriptionRevenue {
            name: "pro".into(),
            monthly_fee: dec!(10),
            subscribers: dec!(100),
            churn_rate: dec!(0.05),
        };
        assert_eq!(s.revenue_for(dec!(100)).unwrap(), dec!(950));
        // 100 * (1 - 0.05 + 0.20) = 115
        assert_eq!(s.next_subscribers(dec!(100), dec!(0.20)).unwrap(), dec!(115));
    }

    #[test]
    fn test_subscriber_overflow_is_an_error() {
        let s = SubscriptionRevenue {
            name: "pro".into(),
            monthly_fee: dec!(10),
            subscribers: Decimal::MAX,
            churn_rate: Decimal::ZERO,
        };
        assert!(matches!(
            s.next_subscribers(Decimal::MAX, dec!(0.20)),
            Err(BizFinError::InvalidInput { .. })
        ));
        assert!(s.revenue_for(Decimal::MAX).is_err());
    }

    #[test]
    fn test_breakdown_totals() {
        let streams = RevenueStreams {
            product_sales: vec![widget()],
            service_income: vec![ServiceIncome {
                name: "consulting".into(),
                rate: dec!(100),
                expected_volume_per_month: dec!(20),
            }],
            subscriptions: vec![],
            licensing: vec![LicensingRoyalties {
                name: "brand".into(),
                royalty_rate: dec!(0.05),
                expected_volume: dec!(10000),
            }],
            other: OtherRevenue {
                affiliate_income: dec!(100),
                advertising_revenue: dec!(50),
                grants_and_donations: Decimal::ZERO,
            },
        };
        let b = streams.breakdown_for(6, &[]).unwrap();
        assert_eq!(b.product_sales, dec!(2500));
        assert_eq!(b.services, dec!(2000));
        assert_eq!(b.licensing, dec!(500));
        assert_eq!(b.other, dec!(150));
        assert_eq!(b.total().unwrap(), dec!(5150));
        assert_eq!(b.scaled(dec!(2)).unwrap().total().unwrap(), dec!(10300));
    }
}
