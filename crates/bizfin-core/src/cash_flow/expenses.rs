use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{checked_sum, Money};
use crate::BizFinResult;

/// A named expense outside the fixed set of fields of its category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomExpense {
    pub name: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Monthly costs that do not move with volume.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedExpenses {
    pub rent: Money,
    pub salaries: Money,
    pub utilities: Money,
    pub insurance: Money,
    pub software: Money,
    pub custom: Vec<CustomExpense>,
}

/// Monthly costs that scale with activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariableExpenses {
    pub raw_materials: Money,
    pub packaging: Money,
    pub shipping: Money,
    pub sales_commissions: Money,
    pub marketing: Money,
    pub custom: Vec<CustomExpense>,
}

/// Launch costs paid once. Never part of a recurring period.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OneTimeExpenses {
    pub equipment: Money,
    pub legal_fees: Money,
    pub licenses_permits: Money,
    pub initial_inventory: Money,
    pub renovation: Money,
    pub custom: Vec<CustomExpense>,
}

/// Monthly debt service and lease commitments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialObligations {
    pub loan_payments: Money,
    pub interest_payments: Money,
    pub lease_payments: Money,
    pub custom: Vec<CustomExpense>,
}

/// Common view over the expense categories: named fields plus custom items.
pub trait ExpenseCategory {
    /// Category label used in breakdowns and error messages.
    const CATEGORY: &'static str;

    fn named_items(&self) -> Vec<(&'static str, Money)>;

    fn custom_items(&self) -> &[CustomExpense];

    fn total(&self) -> BizFinResult<Money> {
        let named = self.named_items().into_iter().map(|(_, v)| v);
        let custom = self.custom_items().iter().map(|c| c.amount);
        checked_sum(Self::CATEGORY, named.chain(custom))
    }

    /// Every item as (name, amount), named fields first.
    fn line_items(&self) -> Vec<(String, Money)> {
        let mut items: Vec<(String, Money)> = self
            .named_items()
            .into_iter()
            .map(|(name, amount)| (name.to_string(), amount))
            .collect();
        items.extend(self.custom_items().iter().map(|c| (c.name.clone(), c.amount)));
        items
    }

    /// First negative amount, reported as "category.item".
    fn first_negative(&self) -> Option<(String, Money)> {
        self.line_items()
            .into_iter()
            .find(|(_, amount)| *amount < Decimal::ZERO)
            .map(|(name, amount)| (format!("{}.{}", Self::CATEGORY, name), amount))
    }
}

impl ExpenseCategory for FixedExpenses {
    const CATEGORY: &'static str = "fixed";

    fn named_items(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("rent", self.rent),
            ("salaries", self.salaries),
            ("utilities", self.utilities),
            ("insurance", self.insurance),
            ("software", self.software),
        ]
    }

    fn custom_items(&self) -> &[CustomExpense] {
        &self.custom
    }
}

impl ExpenseCategory for VariableExpenses {
    const CATEGORY: &'static str = "variable";

    fn named_items(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("raw_materials", self.raw_materials),
            ("packaging", self.packaging),
            ("shipping", self.shipping),
            ("sales_commissions", self.sales_commissions),
            ("marketing", self.marketing),
        ]
    }

    fn custom_items(&self) -> &[CustomExpense] {
        &self.custom
    }
}

impl ExpenseCategory for OneTimeExpenses {
    const CATEGORY: &'static str = "one_time";

    fn named_items(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("equipment", self.equipment),
            ("legal_fees", self.legal_fees),
            ("licenses_permits", self.licenses_permits),
            ("initial_inventory", self.initial_inventory),
            ("renovation", self.renovation),
        ]
    }

    fn custom_items(&self) -> &[CustomExpense] {
        &self.custom
    }
}

impl ExpenseCategory for FinancialObligations {
    const CATEGORY: &'static str = "financial";

    fn named_items(&self) -> Vec<(&'static str, Money)> {
        vec![
            ("loan_payments", self.loan_payments),
            ("interest_payments", self.interest_payments),
            ("lease_payments", self.lease_payments),
        ]
    }

    fn custom_items(&self) -> &[CustomExpense] {
        &self.custom
    }
}

/// All expense categories of a plan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Expenses {
    pub fixed: FixedExpenses,
    pub variable: VariableExpenses,
    pub one_time: OneTimeExpenses,
    pub financial: FinancialObligations,
}

impl Expenses {
    /// Base monthly outflow before growth: fixed + variable + financial.
    pub fn recurring_monthly(&self) -> BizFinResult<Money> {
        checked_sum(
            "expenses",
            [self.fixed.total()?, self.variable.total()?, self.financial.total()?],
        )
    }

    pub fn one_time_total(&self) -> BizFinResult<Money> {
        self.one_time.total()
    }

    pub(crate) fn first_negative(&self) -> Option<(String, Money)> {
        self.fixed
            .first_negative()
            .or_else(|| self.variable.first_negative())
            .or_else(|| self.one_time.first_negative())
            .or_else(|| self.financial.first_negative())
    }
}
