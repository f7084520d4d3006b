pub mod break_even;
pub mod cash_flow;
pub mod scenarios;
pub mod startup_costs;
pub mod valuation;
pub mod validate;
