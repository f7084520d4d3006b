pub mod rebalance;
pub mod scenario;

pub use rebalance::rebalance_probabilities;
pub use scenario::{compute_expected, Scenario, ScenarioMetrics, ScenarioOutput, ScenarioResult};
