pub mod config;
pub mod error;
pub mod types;
pub mod validation;

#[cfg(feature = "break_even")]
pub mod break_even;

#[cfg(feature = "valuation")]
pub mod valuation;

#[cfg(feature = "cash_flow")]
pub mod cash_flow;

#[cfg(feature = "scenarios")]
pub mod scenarios;

#[cfg(feature = "startup_costs")]
pub mod startup_costs;

pub use config::EngineConfig;
pub use error::{BizFinError, ValidationError};
pub use types::*;

/// Standard result type for all bizfin operations
pub type BizFinResult<T> = Result<T, BizFinError>;
