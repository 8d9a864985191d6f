//! Numeric engines: progressive tax, savings estimate and forecast.

pub mod common;
pub mod forecast;
pub mod savings;
pub mod tax;

pub use forecast::{ForecastEngine, compound};
pub use savings::SavingsEstimator;
pub use tax::{TaxTable, TaxTableError};
