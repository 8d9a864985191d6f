pub mod calculations;
pub mod catalog;
pub mod config;
pub mod eligibility;
pub mod engine;
pub mod models;

pub use catalog::{
    CatalogError, CatalogSource, EmbeddedCatalog, ExactVersion, StalenessPolicy, StrategyCatalog,
};
pub use config::{ConfigError, EngineConfig};
pub use engine::{
    ForecastReport, LLC_CCORP_ELECTION_ID, PlanEngine, PlanReport, apply_strategy_effect,
};
pub use models::*;
