mod card;
mod criteria;
mod forecast;
mod forecast_inputs;
mod profile;
mod strategy;
mod tax_bracket;

pub use card::{
    ConditionalCta, EligibilityResult, ImplementationStatus, StrategyCard, StrategyStack,
};
pub use criteria::{ConditionalCtaRule, CriteriaSet, Criterion, SuppressionRule, UserType};
pub use forecast::{ChartPoint, ForecastResult, Milestone, Range, SavingsEstimate};
pub use forecast_inputs::{
    DEFAULT_FORECAST_YEARS, DEFAULT_RETURN_RATE, ForecastInputs, MAX_FORECAST_YEARS,
    MIN_FORECAST_YEARS, RawForecastInputs,
};
pub use profile::{EntityStructure, IncomeRange, IncomeType, Profile, StrategyGoal};
pub use strategy::{
    Complexity, CtaTemplate, GlossaryTerm, QuantifiedExample, StrategyCategory,
    StrategyDefinition, StrategyMetadata,
};
pub use tax_bracket::TaxBracket;
