//! The [`PlanEngine`] façade ties the catalog, the tax table and the engine
//! configuration together.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::{ForecastEngine, SavingsEstimator, TaxTable};
use crate::catalog::{CatalogError, CatalogSource, EmbeddedCatalog, StrategyCatalog};
use crate::config::EngineConfig;
use crate::eligibility::{DerivedFacts, build_stack};
use crate::models::{ForecastInputs, ForecastResult, Profile, SavingsEstimate, StrategyStack};

/// Strategy whose selection gives an LLC C-corp tax status.
pub const LLC_CCORP_ELECTION_ID: &str = "llc-c-corp-election";

/// Returns the profile that results from adopting a strategy, if adopting it
/// changes anything the engine evaluates.
///
/// Only the LLC C-corp election has such an effect: it marks the profile as
/// having elected C-corp taxation, which unlocks C-corp-gated strategies on
/// the next evaluation. The input profile is left untouched.
pub fn apply_strategy_effect(
    strategy_id: &str,
    profile: &Profile,
) -> Option<Profile> {
    if strategy_id != LLC_CCORP_ELECTION_ID {
        return None;
    }

    tracing::info!(strategy = strategy_id, "applying C-corp election to profile");
    Some(Profile {
        ccorp_election: true,
        ..profile.clone()
    })
}

/// Tax, savings band and projection for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastReport {
    pub taxable_income: Decimal,
    pub tax_liability: Decimal,
    pub savings: SavingsEstimate,
    pub average_savings_percent: Decimal,
    pub forecast: ForecastResult,
}

/// Both engine outputs for one profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanReport {
    pub catalog_version: String,
    pub derived_facts: DerivedFacts,
    pub strategy_stack: StrategyStack,
    pub quantified_annual_savings: Decimal,
    pub forecast: ForecastReport,
}

#[derive(Debug, Clone)]
pub struct PlanEngine {
    catalog: StrategyCatalog,
    tax_table: TaxTable,
    config: EngineConfig,
}

impl PlanEngine {
    pub fn new(
        catalog: StrategyCatalog,
        tax_table: TaxTable,
        config: EngineConfig,
    ) -> Self {
        Self {
            catalog,
            tax_table,
            config,
        }
    }

    /// Engine over the embedded catalog, the default bracket table and the
    /// default configuration.
    pub fn with_defaults() -> Result<Self, CatalogError> {
        Ok(Self::new(
            EmbeddedCatalog.load()?,
            TaxTable::default(),
            EngineConfig::default(),
        ))
    }

    pub fn catalog(&self) -> &StrategyCatalog {
        &self.catalog
    }

    pub fn tax_table(&self) -> &TaxTable {
        &self.tax_table
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn derived_facts(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> DerivedFacts {
        DerivedFacts::compute(profile, &inputs.normalized())
    }

    pub fn strategy_stack(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> StrategyStack {
        let inputs = inputs.normalized();
        let facts = DerivedFacts::compute(profile, &inputs);
        build_stack(&self.catalog, profile, &inputs, &facts)
    }

    /// Representative income of the profile's bucket, or the configured
    /// default when the bucket is unanswered.
    pub fn taxable_income(
        &self,
        profile: &Profile,
    ) -> Decimal {
        profile
            .income_range
            .map(|range| range.representative_value())
            .unwrap_or(self.config.default_taxable_income)
    }

    pub fn tax_liability(
        &self,
        profile: &Profile,
    ) -> Decimal {
        self.tax_table.compute_tax(self.taxable_income(profile))
    }

    pub fn savings_estimate(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> SavingsEstimate {
        SavingsEstimator::new(&self.config.savings).estimate(
            profile,
            &inputs.normalized(),
            self.tax_liability(profile),
        )
    }

    pub fn forecast(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> ForecastReport {
        let inputs = inputs.normalized();
        let taxable_income = self.taxable_income(profile);
        let tax_liability = self.tax_table.compute_tax(taxable_income);
        let savings = SavingsEstimator::new(&self.config.savings).estimate(
            profile,
            &inputs,
            tax_liability,
        );
        let average_savings_percent = savings.average_percent();
        let forecast = ForecastEngine::new(&self.config.forecast).project(
            tax_liability,
            average_savings_percent,
            &inputs,
        );

        ForecastReport {
            taxable_income,
            tax_liability,
            savings,
            average_savings_percent,
            forecast,
        }
    }

    pub fn plan(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> PlanReport {
        let inputs = inputs.normalized();
        let derived_facts = DerivedFacts::compute(profile, &inputs);
        let strategy_stack = build_stack(&self.catalog, profile, &inputs, &derived_facts);

        PlanReport {
            catalog_version: self.catalog.version().to_string(),
            derived_facts,
            quantified_annual_savings: strategy_stack.quantified_annual_savings(),
            strategy_stack,
            forecast: self.forecast(profile, &inputs),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::{EntityStructure, IncomeRange, IncomeType};

    fn engine() -> PlanEngine {
        PlanEngine::with_defaults().unwrap()
    }

    // =========================================================================
    // apply_strategy_effect tests
    // =========================================================================

    #[test]
    fn ccorp_election_sets_flag_on_copy() {
        let mut profile = Profile::new(IncomeType::BusinessOwner, Some(IncomeRange::From500KTo1M));
        profile.entity_structure = EntityStructure::Llc;

        let updated = apply_strategy_effect(LLC_CCORP_ELECTION_ID, &profile).unwrap();

        assert!(updated.ccorp_election);
        assert!(updated.has_ccorp_tax_status());
        assert!(!profile.ccorp_election);
    }

    #[test]
    fn other_strategies_have_no_effect() {
        let profile = Profile::new(IncomeType::BusinessOwner, None);

        assert_eq!(apply_strategy_effect("mso-strategy", &profile), None);
    }

    #[test]
    fn ccorp_election_unlocks_split_dollar() {
        let engine = engine();
        let mut profile = Profile::new(IncomeType::BusinessOwner, Some(IncomeRange::From1MTo5M));
        profile.entity_structure = EntityStructure::Llc;
        profile.has_business_partners = Some(false);
        let inputs = ForecastInputs::default();

        let before = engine.strategy_stack(&profile, &inputs);
        let elected = apply_strategy_effect(LLC_CCORP_ELECTION_ID, &profile).unwrap();
        let after = engine.strategy_stack(&elected, &inputs);

        assert!(before.find("split-dollar").unwrap().is_suppressed());
        assert!(after.find("split-dollar").unwrap().is_eligible());
        assert!(before.find(LLC_CCORP_ELECTION_ID).unwrap().is_eligible());
        assert!(after.find(LLC_CCORP_ELECTION_ID).is_none());
    }

    // =========================================================================
    // tax and forecast tests
    // =========================================================================

    #[test]
    fn tax_liability_uses_default_income_without_range() {
        let engine = engine();
        let profile = Profile::new(IncomeType::W2Employee, None);

        assert_eq!(engine.taxable_income(&profile), dec!(350000));
        assert_eq!(engine.tax_liability(&profile), dec!(92874.75));
    }

    #[test]
    fn forecast_report_uses_band_midpoint() {
        let engine = engine();
        let mut profile = Profile::new(IncomeType::W2Employee, Some(IncomeRange::Under200K));
        profile.entity_structure = EntityStructure::Llc;
        let inputs = ForecastInputs {
            forecast_years: 10,
            reinvest_savings: false,
            ..Default::default()
        };

        let report = engine.forecast(&profile, &inputs);

        assert_eq!(report.tax_liability, dec!(29042.50));
        assert_eq!(report.average_savings_percent, dec!(15));
        // 29042.50 * 15%
        assert_eq!(report.forecast.annual_tax_savings, dec!(4356.38));
        assert_eq!(report.forecast.total_value, dec!(43563.75));
    }

    #[test]
    fn plan_embeds_catalog_version() {
        let engine = engine();
        let profile = Profile::new(IncomeType::BusinessOwner, Some(IncomeRange::From1MTo5M));

        let report = engine.plan(&profile, &ForecastInputs::default());

        assert_eq!(report.catalog_version, engine.catalog().version());
        assert_eq!(report.strategy_stack.catalog_version, engine.catalog().version());
        assert_eq!(
            report.quantified_annual_savings,
            report.strategy_stack.quantified_annual_savings()
        );
    }
}
