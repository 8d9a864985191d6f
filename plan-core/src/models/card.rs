use std::collections::HashMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::strategy::{
    Complexity, CtaTemplate, StrategyCategory, StrategyDefinition, StrategyMetadata,
};
use crate::catalog::{StalenessPolicy, StrategyCatalog};

/// Outcome of matching one strategy definition.
///
/// Suppression is checked first and short-circuits, so a suppressed strategy
/// is never also eligible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum EligibilityResult {
    Eligible,
    Suppressed { message: String },
    Ineligible,
}

impl EligibilityResult {
    pub fn is_eligible(&self) -> bool {
        matches!(self, Self::Eligible)
    }

    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppressed { .. })
    }
}

/// Cross-sell guidance attached to an eligible card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalCta {
    pub message: String,
    pub action_label: String,
}

/// A classified strategy, ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyCard {
    pub id: String,
    pub title: String,
    pub category: StrategyCategory,
    pub result: EligibilityResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<Complexity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StrategyMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cta: Option<CtaTemplate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_cta: Option<ConditionalCta>,
    /// Savings taken from the catalog's quantified example.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantified_annual_savings: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projected_annual_savings: Option<Decimal>,
}

impl StrategyCard {
    pub fn new(
        definition: &StrategyDefinition,
        result: EligibilityResult,
    ) -> Self {
        Self {
            id: definition.id.clone(),
            title: definition.title.clone(),
            category: definition.category,
            result,
            complexity: Some(definition.complexity),
            metadata: definition.metadata.clone(),
            cta: definition.cta.clone(),
            conditional_cta: None,
            quantified_annual_savings: None,
            projected_annual_savings: None,
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.result.is_eligible()
    }

    pub fn is_suppressed(&self) -> bool {
        self.result.is_suppressed()
    }

    /// Keeps only id, title, category and the classification.
    pub fn into_summary(self) -> Self {
        Self {
            complexity: None,
            metadata: None,
            cta: None,
            conditional_cta: None,
            quantified_annual_savings: None,
            projected_annual_savings: None,
            ..self
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImplementationStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
}

/// Cards grouped into the three display categories, catalog order kept
/// within each group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStack {
    pub catalog_version: String,
    pub setup_structure: Vec<StrategyCard>,
    pub deduction_strategies: Vec<StrategyCard>,
    pub exit_planning: Vec<StrategyCard>,
}

impl StrategyStack {
    pub fn empty(catalog_version: impl Into<String>) -> Self {
        Self {
            catalog_version: catalog_version.into(),
            setup_structure: Vec::new(),
            deduction_strategies: Vec::new(),
            exit_planning: Vec::new(),
        }
    }

    pub fn category(
        &self,
        category: StrategyCategory,
    ) -> &[StrategyCard] {
        match category {
            StrategyCategory::SetupStructure => &self.setup_structure,
            StrategyCategory::DeductionStrategies => &self.deduction_strategies,
            StrategyCategory::ExitPlanning => &self.exit_planning,
        }
    }

    pub(crate) fn category_mut(
        &mut self,
        category: StrategyCategory,
    ) -> &mut Vec<StrategyCard> {
        match category {
            StrategyCategory::SetupStructure => &mut self.setup_structure,
            StrategyCategory::DeductionStrategies => &mut self.deduction_strategies,
            StrategyCategory::ExitPlanning => &mut self.exit_planning,
        }
    }

    /// Every card, in display order.
    pub fn cards(&self) -> impl Iterator<Item = &StrategyCard> {
        StrategyCategory::ALL
            .into_iter()
            .flat_map(move |category| self.category(category).iter())
    }

    pub fn eligible(&self) -> impl Iterator<Item = &StrategyCard> {
        self.cards().filter(|card| card.is_eligible())
    }

    pub fn suppressed(&self) -> impl Iterator<Item = &StrategyCard> {
        self.cards().filter(|card| card.is_suppressed())
    }

    pub fn find(
        &self,
        id: &str,
    ) -> Option<&StrategyCard> {
        self.cards().find(|card| card.id == id)
    }

    /// Sum of quantified example savings over eligible cards.
    pub fn quantified_annual_savings(&self) -> Decimal {
        self.eligible()
            .filter_map(|card| card.quantified_annual_savings)
            .sum()
    }

    /// Share of eligible strategies marked completed, as a whole percent.
    ///
    /// Suppressed cards are ignored. With no eligible strategies the
    /// progress is zero.
    pub fn implementation_progress(
        &self,
        statuses: &HashMap<String, ImplementationStatus>,
    ) -> Decimal {
        let eligible = self.eligible().count();
        if eligible == 0 {
            return Decimal::ZERO;
        }

        let completed = self
            .eligible()
            .filter(|card| statuses.get(&card.id) == Some(&ImplementationStatus::Completed))
            .count();

        (Decimal::from(completed) / Decimal::from(eligible) * dec!(100))
            .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }

    /// Whether this stack was built from a catalog the caller now considers
    /// outdated.
    pub fn is_stale<P>(
        &self,
        current: &StrategyCatalog,
        policy: &P,
    ) -> bool
    where
        P: StalenessPolicy + ?Sized,
    {
        policy.is_stale(&self.catalog_version, current.version())
    }
}
