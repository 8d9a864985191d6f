use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::criteria::{ConditionalCtaRule, CriteriaSet, SuppressionRule};

/// The three fixed display categories of a strategy stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StrategyCategory {
    #[serde(rename = "Setup & Structure")]
    SetupStructure,
    #[serde(rename = "Deduction Strategies")]
    DeductionStrategies,
    #[serde(rename = "Exit Planning")]
    ExitPlanning,
}

impl StrategyCategory {
    /// Display order.
    pub const ALL: [StrategyCategory; 3] = [
        Self::SetupStructure,
        Self::DeductionStrategies,
        Self::ExitPlanning,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SetupStructure => "Setup & Structure",
            Self::DeductionStrategies => "Deduction Strategies",
            Self::ExitPlanning => "Exit Planning",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Complexity {
    #[serde(alias = "low")]
    Beginner,
    #[serde(alias = "medium")]
    Intermediate,
    #[serde(alias = "high")]
    Advanced,
}

/// Worked example of what a strategy saves per year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantifiedExample {
    #[serde(default)]
    pub annual_savings: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    /// Savings path for qualified purchasers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualified_purchaser: Option<Box<QuantifiedExample>>,
    /// Savings path for accredited investors.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accredited_investor: Option<Box<QuantifiedExample>>,
}

impl QuantifiedExample {
    /// Annual savings for an investor with the given status.
    ///
    /// A flat `annualSavings` wins. Otherwise the qualified-purchaser path is
    /// used for qualified purchasers, the accredited path for accredited
    /// investors, and the first present path for everyone else.
    pub fn annual_savings_for(
        &self,
        is_qualified_purchaser: bool,
        is_accredited: bool,
    ) -> Option<Decimal> {
        if let Some(savings) = self.annual_savings {
            return Some(savings);
        }

        let qp = self
            .qualified_purchaser
            .as_ref()
            .and_then(|path| path.annual_savings);
        let accredited = self
            .accredited_investor
            .as_ref()
            .and_then(|path| path.annual_savings);

        match (is_qualified_purchaser, is_accredited) {
            (true, _) if qp.is_some() => qp,
            (_, true) if accredited.is_some() => accredited,
            _ => qp.or(accredited),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTerm {
    pub term: String,
    pub definition: String,
}

/// Descriptive content rendered with an eligible strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrategyMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub implementation_steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantified_example: Option<QuantifiedExample>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub glossary_terms: Vec<GlossaryTerm>,
    /// Reference to the learning module that covers the strategy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CtaTemplate {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtext: Option<String>,
}

/// One read-only catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyDefinition {
    #[serde(alias = "strategyId")]
    pub id: String,
    pub title: String,
    pub category: StrategyCategory,
    pub complexity: Complexity,
    #[serde(default)]
    pub eligibility_criteria: CriteriaSet,
    #[serde(default)]
    pub suppression_rule: Option<SuppressionRule>,
    #[serde(default)]
    pub conditional_cta_rules: Vec<ConditionalCtaRule>,
    #[serde(default)]
    pub metadata: Option<StrategyMetadata>,
    #[serde(default)]
    pub cta: Option<CtaTemplate>,
}

impl StrategyDefinition {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: StrategyCategory,
        complexity: Complexity,
        eligibility_criteria: CriteriaSet,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            category,
            complexity,
            eligibility_criteria,
            suppression_rule: None,
            conditional_cta_rules: Vec::new(),
            metadata: None,
            cta: None,
        }
    }

    pub fn with_suppression_rule(
        mut self,
        rule: SuppressionRule,
    ) -> Self {
        self.suppression_rule = Some(rule);
        self
    }

    pub fn with_conditional_cta_rule(
        mut self,
        rule: ConditionalCtaRule,
    ) -> Self {
        self.conditional_cta_rules.push(rule);
        self
    }

    pub fn with_metadata(
        mut self,
        metadata: StrategyMetadata,
    ) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn quantified_example(&self) -> Option<&QuantifiedExample> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.quantified_example.as_ref())
    }
}
