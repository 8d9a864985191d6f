//! Matching of strategy definitions against a profile.
//!
//! Every [`Criterion`] variant is dispatched in [`EvaluationContext::holds`].
//! Unknown or malformed criteria never fail the evaluation: they are logged
//! and count as not holding.

use crate::eligibility::facts::{DerivedFacts, matches_user_type};
use crate::models::{
    CriteriaSet, Criterion, EligibilityResult, EntityStructure, ForecastInputs, Profile,
    StrategyDefinition, SuppressionRule,
};

/// Everything a criterion can look at.
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    pub profile: &'a Profile,
    pub inputs: &'a ForecastInputs,
    pub facts: &'a DerivedFacts,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        profile: &'a Profile,
        inputs: &'a ForecastInputs,
        facts: &'a DerivedFacts,
    ) -> Self {
        Self {
            profile,
            inputs,
            facts,
        }
    }

    /// Whether a single criterion holds.
    pub fn holds(
        &self,
        criterion: &Criterion,
    ) -> bool {
        let profile = self.profile;
        let facts = self.facts;

        match criterion {
            Criterion::UserType(user_type) => matches_user_type(profile, *user_type),
            Criterion::HasPartners(expected) => profile.has_business_partners == Some(*expected),
            Criterion::BusinessProfitMin(min) => facts.business_profit_effective >= *min,
            Criterion::BusinessProfitMax(max) => facts.business_profit_effective <= *max,
            Criterion::HasCcorp(expected) => {
                (profile.entity_structure == EntityStructure::CCorp) == *expected
            }
            Criterion::RetainedEarningsMin(min) => {
                (profile.entity_structure == EntityStructure::CCorp || facts.can_create_ccorp)
                    && facts.business_profit_effective >= *min
            }
            Criterion::HasCapGains(expected) => facts.has_cap_gains == *expected,
            Criterion::IsAccredited(expected) => facts.is_accredited_investor == *expected,
            Criterion::HasRental(expected) => facts.has_rental_income == *expected,
            Criterion::IsQualifiedPurchaser(expected) => facts.is_qualified_purchaser == *expected,
            Criterion::EntityStructure(entity) => profile.entity_structure == *entity,
            Criterion::RequiresCcorpStatus(expected) => {
                profile.has_ccorp_tax_status() == *expected
            }
            Criterion::QsbsClockStarted(expected) => facts.qsbs_clock_started == *expected,
            Criterion::CapitalAvailableMin(min) => self.inputs.capital_available >= *min,
            Criterion::RestructurePercentMin(min) => self.inputs.restructure_percent >= *min,
            Criterion::Any(sets) => sets.iter().any(|set| self.all_hold(set)),
            Criterion::All(sets) => sets.iter().all(|set| self.all_hold(set)),
            Criterion::Exclude(set) => !self.all_hold(set),
            Criterion::Unknown { name } => {
                tracing::warn!(criterion = %name, "unknown eligibility criterion treated as unmet");
                false
            }
        }
    }

    /// AND over a criteria set. An empty set holds.
    pub fn all_hold(
        &self,
        set: &CriteriaSet,
    ) -> bool {
        set.iter().all(|criterion| self.holds(criterion))
    }

    /// OR over a criteria set. An empty set does not hold.
    pub fn any_holds(
        &self,
        set: &CriteriaSet,
    ) -> bool {
        set.iter().any(|criterion| self.holds(criterion))
    }

    /// A suppression rule fires when any flat criterion holds, or when its
    /// `condition` set holds as a whole.
    pub fn suppresses(
        &self,
        rule: &SuppressionRule,
    ) -> bool {
        self.any_holds(&rule.criteria)
            || rule
                .condition
                .as_ref()
                .is_some_and(|condition| self.all_hold(condition))
    }
}

/// Classifies one definition.
///
/// The suppression rule is checked first and short-circuits; otherwise the
/// definition is eligible only if all of its criteria hold.
pub fn evaluate(
    definition: &StrategyDefinition,
    profile: &Profile,
    inputs: &ForecastInputs,
    facts: &DerivedFacts,
) -> EligibilityResult {
    let _span = tracing::debug_span!("evaluate", strategy = %definition.id).entered();
    let context = EvaluationContext::new(profile, inputs, facts);

    let result = match &definition.suppression_rule {
        Some(rule) if context.suppresses(rule) => EligibilityResult::Suppressed {
            message: rule.message.clone(),
        },
        _ if context.all_hold(&definition.eligibility_criteria) => EligibilityResult::Eligible,
        _ => EligibilityResult::Ineligible,
    };

    tracing::debug!(?result, "strategy classified");
    result
}
