//! Cross-sell guidance for eligible strategies.

use crate::eligibility::evaluator::EvaluationContext;
use crate::models::{ConditionalCta, StrategyDefinition};

/// Returns the first conditional CTA rule of `definition` that fires.
///
/// A rule fires when all of its trigger criteria hold and its optional
/// `suppressIfCriteriaMatches` set does not. Callers only resolve CTAs for
/// strategies already classified eligible.
pub fn resolve_conditional_cta(
    definition: &StrategyDefinition,
    context: &EvaluationContext<'_>,
) -> Option<ConditionalCta> {
    definition
        .conditional_cta_rules
        .iter()
        .find(|rule| {
            context.all_hold(&rule.trigger_criteria)
                && !rule
                    .suppress_if_criteria_matches
                    .as_ref()
                    .is_some_and(|set| context.all_hold(set))
        })
        .map(|rule| {
            tracing::debug!(
                strategy = %definition.id,
                action = %rule.action_label,
                "conditional CTA attached"
            );
            ConditionalCta {
                message: rule.message.clone(),
                action_label: rule.action_label.clone(),
            }
        })
}
