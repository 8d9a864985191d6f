//! Builds a [`StrategyStack`] from a catalog.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::round_half_up;
use crate::catalog::StrategyCatalog;
use crate::eligibility::cta::resolve_conditional_cta;
use crate::eligibility::evaluator::{EvaluationContext, evaluate};
use crate::eligibility::facts::DerivedFacts;
use crate::models::{ForecastInputs, Profile, StrategyCard, StrategyDefinition, StrategyStack};

/// Fallback savings rate for strategies without a quantified example.
const FALLBACK_SAVINGS_RATE: Decimal = dec!(0.15);
const FALLBACK_SAVINGS_CAP: Decimal = dec!(100000);

/// Classifies every catalog definition and groups the results.
pub fn build_stack(
    catalog: &StrategyCatalog,
    profile: &Profile,
    inputs: &ForecastInputs,
    facts: &DerivedFacts,
) -> StrategyStack {
    let context = EvaluationContext::new(profile, inputs, facts);
    let cards = catalog
        .definitions()
        .iter()
        .map(|definition| classify(definition, &context))
        .collect();

    let stack = assemble(catalog.version(), cards);
    tracing::debug!(
        catalog_version = %stack.catalog_version,
        eligible = stack.eligible().count(),
        suppressed = stack.suppressed().count(),
        "strategy stack assembled"
    );
    stack
}

fn classify(
    definition: &StrategyDefinition,
    context: &EvaluationContext<'_>,
) -> StrategyCard {
    let result = evaluate(definition, context.profile, context.inputs, context.facts);
    let mut card = StrategyCard::new(definition, result);

    if card.is_eligible() {
        let facts = context.facts;
        let quantified = definition.quantified_example().and_then(|example| {
            example.annual_savings_for(facts.is_qualified_purchaser, facts.is_accredited_investor)
        });
        let fallback =
            (facts.business_profit_effective * FALLBACK_SAVINGS_RATE).min(FALLBACK_SAVINGS_CAP);

        card.conditional_cta = resolve_conditional_cta(definition, context);
        card.quantified_annual_savings = quantified;
        card.projected_annual_savings = Some(round_half_up(quantified.unwrap_or(fallback)));
    }

    card
}

/// Partitions classified cards into the three display categories.
///
/// Ineligible cards are dropped. Suppressed cards keep only their id, title,
/// category and message. Catalog order is preserved within each category.
pub fn assemble(
    catalog_version: &str,
    cards: Vec<StrategyCard>,
) -> StrategyStack {
    let mut stack = StrategyStack::empty(catalog_version);
    for card in cards {
        let card = if card.is_eligible() {
            card
        } else if card.is_suppressed() {
            card.into_summary()
        } else {
            continue;
        };
        stack.category_mut(card.category).push(card);
    }
    stack
}
