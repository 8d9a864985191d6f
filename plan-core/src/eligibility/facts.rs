//! Facts inferred from a profile and its forecast answers.
//!
//! These heuristics over-approximate on purpose: when in doubt they favour
//! showing a strategy. They are recomputed for every evaluation and never
//! cached.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_percent, percent_to_rate};
use crate::models::{ForecastInputs, IncomeType, Profile, UserType};

/// Profit needed before a C-corp (and the QSBS clock) is worth forming.
pub const CCORP_PROFIT_THRESHOLD: Decimal = dec!(500000);
/// Minimum share of a blended income that counts toward a user type.
pub const BLENDED_USER_TYPE_SHARE: Decimal = dec!(25);
/// Minimum business share of a blended income for a C-corp to be creatable.
pub const BLENDED_CCORP_SHARE: Decimal = dec!(60);

const ACCREDITED_INCOME: Decimal = dec!(200000);
const QUALIFIED_PURCHASER_INCOME: Decimal = dec!(2000000);
const QUALIFIED_PURCHASER_CAPITAL: Decimal = dec!(5000000);
const CAP_GAINS_INCOME: Decimal = dec!(500000);
const CAP_GAINS_CAPITAL: Decimal = dec!(100000);
const RENTAL_PROFIT: Decimal = dec!(200000);

/// Whether the profile counts as the given user type.
///
/// A blended earner counts as both, unless an income split was given; then
/// each side needs at least a 25% share.
pub fn matches_user_type(
    profile: &Profile,
    user_type: UserType,
) -> bool {
    let (own_type, blended_share) = match user_type {
        UserType::BusinessOwner => (IncomeType::BusinessOwner, profile.business_income_percent),
        UserType::W2Employee => (IncomeType::W2Employee, profile.w2_income_percent),
    };

    match profile.income_type {
        income_type if income_type == own_type => true,
        IncomeType::Blended => blended_share
            .map(|share| clamp_percent(share) >= BLENDED_USER_TYPE_SHARE)
            .unwrap_or(true),
        _ => false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedFacts {
    pub business_profit_effective: Decimal,
    pub qsbs_clock_started: bool,
    pub can_create_ccorp: bool,
    pub is_accredited_investor: bool,
    pub is_qualified_purchaser: bool,
    pub has_cap_gains: bool,
    pub has_rental_income: bool,
}

impl DerivedFacts {
    pub fn compute(
        profile: &Profile,
        inputs: &ForecastInputs,
    ) -> Self {
        let income = profile.representative_income();
        let business_owner = matches_user_type(profile, UserType::BusinessOwner);
        let profit = effective_business_profit(profile, inputs);
        let partners_known = profile.has_business_partners.is_some();
        let profitable = profit >= CCORP_PROFIT_THRESHOLD;

        let blended_share_ok = profile.income_type != IncomeType::Blended
            || profile
                .business_income_percent
                .map(|share| clamp_percent(share) >= BLENDED_CCORP_SHARE)
                .unwrap_or(true);

        let facts = Self {
            business_profit_effective: profit,
            qsbs_clock_started: business_owner
                && profile.has_business_partners == Some(false)
                && profitable,
            can_create_ccorp: business_owner && profitable && partners_known && blended_share_ok,
            is_accredited_investor: income >= ACCREDITED_INCOME,
            is_qualified_purchaser: income >= QUALIFIED_PURCHASER_INCOME
                || inputs.capital_available >= QUALIFIED_PURCHASER_CAPITAL,
            has_cap_gains: profile.wants_exit_planning()
                || profile.receives_stock_comp
                || income >= CAP_GAINS_INCOME
                || inputs.capital_available >= CAP_GAINS_CAPITAL,
            has_rental_income: profile.wants_real_estate() || profit > RENTAL_PROFIT,
        };

        tracing::debug!(?facts, "derived facts computed");
        facts
    }
}

/// Business profit used by every profit threshold.
///
/// An explicit positive profit answer wins. Otherwise business owners use
/// their bucket's representative income, blended earners the business share
/// of it (whole dollars), and everyone else zero.
fn effective_business_profit(
    profile: &Profile,
    inputs: &ForecastInputs,
) -> Decimal {
    if inputs.business_profit > Decimal::ZERO {
        return inputs.business_profit;
    }

    let income = profile.representative_income();
    match profile.income_type {
        IncomeType::BusinessOwner => income,
        IncomeType::Blended => match profile.business_income_percent {
            Some(share) => (income * percent_to_rate(clamp_percent(share)))
                .round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero),
            None => income,
        },
        IncomeType::W2Employee | IncomeType::Contractor1099 => Decimal::ZERO,
    }
}
