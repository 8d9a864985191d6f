//! Heuristic savings-range estimator.
//!
//! The estimate starts from a base percentage band and adds independent
//! adjustments for each profile trait and forecast answer that suggests more
//! room for planning:
//!
//! | Trigger                           | min | max |
//! |-----------------------------------|-----|-----|
//! | business owner                    | +8  | +15 |
//! | blended income                    | +6  | +12 |
//! | 1099 contractor                   | +4  | +8  |
//! | income $500K–$1M                  | +2  | +6  |
//! | income $1M–$5M                    | +5  | +10 |
//! | income $5M+                       | +8  | +15 |
//! | no entity yet (None / Not sure)   | +4  | +8  |
//! | RSU income above 30%              | +0  | +5  |
//! | business profit above $500K       | +3  | +6  |
//! | capital available above $100K     | +2  | +5  |
//! | restructure share above 50%       | +3  | +7  |
//!
//! The adjusted band is then capped by the configured ceilings, kept inside
//! `[0, 45]`, and `min` is pulled below `max` when the caps collapse it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::calculations::common::{clamp, percent_to_rate, round_half_up};
use crate::config::{PERCENT_CEILING, SavingsConfig};
use crate::models::{ForecastInputs, IncomeRange, IncomeType, Profile, Range, SavingsEstimate};

/// Additive change to both ends of the percentage band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct Adjustment {
    min: Decimal,
    max: Decimal,
}

impl Adjustment {
    const NONE: Adjustment = Adjustment {
        min: Decimal::ZERO,
        max: Decimal::ZERO,
    };

    fn new(
        min: Decimal,
        max: Decimal,
    ) -> Self {
        Self { min, max }
    }

    fn when(
        self,
        condition: bool,
    ) -> Self {
        if condition { self } else { Self::NONE }
    }
}

#[derive(Debug, Clone)]
pub struct SavingsEstimator<'a> {
    config: &'a SavingsConfig,
}

impl<'a> SavingsEstimator<'a> {
    pub fn new(config: &'a SavingsConfig) -> Self {
        Self { config }
    }

    /// Estimates the savings band for a household and prices it against its
    /// tax liability.
    pub fn estimate(
        &self,
        profile: &Profile,
        inputs: &ForecastInputs,
        tax_liability: Decimal,
    ) -> SavingsEstimate {
        let adjustments = [
            self.income_type_adjustment(profile.income_type),
            self.income_range_adjustment(profile.income_range),
            Adjustment::new(dec!(4), dec!(8)).when(profile.entity_structure.is_unset()),
            Adjustment::new(dec!(0), dec!(5))
                .when(profile.rsu_income_percent.unwrap_or_default() > dec!(30)),
            Adjustment::new(dec!(3), dec!(6)).when(inputs.business_profit > dec!(500000)),
            Adjustment::new(dec!(2), dec!(5)).when(inputs.capital_available > dec!(100000)),
            Adjustment::new(dec!(3), dec!(7)).when(inputs.restructure_percent > dec!(50)),
        ];

        let (min, max) = adjustments.iter().fold(
            (self.config.base_min, self.config.base_max),
            |(min, max), adjustment| (min + adjustment.min, max + adjustment.max),
        );
        let percent = self.cap(min, max);

        SavingsEstimate {
            percent,
            dollar: Range::new(
                round_half_up(tax_liability * percent_to_rate(percent.min)),
                round_half_up(tax_liability * percent_to_rate(percent.max)),
            ),
        }
    }

    fn income_type_adjustment(
        &self,
        income_type: IncomeType,
    ) -> Adjustment {
        match income_type {
            IncomeType::BusinessOwner => Adjustment::new(dec!(8), dec!(15)),
            IncomeType::Blended => Adjustment::new(dec!(6), dec!(12)),
            IncomeType::Contractor1099 => Adjustment::new(dec!(4), dec!(8)),
            IncomeType::W2Employee => Adjustment::NONE,
        }
    }

    fn income_range_adjustment(
        &self,
        income_range: Option<IncomeRange>,
    ) -> Adjustment {
        match income_range {
            Some(IncomeRange::From500KTo1M) => Adjustment::new(dec!(2), dec!(6)),
            Some(IncomeRange::From1MTo5M) => Adjustment::new(dec!(5), dec!(10)),
            Some(IncomeRange::Over5M) => Adjustment::new(dec!(8), dec!(15)),
            _ => Adjustment::NONE,
        }
    }

    /// Applies the ceilings, keeps both ends in `[0, 45]` and `min < max`.
    fn cap(
        &self,
        min: Decimal,
        max: Decimal,
    ) -> Range {
        let max = clamp(
            max.min(self.config.max_ceiling),
            Decimal::ZERO,
            PERCENT_CEILING,
        );
        let mut min = clamp(
            min.min(self.config.min_ceiling),
            Decimal::ZERO,
            PERCENT_CEILING,
        );
        if min >= max {
            min = (max - Decimal::ONE).max(Decimal::ZERO);
        }
        Range::new(min, max)
    }
}
