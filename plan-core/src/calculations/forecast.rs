//! Multi-year projection of tax savings.
//!
//! Annual savings are the tax liability times the average savings
//! percentage. When savings are reinvested each year's savings is treated as
//! an end-of-year contribution that compounds until the end of the horizon:
//!
//! ```text
//! value(N) = Σ_{y=1}^{N} savings × (1 + r)^(N − y)
//! ```
//!
//! The sum is evaluated by iterating `value = value × (1 + r) + savings`,
//! which needs no division and stays exact for `r = 0`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use plan_core::ForecastInputs;
//! use plan_core::calculations::ForecastEngine;
//! use plan_core::config::ForecastConfig;
//!
//! let config = ForecastConfig::default();
//! let inputs = ForecastInputs { forecast_years: 15, ..Default::default() };
//!
//! let result = ForecastEngine::new(&config).project(dec!(500000), dec!(20), &inputs);
//!
//! assert_eq!(result.annual_tax_savings, dec!(100000));
//! assert_eq!(result.total_value, dec!(2327596.99));
//! ```

use rust_decimal::Decimal;

use crate::calculations::common::{percent_to_rate, round_half_up};
use crate::config::ForecastConfig;
use crate::models::{ChartPoint, ForecastInputs, ForecastResult, Milestone};

/// Future value of `years` equal end-of-year contributions.
pub fn compound(
    contribution: Decimal,
    rate: Decimal,
    years: u32,
) -> Decimal {
    let growth = Decimal::ONE + rate;
    let mut value = Decimal::ZERO;
    for _ in 0..years {
        value = value * growth + contribution;
    }
    value
}

#[derive(Debug, Clone)]
pub struct ForecastEngine<'a> {
    config: &'a ForecastConfig,
}

/// Projection parameters shared by every sampled year.
struct Projection {
    tax_liability: Decimal,
    annual_savings: Decimal,
    rate: Decimal,
    reinvest: bool,
}

impl Projection {
    /// Savings accumulated after `years`, compounded or not.
    fn value_at(
        &self,
        years: u32,
    ) -> Decimal {
        if self.reinvest {
            compound(self.annual_savings, self.rate, years)
        } else {
            self.annual_savings * Decimal::from(years)
        }
    }

    fn tax_paid_at(
        &self,
        years: u32,
    ) -> Decimal {
        self.tax_liability * Decimal::from(years)
    }
}

impl<'a> ForecastEngine<'a> {
    pub fn new(config: &'a ForecastConfig) -> Self {
        Self { config }
    }

    /// Projects savings over the forecast horizon.
    ///
    /// `savings_percent` is the average of the savings band, in percent.
    /// Inputs are normalized first, so an out-of-range horizon is clamped to
    /// `[5, 20]` years. Money in the result is rounded to cents.
    pub fn project(
        &self,
        tax_liability: Decimal,
        savings_percent: Decimal,
        inputs: &ForecastInputs,
    ) -> ForecastResult {
        let inputs = inputs.normalized();
        let years = inputs.forecast_years;
        let projection = Projection {
            tax_liability,
            annual_savings: tax_liability * percent_to_rate(savings_percent),
            rate: percent_to_rate(inputs.return_rate),
            reinvest: inputs.reinvest_savings,
        };

        let total_tax_savings = projection.annual_savings * Decimal::from(years);
        let compounded_savings = if projection.reinvest {
            projection.value_at(years)
        } else {
            Decimal::ZERO
        };
        let total_value = if projection.reinvest {
            compounded_savings
        } else {
            total_tax_savings
        };

        let chart_data = self.chart(&projection, years, inputs.wealth_loop);
        let milestones = if inputs.wealth_loop {
            self.milestones(&projection, years)
        } else {
            Vec::new()
        };

        tracing::debug!(
            years,
            reinvest = projection.reinvest,
            points = chart_data.len(),
            "forecast projected"
        );

        ForecastResult {
            annual_tax_savings: round_half_up(projection.annual_savings),
            total_tax_without_strategy: round_half_up(projection.tax_paid_at(years)),
            total_tax_savings: round_half_up(total_tax_savings),
            compounded_savings: round_half_up(compounded_savings),
            total_value: round_half_up(total_value),
            chart_data,
            milestones,
        }
    }

    /// Years sampled for the chart: every `max(1, years / K)` years starting
    /// at year 1, at most `max_chart_points` of them.
    pub fn sample_years(
        &self,
        years: u32,
    ) -> Vec<u32> {
        let stride = (years / self.config.chart_stride_divisor.max(1)).max(1);
        (1..=years)
            .step_by(stride as usize)
            .take(self.config.max_chart_points.max(1) as usize)
            .collect()
    }

    fn chart(
        &self,
        projection: &Projection,
        years: u32,
        wealth_loop: bool,
    ) -> Vec<ChartPoint> {
        self.sample_years(years)
            .into_iter()
            .map(|year| {
                let value = projection.value_at(year);
                ChartPoint {
                    year_label: format!("Year {year}"),
                    tax_paid_cumulative: round_half_up(projection.tax_paid_at(year)),
                    strategy_value_cumulative: round_half_up(value),
                    passive_income_cumulative: wealth_loop
                        .then(|| round_half_up(value * projection.rate)),
                }
            })
            .collect()
    }

    fn milestones(
        &self,
        projection: &Projection,
        years: u32,
    ) -> Vec<Milestone> {
        let mut milestone_years: Vec<u32> = self
            .config
            .milestone_years
            .iter()
            .copied()
            .filter(|&year| year >= 1 && year <= years)
            .collect();
        milestone_years.sort_unstable();
        milestone_years.dedup();

        milestone_years
            .into_iter()
            .map(|year| {
                let value = projection.value_at(year);
                Milestone {
                    year,
                    tax_paid_cumulative: round_half_up(projection.tax_paid_at(year)),
                    strategy_value: round_half_up(value),
                    passive_income: round_half_up(value * projection.rate),
                }
            })
            .collect()
    }
}
