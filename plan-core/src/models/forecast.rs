use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Inclusive `[min, max]` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: Decimal,
    pub max: Decimal,
}

impl Range {
    pub fn new(
        min: Decimal,
        max: Decimal,
    ) -> Self {
        Self { min, max }
    }

    pub fn midpoint(&self) -> Decimal {
        (self.min + self.max) / dec!(2)
    }
}

/// Estimated share of tax liability a household could save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    /// Whole percentages within `[0, 45]`.
    pub percent: Range,
    /// Dollar amounts for each percentage bound, in cents.
    pub dollar: Range,
}

impl SavingsEstimate {
    /// Midpoint of the percentage band, used to drive the forecast.
    pub fn average_percent(&self) -> Decimal {
        self.percent.midpoint()
    }
}

/// One sampled year of the forecast chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub year_label: String,
    pub tax_paid_cumulative: Decimal,
    pub strategy_value_cumulative: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passive_income_cumulative: Option<Decimal>,
}

/// Snapshot of the projection at a round-number year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub year: u32,
    pub tax_paid_cumulative: Decimal,
    pub strategy_value: Decimal,
    pub passive_income: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub annual_tax_savings: Decimal,
    pub total_tax_without_strategy: Decimal,
    pub total_tax_savings: Decimal,
    /// Zero when savings are not reinvested.
    pub compounded_savings: Decimal,
    pub total_value: Decimal,
    pub chart_data: Vec<ChartPoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub milestones: Vec<Milestone>,
}
