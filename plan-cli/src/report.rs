//! One-line summaries printed by the `batch` command.

use std::fmt;

use plan_core::{IncomeType, PlanReport};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub row: usize,
    pub income_type: IncomeType,
    pub eligible: usize,
    pub suppressed: usize,
    pub average_savings_percent: Decimal,
    pub total_value: Decimal,
}

impl BatchSummary {
    pub fn new(
        row: usize,
        income_type: IncomeType,
        report: &PlanReport,
    ) -> Self {
        Self {
            row,
            income_type,
            eligible: report.strategy_stack.eligible().count(),
            suppressed: report.strategy_stack.suppressed().count(),
            average_savings_percent: report.forecast.average_savings_percent,
            total_value: report.forecast.forecast.total_value,
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let savings = self.average_savings_percent.normalize().to_string();
        write!(
            f,
            "row {:>3}  {:<16} eligible {:>2}  suppressed {:>2}  savings {:>5}%  total value ${}",
            self.row,
            self.income_type.as_str(),
            self.eligible,
            self.suppressed,
            savings,
            self.total_value,
        )
    }
}
