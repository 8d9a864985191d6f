use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal bracket of a progressive schedule.
///
/// `max_income` is `None` for the unbounded top bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxBracket {
    pub min_income: Decimal,
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min_income: Decimal,
        max_income: Option<Decimal>,
        tax_rate: Decimal,
    ) -> Self {
        Self {
            min_income,
            max_income,
            tax_rate,
        }
    }

    /// Width of the bracket, `None` when unbounded.
    pub fn width(&self) -> Option<Decimal> {
        self.max_income.map(|max| max - self.min_income)
    }
}
