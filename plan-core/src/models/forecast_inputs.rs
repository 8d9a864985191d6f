use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{clamp_percent, coerce_amount, non_negative};

pub const MIN_FORECAST_YEARS: u32 = 5;
pub const MAX_FORECAST_YEARS: u32 = 20;
pub const DEFAULT_FORECAST_YEARS: u32 = 15;
pub const DEFAULT_RETURN_RATE: Decimal = dec!(6);

/// Numeric forecasting answers, already coerced into numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForecastInputs {
    pub business_profit: Decimal,
    pub capital_available: Decimal,
    /// Share of income that could be restructured, 0–100.
    pub restructure_percent: Decimal,
    pub forecast_years: u32,
    pub reinvest_savings: bool,
    /// Annual return on reinvested savings, in percent (6 = 6%).
    pub return_rate: Decimal,
    /// Derive passive income and milestone snapshots from the projection.
    pub wealth_loop: bool,
}

impl Default for ForecastInputs {
    fn default() -> Self {
        Self {
            business_profit: Decimal::ZERO,
            capital_available: Decimal::ZERO,
            restructure_percent: Decimal::ZERO,
            forecast_years: DEFAULT_FORECAST_YEARS,
            reinvest_savings: true,
            return_rate: DEFAULT_RETURN_RATE,
            wealth_loop: false,
        }
    }
}

impl ForecastInputs {
    /// Coerces the raw text fields of the forecasting form.
    ///
    /// Blank or unparsable amounts become zero. A blank or unparsable horizon
    /// becomes 15 years and a blank or unparsable return rate becomes 6%. The
    /// result is passed through [`ForecastInputs::normalized`].
    pub fn from_raw(raw: &RawForecastInputs) -> Self {
        let forecast_years = raw
            .forecast_years
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse::<u32>() {
                Ok(years) => Some(years),
                Err(e) => {
                    tracing::warn!(input = %s, "unparsable forecast horizon: {}", e);
                    None
                }
            })
            .unwrap_or(DEFAULT_FORECAST_YEARS);

        let return_rate = raw
            .return_rate
            .as_deref()
            .map(|s| s.trim().trim_end_matches('%').trim())
            .filter(|s| !s.is_empty())
            .and_then(|s| match s.parse::<Decimal>() {
                Ok(rate) => Some(rate),
                Err(e) => {
                    tracing::warn!(input = %s, "unparsable return rate: {}", e);
                    None
                }
            })
            .unwrap_or(DEFAULT_RETURN_RATE);

        Self {
            business_profit: coerce_amount(raw.business_profit.as_deref().unwrap_or("")),
            capital_available: coerce_amount(raw.capital_available.as_deref().unwrap_or("")),
            restructure_percent: coerce_amount(raw.restructure_percent.as_deref().unwrap_or("")),
            forecast_years,
            reinvest_savings: raw.reinvest_savings,
            return_rate,
            wealth_loop: raw.wealth_loop,
        }
        .normalized()
    }

    /// Returns a copy with every field inside its valid range.
    ///
    /// Out-of-range horizons clamp to `[5, 20]`, percentages clamp to
    /// `[0, 100]` and negative amounts become zero.
    pub fn normalized(&self) -> Self {
        let forecast_years = self
            .forecast_years
            .clamp(MIN_FORECAST_YEARS, MAX_FORECAST_YEARS);
        if forecast_years != self.forecast_years {
            tracing::debug!(
                requested = self.forecast_years,
                clamped = forecast_years,
                "forecast horizon clamped"
            );
        }

        Self {
            business_profit: non_negative(self.business_profit),
            capital_available: non_negative(self.capital_available),
            restructure_percent: clamp_percent(self.restructure_percent),
            forecast_years,
            reinvest_savings: self.reinvest_savings,
            return_rate: clamp_percent(self.return_rate),
            wealth_loop: self.wealth_loop,
        }
    }
}

/// The forecasting form exactly as typed: every numeric field is text that
/// may be blank or malformed.
///
/// JSON numbers are accepted wherever text is and kept in their printed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawForecastInputs {
    #[serde(deserialize_with = "text_or_number")]
    pub business_profit: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub capital_available: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub restructure_percent: Option<String>,
    #[serde(deserialize_with = "text_or_number")]
    pub forecast_years: Option<String>,
    pub reinvest_savings: bool,
    #[serde(deserialize_with = "text_or_number")]
    pub return_rate: Option<String>,
    pub wealth_loop: bool,
}

impl Default for RawForecastInputs {
    fn default() -> Self {
        Self {
            business_profit: None,
            capital_available: None,
            restructure_percent: None,
            forecast_years: None,
            reinvest_savings: true,
            return_rate: None,
            wealth_loop: false,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Number(serde_json::Number),
}

fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(
        Option::<FieldValue>::deserialize(deserializer)?.map(|value| match value {
            FieldValue::Text(text) => text,
            FieldValue::Number(number) => number.to_string(),
        }),
    )
}
