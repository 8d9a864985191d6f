//! Profile documents read by the `stack`, `forecast` and `plan` commands.
//!
//! ```json
//! {
//!   "profile": {
//!     "incomeType": "business-owner",
//!     "incomeRange": "$1M–$5M",
//!     "hasBusinessPartners": false
//!   },
//!   "forecast": {
//!     "businessProfit": "600,000",
//!     "forecastYears": "15",
//!     "reinvestSavings": true
//!   }
//! }
//! ```
//!
//! Forecast fields are the form's raw text, or plain JSON numbers, and go
//! through the same coercion as interactive input.

use std::path::Path;

use anyhow::{Context, Result};
use plan_core::{ForecastInputs, Profile, RawForecastInputs};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileDocument {
    pub profile: Profile,
    #[serde(default)]
    pub forecast: RawForecastInputs,
}

impl ProfileDocument {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read profile '{}'", path.display()))?;
        Self::from_json(&json).with_context(|| format!("invalid profile '{}'", path.display()))
    }

    pub fn inputs(&self) -> ForecastInputs {
        ForecastInputs::from_raw(&self.forecast)
    }
}

#[cfg(test)]
mod tests {
    use plan_core::{IncomeRange, IncomeType};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parses_profile_and_coerces_forecast() {
        let json = r#"{
            "profile": { "incomeType": "blended", "incomeRange": "$500K-$1M" },
            "forecast": { "businessProfit": "1,250,000", "forecastYears": "30", "returnRate": "" }
        }"#;

        let document = ProfileDocument::from_json(json).unwrap();
        let inputs = document.inputs();

        assert_eq!(document.profile.income_type, IncomeType::Blended);
        assert_eq!(document.profile.income_range, Some(IncomeRange::From500KTo1M));
        assert_eq!(inputs.business_profit, dec!(1250000));
        assert_eq!(inputs.forecast_years, 20);
        assert_eq!(inputs.return_rate, dec!(6));
    }

    #[test]
    fn numeric_forecast_fields_are_coerced() {
        let json = r#"{
            "profile": { "incomeType": "business-owner", "incomeRange": "$1M-$5M" },
            "forecast": { "businessProfit": 600000, "forecastYears": 12, "returnRate": 7.5 }
        }"#;

        let inputs = ProfileDocument::from_json(json).unwrap().inputs();

        assert_eq!(inputs.business_profit, dec!(600000));
        assert_eq!(inputs.forecast_years, 12);
        assert_eq!(inputs.return_rate, dec!(7.5));
        assert!(inputs.reinvest_savings);
    }

    #[test]
    fn forecast_section_is_optional() {
        let json = r#"{ "profile": { "incomeType": "w2-employee" } }"#;

        let document = ProfileDocument::from_json(json).unwrap();

        assert_eq!(document.forecast, RawForecastInputs::default());
        assert_eq!(document.inputs().forecast_years, 15);
    }

    #[test]
    fn unknown_income_type_is_rejected() {
        let json = r#"{ "profile": { "incomeType": "astronaut" } }"#;

        assert!(ProfileDocument::from_json(json).is_err());
    }
}
