//! Tunable engine policies.
//!
//! Every field defaults to the documented policy, so an empty TOML file (or
//! no file at all) reproduces the standard behaviour:
//!
//! ```toml
//! default_taxable_income = "350000"
//!
//! [savings]
//! base_min = "12"
//! base_max = "18"
//! min_ceiling = "35"
//! max_ceiling = "45"
//!
//! [forecast]
//! chart_stride_divisor = 10
//! max_chart_points = 20
//! milestone_years = [10, 15, 20]
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Hard upper bound for any savings percentage.
pub const PERCENT_CEILING: Decimal = dec!(45);

/// Errors that can occur when validating an [`EngineConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("savings base band is inverted: min {min} > max {max}")]
    InvertedBaseBand { min: Decimal, max: Decimal },

    #[error("savings ceiling {0} must be between 0 and 45")]
    CeilingOutOfRange(Decimal),

    #[error("chart stride divisor must be positive")]
    ZeroStrideDivisor,

    #[error("chart must allow at least one point")]
    ZeroChartPoints,

    #[error("default taxable income must be non-negative, got {0}")]
    NegativeDefaultIncome(Decimal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SavingsConfig {
    /// Starting percentage band before any adjustment.
    pub base_min: Decimal,
    pub base_max: Decimal,
    /// Caps applied to the adjusted band.
    pub min_ceiling: Decimal,
    pub max_ceiling: Decimal,
}

impl Default for SavingsConfig {
    fn default() -> Self {
        Self {
            base_min: dec!(12),
            base_max: dec!(18),
            min_ceiling: dec!(35),
            max_ceiling: dec!(45),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Chart years are sampled every `max(1, years / divisor)` years.
    pub chart_stride_divisor: u32,
    pub max_chart_points: u32,
    /// Years at which wealth-loop milestones are reported.
    pub milestone_years: Vec<u32>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            chart_stride_divisor: 10,
            max_chart_points: 20,
            milestone_years: vec![10, 15, 20],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub savings: SavingsConfig,
    pub forecast: ForecastConfig,
    /// Income taxed when a profile has no income range.
    pub default_taxable_income: Decimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            savings: SavingsConfig::default(),
            forecast: ForecastConfig::default(),
            default_taxable_income: dec!(350000),
        }
    }
}

impl EngineConfig {
    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if:
    /// - the base band has `base_min > base_max`
    /// - a ceiling is outside `[0, 45]`
    /// - the chart stride divisor or point limit is zero
    /// - the default taxable income is negative
    pub fn validate(&self) -> Result<(), ConfigError> {
        let savings = &self.savings;
        if savings.base_min > savings.base_max {
            return Err(ConfigError::InvertedBaseBand {
                min: savings.base_min,
                max: savings.base_max,
            });
        }
        for ceiling in [savings.min_ceiling, savings.max_ceiling] {
            if ceiling < Decimal::ZERO || ceiling > PERCENT_CEILING {
                return Err(ConfigError::CeilingOutOfRange(ceiling));
            }
        }
        if self.forecast.chart_stride_divisor == 0 {
            return Err(ConfigError::ZeroStrideDivisor);
        }
        if self.forecast.max_chart_points == 0 {
            return Err(ConfigError::ZeroChartPoints);
        }
        if self.default_taxable_income < Decimal::ZERO {
            return Err(ConfigError::NegativeDefaultIncome(
                self.default_taxable_income,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn validate_rejects_inverted_band() {
        let mut config = EngineConfig::default();
        config.savings.base_min = dec!(20);

        assert_eq!(
            config.validate(),
            Err(ConfigError::InvertedBaseBand {
                min: dec!(20),
                max: dec!(18),
            })
        );
    }

    #[test]
    fn validate_rejects_ceiling_above_45() {
        let mut config = EngineConfig::default();
        config.savings.max_ceiling = dec!(50);

        assert_eq!(
            config.validate(),
            Err(ConfigError::CeilingOutOfRange(dec!(50)))
        );
    }

    #[test]
    fn validate_rejects_zero_stride_divisor() {
        let mut config = EngineConfig::default();
        config.forecast.chart_stride_divisor = 0;

        assert_eq!(config.validate(), Err(ConfigError::ZeroStrideDivisor));
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: EngineConfig =
            serde_json::from_str(r#"{"forecast": {"chart_stride_divisor": 8}}"#).unwrap();

        assert_eq!(config.forecast.chart_stride_divisor, 8);
        assert_eq!(config.forecast.max_chart_points, 20);
        assert_eq!(config.savings, SavingsConfig::default());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = serde_json::from_str::<EngineConfig>(r#"{"savings": {"ceiling": 40}}"#);

        assert!(result.is_err());
    }
}
