//! CSV loader for batch profile runs.
//!
//! ## CSV Format
//!
//! Column order does **not** matter (headers are matched by name). Header
//! names are case-sensitive. Only `income_type` is required; every other cell
//! may be left empty.
//!
//! | Column                  | Type    | Notes                                          |
//! |-------------------------|---------|------------------------------------------------|
//! | `income_type`           | string  | `w2-employee`, `1099-contractor`, `business-owner`, `blended` |
//! | `income_range`          | string  | `<$200K`, `$200K-$500K`, `$500K-$1M`, `$1M-$5M`, `$5M+` |
//! | `entity_structure`      | string  | `None`, `LLC`, `S-corp`, `C-corp`, `Trust`, `Not sure` |
//! | `has_business_partners` | bool    | Empty means unanswered                         |
//! | `strategy_goals`        | string  | Goals separated by `;`                         |
//! | `business_profit`       | text    | Coerced like form input (`1,250,000` is fine)  |
//! | `capital_available`     | text    | Coerced like form input                        |
//! | `restructure_percent`   | text    | Coerced like form input                        |
//! | `forecast_years`        | text    | Default 15, clamped to 5–20                    |
//! | `return_rate`           | text    | Percent, default 6                             |
//! | `reinvest_savings`      | bool    | Default `true`                                 |
//!
//! ### Example
//!
//! ```csv
//! income_type,income_range,entity_structure,has_business_partners,business_profit
//! business-owner,$1M-$5M,None,false,600000
//! w2-employee,<$200K,,,
//! ```

use plan_core::{
    EntityStructure, ForecastInputs, IncomeRange, IncomeType, Profile, RawForecastInputs,
    StrategyGoal,
};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CsvRow {
    income_type: String,
    #[serde(default)]
    income_range: Option<String>,
    #[serde(default)]
    entity_structure: Option<String>,
    #[serde(default)]
    has_business_partners: Option<bool>,
    #[serde(default)]
    strategy_goals: Option<String>,
    #[serde(default)]
    business_profit: Option<String>,
    #[serde(default)]
    capital_available: Option<String>,
    #[serde(default)]
    restructure_percent: Option<String>,
    #[serde(default)]
    forecast_years: Option<String>,
    #[serde(default)]
    return_rate: Option<String>,
    #[serde(default)]
    reinvest_savings: Option<bool>,
}

/// Errors that can occur while loading batch profiles.
///
/// `row` is 1-based and counts data rows only (header = row 0).
#[derive(Debug, thiserror::Error)]
pub enum ProfileLoadError {
    #[error("CSV parse error on row {row}: {source}")]
    Parse {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("unrecognised {field} '{value}' on row {row}")]
    InvalidField {
        field: &'static str,
        value: String,
        row: usize,
    },
}

/// One parsed batch row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchEntry {
    pub row: usize,
    pub profile: Profile,
    pub inputs: ForecastInputs,
}

fn invalid(
    field: &'static str,
    value: &str,
    row: usize,
) -> ProfileLoadError {
    ProfileLoadError::InvalidField {
        field,
        value: value.to_string(),
        row,
    }
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<BatchEntry, ProfileLoadError> {
    let income_type = IncomeType::parse(&row.income_type)
        .ok_or_else(|| invalid("income_type", &row.income_type, row_number))?;

    let income_range = match row.income_range.as_deref() {
        Some(value) => Some(
            IncomeRange::parse(value).ok_or_else(|| invalid("income_range", value, row_number))?,
        ),
        None => None,
    };

    let entity_structure = match row.entity_structure.as_deref() {
        Some(value) => EntityStructure::parse(value)
            .ok_or_else(|| invalid("entity_structure", value, row_number))?,
        None => EntityStructure::None,
    };

    let strategy_goals = row
        .strategy_goals
        .as_deref()
        .map(|goals| {
            goals
                .split(';')
                .map(str::trim)
                .filter(|goal| !goal.is_empty())
                .map(StrategyGoal::parse)
                .collect()
        })
        .unwrap_or_default();

    let mut profile = Profile::new(income_type, income_range);
    profile.entity_structure = entity_structure;
    profile.has_business_partners = row.has_business_partners;
    profile.strategy_goals = strategy_goals;

    let raw = RawForecastInputs {
        business_profit: row.business_profit,
        capital_available: row.capital_available,
        restructure_percent: row.restructure_percent,
        forecast_years: row.forecast_years,
        reinvest_savings: row.reinvest_savings.unwrap_or(true),
        return_rate: row.return_rate,
        wealth_loop: false,
    };

    Ok(BatchEntry {
        row: row_number,
        profile,
        inputs: ForecastInputs::from_raw(&raw),
    })
}

/// Parse CSV text and return one entry per data row, in file order.
///
/// # Errors
///
/// * [ProfileLoadError::Parse] – if a row is structurally invalid or a
///   boolean cell cannot be deserialised.
/// * [ProfileLoadError::InvalidField] – if a row names an unknown income
///   type, income range or entity structure.
pub fn load_from_str(input: &str) -> Result<Vec<BatchEntry>, ProfileLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(input.as_bytes());

    reader
        .deserialize::<CsvRow>()
        .enumerate()
        .map(|(idx, result)| {
            let row_number = idx + 1;
            let row = result.map_err(|source| ProfileLoadError::Parse {
                row: row_number,
                source,
            })?;
            convert_row(row, row_number)
        })
        .collect()
}

/// Read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &std::path::Path) -> anyhow::Result<Vec<BatchEntry>> {
    use anyhow::Context;

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read batch file '{}'", path.display()))?;
    let entries = load_from_str(&contents)?;
    tracing::info!(path = %path.display(), rows = entries.len(), "loaded batch profiles");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    use super::*;

    const MINIMAL_CSV: &str = "\
income_type
w2-employee
";

    const MULTI_ROW_CSV: &str = "\
income_type,income_range,entity_structure,has_business_partners,business_profit,forecast_years
business-owner,$1M-$5M,None,false,600000,15
blended,$500K-$1M,LLC,true,\"1,250,000\",30
1099-contractor,<$200K,Not sure,,,
";

    // =========================================================================
    // happy path
    // =========================================================================

    #[test]
    fn test_minimal_csv_uses_defaults() {
        let entries = load_from_str(MINIMAL_CSV).expect("should parse minimal CSV");

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.row, 1);
        assert_eq!(entry.profile, Profile::new(IncomeType::W2Employee, None));
        assert_eq!(entry.inputs.business_profit, Decimal::ZERO);
        assert_eq!(entry.inputs.forecast_years, 15);
        assert!(entry.inputs.reinvest_savings);
    }

    #[test]
    fn test_multi_row_keeps_file_order() {
        let entries = load_from_str(MULTI_ROW_CSV).expect("should parse multi-row CSV");

        let types: Vec<IncomeType> = entries.iter().map(|e| e.profile.income_type).collect();
        assert_eq!(
            types,
            vec![
                IncomeType::BusinessOwner,
                IncomeType::Blended,
                IncomeType::Contractor1099
            ]
        );
        assert_eq!(entries.iter().map(|e| e.row).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_multi_row_field_values() {
        let entries = load_from_str(MULTI_ROW_CSV).expect("should parse");

        assert_eq!(entries[0].profile.has_business_partners, Some(false));
        assert_eq!(entries[0].inputs.business_profit, dec!(600000));
        assert_eq!(entries[1].profile.entity_structure, EntityStructure::Llc);
        assert_eq!(entries[1].inputs.business_profit, dec!(1250000));
        assert_eq!(entries[1].inputs.forecast_years, 20);
        assert_eq!(entries[2].profile.has_business_partners, None);
        assert_eq!(entries[2].profile.entity_structure, EntityStructure::NotSure);
    }

    #[test]
    fn test_strategy_goals_split_on_semicolon() {
        let csv = "income_type,strategy_goals\nw2-employee,Exit planning; Real estate investments\n";

        let entries = load_from_str(csv).expect("should parse");

        assert_eq!(
            entries[0].profile.strategy_goals,
            vec![StrategyGoal::ExitPlanning, StrategyGoal::RealEstate]
        );
    }

    #[test]
    fn test_profile_columns_in_any_order() {
        let csv = "\
business_profit,income_range,income_type
750000,$500K-$1M,business-owner
";
        let entries = load_from_str(csv).expect("column order should not matter");

        assert_eq!(entries[0].profile.income_type, IncomeType::BusinessOwner);
        assert_eq!(entries[0].profile.income_range, Some(IncomeRange::From500KTo1M));
        assert_eq!(entries[0].inputs.business_profit, dec!(750000));
    }

    #[test]
    fn test_header_only_batch_has_no_entries() {
        let entries = load_from_str("income_type\n").expect("header-only CSV is valid");

        assert!(entries.is_empty());
    }

    // =========================================================================
    // errors
    // =========================================================================

    #[test]
    fn test_invalid_income_type_reports_row() {
        let csv = "\
income_type
w2-employee
astronaut
";
        match load_from_str(csv).unwrap_err() {
            ProfileLoadError::InvalidField { field, value, row } => {
                assert_eq!(field, "income_type");
                assert_eq!(value, "astronaut");
                assert_eq!(row, 2);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_income_range_reports_row() {
        let csv = "income_type,income_range\nbusiness-owner,$9M\n";

        match load_from_str(csv).unwrap_err() {
            ProfileLoadError::InvalidField { field, row, .. } => {
                assert_eq!(field, "income_range");
                assert_eq!(row, 1);
            }
            other => panic!("expected InvalidField, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_boolean_is_parse_error_with_row() {
        let csv = "\
income_type,has_business_partners
business-owner,true
business-owner,maybe
";
        match load_from_str(csv).unwrap_err() {
            ProfileLoadError::Parse { row, .. } => assert_eq!(row, 2),
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_income_type_column_is_parse_error() {
        let csv = "income_range\n<$200K\n";

        assert!(matches!(
            load_from_str(csv),
            Err(ProfileLoadError::Parse { row: 1, .. })
        ));
    }
}
