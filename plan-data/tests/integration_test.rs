//! Integration tests for loading reference data from files and running the
//! engine on it.

use std::path::PathBuf;

use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use plan_core::{
    CatalogSource, EngineConfig, EntityStructure, ForecastInputs, IncomeRange, IncomeType,
    PlanEngine, Profile,
};
use plan_data::{BracketLoader, BracketLoaderError, JsonFileCatalog};

const TEST_CSV: &str = include_str!("../test-data/tax_brackets.csv");

fn test_data(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test-data").join(name)
}

// =============================================================================
// bracket file tests
// =============================================================================

#[test]
fn test_parse_both_years() {
    let records = BracketLoader::parse(TEST_CSV.as_bytes()).expect("Failed to parse CSV");

    assert_eq!(records.len(), 14);
    assert_eq!(records.iter().filter(|r| r.tax_year == 2024).count(), 7);
    assert_eq!(records.iter().filter(|r| r.tax_year == 2025).count(), 7);
}

#[test]
fn test_2024_file_matches_builtin_table() {
    let table = BracketLoader::load_file(&test_data("tax_brackets.csv"), 2024)
        .expect("Failed to load 2024 table");

    assert_eq!(table, plan_core::calculations::TaxTable::default());
    assert_eq!(table.compute_tax(dec!(100000)), dec!(17053.00));
}

#[test]
fn test_2025_file_table() {
    let table = BracketLoader::load_file(&test_data("tax_brackets.csv"), 2025)
        .expect("Failed to load 2025 table");

    assert_eq!(table.brackets()[1].max_income, Some(dec!(48475)));
    assert_eq!(table.compute_tax(dec!(100000)), dec!(16914.00));
}

#[test]
fn test_missing_file_is_io_error() {
    let result = BracketLoader::load_file(&test_data("no_such_file.csv"), 2025);

    assert!(matches!(result, Err(BracketLoaderError::Io(_))));
}

// =============================================================================
// catalog file tests
// =============================================================================

#[test]
fn test_load_catalog_file() {
    let catalog = JsonFileCatalog::new(test_data("catalog.json"))
        .load()
        .expect("Failed to load catalog");

    assert_eq!(catalog.version(), "test-1");
    assert_eq!(catalog.len(), 3);
    assert!(catalog.get("solo-ccorp").is_some());
}

#[test]
fn test_engine_over_file_data() {
    let catalog = JsonFileCatalog::new(test_data("catalog.json"))
        .load()
        .expect("Failed to load catalog");
    let table = BracketLoader::load_file(&test_data("tax_brackets.csv"), 2025)
        .expect("Failed to load 2025 table");
    let engine = PlanEngine::new(catalog, table, EngineConfig::default());

    let mut profile = Profile::new(IncomeType::BusinessOwner, Some(IncomeRange::From1MTo5M));
    profile.entity_structure = EntityStructure::Llc;
    profile.has_business_partners = Some(false);
    let inputs = ForecastInputs {
        business_profit: dec!(600000),
        ..Default::default()
    };

    let report = engine.plan(&profile, &inputs);
    let stack = &report.strategy_stack;

    assert_eq!(report.catalog_version, "test-1");
    assert!(stack.find("solo-ccorp").is_some_and(|card| card.is_eligible()));
    // unknown criterion makes only its own strategy ineligible
    assert!(stack.find("future-criterion").is_none());
    assert!(stack.find("accredited-exit").is_some_and(|card| card.is_eligible()));
    assert_eq!(report.quantified_annual_savings, dec!(20000));
}
