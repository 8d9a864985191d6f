//! Wires configuration and reference data into a [`PlanEngine`].

use std::path::Path;

use anyhow::{Context, Result};
use plan_core::calculations::TaxTable;
use plan_core::{CatalogSource, EmbeddedCatalog, PlanEngine};
use plan_data::{BracketLoader, JsonFileCatalog};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::csv_loader::BatchEntry;
use crate::report::BatchSummary;

/// Year of the bracket table built into the engine.
pub const DEFAULT_TAX_YEAR: i32 = 2024;

/// Reference-data overrides from the command line. Each one wins over the
/// matching `[data]` key in the config file.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataOverrides<'a> {
    pub catalog: Option<&'a Path>,
    pub brackets: Option<&'a Path>,
    pub tax_year: Option<i32>,
}

pub fn build_engine(
    config: &AppConfig,
    overrides: DataOverrides<'_>,
) -> Result<PlanEngine> {
    let catalog_path = overrides.catalog.or(config.data.catalog.as_deref());
    let catalog = match catalog_path {
        Some(path) => JsonFileCatalog::new(path)
            .load()
            .with_context(|| format!("cannot load catalog '{}'", path.display()))?,
        None => EmbeddedCatalog.load().context("embedded catalog is invalid")?,
    };

    let tax_year = overrides
        .tax_year
        .or(config.data.tax_year)
        .unwrap_or(DEFAULT_TAX_YEAR);
    let brackets_path = overrides.brackets.or(config.data.brackets.as_deref());
    let tax_table = match brackets_path {
        Some(path) => BracketLoader::load_file(path, tax_year)
            .with_context(|| format!("cannot load {tax_year} brackets from '{}'", path.display()))?,
        None => {
            if tax_year != DEFAULT_TAX_YEAR {
                anyhow::bail!(
                    "no bracket file given and the built-in table covers {DEFAULT_TAX_YEAR} only"
                );
            }
            debug!("using built-in {DEFAULT_TAX_YEAR} bracket table");
            TaxTable::default()
        }
    };

    info!(
        catalog_version = catalog.version(),
        strategies = catalog.len(),
        tax_year,
        "plan engine ready"
    );
    Ok(PlanEngine::new(catalog, tax_table, config.engine.clone()))
}

/// Runs every batch entry through the engine, keeping file order.
pub fn run_batch(
    engine: &PlanEngine,
    entries: &[BatchEntry],
) -> Vec<BatchSummary> {
    entries
        .iter()
        .map(|entry| {
            let _span = tracing::debug_span!("batch_row", row = entry.row).entered();
            let report = engine.plan(&entry.profile, &entry.inputs);
            BatchSummary::new(entry.row, entry.profile.income_type, &report)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn defaults_use_embedded_data() {
        let engine = build_engine(&AppConfig::default(), DataOverrides::default()).unwrap();

        assert_eq!(engine.catalog().version(), "2025.3");
        assert_eq!(engine.tax_table(), &TaxTable::default());
    }

    #[test]
    fn other_year_needs_bracket_file() {
        let overrides = DataOverrides {
            tax_year: Some(2025),
            ..Default::default()
        };

        let result = build_engine(&AppConfig::default(), overrides);

        assert!(result.is_err());
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let overrides = DataOverrides {
            catalog: Some(Path::new("no/such/catalog.json")),
            ..Default::default()
        };

        let err = build_engine(&AppConfig::default(), overrides).unwrap_err();

        assert!(format!("{err:#}").contains("no/such/catalog.json"));
    }
}
