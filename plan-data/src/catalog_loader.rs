use std::path::{Path, PathBuf};

use plan_core::{CatalogError, CatalogSource, StrategyCatalog};

/// A strategy catalog stored as a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for JsonFileCatalog {
    fn load(&self) -> Result<StrategyCatalog, CatalogError> {
        let json = std::fs::read_to_string(&self.path)
            .map_err(|e| CatalogError::Source(format!("{}: {}", self.path.display(), e)))?;
        let catalog = StrategyCatalog::from_json(&json)?;

        tracing::info!(
            path = %self.path.display(),
            version = catalog.version(),
            strategies = catalog.len(),
            "loaded strategy catalog"
        );
        Ok(catalog)
    }
}
