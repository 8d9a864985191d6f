//! Strategy catalog: the versioned, read-only set of strategy definitions.
//!
//! A catalog is loaded once at startup through a [`CatalogSource`] and then
//! shared read-only by every evaluation. Its version tag is copied into each
//! [`StrategyStack`](crate::models::StrategyStack) so callers that cache
//! stacks can discard them with a [`StalenessPolicy`] when the catalog
//! changes.

use std::collections::HashSet;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{StrategyCategory, StrategyDefinition};

const DEFAULT_CATALOG_JSON: &str = include_str!("../../data/default_catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog version tag is empty")]
    EmptyVersion,

    #[error("strategy id must not be empty")]
    EmptyStrategyId,

    #[error("duplicate strategy id: {0}")]
    DuplicateStrategyId(String),

    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("catalog source error: {0}")]
    Source(String),
}

/// On-disk shape of a catalog document.
#[derive(Debug, Deserialize)]
struct CatalogDocument {
    version: String,
    strategies: Vec<StrategyDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCatalog {
    version: String,
    definitions: Vec<StrategyDefinition>,
}

impl StrategyCatalog {
    /// Builds a catalog, rejecting an empty version tag and empty or
    /// duplicate strategy ids.
    pub fn new(
        version: impl Into<String>,
        definitions: Vec<StrategyDefinition>,
    ) -> Result<Self, CatalogError> {
        let version = version.into();
        if version.trim().is_empty() {
            return Err(CatalogError::EmptyVersion);
        }

        let mut seen = HashSet::new();
        for definition in &definitions {
            if definition.id.trim().is_empty() {
                return Err(CatalogError::EmptyStrategyId);
            }
            if !seen.insert(definition.id.as_str()) {
                return Err(CatalogError::DuplicateStrategyId(definition.id.clone()));
            }
        }

        Ok(Self {
            version,
            definitions,
        })
    }

    /// Parses a `{ "version": ..., "strategies": [...] }` document.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(json)?;
        Self::new(document.version, document.strategies)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Definitions in catalog order.
    pub fn definitions(&self) -> &[StrategyDefinition] {
        &self.definitions
    }

    pub fn get(
        &self,
        id: &str,
    ) -> Option<&StrategyDefinition> {
        self.definitions.iter().find(|definition| definition.id == id)
    }

    pub fn in_category(
        &self,
        category: StrategyCategory,
    ) -> impl Iterator<Item = &StrategyDefinition> {
        self.definitions
            .iter()
            .filter(move |definition| definition.category == category)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// Where a catalog comes from.
pub trait CatalogSource {
    fn load(&self) -> Result<StrategyCatalog, CatalogError>;
}

/// The catalog compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogSource for EmbeddedCatalog {
    fn load(&self) -> Result<StrategyCatalog, CatalogError> {
        let catalog = StrategyCatalog::from_json(DEFAULT_CATALOG_JSON)?;
        tracing::info!(
            version = catalog.version(),
            strategies = catalog.len(),
            "loaded embedded strategy catalog"
        );
        Ok(catalog)
    }
}

/// Decides whether results produced under one catalog version must be
/// discarded now that another version is current.
pub trait StalenessPolicy {
    fn is_stale(
        &self,
        cached_version: &str,
        current_version: &str,
    ) -> bool;
}

impl<F> StalenessPolicy for F
where
    F: Fn(&str, &str) -> bool,
{
    fn is_stale(
        &self,
        cached_version: &str,
        current_version: &str,
    ) -> bool {
        self(cached_version, current_version)
    }
}

/// Any version change invalidates cached results.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExactVersion;

impl StalenessPolicy for ExactVersion {
    fn is_stale(
        &self,
        cached_version: &str,
        current_version: &str,
    ) -> bool {
        cached_version != current_version
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{Complexity, CriteriaSet};

    fn definition(id: &str) -> StrategyDefinition {
        StrategyDefinition::new(
            id,
            "Title",
            StrategyCategory::DeductionStrategies,
            Complexity::Beginner,
            CriteriaSet::default(),
        )
    }

    #[test]
    fn new_rejects_empty_version() {
        let result = StrategyCatalog::new("  ", vec![definition("a")]);

        assert!(matches!(result, Err(CatalogError::EmptyVersion)));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = StrategyCatalog::new("1", vec![definition("a"), definition("a")]);

        assert!(matches!(result, Err(CatalogError::DuplicateStrategyId(id)) if id == "a"));
    }

    #[test]
    fn new_rejects_empty_id() {
        let result = StrategyCatalog::new("1", vec![definition("")]);

        assert!(matches!(result, Err(CatalogError::EmptyStrategyId)));
    }

    #[test]
    fn embedded_catalog_loads() {
        let catalog = EmbeddedCatalog.load().unwrap();

        assert_eq!(catalog.version(), "2025.3");
        assert_eq!(catalog.len(), 13);
        assert!(catalog.get("mso-strategy").is_some());
        assert_eq!(
            catalog
                .get("mso-strategy")
                .map(|definition| definition.conditional_cta_rules.len()),
            Some(1)
        );
    }

    #[test]
    fn embedded_catalog_has_no_unknown_criteria() {
        fn has_unknown(set: &CriteriaSet) -> bool {
            set.iter().any(|criterion| match criterion {
                crate::models::Criterion::Unknown { .. } => true,
                crate::models::Criterion::Any(sets) | crate::models::Criterion::All(sets) => {
                    sets.iter().any(has_unknown)
                }
                crate::models::Criterion::Exclude(set) => has_unknown(set),
                _ => false,
            })
        }

        let catalog = EmbeddedCatalog.load().unwrap();

        for definition in catalog.definitions() {
            assert!(
                !has_unknown(&definition.eligibility_criteria),
                "{} has an unknown criterion",
                definition.id
            );
        }
    }

    #[test]
    fn in_category_keeps_catalog_order() {
        let catalog = EmbeddedCatalog.load().unwrap();

        let ids: Vec<&str> = catalog
            .in_category(StrategyCategory::ExitPlanning)
            .map(|definition| definition.id.as_str())
            .collect();

        assert_eq!(
            ids,
            vec!["qsbs-exclusion", "deferred-sales-trust", "opportunity-zone-fund"]
        );
    }

    #[test]
    fn from_json_reports_parse_errors() {
        let result = StrategyCatalog::from_json("{\"version\": \"1\"}");

        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[test]
    fn exact_version_policy() {
        assert!(ExactVersion.is_stale("2025.1", "2025.2"));
        assert!(!ExactVersion.is_stale("2025.2", "2025.2"));
    }

    #[test]
    fn closure_policy() {
        let major_only = |cached: &str, current: &str| {
            cached.split('.').next() != current.split('.').next()
        };

        assert!(!major_only.is_stale("2025.1", "2025.2"));
        assert!(major_only.is_stale("2024.9", "2025.1"));
    }
}
