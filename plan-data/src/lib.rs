//! Loaders for the reference data the plan engine runs on: strategy catalogs
//! stored as JSON and tax bracket tables stored as CSV.

mod bracket_loader;
mod catalog_loader;

pub use bracket_loader::{BracketLoader, BracketLoaderError, BracketRecord};
pub use catalog_loader::JsonFileCatalog;
