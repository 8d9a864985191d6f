use std::fs::File;
use std::io::Read;
use std::path::Path;

use plan_core::TaxBracket;
use plan_core::calculations::{TaxTable, TaxTableError};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("malformed bracket CSV: {0}")]
    CsvParse(String),

    #[error("cannot read bracket file: {0}")]
    Io(#[from] std::io::Error),

    #[error("bracket file has no rows for {0}")]
    YearNotFound(i32),

    #[error("{year} brackets do not form a valid table: {source}")]
    InvalidTable {
        year: i32,
        #[source]
        source: TaxTableError,
    },
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        Self::CsvParse(err.to_string())
    }
}

/// One row of `tax_year,min_income,max_income,rate`.
///
/// An empty `max_income` cell marks the open top bracket.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub min_income: Decimal,
    #[serde(deserialize_with = "open_upper_bound")]
    pub max_income: Option<Decimal>,
    pub rate: Decimal,
}

fn open_upper_bound<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let cell = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
    let cell = cell.trim();
    if cell.is_empty() {
        return Ok(None);
    }
    cell.parse().map(Some).map_err(serde::de::Error::custom)
}

/// Loader for bracket tables stored as CSV.
///
/// One file may hold several tax years; [`BracketLoader::table_for_year`]
/// picks one and validates it into a [`TaxTable`].
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader)
            .into_deserialize::<BracketRecord>()
            .map(|row| row.map_err(BracketLoaderError::from))
            .collect()
    }

    /// Build the table for `year` from parsed records.
    ///
    /// Records may appear in any order; they are sorted by lower bound
    /// before validation.
    pub fn table_for_year(
        records: &[BracketRecord],
        year: i32,
    ) -> Result<TaxTable, BracketLoaderError> {
        let mut year_records: Vec<&BracketRecord> = records
            .iter()
            .filter(|record| record.tax_year == year)
            .collect();
        if year_records.is_empty() {
            return Err(BracketLoaderError::YearNotFound(year));
        }
        year_records.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        let brackets = year_records
            .into_iter()
            .map(|record| TaxBracket::new(record.min_income, record.max_income, record.rate))
            .collect();

        TaxTable::new(brackets)
            .map_err(|source| BracketLoaderError::InvalidTable { year, source })
    }

    /// Read a CSV file and build the table for `year`.
    pub fn load_file(
        path: &Path,
        year: i32,
    ) -> Result<TaxTable, BracketLoaderError> {
        let file = File::open(path)?;
        let records = Self::parse(file)?;
        let table = Self::table_for_year(&records, year)?;

        tracing::info!(
            path = %path.display(),
            year,
            brackets = table.brackets().len(),
            "loaded tax bracket table"
        );
        Ok(table)
    }
}
