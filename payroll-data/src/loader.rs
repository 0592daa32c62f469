use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use payroll_core::{
    BracketTable, CppConfig, ProvinceCode, TaxBracket, TaxYearConfig, TaxYearConfigError,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Bracket tables shipped with the crate.
const BRACKETS_2024_CSV: &str = include_str!("../data/brackets_2024.csv");

/// Errors that can occur when loading bracket tables.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown jurisdiction: {0}")]
    UnknownJurisdiction(String),

    #[error("CSV contains no bracket records")]
    NoRecords,

    #[error("CSV mixes tax years {0} and {1}")]
    MixedTaxYears(i32, i32),

    #[error("CSV has no federal (FED) brackets")]
    MissingFederal,

    #[error(transparent)]
    Config(#[from] TaxYearConfigError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A bracket table owner: the federal government or one province.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Jurisdiction {
    Federal,
    Provincial(ProvinceCode),
}

impl Jurisdiction {
    /// Maps a CSV jurisdiction code to a jurisdiction.
    ///
    /// - `FED` → federal
    /// - two-letter province code → that province
    pub fn parse(code: &str) -> Result<Self, BracketLoaderError> {
        if code.trim().eq_ignore_ascii_case("FED") {
            return Ok(Self::Federal);
        }
        ProvinceCode::parse(code)
            .map(Self::Provincial)
            .ok_or_else(|| BracketLoaderError::UnknownJurisdiction(code.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Federal => "FED",
            Self::Provincial(code) => code.as_str(),
        }
    }
}

/// A single record from the bracket CSV file.
///
/// - `tax_year`: The tax year (e.g., 2024)
/// - `jurisdiction`: `FED` or a province code (`ON`, `BC`, ...)
/// - `min_income`: Lower bound of the bracket
/// - `max_income`: Upper bound of the bracket (empty for unlimited)
/// - `rate`: Marginal rate as a decimal (e.g., 0.205)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub jurisdiction: String,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    #[serde(deserialize_with = "deserialize_decimal")]
    pub rate: Decimal,
}

/// Parses a decimal cell from its text so no precision is lost to `f64`.
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    s.trim().parse::<Decimal>().map_err(serde::de::Error::custom)
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket tables stored as CSV.
///
/// Rows may appear in any order; they are grouped by jurisdiction and sorted
/// by `min_income` before each table is validated.
pub struct BracketLoader;

impl BracketLoader {
    /// Parse bracket records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Assemble parsed records into a tax-year configuration.
    ///
    /// All records must belong to the same tax year, a federal table must be
    /// present, and an Ontario table must be present as the provincial
    /// fallback.
    pub fn build(
        records: &[BracketRecord],
        cpp: CppConfig,
    ) -> Result<TaxYearConfig, BracketLoaderError> {
        let first = records.first().ok_or(BracketLoaderError::NoRecords)?;
        let tax_year = first.tax_year;

        let mut groups: BTreeMap<Jurisdiction, Vec<TaxBracket>> = BTreeMap::new();
        for record in records {
            if record.tax_year != tax_year {
                return Err(BracketLoaderError::MixedTaxYears(tax_year, record.tax_year));
            }
            let jurisdiction = Jurisdiction::parse(&record.jurisdiction)?;
            groups.entry(jurisdiction).or_default().push(TaxBracket::new(
                record.min_income,
                record.max_income,
                record.rate,
            ));
        }

        let mut federal = None;
        let mut provincial = BTreeMap::new();

        for (jurisdiction, mut brackets) in groups {
            brackets.sort_by_key(|b| b.min_income);
            debug!(
                jurisdiction = jurisdiction.as_str(),
                brackets = brackets.len(),
                "building bracket table"
            );

            let table = BracketTable::new(brackets).map_err(|source| {
                TaxYearConfigError::InvalidBrackets {
                    jurisdiction: jurisdiction.as_str().to_string(),
                    source,
                }
            })?;

            match jurisdiction {
                Jurisdiction::Federal => federal = Some(table),
                Jurisdiction::Provincial(code) => {
                    provincial.insert(code, table);
                }
            }
        }

        let federal = federal.ok_or(BracketLoaderError::MissingFederal)?;
        info!(
            tax_year,
            provinces = provincial.len(),
            "loaded bracket tables"
        );

        Ok(TaxYearConfig::new(tax_year, federal, provincial, cpp)?)
    }

    /// Parse and build the tables in the CSV file at `path`.
    pub fn from_path(
        path: &Path,
        cpp: CppConfig,
    ) -> Result<TaxYearConfig, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = Self::parse(file)?;
        Self::build(&records, cpp)
    }

    /// The 2024 tables shipped with this crate.
    pub fn builtin_2024(cpp: CppConfig) -> Result<TaxYearConfig, BracketLoaderError> {
        let records = Self::parse(BRACKETS_2024_CSV.as_bytes())?;
        Self::build(&records, cpp)
    }
}
