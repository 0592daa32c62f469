use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::{BracketTable, BracketTableError, CppConfig, CppConfigError, ProvinceCode};

/// `(min_income, max_income, rate)` rows; `None` is the open-ended top.
type BracketRecord = (Decimal, Option<Decimal>, Decimal);

const FEDERAL_2024: [BracketRecord; 5] = [
    (dec!(0), Some(dec!(55867)), dec!(0.15)),
    (dec!(55867), Some(dec!(111733)), dec!(0.205)),
    (dec!(111733), Some(dec!(173205)), dec!(0.26)),
    (dec!(173205), Some(dec!(246752)), dec!(0.29)),
    (dec!(246752), None, dec!(0.33)),
];

const ONTARIO_2024: [BracketRecord; 5] = [
    (dec!(0), Some(dec!(49231)), dec!(0.0505)),
    (dec!(49231), Some(dec!(98463)), dec!(0.0915)),
    (dec!(98463), Some(dec!(150000)), dec!(0.1116)),
    (dec!(150000), Some(dec!(220000)), dec!(0.1216)),
    (dec!(220000), None, dec!(0.1316)),
];

const BRITISH_COLUMBIA_2024: [BracketRecord; 7] = [
    (dec!(0), Some(dec!(45654)), dec!(0.0506)),
    (dec!(45654), Some(dec!(91310)), dec!(0.077)),
    (dec!(91310), Some(dec!(104835)), dec!(0.105)),
    (dec!(104835), Some(dec!(127299)), dec!(0.1229)),
    (dec!(127299), Some(dec!(172602)), dec!(0.147)),
    (dec!(172602), Some(dec!(240716)), dec!(0.168)),
    (dec!(240716), None, dec!(0.205)),
];

const ALBERTA_2024: [BracketRecord; 5] = [
    (dec!(0), Some(dec!(148269)), dec!(0.10)),
    (dec!(148269), Some(dec!(177922)), dec!(0.12)),
    (dec!(177922), Some(dec!(237999)), dec!(0.13)),
    (dec!(237999), Some(dec!(355486)), dec!(0.14)),
    (dec!(355486), None, dec!(0.15)),
];

/// Errors raised when assembling a [`TaxYearConfig`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxYearConfigError {
    #[error("no ON bracket table provided; it is required as the fallback")]
    MissingFallbackTable,

    #[error("invalid {jurisdiction} bracket table: {source}")]
    InvalidBrackets {
        jurisdiction: String,
        #[source]
        source: BracketTableError,
    },

    #[error("invalid CPP configuration: {0}")]
    InvalidCpp(#[from] CppConfigError),
}

/// Every rate table and constant needed to run payroll calculations for one year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxYearConfig {
    tax_year: i32,
    federal: BracketTable,
    provincial: BTreeMap<ProvinceCode, BracketTable>,
    cpp: CppConfig,
}

impl TaxYearConfig {
    /// Assembles a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`TaxYearConfigError::MissingFallbackTable`] when `provincial`
    /// has no Ontario table, and [`TaxYearConfigError::InvalidCpp`] when `cpp`
    /// fails validation.
    pub fn new(
        tax_year: i32,
        federal: BracketTable,
        provincial: BTreeMap<ProvinceCode, BracketTable>,
        cpp: CppConfig,
    ) -> Result<Self, TaxYearConfigError> {
        if !provincial.contains_key(&ProvinceCode::FALLBACK) {
            return Err(TaxYearConfigError::MissingFallbackTable);
        }
        cpp.validate()?;

        Ok(Self {
            tax_year,
            federal,
            provincial,
            cpp,
        })
    }

    /// The built-in 2024 federal, Ontario, British Columbia and Alberta tables
    /// with 2024 CPP constants.
    pub fn canada_2024() -> Self {
        fn table(
            jurisdiction: &str,
            records: &[BracketRecord],
        ) -> BracketTable {
            BracketTable::from_records(records)
                .unwrap_or_else(|e| panic!("built-in {jurisdiction} table is invalid: {e}"))
        }

        let provincial = BTreeMap::from([
            (ProvinceCode::Ontario, table("ON", &ONTARIO_2024)),
            (ProvinceCode::BritishColumbia, table("BC", &BRITISH_COLUMBIA_2024)),
            (ProvinceCode::Alberta, table("AB", &ALBERTA_2024)),
        ]);

        Self {
            tax_year: 2024,
            federal: table("FED", &FEDERAL_2024),
            provincial,
            cpp: CppConfig::canada_2024(),
        }
    }

    pub fn tax_year(&self) -> i32 {
        self.tax_year
    }

    pub fn federal(&self) -> &BracketTable {
        &self.federal
    }

    pub fn cpp(&self) -> &CppConfig {
        &self.cpp
    }

    /// Replaces the CPP constants, keeping every bracket table.
    pub fn with_cpp(
        self,
        cpp: CppConfig,
    ) -> Result<Self, TaxYearConfigError> {
        cpp.validate()?;
        Ok(Self { cpp, ..self })
    }

    /// Provinces that have a table of their own.
    pub fn provinces(&self) -> impl Iterator<Item = ProvinceCode> + '_ {
        self.provincial.keys().copied()
    }

    /// Resolves `province` to the table used for it.
    ///
    /// Unknown codes, and known provinces without a table, resolve to the
    /// Ontario table. This is intended behaviour, not an error.
    pub fn provincial_table(
        &self,
        province: &str,
    ) -> (ProvinceCode, &BracketTable) {
        let resolved = ProvinceCode::parse(province)
            .and_then(|code| self.provincial.get(&code).map(|table| (code, table)));
        if let Some(found) = resolved {
            return found;
        }

        debug!(
            province,
            fallback = %ProvinceCode::FALLBACK,
            "no provincial bracket table, using fallback"
        );
        // `new` and `canada_2024` both guarantee the fallback entry.
        let table = &self.provincial[&ProvinceCode::FALLBACK];
        (ProvinceCode::FALLBACK, table)
    }
}

impl Default for TaxYearConfig {
    fn default() -> Self {
        Self::canada_2024()
    }
}
