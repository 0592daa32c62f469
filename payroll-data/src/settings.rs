//! User settings: the annual income projection and province that every
//! calculation is run against.
//!
//! Settings are read from a TOML file. Every key is optional:
//!
//! ```toml
//! province = "BC"
//! annual_income = "85000"
//! brackets_file = "brackets_2025.csv"
//!
//! [cpp]
//! max_pensionable_earnings = "71300"
//! ```
//!
//! Amounts may be written as strings or numbers. Keys left out of `[cpp]`
//! keep their 2024 values.

use std::fs;
use std::path::{Path, PathBuf};

use payroll_core::{CppConfig, CppConfigError, ProvinceCode, TaxYearConfig};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::loader::{BracketLoader, BracketLoaderError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("annual income must be non-negative, got {0}")]
    NegativeAnnualIncome(Decimal),

    #[error(transparent)]
    Cpp(#[from] CppConfigError),

    #[error(transparent)]
    Brackets(#[from] BracketLoaderError),
}

/// Overrides for individual CPP constants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CppOverrides {
    pub basic_exemption: Option<Decimal>,
    pub max_pensionable_earnings: Option<Decimal>,
    pub self_employed_rate: Option<Decimal>,
    pub employee_rate: Option<Decimal>,
}

impl CppOverrides {
    fn apply(
        &self,
        base: CppConfig,
    ) -> CppConfig {
        CppConfig {
            basic_exemption: self.basic_exemption.unwrap_or(base.basic_exemption),
            max_pensionable_earnings: self
                .max_pensionable_earnings
                .unwrap_or(base.max_pensionable_earnings),
            self_employed_rate: self.self_employed_rate.unwrap_or(base.self_employed_rate),
            employee_rate: self.employee_rate.unwrap_or(base.employee_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Province code used for provincial tax. Unknown codes use Ontario.
    pub province: String,

    /// Projected income for the year; rates are derived from it.
    pub annual_income: Decimal,

    /// CSV file with bracket tables. Relative paths resolve against the
    /// settings file's directory. The built-in tables are used when absent.
    pub brackets_file: Option<PathBuf>,

    pub cpp: CppOverrides,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            province: "ON".to_string(),
            annual_income: Decimal::ZERO,
            brackets_file: None,
            cpp: CppOverrides::default(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text.
    pub fn parse(text: &str) -> Result<Self, SettingsError> {
        let settings: Settings = toml::from_str(text)?;
        if settings.annual_income < Decimal::ZERO {
            return Err(SettingsError::NegativeAnnualIncome(settings.annual_income));
        }
        Ok(settings)
    }

    /// Read settings from `path`, resolving a relative `brackets_file`
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let mut settings = Self::parse(&text)?;

        if let (Some(file), Some(dir)) = (settings.brackets_file.as_mut(), path.parent()) {
            if file.is_relative() {
                *file = dir.join(&*file);
            }
        }

        debug!(path = %path.display(), province = %settings.province, "loaded settings");
        Ok(settings)
    }

    /// Read settings from `path` when given, otherwise use the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// CPP constants with any overrides applied.
    pub fn cpp_config(&self) -> Result<CppConfig, SettingsError> {
        let cpp = self.cpp.apply(CppConfig::canada_2024());
        cpp.validate()?;
        Ok(cpp)
    }

    /// Bracket tables and CPP constants these settings select.
    pub fn tax_year_config(&self) -> Result<TaxYearConfig, SettingsError> {
        let cpp = self.cpp_config()?;
        let config = match &self.brackets_file {
            Some(path) => BracketLoader::from_path(path, cpp)?,
            None => BracketLoader::builtin_2024(cpp)?,
        };

        if ProvinceCode::parse(&self.province).is_none() {
            warn!(province = %self.province, "unknown province code, Ontario tables apply");
        }
        Ok(config)
    }
}
