use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by [`CppConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CppConfigError {
    #[error("basic exemption must be non-negative, got {0}")]
    InvalidBasicExemption(Decimal),

    #[error("maximum pensionable earnings {max} must exceed the basic exemption {exemption}")]
    InvalidMaxPensionableEarnings { max: Decimal, exemption: Decimal },

    #[error("self-employed CPP rate must be between 0 and 1, got {0}")]
    InvalidSelfEmployedRate(Decimal),

    #[error("employee CPP rate must be between 0 and 1, got {0}")]
    InvalidEmployeeRate(Decimal),
}

/// Canada Pension Plan parameters for one contribution year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CppConfig {
    /// Income below this amount is not pensionable.
    pub basic_exemption: Decimal,

    /// Ceiling on pensionable earnings (the YMPE).
    pub max_pensionable_earnings: Decimal,

    /// Combined employee and employer rate paid by the self-employed.
    pub self_employed_rate: Decimal,

    /// Employee-only rate.
    pub employee_rate: Decimal,
}

impl CppConfig {
    pub fn canada_2024() -> Self {
        Self {
            basic_exemption: dec!(3500),
            max_pensionable_earnings: dec!(68500),
            self_employed_rate: dec!(0.119),
            employee_rate: dec!(0.0595),
        }
    }

    /// Largest amount of earnings a contribution can be computed on.
    pub fn max_contributory_earnings(&self) -> Decimal {
        self.max_pensionable_earnings - self.basic_exemption
    }

    pub fn rate(
        &self,
        is_self_employed: bool,
    ) -> Decimal {
        if is_self_employed {
            self.self_employed_rate
        } else {
            self.employee_rate
        }
    }

    pub fn validate(&self) -> Result<(), CppConfigError> {
        if self.basic_exemption < Decimal::ZERO {
            return Err(CppConfigError::InvalidBasicExemption(self.basic_exemption));
        }
        if self.max_pensionable_earnings <= self.basic_exemption {
            return Err(CppConfigError::InvalidMaxPensionableEarnings {
                max: self.max_pensionable_earnings,
                exemption: self.basic_exemption,
            });
        }
        if self.self_employed_rate < Decimal::ZERO || self.self_employed_rate >= Decimal::ONE {
            return Err(CppConfigError::InvalidSelfEmployedRate(
                self.self_employed_rate,
            ));
        }
        if self.employee_rate < Decimal::ZERO || self.employee_rate >= Decimal::ONE {
            return Err(CppConfigError::InvalidEmployeeRate(self.employee_rate));
        }
        Ok(())
    }
}

impl Default for CppConfig {
    fn default() -> Self {
        Self::canada_2024()
    }
}
