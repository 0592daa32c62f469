mod bracket_table;
mod cpp_config;
mod province;
mod tax_bracket;
mod tax_year_config;

pub use bracket_table::{BracketTable, BracketTableError};
pub use cpp_config::{CppConfig, CppConfigError};
pub use province::ProvinceCode;
pub use tax_bracket::TaxBracket;
pub use tax_year_config::{TaxYearConfig, TaxYearConfigError};
