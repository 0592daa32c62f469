//! End-to-end tests over the on-disk fixtures: settings select a custom
//! bracket file, salary rows are grossed up on import, and the ledger is
//! exported back to CSV.

use std::path::{Path, PathBuf};

use payroll_core::ledger::{LedgerSummary, TransactionKind, running_totals};
use payroll_core::{ProvinceCode, TaxCalculator, TaxYearConfig};
use payroll_data::{
    BracketLoader, GrossUpContext, LedgerImportError, Settings, export_transactions,
    import_transactions_from_path,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn fixture_config() -> (Settings, TaxYearConfig) {
    let settings = Settings::load(&fixture("settings.toml")).expect("fixture settings should load");
    let config = settings
        .tax_year_config()
        .expect("fixture brackets should build");
    (settings, config)
}

#[test]
fn test_settings_resolve_brackets_file_next_to_settings() {
    let (settings, config) = fixture_config();

    assert_eq!(settings.brackets_file, Some(fixture("brackets.csv")));
    assert_eq!(config.tax_year(), 2025);
    assert_eq!(config.cpp().max_pensionable_earnings, dec!(71300));
    assert_eq!(config.cpp().basic_exemption, dec!(3500));

    let (province, table) = config.provincial_table(&settings.province);
    assert_eq!(province, ProvinceCode::BritishColumbia);
    assert_eq!(table.brackets().len(), 2);
}

#[test]
fn test_fixture_rates() {
    let (settings, config) = fixture_config();

    let rates = TaxCalculator::new(&config)
        .marginal_tax_rate(settings.annual_income, &settings.province)
        .unwrap();

    assert_eq!(rates.federal_rate, dec!(0.20));
    assert_eq!(rates.provincial_rate, dec!(0.10));
    assert_eq!(rates.effective_federal_rate, dec!(0.175));
    assert_eq!(rates.effective_provincial_rate, dec!(0.075));
}

#[test]
fn test_import_grosses_up_salary_rows() {
    let (settings, config) = fixture_config();
    let context = GrossUpContext {
        calculator: TaxCalculator::new(&config),
        annual_income: settings.annual_income,
        province: &settings.province,
    };

    let transactions = import_transactions_from_path(&fixture("transactions.csv"), &context)
        .expect("fixture transactions should import");

    assert_eq!(transactions.len(), 3);

    // 0.175 federal + 0.075 provincial + 0.119 CPP = 0.369 of gross.
    let january = &transactions[0];
    assert_eq!(january.kind, TransactionKind::OwnerSalary);
    assert_eq!(january.amount, dec!(1000));
    assert_eq!(january.federal_tax, dec!(175));
    assert_eq!(january.provincial_tax, dec!(75));
    assert_eq!(january.cpp_payment, dec!(119));

    assert_eq!(transactions[1].kind, TransactionKind::Expense);
    assert_eq!(transactions[1].amount, dec!(50));
    assert_eq!(transactions[2].amount, dec!(2000));

    let summary = LedgerSummary::from_transactions(&transactions).unwrap();
    assert_eq!(summary.total_owner_salary, dec!(3000));
    assert_eq!(summary.total_expenses, dec!(50));
    assert_eq!(summary.total_payroll_tax_owed, dec!(1107));

    let totals = running_totals(&transactions).unwrap();
    assert_eq!(totals[0].transaction.kind, TransactionKind::Expense);
    assert_eq!(totals[1].running_total, dec!(369));
    assert_eq!(totals[2].running_total, dec!(1107));
}

#[test]
fn test_import_then_export() {
    let (settings, config) = fixture_config();
    let context = GrossUpContext {
        calculator: TaxCalculator::new(&config),
        annual_income: settings.annual_income,
        province: &settings.province,
    };
    let transactions =
        import_transactions_from_path(&fixture("transactions.csv"), &context).unwrap();

    let mut buffer = Vec::new();
    export_transactions(&mut buffer, &transactions).unwrap();

    assert_eq!(
        String::from_utf8(buffer).unwrap(),
        "Date,Type,Amount,Federal Tax,Provincial Tax,CPP Payment,Notes\n\
         2025-01-31,owner_salary,1000.00,175.00,75.00,119.00,January pay\n\
         2025-01-15,expense,50.00,0.00,0.00,0.00,Hosting\n\
         2025-02-28,owner_salary,2000.00,350.00,150.00,238.00,February pay\n"
    );
}

#[test]
fn test_missing_import_file() {
    let config = TaxYearConfig::canada_2024();
    let context = GrossUpContext {
        calculator: TaxCalculator::new(&config),
        annual_income: dec!(50000),
        province: "ON",
    };

    let result = import_transactions_from_path(&fixture("missing.csv"), &context);

    assert!(matches!(result, Err(LedgerImportError::Io { .. })));
}

#[test]
fn test_builtin_tables_cover_four_jurisdictions() {
    let config = BracketLoader::builtin_2024(Default::default()).unwrap();

    assert_eq!(config.tax_year(), 2024);
    assert_eq!(
        config.provinces().collect::<Vec<_>>(),
        vec![
            ProvinceCode::Alberta,
            ProvinceCode::BritishColumbia,
            ProvinceCode::Ontario
        ]
    );
}
