//! Behavioural properties of the calculator over the built-in 2024 tables.

use payroll_core::calculations::{calculate_tax_amount, common::round_half_up};
use payroll_core::{BracketTable, ProvinceCode, TaxCalculator, TaxCalculatorError, TaxYearConfig};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn incomes() -> impl Iterator<Item = Decimal> {
    (0..=400).map(|step| Decimal::from(step * 1_250))
}

fn assert_within_relative(
    actual: Decimal,
    expected: Decimal,
    tolerance: Decimal,
) {
    let allowed = expected.abs() * tolerance;
    assert!(
        (actual - expected).abs() <= allowed,
        "{actual} differs from {expected} by more than {allowed}"
    );
}

#[test]
fn tax_amount_is_monotonic_for_every_table() {
    let config = TaxYearConfig::canada_2024();
    // Zero-rate first bracket and a repeated rate.
    let custom = BracketTable::from_records(&[
        (dec!(0), Some(dec!(12000)), dec!(0)),
        (dec!(12000), Some(dec!(60000)), dec!(0.2)),
        (dec!(60000), Some(dec!(150000)), dec!(0.2)),
        (dec!(150000), None, dec!(0.35)),
    ])
    .unwrap();
    let mut tables = vec![config.federal(), &custom];
    tables.extend(config.provinces().map(|p| config.provincial_table(p.as_str()).1));

    for table in tables {
        let mut previous = Decimal::ZERO;
        for income in incomes() {
            let tax = calculate_tax_amount(income, table);
            assert!(
                tax >= previous,
                "tax fell from {previous} to {tax} at income {income}"
            );
            previous = tax;
        }
    }
}

#[test]
fn tax_amount_at_zero_income_is_zero_for_every_table() {
    let config = TaxYearConfig::canada_2024();

    assert_eq!(calculate_tax_amount(Decimal::ZERO, config.federal()), Decimal::ZERO);
    for province in config.provinces() {
        let (_, table) = config.provincial_table(province.as_str());
        assert_eq!(calculate_tax_amount(Decimal::ZERO, table), Decimal::ZERO);
    }
}

#[test]
fn federal_tax_at_first_boundary() {
    let config = TaxYearConfig::canada_2024();

    assert_eq!(
        calculate_tax_amount(dec!(55867), config.federal()),
        dec!(55867) * dec!(0.15)
    );
}

#[test]
fn marginal_rates_at_75000_in_ontario() {
    let config = TaxYearConfig::canada_2024();

    let rates = TaxCalculator::new(&config)
        .marginal_tax_rate(dec!(75000), "ON")
        .unwrap();

    assert_eq!(rates.federal_rate, dec!(0.205));
    assert_eq!(rates.provincial_rate, dec!(0.0915));
}

#[test]
fn cpp_floor_ceiling_and_clamp() {
    let config = TaxYearConfig::canada_2024();
    let calculator = TaxCalculator::new(&config);

    assert_eq!(calculator.cpp_contribution(dec!(3500), true).unwrap(), Decimal::ZERO);
    assert_eq!(
        calculator.cpp_contribution(dec!(68500), true).unwrap(),
        (dec!(68500) - dec!(3500)) * dec!(0.119)
    );
    assert_eq!(
        calculator.cpp_contribution(dec!(100000), true).unwrap(),
        calculator.cpp_contribution(dec!(68500), true).unwrap()
    );
}

#[test]
fn gross_up_round_trips_across_incomes_and_provinces() {
    let config = TaxYearConfig::canada_2024();
    let calculator = TaxCalculator::new(&config);
    let nets = [dec!(0.01), dec!(1000), dec!(4321.99), dec!(250000)];

    for province in ProvinceCode::ALL {
        for income in incomes().step_by(20) {
            let rate = calculator
                .total_deduction_rate(income, province.as_str())
                .unwrap();
            assert!(rate < Decimal::ONE);

            for net in nets {
                let gross = calculator
                    .gross_from_net(net, income, province.as_str())
                    .unwrap()
                    .gross_amount;
                assert_within_relative(gross * (Decimal::ONE - rate), net, dec!(0.000001));
            }
        }
    }
}

#[test]
fn unknown_province_behaves_like_ontario() {
    let config = TaxYearConfig::canada_2024();
    let calculator = TaxCalculator::new(&config);

    for income in incomes().step_by(25) {
        assert_eq!(
            calculator.marginal_tax_rate(income, "XX").unwrap(),
            calculator.marginal_tax_rate(income, "ON").unwrap()
        );
        assert_eq!(
            calculator.gross_from_net(dec!(1000), income, "XX"),
            calculator.gross_from_net(dec!(1000), income, "ON")
        );
    }
}

#[test]
fn gross_up_scenario_at_50000_in_ontario() {
    let config = TaxYearConfig::canada_2024();
    let calculator = TaxCalculator::new(&config);

    let rates = calculator.marginal_tax_rate(dec!(50000), "ON").unwrap();
    let result = calculator
        .gross_from_net(dec!(1000), dec!(50000), "ON")
        .unwrap();

    assert_eq!(rates.effective_federal_rate, dec!(0.15));
    assert_eq!(rates.effective_provincial_rate, dec!(0.05113058));
    assert_eq!(round_half_up(result.gross_amount), dec!(1470.87));
    assert_within_relative(result.net_amount(), dec!(1000), dec!(0.000001));
}

#[test]
fn gross_up_rejects_negative_inputs() {
    let config = TaxYearConfig::canada_2024();
    let calculator = TaxCalculator::new(&config);

    assert!(matches!(
        calculator.gross_from_net(dec!(-1), dec!(50000), "ON"),
        Err(TaxCalculatorError::InvalidInput { .. })
    ));
    assert!(matches!(
        calculator.gross_from_net(dec!(1), dec!(-1), "ON"),
        Err(TaxCalculatorError::InvalidInput { .. })
    ));
}
