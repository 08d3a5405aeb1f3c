use mortgage_core::amortization::{compute_schedule, LoanInput, RateStructure};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Amortization engine tests
// ===========================================================================

const CENT: Decimal = dec!(0.01);
const COMPONENT_TOLERANCE: Decimal = dec!(0.000001);

fn sample_fixed_loan() -> LoanInput {
    // The typical quote: 200k over 25 years at 3.5% fixed
    LoanInput {
        principal: dec!(200000),
        term_years: 25,
        rate: RateStructure::Fixed {
            annual_rate: dec!(3.5),
        },
    }
}

fn sample_mixed_loan() -> LoanInput {
    // 5 fixed years at 2.5%, then Euribor 3.0 + 1.0 spread
    LoanInput {
        principal: dec!(200000),
        term_years: 25,
        rate: RateStructure::Mixed {
            fixed_rate: dec!(2.5),
            reference_rate: dec!(3.0),
            spread: dec!(1.0),
            fixed_years: 5,
        },
    }
}

#[test]
fn test_fixed_schedule_shape() {
    let out = compute_schedule(&sample_fixed_loan()).unwrap();
    let result = &out.result;

    assert_eq!(result.schedule.len(), 300);
    for (i, row) in result.schedule.iter().enumerate() {
        assert_eq!(row.month, i as u32 + 1);
    }
    assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_fixed_initial_payment_matches_closed_form() {
    let out = compute_schedule(&sample_fixed_loan()).unwrap();
    let result = &out.result;

    // B * r(1+r)^n / ((1+r)^n - 1) with r = 0.035/12, n = 300 gives 1001.2471...
    assert!(
        (result.initial_monthly_payment - dec!(1001.2471)).abs() < dec!(0.001),
        "initial payment {}",
        result.initial_monthly_payment
    );

    // Every month of a fixed loan carries the same installment and rate
    for row in &result.schedule {
        assert_eq!(row.payment, result.initial_monthly_payment);
        assert_eq!(row.annual_rate, dec!(3.5));
    }
}

#[test]
fn test_components_sum_to_payment() {
    let out = compute_schedule(&sample_fixed_loan()).unwrap();
    for row in &out.result.schedule {
        let delta = (row.principal_component + row.interest_component - row.payment).abs();
        assert!(delta < COMPONENT_TOLERANCE, "month {}: delta {}", row.month, delta);
    }
}

#[test]
fn test_balance_non_increasing() {
    let out = compute_schedule(&sample_fixed_loan()).unwrap();
    let schedule = &out.result.schedule;
    for pair in schedule.windows(2) {
        assert!(
            pair[1].remaining_balance <= pair[0].remaining_balance,
            "balance rose between months {} and {}",
            pair[0].month,
            pair[1].month
        );
    }
}

#[test]
fn test_totals_are_consistent() {
    let loan = sample_fixed_loan();
    let out = compute_schedule(&loan).unwrap();
    let result = &out.result;

    let interest_sum: Decimal = result.schedule.iter().map(|r| r.interest_component).sum();
    assert!((result.total_interest - interest_sum).abs() < COMPONENT_TOLERANCE);
    assert_eq!(result.total_paid, loan.principal + result.total_interest);
    assert!(result.total_interest > Decimal::ZERO);

    // ~100,374 of interest over the life of this loan
    assert!((result.total_interest - dec!(100374.14)).abs() < dec!(1));
}

#[test]
fn test_degenerate_zero_rate_loan() {
    let loan = LoanInput {
        principal: dec!(120000),
        term_years: 10,
        rate: RateStructure::Fixed {
            annual_rate: Decimal::ZERO,
        },
    };
    let out = compute_schedule(&loan).unwrap();
    let result = &out.result;

    assert_eq!(result.schedule.len(), 120);
    assert_eq!(result.total_interest, Decimal::ZERO);
    assert_eq!(result.total_paid, dec!(120000));
    for row in &result.schedule {
        assert_eq!(row.payment, dec!(1000));
        assert_eq!(row.principal_component, dec!(1000));
        assert_eq!(row.interest_component, Decimal::ZERO);
    }
    assert_eq!(result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_variable_loan_prices_once() {
    let loan = LoanInput {
        principal: dec!(150000),
        term_years: 20,
        rate: RateStructure::Variable {
            reference_rate: dec!(3.0),
            spread: dec!(1.0),
        },
    };
    let out = compute_schedule(&loan).unwrap();
    let result = &out.result;

    // Reference + spread billed every month, single payment throughout
    for row in &result.schedule {
        assert_eq!(row.annual_rate, dec!(4.0));
        assert_eq!(row.payment, result.initial_monthly_payment);
    }
}

#[test]
fn test_mixed_reprices_at_first_variable_month() {
    let out = compute_schedule(&sample_mixed_loan()).unwrap();
    let schedule = &out.result.schedule;

    // Months 1..60 billed at the fixed rate with the opening payment
    for row in &schedule[..60] {
        assert_eq!(row.annual_rate, dec!(2.5));
        assert_eq!(row.payment, out.result.initial_monthly_payment);
    }

    // Month 61 switches to reference + spread and re-prices
    let repriced = schedule[60].payment;
    assert_eq!(schedule[60].annual_rate, dec!(4.0));
    assert!(repriced != schedule[59].payment);
    assert!(repriced > schedule[59].payment, "4.0% > 2.5% must raise the installment");

    // The re-priced installment holds for the rest of the term
    for row in &schedule[60..] {
        assert_eq!(row.payment, repriced);
        assert_eq!(row.annual_rate, dec!(4.0));
    }

    assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);
}

#[test]
fn test_mixed_reprice_level() {
    // Closed form over the month-61 balance and 240 remaining months at 4.0%
    // lands near 1026.05 for the sample loan
    let out = compute_schedule(&sample_mixed_loan()).unwrap();
    let repriced = out.result.schedule[60].payment;
    assert!((repriced - dec!(1026.05)).abs() < CENT, "repriced {}", repriced);
}

#[test]
fn test_initial_payment_is_the_opening_quote() {
    // Mixed fixed segment at 2.5% quotes below the repriced 4.0% installment
    let out = compute_schedule(&sample_mixed_loan()).unwrap();
    assert_eq!(out.result.initial_monthly_payment, out.result.schedule[0].payment);
    assert!(out.result.initial_monthly_payment < out.result.schedule[60].payment);
}

#[test]
fn test_mixed_zero_rate_variable_segment() {
    // Reference and spread both 0 (the default when absent): the re-price at
    // month 61 has no interest to annuitize and must fall back to paying the
    // remaining balance in equal slices
    let loan = LoanInput {
        principal: dec!(200000),
        term_years: 25,
        rate: RateStructure::Mixed {
            fixed_rate: dec!(2.5),
            reference_rate: Decimal::ZERO,
            spread: Decimal::ZERO,
            fixed_years: 5,
        },
    };
    let out = compute_schedule(&loan).unwrap();
    let schedule = &out.result.schedule;

    let balance_at_switch = schedule[59].remaining_balance;
    let repriced = schedule[60].payment;
    assert!((repriced - balance_at_switch / dec!(240)).abs() < COMPONENT_TOLERANCE);

    for row in &schedule[60..] {
        assert_eq!(row.annual_rate, Decimal::ZERO);
        assert_eq!(row.interest_component, Decimal::ZERO);
        assert_eq!(row.payment, repriced);
    }
    assert_eq!(schedule.last().unwrap().remaining_balance, Decimal::ZERO);

    // Interest accrues only during the fixed segment
    let fixed_interest: Decimal = schedule[..60].iter().map(|r| r.interest_component).sum();
    assert_eq!(out.result.total_interest, fixed_interest);
}

#[test]
fn test_one_year_loan() {
    let loan = LoanInput {
        principal: dec!(12000),
        term_years: 1,
        rate: RateStructure::Fixed {
            annual_rate: dec!(5.0),
        },
    };
    let out = compute_schedule(&loan).unwrap();
    assert_eq!(out.result.schedule.len(), 12);
    assert_eq!(out.result.schedule.last().unwrap().remaining_balance, Decimal::ZERO);
    assert!(out.result.initial_monthly_payment > dec!(1000));
}
