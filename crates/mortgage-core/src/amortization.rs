//! French amortization engine for fixed, variable, and mixed-rate mortgages.
//!
//! Produces the full month-by-month schedule under the constant-installment
//! (French) method, including the mid-schedule re-price when a mixed loan
//! leaves its fixed segment. All math in `rust_decimal::Decimal`.

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub(crate) const MONTHS_PER_YEAR: u32 = 12;

/// Divisor turning an annual percentage rate into a monthly decimal fraction
/// (100 for the percent, 12 for the months).
const PERCENT_TO_MONTHLY: Decimal = dec!(1200);

/// Sub-cent balance residue collapses to zero at the end of the schedule.
const BALANCE_EPSILON: Decimal = dec!(0.01);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Interest-rate regime of the loan. Each variant carries exactly the rate
/// fields it bills with; rates are annual percentage points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateStructure {
    /// One nominal annual rate for the whole term.
    Fixed { annual_rate: Percent },
    /// Reference index (e.g. Euribor) plus lender spread.
    Variable {
        reference_rate: Percent,
        spread: Percent,
    },
    /// Fixed rate for the first `fixed_years`, reference plus spread after.
    Mixed {
        fixed_rate: Percent,
        reference_rate: Percent,
        spread: Percent,
        fixed_years: u32,
    },
}

impl RateStructure {
    /// Effective annual rate billed in a given month (1-indexed).
    pub fn annual_rate_at(&self, month: u32) -> Percent {
        match self {
            RateStructure::Fixed { annual_rate } => *annual_rate,
            RateStructure::Variable {
                reference_rate,
                spread,
            } => *reference_rate + *spread,
            RateStructure::Mixed {
                fixed_rate,
                reference_rate,
                spread,
                fixed_years,
            } => {
                if month > fixed_years * MONTHS_PER_YEAR {
                    *reference_rate + *spread
                } else {
                    *fixed_rate
                }
            }
        }
    }
}

/// A loan to amortize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanInput {
    /// Amount financed.
    pub principal: Money,
    /// Term in years (term in months = years * 12).
    pub term_years: u32,
    /// Rate regime.
    pub rate: RateStructure,
}

impl LoanInput {
    pub fn term_months(&self) -> u32 {
        self.term_years * MONTHS_PER_YEAR
    }
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// A single month of the amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Installment {
    /// Month number (1-indexed).
    pub month: u32,
    /// Total installment paid this month.
    pub payment: Money,
    /// Principal repaid this month.
    pub principal_component: Money,
    /// Interest billed this month.
    pub interest_component: Money,
    /// Outstanding balance after this month's payment.
    pub remaining_balance: Money,
    /// Annual rate applied this month, percentage points.
    pub annual_rate: Percent,
}

/// Full amortization result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationOutput {
    /// The month-1 installment, as quoted to the borrower. A mixed loan may
    /// re-price later; this field keeps the opening quote.
    pub initial_monthly_payment: Money,
    /// Sum of all interest components.
    pub total_interest: Money,
    /// Principal plus total interest.
    pub total_paid: Money,
    /// One entry per month, 1..=term_months.
    pub schedule: Vec<Installment>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the full amortization schedule for a loan.
pub fn compute_schedule(
    input: &LoanInput,
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_input(input)?;

    let output = build_schedule(input, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French amortization — constant installment, flat monthly compounding",
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "term_years": input.term_years,
            "rate": input.rate,
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Internal engine
// ---------------------------------------------------------------------------

/// Schedule construction shared with the product analyzer. Assumes a
/// validated input.
pub(crate) fn build_schedule(input: &LoanInput, warnings: &mut Vec<String>) -> AmortizationOutput {
    let total_months = input.term_months();
    let opening_rate = input.rate.annual_rate_at(1);

    // Non-positive opening rate: straight-line repayment, no interest. The
    // level-payment formula would divide by zero here.
    if opening_rate <= Decimal::ZERO && input.principal > Decimal::ZERO {
        warnings.push(format!(
            "Effective annual rate {} is non-positive; repaying straight-line without interest",
            opening_rate
        ));
        return straight_line(input.principal, total_months);
    }

    let switch_month = match input.rate {
        RateStructure::Mixed { fixed_years, .. } => Some(fixed_years * MONTHS_PER_YEAR + 1),
        _ => None,
    };

    let mut schedule: Vec<Installment> = Vec::with_capacity(total_months as usize);
    let mut balance = input.principal;
    let mut total_interest = Decimal::ZERO;

    let mut payment = level_payment(balance, opening_rate, total_months);
    let initial_monthly_payment = payment;

    for month in 1..=total_months {
        let annual_rate = input.rate.annual_rate_at(month);

        // Mixed loans re-price once, at the first month of the variable
        // segment, over the balance and months still outstanding.
        if switch_month == Some(month) {
            payment = level_payment(balance, annual_rate, total_months - month + 1);
        }

        let interest_component = balance * (annual_rate / PERCENT_TO_MONTHLY);
        let principal_component = payment - interest_component;

        balance -= principal_component;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }

        total_interest += interest_component;

        schedule.push(Installment {
            month,
            payment,
            principal_component,
            interest_component,
            remaining_balance: balance,
            annual_rate,
        });
    }

    AmortizationOutput {
        initial_monthly_payment,
        total_interest,
        total_paid: input.principal + total_interest,
        schedule,
    }
}

/// Level payment for a balance amortized over `months` at an annual
/// percentage rate: B * r(1+r)^n / ((1+r)^n - 1).
fn level_payment(balance: Money, annual_rate: Percent, months: u32) -> Money {
    // No interest to annuitize at a non-positive rate, and the closed form
    // would divide by zero. The level payment is the balance in equal
    // slices. Reached with a zero principal, or when a mixed loan's
    // variable segment resolves to 0%.
    if annual_rate <= Decimal::ZERO {
        return balance / Decimal::from(months);
    }

    let r = annual_rate / PERCENT_TO_MONTHLY;
    let growth = (Decimal::ONE + r).powi(months as i64);
    balance * r * growth / (growth - Decimal::ONE)
}

/// Zero-interest repayment in equal principal slices.
fn straight_line(principal: Money, total_months: u32) -> AmortizationOutput {
    let payment = principal / Decimal::from(total_months);
    let mut schedule: Vec<Installment> = Vec::with_capacity(total_months as usize);
    let mut balance = principal;

    for month in 1..=total_months {
        balance -= payment;
        if balance < BALANCE_EPSILON {
            balance = Decimal::ZERO;
        }
        schedule.push(Installment {
            month,
            payment,
            principal_component: payment,
            interest_component: Decimal::ZERO,
            remaining_balance: balance,
            annual_rate: Decimal::ZERO,
        });
    }

    AmortizationOutput {
        initial_monthly_payment: payment,
        total_interest: Decimal::ZERO,
        total_paid: principal,
        schedule,
    }
}

pub(crate) fn validate_loan_input(input: &LoanInput) -> MortgageResult<()> {
    if input.principal < Decimal::ZERO {
        return Err(MortgageError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be non-negative".into(),
        });
    }
    if input.term_years == 0 {
        return Err(MortgageError::InvalidInput {
            field: "term_years".into(),
            reason: "Term must be at least 1 year".into(),
        });
    }
    if let RateStructure::Mixed { fixed_years, .. } = input.rate {
        if fixed_years == 0 {
            return Err(MortgageError::InvalidInput {
                field: "fixed_years".into(),
                reason: "Mixed loans need at least 1 fixed year".into(),
            });
        }
        if fixed_years >= input.term_years {
            return Err(MortgageError::InvalidInput {
                field: "fixed_years".into(),
                reason: "Fixed segment must end before the loan matures".into(),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
