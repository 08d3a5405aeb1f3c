//! Bank add-on product analysis: is a rate discount worth its monthly cost?
//!
//! Runs the amortization engine once as a baseline and once per candidate
//! product to quantify interest savings, total product cost, net benefit,
//! and the first month at which cumulative savings beat cumulative cost.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{
    build_schedule, validate_loan_input, AmortizationOutput, LoanInput, RateStructure,
};
use crate::error::MortgageError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::MortgageResult;

// ---------------------------------------------------------------------------
// Input / Output Types
// ---------------------------------------------------------------------------

/// An optional bank product granting a rate discount for a monthly fee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankProduct {
    /// Stable unique identifier. The engine never mutates products.
    pub id: String,
    pub name: String,
    /// Monthly fee for holding the product.
    pub monthly_cost: Money,
    /// Discount on the loan's rate, percentage points.
    pub interest_reduction: Percent,
    /// Whether the borrower has ticked this product. Caller-owned state.
    pub selected: bool,
}

/// Cost/benefit verdict for one product, evaluated in isolation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductAnalysis {
    pub product: BankProduct,
    /// Monthly cost over the full term.
    pub total_cost: Money,
    /// Baseline total interest minus with-product total interest.
    pub total_savings: Money,
    /// total_savings - total_cost.
    pub net_benefit: Money,
    /// First month where accumulated savings exceed accumulated cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakeven_month: Option<u32>,
    /// net_benefit > 0.
    pub recommended: bool,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Evaluate each product independently against the unbonified baseline.
///
/// Marginal what-if analysis: the discount is applied as-is, with no floor,
/// so an oversized discount may push a rate negative. Output order matches
/// input order.
pub fn analyze_products(
    loan: &LoanInput,
    products: &[BankProduct],
) -> MortgageResult<ComputationOutput<Vec<ProductAnalysis>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_input(loan)?;
    validate_products(products)?;

    let baseline = build_schedule(loan, &mut warnings);
    let total_months = loan.term_months();

    let analyses: Vec<ProductAnalysis> = products
        .iter()
        .map(|product| {
            let reduced = LoanInput {
                rate: apply_reduction(&loan.rate, product.interest_reduction, false),
                ..loan.clone()
            };
            if reduced.rate.annual_rate_at(1) < Decimal::ZERO
                || reduced.rate.annual_rate_at(total_months) < Decimal::ZERO
            {
                warnings.push(format!(
                    "Product '{}' pushes a rate below zero in isolation",
                    product.name
                ));
            }

            let with_product = build_schedule(&reduced, &mut warnings);

            let total_savings = baseline.total_interest - with_product.total_interest;
            let total_cost = product.monthly_cost * Decimal::from(total_months);
            let net_benefit = total_savings - total_cost;

            let breakeven_month =
                find_breakeven(&baseline, &with_product, product.monthly_cost);

            ProductAnalysis {
                product: product.clone(),
                total_cost,
                total_savings,
                net_benefit,
                breakeven_month,
                recommended: net_benefit > Decimal::ZERO,
            }
        })
        .collect();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Marginal product analysis — per-product rate discount vs monthly cost",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "term_years": loan.term_years,
            "products": products.len(),
        }),
        warnings,
        elapsed,
        analyses,
    ))
}

/// Amortize the loan with every selected product's discount applied.
///
/// This is the real combined scenario: summed discounts floor each rate
/// field at zero instead of going negative.
pub fn compute_with_selected(
    loan: &LoanInput,
    products: &[BankProduct],
) -> MortgageResult<ComputationOutput<AmortizationOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_loan_input(loan)?;
    validate_products(products)?;

    let total_reduction: Percent = products
        .iter()
        .filter(|p| p.selected)
        .map(|p| p.interest_reduction)
        .sum();

    let reduced = LoanInput {
        rate: apply_reduction(&loan.rate, total_reduction, true),
        ..loan.clone()
    };
    let output = build_schedule(&reduced, &mut warnings);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "French amortization with selected product discounts, floored at 0%",
        &serde_json::json!({
            "principal": loan.principal.to_string(),
            "term_years": loan.term_years,
            "selected": products.iter().filter(|p| p.selected).count(),
            "total_reduction": total_reduction.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// The usual Spanish-bank bonification catalog: payroll deposit, home
/// insurance, life insurance. Nothing selected.
pub fn standard_products() -> Vec<BankProduct> {
    use rust_decimal_macros::dec;
    vec![
        BankProduct {
            id: "payroll".into(),
            name: "Payroll deposit".into(),
            monthly_cost: Decimal::ZERO,
            interest_reduction: dec!(0.5),
            selected: false,
        },
        BankProduct {
            id: "home-insurance".into(),
            name: "Home insurance".into(),
            monthly_cost: dec!(20),
            interest_reduction: dec!(0.2),
            selected: false,
        },
        BankProduct {
            id: "life-insurance".into(),
            name: "Life insurance".into(),
            monthly_cost: dec!(30),
            interest_reduction: dec!(0.3),
            selected: false,
        },
    ]
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Discount the rate field(s) the regime actually bills with: the fixed
/// rate, the spread, or both for mixed loans. The discount lands once per
/// field, never prorated.
fn apply_reduction(rate: &RateStructure, reduction: Percent, floor_at_zero: bool) -> RateStructure {
    let cut = |value: Percent| {
        let reduced = value - reduction;
        if floor_at_zero {
            reduced.max(Decimal::ZERO)
        } else {
            reduced
        }
    };

    match rate {
        RateStructure::Fixed { annual_rate } => RateStructure::Fixed {
            annual_rate: cut(*annual_rate),
        },
        RateStructure::Variable {
            reference_rate,
            spread,
        } => RateStructure::Variable {
            reference_rate: *reference_rate,
            spread: cut(*spread),
        },
        RateStructure::Mixed {
            fixed_rate,
            reference_rate,
            spread,
            fixed_years,
        } => RateStructure::Mixed {
            fixed_rate: cut(*fixed_rate),
            reference_rate: *reference_rate,
            spread: cut(*spread),
            fixed_years: *fixed_years,
        },
    }
}

/// First month where accumulated payment savings strictly exceed the
/// accumulated product cost. Scans in month order, stops at the first
/// crossing.
fn find_breakeven(
    baseline: &AmortizationOutput,
    with_product: &AmortizationOutput,
    monthly_cost: Money,
) -> Option<u32> {
    let mut accumulated_savings = Decimal::ZERO;

    for (i, (base, bonified)) in baseline
        .schedule
        .iter()
        .zip(with_product.schedule.iter())
        .enumerate()
    {
        accumulated_savings += base.payment - bonified.payment;
        let accumulated_cost = monthly_cost * Decimal::from(i as u32 + 1);
        if accumulated_savings > accumulated_cost {
            return Some(i as u32 + 1);
        }
    }
    None
}

fn validate_products(products: &[BankProduct]) -> MortgageResult<()> {
    for product in products {
        if product.monthly_cost < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "monthly_cost".into(),
                reason: format!("Product '{}' has a negative monthly cost", product.id),
            });
        }
        if product.interest_reduction < Decimal::ZERO {
            return Err(MortgageError::InvalidInput {
                field: "interest_reduction".into(),
                reason: format!("Product '{}' has a negative rate discount", product.id),
            });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn fixed_loan() -> LoanInput {
        LoanInput {
            principal: dec!(200000),
            term_years: 25,
            rate: RateStructure::Fixed {
                annual_rate: dec!(3.5),
            },
        }
    }

    #[test]
    fn test_apply_reduction_fixed_unclamped() {
        let rate = RateStructure::Fixed {
            annual_rate: dec!(0.3),
        };
        let reduced = apply_reduction(&rate, dec!(0.5), false);
        assert_eq!(
            reduced,
            RateStructure::Fixed {
                annual_rate: dec!(-0.2)
            }
        );
    }

    #[test]
    fn test_apply_reduction_fixed_clamped() {
        let rate = RateStructure::Fixed {
            annual_rate: dec!(0.3),
        };
        let reduced = apply_reduction(&rate, dec!(0.5), true);
        assert_eq!(
            reduced,
            RateStructure::Fixed {
                annual_rate: Decimal::ZERO
            }
        );
    }

    #[test]
    fn test_apply_reduction_variable_hits_spread_only() {
        let rate = RateStructure::Variable {
            reference_rate: dec!(3.0),
            spread: dec!(1.0),
        };
        let reduced = apply_reduction(&rate, dec!(0.4), true);
        assert_eq!(
            reduced,
            RateStructure::Variable {
                reference_rate: dec!(3.0),
                spread: dec!(0.6),
            }
        );
    }

    #[test]
    fn test_apply_reduction_mixed_hits_both_fields() {
        let rate = RateStructure::Mixed {
            fixed_rate: dec!(2.5),
            reference_rate: dec!(3.0),
            spread: dec!(1.0),
            fixed_years: 5,
        };
        let reduced = apply_reduction(&rate, dec!(0.5), false);
        assert_eq!(
            reduced,
            RateStructure::Mixed {
                fixed_rate: dec!(2.0),
                reference_rate: dec!(3.0),
                spread: dec!(0.5),
                fixed_years: 5,
            }
        );
    }

    #[test]
    fn test_negative_rate_warning_in_marginal_mode() {
        let loan = LoanInput {
            principal: dec!(100000),
            term_years: 10,
            rate: RateStructure::Fixed {
                annual_rate: dec!(0.3),
            },
        };
        let products = vec![BankProduct {
            id: "big".into(),
            name: "Oversized discount".into(),
            monthly_cost: dec!(5),
            interest_reduction: dec!(1.0),
            selected: false,
        }];
        let out = analyze_products(&loan, &products).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("below zero")));
    }

    #[test]
    fn test_validate_rejects_negative_cost() {
        let products = vec![BankProduct {
            id: "bad".into(),
            name: "Bad".into(),
            monthly_cost: dec!(-1),
            interest_reduction: dec!(0.1),
            selected: false,
        }];
        assert!(analyze_products(&fixed_loan(), &products).is_err());
    }

    #[test]
    fn test_standard_catalog_shape() {
        let catalog = standard_products();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.iter().all(|p| !p.selected));
        assert_eq!(catalog[0].monthly_cost, Decimal::ZERO);
    }
}
