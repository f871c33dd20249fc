use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

use crate::round_money;

/// Converts an annual interest rate percentage to the nominal monthly rate as a decimal.
///
/// 12 (%) per year becomes 0.01 per month. No compounding is applied: EMI loans quote
/// the nominal annual rate.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Calculates the exact fixed monthly payment of a loan, before any rounding.
///
/// The formula is: EMI = P * [r(1 + r)^n] / [(1 + r)^n – 1]. A zero rate makes that formula
/// 0/0, so the principal is split evenly instead.
///
/// The schedule walks the balance with this value; rounding it first would compound the
/// rounding error through `(1 + r)^n` and leave a residue on long loans.
///
/// # Arguments
///
/// * `principal` - The amount borrowed, positive.
/// * `annual_rate_percent` - The annual interest rate as a percentage.
/// * `tenure_months` - The number of installments, at least one.
pub fn annuity_payment(principal: Decimal, annual_rate_percent: Decimal, tenure_months: u32) -> Decimal {
    let rate = monthly_rate(annual_rate_percent);

    if rate.is_zero() {
        return principal / Decimal::from(tenure_months);
    }

    let growth = (dec!(1) + rate).powu(tenure_months.into());
    principal * (rate * growth) / (growth - dec!(1))
}

/// Calculates the fixed monthly installment of a loan, as quoted to the borrower.
///
/// The annuity payment is rounded to minor units. The zero rate quotient is left
/// unrounded; the schedule rounds each entry for display.
pub fn solve_installment(principal: Decimal, annual_rate_percent: Decimal, tenure_months: u32) -> Decimal {
    let installment = annuity_payment(principal, annual_rate_percent, tenure_months);

    if monthly_rate(annual_rate_percent).is_zero() {
        return installment;
    }

    round_money(installment)
}
