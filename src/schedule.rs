use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::dates::add_months;
use crate::round_money;
use crate::terms::DiscountKind;

/// Input parameters for building an amortization schedule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleInput {
    /// The amount borrowed.
    pub principal: Decimal,
    /// The total number of installments.
    pub tenure_months: u32,
    /// The monthly interest rate as a decimal (not percentage).
    pub monthly_rate: Decimal,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
    /// The unrounded fixed installment, as returned by [`crate::annuity_payment`].
    ///
    /// The balance is walked with this value; entries show it rounded.
    pub installment_amount: Decimal,
    /// Discount on the total interest, read according to `discount_kind`.
    pub interest_discount: Decimal,
    /// Whether `interest_discount` is a percentage or a flat amount.
    pub discount_kind: DiscountKind,
    /// Tax on each interest portion, as a percentage.
    pub gst_percent: Decimal,
}

/// Represents the payment details for a single month.
///
/// Amounts are rounded to minor units for display; the running balance used to derive
/// them is kept at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// 1-based installment number.
    pub month: u32,
    /// The start date advanced by `month - 1` months.
    pub due_date: NaiveDate,
    /// The installment, rounded to minor units.
    pub installment_amount: Decimal,
    /// The portion of the installment that covers interest.
    pub interest_portion: Decimal,
    /// The portion of the installment that reduces the principal.
    pub principal_portion: Decimal,
    /// The principal still owed after this installment.
    pub remaining_balance_after: Decimal,
    /// Tax charged on this month's interest.
    pub gst_on_interest: Decimal,
}

/// A full schedule plus the interest and tax totals derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// One entry per installment, in order.
    pub entries: Vec<ScheduleEntry>,
    /// Sum of the unrounded monthly interest, before any discount.
    pub gross_interest: Decimal,
    /// `gross_interest` with the loan's discount applied, rounded to minor units.
    pub total_interest_after_discount: Decimal,
    /// Sum of the rounded monthly GST amounts.
    pub total_gst: Decimal,
}

/// Builds the month by month amortization schedule of a fixed-installment loan.
///
/// Each month the interest is charged on the running balance and the rest of the
/// installment goes to principal. The interest discount is a loan level concession: it is
/// applied once to the accumulated unrounded interest, never per month.
pub fn build_schedule(input: &ScheduleInput) -> AmortizationSchedule {
    let mut remaining_balance = input.principal;
    let mut gross_interest = dec!(0);
    let mut total_gst = dec!(0);
    let mut entries = Vec::with_capacity(input.tenure_months as usize);

    for month in 1..=input.tenure_months {
        let interest = remaining_balance * input.monthly_rate;
        let principal_paid = input.installment_amount - interest;
        remaining_balance -= principal_paid;

        let gst = round_money(interest * input.gst_percent / dec!(100));
        total_gst += gst;
        gross_interest += interest;

        entries.push(ScheduleEntry {
            month,
            due_date: add_months(input.start_date, month - 1),
            installment_amount: round_money(input.installment_amount),
            interest_portion: round_money(interest),
            principal_portion: round_money(principal_paid),
            remaining_balance_after: round_money(remaining_balance),
            gst_on_interest: gst,
        });
    }

    let total_interest_after_discount =
        apply_interest_discount(gross_interest, input.interest_discount, input.discount_kind);

    AmortizationSchedule {
        entries,
        gross_interest,
        total_interest_after_discount,
        total_gst: round_money(total_gst),
    }
}

/// Applies a loan level discount to the total interest, never going below zero.
///
/// The result is rounded to minor units.
pub fn apply_interest_discount(total_interest: Decimal, discount: Decimal, kind: DiscountKind) -> Decimal {
    let discounted = match kind {
        DiscountKind::Percent => total_interest - total_interest * discount / dec!(100),
        DiscountKind::Amount => total_interest - discount,
    };

    round_money(discounted.max(dec!(0)))
}
