use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ReferenceDate;
use crate::dates::add_months;
use crate::error::TermsError;
use crate::progress::evaluate_progress;
use crate::round_money;
use crate::schedule::{build_schedule, ScheduleEntry, ScheduleInput};
use crate::solver::{annuity_payment, monthly_rate};
use crate::terms::LoanTerms;

/// A fully computed loan, ready to be handed to persistence.
///
/// Records are never updated in place: recalculating runs the whole pipeline again and
/// replaces the previous record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    /// Opaque identifier, kept across recalculations.
    pub id: String,
    /// The terms the record was computed from, with defaults filled in.
    pub terms: LoanTerms,
    /// The monthly installment, rounded to minor units.
    pub installment_amount: Decimal,
    /// Principal plus discounted interest plus GST.
    pub total_loan_cost: Decimal,
    /// Interest over the whole tenure, after the loan's discount.
    pub total_interest_after_discount: Decimal,
    /// Sum of the GST charged on every interest portion.
    pub total_gst: Decimal,
    /// Installments due strictly before the reference date.
    pub completed_installments: u32,
    /// Installments still to be billed.
    pub remaining_tenure_months: u32,
    /// Principal plus GST, minus the principal already repaid.
    pub remaining_balance: Decimal,
    /// Due date of the last installment.
    pub end_date: NaiveDate,
    /// True once every installment is due before the reference date.
    pub is_completed: bool,
    /// The full amortization schedule, one entry per installment.
    pub schedule: Vec<ScheduleEntry>,
}

impl LoanRecord {
    /// Re-runs the pipeline on the carried terms, keeping this record's identifier.
    pub fn recalculate(&self, reference_date: NaiveDate) -> LoanRecord {
        compute_loan_record(self.terms.clone(), Some(&self.id), reference_date)
    }

    pub fn is_active(&self) -> bool {
        !self.is_completed
    }
}

/// Computes the complete record of a loan as of `reference_date`.
///
/// The terms are not validated here; see [`try_compute_loan_record`]. When `existing_id` is
/// `None` a new UUID is generated.
pub fn compute_loan_record(terms: LoanTerms, existing_id: Option<&str>, reference_date: NaiveDate) -> LoanRecord {
    let terms = terms.normalized();
    let rate = monthly_rate(terms.annual_interest_rate_percent);

    let installment = annuity_payment(terms.principal, terms.annual_interest_rate_percent, terms.tenure_months);

    let schedule = build_schedule(&ScheduleInput {
        principal: terms.principal,
        tenure_months: terms.tenure_months,
        monthly_rate: rate,
        start_date: terms.start_date,
        installment_amount: installment,
        interest_discount: terms.discount(),
        discount_kind: terms.discount_kind(),
        gst_percent: terms.gst(),
    });

    let progress = evaluate_progress(terms.start_date, terms.tenure_months, reference_date);

    // Rounded portions, so the balance foots against the displayed schedule.
    let principal_repaid: Decimal = schedule
        .entries
        .iter()
        .take(progress.completed_installments as usize)
        .map(|entry| entry.principal_portion)
        .sum();

    let id = match existing_id {
        Some(id) => id.to_string(),
        None => Uuid::new_v4().to_string(),
    };

    tracing::debug!(
        loan_id = %id,
        installment = %round_money(installment),
        completed = progress.completed_installments,
        remaining = progress.remaining_months,
        "Computed loan record"
    );

    LoanRecord {
        id,
        installment_amount: round_money(installment),
        total_loan_cost: round_money(terms.principal + schedule.total_interest_after_discount + schedule.total_gst),
        total_interest_after_discount: schedule.total_interest_after_discount,
        total_gst: schedule.total_gst,
        completed_installments: progress.completed_installments,
        remaining_tenure_months: progress.remaining_months,
        remaining_balance: round_money(terms.principal + schedule.total_gst - principal_repaid),
        end_date: add_months(terms.start_date, terms.tenure_months.saturating_sub(1)),
        is_completed: progress.is_completed(),
        schedule: schedule.entries,
        terms,
    }
}

/// Validates the terms, then computes the record.
///
/// This is the entry point for callers that receive terms from outside (forms, stored rows).
pub fn try_compute_loan_record(
    terms: LoanTerms,
    existing_id: Option<&str>,
    reference_date: NaiveDate,
) -> Result<LoanRecord, TermsError> {
    terms.validate()?;
    Ok(compute_loan_record(terms, existing_id, reference_date))
}

/// Computes the record against a configured reference date.
pub fn compute_loan_record_with(terms: LoanTerms, existing_id: Option<&str>, reference: &ReferenceDate) -> LoanRecord {
    compute_loan_record(terms, existing_id, reference.resolve())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terms::DiscountKind;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn laptop() -> LoanTerms {
        LoanTerms::new("Laptop", dec!(50000), dec!(0), 10, ymd(2024, 1, 15))
    }

    #[test]
    fn test_zero_rate_loan() {
        let record = compute_loan_record(laptop(), None, ymd(2024, 1, 1));

        assert_eq!(record.installment_amount, dec!(5000.00));
        assert_eq!(record.total_interest_after_discount, dec!(0));
        assert_eq!(record.total_gst, dec!(0));
        assert_eq!(record.total_loan_cost, dec!(50000));
        assert_eq!(record.end_date, ymd(2024, 10, 15));
        assert_eq!(record.completed_installments, 0);
        assert_eq!(record.remaining_tenure_months, 10);
        assert_eq!(record.remaining_balance, dec!(50000));
        assert!(!record.is_completed);
        assert_eq!(record.schedule.len(), 10);
    }

    #[test]
    fn test_remaining_balance_uses_paid_installments() {
        // Installments of Jan 15, Feb 15 and Mar 15 are due before Mar 20.
        let record = compute_loan_record(laptop(), None, ymd(2024, 3, 20));

        assert_eq!(record.completed_installments, 3);
        assert_eq!(record.remaining_tenure_months, 7);
        assert_eq!(record.remaining_balance, dec!(35000));
    }

    #[test]
    fn test_completed_loan() {
        let record = compute_loan_record(laptop(), None, ymd(2025, 1, 1));

        assert!(record.is_completed);
        assert!(!record.is_active());
        assert_eq!(record.remaining_tenure_months, 0);
        assert_eq!(record.remaining_balance, dec!(0));
    }

    #[test]
    fn test_totals_include_discount_and_gst() {
        let terms = LoanTerms::new("Car", dec!(100000), dec!(12), 12, ymd(2024, 1, 1))
            .with_discount(dec!(10), DiscountKind::Percent)
            .with_gst(dec!(18));

        let record = compute_loan_record(terms, None, ymd(2024, 1, 1));
        let gst: Decimal = record.schedule.iter().map(|e| e.gst_on_interest).sum();

        assert_eq!(record.total_gst, gst);
        assert_eq!(
            record.total_loan_cost,
            dec!(100000) + record.total_interest_after_discount + record.total_gst
        );
        assert_eq!(record.remaining_balance, dec!(100000) + record.total_gst);
    }

    #[test]
    fn test_existing_id_is_kept() {
        let record = compute_loan_record(laptop(), Some("loan-42"), ymd(2024, 5, 1));
        let recalculated = record.recalculate(ymd(2024, 8, 1));

        assert_eq!(record.id, "loan-42");
        assert_eq!(recalculated.id, "loan-42");
        assert!(recalculated.completed_installments > record.completed_installments);
    }

    #[test]
    fn test_new_ids_are_unique() {
        let first = compute_loan_record(laptop(), None, ymd(2024, 5, 1));
        let second = compute_loan_record(laptop(), None, ymd(2024, 5, 1));

        assert_ne!(first.id, second.id);
        assert!(Uuid::parse_str(&first.id).is_ok());
    }

    #[test]
    fn test_terms_are_carried_normalized() {
        let record = compute_loan_record(laptop(), None, ymd(2024, 5, 1));

        assert_eq!(record.terms.tag.as_deref(), Some("Personal"));
        assert_eq!(record.terms.gst_percent, Some(dec!(0)));
        assert_eq!(record.terms.interest_discount_kind, Some(DiscountKind::Percent));
    }

    #[test]
    fn test_try_compute_rejects_invalid_terms() {
        let terms = LoanTerms { principal: dec!(-1), ..laptop() };

        assert_eq!(
            try_compute_loan_record(terms, None, ymd(2024, 5, 1)),
            Err(TermsError::NonPositivePrincipal(dec!(-1)))
        );
    }

    #[test]
    fn test_compute_with_fixed_reference() {
        let reference = ReferenceDate::Fixed(ymd(2024, 2, 16));

        let record = compute_loan_record_with(laptop(), Some("a"), &reference);

        assert_eq!(record.completed_installments, 2);
    }
}
