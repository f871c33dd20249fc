use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dates::add_months;

/// How far a loan has progressed as of a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    /// Installments whose due date is strictly before the reference date.
    pub completed_installments: u32,
    /// Tenure minus the completed installments.
    pub remaining_months: u32,
}

impl Progress {
    pub fn is_completed(&self) -> bool {
        self.remaining_months == 0
    }
}

/// Counts the installments already due strictly before `reference_date`.
///
/// An installment whose due date equals the reference date is not completed yet: billing
/// happens on or after the due date.
pub fn evaluate_progress(start_date: NaiveDate, tenure_months: u32, reference_date: NaiveDate) -> Progress {
    let completed_installments = (0..tenure_months)
        .map(|offset| add_months(start_date, offset))
        .filter(|due_date| *due_date < reference_date)
        .count() as u32;

    Progress {
        completed_installments,
        remaining_months: tenure_months - completed_installments,
    }
}
