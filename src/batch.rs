//! Recalculation of many stored loans at once, e.g. the daily refresh.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::TermsError;
use crate::record::{try_compute_loan_record, LoanRecord};

/// A stored loan that could not be recalculated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecalculationFailure {
    /// Identifier of the skipped record.
    pub id: String,
    /// Why its terms were rejected; serialized as the error message.
    #[serde(serialize_with = "serialize_error")]
    pub error: TermsError,
}

fn serialize_error<S: serde::Serializer>(error: &TermsError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of a batch recalculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RecalculationReport {
    /// Every successfully recalculated record, in input order.
    pub records: Vec<LoanRecord>,
    /// Ids of the records whose figures moved since they were stored.
    pub changed: Vec<String>,
    /// Records skipped because their terms are invalid.
    pub failures: Vec<RecalculationFailure>,
}

impl RecalculationReport {
    /// Whether anything needs to be written back.
    pub fn has_changes(&self) -> bool {
        !self.changed.is_empty()
    }
}

/// Recalculates every record against `reference_date`.
///
/// Records are independent: one with invalid terms is reported in `failures` and skipped,
/// the rest are still recalculated.
pub fn recalculate_all(records: &[LoanRecord], reference_date: NaiveDate) -> RecalculationReport {
    let mut report = RecalculationReport::default();

    for stored in records {
        match try_compute_loan_record(stored.terms.clone(), Some(&stored.id), reference_date) {
            Ok(fresh) => {
                if fresh != *stored {
                    report.changed.push(fresh.id.clone());
                }
                report.records.push(fresh);
            }
            Err(error) => {
                tracing::warn!(loan_id = %stored.id, "Skipping loan recalculation: {}", error);
                report.failures.push(RecalculationFailure {
                    id: stored.id.clone(),
                    error,
                });
            }
        }
    }

    tracing::info!(
        total = records.len(),
        changed = report.changed.len(),
        failed = report.failures.len(),
        %reference_date,
        "Recalculated loans"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::compute_loan_record;
    use crate::terms::LoanTerms;
    use rust_decimal_macros::dec;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn stored(id: &str, tenure: u32, as_of: NaiveDate) -> LoanRecord {
        let terms = LoanTerms::new(id, dec!(24000), dec!(10.5), tenure, ymd(2024, 1, 10));
        compute_loan_record(terms, Some(id), as_of)
    }

    #[test]
    fn test_unchanged_records_are_not_reported() {
        let records = vec![stored("tv", 12, ymd(2024, 3, 1)), stored("fridge", 6, ymd(2024, 3, 1))];

        let report = recalculate_all(&records, ymd(2024, 3, 1));

        assert_eq!(report.records, records);
        assert!(!report.has_changes());
        assert!(report.failures.is_empty());
    }

    #[test]
    fn test_progress_moves_with_reference_date() {
        let records = vec![stored("tv", 12, ymd(2024, 3, 1)), stored("fridge", 6, ymd(2024, 3, 1))];

        let report = recalculate_all(&records, ymd(2024, 3, 15));

        assert_eq!(report.changed, vec!["tv".to_string(), "fridge".to_string()]);
        assert_eq!(report.records[0].completed_installments, 3);
        assert!(report.has_changes());
    }

    #[test]
    fn test_invalid_record_does_not_abort_batch() {
        let mut broken = stored("broken", 12, ymd(2024, 3, 1));
        broken.terms.tenure_months = 0;
        let records = vec![stored("tv", 12, ymd(2024, 3, 1)), broken, stored("fridge", 6, ymd(2024, 3, 1))];

        let report = recalculate_all(&records, ymd(2024, 7, 1));

        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[1].id, "fridge");
        assert!(report.records[1].is_completed);
        assert_eq!(
            report.failures,
            vec![RecalculationFailure {
                id: "broken".to_string(),
                error: TermsError::TenureOutOfRange { got: 0, max: 360 },
            }]
        );
    }

    #[test]
    fn test_report_serializes_errors_as_messages() {
        let mut broken = stored("broken", 12, ymd(2024, 3, 1));
        broken.terms.item_name = String::new();

        let report = recalculate_all(&[broken], ymd(2024, 3, 1));
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["failures"][0]["error"], "item name cannot be blank");
    }
}
