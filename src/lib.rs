//! `emi_engine` is a Rust library for tracking installment loans (EMIs, Equated Monthly Installments).
//!
//! Given the terms of a loan it computes:
//! - the fixed monthly installment, with a dedicated branch for zero-interest loans;
//! - the month by month amortization schedule, including tax (GST) on each interest portion;
//! - the loan level interest discount and the aggregate figures (total cost, total interest, total GST);
//! - the progress of the loan as of a reference date (paid installments, remaining tenure and balance).
//!
//! The engine is pure: every figure is derived from the terms and the reference date passed in.
//! Persistence and the choice of "today" belong to the caller.
//!
//! ## Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use emi_engine::{compute_loan_record, LoanTerms};
//! use rust_decimal_macros::dec;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let terms = LoanTerms::new("Laptop", dec!(50000), dec!(0), 10, start);
//!
//! let today = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
//! let record = compute_loan_record(terms, None, today);
//!
//! assert_eq!(record.installment_amount, dec!(5000));
//! assert_eq!(record.completed_installments, 2);
//! assert_eq!(record.end_date, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
//! ```

pub mod batch;
pub mod config;
pub mod dates;
pub mod error;
pub mod progress;
pub mod record;
pub mod schedule;
pub mod solver;
pub mod stats;
pub mod terms;

pub use batch::{recalculate_all, RecalculationFailure, RecalculationReport};
pub use config::ReferenceDate;
pub use error::TermsError;
pub use progress::{evaluate_progress, Progress};
pub use record::{compute_loan_record, compute_loan_record_with, try_compute_loan_record, LoanRecord};
pub use schedule::{apply_interest_discount, build_schedule, AmortizationSchedule, ScheduleEntry, ScheduleInput};
pub use solver::{annuity_payment, monthly_rate, solve_installment};
pub use stats::{stats_by_tag, LoanFilter, PortfolioStats, SortKey, StatusFilter, TagStats};
pub use terms::{DiscountKind, LoanTerms, DEFAULT_TAG};

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds an amount to currency minor units (2 decimal places, half away from zero).
///
/// A tiny negative residue rounds to a plain zero, never `-0.00`.
pub fn round_money(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() { rounded.abs() } else { rounded }
}
