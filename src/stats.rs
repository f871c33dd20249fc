//! Portfolio figures over a set of loan records, plus filtering and sorting.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::record::LoanRecord;

/// Tag filter value that matches every loan.
pub const ALL_TAGS: &str = "All";

/// Contains the aggregate figures of a set of loans.
///
/// Monthly payment and remaining balance only count loans that are still active.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    /// Number of loans considered.
    pub total_loans: usize,
    /// Loans with installments still to be billed.
    pub active_loans: usize,
    /// Loans whose every installment is past due.
    pub completed_loans: usize,
    /// Sum of the installments of the active loans.
    pub total_monthly_payment: Decimal,
    /// Sum of the remaining balances of the active loans.
    pub total_remaining_balance: Decimal,
    /// Number of loans per tag, over the whole portfolio.
    pub tag_counts: BTreeMap<String, usize>,
}

/// Aggregate figures for the loans sharing one tag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagStats {
    /// Number of loans with the tag.
    pub total_loans: usize,
    /// Loans with the tag that are still active.
    pub active_loans: usize,
    /// Sum of the installments of the active loans.
    pub total_monthly_payment: Decimal,
    /// Sum of the remaining balances of the active loans.
    pub total_remaining_balance: Decimal,
}

impl PortfolioStats {
    pub fn from_records(records: &[LoanRecord]) -> Self {
        let mut stats = Self::totals(records.iter());
        stats.tag_counts = tag_counts(records);
        stats
    }

    /// Figures for the loans carrying `tag` (`None` or `"All"` for every loan).
    ///
    /// `tag_counts` still covers the whole portfolio.
    pub fn for_tag(records: &[LoanRecord], tag: Option<&str>) -> Self {
        match tag {
            None | Some(ALL_TAGS) => Self::from_records(records),
            Some(tag) => {
                let mut stats = Self::totals(records.iter().filter(|r| r.terms.tag() == tag));
                stats.tag_counts = tag_counts(records);
                stats
            }
        }
    }

    fn totals<'a>(records: impl Iterator<Item = &'a LoanRecord>) -> Self {
        let mut stats = Self::default();

        for record in records {
            stats.total_loans += 1;
            if record.is_completed {
                stats.completed_loans += 1;
            } else {
                stats.active_loans += 1;
                stats.total_monthly_payment += record.installment_amount;
                stats.total_remaining_balance += record.remaining_balance;
            }
        }

        stats
    }
}

fn tag_counts(records: &[LoanRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.terms.tag().to_string()).or_insert(0) += 1;
    }
    counts
}

/// Groups the records by tag and totals each group.
pub fn stats_by_tag(records: &[LoanRecord]) -> BTreeMap<String, TagStats> {
    let mut stats: BTreeMap<String, TagStats> = BTreeMap::new();

    for record in records {
        let entry = stats.entry(record.terms.tag().to_string()).or_default();
        entry.total_loans += 1;

        if record.is_active() {
            entry.active_loans += 1;
            entry.total_monthly_payment += record.installment_amount;
            entry.total_remaining_balance += record.remaining_balance;
        }
    }

    stats
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Keep the input order.
    #[default]
    None,
    /// Item name, ascending, ignoring case.
    Name,
    /// Remaining balance, largest first.
    Balance,
}

/// Selection of loans to display.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanFilter {
    /// Keep all, only active or only completed loans.
    pub status: StatusFilter,
    /// Only loans with this tag; `None` or `"All"` keeps every tag.
    pub tag: Option<String>,
    /// Case-insensitive substring of the item name.
    pub search: String,
    /// Order of the selected loans.
    pub sort_by: SortKey,
}

impl LoanFilter {
    pub fn apply<'a>(&self, records: &'a [LoanRecord]) -> Vec<&'a LoanRecord> {
        let search = self.search.to_lowercase();

        let mut selected: Vec<&LoanRecord> = records
            .iter()
            .filter(|r| r.terms.item_name.to_lowercase().contains(&search))
            .filter(|r| match self.status {
                StatusFilter::All => true,
                StatusFilter::Active => r.is_active(),
                StatusFilter::Completed => r.is_completed,
            })
            .filter(|r| match self.tag.as_deref() {
                None | Some(ALL_TAGS) => true,
                Some(tag) => r.terms.tag() == tag,
            })
            .collect();

        match self.sort_by {
            SortKey::None => {}
            SortKey::Name => selected.sort_by_key(|r| r.terms.item_name.to_lowercase()),
            SortKey::Balance => selected.sort_by(|a, b| b.remaining_balance.cmp(&a.remaining_balance)),
        }

        selected
    }

    /// Distinct tags present in the records, sorted.
    pub fn unique_tags(records: &[LoanRecord]) -> Vec<String> {
        tag_counts(records).into_keys().collect()
    }
}
