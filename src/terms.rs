use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::TermsError;

/// Tag given to loans that were saved without one.
pub const DEFAULT_TAG: &str = "Personal";

/// Longest tenure accepted, 30 years of monthly installments.
pub const MAX_TENURE_MONTHS: u32 = 360;

/// How the interest discount of a loan is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscountKind {
    /// A percentage of the total interest (e.g. 10 for 10%).
    #[default]
    Percent,
    /// A flat amount taken off the total interest.
    Amount,
}

/// Input parameters of a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Display label of the financed item.
    pub item_name: String,
    /// The amount borrowed.
    pub principal: Decimal,
    /// The annual interest rate as a percentage (e.g., 12 for 12%).
    pub annual_interest_rate_percent: Decimal,
    /// The total number of monthly installments.
    pub tenure_months: u32,
    /// Due date of the first installment.
    pub start_date: NaiveDate,
    /// Discount on the total interest, 0 when absent.
    #[serde(default)]
    pub interest_discount: Option<Decimal>,
    /// How `interest_discount` is read, a percentage when absent.
    #[serde(default)]
    pub interest_discount_kind: Option<DiscountKind>,
    /// Tax charged on each interest portion, as a percentage.
    #[serde(default)]
    pub gst_percent: Option<Decimal>,
    /// Free text category, e.g. "Personal" or "Home".
    #[serde(default)]
    pub tag: Option<String>,
}

impl LoanTerms {
    pub fn new(
        item_name: impl Into<String>,
        principal: Decimal,
        annual_interest_rate_percent: Decimal,
        tenure_months: u32,
        start_date: NaiveDate,
    ) -> Self {
        Self {
            item_name: item_name.into(),
            principal,
            annual_interest_rate_percent,
            tenure_months,
            start_date,
            interest_discount: None,
            interest_discount_kind: None,
            gst_percent: None,
            tag: None,
        }
    }

    pub fn with_discount(mut self, discount: Decimal, kind: DiscountKind) -> Self {
        self.interest_discount = Some(discount);
        self.interest_discount_kind = Some(kind);
        self
    }

    pub fn with_gst(mut self, gst_percent: Decimal) -> Self {
        self.gst_percent = Some(gst_percent);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Parses terms from JSON and rejects them unless they pass [`LoanTerms::validate`].
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let terms: LoanTerms = serde_json::from_str(json).context("Invalid loan terms payload.")?;
        terms.validate()?;
        Ok(terms)
    }

    pub fn discount(&self) -> Decimal {
        self.interest_discount.unwrap_or(dec!(0))
    }

    pub fn discount_kind(&self) -> DiscountKind {
        self.interest_discount_kind.unwrap_or_default()
    }

    pub fn gst(&self) -> Decimal {
        self.gst_percent.unwrap_or(dec!(0))
    }

    /// The loan's tag, falling back to [`DEFAULT_TAG`] when missing or empty.
    ///
    /// Tags are used verbatim: `" Home "` and `"Home"` are different tags.
    pub fn tag(&self) -> &str {
        match self.tag.as_deref() {
            Some(tag) if !tag.is_empty() => tag,
            _ => DEFAULT_TAG,
        }
    }

    /// Returns a copy with every optional field filled with its resolved default.
    pub fn normalized(&self) -> Self {
        Self {
            item_name: self.item_name.clone(),
            principal: self.principal,
            annual_interest_rate_percent: self.annual_interest_rate_percent,
            tenure_months: self.tenure_months,
            start_date: self.start_date,
            interest_discount: Some(self.discount()),
            interest_discount_kind: Some(self.discount_kind()),
            gst_percent: Some(self.gst()),
            tag: Some(self.tag().to_string()),
        }
    }

    /// Checks the documented ranges of every field.
    ///
    /// The engine itself does not re-check them, so callers must run this first.
    pub fn validate(&self) -> Result<(), TermsError> {
        let percent_range = dec!(0)..=dec!(100);

        if self.item_name.trim().is_empty() {
            return Err(TermsError::BlankItemName);
        }
        if self.principal <= dec!(0) {
            return Err(TermsError::NonPositivePrincipal(self.principal));
        }
        if !percent_range.contains(&self.annual_interest_rate_percent) {
            return Err(TermsError::RateOutOfRange(self.annual_interest_rate_percent));
        }
        if !(1..=MAX_TENURE_MONTHS).contains(&self.tenure_months) {
            return Err(TermsError::TenureOutOfRange {
                got: self.tenure_months,
                max: MAX_TENURE_MONTHS,
            });
        }
        if self.discount() < dec!(0) {
            return Err(TermsError::NegativeDiscount(self.discount()));
        }
        if !percent_range.contains(&self.gst()) {
            return Err(TermsError::GstOutOfRange(self.gst()));
        }
        Ok(())
    }
}
