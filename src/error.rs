use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a set of loan terms is rejected before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TermsError {
    #[error("item name cannot be blank")]
    BlankItemName,

    #[error("principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    #[error("annual interest rate must be between 0 and 100 percent, got {0}")]
    RateOutOfRange(Decimal),

    #[error("tenure must be between 1 and {max} months, got {got}")]
    TenureOutOfRange { got: u32, max: u32 },

    #[error("interest discount cannot be negative, got {0}")]
    NegativeDiscount(Decimal),

    #[error("GST must be between 0 and 100 percent, got {0}")]
    GstOutOfRange(Decimal),
}
