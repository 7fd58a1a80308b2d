use rust_decimal::Decimal;
use thiserror::Error;

/// Failures raised while turning one listing item into an [`Offer`](crate::models::Offer).
///
/// Every variant keeps the raw text that triggered it, since the parser is
/// coupled to a page layout that can change without notice.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ParseError {
    /// A required line is missing or empty in one of the item blocks
    #[error("missing {field} line in block: {block:?}")]
    MalformedField { field: &'static str, block: String },

    /// No Brazilian-formatted amount could be found in the text
    #[error("no amount found in text: {text:?}")]
    UnparsableAmount { text: String },

    /// Discount requested against a zero appraisal value
    #[error("cannot compute discount against appraisal value {appraisal}")]
    DivisionByZero { appraisal: Decimal },

    /// A listing item lacks one of the elements the page layout should provide
    #[error("listing item has no element matching `{selector}`: {html:?}")]
    MissingElement { selector: &'static str, html: String },
}
