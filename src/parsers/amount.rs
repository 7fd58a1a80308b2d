use crate::error::ParseError;
use once_cell::sync::Lazy;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Brazilian-formatted amount: 1 to 3 digits, then `.ddd` thousand groups,
/// then a mandatory `,dd` cents part. Matches `123,45` and `1.234.567,89`.
static AMOUNT_REGEX: Lazy<regex::Regex> = Lazy::new(|| {
    regex::Regex::new(r"\d{1,3}(?:\.\d{3})*,\d{2}").expect("Invalid amount regex")
});

const DISCOUNT_SCALE: u32 = 2;

/// Parse the first Brazilian-formatted amount found anywhere in `text`.
///
/// `"Valor de avaliação: R$ 190.000,00"` gives `190000.00`. The value keeps its
/// two fractional digits.
pub fn parse_amount(text: &str) -> Result<Decimal, ParseError> {
    let unparsable = || ParseError::UnparsableAmount {
        text: text.to_string(),
    };

    let matched = AMOUNT_REGEX.find(text).ok_or_else(unparsable)?;
    let normalized = matched.as_str().replace('.', "").replace(',', ".");

    Decimal::from_str(&normalized).map_err(|_| unparsable())
}

/// Percentage of `sale` below `appraisal`, rounded half-up to 2 places.
///
/// A sale above the appraisal gives a negative discount. A negative discount
/// that rounds to zero is reported as `0.00`, never `-0.00`.
pub fn compute_discount(appraisal: Decimal, sale: Decimal) -> Result<Decimal, ParseError> {
    if appraisal.is_zero() {
        return Err(ParseError::DivisionByZero { appraisal });
    }

    let percent = (appraisal - sale)
        .checked_div(appraisal)
        .and_then(|rate| rate.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| ParseError::UnparsableAmount {
            text: format!("{sale} against {appraisal}"),
        })?;

    let mut rounded =
        percent.round_dp_with_strategy(DISCOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero);
    // round_dp never widens the scale; 0.5 must still print as 0.50
    rounded.rescale(DISCOUNT_SCALE);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    Ok(rounded)
}
