//! Bonus wagering and RTP wager calculators.
//!
//! Inputs arrive as raw text from form fields. Malformed input produces no
//! result rather than an error; formulas that would divide by zero report an
//! undefined value or a [`CalculatorError`].

mod bonus;
mod rtp_wager;

use thiserror::Error;

pub use bonus::{BonusCalculation, BonusOutcome, DEFAULT_BONUS_RTP};
pub use rtp_wager::RtpWagerInverter;

/// Errors raised when a calculator cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CalculatorError {
    /// RTP outside `[0, 100]` or not a number.
    #[error("RTP {0} is outside 0-100%")]
    RtpOutOfRange(f64),
    /// RTP of exactly 100%: every bet is returned, so no finite wager exists.
    #[error("RTP of 100% leaves no house edge; the wager is undefined")]
    RtpSingular,
}

/// Parse a user-entered amount. Empty, malformed, or non-finite input yields `None`.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Multiplier that turns an RTP percentage into the house edge fraction.
fn house_edge(rtp: f64) -> f64 {
    1.0 - rtp / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_form_amounts() {
        assert_eq!(parse_amount(" 54 "), Some(54.0));
        assert_eq!(parse_amount("0.5"), Some(0.5));
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("12abc"), None);
        assert_eq!(parse_amount("NaN"), None);
    }
}
