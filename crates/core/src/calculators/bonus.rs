use serde::{Deserialize, Serialize};

use super::{house_edge, parse_amount};

/// RTP prefilled in the bonus calculator.
pub const DEFAULT_BONUS_RTP: f64 = 99.0;

/// Inputs of the bonus wagering calculator, as persisted under `savedCalculations`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusCalculation {
    /// Own deposit the bonus is measured against.
    pub base_amount: f64,
    /// Bonus credited by the casino.
    pub bonus_amount: f64,
    /// Wagering requirement multiplier.
    pub multiplier: f64,
    /// RTP of the game used to clear the requirement, in percent.
    pub rtp: f64,
}

/// Results of the bonus wagering calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BonusOutcome {
    /// Total bets needed to clear the bonus.
    pub wager_required: f64,
    /// Expected loss while wagering.
    pub expected_loss: f64,
    /// Bonus left after the expected loss.
    pub net_result: f64,
    /// `net_result / base_amount`; `None` when the base is not positive.
    pub factor_loss: Option<f64>,
}

impl BonusCalculation {
    /// Build from raw form text. Returns `None` when any field is malformed.
    pub fn parse(base: &str, bonus: &str, multiplier: &str, rtp: &str) -> Option<Self> {
        Some(Self {
            base_amount: parse_amount(base)?,
            bonus_amount: parse_amount(bonus)?,
            multiplier: parse_amount(multiplier)?,
            rtp: parse_amount(rtp)?,
        })
    }

    /// Evaluate the wagering formulas.
    ///
    /// Returns `None` when bonus, multiplier, or RTP is not finite. A missing
    /// or non-positive base only leaves `factor_loss` undefined.
    pub fn evaluate(&self) -> Option<BonusOutcome> {
        evaluate(
            Some(self.base_amount),
            self.bonus_amount,
            self.multiplier,
            self.rtp,
        )
    }
}

/// Evaluate with an optional base amount, for forms where the base is still empty.
pub(crate) fn evaluate(
    base_amount: Option<f64>,
    bonus_amount: f64,
    multiplier: f64,
    rtp: f64,
) -> Option<BonusOutcome> {
    if ![bonus_amount, multiplier, rtp].iter().all(|value| value.is_finite()) {
        return None;
    }
    let wager_required = bonus_amount * multiplier;
    let expected_loss = wager_required * house_edge(rtp);
    let net_result = bonus_amount - expected_loss;
    let factor_loss = base_amount
        .filter(|base| base.is_finite() && *base > 0.0)
        .map(|base| net_result / base);
    Some(BonusOutcome {
        wager_required,
        expected_loss,
        net_result,
        factor_loss,
    })
}

impl BonusOutcome {
    /// Evaluate raw form fields, tolerating an empty base amount.
    pub fn from_form(base: &str, bonus: &str, multiplier: &str, rtp: &str) -> Option<Self> {
        evaluate(
            parse_amount(base),
            parse_amount(bonus)?,
            parse_amount(multiplier)?,
            parse_amount(rtp)?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn evaluates_reference_bonus() {
        let calculation = BonusCalculation {
            base_amount: 30.0,
            bonus_amount: 54.0,
            multiplier: 67.0,
            rtp: 99.0,
        };
        let outcome = calculation.evaluate().expect("valid inputs");
        assert!(close(outcome.wager_required, 3618.0));
        assert!(close(outcome.expected_loss, 36.18));
        assert!(close(outcome.net_result, 17.82));
        assert!(close(outcome.factor_loss.expect("positive base"), 0.594));
    }

    #[test]
    fn non_positive_base_leaves_factor_undefined() {
        let outcome = BonusOutcome::from_form("0", "54", "67", "99").expect("valid inputs");
        assert_eq!(outcome.factor_loss, None);
        assert!(close(outcome.net_result, 17.82));

        let outcome = BonusOutcome::from_form("", "54", "67", "99").expect("valid inputs");
        assert_eq!(outcome.factor_loss, None);
    }

    #[test]
    fn malformed_inputs_have_no_result() {
        assert!(BonusOutcome::from_form("30", "", "67", "99").is_none());
        assert!(BonusOutcome::from_form("30", "54", "x", "99").is_none());
        assert!(BonusCalculation::parse("30", "54", "67", "").is_none());
        let nan = BonusCalculation {
            base_amount: 30.0,
            bonus_amount: f64::NAN,
            multiplier: 1.0,
            rtp: 99.0,
        };
        assert!(nan.evaluate().is_none());
    }

    #[test]
    fn persists_with_dataset_field_names() -> anyhow::Result<()> {
        let calculation = BonusCalculation::parse("30", "54", "67", "99").expect("valid");
        let json = serde_json::to_value(calculation)?;
        assert_eq!(
            json,
            serde_json::json!({ "baseAmount": 30.0, "bonusAmount": 54.0, "multiplier": 67.0, "rtp": 99.0 })
        );
        Ok(())
    }
}
