use super::{house_edge, CalculatorError};

/// Converts between a bet and the total wager it supports at a fixed RTP.
///
/// `wager = bet / (1 - rtp/100)` and `bet = wager * (1 - rtp/100)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RtpWagerInverter {
    rtp: f64,
    edge: f64,
}

impl RtpWagerInverter {
    /// Build for `rtp` percent. Rejects values outside `[0, 100)`.
    pub fn new(rtp: f64) -> Result<Self, CalculatorError> {
        if !rtp.is_finite() || !(0.0..=100.0).contains(&rtp) {
            return Err(CalculatorError::RtpOutOfRange(rtp));
        }
        let edge = house_edge(rtp);
        if edge <= 0.0 {
            return Err(CalculatorError::RtpSingular);
        }
        Ok(Self { rtp, edge })
    }

    /// RTP the inverter was built for.
    pub fn rtp(&self) -> f64 {
        self.rtp
    }

    /// Wager supported by `bet`; `None` unless `bet` is positive and finite.
    pub fn wager_for_bet(&self, bet: f64) -> Option<f64> {
        positive(bet).map(|bet| bet / self.edge)
    }

    /// Bet needed for `wager`; `None` unless `wager` is positive and finite.
    pub fn bet_for_wager(&self, wager: f64) -> Option<f64> {
        positive(wager).map(|wager| wager * self.edge)
    }
}

fn positive(value: f64) -> Option<f64> {
    (value.is_finite() && value > 0.0).then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_in_both_directions() -> Result<(), CalculatorError> {
        let inverter = RtpWagerInverter::new(96.0)?;
        let wager = inverter.wager_for_bet(10.0).expect("positive bet");
        assert!((wager - 250.0).abs() < 1e-9);
        let bet = inverter.bet_for_wager(250.0).expect("positive wager");
        assert!((bet - 10.0).abs() < 1e-9);
        Ok(())
    }

    #[test]
    fn rejects_singular_and_out_of_range_rtp() {
        assert_eq!(
            RtpWagerInverter::new(100.0),
            Err(CalculatorError::RtpSingular)
        );
        assert_eq!(
            RtpWagerInverter::new(101.0),
            Err(CalculatorError::RtpOutOfRange(101.0))
        );
        assert!(RtpWagerInverter::new(-1.0).is_err());
        assert!(RtpWagerInverter::new(f64::NAN).is_err());
    }

    #[test]
    fn non_positive_amounts_have_no_result() -> Result<(), CalculatorError> {
        let inverter = RtpWagerInverter::new(0.0)?;
        assert_eq!(inverter.wager_for_bet(5.0), Some(5.0));
        assert_eq!(inverter.wager_for_bet(0.0), None);
        assert_eq!(inverter.bet_for_wager(-3.0), None);
        Ok(())
    }
}
