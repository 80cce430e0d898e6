use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::parse_decimal;

/// Reward symbol counted as winnings.
pub const USD_SYMBOL: &str = "USD";

/// Player reference inside a pot winner entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotUser {
    /// Public username, the key winners are grouped by.
    pub username: String,
}

/// A player who contributed to a settled pot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotWinner {
    /// Contributing player.
    pub user: PotUser,
    /// Amount the player put into the pot, as a decimal string.
    pub contribution_amount: String,
}

impl PotWinner {
    /// Parsed contribution, `None` when the dataset value is malformed.
    pub fn contribution(&self) -> Option<f64> {
        parse_decimal(&self.contribution_amount)
    }
}

/// A single monetary reward line of a pot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyReward {
    /// Reward amount as a decimal string.
    pub amount: String,
    /// Currency symbol (e.g. `USD`).
    pub symbol: String,
}

/// Rewards paid out when a pot settles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotRewards {
    /// Monetary reward lines.
    #[serde(default)]
    pub money: Vec<MoneyReward>,
}

/// One settled pot from the pot dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotRecord {
    /// Settlement hash, when published.
    #[serde(default)]
    pub hash: Option<String>,
    /// Lifecycle status label, when published.
    #[serde(default)]
    pub status: Option<String>,
    /// Unix timestamp (seconds) the pot opened.
    #[serde(default)]
    pub start_date: Option<i64>,
    /// Unix timestamp (seconds) the pot settled.
    pub finish_date: i64,
    /// Total pot payout as a decimal string.
    pub amount: String,
    /// Contributors in dataset order.
    #[serde(default)]
    pub winners: Vec<PotWinner>,
    /// Payout lines.
    #[serde(default)]
    pub rewards: PotRewards,
}

impl PotRecord {
    /// Parsed pot amount, `None` when malformed.
    pub fn total_amount(&self) -> Option<f64> {
        parse_decimal(&self.amount)
    }

    /// Sum of the pot's USD reward lines. Malformed lines count as zero.
    pub fn usd_reward(&self) -> f64 {
        self.rewards
            .money
            .iter()
            .filter(|reward| reward.symbol == USD_SYMBOL)
            .filter_map(|reward| parse_decimal(&reward.amount))
            .sum()
    }

    /// Settlement time, `None` for timestamps chrono cannot represent.
    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.finish_date, 0)
    }
}
