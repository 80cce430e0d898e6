use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use crate::models::PotRecord;

/// Winners listed on the pot dashboard.
pub const TOP_WINNER_COUNT: usize = 10;

/// Fraction of values kept below the outlier cutoff.
const OUTLIER_PERCENTILE: f64 = 0.95;

/// Accumulated results of one player across every pot they joined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WinnerSummary {
    /// Player username.
    pub username: String,
    /// Sum of the player's contributions.
    pub total_contribution: f64,
    /// Sum of the USD rewards of every pot the player joined.
    pub total_won: f64,
    /// Number of pot appearances.
    pub bet_count: usize,
}

/// Players ranked by total USD won, largest first, truncated to `n`.
///
/// Each appearance adds the player's contribution and the whole pot's USD
/// reward total. Malformed contributions count as zero but still count as a bet.
pub fn top_winners(pots: &[PotRecord], n: usize) -> Vec<WinnerSummary> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut winners: Vec<WinnerSummary> = Vec::new();

    for pot in pots {
        let reward = pot.usd_reward();
        for winner in &pot.winners {
            let contribution = winner.contribution().unwrap_or_else(|| {
                warn!(
                    username = %winner.user.username,
                    raw = %winner.contribution_amount,
                    "malformed contribution amount"
                );
                0.0
            });
            let username = winner.user.username.as_str();
            let position = *index.entry(username).or_insert_with(|| {
                winners.push(WinnerSummary {
                    username: username.to_string(),
                    total_contribution: 0.0,
                    total_won: 0.0,
                    bet_count: 0,
                });
                winners.len() - 1
            });
            let summary = &mut winners[position];
            summary.total_contribution += contribution;
            summary.total_won += reward;
            summary.bet_count += 1;
        }
    }

    winners.sort_by(|a, b| b.total_won.total_cmp(&a.total_won));
    winners.truncate(n);
    winners
}

/// How a contribution is judged to have "won" for the bet range report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum WinCriterion {
    /// The pot's total amount is positive.
    ///
    /// This is the historical dashboard definition. It holds for virtually
    /// every settled pot, so each bucket's probability degenerates to its
    /// share of all contributions.
    #[default]
    PotAmountPositive,
    /// The pot paid out a positive USD reward.
    UsdRewardPositive,
}

impl WinCriterion {
    /// Short label for chart titles.
    pub fn label(self) -> &'static str {
        match self {
            WinCriterion::PotAmountPositive => "pot amount > 0",
            WinCriterion::UsdRewardPositive => "USD reward > 0",
        }
    }

    /// The other criterion.
    pub fn toggled(self) -> Self {
        match self {
            WinCriterion::PotAmountPositive => WinCriterion::UsdRewardPositive,
            WinCriterion::UsdRewardPositive => WinCriterion::PotAmountPositive,
        }
    }

    fn is_win(self, pot: &PotRecord) -> bool {
        match self {
            WinCriterion::PotAmountPositive => pot.total_amount().is_some_and(|amount| amount > 0.0),
            WinCriterion::UsdRewardPositive => pot.usd_reward() > 0.0,
        }
    }
}

/// Contribution bucket bounds: `(label, inclusive upper bound)`. The last bucket is open.
pub const BET_RANGES: [(&str, Option<f64>); 5] = [
    ("0-5k", Some(5_000.0)),
    ("5-10k", Some(10_000.0)),
    ("10-20k", Some(20_000.0)),
    ("20-30k", Some(30_000.0)),
    ("30k+", None),
];

/// Tally for one contribution range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetRangeBucket {
    /// Range label, e.g. `5-10k`.
    pub label: &'static str,
    /// Inclusive upper bound; `None` for the open-ended range.
    pub upper: Option<f64>,
    /// Contributions that fell in this range.
    pub bets: usize,
    /// Of those, contributions judged as wins.
    pub wins: usize,
    /// `wins / total_bets * 100`, where `total_bets` spans every bucket.
    pub probability: f64,
}

/// Win share per contribution range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetRangeReport {
    /// Criterion the wins were counted with.
    pub criterion: WinCriterion,
    /// Buckets in [`BET_RANGES`] order.
    pub buckets: Vec<BetRangeBucket>,
    /// Contributions processed across all buckets.
    pub total_bets: usize,
    /// Contributions skipped because they could not be parsed.
    pub skipped: usize,
}

fn bucket_index(amount: f64) -> usize {
    BET_RANGES
        .iter()
        .position(|(_, upper)| upper.map_or(true, |upper| amount <= upper))
        .unwrap_or(BET_RANGES.len() - 1)
}

/// Bucket every contribution by amount and report each bucket's wins as a
/// percentage of all contributions.
pub fn bet_range_win_probabilities(pots: &[PotRecord], criterion: WinCriterion) -> BetRangeReport {
    let mut buckets: Vec<BetRangeBucket> = BET_RANGES
        .iter()
        .map(|&(label, upper)| BetRangeBucket {
            label,
            upper,
            bets: 0,
            wins: 0,
            probability: 0.0,
        })
        .collect();
    let mut total_bets = 0;
    let mut skipped = 0;

    for pot in pots {
        let won = criterion.is_win(pot);
        for winner in &pot.winners {
            let Some(amount) = winner.contribution() else {
                skipped += 1;
                continue;
            };
            let bucket = &mut buckets[bucket_index(amount)];
            bucket.bets += 1;
            if won {
                bucket.wins += 1;
            }
            total_bets += 1;
        }
    }

    if total_bets > 0 {
        for bucket in &mut buckets {
            bucket.probability = bucket.wins as f64 / total_bets as f64 * 100.0;
        }
    }
    debug!(total_bets, skipped, ?criterion, "bucketed pot contributions");

    BetRangeReport {
        criterion,
        buckets,
        total_bets,
        skipped,
    }
}

/// Drop values above the 95th percentile. Retained values keep their input order.
pub fn remove_outliers(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let cutoff_index = ((sorted.len() as f64 * OUTLIER_PERCENTILE).floor() as usize)
        .min(sorted.len() - 1);
    let cutoff = sorted[cutoff_index];
    values
        .iter()
        .copied()
        .filter(|value| *value <= cutoff)
        .collect()
}

/// One point of the pot payout time series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PayoutPoint {
    /// Settlement time.
    pub finished_at: DateTime<Utc>,
    /// Pot amount.
    pub amount: f64,
}

/// Pot payouts in dataset order. Pots with malformed amounts or dates are skipped.
pub fn winning_amounts_over_time(pots: &[PotRecord]) -> Vec<PayoutPoint> {
    pots.iter()
        .filter_map(|pot| {
            Some(PayoutPoint {
                finished_at: pot.finished_at()?,
                amount: pot.total_amount()?,
            })
        })
        .collect()
}

/// Contributions grouped by the UTC hour their pot settled in.
pub fn bets_by_hour(pots: &[PotRecord]) -> BTreeMap<u32, Vec<f64>> {
    let mut hours: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
    for pot in pots {
        let Some(finished_at) = pot.finished_at() else {
            continue;
        };
        let entry = hours.entry(finished_at.hour()).or_default();
        entry.extend(pot.winners.iter().filter_map(|winner| winner.contribution()));
    }
    hours.retain(|_, values| !values.is_empty());
    hours
}

/// Five-number summary used to draw box plots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    /// Values summarised.
    pub count: usize,
    /// Smallest value.
    pub min: f64,
    /// First quartile.
    pub q1: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub q3: f64,
    /// Largest value.
    pub max: f64,
}

impl BoxSummary {
    /// Summarise `values`; `None` when empty.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = (sorted.len() - 1) as f64 * q;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let weight = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * weight
}

/// Box summary per settlement hour, optionally after [`remove_outliers`].
pub fn hourly_bet_summaries(pots: &[PotRecord], include_outliers: bool) -> Vec<(u32, BoxSummary)> {
    bets_by_hour(pots)
        .into_iter()
        .filter_map(|(hour, values)| {
            let values = if include_outliers {
                values
            } else {
                remove_outliers(&values)
            };
            BoxSummary::from_values(&values).map(|summary| (hour, summary))
        })
        .collect()
}
