//! Pure aggregations over games and pots.
//!
//! Every function accepts either the full catalog or a filtered subset and
//! returns empty or zero results for empty input.

mod games;
mod pots;

use serde::Serialize;

pub use games::{
    average_rtp_by_provider, count_by_category, count_by_provider, overall_average_rtp,
    top_providers, volatility_histogram, CatalogSummary, ProviderRtp, TOP_PROVIDER_COUNT,
};
pub use pots::{
    bet_range_win_probabilities, bets_by_hour, hourly_bet_summaries, remove_outliers,
    top_winners, winning_amounts_over_time, BetRangeBucket, BetRangeReport, BoxSummary,
    PayoutPoint, WinCriterion, WinnerSummary, BET_RANGES, TOP_WINNER_COUNT,
};

/// A label with the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NamedCount {
    /// Grouping key (provider, category, volatility label).
    pub name: String,
    /// Records in the group.
    pub count: usize,
}
