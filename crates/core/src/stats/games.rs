use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::models::GameRecord;

use super::NamedCount;

/// Number of providers shown on the dashboard chart.
pub const TOP_PROVIDER_COUNT: usize = 5;

/// Game count and RTP average for one provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderRtp {
    /// Provider name.
    pub name: String,
    /// Games published by the provider.
    pub count: usize,
    /// Games that publish an RTP.
    pub rtp_count: usize,
    /// Mean RTP over `rtp_count` games; `0.0` when none publish one.
    pub average_rtp: f64,
}

impl ProviderRtp {
    /// Whether the average is backed by at least one published RTP.
    pub fn has_rtp(&self) -> bool {
        self.rtp_count > 0
    }
}

/// Count games per key, keeping first-seen key order.
fn count_by<'a, I, F>(games: I, key: F) -> Vec<NamedCount>
where
    I: IntoIterator<Item = &'a GameRecord>,
    F: Fn(&'a GameRecord) -> Option<&'a str>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<NamedCount> = Vec::new();
    for game in games {
        let Some(name) = key(game) else {
            continue;
        };
        match index.get(name).copied() {
            Some(position) => counts[position].count += 1,
            None => {
                index.insert(name, counts.len());
                counts.push(NamedCount {
                    name: name.to_string(),
                    count: 1,
                });
            }
        }
    }
    counts
}

/// Game count per provider, in first-seen order.
pub fn count_by_provider<'a, I>(games: I) -> Vec<NamedCount>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    count_by(games, |game| Some(game.provider.name.as_str()))
}

/// The `n` providers with the most games, largest first. Ties keep first-seen order.
pub fn top_providers<'a, I>(games: I, n: usize) -> Vec<NamedCount>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut counts = count_by_provider(games);
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Game count per category, in first-seen order.
pub fn count_by_category<'a, I>(games: I) -> Vec<NamedCount>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    count_by(games, |game| Some(game.category.name.as_str()))
}

/// Game count per volatility label. Games without a label are skipped.
pub fn volatility_histogram<'a, I>(games: I) -> Vec<NamedCount>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    count_by(games, |game| game.attributes.volatility.as_deref())
}

#[derive(Default)]
struct RtpAccumulator {
    count: usize,
    rtp_count: usize,
    rtp_sum: f64,
}

impl RtpAccumulator {
    fn push(&mut self, game: &GameRecord) {
        self.count += 1;
        if let Some(rtp) = game.rtp() {
            self.rtp_count += 1;
            self.rtp_sum += rtp;
        }
    }

    fn average(&self) -> f64 {
        if self.rtp_count == 0 {
            0.0
        } else {
            self.rtp_sum / self.rtp_count as f64
        }
    }
}

/// Per-provider game count and mean RTP, in first-seen order.
///
/// The mean only considers games that publish an RTP; providers without any
/// report `0.0` (see [`ProviderRtp::has_rtp`]).
pub fn average_rtp_by_provider<'a, I>(games: I) -> Vec<ProviderRtp>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut accumulators: Vec<(&str, RtpAccumulator)> = Vec::new();
    for game in games {
        let name = game.provider.name.as_str();
        let position = *index.entry(name).or_insert_with(|| {
            accumulators.push((name, RtpAccumulator::default()));
            accumulators.len() - 1
        });
        accumulators[position].1.push(game);
    }

    accumulators
        .into_iter()
        .map(|(name, acc)| ProviderRtp {
            name: name.to_string(),
            count: acc.count,
            rtp_count: acc.rtp_count,
            average_rtp: acc.average(),
        })
        .collect()
}

/// Mean RTP over every game that publishes one; `0.0` when none do.
pub fn overall_average_rtp<'a, I>(games: I) -> f64
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut acc = RtpAccumulator::default();
    for game in games {
        acc.push(game);
    }
    debug!(
        games = acc.count,
        with_rtp = acc.rtp_count,
        "computed overall RTP average"
    );
    acc.average()
}

/// Chart-ready summary of a game collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CatalogSummary {
    /// Games summarised.
    pub total_games: usize,
    /// See [`overall_average_rtp`].
    pub average_rtp: f64,
    /// See [`top_providers`].
    pub top_providers: Vec<NamedCount>,
    /// See [`count_by_category`].
    pub categories: Vec<NamedCount>,
    /// See [`volatility_histogram`].
    pub volatility: Vec<NamedCount>,
}

impl CatalogSummary {
    /// Summarise `games`.
    pub fn from_games(games: &[&GameRecord]) -> Self {
        Self {
            total_games: games.len(),
            average_rtp: overall_average_rtp(games.iter().copied()),
            top_providers: top_providers(games.iter().copied(), TOP_PROVIDER_COUNT),
            categories: count_by_category(games.iter().copied()),
            volatility: volatility_histogram(games.iter().copied()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, GameAttributes, Provider};

    fn game(provider: &str, category: &str, rtp: Option<f64>, volatility: Option<&str>) -> GameRecord {
        GameRecord {
            slug: format!("{provider}-{category}-{rtp:?}"),
            name: "Game".to_string(),
            provider: Provider {
                name: provider.to_string(),
                ..Provider::default()
            },
            category: Category {
                name: category.to_string(),
                slug: None,
            },
            is_wagering_bonus_allowed: false,
            is_new: false,
            attributes: GameAttributes {
                rtp,
                volatility: volatility.map(str::to_string),
                ..GameAttributes::default()
            },
            tags: Vec::new(),
        }
    }

    fn named(entries: &[NamedCount]) -> Vec<(&str, usize)> {
        entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.count))
            .collect()
    }

    #[test]
    fn ranks_top_providers() {
        let games = vec![
            game("A", "Slots", None, None),
            game("B", "Slots", None, None),
            game("B", "Live", None, None),
            game("C", "Slots", None, None),
            game("C", "Slots", None, None),
            game("C", "Slots", None, None),
        ];
        assert_eq!(named(&top_providers(&games, 2)), vec![("C", 3), ("B", 2)]);
        assert_eq!(
            named(&count_by_category(&games)),
            vec![("Slots", 5), ("Live", 1)]
        );
    }

    #[test]
    fn averages_only_published_rtp() {
        let games = vec![
            game("A", "Slots", Some(96.0), None),
            game("A", "Slots", None, None),
            game("A", "Slots", Some(94.0), None),
            game("B", "Slots", None, None),
        ];
        let providers = average_rtp_by_provider(&games);
        assert_eq!(providers.len(), 2);
        assert_eq!(providers[0].name, "A");
        assert_eq!(providers[0].count, 3);
        assert_eq!(providers[0].rtp_count, 2);
        assert!((providers[0].average_rtp - 95.0).abs() < 1e-9);
        assert_eq!(providers[1].average_rtp, 0.0);
        assert!(!providers[1].has_rtp());
        assert!(providers.iter().all(|p| !p.average_rtp.is_nan()));
        assert!((overall_average_rtp(&games) - 95.0).abs() < 1e-9);
    }

    #[test]
    fn histogram_skips_missing_volatility() {
        let games = vec![
            game("A", "Slots", None, Some("high")),
            game("A", "Slots", None, None),
            game("A", "Slots", None, Some("low")),
            game("A", "Slots", None, Some("high")),
        ];
        assert_eq!(
            named(&volatility_histogram(&games)),
            vec![("high", 2), ("low", 1)]
        );
    }

    #[test]
    fn empty_catalog_yields_empty_summaries() {
        let games: Vec<GameRecord> = Vec::new();
        assert!(count_by_provider(&games).is_empty());
        assert!(average_rtp_by_provider(&games).is_empty());
        assert_eq!(overall_average_rtp(&games), 0.0);
        let summary = CatalogSummary::from_games(&[]);
        assert_eq!(summary.total_games, 0);
        assert_eq!(summary.average_rtp, 0.0);
    }
}
