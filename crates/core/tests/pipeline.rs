use std::{path::PathBuf, time::Duration};

use anyhow::Result;
use slotscope_core::{
    apply_filters,
    calculators::{BonusCalculation, BonusOutcome, CalculatorError, RtpWagerInverter},
    filter::matches,
    stats::{self, WinCriterion},
    Catalog, DatasetLoader, DatasetSource, Feature, FilterState, SortOption,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

async fn load_catalog() -> Result<Catalog> {
    let loader = DatasetLoader::new(
        DatasetSource::File(fixture("games.json")),
        DatasetSource::File(fixture("pots.json")),
        Duration::from_secs(5),
    )?;
    Ok(Catalog::new(loader.games().await?, loader.pots().await?))
}

fn slugs(games: &[&slotscope_core::GameRecord]) -> Vec<String> {
    games.iter().map(|game| game.slug.clone()).collect()
}

#[tokio::test]
async fn empty_filter_is_identity() -> Result<()> {
    let catalog = load_catalog().await?;
    let result = apply_filters(catalog.games(), &FilterState::default());
    let expected: Vec<String> = catalog.games().iter().map(|g| g.slug.clone()).collect();
    assert_eq!(slugs(&result), expected);
    Ok(())
}

#[tokio::test]
async fn wagering_feature_mirrors_flag() -> Result<()> {
    let catalog = load_catalog().await?;
    let mut state = FilterState::default();
    state.toggle_feature(Feature::IsWageringBonusAllowed);
    for game in catalog.games() {
        assert_eq!(matches(game, &state), game.is_wagering_bonus_allowed);
    }
    Ok(())
}

#[tokio::test]
async fn tags_or_features_and() -> Result<()> {
    let catalog = load_catalog().await?;
    let mut state = FilterState::default();
    state.toggle_tag("Egypt");
    state.toggle_tag("Candy");
    assert_eq!(
        slugs(&apply_filters(catalog.games(), &state)),
        vec!["sweet-bonanza", "book-of-dead"]
    );

    let mut state = FilterState::default();
    state.toggle_feature(Feature::HasFreespins);
    state.toggle_feature(Feature::IsHd);
    assert_eq!(
        slugs(&apply_filters(catalog.games(), &state)),
        vec!["sweet-bonanza", "book-of-dead"]
    );
    Ok(())
}

#[tokio::test]
async fn rtp_sort_is_stable_with_unknown_last() -> Result<()> {
    let catalog = load_catalog().await?;
    let mut state = FilterState::default();
    state.set_sort(SortOption::Rtp);
    let sorted = apply_filters(catalog.games(), &state);
    assert_eq!(
        slugs(&sorted),
        vec![
            "book-of-dead",
            "gates-of-olympus",
            "sweet-bonanza",
            "mystery-reels",
            "lightning-roulette"
        ]
    );
    Ok(())
}

#[tokio::test]
async fn provider_aggregations_avoid_nan() -> Result<()> {
    let catalog = load_catalog().await?;
    let providers = stats::average_rtp_by_provider(catalog.games());
    let summary: Vec<(&str, usize, f64)> = providers
        .iter()
        .map(|p| (p.name.as_str(), p.count, p.average_rtp))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Pragmatic Play", 2, 93.0),
            ("Play'n GO", 2, 96.0),
            ("Evolution", 1, 0.0)
        ]
    );
    assert!((stats::overall_average_rtp(catalog.games()) - 94.0).abs() < 1e-9);

    let top: Vec<(String, usize)> = stats::top_providers(catalog.games(), 2)
        .into_iter()
        .map(|entry| (entry.name, entry.count))
        .collect();
    assert_eq!(
        top,
        vec![
            ("Pragmatic Play".to_string(), 2),
            ("Play'n GO".to_string(), 2)
        ]
    );
    let volatility: Vec<(String, usize)> = stats::volatility_histogram(catalog.games())
        .into_iter()
        .map(|entry| (entry.name, entry.count))
        .collect();
    assert_eq!(
        volatility,
        vec![("medium".to_string(), 1), ("high".to_string(), 2)]
    );
    Ok(())
}

#[tokio::test]
async fn filtered_subset_feeds_aggregations() -> Result<()> {
    let catalog = load_catalog().await?;
    let mut state = FilterState::default();
    state.toggle_tag("Popular");
    let filtered = apply_filters(catalog.games(), &state);
    let summary = stats::CatalogSummary::from_games(&filtered);
    assert_eq!(summary.total_games, 3);
    assert!((summary.average_rtp - 94.0).abs() < 1e-9);
    assert_eq!(catalog.provider_games("Play'n GO").len(), 2);
    assert_eq!(
        catalog.all_tags(),
        vec!["Popular", "Candy", "Classic", "Egypt"]
    );
    Ok(())
}

#[tokio::test]
async fn pot_summaries() -> Result<()> {
    let catalog = load_catalog().await?;
    let pots = catalog.pots();

    let winners = stats::top_winners(pots, stats::TOP_WINNER_COUNT);
    let ranked: Vec<(&str, f64, usize)> = winners
        .iter()
        .map(|w| (w.username.as_str(), w.total_won, w.bet_count))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("alice", 140.0, 2),
            ("bob", 100.0, 1),
            ("carol", 40.0, 1),
            ("dave", 0.0, 1)
        ]
    );
    assert_eq!(winners[0].total_contribution, 6500.0);

    let report = stats::bet_range_win_probabilities(pots, WinCriterion::PotAmountPositive);
    assert_eq!(report.total_bets, 4);
    assert_eq!(report.skipped, 1);
    let bets: usize = report.buckets.iter().map(|bucket| bucket.bets).sum();
    assert_eq!(bets, report.total_bets);
    assert_eq!(report.buckets[0].bets, 2);
    assert!((report.buckets[0].probability - 50.0).abs() < 1e-9);
    assert_eq!(report.buckets[4].wins, 0);

    let hours: Vec<u32> = stats::bets_by_hour(pots).into_keys().collect();
    assert_eq!(hours, vec![0, 22, 23]);
    Ok(())
}

#[test]
fn outlier_trim_is_one_sided() {
    let values: Vec<f64> = (1..=100).map(f64::from).collect();
    let kept = stats::remove_outliers(&values);
    assert!(kept.len() >= 95);
    assert!(kept.iter().zip(&values).all(|(kept, original)| kept == original));
    assert!(kept.iter().all(|value| *value <= 96.0));
}

#[test]
fn calculators_match_reference_values() -> Result<()> {
    let outcome = BonusOutcome::from_form("30", "54", "67", "99")
        .ok_or_else(|| anyhow::anyhow!("expected a result"))?;
    assert!((outcome.wager_required - 3618.0).abs() < 1e-9);
    assert!((outcome.expected_loss - 36.18).abs() < 1e-9);
    assert!((outcome.net_result - 17.82).abs() < 1e-9);
    let factor = outcome
        .factor_loss
        .ok_or_else(|| anyhow::anyhow!("expected a factor"))?;
    assert!((factor - 0.594).abs() < 1e-9);
    assert!(BonusOutcome::from_form("30", "abc", "67", "99").is_none());
    assert!(BonusCalculation::parse("0", "54", "67", "99")
        .and_then(|calc| calc.evaluate())
        .is_some_and(|outcome| outcome.factor_loss.is_none()));

    let inverter = RtpWagerInverter::new(96.0)?;
    let wager = inverter
        .wager_for_bet(10.0)
        .ok_or_else(|| anyhow::anyhow!("expected a wager"))?;
    assert_eq!(format!("{wager:.2}"), "250.00");
    let bet = inverter
        .bet_for_wager(250.0)
        .ok_or_else(|| anyhow::anyhow!("expected a bet"))?;
    assert_eq!(format!("{bet:.2}"), "10.00");
    assert_eq!(
        RtpWagerInverter::new(100.0).err(),
        Some(CalculatorError::RtpSingular)
    );
    Ok(())
}
