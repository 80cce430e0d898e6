use std::{fmt, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::{
    config::AppConfig,
    filter,
    models::{GameRecord, PotRecord},
};

/// Where a dataset is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Remote JSON document.
    Url(String),
    /// Local JSON file.
    File(PathBuf),
}

impl DatasetSource {
    /// Prefer `file` when configured, otherwise `url`.
    pub fn pick(file: Option<&PathBuf>, url: &str) -> Self {
        match file {
            Some(path) => DatasetSource::File(path.clone()),
            None => DatasetSource::Url(url.to_string()),
        }
    }
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Url(url) => f.write_str(url),
            DatasetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches the games and pot datasets.
#[derive(Debug, Clone)]
pub struct DatasetLoader {
    client: reqwest::Client,
    games: DatasetSource,
    pots: DatasetSource,
}

impl DatasetLoader {
    /// Build a loader with explicit sources.
    pub fn new(games: DatasetSource, pots: DatasetSource, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self {
            client,
            games,
            pots,
        })
    }

    /// Build a loader from configuration.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(
            DatasetSource::pick(config.games_file.as_ref(), &config.games_url),
            DatasetSource::pick(config.pots_file.as_ref(), &config.pots_url),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Fetch the game catalog.
    pub async fn games(&self) -> Result<Vec<GameRecord>> {
        let games: Vec<GameRecord> = self.fetch(&self.games).await?;
        info!(count = games.len(), source = %self.games, "Loaded games dataset");
        Ok(games)
    }

    /// Fetch the pot history.
    pub async fn pots(&self) -> Result<Vec<PotRecord>> {
        let pots: Vec<PotRecord> = self.fetch(&self.pots).await?;
        info!(count = pots.len(), source = %self.pots, "Loaded pot dataset");
        Ok(pots)
    }

    async fn fetch<T: DeserializeOwned>(&self, source: &DatasetSource) -> Result<T> {
        match source {
            DatasetSource::File(path) => {
                let bytes = tokio::fs::read(path)
                    .await
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_slice(&bytes)
                    .with_context(|| format!("failed to parse {}", path.display()))
            }
            DatasetSource::Url(url) => fetch_json(&self.client, url).await,
        }
    }
}

/// GET `url` and decode the JSON body. Non-success statuses are errors.
pub async fn fetch_json<T: DeserializeOwned>(client: &reqwest::Client, url: &str) -> Result<T> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("request to {url} failed"))?
        .error_for_status()
        .with_context(|| format!("{url} returned an error status"))?;
    response
        .json()
        .await
        .with_context(|| format!("failed to decode response from {url}"))
}

/// Immutable, cheaply cloneable view of the loaded datasets.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    games: Arc<Vec<GameRecord>>,
    pots: Arc<Vec<PotRecord>>,
}

impl Catalog {
    /// Wrap loaded records.
    pub fn new(games: Vec<GameRecord>, pots: Vec<PotRecord>) -> Self {
        Self {
            games: Arc::new(games),
            pots: Arc::new(pots),
        }
    }

    /// Replace the games, keeping pots.
    pub fn with_games(&self, games: Vec<GameRecord>) -> Self {
        Self {
            games: Arc::new(games),
            pots: Arc::clone(&self.pots),
        }
    }

    /// Replace the pots, keeping games.
    pub fn with_pots(&self, pots: Vec<PotRecord>) -> Self {
        Self {
            games: Arc::clone(&self.games),
            pots: Arc::new(pots),
        }
    }

    /// Games in dataset order.
    pub fn games(&self) -> &[GameRecord] {
        &self.games
    }

    /// Pots in dataset order.
    pub fn pots(&self) -> &[PotRecord] {
        &self.pots
    }

    /// Game with the given slug.
    pub fn find_game(&self, slug: &str) -> Option<&GameRecord> {
        self.games.iter().find(|game| game.slug == slug)
    }

    /// Games published by `provider`, in dataset order.
    pub fn provider_games(&self, provider: &str) -> Vec<&GameRecord> {
        self.games
            .iter()
            .filter(|game| game.provider.name == provider)
            .collect()
    }

    /// Unique tag names in first-seen order.
    pub fn all_tags(&self) -> Vec<String> {
        filter::all_tags(self.games.iter())
    }
}
