use std::{future::Future, path::Path, time::Duration};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::{
    config::CollectorConfig,
    manifest::{self, SnapshotManifest},
};

use super::loader::fetch_json;

/// Progress reported while crawling.
#[derive(Debug)]
pub enum CollectEvent {
    /// A page returned records.
    Page {
        /// 1-based page number.
        page: u32,
        /// Records on this page.
        records: usize,
        /// Records collected so far.
        total: usize,
    },
    /// A page request failed; the crawl stops here.
    Error(anyhow::Error),
    /// Output and manifest were written.
    Finished(SnapshotManifest),
}

/// Envelope returned by the paginated endpoint.
#[derive(Debug, Deserialize)]
pub struct GamePage {
    /// Records on the page. Absent means no more data.
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Records gathered by a crawl.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collected {
    /// Raw game records in page order.
    pub records: Vec<Value>,
    /// Pages that returned records.
    pub pages: u32,
    /// Whether the crawl ended on an error rather than an empty page.
    pub interrupted: bool,
}

/// Crawls the paginated games endpoint into a local snapshot.
pub struct GameCollector {
    config: CollectorConfig,
    client: reqwest::Client,
}

impl GameCollector {
    /// Create a collector from configuration.
    pub fn new(config: CollectorConfig, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build HTTP client")?;
        Ok(Self { config, client })
    }

    /// URL of a single page.
    pub fn page_url(&self, page: u32) -> String {
        format!(
            "{}?page={page}&limit={}",
            self.config.base_url, self.config.page_size
        )
    }

    /// Crawl over HTTP, write the snapshot, and report progress to `sender`.
    pub async fn run(self, sender: mpsc::Sender<CollectEvent>) -> Result<SnapshotManifest> {
        let client = self.client.clone();
        let collected = self
            .collect_with(
                |url| {
                    let client = client.clone();
                    async move { fetch_json::<GamePage>(&client, &url).await }
                },
                &sender,
            )
            .await;

        let manifest = self.write(&collected, &self.config.output)?;
        let _ = sender.send(CollectEvent::Finished(manifest.clone())).await;
        Ok(manifest)
    }

    /// Crawl pages with `fetch_page` until one is empty or fails.
    pub async fn collect_with<F, Fut>(
        &self,
        mut fetch_page: F,
        sender: &mpsc::Sender<CollectEvent>,
    ) -> Collected
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<GamePage>>,
    {
        let mut collected = Collected::default();
        let mut page = 1;
        loop {
            let url = self.page_url(page);
            let batch = match fetch_page(url).await {
                Ok(batch) => batch,
                Err(err) => {
                    warn!("Stopping collection at page {page}: {err:#}");
                    collected.interrupted = true;
                    let _ = sender.send(CollectEvent::Error(err)).await;
                    break;
                }
            };
            if batch.data.is_empty() {
                info!("No more data after page {}", page - 1);
                break;
            }

            let records = batch.data.len();
            collected.records.extend(batch.data);
            collected.pages = page;
            info!(page, total = collected.records.len(), "Fetched games page");
            let _ = sender
                .send(CollectEvent::Page {
                    page,
                    records,
                    total: collected.records.len(),
                })
                .await;

            page += 1;
            if self.config.delay_ms > 0 {
                tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
            }
        }
        collected
    }

    /// Write the records as a pretty JSON array plus its manifest.
    pub fn write(&self, collected: &Collected, output: &Path) -> Result<SnapshotManifest> {
        if let Some(parent) = output.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let serialized = serde_json::to_string_pretty(&collected.records)
            .context("failed to serialize collected games")?;
        std::fs::write(output, serialized)
            .with_context(|| format!("failed to write {}", output.display()))?;

        let manifest = SnapshotManifest {
            source: self.config.base_url.clone(),
            pages: collected.pages,
            records: collected.records.len(),
            collected_at: Utc::now(),
        };
        manifest.persist(manifest::manifest_path(output))?;
        info!(
            records = manifest.records,
            "Wrote {}",
            output.display()
        );
        Ok(manifest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn collector(output: &Path) -> Result<GameCollector> {
        GameCollector::new(
            CollectorConfig {
                base_url: "https://casino.test/games".to_string(),
                page_size: 2,
                delay_ms: 0,
                output: output.to_path_buf(),
            },
            Duration::from_secs(1),
        )
    }

    fn page(slugs: &[&str]) -> GamePage {
        GamePage {
            data: slugs.iter().map(|slug| json!({ "slug": slug })).collect(),
        }
    }

    #[tokio::test]
    async fn stops_on_empty_page() -> Result<()> {
        let dir = tempdir()?;
        let collector = collector(&dir.path().join("gamesData.json"))?;
        let (tx, mut rx) = mpsc::channel(16);
        let mut requested = Vec::new();

        let collected = collector
            .collect_with(
                |url| {
                    requested.push(url);
                    let batch = match requested.len() {
                        1 => page(&["a", "b"]),
                        2 => page(&["c"]),
                        _ => page(&[]),
                    };
                    async move { Ok(batch) }
                },
                &tx,
            )
            .await;

        assert_eq!(collected.pages, 2);
        assert_eq!(collected.records.len(), 3);
        assert!(!collected.interrupted);
        assert_eq!(requested[0], "https://casino.test/games?page=1&limit=2");
        assert_eq!(requested.len(), 3);

        drop(tx);
        let mut totals = Vec::new();
        while let Some(event) = rx.recv().await {
            if let CollectEvent::Page { total, .. } = event {
                totals.push(total);
            }
        }
        assert_eq!(totals, vec![2, 3]);
        Ok(())
    }

    #[tokio::test]
    async fn first_error_ends_crawl_without_retry() -> Result<()> {
        let dir = tempdir()?;
        let output = dir.path().join("out").join("gamesData.json");
        let collector = collector(&output)?;
        let (tx, mut rx) = mpsc::channel(16);
        let mut calls = 0;

        let collected = collector
            .collect_with(
                |_| {
                    calls += 1;
                    let result = if calls == 1 {
                        Ok(page(&["a"]))
                    } else {
                        Err(anyhow::anyhow!("HTTP 500"))
                    };
                    async move { result }
                },
                &tx,
            )
            .await;
        assert_eq!(calls, 2);
        assert!(collected.interrupted);
        assert_eq!(collected.records.len(), 1);

        let manifest = collector.write(&collected, &output)?;
        assert_eq!(manifest.records, 1);
        assert_eq!(manifest.source, "https://casino.test/games");
        let written: Vec<Value> = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(written, vec![json!({ "slug": "a" })]);
        assert_eq!(
            SnapshotManifest::load(manifest::manifest_path(&output))?,
            Some(manifest)
        );

        drop(tx);
        let mut saw_error = false;
        while let Some(event) = rx.recv().await {
            saw_error |= matches!(event, CollectEvent::Error(_));
        }
        assert!(saw_error);
        Ok(())
    }

    #[test]
    fn envelope_without_data_is_empty() -> Result<()> {
        let page: GamePage = serde_json::from_str(r#"{ "meta": { "page": 9 } }"#)?;
        assert!(page.data.is_empty());
        Ok(())
    }
}
