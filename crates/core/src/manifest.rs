//! Snapshot manifest written next to a collected dataset.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance of a collected games snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Endpoint the records were crawled from.
    pub source: String,
    /// Pages that returned records.
    pub pages: u32,
    /// Records written.
    pub records: usize,
    /// When the crawl finished.
    pub collected_at: DateTime<Utc>,
}

impl SnapshotManifest {
    /// Load a manifest, returning `None` if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        let manifest = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse manifest {}", path.display()))?;
        Ok(Some(manifest))
    }

    /// Persist the manifest, creating parent directories if needed.
    pub fn persist(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed to create manifest directory {}", parent.display())
            })?;
        }

        let serialized =
            serde_json::to_string_pretty(self).context("failed to serialize snapshot manifest")?;
        fs::write(path, serialized)
            .with_context(|| format!("failed to write manifest {}", path.display()))
    }
}

/// Manifest path for a dataset file: `gamesData.json` → `gamesData.manifest.json`.
pub fn manifest_path(dataset: impl AsRef<Path>) -> PathBuf {
    let dataset = dataset.as_ref();
    let stem = dataset
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "dataset".to_string());
    dataset.with_file_name(format!("{stem}.manifest.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn persists_and_reloads() -> Result<()> {
        let dir = tempdir()?;
        let path = manifest_path(dir.path().join("out").join("gamesData.json"));
        assert!(path.ends_with("out/gamesData.manifest.json"));
        assert!(SnapshotManifest::load(&path)?.is_none());

        let manifest = SnapshotManifest {
            source: "https://example.com/games".to_string(),
            pages: 3,
            records: 75,
            collected_at: Utc::now(),
        };
        manifest.persist(&path)?;
        assert_eq!(SnapshotManifest::load(&path)?, Some(manifest));
        Ok(())
    }
}
