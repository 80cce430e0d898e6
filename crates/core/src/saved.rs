//! Persistence for saved bonus calculations.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::calculators::BonusCalculation;

/// Storage key of the saved calculation list.
pub const STORAGE_KEY: &str = "savedCalculations";

/// Store holding the `savedCalculations` list as a JSON array on disk.
#[derive(Debug, Clone)]
pub struct SavedCalculations {
    root: PathBuf,
}

impl SavedCalculations {
    /// Create a store rooted at the provided directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// File backing the store.
    pub fn path(&self) -> PathBuf {
        self.root.join(format!("{STORAGE_KEY}.json"))
    }

    /// Saved calculations in insertion order. A missing file is an empty list.
    pub fn entries(&self) -> Result<Vec<BonusCalculation>> {
        let path = self.path();
        if !path.exists() {
            return Ok(Vec::new());
        }
        read_entries(&path)
    }

    /// Saved calculations, treating an unreadable file as empty.
    pub fn entries_or_empty(&self) -> Vec<BonusCalculation> {
        match self.entries() {
            Ok(entries) => entries,
            Err(err) => {
                warn!("Failed to read saved calculations: {err:#}");
                Vec::new()
            }
        }
    }

    /// Append `calculation` and return the updated list.
    pub fn save(&self, calculation: BonusCalculation) -> Result<Vec<BonusCalculation>> {
        let mut entries = self.entries()?;
        entries.push(calculation);
        self.write_entries(&entries)?;
        info!(total = entries.len(), "Saved bonus calculation");
        Ok(entries)
    }

    /// Saved calculation at `index`, if any.
    pub fn load(&self, index: usize) -> Result<Option<BonusCalculation>> {
        Ok(self.entries()?.get(index).copied())
    }

    /// Remove every saved calculation.
    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
        }
        info!("Cleared saved calculations");
        Ok(())
    }

    fn write_entries(&self, entries: &[BonusCalculation]) -> Result<()> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("failed to create {}", self.root.display()))?;
        let path = self.path();
        let serialised = serde_json::to_vec_pretty(entries)?;
        fs::write(&path, serialised).with_context(|| format!("failed to write {}", path.display()))
    }
}

fn read_entries(path: &Path) -> Result<Vec<BonusCalculation>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let entries = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn calculation(bonus: f64) -> BonusCalculation {
        BonusCalculation {
            base_amount: 30.0,
            bonus_amount: bonus,
            multiplier: 67.0,
            rtp: 99.0,
        }
    }

    #[test]
    fn save_load_clear_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let store = SavedCalculations::new(dir.path().join("nested"));
        assert!(store.entries()?.is_empty());

        store.save(calculation(54.0))?;
        let entries = store.save(calculation(100.0))?;
        assert_eq!(entries.len(), 2);
        assert!(store.path().ends_with("savedCalculations.json"));

        let reloaded = SavedCalculations::new(dir.path().join("nested"));
        assert_eq!(reloaded.entries()?, vec![calculation(54.0), calculation(100.0)]);
        assert_eq!(reloaded.load(1)?, Some(calculation(100.0)));
        assert_eq!(reloaded.load(5)?, None);

        reloaded.clear()?;
        assert!(!reloaded.path().exists());
        assert!(reloaded.entries()?.is_empty());
        reloaded.clear()?;
        Ok(())
    }

    #[test]
    fn reads_array_written_by_other_clients() -> Result<()> {
        let dir = tempdir()?;
        let store = SavedCalculations::new(dir.path());
        fs::write(
            store.path(),
            r#"[{"baseAmount":30,"bonusAmount":54,"multiplier":67,"rtp":99}]"#,
        )?;
        assert_eq!(store.entries()?, vec![calculation(54.0)]);
        Ok(())
    }

    #[test]
    fn corrupt_file_surfaces_error() -> Result<()> {
        let dir = tempdir()?;
        let store = SavedCalculations::new(dir.path());
        fs::write(store.path(), "not json")?;
        assert!(store.entries().is_err());
        assert!(store.entries_or_empty().is_empty());
        Ok(())
    }
}
