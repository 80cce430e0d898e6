#![warn(clippy::all, missing_docs)]

//! Core domain logic for slotscope.
//!
//! This crate hosts the casino dataset models, filtering and sorting of the
//! game catalog, catalog and pot statistics, the wagering calculators, and
//! the configuration, loading, and persistence layers used by the terminal
//! dashboard.

pub mod calculators;
pub mod config;
pub mod filter;
pub mod manifest;
pub mod models;
pub mod resource;
pub mod saved;
pub mod sort;
pub mod stats;

pub use calculators::{BonusCalculation, BonusOutcome, CalculatorError, RtpWagerInverter};
pub use config::AppConfig;
pub use filter::{apply_filters, filtered_indices, Feature, FilterState};
pub use manifest::SnapshotManifest;
pub use models::{GameRecord, PotRecord};
pub use resource::{Catalog, DatasetLoader, DatasetSource, GameCollector};
pub use saved::SavedCalculations;
pub use sort::{sort_games, SortOption};
