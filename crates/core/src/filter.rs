//! Tag and feature filtering for the game catalog.
//!
//! Tags combine with OR semantics (a game needs any selected tag), features
//! with AND semantics (a game needs every selected feature). An empty
//! selection matches everything.

use std::{
    collections::{BTreeSet, HashSet},
    fmt,
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    models::GameRecord,
    sort::{compare, sort_games, SortOption},
};

/// Boolean game features that can be required by the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Feature {
    /// `attributes.hasJackpot`
    #[serde(rename = "hasJackpot")]
    HasJackpot,
    /// `attributes.isHd`
    #[serde(rename = "isHd")]
    IsHd,
    /// `attributes.hasFreespins`
    #[serde(rename = "hasFreespins")]
    HasFreespins,
    /// Top-level `isWageringBonusAllowed`.
    #[serde(rename = "isWageringBonusAllowed")]
    IsWageringBonusAllowed,
}

/// Raised when a feature key is not one of the known features.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown feature '{0}'")]
pub struct FeatureParseError(pub String);

impl Feature {
    /// Every feature in picker order.
    pub const ALL: [Feature; 4] = [
        Feature::HasJackpot,
        Feature::IsHd,
        Feature::HasFreespins,
        Feature::IsWageringBonusAllowed,
    ];

    /// Dataset key of the feature.
    pub fn key(self) -> &'static str {
        match self {
            Feature::HasJackpot => "hasJackpot",
            Feature::IsHd => "isHd",
            Feature::HasFreespins => "hasFreespins",
            Feature::IsWageringBonusAllowed => "isWageringBonusAllowed",
        }
    }

    /// Short label for menus.
    pub fn label(self) -> &'static str {
        match self {
            Feature::HasJackpot => "Jackpot",
            Feature::IsHd => "HD",
            Feature::HasFreespins => "Free spins",
            Feature::IsWageringBonusAllowed => "Wagering bonus",
        }
    }

    /// Whether `game` offers this feature. Missing attributes never match.
    pub fn holds_for(self, game: &GameRecord) -> bool {
        let attributes = &game.attributes;
        match self {
            Feature::HasJackpot => attributes.has_jackpot == Some(true),
            Feature::IsHd => attributes.is_hd == Some(true),
            Feature::HasFreespins => attributes.has_freespins == Some(true),
            Feature::IsWageringBonusAllowed => game.is_wagering_bonus_allowed,
        }
    }
}

impl FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|feature| feature.key() == value.trim())
            .ok_or_else(|| FeatureParseError(value.to_string()))
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Current filter selection. Owned by the UI; the core only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    /// Tag names, any of which admits a game.
    #[serde(default)]
    pub selected_tags: BTreeSet<String>,
    /// Features a game must all offer.
    #[serde(default)]
    pub selected_features: BTreeSet<Feature>,
    /// Ordering applied after filtering.
    #[serde(default)]
    pub sort_option: SortOption,
}

impl FilterState {
    /// Select `tag` if unselected, otherwise deselect it. Returns the new selection state.
    pub fn toggle_tag(&mut self, tag: &str) -> bool {
        if self.selected_tags.remove(tag) {
            false
        } else {
            self.selected_tags.insert(tag.to_string());
            true
        }
    }

    /// Select `feature` if unselected, otherwise deselect it. Returns the new selection state.
    pub fn toggle_feature(&mut self, feature: Feature) -> bool {
        if self.selected_features.remove(&feature) {
            false
        } else {
            self.selected_features.insert(feature);
            true
        }
    }

    /// Replace the sort option.
    pub fn set_sort(&mut self, option: SortOption) {
        self.sort_option = option;
    }

    /// Drop every tag and feature selection, keeping the sort option.
    pub fn clear_selection(&mut self) {
        self.selected_tags.clear();
        self.selected_features.clear();
    }

    /// True when neither tags nor features restrict the catalog.
    pub fn is_unrestricted(&self) -> bool {
        self.selected_tags.is_empty() && self.selected_features.is_empty()
    }

    /// One-line description for status bars.
    pub fn summary(&self) -> String {
        let tags = if self.selected_tags.is_empty() {
            "any".to_string()
        } else {
            self.selected_tags
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(" | ")
        };
        let features = if self.selected_features.is_empty() {
            "any".to_string()
        } else {
            self.selected_features
                .iter()
                .map(|feature| feature.label())
                .collect::<Vec<_>>()
                .join(" + ")
        };
        format!(
            "tags: {tags}  features: {features}  sort: {}",
            self.sort_option
        )
    }
}

/// True when `game` has at least one selected tag, or no tag is selected.
pub fn tag_match(game: &GameRecord, state: &FilterState) -> bool {
    state.selected_tags.is_empty()
        || game
            .tags
            .iter()
            .any(|tag| state.selected_tags.contains(&tag.name))
}

/// True when `game` offers every selected feature.
pub fn feature_match(game: &GameRecord, state: &FilterState) -> bool {
    state
        .selected_features
        .iter()
        .all(|feature| feature.holds_for(game))
}

/// Predicate combining the tag and feature rules.
pub fn matches(game: &GameRecord, state: &FilterState) -> bool {
    tag_match(game, state) && feature_match(game, state)
}

/// Filter `games` by `state` and order the survivors by its sort option.
pub fn apply_filters<'a, I>(games: I, state: &FilterState) -> Vec<&'a GameRecord>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut result: Vec<&GameRecord> = games
        .into_iter()
        .filter(|game| matches(game, state))
        .collect();
    sort_games(&mut result, state.sort_option);
    result
}

/// Like [`apply_filters`], but returns positions in `games` so callers can
/// keep a view over a shared catalog without cloning records.
pub fn filtered_indices(games: &[GameRecord], state: &FilterState) -> Vec<usize> {
    let mut indices: Vec<usize> = games
        .iter()
        .enumerate()
        .filter(|(_, game)| matches(game, state))
        .map(|(index, _)| index)
        .collect();
    if state.sort_option != SortOption::Default {
        indices.sort_by(|a, b| compare(&games[*a], &games[*b], state.sort_option));
    }
    indices
}

/// Unique tag names across `games`, in first-seen order.
pub fn all_tags<'a, I>(games: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    let mut seen = HashSet::new();
    let mut tags = Vec::new();
    for game in games {
        for tag in &game.tags {
            if seen.insert(tag.name.as_str()) {
                tags.push(tag.name.clone());
            }
        }
    }
    tags
}
