//! Shared domain models.

mod pot;

pub use pot::{MoneyReward, PotRecord, PotRewards, PotUser, PotWinner, USD_SYMBOL};

use serde::{Deserialize, Serialize};

/// Game provider (studio) as published in the dataset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Provider {
    /// Display name, also used as the grouping key.
    pub name: String,
    /// Logo URI.
    #[serde(default)]
    pub thumbnail: Option<String>,
    /// URL-safe identifier, when published.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Lobby category (e.g. `Slots`, `Live Casino`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Display name, also used as the grouping key.
    pub name: String,
    /// URL-safe identifier, when published.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Free-form tag attached to a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    /// Display name, matched by the tag filter.
    pub name: String,
    /// URL-safe identifier, when published.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Optional game attributes. Every field may be missing or `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameAttributes {
    /// Progressive or fixed jackpot.
    #[serde(default)]
    pub has_jackpot: Option<bool>,
    /// HD graphics.
    #[serde(default)]
    pub is_hd: Option<bool>,
    /// Free-spin bonus round.
    #[serde(default)]
    pub has_freespins: Option<bool>,
    /// Return to player, as a percentage in `[0, 100]`.
    #[serde(default)]
    pub rtp: Option<f64>,
    /// Qualitative variance label (`low`, `medium`, `high`).
    #[serde(default)]
    pub volatility: Option<String>,
    /// Maximum win multiplier.
    #[serde(default)]
    pub multiplier: Option<f64>,
    /// Number of paylines.
    #[serde(default)]
    pub lines: Option<u32>,
}

/// One game from the catalog dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    /// Unique identifier.
    pub slug: String,
    /// Human-readable game title.
    pub name: String,
    /// Studio that publishes the game.
    pub provider: Provider,
    /// Lobby category.
    pub category: Category,
    /// Whether bets on this game count towards bonus wagering.
    #[serde(default)]
    pub is_wagering_bonus_allowed: bool,
    /// Flagged as a new release by the casino.
    #[serde(default)]
    pub is_new: bool,
    /// Optional attributes.
    #[serde(default)]
    pub attributes: GameAttributes,
    /// Tags in dataset order.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// RTP above which a game is described as above average.
pub const AVERAGE_RTP_THRESHOLD: f64 = 96.0;

impl GameRecord {
    /// RTP percentage, if the dataset publishes one.
    pub fn rtp(&self) -> Option<f64> {
        self.attributes.rtp.filter(|value| value.is_finite())
    }

    /// Returns true when any of the game's tags carries `name`.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Short verdict on the game's RTP relative to typical online slots.
    pub fn rtp_rating(&self) -> &'static str {
        match self.rtp() {
            Some(rtp) if rtp > AVERAGE_RTP_THRESHOLD => "above average",
            Some(_) => "average",
            None => "unknown",
        }
    }

    /// Describes what the volatility label means for win frequency.
    pub fn volatility_description(&self) -> String {
        match self.attributes.volatility.as_deref() {
            Some("high") => {
                "high volatility: less frequent but potentially larger wins".to_string()
            }
            Some(label) => {
                format!("{label} volatility: more frequent but typically smaller wins")
            }
            None => "volatility not specified: expect varying win frequencies and sizes"
                .to_string(),
        }
    }

    /// Human-readable list of the features this game offers.
    pub fn feature_labels(&self) -> Vec<String> {
        let attributes = &self.attributes;
        let mut labels = Vec::new();
        if attributes.is_hd == Some(true) {
            labels.push("HD graphics".to_string());
        }
        if attributes.has_jackpot == Some(true) {
            labels.push("Jackpot available".to_string());
        }
        if attributes.has_freespins == Some(true) {
            labels.push("Free spins feature".to_string());
        }
        if let Some(volatility) = &attributes.volatility {
            labels.push(format!("Volatility: {volatility}"));
        }
        if let Some(lines) = attributes.lines {
            labels.push(format!("Paylines: {lines}"));
        }
        if self.is_new {
            labels.push("New release".to_string());
        }
        if self.is_wagering_bonus_allowed {
            labels.push("Eligible for wagering bonus".to_string());
        }
        labels
    }
}

impl AsRef<GameRecord> for GameRecord {
    fn as_ref(&self) -> &GameRecord {
        self
    }
}

/// Parses a decimal amount as published in the datasets (`"1234.50"`).
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
