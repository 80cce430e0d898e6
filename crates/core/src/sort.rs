//! Named orderings for the game list.

use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::models::GameRecord;

/// Sort key selectable from the game browser.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortOption {
    /// Highest RTP first; unknown RTP last.
    Rtp,
    /// Game name, A to Z.
    Name,
    /// Provider name, A to Z.
    Provider,
    /// Keep catalog order. Unknown keys deserialize to this variant.
    #[default]
    #[serde(other)]
    Default,
}

impl SortOption {
    /// Every option in menu order.
    pub const ALL: [SortOption; 4] = [
        SortOption::Default,
        SortOption::Rtp,
        SortOption::Name,
        SortOption::Provider,
    ];

    /// Resolve a sort key. Unrecognised keys fall back to [`SortOption::Default`].
    pub fn from_key(key: &str) -> Self {
        match key.trim() {
            "rtp" => SortOption::Rtp,
            "name" => SortOption::Name,
            "provider" => SortOption::Provider,
            _ => SortOption::Default,
        }
    }

    /// Registry key of the option.
    pub fn key(self) -> &'static str {
        match self {
            SortOption::Default => "default",
            SortOption::Rtp => "rtp",
            SortOption::Name => "name",
            SortOption::Provider => "provider",
        }
    }

    /// The option after this one, wrapping around.
    pub fn next(self) -> Self {
        let index = Self::ALL.iter().position(|option| *option == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Compare two games under `option`.
pub fn compare(a: &GameRecord, b: &GameRecord, option: SortOption) -> Ordering {
    match option {
        SortOption::Rtp => {
            let left = a.rtp().unwrap_or(0.0);
            let right = b.rtp().unwrap_or(0.0);
            right.total_cmp(&left)
        }
        SortOption::Name => locale_cmp(&a.name, &b.name),
        SortOption::Provider => locale_cmp(&a.provider.name, &b.provider.name),
        SortOption::Default => Ordering::Equal,
    }
}

/// Stable in-place sort of `games` by `option`.
pub fn sort_games<G>(games: &mut [G], option: SortOption)
where
    G: AsRef<GameRecord>,
{
    if option == SortOption::Default {
        return;
    }
    games.sort_by(|a, b| compare(a.as_ref(), b.as_ref(), option));
}

/// Collation close to `localeCompare`: letters compare without accents or
/// case first, then accents, then case with lowercase first, so
/// `"apple" < "Banana" < "Éclair" < "zeus"` and `"e" < "E" < "é"`.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    base_letters(a)
        .cmp(base_letters(b))
        .then_with(|| folded(a).cmp(folded(b)))
        .then_with(|| b.cmp(a))
}

fn base_letters(value: &str) -> impl Iterator<Item = char> + '_ {
    value
        .nfd()
        .filter(|ch| !is_combining_mark(*ch))
        .flat_map(char::to_lowercase)
}

fn folded(value: &str) -> impl Iterator<Item = char> + '_ {
    value.nfd().flat_map(char::to_lowercase)
}
