//! Ranking results.
//!
//! [`Ranking`] is one row of a league's top-rank table, [`PokemonEntry`]
//! one row of a point query. Both are plain, serializable values.
//! [`LeagueResults`] groups rows by league in configuration order.

use crate::stats::Ivs;
use serde::{Deserialize, Serialize};

/// Round `value` to five decimal places.
pub(crate) fn round5(value: f64) -> f64 {
    (value * 100_000.0).round() / 100_000.0
}

/// One IV combination of a league's top-rank table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub rank: u16,
    pub attack: u8,
    pub defense: u8,
    pub stamina: u8,
    /// Level cap this ranking was computed for.
    pub cap: f64,
    /// Stat product, floored.
    pub value: f64,
    pub level: f64,
    pub cp: u32,
    /// Value relative to the rank 1 value, rounded to five decimals.
    pub percentage: f64,
    /// The ranking holds for every higher level cap as well.
    #[serde(default)]
    pub capped: bool,
}

impl Ranking {
    /// IVs of this row.
    pub fn ivs(&self) -> Ivs {
        Ivs::new(self.attack, self.defense, self.stamina)
    }
}

/// Rank of one observed creature (or one of its evolutions) in one
/// league under one level cap.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonEntry {
    pub pokemon: u16,
    #[serde(default)]
    pub form: u16,
    /// Temporary evolution id, `0` for none.
    #[serde(default)]
    pub evolution: u16,
    /// Level cap, `0` for a level-exact entry.
    pub cap: f64,
    /// Stat product, floored.
    pub value: f64,
    pub level: f64,
    pub cp: u32,
    /// Value relative to the rank 1 value, rounded to five decimals.
    pub percentage: f64,
    pub rank: u16,
    /// The entry holds for every higher level cap as well.
    #[serde(default)]
    pub capped: bool,
}

/// Rows of one league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueEntries<T> {
    pub league: String,
    pub entries: Vec<T>,
}

/// Per-league results in league configuration order. Leagues without any
/// rows are left out.
///
/// # Examples
///
/// ```rust
/// use ivrank::{LeagueResults, PokemonEntry};
///
/// let mut results = LeagueResults::new();
/// results.push("great", vec![PokemonEntry { pokemon: 1, rank: 3, ..Default::default() }]);
/// results.push("ultra", Vec::new());
///
/// assert_eq!(results.len(), 1);
/// assert_eq!(results.get("great").unwrap()[0].rank, 3);
/// assert!(results.get("ultra").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueResults<T> {
    leagues: Vec<LeagueEntries<T>>,
}

impl<T> Default for LeagueResults<T> {
    fn default() -> Self {
        Self {
            leagues: Vec::new(),
        }
    }
}

impl<T> LeagueResults<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a league's rows. Empty row sets are dropped.
    pub fn push(&mut self, league: impl Into<String>, entries: Vec<T>) {
        if !entries.is_empty() {
            self.leagues.push(LeagueEntries {
                league: league.into(),
                entries,
            });
        }
    }

    /// Rows of `league`, if it has any.
    pub fn get(&self, league: &str) -> Option<&[T]> {
        self.leagues
            .iter()
            .find(|group| group.league == league)
            .map(|group| group.entries.as_slice())
    }

    /// Leagues and their rows in configuration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[T])> {
        self.leagues
            .iter()
            .map(|group| (group.league.as_str(), group.entries.as_slice()))
    }

    /// League names in configuration order.
    pub fn league_names(&self) -> Vec<&str> {
        self.leagues.iter().map(|group| group.league.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.leagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leagues.is_empty()
    }
}

impl<T> IntoIterator for LeagueResults<T> {
    type Item = LeagueEntries<T>;
    type IntoIter = std::vec::IntoIter<LeagueEntries<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.leagues.into_iter()
    }
}
