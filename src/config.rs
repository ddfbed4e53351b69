//! League and level cap configuration.
//!
//! A [`RankerConfig`] is handed to [`RankEngine::new`](crate::RankEngine::new)
//! and stays fixed for the engine's lifetime.

use crate::error::ConfigError;
use crate::power::{MAX_LEVEL, MIN_LEVEL};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A competitive bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub name: String,
    /// Highest CP allowed in the league.
    pub cap: u32,
    /// Restricted to Little Cup eligible species.
    #[serde(default)]
    pub little: bool,
}

impl League {
    /// An open league capped at `cap` CP.
    pub fn new(name: impl Into<String>, cap: u32) -> Self {
        Self {
            name: name.into(),
            cap,
            little: false,
        }
    }

    /// A league restricted to Little Cup eligible creatures.
    pub fn little_cup(name: impl Into<String>, cap: u32) -> Self {
        Self {
            name: name.into(),
            cap,
            little: true,
        }
    }
}

/// Leagues and level caps ranked by the engine.
///
/// # Examples
///
/// ```rust
/// use ivrank::{League, RankerConfig};
///
/// let config: RankerConfig = serde_json::from_str(
///     r#"{"leagues": [{"name": "great", "cap": 1500}], "level_caps": [40, 50]}"#,
/// )
/// .unwrap();
/// assert_eq!(config.leagues, vec![League::new("great", 1500)]);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankerConfig {
    /// Leagues in result order.
    pub leagues: Vec<League>,
    /// Candidate level ceilings, strictly ascending.
    pub level_caps: Vec<f64>,
}

impl Default for RankerConfig {
    fn default() -> Self {
        Self {
            leagues: vec![
                League::little_cup("little", 500),
                League::new("great", 1500),
                League::new("ultra", 2500),
            ],
            level_caps: vec![50.0, 51.0],
        }
    }
}

impl RankerConfig {
    /// Build a configuration. Call [`RankerConfig::validate`] before use.
    pub fn new(leagues: Vec<League>, level_caps: Vec<f64>) -> Self {
        Self {
            leagues,
            level_caps,
        }
    }

    /// Check leagues and level caps.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found: no leagues, a duplicate
    /// name, a zero CP cap, no level caps, or a level cap that is not a
    /// half level in range or not ascending.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.leagues.is_empty() {
            return Err(ConfigError::NoLeagues);
        }
        let mut names = HashSet::new();
        for league in &self.leagues {
            if !names.insert(league.name.as_str()) {
                return Err(ConfigError::DuplicateLeague(league.name.clone()));
            }
            if league.cap == 0 {
                return Err(ConfigError::InvalidCap {
                    name: league.name.clone(),
                    cap: league.cap,
                });
            }
        }

        if self.level_caps.is_empty() {
            return Err(ConfigError::NoLevelCaps);
        }
        let mut previous = f64::NEG_INFINITY;
        for &level_cap in &self.level_caps {
            let half_level = (level_cap * 2.0).fract() == 0.0;
            if !half_level || level_cap < MIN_LEVEL || level_cap >= MAX_LEVEL || level_cap <= previous
            {
                return Err(ConfigError::InvalidLevelCap(level_cap));
            }
            previous = level_cap;
        }
        Ok(())
    }

    /// Position of the league called `name`.
    pub fn league_index(&self, name: &str) -> Option<usize> {
        self.leagues.iter().position(|league| league.name == name)
    }
}
