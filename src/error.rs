//! Error types for ranking queries, master data and configuration.
//!
//! Query failures are represented by [`QueryError`], master data I/O and
//! integrity failures by [`MasterDataError`], and rejected engine
//! configuration by [`ConfigError`].

use std::path::PathBuf;
use thiserror::Error;

/// Format an evolution cycle as a readable string.
fn format_cycle_path(path: &[u16]) -> String {
    if path.is_empty() {
        return String::from("(empty cycle)");
    }
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// Errors that can occur while answering a rank query.
///
/// # Examples
///
/// ```rust
/// use ivrank::QueryError;
///
/// let err = QueryError::MissingData { pokemon: 9999 };
/// assert_eq!(err.to_string(), "Missing master data for pokemon 9999");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum QueryError {
    /// An IV was outside `[0, 15]`, or the level was below 1 or not a
    /// half level.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The species has no master record.
    #[error("Missing master data for pokemon {pokemon}")]
    MissingData { pokemon: u16 },

    /// The evolution chain went deeper than the engine allows.
    ///
    /// Only reachable with malformed master data that bypassed load-time
    /// validation.
    #[error("Evolution chain of pokemon {pokemon} exceeds depth {depth}")]
    EvolutionDepthExceeded { pokemon: u16, depth: usize },
}

/// Errors raised while loading, saving or validating master data.
#[derive(Debug, Error)]
pub enum MasterDataError {
    /// The master document could not be read or written.
    #[error("Master data I/O failed for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The master document is not valid JSON for the expected shape.
    #[error("Can't parse master data: {0}")]
    Parse(#[source] serde_json::Error),

    /// The in-memory table could not be serialized.
    #[error("Can't serialize master data: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The evolution graph contains a cycle.
    ///
    /// Contains the species ids on the cycle, with the first id repeated
    /// at the end.
    #[error("Evolution cycle detected: {}", format_cycle_path(.path))]
    Cycle { path: Vec<u16> },

    /// Fetching the master document over the network failed.
    #[error("Can't fetch master data: {0}")]
    Fetch(String),
}

/// Errors raised when building a [`RankEngine`](crate::RankEngine) from a
/// [`RankerConfig`](crate::RankerConfig) and master data.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("No leagues configured")]
    NoLeagues,

    #[error("Duplicate league name: {0}")]
    DuplicateLeague(String),

    #[error("League {name} has an invalid CP cap {cap}")]
    InvalidCap { name: String, cap: u32 },

    #[error("No level caps configured")]
    NoLevelCaps,

    /// A level cap is not a half level in `[1, 100)`, or the sequence is
    /// not strictly ascending.
    #[error("Invalid level cap {0}")]
    InvalidLevelCap(f64),

    /// The master data handed to the engine failed validation.
    #[error("Invalid master data: {0}")]
    InvalidMasterData(String),
}
