//! # ivrank - IV Combination Ranking for PvP Leagues
//!
//! Ranks all 4096 individual value (IV) combinations of a creature by
//! stat product under a league CP cap, and answers point queries that
//! walk a creature's evolutions:
//! - **Deterministic** ranking (same stats and caps → same tables)
//! - **Level cap aware** (one table per configured level ceiling)
//! - **Evolution aware** (gender, IV dominance and costume gates)
//! - **Shared cache** of compact rank tables, safe across threads
//!
//! ## Core Concepts
//!
//! ### Ranking Pipeline
//!
//! ```text
//! [MasterData] → [BaseStats] → [rank_combinations] → [RankCache] → [LeagueResults]
//! ```
//!
//! 1. **Master data** resolves a species, form and temporary evolution to
//!    base stats
//! 2. **The ranker** finds each combination's best level under a CP cap
//!    and sorts the combinations by stat product
//! 3. **The cache** keeps one compact table per level cap, keyed by stats
//!    and CP cap
//! 4. **Queries** read ranks out of the cached tables per league
//!
//! ## Example
//!
//! ```rust
//! use ivrank::*;
//!
//! let master = MasterData::from_json(
//!     r#"{"pokemon": {"1": {"attack": 150, "defense": 120, "stamina": 160}}}"#,
//! )
//! .unwrap();
//! let config = RankerConfig::new(vec![League::new("great", 1500)], vec![50.0]);
//! let engine = RankEngine::new(config, master).unwrap();
//!
//! let results = engine.query_rank(&RankQuery::new(1, 10, 5, 0, 22.5)).unwrap();
//! let great = results.get("great").unwrap();
//! assert_eq!(great.len(), 1);
//! assert_eq!(great[0].cap, 50.0);
//! assert_eq!(great[0].level, 44.5);
//! assert_eq!(great[0].cp, 1494);
//! assert_eq!(great[0].rank, 3546);
//! ```
//!
//! ## Modules
//!
//! - [`stats`] - Base stats and IV combinations
//! - [`power`] - CP multipliers, CP and stat product, best level search
//! - [`ranker`] - Ranking of all combinations under one cap
//! - [`cache`] - Level cap rank tables and the shared cache
//! - [`config`] - Leagues and level caps
//! - [`master`] - Species master data
//! - [`graph`] - Evolution graph and cycle detection
//! - [`engine`] - The rank engine
//! - [`query`] - Evolution-aware point queries
//! - [`top`] - League top-rank tables
//! - [`filter`] - Level cap interest filter
//! - [`results`] - Result rows
//! - [`error`] - Error types

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod graph;
pub mod master;
pub mod power;
pub mod query;
pub mod ranker;
pub mod results;
pub mod stats;
pub mod top;

// Re-export main types for convenience
pub use config::{League, RankerConfig};
pub use engine::RankEngine;
pub use error::{ConfigError, MasterDataError, QueryError};
pub use master::MasterData;
pub use query::RankQuery;
pub use results::{LeagueResults, PokemonEntry, Ranking};
pub use stats::{BaseStats, DominantStat, Ivs};

// Re-export the building blocks
pub use cache::{rank_level_caps, LevelCapRankIndex, RankCache};
pub use filter::filter_level_caps;
pub use power::{best_stat, calculate_cp, PvpStat};
pub use ranker::{rank_combinations, CompactRankTable, RankedCombinations};
