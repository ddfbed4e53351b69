//! Rank engine module.
//!
//! Provides the `RankEngine` type, the main entry point. It owns the
//! league configuration, the species master data and the level-cap rank
//! cache shared by every query.

use crate::cache::{rank_level_caps, LevelCapRankIndex, RankCache};
use crate::config::RankerConfig;
use crate::error::{ConfigError, MasterDataError};
use crate::master::MasterData;
use crate::ranker::RankedCombinations;
use crate::results::LeagueResults;
use crate::stats::BaseStats;
use log::info;
use std::path::Path;
use std::sync::Arc;

/// Ranks IV combinations per league and answers point queries.
///
/// Queries take `&self`, so one engine can serve many threads; the rank
/// cache is the only shared mutable state. Replacing master data takes
/// `&mut self`.
///
/// # Examples
///
/// ```rust
/// use ivrank::{BaseStats, MasterData, RankEngine, RankerConfig};
///
/// let engine = RankEngine::new(RankerConfig::default(), MasterData::default()).unwrap();
/// let index = engine.all_ranks_for_stats(BaseStats::new(150, 120, 160), 1500).unwrap();
/// assert_eq!(index.level_caps(), vec![50.0, 51.0, 100.0]);
///
/// // Too weak to ever reach 2500 CP.
/// assert!(engine.all_ranks_for_stats(BaseStats::new(90, 90, 90), 2500).is_none());
/// ```
#[derive(Debug)]
pub struct RankEngine {
    config: RankerConfig,
    master: MasterData,
    cache: Arc<RankCache>,
}

impl RankEngine {
    /// Create an engine with its own empty cache.
    pub fn new(config: RankerConfig, master: MasterData) -> Result<Self, ConfigError> {
        Self::with_cache(config, master, Arc::new(RankCache::new()))
    }

    /// Create an engine that uses `cache`. Any engines may share one
    /// cache; tables are keyed by level caps as well as stats.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] when `config` is invalid or `master` has an
    /// evolution cycle.
    pub fn with_cache(
        config: RankerConfig,
        master: MasterData,
        cache: Arc<RankCache>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        master
            .validate()
            .map_err(|err| ConfigError::InvalidMasterData(err.to_string()))?;
        info!(
            "rank engine ready: {} leagues, {} level caps, {} pokemon",
            config.leagues.len(),
            config.level_caps.len(),
            master.pokemon.len()
        );
        Ok(Self {
            config,
            master,
            cache,
        })
    }

    /// Leagues and level caps this engine ranks.
    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    /// Current master data.
    pub fn master(&self) -> &MasterData {
        &self.master
    }

    /// The rank cache, for sharing with another engine or inspection.
    pub fn cache(&self) -> &Arc<RankCache> {
        &self.cache
    }

    /// Replace master data after validating it.
    pub fn set_master_data(&mut self, master: MasterData) -> Result<(), MasterDataError> {
        master.validate()?;
        self.master = master;
        Ok(())
    }

    /// Load master data from `path`. The current data is kept on failure.
    pub fn load_master_data(&mut self, path: impl AsRef<Path>) -> Result<(), MasterDataError> {
        self.master = MasterData::load(path)?;
        Ok(())
    }

    /// Fetch master data from `url`. The current data is kept on failure.
    #[cfg(feature = "fetch")]
    pub fn fetch_master_data(&mut self, url: &str) -> Result<(), MasterDataError> {
        self.master = MasterData::fetch(url)?;
        Ok(())
    }

    /// Write the current master data to `path` as JSON.
    pub fn save_master_data(&self, path: impl AsRef<Path>) -> Result<(), MasterDataError> {
        self.master.save(path)
    }

    /// Compact rank tables for every configured level cap, from cache when
    /// possible.
    ///
    /// Returns `None` when `stats` cannot pass `cp_cap` at any configured
    /// level cap; such a creature is never ranked in that league.
    pub fn all_ranks_for_stats(
        &self,
        stats: BaseStats,
        cp_cap: u32,
    ) -> Option<Arc<LevelCapRankIndex>> {
        self.cache.get_or_build(stats, cp_cap, &self.config.level_caps)
    }

    /// Full rankings for every configured level cap, computed fresh.
    ///
    /// Runs the same level cap sweep as [`all_ranks_for_stats`] but keeps
    /// every ranked combination (level, CP and value) instead of the
    /// compact tables, and bypasses the cache.
    ///
    /// [`all_ranks_for_stats`]: Self::all_ranks_for_stats
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ivrank::{BaseStats, MasterData, RankEngine, RankerConfig};
    ///
    /// let engine = RankEngine::new(RankerConfig::default(), MasterData::default()).unwrap();
    /// let rankings = engine.all_rankings_for_stats(BaseStats::new(150, 120, 160), 1500).unwrap();
    /// let caps: Vec<f64> = rankings.iter().map(|(cap, _)| *cap).collect();
    /// assert_eq!(caps, vec![50.0, 51.0, 100.0]);
    /// assert_eq!(rankings[0].1.top().unwrap().level, 43.0);
    /// ```
    pub fn all_rankings_for_stats(
        &self,
        stats: BaseStats,
        cp_cap: u32,
    ) -> Option<Vec<(f64, RankedCombinations)>> {
        rank_level_caps(stats, cp_cap, &self.config.level_caps)
    }

    /// Whether the species-level temporary evolution `evolution` of
    /// `pokemon` is flagged unreleased.
    pub fn is_mega_unreleased(&self, pokemon: u16, evolution: u16) -> bool {
        self.master
            .pokemon(pokemon)
            .and_then(|record| record.temp_evolutions.get(&evolution))
            .map_or(false, |stats| stats.unreleased)
    }

    /// Turn per-league accumulators (indexed like `config.leagues`) into
    /// results.
    pub(crate) fn collect_results<T>(&self, per_league: Vec<Vec<T>>) -> LeagueResults<T> {
        let mut results = LeagueResults::new();
        for (league, entries) in self.config.leagues.iter().zip(per_league) {
            results.push(league.name.clone(), entries);
        }
        results
    }

    pub(crate) fn empty_accumulator<T>(&self) -> Vec<Vec<T>> {
        self.config.leagues.iter().map(|_| Vec::new()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::League;
    use crate::master::{EvolutionRecord, PokemonRecord};

    fn engine() -> RankEngine {
        let master = MasterData::from_json(
            r#"{"pokemon": {"3": {"attack": 198, "defense": 189, "stamina": 190,
                "temp_evolutions": {"1": {"attack": 264, "defense": 250, "stamina": 190},
                                    "2": {"attack": 280, "defense": 250, "stamina": 190, "unreleased": true}}}}}"#,
        )
        .unwrap();
        RankEngine::new(RankerConfig::default(), master).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = RankerConfig::new(vec![League::new("great", 1500)], vec![51.0, 50.0]);
        assert!(matches!(
            RankEngine::new(config, MasterData::default()),
            Err(ConfigError::InvalidLevelCap(50.0))
        ));
    }

    #[test]
    fn test_all_ranks_is_idempotent() {
        let engine = engine();
        let stats = BaseStats::new(150, 120, 160);
        let first = engine.all_ranks_for_stats(stats, 1500).unwrap();
        let second = engine.all_ranks_for_stats(stats, 1500).unwrap();
        assert_eq!(*first, *second);
        assert_eq!(engine.cache().len(), 1);
    }

    #[test]
    fn test_shared_cache() {
        let cache = Arc::new(RankCache::new());
        let a = RankEngine::with_cache(RankerConfig::default(), MasterData::default(), cache.clone())
            .unwrap();
        let b = RankEngine::with_cache(RankerConfig::default(), MasterData::default(), cache.clone())
            .unwrap();
        let stats = BaseStats::new(150, 120, 160);
        let first = a.all_ranks_for_stats(stats, 1500).unwrap();
        let second = b.all_ranks_for_stats(stats, 1500).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_shared_cache_keeps_level_caps_apart() {
        let cache = Arc::new(RankCache::new());
        let great = || vec![League::new("great", 1500)];
        let narrow = RankEngine::with_cache(
            RankerConfig::new(great(), vec![40.0]),
            MasterData::default(),
            cache.clone(),
        )
        .unwrap();
        let wide = RankEngine::with_cache(
            RankerConfig::new(great(), vec![50.0, 51.0]),
            MasterData::default(),
            cache.clone(),
        )
        .unwrap();

        let stats = BaseStats::new(150, 120, 160);
        let first = narrow.all_ranks_for_stats(stats, 1500).unwrap();
        let second = wide.all_ranks_for_stats(stats, 1500).unwrap();
        assert_eq!(first.level_caps(), vec![40.0, 100.0]);
        assert_eq!(second.level_caps(), vec![50.0, 51.0, 100.0]);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_rejects_cyclic_master_data() {
        let mut cyclic = MasterData::default();
        cyclic.pokemon.insert(
            1,
            PokemonRecord {
                attack: 10,
                evolutions: vec![EvolutionRecord::new(2, 0)],
                ..Default::default()
            },
        );
        cyclic.pokemon.insert(
            2,
            PokemonRecord {
                attack: 10,
                evolutions: vec![EvolutionRecord::new(1, 0)],
                ..Default::default()
            },
        );
        match RankEngine::new(RankerConfig::default(), cyclic) {
            Err(ConfigError::InvalidMasterData(message)) => {
                assert!(message.contains("Evolution cycle detected"));
            }
            other => panic!("expected invalid master data, got {other:?}"),
        }
    }

    #[test]
    fn test_full_rankings_match_cached_tables() {
        let engine = engine();
        let stats = BaseStats::new(150, 120, 160);
        let rankings = engine.all_rankings_for_stats(stats, 1500).unwrap();
        let index = engine.all_ranks_for_stats(stats, 1500).unwrap();
        let caps: Vec<f64> = rankings.iter().map(|(cap, _)| *cap).collect();
        assert_eq!(caps, index.level_caps());
        for (level_cap, ranked) in &rankings {
            assert_eq!(index.get(*level_cap), Some(&ranked.table));
            assert_eq!(ranked.sorted.len(), 4096);
        }
        assert!(engine
            .all_rankings_for_stats(BaseStats::new(90, 90, 90), 2500)
            .is_none());
    }

    #[test]
    fn test_mega_unreleased() {
        let engine = engine();
        assert!(!engine.is_mega_unreleased(3, 1));
        assert!(engine.is_mega_unreleased(3, 2));
        assert!(!engine.is_mega_unreleased(3, 3));
        assert!(!engine.is_mega_unreleased(4, 1));
    }

    #[test]
    fn test_set_master_data_rejects_cycles() {
        let mut engine = engine();
        let mut cyclic = MasterData::default();
        cyclic.pokemon.insert(
            1,
            PokemonRecord {
                attack: 10,
                evolutions: vec![EvolutionRecord::new(1, 0)],
                ..Default::default()
            },
        );
        assert!(engine.set_master_data(cyclic).is_err());
        assert!(engine.master().pokemon(3).is_some());
    }
}
