//! Level-cap rank cache.
//!
//! Memoizes the compact rank tables of every configured level cap for a
//! (base stats, CP cap) key. The cache is shared by all queries of one
//! engine and is safe to use from several threads.

use crate::power::{calculate_cp, MAX_LEVEL};
use crate::ranker::{rank_combinations, CompactRankTable, RankedCombinations};
use crate::stats::{BaseStats, Ivs};
use log::{debug, trace};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, RwLock};

const DEFAULT_SHARDS: usize = 16;

/// Cache key: base stats, CP cap and the level cap sequence the index was
/// swept over.
///
/// Level caps are stored as half-level steps so the key stays `Eq` and
/// `Hash`.
///
/// # Examples
///
/// ```rust
/// use ivrank::cache::CacheKey;
/// use ivrank::BaseStats;
///
/// let stats = BaseStats::new(150, 120, 160);
/// let key = CacheKey::new(stats, 1500, &[50.0, 51.0]);
/// assert_eq!(key.level_caps, vec![100, 102]);
/// assert_ne!(key, CacheKey::new(stats, 1500, &[40.0]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub attack: u16,
    pub defense: u16,
    pub stamina: u16,
    pub cp_cap: u32,
    /// Level caps doubled.
    pub level_caps: Vec<u16>,
}

impl CacheKey {
    /// Key for `stats` under `cp_cap` with the engine's level caps.
    pub fn new(stats: BaseStats, cp_cap: u32, level_caps: &[f64]) -> Self {
        Self {
            attack: stats.attack,
            defense: stats.defense,
            stamina: stats.stamina,
            cp_cap,
            level_caps: level_caps
                .iter()
                .map(|level_cap| (level_cap * 2.0).round() as u16)
                .collect(),
        }
    }
}

/// Compact rank tables per level cap for one (stats, CP cap) key, in
/// ascending level cap order.
///
/// The last entry is the [`MAX_LEVEL`] table whenever the level cap sweep
/// did not max out.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCapRankIndex {
    entries: Vec<(f64, CompactRankTable)>,
}

impl LevelCapRankIndex {
    /// Level caps with their tables, ascending.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &CompactRankTable)> {
        self.entries.iter().map(|(cap, table)| (*cap, table))
    }

    /// Table of one level cap, if it was computed.
    pub fn get(&self, level_cap: f64) -> Option<&CompactRankTable> {
        self.entries
            .iter()
            .find(|(cap, _)| *cap == level_cap)
            .map(|(_, table)| table)
    }

    /// Level caps that carry a table, the uncapped [`MAX_LEVEL`] included.
    pub fn level_caps(&self) -> Vec<f64> {
        self.entries.iter().map(|(cap, _)| *cap).collect()
    }

    /// Number of level caps with a table.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True for an index with no tables.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Whether any IV combination of `stats` can pass `cp_cap` at
/// `level_cap`. When not, every combination simply sits at the level cap
/// and ranking there adds nothing the uncapped table does not.
pub(crate) fn reaches_cap(stats: BaseStats, cp_cap: u32, level_cap: f64) -> bool {
    calculate_cp(stats, Ivs::PERFECT, level_cap) > cp_cap
}

/// Whether even the weakest combination (`iv_floor` on every IV) is over
/// `cp_cap` half a level above `level_cap`, so no higher level cap can
/// change any ranking.
pub(crate) fn maxes_out(stats: BaseStats, cp_cap: u32, level_cap: f64, iv_floor: u8) -> bool {
    calculate_cp(stats, Ivs::uniform(iv_floor), level_cap + 0.5) > cp_cap
}

/// Sweep `level_caps` (ascending) and rank every viable one in full.
///
/// Level caps at which even perfect IVs stay under `cp_cap` are skipped.
/// The sweep stops at the first level cap past which no combination can
/// grow; if it never gets there, a [`MAX_LEVEL`] ranking is appended.
/// Returns `None` when no level cap is viable.
///
/// # Examples
///
/// ```rust
/// use ivrank::cache::rank_level_caps;
/// use ivrank::BaseStats;
///
/// let rankings = rank_level_caps(BaseStats::new(150, 120, 160), 500, &[40.0, 50.0]).unwrap();
/// assert_eq!(rankings.len(), 1);
/// assert_eq!(rankings[0].0, 40.0);
/// assert_eq!(rankings[0].1.sorted.len(), 4096);
/// ```
pub fn rank_level_caps(
    stats: BaseStats,
    cp_cap: u32,
    level_caps: &[f64],
) -> Option<Vec<(f64, RankedCombinations)>> {
    let mut rankings = Vec::new();
    let mut maxed = false;
    for &level_cap in level_caps {
        if !reaches_cap(stats, cp_cap, level_cap) {
            trace!("level cap {level_cap} not viable for {stats:?} at CP {cp_cap}");
            continue;
        }
        rankings.push((level_cap, rank_combinations(stats, cp_cap, level_cap, 0)));
        if maxes_out(stats, cp_cap, level_cap, 0) {
            maxed = true;
            break;
        }
    }
    if rankings.is_empty() {
        return None;
    }
    if !maxed {
        rankings.push((MAX_LEVEL, rank_combinations(stats, cp_cap, MAX_LEVEL, 0)));
    }
    Some(rankings)
}

/// Build the compact rank index for one key; see [`rank_level_caps`].
pub fn build_rank_index(
    stats: BaseStats,
    cp_cap: u32,
    level_caps: &[f64],
) -> Option<LevelCapRankIndex> {
    let entries = rank_level_caps(stats, cp_cap, level_caps)?
        .into_iter()
        .map(|(level_cap, ranked)| (level_cap, ranked.table))
        .collect();
    Some(LevelCapRankIndex { entries })
}

type Shard = RwLock<HashMap<CacheKey, Arc<LevelCapRankIndex>>>;

/// Lock-striped map from [`CacheKey`] to [`LevelCapRankIndex`].
///
/// Engines with different level caps may share one cache: the level caps
/// are part of the key. Lookups take a read lock on one shard only. Two threads missing the
/// same key may both compute the index; the first insert wins and later
/// ones are dropped, which is harmless since computation is pure.
#[derive(Debug)]
pub struct RankCache {
    shards: Vec<Shard>,
}

impl Default for RankCache {
    fn default() -> Self {
        Self::new()
    }
}

impl RankCache {
    /// Create an empty cache with the default number of shards.
    pub fn new() -> Self {
        Self::with_shards(DEFAULT_SHARDS)
    }

    /// Create an empty cache with `shards` locks (at least one).
    pub fn with_shards(shards: usize) -> Self {
        Self {
            shards: (0..shards.max(1)).map(|_| RwLock::new(HashMap::new())).collect(),
        }
    }

    fn shard(&self, key: &CacheKey) -> &Shard {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        &self.shards[(hasher.finish() as usize) % self.shards.len()]
    }

    /// Cached index for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<LevelCapRankIndex>> {
        self.shard(key)
            .read()
            .ok()
            .and_then(|shard| shard.get(key).cloned())
    }

    /// Insert `index` unless `key` is already present; returns the stored
    /// value either way.
    pub fn insert(&self, key: CacheKey, index: LevelCapRankIndex) -> Arc<LevelCapRankIndex> {
        let index = Arc::new(index);
        match self.shard(&key).write() {
            Ok(mut shard) => shard.entry(key).or_insert(index).clone(),
            Err(_) => index,
        }
    }

    /// Look up `stats`/`cp_cap`, building and storing the index on a miss.
    ///
    /// Returns `None` for keys with no viable level cap; those are not
    /// stored.
    pub fn get_or_build(
        &self,
        stats: BaseStats,
        cp_cap: u32,
        level_caps: &[f64],
    ) -> Option<Arc<LevelCapRankIndex>> {
        let key = CacheKey::new(stats, cp_cap, level_caps);
        if let Some(index) = self.get(&key) {
            return Some(index);
        }
        debug!("building rank index for {key:?}");
        let index = build_rank_index(stats, cp_cap, level_caps)?;
        Some(self.insert(key, index))
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.shards
            .iter()
            .map(|shard| shard.read().map(|guard| guard.len()).unwrap_or(0))
            .sum()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached index.
    pub fn clear(&self) {
        for shard in &self.shards {
            if let Ok(mut guard) = shard.write() {
                guard.clear();
            }
        }
    }
}
