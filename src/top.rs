//! League top-rank aggregation.
//!
//! Expands full (uncached) rankings into per-league tables of the best IV
//! combinations, across every configured level cap.

use crate::cache::{maxes_out, reaches_cap};
use crate::engine::RankEngine;
use crate::error::QueryError;
use crate::power::MAX_LEVEL;
use crate::ranker::rank_combinations;
use crate::results::{round5, LeagueResults, Ranking};
use crate::stats::BaseStats;

/// Rankings of one league, plus the position → ranking map of the level
/// cap processed last.
#[derive(Debug, Default)]
struct LeagueSweep {
    rankings: Vec<Ranking>,
    last_rank: Vec<usize>,
}

impl LeagueSweep {
    /// Add the combinations ranked at most `max_rank` under `level_cap`.
    ///
    /// A combination that repeats the ranking at the same position under
    /// the previous level cap is not added again. With `mark_only`, no new
    /// rankings are added and repeats are marked capped instead.
    fn process(
        &mut self,
        stats: BaseStats,
        cp_cap: u32,
        level_cap: f64,
        iv_floor: u8,
        max_rank: u16,
        mark_only: bool,
    ) {
        let ranked = rank_combinations(stats, cp_cap, level_cap, iv_floor);
        let top_value = ranked.table.top_value;
        for (position, combination) in ranked.sorted.iter().enumerate() {
            let rank = ranked.rank_at(position);
            if rank > max_rank {
                self.last_rank.truncate(position);
                break;
            }
            let ivs = combination.ivs();
            let repeated = self.last_rank.get(position).copied().filter(|&at| {
                let previous = &self.rankings[at];
                previous.level == combination.level && previous.rank == rank && previous.ivs() == ivs
            });
            match repeated {
                Some(at) => {
                    if mark_only {
                        self.rankings[at].capped = true;
                    }
                }
                None if !mark_only => {
                    self.rankings.push(Ranking {
                        rank,
                        attack: ivs.attack,
                        defense: ivs.defense,
                        stamina: ivs.stamina,
                        cap: level_cap,
                        value: combination.value.floor(),
                        level: combination.level,
                        cp: combination.cp,
                        percentage: round5(combination.value / top_value),
                        capped: false,
                    });
                    let at = self.rankings.len() - 1;
                    match self.last_rank.get_mut(position) {
                        Some(slot) => *slot = at,
                        None => self.last_rank.push(at),
                    }
                }
                None => {}
            }
        }
    }

    fn cap_last_level(&mut self) {
        for &at in &self.last_rank {
            self.rankings[at].capped = true;
        }
    }
}

impl RankEngine {
    /// Top rankings of a species, form and temporary evolution (`0` for
    /// none) in every eligible league.
    ///
    /// Only combinations ranked at most `max_rank` are listed, and only IVs
    /// of at least `iv_floor` are enumerated.
    ///
    /// # Errors
    ///
    /// [`QueryError::MissingData`] when the species has no master record.
    pub fn calculate_top_ranks(
        &self,
        max_rank: u16,
        pokemon: u16,
        form: u16,
        evolution: u16,
        iv_floor: u8,
    ) -> Result<LeagueResults<Ranking>, QueryError> {
        let resolved = self
            .master()
            .resolve_form(pokemon, form)
            .ok_or(QueryError::MissingData { pokemon })?;
        let stats = (evolution != 0)
            .then(|| resolved.temp_evolution_stats(evolution))
            .flatten()
            .unwrap_or(resolved.stats);
        Ok(self.top_ranks_for_stats(stats, resolved.little, max_rank, iv_floor))
    }

    /// Top rankings for a bare stat profile. Little Cup leagues are only
    /// included when `little` is set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ivrank::{BaseStats, MasterData, RankEngine, RankerConfig};
    ///
    /// let engine = RankEngine::new(RankerConfig::default(), MasterData::default()).unwrap();
    /// let top = engine.top_ranks_for_stats(BaseStats::new(150, 120, 160), false, 1, 0);
    ///
    /// assert!(top.get("little").is_none());
    /// let great = top.get("great").unwrap();
    /// assert!(great.iter().all(|ranking| ranking.rank == 1));
    /// ```
    pub fn top_ranks_for_stats(
        &self,
        stats: BaseStats,
        little: bool,
        max_rank: u16,
        iv_floor: u8,
    ) -> LeagueResults<Ranking> {
        let mut results = LeagueResults::new();
        for league in &self.config().leagues {
            if league.little && !little {
                continue;
            }
            let mut sweep = LeagueSweep::default();
            let mut maxed = false;
            for &level_cap in &self.config().level_caps {
                if !reaches_cap(stats, league.cap, level_cap) {
                    continue;
                }
                sweep.process(stats, league.cap, level_cap, iv_floor, max_rank, false);
                if maxes_out(stats, league.cap, level_cap, iv_floor) {
                    maxed = true;
                    sweep.cap_last_level();
                    break;
                }
            }
            if !sweep.rankings.is_empty() && !maxed {
                sweep.process(stats, league.cap, MAX_LEVEL, iv_floor, max_rank, true);
            }
            results.push(league.name.clone(), sweep.rankings);
        }
        results
    }
}
