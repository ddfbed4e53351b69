//! Evolution-aware rank queries.
//!
//! A query takes one observed creature and reports, per league, its rank
//! under every level cap, then walks its evolutions and temporary
//! evolutions and reports theirs as well.

use crate::engine::RankEngine;
use crate::error::QueryError;
use crate::master::ResolvedForm;
use crate::power::{best_stat, MAX_LEVEL, MIN_LEVEL};
use crate::results::{round5, LeagueResults, PokemonEntry};
use crate::stats::{BaseStats, Ivs};
use log::{debug, trace, warn};

/// Deepest evolution chain a query will follow.
pub const MAX_EVOLUTION_DEPTH: usize = 16;

/// An observed creature.
///
/// # Examples
///
/// ```rust
/// use ivrank::RankQuery;
///
/// let query = RankQuery::new(1, 10, 5, 0, 22.5).form(163).gender(1);
/// assert_eq!(query.form, 163);
/// assert_eq!(query.costume, 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankQuery {
    pub pokemon: u16,
    pub form: u16,
    pub costume: u16,
    pub gender: u8,
    pub attack: u8,
    pub defense: u8,
    pub stamina: u8,
    pub level: f64,
}

impl RankQuery {
    /// A base-form, costume-free, genderless query. `level` must be a half
    /// level of at least 1.
    pub fn new(pokemon: u16, attack: u8, defense: u8, stamina: u8, level: f64) -> Self {
        Self {
            pokemon,
            form: 0,
            costume: 0,
            gender: 0,
            attack,
            defense,
            stamina,
            level,
        }
    }

    /// Set the form id.
    pub fn form(mut self, form: u16) -> Self {
        self.form = form;
        self
    }

    /// Set the costume id. Blocking costumes stop evolution.
    pub fn costume(mut self, costume: u16) -> Self {
        self.costume = costume;
        self
    }

    /// Set the gender used by gender-gated evolutions.
    pub fn gender(mut self, gender: u8) -> Self {
        self.gender = gender;
        self
    }

    /// Checked IVs of the query.
    pub fn ivs(&self) -> Result<Ivs, QueryError> {
        let ivs = Ivs::checked(self.attack, self.defense, self.stamina)?;
        if self.level.is_nan() || self.level < MIN_LEVEL {
            return Err(QueryError::InvalidArgument(format!(
                "level {} is below {MIN_LEVEL}",
                self.level
            )));
        }
        if (self.level * 2.0).fract() != 0.0 {
            return Err(QueryError::InvalidArgument(format!(
                "level {} is not a half level",
                self.level
            )));
        }
        Ok(ivs)
    }
}

/// Identity stamped on the entries of one stage.
#[derive(Debug, Clone, Copy)]
struct Stage {
    pokemon: u16,
    form: u16,
    evolution: u16,
}

impl RankEngine {
    /// Rank an observed creature and everything it can evolve into.
    ///
    /// Leagues appear in configuration order. Within a league, entries of
    /// the queried stage come first, then those of each evolution
    /// (depth first), then temporary evolutions.
    ///
    /// # Errors
    ///
    /// * [`QueryError::InvalidArgument`] for IVs above 15, or a level below 1
    ///   or between half levels
    /// * [`QueryError::MissingData`] when the species has no master record
    pub fn query_rank(&self, query: &RankQuery) -> Result<LeagueResults<PokemonEntry>, QueryError> {
        let ivs = query.ivs()?;
        let mut per_league = self.empty_accumulator();
        self.query_stage(query, ivs, query.pokemon, query.form, 0, &mut per_league)?;
        Ok(self.collect_results(per_league))
    }

    fn query_stage(
        &self,
        query: &RankQuery,
        ivs: Ivs,
        pokemon: u16,
        form: u16,
        depth: usize,
        out: &mut [Vec<PokemonEntry>],
    ) -> Result<(), QueryError> {
        if depth > MAX_EVOLUTION_DEPTH {
            warn!("evolution chain through pokemon {pokemon} exceeds depth {MAX_EVOLUTION_DEPTH}");
            return Err(QueryError::EvolutionDepthExceeded {
                pokemon,
                depth: MAX_EVOLUTION_DEPTH,
            });
        }
        let resolved = self
            .master()
            .resolve_form(pokemon, form)
            .ok_or(QueryError::MissingData { pokemon })?;

        let stage = Stage {
            pokemon,
            form,
            evolution: 0,
        };
        self.push_entries(resolved.stats, resolved.little, stage, ivs, query.level, out);

        if self.can_evolve(query.costume, &resolved) {
            let rules = &self.master().evolution_rules;
            for evolution in resolved.evolutions {
                if let Some(dominant) = rules.dominance_for(evolution.pokemon) {
                    if !ivs.dominated_by(dominant) {
                        trace!("{ivs:?} cannot evolve into {} ({dominant:?})", evolution.pokemon);
                        continue;
                    }
                }
                if evolution.gender_requirement != 0 && evolution.gender_requirement != query.gender {
                    trace!("gender {} cannot evolve into {}", query.gender, evolution.pokemon);
                    continue;
                }
                let targets = std::iter::once(evolution.form)
                    .chain(rules.alternate_forms_for(evolution.pokemon).iter().copied());
                for target_form in targets {
                    debug!("pokemon {pokemon} evolves into {}/{target_form}", evolution.pokemon);
                    match self.query_stage(query, ivs, evolution.pokemon, target_form, depth + 1, out) {
                        Err(QueryError::MissingData { pokemon: missing }) => {
                            debug!("skipping evolution into {missing}: no master data");
                        }
                        other => other?,
                    }
                }
            }
        }

        for &evolution in resolved.temp_evolutions.keys() {
            if let Some(stats) = resolved.temp_evolution_stats(evolution) {
                let stage = Stage { evolution, ..stage };
                self.push_entries(stats, resolved.little, stage, ivs, query.level, out);
            }
        }
        Ok(())
    }

    /// A costume marked non-evolvable blocks evolution unless the form
    /// lists it as an override.
    fn can_evolve(&self, costume: u16, resolved: &ResolvedForm<'_>) -> bool {
        costume == 0
            || !self.master().costume_blocks_evolution(costume)
            || resolved.costume_override_evos.contains(&costume)
    }

    /// Rank one stage in every league it is eligible for.
    fn push_entries(
        &self,
        stats: BaseStats,
        little: bool,
        stage: Stage,
        ivs: Ivs,
        level: f64,
        out: &mut [Vec<PokemonEntry>],
    ) {
        for (league, slot) in self.config().leagues.iter().zip(out.iter_mut()) {
            if league.little && !little {
                continue;
            }
            let Some(index) = self.all_ranks_for_stats(stats, league.cap) else {
                continue;
            };
            let mut entries = Vec::with_capacity(index.len());
            for (level_cap, table) in index.iter() {
                let Some(stat) = best_stat(stats, ivs, league.cap, level_cap, level) else {
                    continue;
                };
                entries.push(PokemonEntry {
                    pokemon: stage.pokemon,
                    form: stage.form,
                    evolution: stage.evolution,
                    cap: level_cap,
                    value: stat.value.floor(),
                    level: stat.level,
                    cp: stat.cp,
                    percentage: round5(stat.value / table.top_value),
                    rank: table.combinations[ivs.index()],
                    capped: false,
                });
            }
            seal_level_cap_run(&mut entries);
            slot.extend(entries);
        }
    }
}

/// Collapse trailing entries with the same level and rank, then mark the
/// survivor capped. A trailing uncapped-table entry is redundant unless
/// it is the only one.
fn seal_level_cap_run(entries: &mut Vec<PokemonEntry>) {
    while let [.., previous, last] = entries.as_slice() {
        if previous.level != last.level || previous.rank != last.rank {
            break;
        }
        entries.pop();
    }
    let count = entries.len();
    let Some(last) = entries.last_mut() else {
        return;
    };
    if last.cap < MAX_LEVEL {
        last.capped = true;
    } else if count > 1 {
        entries.pop();
    }
}
