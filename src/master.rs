//! Species master data.
//!
//! The master document describes base stats per species and form,
//! evolution targets with their gates, temporary evolutions with their
//! own stats, costumes that block evolution, and the data-driven
//! evolution rules (IV dominance gates and alternate regional forms).

use crate::error::MasterDataError;
use crate::graph::EvolutionGraph;
use crate::stats::{BaseStats, DominantStat};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// An evolution target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionRecord {
    pub pokemon: u16,
    #[serde(default)]
    pub form: u16,
    /// Gender code the creature must have, `0` for none.
    #[serde(default)]
    pub gender_requirement: u8,
}

impl EvolutionRecord {
    /// An ungated evolution into `pokemon`/`form`.
    pub fn new(pokemon: u16, form: u16) -> Self {
        Self {
            pokemon,
            form,
            gender_requirement: 0,
        }
    }
}

/// Per-form data. A form only takes effect when it carries its own stats.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormRecord {
    #[serde(default)]
    pub attack: u16,
    #[serde(default)]
    pub defense: u16,
    #[serde(default)]
    pub stamina: u16,
    #[serde(default)]
    pub little: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evolutions: Vec<EvolutionRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub temp_evolutions: BTreeMap<u16, BaseStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costume_override_evos: Vec<u16>,
}

impl FormRecord {
    /// Base stats of the form. Zero attack means the form has none.
    pub fn stats(&self) -> BaseStats {
        BaseStats::new(self.attack, self.defense, self.stamina)
    }
}

/// Per-species data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PokemonRecord {
    #[serde(default)]
    pub attack: u16,
    #[serde(default)]
    pub defense: u16,
    #[serde(default)]
    pub stamina: u16,
    #[serde(default)]
    pub little: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evolutions: Vec<EvolutionRecord>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub temp_evolutions: BTreeMap<u16, BaseStats>,
    /// Costumes allowed to evolve even though they are marked as
    /// non-evolvable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub costume_override_evos: Vec<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub forms: BTreeMap<u16, FormRecord>,
}

impl PokemonRecord {
    /// Base stats of the species.
    pub fn stats(&self) -> BaseStats {
        BaseStats::new(self.attack, self.defense, self.stamina)
    }
}

/// Data-driven evolution gates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionRules {
    /// Evolution target → IV that must be highest to evolve into it.
    #[serde(default)]
    pub dominance: BTreeMap<u16, DominantStat>,
    /// Evolution target → extra forms reached alongside the listed one.
    #[serde(default)]
    pub alternate_forms: BTreeMap<u16, Vec<u16>>,
}

impl EvolutionRules {
    /// The rules of the live game: Tyrogue's three evolutions and the
    /// Alolan/Galarian siblings of Raichu, Exeggutor, Marowak and Weezing.
    pub fn standard() -> Self {
        Self {
            dominance: BTreeMap::from([
                (106, DominantStat::Attack),
                (107, DominantStat::Defense),
                (237, DominantStat::Stamina),
            ]),
            alternate_forms: BTreeMap::from([
                (26, vec![50]),
                (103, vec![78]),
                (105, vec![80]),
                (110, vec![944]),
            ]),
        }
    }

    /// Stat that must dominate the IVs to evolve into `target`.
    pub fn dominance_for(&self, target: u16) -> Option<DominantStat> {
        self.dominance.get(&target).copied()
    }

    /// Extra forms reached when evolving into `target`.
    pub fn alternate_forms_for(&self, target: u16) -> &[u16] {
        self.alternate_forms
            .get(&target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Effective data of a species in a form, after falling back from the
/// form to the species record.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedForm<'a> {
    pub species: &'a PokemonRecord,
    pub stats: BaseStats,
    pub little: bool,
    pub evolutions: &'a [EvolutionRecord],
    pub temp_evolutions: &'a BTreeMap<u16, BaseStats>,
    pub costume_override_evos: &'a [u16],
}

impl<'a> ResolvedForm<'a> {
    /// Stats of temporary evolution `evolution`, falling back to the
    /// species-level entry when the form's entry carries no stats.
    pub fn temp_evolution_stats(&self, evolution: u16) -> Option<BaseStats> {
        self.temp_evolutions
            .get(&evolution)
            .copied()
            .filter(|stats| !stats.is_empty())
            .or_else(|| self.species.temp_evolutions.get(&evolution).copied())
            .filter(|stats| !stats.is_empty())
    }
}

/// The full master table.
///
/// # Examples
///
/// ```rust
/// use ivrank::MasterData;
///
/// let master = MasterData::from_json(
///     r#"{"pokemon": {"1": {"attack": 118, "defense": 111, "stamina": 128,
///                          "evolutions": [{"pokemon": 2}]},
///                     "2": {"attack": 151, "defense": 143, "stamina": 155}}}"#,
/// )
/// .unwrap();
/// assert_eq!(master.pokemon(1).unwrap().evolutions[0].pokemon, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterData {
    #[serde(default)]
    pub pokemon: BTreeMap<u16, PokemonRecord>,
    /// Costume id → whether the costume blocks evolution.
    #[serde(default)]
    pub costumes: BTreeMap<u16, bool>,
    #[serde(default = "EvolutionRules::standard")]
    pub evolution_rules: EvolutionRules,
}

impl Default for MasterData {
    fn default() -> Self {
        Self {
            pokemon: BTreeMap::new(),
            costumes: BTreeMap::new(),
            evolution_rules: EvolutionRules::standard(),
        }
    }
}

impl MasterData {
    /// Parse and validate a master document.
    pub fn from_json(json: &str) -> Result<Self, MasterDataError> {
        let master: MasterData = serde_json::from_str(json).map_err(MasterDataError::Parse)?;
        master.validate()?;
        Ok(master)
    }

    /// Read, parse and validate a master document from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MasterDataError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MasterDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let master = Self::from_json(&json)?;
        info!(
            "loaded master data for {} pokemon from {}",
            master.pokemon.len(),
            path.display()
        );
        Ok(master)
    }

    /// Fetch, parse and validate a master document over HTTP.
    #[cfg(feature = "fetch")]
    pub fn fetch(url: &str) -> Result<Self, MasterDataError> {
        let response = reqwest::blocking::get(url)
            .and_then(|response| response.error_for_status())
            .map_err(|e| MasterDataError::Fetch(e.to_string()))?;
        let json = response
            .text()
            .map_err(|e| MasterDataError::Fetch(e.to_string()))?;
        let master = Self::from_json(&json)?;
        info!("fetched master data for {} pokemon from {url}", master.pokemon.len());
        Ok(master)
    }

    /// Write the table back out as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MasterDataError> {
        let path = path.as_ref();
        let json = serde_json::to_vec(self).map_err(MasterDataError::Serialize)?;
        std::fs::write(path, json).map_err(|source| MasterDataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("saved master data to {}", path.display());
        Ok(())
    }

    /// Check that the evolution graph is acyclic.
    pub fn validate(&self) -> Result<(), MasterDataError> {
        let depth = EvolutionGraph::from_master(self).longest_chain()?;
        debug!("longest evolution chain has {depth} steps");
        Ok(())
    }

    /// Species record, `None` when absent or without stats.
    pub fn pokemon(&self, pokemon: u16) -> Option<&PokemonRecord> {
        self.pokemon.get(&pokemon).filter(|record| record.attack != 0)
    }

    /// Whether `costume` prevents evolution.
    pub fn costume_blocks_evolution(&self, costume: u16) -> bool {
        self.costumes.get(&costume).copied().unwrap_or(false)
    }

    /// Resolve `pokemon` in `form` (`0` for the base form).
    ///
    /// A form with zero attack, or one missing from the table, falls back
    /// to the species record as a whole.
    pub fn resolve_form(&self, pokemon: u16, form: u16) -> Option<ResolvedForm<'_>> {
        let species = self.pokemon(pokemon)?;
        let form_record = (form != 0)
            .then(|| species.forms.get(&form))
            .flatten()
            .filter(|record| record.attack != 0);

        Some(match form_record {
            Some(record) => ResolvedForm {
                species,
                stats: record.stats(),
                little: record.little || species.little,
                evolutions: &record.evolutions,
                temp_evolutions: &record.temp_evolutions,
                costume_override_evos: &record.costume_override_evos,
            },
            None => ResolvedForm {
                species,
                stats: species.stats(),
                little: species.little,
                evolutions: &species.evolutions,
                temp_evolutions: &species.temp_evolutions,
                costume_override_evos: &species.costume_override_evos,
            },
        })
    }
}
