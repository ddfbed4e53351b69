//! Level cap interest filter.
//!
//! Reduces a league's query entries to the level caps a caller cares
//! about, merging neighbours that carry the same rank.

use crate::results::PokemonEntry;

fn same_standing(a: &PokemonEntry, b: &PokemonEntry) -> bool {
    a.pokemon == b.pokemon
        && a.form == b.form
        && a.evolution == b.evolution
        && a.level == b.level
        && a.rank == b.rank
}

/// Keep only entries relevant to `interested_level_caps` (ascending).
///
/// * Level-exact entries (`cap == 0`) survive when their level is one of
///   the interesting values.
/// * Capped entries survive when their cap is at most the highest
///   interesting value, since they hold at every cap above their own.
/// * Other entries survive when their cap is one of the interesting
///   values.
///
/// A surviving capped-run entry that has the same species, form,
/// evolution, level and rank as the previous survivor is merged into it:
/// the earlier entry takes over its cap and capped flag.
///
/// # Examples
///
/// ```rust
/// use ivrank::filter::filter_level_caps;
/// use ivrank::PokemonEntry;
///
/// let entry = |cap: f64, rank: u16, capped: bool| PokemonEntry {
///     pokemon: 1, cap, level: 40.0, rank, capped, ..Default::default()
/// };
/// let entries = vec![entry(40.0, 3, false), entry(41.0, 3, false), entry(50.0, 2, true)];
///
/// let filtered = filter_level_caps(&entries, &[40.0, 41.0]);
/// assert_eq!(filtered, vec![entry(41.0, 3, false)]);
/// ```
pub fn filter_level_caps(
    entries: &[PokemonEntry],
    interested_level_caps: &[f64],
) -> Vec<PokemonEntry> {
    let Some(&highest) = interested_level_caps.last() else {
        return Vec::new();
    };
    let mut result: Vec<PokemonEntry> = Vec::new();
    let mut last: Option<usize> = None;

    for entry in entries {
        if entry.cap == 0.0 {
            if interested_level_caps.contains(&entry.level) {
                result.push(entry.clone());
            }
            continue;
        }
        let wanted = if entry.capped {
            entry.cap <= highest
        } else {
            interested_level_caps.contains(&entry.cap)
        };
        if !wanted {
            continue;
        }
        match last.map(|at| &mut result[at]) {
            Some(previous) if same_standing(previous, entry) => {
                previous.cap = entry.cap;
                previous.capped |= entry.capped;
            }
            _ => {
                result.push(entry.clone());
                last = Some(result.len() - 1);
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(cap: f64, level: f64, rank: u16, capped: bool) -> PokemonEntry {
        PokemonEntry {
            pokemon: 1,
            cap,
            level,
            rank,
            capped,
            ..Default::default()
        }
    }

    #[test]
    fn test_level_exact_entries() {
        let entries = vec![entry(0.0, 40.0, 1, false), entry(0.0, 45.0, 1, false)];
        let filtered = filter_level_caps(&entries, &[40.0, 50.0]);
        assert_eq!(filtered, vec![entry(0.0, 40.0, 1, false)]);
    }

    #[test]
    fn test_uncapped_entries_need_exact_cap() {
        let entries = vec![entry(40.0, 30.0, 5, false), entry(41.0, 31.0, 4, false)];
        let filtered = filter_level_caps(&entries, &[41.0]);
        assert_eq!(filtered, vec![entry(41.0, 31.0, 4, false)]);
    }

    #[test]
    fn test_capped_entry_below_highest_survives() {
        let entries = vec![entry(40.0, 30.0, 5, true)];
        assert_eq!(filter_level_caps(&entries, &[50.0, 51.0]), entries);
        assert!(filter_level_caps(&entries, &[20.0, 30.0]).is_empty());
    }

    #[test]
    fn test_merge_propagates_cap_and_flag() {
        let entries = vec![entry(50.0, 40.0, 7, false), entry(51.0, 40.0, 7, true)];
        let filtered = filter_level_caps(&entries, &[50.0, 51.0]);
        assert_eq!(filtered, vec![entry(51.0, 40.0, 7, true)]);
    }

    #[test]
    fn test_no_merge_across_species() {
        let mut evolved = entry(51.0, 40.0, 7, true);
        evolved.pokemon = 2;
        let entries = vec![entry(50.0, 40.0, 7, false), evolved.clone()];
        let filtered = filter_level_caps(&entries, &[50.0, 51.0]);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[1], evolved);
    }

    #[test]
    fn test_filter_is_idempotent() {
        let entries = vec![
            entry(0.0, 40.0, 1, false),
            entry(40.0, 30.0, 9, false),
            entry(41.0, 30.0, 9, false),
            entry(50.0, 33.0, 4, false),
            entry(51.0, 33.0, 4, true),
            entry(0.0, 51.0, 2, false),
        ];
        let interested = [40.0, 41.0, 51.0];
        let once = filter_level_caps(&entries, &interested);
        let twice = filter_level_caps(&once, &interested);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 4);
    }

    #[test]
    fn test_empty_interest() {
        assert!(filter_level_caps(&[entry(50.0, 40.0, 1, true)], &[]).is_empty());
    }
}
