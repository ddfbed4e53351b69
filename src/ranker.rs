//! Combination ranker.
//!
//! Enumerates every IV combination for one (stats, CP cap, level cap)
//! triple, finds each combination's best level, and ranks combinations by
//! stat product.

use crate::power::{best_stat, MIN_LEVEL};
use crate::stats::{BaseStats, Ivs, IV_COMBINATIONS, MAX_IV};
use serde::{Deserialize, Serialize};

/// One IV combination at its best level under a CP and level cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedCombination {
    /// Combination index, see [`Ivs::index`].
    pub index: usize,
    pub level: f64,
    pub cp: u32,
    /// Stat product at `level`, full precision.
    pub value: f64,
}

impl RankedCombination {
    /// IVs of this combination.
    pub fn ivs(&self) -> Ivs {
        Ivs::from_index(self.index)
    }
}

/// Rank of every IV combination for one (stats, CP cap, level cap).
///
/// `combinations[index]` is the 1-based rank of the combination with that
/// index; ties share a rank. A rank of `0` marks a combination that was
/// not enumerated (below the IV floor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactRankTable {
    pub combinations: Vec<u16>,
    /// Value of the rank 1 combination.
    pub top_value: f64,
}

impl CompactRankTable {
    /// Rank of `ivs`, or `None` if the combination was not enumerated.
    pub fn rank(&self, ivs: Ivs) -> Option<u16> {
        self.combinations
            .get(ivs.index())
            .copied()
            .filter(|rank| *rank != 0)
    }
}

/// Output of [`rank_combinations`].
#[derive(Debug, Clone)]
pub struct RankedCombinations {
    /// Enumerated combinations by descending value. Equal values keep
    /// enumeration order.
    pub sorted: Vec<RankedCombination>,
    pub table: CompactRankTable,
}

impl RankedCombinations {
    /// The best combination, `None` only if nothing was enumerated.
    pub fn top(&self) -> Option<&RankedCombination> {
        self.sorted.first()
    }

    /// Rank of the combination at position `position` of `sorted`.
    pub fn rank_at(&self, position: usize) -> u16 {
        self.table.combinations[self.sorted[position].index]
    }
}

/// Rank every IV combination with all three components in
/// `[iv_floor, 15]`.
///
/// Each combination is taken to the highest half level at or under
/// `level_cap` that keeps it at or under `cp_cap`. The rank of a
/// combination is one more than the number of combinations with a
/// strictly greater value.
///
/// Combinations that exceed `cp_cap` even at level 1 are left out of both
/// the sorted list and the table.
///
/// # Examples
///
/// ```rust
/// use ivrank::ranker::rank_combinations;
/// use ivrank::{BaseStats, Ivs};
///
/// let ranked = rank_combinations(BaseStats::new(118, 111, 128), 1500, 50.0, 0);
/// assert_eq!(ranked.sorted.len(), 4096);
/// assert_eq!(ranked.table.rank(ranked.sorted[0].ivs()), Some(1));
/// ```
pub fn rank_combinations(
    stats: BaseStats,
    cp_cap: u32,
    level_cap: f64,
    iv_floor: u8,
) -> RankedCombinations {
    let iv_floor = iv_floor.min(MAX_IV);
    let span = usize::from(MAX_IV - iv_floor) + 1;
    let mut sorted = Vec::with_capacity(span * span * span);
    for attack in iv_floor..=MAX_IV {
        for defense in iv_floor..=MAX_IV {
            for stamina in iv_floor..=MAX_IV {
                let ivs = Ivs::new(attack, defense, stamina);
                if let Some(stat) = best_stat(stats, ivs, cp_cap, level_cap, MIN_LEVEL) {
                    sorted.push(RankedCombination {
                        index: ivs.index(),
                        level: stat.level,
                        cp: stat.cp,
                        value: stat.value,
                    });
                }
            }
        }
    }
    // `sort_by` is stable, so ties keep enumeration order.
    sorted.sort_by(|a, b| b.value.total_cmp(&a.value));

    let mut combinations = vec![0u16; IV_COMBINATIONS];
    let mut group_start = 0;
    for (position, entry) in sorted.iter().enumerate() {
        if entry.value < sorted[group_start].value {
            group_start = position;
        }
        combinations[entry.index] = (group_start + 1) as u16;
    }
    let top_value = sorted.first().map_or(0.0, |top| top.value);

    RankedCombinations {
        sorted,
        table: CompactRankTable {
            combinations,
            top_value,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::calculate_cp;

    const STATS: BaseStats = BaseStats::new(150, 120, 160);

    #[test]
    fn test_full_enumeration() {
        let ranked = rank_combinations(STATS, 1500, 50.0, 0);
        assert_eq!(ranked.sorted.len(), IV_COMBINATIONS);
        assert!(ranked.table.combinations.iter().all(|rank| *rank >= 1));
        assert_eq!(ranked.table.top_value, ranked.sorted[0].value);
    }

    #[test]
    fn test_sorted_descending_and_capped() {
        let ranked = rank_combinations(STATS, 1500, 50.0, 0);
        for pair in ranked.sorted.windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        for entry in &ranked.sorted {
            assert!(entry.cp <= 1500);
            assert!(entry.level <= 50.0);
            assert_eq!(calculate_cp(STATS, entry.ivs(), entry.level), entry.cp);
        }
    }

    #[test]
    fn test_rank_counts_strictly_greater_values() {
        let ranked = rank_combinations(STATS, 1500, 50.0, 0);
        let values: Vec<f64> = ranked.sorted.iter().map(|e| e.value).collect();
        for entry in ranked.sorted.iter().step_by(97) {
            let greater = values.iter().filter(|v| **v > entry.value).count();
            assert_eq!(
                usize::from(ranked.table.combinations[entry.index]),
                greater + 1
            );
        }
    }

    #[test]
    fn test_ties_share_rank() {
        // Equal attack and defense bases make swapped attack/defense IVs tie.
        let ranked = rank_combinations(BaseStats::new(100, 100, 100), 1500, 50.0, 0);
        let a = ranked.table.rank(Ivs::new(3, 9, 4)).unwrap();
        let b = ranked.table.rank(Ivs::new(9, 3, 4)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_stable_tie_order() {
        let ranked = rank_combinations(BaseStats::new(100, 100, 100), 1500, 50.0, 0);
        for pair in ranked.sorted.windows(2) {
            if pair[0].value == pair[1].value {
                assert!(pair[0].index < pair[1].index);
            }
        }
    }

    #[test]
    fn test_iv_floor_leaves_low_ivs_unranked() {
        let ranked = rank_combinations(STATS, 1500, 50.0, 1);
        assert_eq!(ranked.sorted.len(), 15 * 15 * 15);
        assert_eq!(ranked.table.rank(Ivs::new(0, 5, 5)), None);
        assert!(ranked.table.rank(Ivs::new(1, 5, 5)).is_some());
    }

    #[test]
    fn test_unreachable_cap_produces_empty_table() {
        let ranked = rank_combinations(BaseStats::new(300, 300, 300), 10, 50.0, 0);
        assert!(ranked.sorted.is_empty());
        assert!(ranked.top().is_none());
        assert_eq!(ranked.table.top_value, 0.0);
    }
}
