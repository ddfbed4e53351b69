//! Combat power formula.
//!
//! Pure functions mapping base stats, IVs and a half level to combat
//! power (CP) and to the stat product used as the ranking value.

use crate::stats::{BaseStats, Ivs};

/// Highest level the formula is defined for. Also the level used for the
/// uncapped ranking table.
pub const MAX_LEVEL: f64 = 100.0;

/// Lowest level a creature can have.
pub const MIN_LEVEL: f64 = 1.0;

/// Highest level covered by [`CP_MULTIPLIERS`].
const TABLE_MAX_LEVEL: f64 = 55.0;

/// CP multipliers for levels 1.0, 1.5, ..., 55.0.
const CP_MULTIPLIERS: [f64; 109] = [
    0.094, 0.1351374318, 0.16639787, 0.192650919, 0.21573247, 0.2365726613, 0.25572005,
    0.2735303812, 0.29024988, 0.3060573775, 0.3210876, 0.3354450362, 0.34921268, 0.3624577511,
    0.3752356, 0.3875924054, 0.39956728, 0.4111935514, 0.4225, 0.4329264091, 0.44310755,
    0.4530599591, 0.4627984, 0.472336093, 0.48168495, 0.4908558003, 0.49985844, 0.508701765,
    0.51739395, 0.5259425113, 0.5343543, 0.5426357375, 0.5507927, 0.5588305862, 0.5667545,
    0.5745691333, 0.5822789, 0.5898879072, 0.5974, 0.6048236651, 0.6121573, 0.6194041216,
    0.6265671, 0.6336491432, 0.64065295, 0.6475809666, 0.65443563, 0.6612192524, 0.667934,
    0.6745818959, 0.6811649, 0.6876849038, 0.69414365, 0.70054287, 0.7068842, 0.7131691091,
    0.7193991, 0.7255756136, 0.7317, 0.7347410093, 0.7377695, 0.7407855938, 0.74378943,
    0.7467812109, 0.74976104, 0.7527290867, 0.7556855, 0.7586303683, 0.76156384, 0.7644860647,
    0.76739717, 0.7702972656, 0.7731865, 0.7760649616, 0.77893275, 0.7817900548, 0.784637,
    0.7874736075, 0.7903, 0.792803968, 0.79530001, 0.797800015, 0.8003, 0.802799995, 0.8053,
    0.8078, 0.81029999, 0.812799985, 0.81529999, 0.81779999, 0.82029999, 0.82279999,
    0.82529999, 0.82779999, 0.83029999, 0.83279999, 0.83529999, 0.83779999, 0.84029999,
    0.84279999, 0.84529999, 0.84779999, 0.85029999, 0.85279999, 0.85529999, 0.85779999,
    0.86029999, 0.86279999, 0.86529999,
];

/// Multiplier for an integer level above the table.
fn extended_multiplier(level: f64) -> f64 {
    0.5903 + level * 0.005
}

/// CP multiplier for a half level in `[1, 100]`.
///
/// Levels are snapped to the nearest half level; levels below 1 are
/// treated as level 1.
///
/// # Examples
///
/// ```rust
/// use ivrank::power::cp_multiplier;
///
/// assert_eq!(cp_multiplier(1.0), 0.094);
/// assert_eq!(cp_multiplier(40.0), 0.7903);
/// ```
pub fn cp_multiplier(level: f64) -> f64 {
    let level = (level.max(MIN_LEVEL) * 2.0).round() / 2.0;
    if level <= TABLE_MAX_LEVEL {
        return CP_MULTIPLIERS[((level - MIN_LEVEL) * 2.0) as usize];
    }
    let base_level = level.floor();
    let base = extended_multiplier(base_level);
    if base_level == level {
        return base;
    }
    let next = extended_multiplier(base_level + 1.0);
    ((base * base + next * next) / 2.0).sqrt()
}

/// Combat power of `ivs` at `level`, never below 10.
pub fn calculate_cp(stats: BaseStats, ivs: Ivs, level: f64) -> u32 {
    let multiplier = cp_multiplier(level);
    let attack = f64::from(stats.attack) + f64::from(ivs.attack);
    let defense = f64::from(stats.defense) + f64::from(ivs.defense);
    let stamina = f64::from(stats.stamina) + f64::from(ivs.stamina);
    let cp = (multiplier * multiplier * attack * (defense * stamina).sqrt() / 10.0).floor();
    (cp as u32).max(10)
}

/// Stat product of `ivs` at `level`: effective attack × effective defense
/// × hit points (hit points floored, never below 10).
pub fn stat_product(stats: BaseStats, ivs: Ivs, level: f64) -> f64 {
    let multiplier = cp_multiplier(level);
    let hp = ((f64::from(stats.stamina) + f64::from(ivs.stamina)) * multiplier)
        .floor()
        .max(10.0);
    (f64::from(stats.attack) + f64::from(ivs.attack))
        * multiplier
        * (f64::from(stats.defense) + f64::from(ivs.defense))
        * multiplier
        * hp
}

/// Best reachable state of one IV combination under a CP and level cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvpStat {
    /// Stat product at `level`, full precision.
    pub value: f64,
    pub level: f64,
    pub cp: u32,
}

/// Find the highest half level in `[min_level, level_cap]` at which `ivs`
/// stays at or under `cp_cap`.
///
/// Returns `None` when `min_level` is above `level_cap`, or when the
/// creature already exceeds `cp_cap` at `min_level`.
///
/// # Examples
///
/// ```rust
/// use ivrank::power::{best_stat, calculate_cp};
/// use ivrank::{BaseStats, Ivs};
///
/// let stats = BaseStats::new(118, 111, 128);
/// let best = best_stat(stats, Ivs::new(0, 15, 15), 1500, 50.0, 1.0).unwrap();
/// assert!(best.cp <= 1500);
/// assert!(calculate_cp(stats, Ivs::new(0, 15, 15), best.level + 0.5) > 1500 || best.level == 50.0);
/// ```
pub fn best_stat(
    stats: BaseStats,
    ivs: Ivs,
    cp_cap: u32,
    level_cap: f64,
    min_level: f64,
) -> Option<PvpStat> {
    if min_level > level_cap {
        return None;
    }
    let mut best_cp = calculate_cp(stats, ivs, min_level);
    if best_cp > cp_cap {
        return None;
    }
    let mut lowest = min_level;
    let mut highest = level_cap;
    while lowest < highest {
        // Upper half-level midpoint, so `lowest` always advances.
        let mid = (lowest + highest).ceil() / 2.0;
        let cp = calculate_cp(stats, ivs, mid);
        if cp <= cp_cap {
            lowest = mid;
            best_cp = cp;
        } else {
            highest = mid - 0.5;
        }
    }
    Some(PvpStat {
        value: stat_product(stats, ivs, lowest),
        level: lowest,
        cp: best_cp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BULBASAUR: BaseStats = BaseStats::new(118, 111, 128);

    #[test]
    fn test_multiplier_table_edges() {
        assert_eq!(cp_multiplier(1.0), 0.094);
        assert_eq!(cp_multiplier(1.5), 0.1351374318);
        assert_eq!(cp_multiplier(50.0), 0.84029999);
        assert_eq!(cp_multiplier(55.0), 0.86529999);
    }

    #[test]
    fn test_multiplier_extends_past_table() {
        assert!((cp_multiplier(56.0) - 0.8703).abs() < 1e-9);
        assert!((cp_multiplier(100.0) - 1.0903).abs() < 1e-9);
        let half = cp_multiplier(55.5);
        assert!(half > cp_multiplier(55.0) && half < cp_multiplier(56.0));
    }

    #[test]
    fn test_multiplier_is_increasing() {
        let mut level = 1.0;
        let mut previous = 0.0;
        while level <= MAX_LEVEL {
            let current = cp_multiplier(level);
            assert!(current > previous, "not increasing at {level}");
            previous = current;
            level += 0.5;
        }
    }

    #[test]
    fn test_cp_floor_is_ten() {
        assert_eq!(calculate_cp(BaseStats::new(1, 1, 1), Ivs::default(), 1.0), 10);
    }

    #[test]
    fn test_known_cp_values() {
        assert_eq!(calculate_cp(BULBASAUR, Ivs::PERFECT, 40.0), 1115);
        assert_eq!(calculate_cp(BULBASAUR, Ivs::PERFECT, 50.0), 1260);
    }

    #[test]
    fn test_best_stat_respects_both_caps() {
        let stats = BaseStats::new(150, 120, 160);
        let best = best_stat(stats, Ivs::new(10, 5, 0), 1500, 50.0, 1.0).unwrap();
        assert!(best.cp <= 1500);
        assert!(best.level <= 50.0);
        assert!(calculate_cp(stats, Ivs::new(10, 5, 0), best.level + 0.5) > 1500);
        assert_eq!(best.value, stat_product(stats, Ivs::new(10, 5, 0), best.level));
    }

    #[test]
    fn test_best_stat_stops_at_level_cap() {
        let best = best_stat(BULBASAUR, Ivs::PERFECT, 1500, 40.0, 1.0).unwrap();
        assert_eq!(best.level, 40.0);
        assert_eq!(best.cp, 1115);
    }

    #[test]
    fn test_best_stat_rejects_unreachable_minimum() {
        assert!(best_stat(BULBASAUR, Ivs::PERFECT, 500, 50.0, 40.0).is_none());
        assert!(best_stat(BULBASAUR, Ivs::PERFECT, 1500, 30.0, 31.0).is_none());
    }

    #[test]
    fn test_best_stat_at_minimum_level() {
        let best = best_stat(BULBASAUR, Ivs::PERFECT, 1500, 20.0, 20.0).unwrap();
        assert_eq!(best.level, 20.0);
        assert_eq!(best.cp, calculate_cp(BULBASAUR, Ivs::PERFECT, 20.0));
    }
}
