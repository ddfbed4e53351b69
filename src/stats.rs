//! Base stat and IV types.
//!
//! [`BaseStats`] is the effective stat profile of a creature at one
//! evolutionary stage; [`Ivs`] is one individual value combination.

use crate::error::QueryError;
use serde::{Deserialize, Serialize};

/// Number of distinct IV combinations (16³).
pub const IV_COMBINATIONS: usize = 4096;

/// Highest value a single IV can take.
pub const MAX_IV: u8 = 15;

/// Base Attack, Defense and Stamina of a species, form or temporary
/// evolution.
///
/// A zero `attack` marks an absent record in master data; see
/// [`BaseStats::is_empty`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BaseStats {
    #[serde(default)]
    pub attack: u16,
    #[serde(default)]
    pub defense: u16,
    #[serde(default)]
    pub stamina: u16,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub unreleased: bool,
}

impl BaseStats {
    /// Create a released stat triple.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ivrank::BaseStats;
    ///
    /// let bulbasaur = BaseStats::new(118, 111, 128);
    /// assert!(!bulbasaur.is_empty());
    /// ```
    pub const fn new(attack: u16, defense: u16, stamina: u16) -> Self {
        Self {
            attack,
            defense,
            stamina,
            unreleased: false,
        }
    }

    /// Whether this record carries no stats (attack of zero).
    pub fn is_empty(&self) -> bool {
        self.attack == 0
    }
}

/// One individual value combination, each component in `[0, 15]`.
///
/// The combination index `attack * 256 + defense * 16 + stamina` is a
/// bijection onto `[0, 4096)`.
///
/// # Examples
///
/// ```rust
/// use ivrank::Ivs;
///
/// let ivs = Ivs::new(10, 5, 0);
/// assert_eq!(ivs.index(), 10 * 256 + 5 * 16);
/// assert_eq!(Ivs::from_index(ivs.index()), ivs);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ivs {
    pub attack: u8,
    pub defense: u8,
    pub stamina: u8,
}

impl Ivs {
    /// Perfect IVs.
    pub const PERFECT: Ivs = Ivs::new(MAX_IV, MAX_IV, MAX_IV);

    /// Create a combination without range checks.
    ///
    /// Components above 15 produce an out-of-range [`index`](Self::index);
    /// use [`Ivs::checked`] for untrusted input.
    pub const fn new(attack: u8, defense: u8, stamina: u8) -> Self {
        Self {
            attack,
            defense,
            stamina,
        }
    }

    /// All three IVs set to `value`.
    pub const fn uniform(value: u8) -> Self {
        Self::new(value, value, value)
    }

    /// Create a combination from caller-supplied values, rejecting
    /// anything above 15.
    pub fn checked(attack: u8, defense: u8, stamina: u8) -> Result<Self, QueryError> {
        for (name, value) in [("attack", attack), ("defense", defense), ("stamina", stamina)] {
            if value > MAX_IV {
                return Err(QueryError::InvalidArgument(format!(
                    "{name} IV {value} is outside [0, 15]"
                )));
            }
        }
        Ok(Self::new(attack, defense, stamina))
    }

    /// Combination index in `[0, 4096)`.
    pub const fn index(self) -> usize {
        (self.attack as usize) << 8 | (self.defense as usize) << 4 | self.stamina as usize
    }

    /// Inverse of [`Ivs::index`]. Only the low 12 bits are read.
    pub const fn from_index(index: usize) -> Self {
        Self::new(
            ((index >> 8) & 0xF) as u8,
            ((index >> 4) & 0xF) as u8,
            (index & 0xF) as u8,
        )
    }

    /// Whether `dominant` is at least as high as both other IVs.
    pub fn dominated_by(self, dominant: DominantStat) -> bool {
        let (top, a, b) = match dominant {
            DominantStat::Attack => (self.attack, self.defense, self.stamina),
            DominantStat::Defense => (self.defense, self.attack, self.stamina),
            DominantStat::Stamina => (self.stamina, self.attack, self.defense),
        };
        top >= a && top >= b
    }
}

/// The IV that must be highest (ties allowed) for a dominance-gated
/// evolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DominantStat {
    Attack,
    Defense,
    Stamina,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_is_bijective() {
        let mut seen = vec![false; IV_COMBINATIONS];
        for a in 0..=MAX_IV {
            for d in 0..=MAX_IV {
                for s in 0..=MAX_IV {
                    let ivs = Ivs::new(a, d, s);
                    let index = ivs.index();
                    assert!(!seen[index]);
                    seen[index] = true;
                    assert_eq!(Ivs::from_index(index), ivs);
                }
            }
        }
        assert!(seen.into_iter().all(|s| s));
    }

    #[test]
    fn test_checked_rejects_out_of_range() {
        assert!(Ivs::checked(15, 15, 15).is_ok());
        assert!(matches!(
            Ivs::checked(16, 0, 0),
            Err(QueryError::InvalidArgument(_))
        ));
        assert!(Ivs::checked(0, 0, 255).is_err());
        assert!(Ivs::checked(0, 0, 0).is_ok());
    }

    #[test]
    fn test_dominance() {
        assert!(Ivs::new(15, 10, 10).dominated_by(DominantStat::Attack));
        assert!(Ivs::new(10, 10, 10).dominated_by(DominantStat::Defense));
        assert!(!Ivs::new(9, 10, 8).dominated_by(DominantStat::Attack));
        assert!(!Ivs::new(15, 14, 15).dominated_by(DominantStat::Defense));
        assert!(Ivs::new(0, 0, 1).dominated_by(DominantStat::Stamina));
    }

    #[test]
    fn test_empty_stats() {
        assert!(BaseStats::default().is_empty());
        assert!(!BaseStats::new(1, 1, 1).is_empty());
    }
}
