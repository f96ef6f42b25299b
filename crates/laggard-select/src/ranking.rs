//! Ordering of the surviving pool.

use laggard_traits::{Month, Symbol};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// How survivors are ordered before truncation to the cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Ranking {
    /// Smallest key first (laggards)
    #[default]
    Ascending,
    /// Largest key first (leaders)
    Descending,
    /// A seeded random draw of `cap` survivors, then ascending by key.
    ///
    /// The draw depends only on the seed and the month.
    Sample {
        /// Base seed
        seed: u64,
    },
}

impl Ranking {
    /// Order `(symbol, key)` pairs and keep at most `cap`.
    ///
    /// Ties on the key are broken by symbol, ascending.
    #[must_use]
    pub fn rank(&self, month: Month, mut pool: Vec<(Symbol, f64)>, cap: usize) -> Vec<Symbol> {
        match self {
            Self::Ascending => sort_ascending(&mut pool),
            Self::Descending => {
                pool.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            }
            Self::Sample { seed } => {
                sort_ascending(&mut pool);
                if pool.len() > cap {
                    let mut rng = StdRng::seed_from_u64(month_seed(*seed, month));
                    pool = pool.choose_multiple(&mut rng, cap).cloned().collect();
                    sort_ascending(&mut pool);
                }
            }
        }
        pool.into_iter().take(cap).map(|(s, _)| s).collect()
    }
}

fn sort_ascending(pool: &mut [(Symbol, f64)]) {
    pool.sort_by(|a, b| a.1.total_cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
}

fn month_seed(seed: u64, month: Month) -> u64 {
    let index = i64::from(month.year()) * 12 + i64::from(month.month());
    seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ index as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<(Symbol, f64)> {
        vec![
            ("C".to_string(), 5.0),
            ("A".to_string(), -1.0),
            ("B".to_string(), 5.0),
            ("D".to_string(), -7.5),
        ]
    }

    fn month() -> Month {
        Month::new(2021, 6).unwrap()
    }

    #[test]
    fn test_ascending_with_ties() {
        let ranked = Ranking::Ascending.rank(month(), pool(), 10);
        assert_eq!(ranked, vec!["D", "A", "B", "C"]);
    }

    #[test]
    fn test_descending_with_ties() {
        let ranked = Ranking::Descending.rank(month(), pool(), 3);
        assert_eq!(ranked, vec!["B", "C", "A"]);
    }

    #[test]
    fn test_cap_truncates() {
        assert_eq!(Ranking::Ascending.rank(month(), pool(), 2), vec!["D", "A"]);
        assert!(Ranking::Ascending.rank(month(), pool(), 0).is_empty());
        assert!(Ranking::Ascending.rank(month(), Vec::new(), 10).is_empty());
    }

    #[test]
    fn test_sample_is_seeded() {
        let ranking = Ranking::Sample { seed: 42 };
        let a = ranking.rank(month(), pool(), 2);
        let b = ranking.rank(month(), pool(), 2);
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_sample_small_pool_keeps_all() {
        let ranked = Ranking::Sample { seed: 1 }.rank(month(), pool(), 10);
        assert_eq!(ranked, vec!["D", "A", "B", "C"]);
    }
}
