//! Initials enumeration and sampling.
//!
//! [`all_initials`] lists the 676 two-letter uppercase keys used for bulk
//! generation and cache preloading. [`RandomInitials`] draws keys from a
//! seeded RNG for sampling and fuzz-style tests; it sits behind the
//! [`InitialsSource`] trait so callers can swap in their own sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The 26 letters every generated key is drawn from.
pub const ALPHABET: [char; 26] = [
    'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S',
    'T', 'U', 'V', 'W', 'X', 'Y', 'Z',
];

/// Every two-letter uppercase combination, `AA`, `AB`, … `ZZ`.
pub fn all_initials() -> Vec<String> {
    ALPHABET
        .iter()
        .flat_map(|&first| ALPHABET.iter().map(move |&second| format!("{first}{second}")))
        .collect()
}

/// A stream of initials.
pub trait InitialsSource {
    fn next_initials(&mut self) -> String;
}

/// Uniformly random two-letter uppercase initials.
pub struct RandomInitials<R = StdRng> {
    rng: R,
}

impl RandomInitials<StdRng> {
    /// Reproducible sequence: equal seeds yield equal keys.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomInitials<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> InitialsSource for RandomInitials<R> {
    fn next_initials(&mut self) -> String {
        (0..2)
            .map(|_| ALPHABET[self.rng.gen_range(0..ALPHABET.len())])
            .collect()
    }
}

/// Draw `count` keys from `source`.
pub fn take_initials(source: &mut impl InitialsSource, count: usize) -> Vec<String> {
    (0..count).map(|_| source.next_initials()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_initials_has_676_unique_keys() {
        let keys = all_initials();
        assert_eq!(keys.len(), 676);
        let unique: HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), 676);
    }

    #[test]
    fn all_initials_is_ordered() {
        let keys = all_initials();
        assert_eq!(keys.first().map(String::as_str), Some("AA"));
        assert_eq!(keys[1], "AB");
        assert_eq!(keys[26], "BA");
        assert_eq!(keys.last().map(String::as_str), Some("ZZ"));
        assert!(keys.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn random_initials_are_two_uppercase_letters() {
        let mut source = RandomInitials::seeded(7);
        for key in take_initials(&mut source, 500) {
            assert_eq!(key.chars().count(), 2);
            assert!(key.chars().all(|c| c.is_ascii_uppercase()), "{key}");
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = take_initials(&mut RandomInitials::seeded(42), 50);
        let b = take_initials(&mut RandomInitials::seeded(42), 50);
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = take_initials(&mut RandomInitials::seeded(1), 50);
        let b = take_initials(&mut RandomInitials::seeded(2), 50);
        assert_ne!(a, b);
    }

    #[test]
    fn custom_source_is_swappable() {
        struct Fixed;
        impl InitialsSource for Fixed {
            fn next_initials(&mut self) -> String {
                "JD".to_string()
            }
        }
        assert_eq!(take_initials(&mut Fixed, 3), vec!["JD", "JD", "JD"]);
    }
}
