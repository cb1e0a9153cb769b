//! Seeded random-pick source
//!
//! SPOP, SRANDMEMBER, HRANDFIELD and ZRANDMEMBER draw their picks from
//! this stream. It lives inside the executor's transactional context, so
//! picks are consumed in the same serialized order as the commands that
//! made them and a fixed seed reproduces the same selections.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seed used when the caller does not supply one
pub const DEFAULT_SEED: u64 = 0x6d69_6d69_6364_6221;

/// Deterministic stream of picks in `[0, n)`
pub struct RandomPicker {
    rng: StdRng,
}

impl RandomPicker {
    /// Create a picker seeded with `seed`
    pub fn new(seed: u64) -> Self {
        RandomPicker {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Draw one index in `[0, n)`. `n` must be non-zero.
    pub fn pick(&mut self, n: usize) -> usize {
        self.rng.gen_range(0..n)
    }

    /// Pick one item, or None if the slice is empty
    pub fn select_one<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        Some(&items[self.pick(items.len())])
    }

    /// Pick up to `n` distinct items (sample without replacement)
    pub fn select_n<'a, T>(&mut self, items: &'a [T], n: usize) -> Vec<&'a T> {
        let take = n.min(items.len());
        // Partial Fisher-Yates over an index vector
        let mut indices: Vec<usize> = (0..items.len()).collect();
        for i in 0..take {
            let j = i + self.pick(indices.len() - i);
            indices.swap(i, j);
        }
        indices[..take].iter().map(|&i| &items[i]).collect()
    }

    /// Pick exactly `n` items, duplicates allowed (sample with replacement)
    pub fn select_n_with_replacement<'a, T>(&mut self, items: &'a [T], n: usize) -> Vec<&'a T> {
        if items.is_empty() {
            return Vec::new();
        }
        (0..n).map(|_| &items[self.pick(items.len())]).collect()
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pick_in_range() {
        let mut picker = RandomPicker::new(7);
        for _ in 0..100 {
            assert!(picker.pick(5) < 5);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = RandomPicker::new(42);
        let mut b = RandomPicker::new(42);

        let items = ["a", "b", "c", "d", "e"];
        for _ in 0..20 {
            assert_eq!(a.select_one(&items), b.select_one(&items));
        }
    }

    #[test]
    fn test_select_one_empty() {
        let mut picker = RandomPicker::default();
        let items: [&str; 0] = [];
        assert_eq!(picker.select_one(&items), None);
    }

    #[test]
    fn test_select_n_distinct() {
        let mut picker = RandomPicker::new(1);
        let items = ["a", "b", "c", "d", "e"];

        let chosen = picker.select_n(&items, 3);
        assert_eq!(chosen.len(), 3);
        let mut deduped = chosen.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 3);

        // Asking for more than available caps at the slice length
        assert_eq!(picker.select_n(&items, 10).len(), 5);
    }

    #[test]
    fn test_select_with_replacement_exact_count() {
        let mut picker = RandomPicker::new(1);
        let items = ["a", "b"];
        assert_eq!(picker.select_n_with_replacement(&items, 7).len(), 7);
    }
}
