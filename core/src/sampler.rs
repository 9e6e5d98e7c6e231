//! Weighted categorical sampling.
//!
//! Tables are validated once at construction so that a degenerate
//! table is reported as a configuration error before any record is drawn.
//! Every `sample` call consumes exactly one `next_f64` from the stream.

use crate::{
    error::{GenError, GenResult},
    rng::DataRng,
};

#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    entries: Vec<(T, u32)>,
    total: u64,
}

impl<T> WeightedTable<T> {
    pub fn new(entries: Vec<(T, u32)>) -> GenResult<Self> {
        if entries.is_empty() {
            return Err(GenError::config("weighted table has no entries"));
        }
        let total: u64 = entries.iter().map(|(_, w)| u64::from(*w)).sum();
        if total == 0 {
            return Err(GenError::config("weighted table has only zero weights"));
        }
        Ok(Self { entries, total })
    }

    pub fn sample(&self, rng: &mut DataRng) -> &T {
        let roll = rng.next_f64() * self.total as f64;
        let mut cumulative = 0.0;
        for (value, weight) in &self.entries {
            if *weight == 0 {
                continue;
            }
            cumulative += f64::from(*weight);
            if roll < cumulative {
                return value;
            }
        }
        // Float rounding at the upper edge: fall back to the last
        // entry that can actually be drawn.
        self.entries
            .iter()
            .rev()
            .find(|(_, w)| *w > 0)
            .map(|(v, _)| v)
            .unwrap_or(&self.entries[0].0)
    }
}

impl<T: Copy> WeightedTable<T> {
    pub fn from_pairs(pairs: &[(T, u32)]) -> GenResult<Self> {
        Self::new(pairs.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_zero_weights_is_a_config_error() {
        let err = WeightedTable::from_pairs(&[("A", 0), ("B", 0)]).unwrap_err();
        assert!(matches!(err, GenError::Config { .. }));
    }

    #[test]
    fn empty_table_is_a_config_error() {
        let err = WeightedTable::<&str>::new(Vec::new()).unwrap_err();
        assert!(matches!(err, GenError::Config { .. }));
    }

    #[test]
    fn zero_weight_entries_are_never_drawn() {
        let table = WeightedTable::from_pairs(&[("never", 0), ("always", 5)]).unwrap();
        let mut rng = DataRng::new(3, 0);
        for _ in 0..1000 {
            assert_eq!(*table.sample(&mut rng), "always");
        }
    }

    #[test]
    fn one_draw_per_sample() {
        let table = WeightedTable::from_pairs(&[("A", 1), ("B", 1)]).unwrap();
        let mut sampled = DataRng::new(9, 0);
        let mut reference = DataRng::new(9, 0);
        for _ in 0..10 {
            table.sample(&mut sampled);
            reference.next_f64();
        }
        assert_eq!(sampled.next_u64(), reference.next_u64());
    }

    #[test]
    fn frequencies_follow_weights() {
        let table = WeightedTable::from_pairs(&[("A", 70), ("B", 20), ("C", 10)]).unwrap();
        let mut rng = DataRng::new(42, 0);
        let draws = 100_000;
        let mut counts = [0usize; 3];
        for _ in 0..draws {
            match *table.sample(&mut rng) {
                "A" => counts[0] += 1,
                "B" => counts[1] += 1,
                _ => counts[2] += 1,
            }
        }
        let expected = [0.70, 0.20, 0.10];
        for (count, want) in counts.iter().zip(expected) {
            let observed = *count as f64 / draws as f64;
            assert!(
                (observed - want).abs() < 0.02,
                "observed {observed:.4}, expected {want:.2}"
            );
        }
    }
}
