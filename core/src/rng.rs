//! Deterministic random number generation.
//!
//! RULE: Nothing in the generator may call any platform RNG.
//! All randomness flows through DataRng instances derived
//! from the single master seed in the run configuration.
//!
//! Each dataset family gets its own RNG stream, seeded deterministically
//! from (master_seed XOR stream_index). This means:
//!   - Adding a new stream never changes existing streams' output.
//!   - Each stream is fully reproducible in isolation.
//!
//! Within a stream, output depends on the exact order and count of
//! draws. Reordering two draws changes every record after them.

use rand::SeedableRng;
use rand_pcg::Pcg64Mcg;
use uuid::{Builder, Uuid};

/// A named, deterministic RNG for a single dataset family.
pub struct DataRng {
    pub name: &'static str,
    inner: Pcg64Mcg,
}

impl DataRng {
    /// Create a stream RNG from the master seed and a stable
    /// stream index. The index must never change once assigned.
    pub fn new(master_seed: u64, stream_index: u64) -> Self {
        let derived_seed = master_seed ^ (stream_index.wrapping_mul(0x9e37_79b9_7f4a_7c15));
        Self {
            name: "unnamed",
            inner: Pcg64Mcg::seed_from_u64(derived_seed),
        }
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    /// Roll a float in [0.0, 1.0).
    pub fn next_f64(&mut self) -> f64 {
        use rand::RngCore;
        let bits = self.inner.next_u64();
        (bits >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Draw a raw u64 (full range).
    pub fn next_u64(&mut self) -> u64 {
        use rand::RngCore;
        self.inner.next_u64()
    }

    /// Roll a u64 in [0, n).
    pub fn next_u64_below(&mut self, n: u64) -> u64 {
        use rand::RngCore;
        assert!(n > 0, "n must be > 0");
        self.inner.next_u64() % n
    }

    /// Roll an integer in [lo, hi], both ends inclusive.
    pub fn range_inclusive(&mut self, lo: i64, hi: i64) -> i64 {
        assert!(lo <= hi, "empty range {lo}..={hi}");
        let span = (hi - lo) as u64 + 1;
        lo + self.next_u64_below(span) as i64
    }

    /// Roll a float in [lo, hi).
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Bernoulli trial: returns true with probability p.
    pub fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }

    /// Uniform pick from a non-empty slice.
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let idx = self.next_u64_below(items.len() as u64) as usize;
        &items[idx]
    }

    /// Draw `k` distinct indices from `0..n` without replacement.
    /// Partial Fisher-Yates: exactly `k` draws, order is the draw order.
    pub fn sample_indices(&mut self, n: usize, k: usize) -> Vec<usize> {
        let k = k.min(n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..k {
            let j = i + self.next_u64_below((n - i) as u64) as usize;
            pool.swap(i, j);
        }
        pool.truncate(k);
        pool
    }

    /// A random (version 4) UUID built from two draws.
    pub fn uuid(&mut self) -> Uuid {
        let mut bytes = [0u8; 16];
        bytes[..8].copy_from_slice(&self.next_u64().to_be_bytes());
        bytes[8..].copy_from_slice(&self.next_u64().to_be_bytes());
        Builder::from_random_bytes(bytes).into_uuid()
    }

    /// Canonical hyphenated form of [`DataRng::uuid`].
    pub fn uuid_string(&mut self) -> String {
        self.uuid().hyphenated().to_string()
    }
}

/// All stream RNGs for a single run, indexed by stable slot.
pub struct RngBank {
    master_seed: u64,
}

impl RngBank {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn for_stream(&self, slot: StreamSlot) -> DataRng {
        DataRng::new(self.master_seed, slot as u64).with_name(slot.name())
    }
}

/// Stable stream slot assignments.
/// NEVER reorder or remove entries. Only append.
/// Reordering changes every stream's seed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u64)]
pub enum StreamSlot {
    Fintech = 0,
    Observability = 1,
}

impl StreamSlot {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fintech => "fintech",
            Self::Observability => "observability",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_stream() {
        let bank = RngBank::new(42);
        let mut a = bank.for_stream(StreamSlot::Fintech);
        let mut b = bank.for_stream(StreamSlot::Fintech);
        for _ in 0..100 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
    }

    #[test]
    fn streams_are_independent() {
        let bank = RngBank::new(42);
        let mut a = bank.for_stream(StreamSlot::Fintech);
        let mut b = bank.for_stream(StreamSlot::Observability);
        let xs: Vec<u64> = (0..8).map(|_| a.next_u64()).collect();
        let ys: Vec<u64> = (0..8).map(|_| b.next_u64()).collect();
        assert_ne!(xs, ys);
    }

    #[test]
    fn range_inclusive_hits_both_ends() {
        let mut rng = DataRng::new(7, 0);
        let mut seen = [false; 3];
        for _ in 0..1000 {
            let v = rng.range_inclusive(1, 3);
            assert!((1..=3).contains(&v));
            seen[(v - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn sample_indices_has_no_repeats() {
        let mut rng = DataRng::new(7, 0);
        let mut picked = rng.sample_indices(50, 20);
        assert_eq!(picked.len(), 20);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 20);
        assert!(picked.iter().all(|i| *i < 50));

        // k larger than n is clamped.
        assert_eq!(rng.sample_indices(3, 10).len(), 3);
    }

    #[test]
    fn uuid_is_canonical_v4() {
        let mut rng = DataRng::new(1, 0);
        let id = rng.uuid_string();
        assert_eq!(id.len(), 36);
        assert_eq!(id.as_bytes()[14], b'4');
        assert!(Uuid::parse_str(&id).is_ok());
    }
}
