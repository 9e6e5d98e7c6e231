//! Generator trait.
//!
//! RULE: Every dataset generator implements DatasetGenerator.
//! The engine calls generate() on each generator in dependency order,
//! exactly once per run. A generator may hold references to datasets
//! generated earlier in that order, never later.

use crate::{error::GenResult, rng::DataRng};

/// The contract every generator must fulfill.
pub trait DatasetGenerator {
    type Record;

    /// Unique stable name for this generator, used in logs.
    fn name(&self) -> &'static str;

    /// Produce `count` records, drawing only from `rng`.
    ///
    /// Generators that sample from an upstream dataset may return fewer
    /// records than requested (never more).
    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<Self::Record>>;
}
