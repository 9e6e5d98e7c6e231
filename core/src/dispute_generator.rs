//! Card disputes raised against previously generated transactions.
//!
//! Source transactions are sampled without replacement, so no transaction
//! is ever disputed twice. Each dispute opens 1-10 days after its
//! transaction and claims 20-100% of the transaction amount, never less
//! than MIN_DISPUTE_MINOR.

use crate::{
    clock::{self, forward_offset},
    doc::{Doc, IntoDoc},
    error::GenResult,
    generator::DatasetGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    transaction_generator::TransactionRecord,
    types::{CurrencyCode, EntityId, MinorUnits},
};
use chrono::{DateTime, Utc};

pub const MIN_DISPUTE_MINOR: i64 = 100;
pub const OPEN_DELAY_DAYS: (i64, i64) = (1, 10);
pub const CLAIM_FRACTION: (f64, f64) = (0.2, 1.0);

pub const REASON_WEIGHTS: &[(&str, u32)] = &[
    ("FRAUD", 40),
    ("NOT_RECEIVED", 25),
    ("DUPLICATE", 15),
    ("OTHER", 20),
];
pub const DISPUTE_STATUS_WEIGHTS: &[(&str, u32)] =
    &[("OPEN", 55), ("WON", 15), ("LOST", 15), ("CLOSED", 15)];

#[derive(Debug, Clone)]
pub struct DisputeRecord {
    pub dispute_id: EntityId,
    pub correlation_id: EntityId,
    pub transaction_id: EntityId,
    pub opened_at: DateTime<Utc>,
    pub reason_code: &'static str,
    pub status: &'static str,
    pub amount: MinorUnits,
    pub currency: CurrencyCode,
}

impl IntoDoc for DisputeRecord {
    fn to_doc(&self) -> Doc {
        Doc::map([
            ("dispute_id", Doc::from(&self.dispute_id)),
            ("correlation_id", Doc::from(&self.correlation_id)),
            ("transaction_id", Doc::from(&self.transaction_id)),
            ("opened_at", Doc::from(clock::iso_utc(&self.opened_at))),
            ("reason_code", Doc::from(self.reason_code)),
            ("status", Doc::from(self.status)),
            ("amount", Doc::from(self.amount)),
            ("currency", Doc::from(&self.currency)),
        ])
    }
}

/// Portion of `amount` claimed for a given fraction, floored at
/// MIN_DISPUTE_MINOR but never above the original amount.
pub fn claimed_amount(amount: MinorUnits, fraction: f64) -> MinorUnits {
    let claimed = (amount as f64 * fraction).floor() as i64;
    claimed.max(MIN_DISPUTE_MINOR).min(amount)
}

pub struct DisputeGenerator<'a> {
    transactions: &'a [TransactionRecord],
    reason: WeightedTable<&'static str>,
    status: WeightedTable<&'static str>,
}

impl<'a> DisputeGenerator<'a> {
    pub fn new(transactions: &'a [TransactionRecord]) -> GenResult<Self> {
        Ok(Self {
            transactions,
            reason: WeightedTable::from_pairs(REASON_WEIGHTS)?,
            status: WeightedTable::from_pairs(DISPUTE_STATUS_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for DisputeGenerator<'_> {
    type Record = DisputeRecord;

    fn name(&self) -> &'static str {
        "dispute"
    }

    /// Returns `min(count, transactions.len())` disputes.
    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<DisputeRecord>> {
        let picked = rng.sample_indices(self.transactions.len(), count);
        let mut disputes = Vec::with_capacity(picked.len());

        for idx in picked {
            let txn = &self.transactions[idx];
            let dispute_id = rng.uuid_string();
            let opened_at = forward_offset(rng, txn.event_time, OPEN_DELAY_DAYS.0, OPEN_DELAY_DAYS.1);
            let reason_code = *self.reason.sample(rng);
            let status = *self.status.sample(rng);
            let fraction = rng.uniform(CLAIM_FRACTION.0, CLAIM_FRACTION.1);

            disputes.push(DisputeRecord {
                dispute_id,
                correlation_id: txn.correlation_id.clone(),
                transaction_id: txn.transaction_id.clone(),
                opened_at,
                reason_code,
                status,
                amount: claimed_amount(txn.amount, fraction),
                currency: txn.currency.clone(),
            });
        }
        log::debug!(
            "dispute: generated {} records from {} transactions",
            disputes.len(),
            self.transactions.len()
        );
        Ok(disputes)
    }
}
