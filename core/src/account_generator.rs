use crate::{
    catalog::CURRENCIES,
    clock::{self, GenClock},
    customer_generator::CustomerRecord,
    error::{GenError, GenResult},
    generator::DatasetGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    types::{CurrencyCode, EntityId},
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const ACCOUNT_LOOKBACK_DAYS: i64 = 365;

pub const ACCOUNT_TYPE_WEIGHTS: &[(&str, u32)] = &[("WALLET", 60), ("CHECKING", 30), ("CREDIT", 10)];
pub const ACCOUNT_STATUS_WEIGHTS: &[(&str, u32)] =
    &[("ACTIVE", 92), ("SUSPENDED", 6), ("CLOSED", 2)];

pub const ACCOUNT_COLUMNS: &[&str] = &[
    "account_id",
    "customer_id",
    "account_type",
    "status",
    "base_currency",
    "opened_at",
];

#[derive(Debug, Clone, Serialize)]
pub struct AccountRecord {
    pub account_id: EntityId,
    pub customer_id: EntityId,
    pub account_type: &'static str,
    pub status: &'static str,
    pub base_currency: CurrencyCode,
    #[serde(serialize_with = "clock::serialize_iso")]
    pub opened_at: DateTime<Utc>,
}

/// Owner is drawn uniformly from the already generated customers.
pub struct AccountGenerator<'a> {
    clock: GenClock,
    customers: &'a [CustomerRecord],
    account_type: WeightedTable<&'static str>,
    status: WeightedTable<&'static str>,
}

impl<'a> AccountGenerator<'a> {
    pub fn new(clock: GenClock, customers: &'a [CustomerRecord]) -> GenResult<Self> {
        if customers.is_empty() {
            return Err(GenError::config("accounts need at least one customer"));
        }
        Ok(Self {
            clock,
            customers,
            account_type: WeightedTable::from_pairs(ACCOUNT_TYPE_WEIGHTS)?,
            status: WeightedTable::from_pairs(ACCOUNT_STATUS_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for AccountGenerator<'_> {
    type Record = AccountRecord;

    fn name(&self) -> &'static str {
        "account"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<AccountRecord>> {
        let mut accounts = Vec::with_capacity(count);
        for _ in 0..count {
            let account_id = rng.uuid_string();
            let opened_at = self.clock.lookback(rng, ACCOUNT_LOOKBACK_DAYS);
            let base_currency = rng.choose(CURRENCIES).to_string();
            let customer_id = rng.choose(self.customers).customer_id.clone();
            let account_type = *self.account_type.sample(rng);
            let status = *self.status.sample(rng);

            accounts.push(AccountRecord {
                account_id,
                customer_id,
                account_type,
                status,
                base_currency,
                opened_at,
            });
        }
        log::debug!("account: generated {} records", accounts.len());
        Ok(accounts)
    }
}
