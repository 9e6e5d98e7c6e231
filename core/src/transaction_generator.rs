use crate::{
    account_generator::AccountRecord,
    catalog::CURRENCIES,
    clock::{self, GenClock},
    doc::{Doc, IntoDoc},
    error::{GenError, GenResult},
    generator::DatasetGenerator,
    merchant_generator::MerchantRecord,
    name_generator::NameGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    types::{CurrencyCode, EntityId, MinorUnits},
};
use chrono::{DateTime, Utc};

pub const TRANSACTION_LOOKBACK_DAYS: i64 = 30;
pub const MIN_AMOUNT_MINOR: i64 = 100;
pub const MAX_AMOUNT_MINOR: i64 = 250_000;
pub const DEVICE_POOL: i64 = 20_000;

pub const STATUS_WEIGHTS: &[(&str, u32)] = &[
    ("AUTHORIZED", 25),
    ("CAPTURED", 30),
    ("SETTLED", 35),
    ("DECLINED", 10),
];
pub const CHANNEL_WEIGHTS: &[(&str, u32)] = &[("CARD", 55), ("UPI", 25), ("ACH", 15), ("WIRE", 5)];
pub const DIRECTION_WEIGHTS: &[(&str, u32)] = &[("DEBIT", 85), ("CREDIT", 15)];

/// A raw transaction event as emitted to `transactions.jsonl`.
///
/// `amount_base`, `fx_rate` and `merchant_risk_tier` are left null for a
/// downstream enrichment step to fill in.
#[derive(Debug, Clone)]
pub struct TransactionRecord {
    pub transaction_id: EntityId,
    pub correlation_id: EntityId,
    pub event_time: DateTime<Utc>,
    pub customer_id: EntityId,
    pub account_id: EntityId,
    pub merchant_id: EntityId,
    pub channel: &'static str,
    pub direction: &'static str,
    pub amount: MinorUnits,
    pub currency: CurrencyCode,
    pub status: &'static str,
    pub auth_code: String,
    pub card_last4: Option<String>,
    pub device_id: String,
    pub ip_address: String,
    pub idempotency_key: String,
    pub amount_base: Option<MinorUnits>,
    pub base_currency: Option<CurrencyCode>,
    pub fx_rate: Option<f64>,
    pub merchant_risk_tier: Option<String>,
}

impl IntoDoc for TransactionRecord {
    fn to_doc(&self) -> Doc {
        Doc::map([
            ("transaction_id", Doc::from(&self.transaction_id)),
            ("correlation_id", Doc::from(&self.correlation_id)),
            ("event_time", Doc::from(clock::iso_utc(&self.event_time))),
            ("customer_id", Doc::from(&self.customer_id)),
            ("account_id", Doc::from(&self.account_id)),
            ("merchant_id", Doc::from(&self.merchant_id)),
            ("channel", Doc::from(self.channel)),
            ("direction", Doc::from(self.direction)),
            ("amount", Doc::from(self.amount)),
            ("currency", Doc::from(&self.currency)),
            ("status", Doc::from(self.status)),
            ("auth_code", Doc::from(&self.auth_code)),
            ("card_last4", Doc::from(self.card_last4.as_deref())),
            ("device_id", Doc::from(&self.device_id)),
            ("ip_address", Doc::from(&self.ip_address)),
            ("idempotency_key", Doc::from(&self.idempotency_key)),
            ("amount_base", Doc::from(self.amount_base)),
            ("base_currency", Doc::from(self.base_currency.as_deref())),
            ("fx_rate", Doc::from(self.fx_rate)),
            ("merchant_risk_tier", Doc::from(self.merchant_risk_tier.as_deref())),
        ])
    }
}

/// `<customer_id>:<account_id>:<first 8 chars of transaction_id>`.
pub fn idempotency_key(customer_id: &str, account_id: &str, transaction_id: &str) -> String {
    let prefix: String = transaction_id.chars().take(8).collect();
    format!("{customer_id}:{account_id}:{prefix}")
}

/// The account is the authoritative reference; the customer is copied
/// from it so the two can never disagree.
pub struct TransactionGenerator<'a> {
    clock: GenClock,
    accounts: &'a [AccountRecord],
    merchants: &'a [MerchantRecord],
    status: WeightedTable<&'static str>,
    channel: WeightedTable<&'static str>,
    direction: WeightedTable<&'static str>,
}

impl<'a> TransactionGenerator<'a> {
    pub fn new(
        clock: GenClock,
        accounts: &'a [AccountRecord],
        merchants: &'a [MerchantRecord],
    ) -> GenResult<Self> {
        if accounts.is_empty() || merchants.is_empty() {
            return Err(GenError::config(
                "transactions need at least one account and one merchant",
            ));
        }
        Ok(Self {
            clock,
            accounts,
            merchants,
            status: WeightedTable::from_pairs(STATUS_WEIGHTS)?,
            channel: WeightedTable::from_pairs(CHANNEL_WEIGHTS)?,
            direction: WeightedTable::from_pairs(DIRECTION_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for TransactionGenerator<'_> {
    type Record = TransactionRecord;

    fn name(&self) -> &'static str {
        "transaction"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<TransactionRecord>> {
        let mut txns = Vec::with_capacity(count);
        for _ in 0..count {
            let transaction_id = rng.uuid_string();
            let correlation_id = rng.uuid_string();
            let account = rng.choose(self.accounts);
            let event_time = self.clock.lookback(rng, TRANSACTION_LOOKBACK_DAYS);
            let currency = rng.choose(CURRENCIES).to_string();
            let amount = rng.range_inclusive(MIN_AMOUNT_MINOR, MAX_AMOUNT_MINOR);
            let status = *self.status.sample(rng);
            let channel = *self.channel.sample(rng);
            let direction = *self.direction.sample(rng);
            let merchant_id = rng.choose(self.merchants).merchant_id.clone();
            let auth_code = rng.range_inclusive(100_000, 999_999).to_string();
            let card_last4 = if channel == "CARD" {
                Some(format!("{:04}", rng.range_inclusive(0, 9999)))
            } else {
                None
            };
            let device_id = format!("dev_{}", rng.range_inclusive(1, DEVICE_POOL));
            let ip_address = NameGenerator::ipv4_public(rng);
            let idempotency_key =
                idempotency_key(&account.customer_id, &account.account_id, &transaction_id);

            txns.push(TransactionRecord {
                transaction_id,
                correlation_id,
                event_time,
                customer_id: account.customer_id.clone(),
                account_id: account.account_id.clone(),
                merchant_id,
                channel,
                direction,
                amount,
                currency,
                status,
                auth_code,
                card_last4,
                device_id,
                ip_address,
                idempotency_key,
                amount_base: None,
                base_currency: Some(account.base_currency.clone()),
                fx_rate: None,
                merchant_risk_tier: None,
            });
        }
        log::debug!("transaction: generated {} records", txns.len());
        Ok(txns)
    }
}
