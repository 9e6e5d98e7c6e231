use crate::{
    catalog::{COUNTRIES, MCCS},
    clock::{self, GenClock},
    error::GenResult,
    generator::DatasetGenerator,
    name_generator::NameGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    types::EntityId,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MERCHANT_LOOKBACK_DAYS: i64 = 900;

pub const RISK_TIER_WEIGHTS: &[(&str, u32)] = &[("LOW", 70), ("MEDIUM", 25), ("HIGH", 5)];

pub const MERCHANT_COLUMNS: &[&str] = &[
    "merchant_id",
    "merchant_name",
    "mcc",
    "country",
    "risk_tier",
    "created_at",
];

#[derive(Debug, Clone, Serialize)]
pub struct MerchantRecord {
    pub merchant_id: EntityId,
    pub merchant_name: String,
    pub mcc: &'static str,
    pub country: &'static str,
    pub risk_tier: &'static str,
    #[serde(serialize_with = "clock::serialize_iso")]
    pub created_at: DateTime<Utc>,
}

pub struct MerchantGenerator {
    clock: GenClock,
    risk_tier: WeightedTable<&'static str>,
}

impl MerchantGenerator {
    pub fn new(clock: GenClock) -> GenResult<Self> {
        Ok(Self {
            clock,
            risk_tier: WeightedTable::from_pairs(RISK_TIER_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for MerchantGenerator {
    type Record = MerchantRecord;

    fn name(&self) -> &'static str {
        "merchant"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<MerchantRecord>> {
        let mut merchants = Vec::with_capacity(count);
        for _ in 0..count {
            let merchant_id = rng.uuid_string();
            let created_at = self.clock.lookback(rng, MERCHANT_LOOKBACK_DAYS);
            let merchant_name = NameGenerator::company_name(rng);
            let mcc = *rng.choose(MCCS);
            let country = *rng.choose(COUNTRIES);
            let risk_tier = *self.risk_tier.sample(rng);

            merchants.push(MerchantRecord {
                merchant_id,
                merchant_name,
                mcc,
                country,
                risk_tier,
                created_at,
            });
        }
        log::debug!("merchant: generated {} records", merchants.len());
        Ok(merchants)
    }
}
