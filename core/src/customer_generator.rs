use crate::{
    catalog::COUNTRIES,
    clock::{self, GenClock},
    error::GenResult,
    generator::DatasetGenerator,
    name_generator::NameGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    types::EntityId,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

pub const CUSTOMER_LOOKBACK_DAYS: i64 = 365;
pub const MIN_AGE: i64 = 18;
pub const MAX_AGE: i64 = 75;

pub const KYC_WEIGHTS: &[(&str, u32)] = &[("BASIC", 50), ("STANDARD", 35), ("ENHANCED", 15)];

/// Column order of `customers.csv`.
pub const CUSTOMER_COLUMNS: &[&str] = &[
    "customer_id",
    "full_name",
    "email",
    "phone_e164",
    "dob",
    "kyc_level",
    "country",
    "created_at",
];

#[derive(Debug, Clone, Serialize)]
pub struct CustomerRecord {
    pub customer_id: EntityId,
    pub full_name: String,
    pub email: String,
    pub phone_e164: String,
    #[serde(serialize_with = "clock::serialize_date")]
    pub dob: NaiveDate,
    pub kyc_level: &'static str,
    pub country: &'static str,
    #[serde(serialize_with = "clock::serialize_iso")]
    pub created_at: DateTime<Utc>,
}

pub struct CustomerGenerator {
    clock: GenClock,
    kyc: WeightedTable<&'static str>,
}

impl CustomerGenerator {
    pub fn new(clock: GenClock) -> GenResult<Self> {
        Ok(Self {
            clock,
            kyc: WeightedTable::from_pairs(KYC_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for CustomerGenerator {
    type Record = CustomerRecord;

    fn name(&self) -> &'static str {
        "customer"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<CustomerRecord>> {
        let mut customers = Vec::with_capacity(count);
        for _ in 0..count {
            let customer_id = rng.uuid_string();
            let created_at = self.clock.lookback(rng, CUSTOMER_LOOKBACK_DAYS);
            let full_name = NameGenerator::full_name(rng);
            let email = NameGenerator::email(rng);
            let phone_e164 = NameGenerator::phone_e164(rng);
            let dob = NameGenerator::date_of_birth(rng, self.clock.anchor_date(), MIN_AGE, MAX_AGE);
            let kyc_level = *self.kyc.sample(rng);
            let country = *rng.choose(COUNTRIES);

            customers.push(CustomerRecord {
                customer_id,
                full_name,
                email,
                phone_e164,
                dob,
                kyc_level,
                country,
                created_at,
            });
        }
        log::debug!("customer: generated {} records", customers.len());
        Ok(customers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn customers_are_created_before_anchor() {
        let clock = GenClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let generator = CustomerGenerator::new(clock).unwrap();
        let mut rng = DataRng::new(1, 0);
        let customers = generator.generate(50, &mut rng).unwrap();

        assert_eq!(customers.len(), 50);
        for c in &customers {
            assert!(c.created_at <= clock.anchor);
            assert!(KYC_WEIGHTS.iter().any(|(k, _)| *k == c.kyc_level));
            assert!(COUNTRIES.contains(&c.country));
            assert!(c.email.contains('@'));
        }
    }

    #[test]
    fn csv_row_matches_column_order() {
        let clock = GenClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let generator = CustomerGenerator::new(clock).unwrap();
        let mut rng = DataRng::new(1, 0);
        let customer = generator.generate(1, &mut rng).unwrap().remove(0);

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(&customer).unwrap();
        let text = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());
        let header: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(header, CUSTOMER_COLUMNS);

        let row = reader.records().next().unwrap().unwrap();
        assert_eq!(&row[0], customer.customer_id);
        assert_eq!(&row[4], customer.dob.format("%Y-%m-%d").to_string());
        assert!(row[7].ends_with('Z'));
    }
}
