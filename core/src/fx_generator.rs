use crate::{
    catalog::FX_PROVIDERS,
    clock::{self, GenClock},
    config::FxConfig,
    error::GenResult,
    generator::DatasetGenerator,
    rng::DataRng,
    types::CurrencyCode,
};
use chrono::{Duration, NaiveDate};
use serde::Serialize;

pub const RATE_RANGE: (f64, f64) = (0.2, 120.0);

pub const FX_COLUMNS: &[&str] = &["rate_date", "base_ccy", "quote_ccy", "rate", "provider"];

#[derive(Debug, Clone, Serialize)]
pub struct FxRateRecord {
    #[serde(serialize_with = "clock::serialize_date")]
    pub rate_date: NaiveDate,
    pub base_ccy: CurrencyCode,
    pub quote_ccy: CurrencyCode,
    pub rate: f64,
    pub provider: &'static str,
}

fn round6(x: f64) -> f64 {
    (x * 1e6).round() / 1e6
}

/// Daily rates of every non-base quote currency, starting `days`
/// before the anchor date. Independent of all other datasets.
pub struct FxRateGenerator<'a> {
    clock: GenClock,
    fx: &'a FxConfig,
}

impl<'a> FxRateGenerator<'a> {
    pub fn new(clock: GenClock, fx: &'a FxConfig) -> Self {
        Self { clock, fx }
    }
}

impl DatasetGenerator for FxRateGenerator<'_> {
    type Record = FxRateRecord;

    fn name(&self) -> &'static str {
        "fx_rate"
    }

    /// `count` is the number of days.
    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<FxRateRecord>> {
        let start = self.clock.anchor_date() - Duration::days(count as i64);
        let mut rates = Vec::new();
        for day in 0..count {
            let rate_date = start + Duration::days(day as i64);
            for quote in &self.fx.quote_ccys {
                if *quote == self.fx.base_ccy {
                    continue;
                }
                let rate = round6(rng.uniform(RATE_RANGE.0, RATE_RANGE.1));
                let provider = *rng.choose(FX_PROVIDERS);
                rates.push(FxRateRecord {
                    rate_date,
                    base_ccy: self.fx.base_ccy.clone(),
                    quote_ccy: quote.clone(),
                    rate,
                    provider,
                });
            }
        }
        log::debug!("fx_rate: generated {} records over {count} days", rates.len());
        Ok(rates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn base_currency_is_skipped() {
        let clock = GenClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        let fx = FxConfig {
            base_ccy: "USD".into(),
            quote_ccys: vec!["USD".into(), "EUR".into(), "INR".into()],
        };
        let mut rng = DataRng::new(2, 0);
        let rates = FxRateGenerator::new(clock, &fx).generate(3, &mut rng).unwrap();

        assert_eq!(rates.len(), 6);
        assert!(rates.iter().all(|r| r.quote_ccy != r.base_ccy));
        assert_eq!(rates[0].rate_date, NaiveDate::from_ymd_opt(2024, 5, 29).unwrap());
        assert_eq!(rates[5].rate_date, NaiveDate::from_ymd_opt(2024, 5, 31).unwrap());
        for r in &rates {
            assert!(r.rate >= RATE_RANGE.0 && r.rate <= RATE_RANGE.1);
            assert_eq!(round6(r.rate), r.rate);
        }
    }
}
