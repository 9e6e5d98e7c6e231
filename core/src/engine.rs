//! The generation engine. Sequences a complete fixture run.
//!
//! EXECUTION ORDER (fixed, documented, never reordered):
//!   1. Directory setup
//!   2. Fintech stream:   customers → accounts → merchants →
//!                        transactions → disputes → fx rates
//!   3. Tabular writes    (customers, accounts, merchants, fx rates)
//!   4. Event writes      (transactions, disputes)
//!   5. Contracts + bundle, JSON and YAML
//!   6. Observability stream: flowfile pool → trace pool → bulletins →
//!                        provenance → kpis → alerts, then their writes
//!                        and the observability contracts
//!
//! RULES:
//!   - Generators run in dependency order and only see earlier datasets.
//!   - All randomness flows through the RngBank, one stream per family.
//!   - The first failed write aborts the run. Output of a failed run
//!     must not be trusted.

use crate::{
    account_generator::{AccountGenerator, AccountRecord, ACCOUNT_COLUMNS},
    clock::{self, GenClock},
    config::GenConfig,
    contracts::{self, BundlePaths},
    customer_generator::{CustomerGenerator, CustomerRecord, CUSTOMER_COLUMNS},
    dispute_generator::{DisputeGenerator, DisputeRecord},
    error::GenResult,
    fx_generator::{FxRateGenerator, FxRateRecord, FX_COLUMNS},
    generator::DatasetGenerator,
    merchant_generator::{MerchantGenerator, MerchantRecord, MERCHANT_COLUMNS},
    observability_generator::{
        AlertGenerator, AlertRecord, BulletinGenerator, BulletinRecord, KpiGenerator, KpiRecord,
        ObsWindow, ProvenanceGenerator, ProvenanceRecord, TracePool,
    },
    rng::{DataRng, RngBank, StreamSlot},
    store::FileStore,
    transaction_generator::{TransactionGenerator, TransactionRecord},
};
use chrono::Utc;
use std::{path::PathBuf, time::Instant};

/// Every fintech dataset of one run, in generation order.
#[derive(Debug, Clone)]
pub struct FintechDataset {
    pub customers: Vec<CustomerRecord>,
    pub accounts: Vec<AccountRecord>,
    pub merchants: Vec<MerchantRecord>,
    pub transactions: Vec<TransactionRecord>,
    pub disputes: Vec<DisputeRecord>,
    pub fx_rates: Vec<FxRateRecord>,
}

#[derive(Debug, Clone)]
pub struct ObservabilityDataset {
    pub bulletins: Vec<BulletinRecord>,
    pub provenance: Vec<ProvenanceRecord>,
    pub kpis: Vec<KpiRecord>,
    pub alerts: Vec<AlertRecord>,
}

/// Row counts of everything a run wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub base_dir: PathBuf,
    pub customers: usize,
    pub accounts: usize,
    pub merchants: usize,
    pub transactions: usize,
    pub disputes: usize,
    pub fx_rates: usize,
    pub bulletins: usize,
    pub provenance: usize,
    pub kpis: usize,
    pub alerts: usize,
    pub contract_files: usize,
}

pub struct FixtureEngine {
    pub config: GenConfig,
    pub clock: GenClock,
    pub rng_bank: RngBank,
    store: FileStore,
}

impl FixtureEngine {
    /// Validate the configuration and fix the anchor for the run.
    pub fn new(config: GenConfig) -> GenResult<Self> {
        config.validate()?;
        let clock = match config.anchor_time {
            Some(anchor) => GenClock::new(anchor),
            None => GenClock::start_of_today(),
        };
        Ok(Self {
            rng_bank: RngBank::new(config.seed),
            store: FileStore::new(&config.base_dir),
            clock,
            config,
        })
    }

    /// Run the fintech generators in dependency order on a fresh stream.
    pub fn generate_fintech(&self) -> GenResult<FintechDataset> {
        let mut rng = self.rng_bank.for_stream(StreamSlot::Fintech);
        let v = &self.config.volumes;

        let customers = timed(&CustomerGenerator::new(self.clock)?, v.customers, &mut rng)?;
        let accounts = timed(&AccountGenerator::new(self.clock, &customers)?, v.accounts, &mut rng)?;
        let merchants = timed(&MerchantGenerator::new(self.clock)?, v.merchants, &mut rng)?;
        let transactions = timed(
            &TransactionGenerator::new(self.clock, &accounts, &merchants)?,
            v.transactions,
            &mut rng,
        )?;
        let disputes = timed(&DisputeGenerator::new(&transactions)?, v.disputes, &mut rng)?;
        let fx_rates = timed(&FxRateGenerator::new(self.clock, &self.config.fx), v.fx_days, &mut rng)?;

        Ok(FintechDataset {
            customers,
            accounts,
            merchants,
            transactions,
            disputes,
            fx_rates,
        })
    }

    /// Run the observability generators on their own stream.
    pub fn generate_observability(&self) -> GenResult<ObservabilityDataset> {
        let mut rng = self.rng_bank.for_stream(StreamSlot::Observability);
        let o = &self.config.observability;

        let pool = TracePool::generate(&mut rng, o.trace_pool_size, o.flowfile_pool_size)?;
        let window = ObsWindow::new(self.clock, o)?;

        let bulletins = timed(&BulletinGenerator::new(window, &pool)?, o.bulletins, &mut rng)?;
        let provenance = timed(&ProvenanceGenerator::new(window, &pool), o.provenance, &mut rng)?;
        let kpis = timed(&KpiGenerator::new(window), o.kpis, &mut rng)?;
        let alerts = timed(&AlertGenerator::new(window, &pool), o.alerts, &mut rng)?;

        Ok(ObservabilityDataset {
            bulletins,
            provenance,
            kpis,
            alerts,
        })
    }

    /// The full pipeline: generate everything and write it out.
    pub fn run(&self) -> GenResult<RunSummary> {
        log::info!(
            "fixture run: seed={} anchor={} base_dir={}",
            self.config.seed,
            clock::iso_utc(&self.clock.anchor),
            self.config.base_dir.display()
        );
        self.store.ensure_dirs(&self.config.output_dirs())?;

        let data = self.generate_fintech()?;
        let mut contract_files = self.write_fintech(&data)?;

        let obs = self.generate_observability()?;
        contract_files += self.write_observability(&obs)?;

        let summary = RunSummary {
            base_dir: self.store.root().to_path_buf(),
            customers: data.customers.len(),
            accounts: data.accounts.len(),
            merchants: data.merchants.len(),
            transactions: data.transactions.len(),
            disputes: data.disputes.len(),
            fx_rates: data.fx_rates.len(),
            bulletins: obs.bulletins.len(),
            provenance: obs.provenance.len(),
            kpis: obs.kpis.len(),
            alerts: obs.alerts.len(),
            contract_files,
        };
        log::info!("fixture run complete: {summary:?}");
        Ok(summary)
    }

    /// Returns the number of contract files written.
    fn write_fintech(&self, data: &FintechDataset) -> GenResult<usize> {
        let s = &self.config.subdirs;
        let reference = self.config.dir(&s.reference);
        let raw = self.config.dir(&s.raw);
        let contracts_dir = self.config.dir(&s.contracts);

        self.store
            .write_csv(&reference.join("customers.csv"), CUSTOMER_COLUMNS, &data.customers)?;
        self.store
            .write_csv(&reference.join("accounts.csv"), ACCOUNT_COLUMNS, &data.accounts)?;
        self.store
            .write_csv(&reference.join("merchants.csv"), MERCHANT_COLUMNS, &data.merchants)?;
        self.store
            .write_csv(&reference.join("fx_rates.csv"), FX_COLUMNS, &data.fx_rates)?;

        self.store
            .write_jsonl(&raw.join("transactions.jsonl"), &data.transactions)?;
        self.store.write_jsonl(&raw.join("disputes.jsonl"), &data.disputes)?;

        let schemas = contracts::fintech_schemas();
        for schema in &schemas {
            self.store
                .write_json(&contracts_dir.join(schema.json_file()), &schema.doc)?;
            self.store
                .write_yaml(&contracts_dir.join(schema.yaml_file()), &schema.doc)?;
        }

        let paths = BundlePaths {
            raw: raw.display().to_string(),
            reference: reference.display().to_string(),
            contracts: contracts_dir.display().to_string(),
        };
        let bundle = contracts::contracts_bundle(&paths, &clock::iso_utc(&Utc::now()), &schemas);
        self.store
            .write_json(&contracts_dir.join("contracts_bundle.json"), &bundle)?;
        self.store
            .write_yaml(&contracts_dir.join("contracts_bundle.yaml"), &bundle)?;

        Ok(schemas.len() * 2 + 2)
    }

    fn write_observability(&self, obs: &ObservabilityDataset) -> GenResult<usize> {
        let s = &self.config.subdirs;
        let raw = self.config.dir(&s.obs_raw);
        let contracts_dir = self.config.dir(&s.obs_contracts);

        self.store
            .write_jsonl(&raw.join("nifi_bulletins.jsonl"), &obs.bulletins)?;
        self.store
            .write_jsonl(&raw.join("nifi_provenance.jsonl"), &obs.provenance)?;
        self.store.write_jsonl(&raw.join("flow_kpis.jsonl"), &obs.kpis)?;
        self.store.write_jsonl(&raw.join("alerts.jsonl"), &obs.alerts)?;

        let doc = contracts::observability_contracts(&s.obs_raw);
        self.store
            .write_json(&contracts_dir.join("observability_contracts.json"), &doc)?;
        self.store
            .write_yaml(&contracts_dir.join("observability_contracts.yaml"), &doc)?;
        Ok(2)
    }
}

fn timed<G: DatasetGenerator>(
    generator: &G,
    count: usize,
    rng: &mut DataRng,
) -> GenResult<Vec<G::Record>> {
    let started = Instant::now();
    let records = generator.generate(count, rng)?;
    log::info!(
        "{}: {} records in {:?}",
        generator.name(),
        records.len(),
        started.elapsed()
    );
    Ok(records)
}
