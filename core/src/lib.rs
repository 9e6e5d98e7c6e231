//! Deterministic fintech fixture and observability telemetry generator.
//!
//! One seed and one anchor instant fully determine every generated record.
//! `FixtureEngine::run` writes the reference CSVs, raw JSONL events, and the
//! JSON/YAML contracts under the configured base directory.

pub mod account_generator;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod contracts;
pub mod customer_generator;
pub mod dispute_generator;
pub mod doc;
pub mod engine;
pub mod error;
pub mod fx_generator;
pub mod generator;
pub mod merchant_generator;
pub mod name_generator;
pub mod observability_generator;
pub mod rng;
pub mod sampler;
pub mod store;
pub mod transaction_generator;
pub mod types;

pub use config::GenConfig;
pub use engine::{FixtureEngine, RunSummary};
pub use error::{GenError, GenResult};
