use crate::error::{GenError, GenResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SubdirConfig {
    pub raw: String,
    pub reference: String,
    pub contracts: String,
    pub obs_raw: String,
    pub obs_contracts: String,
    pub obs_curated: String,
}

impl Default for SubdirConfig {
    fn default() -> Self {
        Self {
            raw: "raw".into(),
            reference: "reference".into(),
            contracts: "contracts".into(),
            obs_raw: "obs/raw".into(),
            obs_contracts: "obs/contracts".into(),
            obs_curated: "obs/curated".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolumeConfig {
    pub customers: usize,
    pub accounts: usize,
    pub merchants: usize,
    pub transactions: usize,
    pub disputes: usize,
    pub fx_days: usize,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            customers: 500,
            accounts: 800,
            merchants: 300,
            transactions: 20_000,
            disputes: 200,
            fx_days: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FxConfig {
    pub base_ccy: String,
    pub quote_ccys: Vec<String>,
}

impl Default for FxConfig {
    fn default() -> Self {
        Self {
            base_ccy: "USD".into(),
            quote_ccys: ["USD", "EUR", "GBP", "INR", "SGD", "AED"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub bulletins: usize,
    pub provenance: usize,
    pub kpis: usize,
    pub alerts: usize,
    /// Width of the event-time window ending at the anchor.
    pub days: usize,
    pub flows: Vec<String>,
    pub nodes: Vec<String>,
    pub trace_pool_size: usize,
    pub flowfile_pool_size: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            bulletins: 2000,
            provenance: 5000,
            kpis: 300,
            alerts: 50,
            days: 2,
            flows: ["ingest_validate", "enrich_post", "dlq_replay", "observability_plane"]
                .iter()
                .map(|f| f.to_string())
                .collect(),
            nodes: ["n1", "n2", "n3"].iter().map(|n| n.to_string()).collect(),
            trace_pool_size: 1000,
            flowfile_pool_size: 2000,
        }
    }
}

/// The single configuration object for a generation run.
/// Built once, validated, then passed by reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenConfig {
    pub base_dir: PathBuf,
    pub subdirs: SubdirConfig,
    pub seed: u64,
    /// Reference "now" for every generated timestamp.
    /// `None` means the start of the current UTC day.
    pub anchor_time: Option<DateTime<Utc>>,
    pub volumes: VolumeConfig,
    pub fx: FxConfig,
    pub observability: ObservabilityConfig,
}

impl Default for GenConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("./data"),
            subdirs: SubdirConfig::default(),
            seed: 7,
            anchor_time: None,
            volumes: VolumeConfig::default(),
            fx: FxConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl GenConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    /// In tests, use GenConfig::default_test().
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: GenConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Config with small volumes and a pinned anchor for use in tests.
    pub fn default_test() -> Self {
        Self {
            base_dir: PathBuf::from("./data-test"),
            seed: 42,
            anchor_time: DateTime::parse_from_rfc3339("2024-06-01T12:00:00Z")
                .ok()
                .map(|dt| dt.with_timezone(&Utc)),
            volumes: VolumeConfig {
                customers: 5,
                accounts: 8,
                merchants: 3,
                transactions: 20,
                disputes: 5,
                fx_days: 2,
            },
            fx: FxConfig {
                base_ccy: "USD".into(),
                quote_ccys: vec!["EUR".into(), "GBP".into()],
            },
            observability: ObservabilityConfig {
                bulletins: 40,
                provenance: 60,
                kpis: 12,
                alerts: 8,
                trace_pool_size: 10,
                flowfile_pool_size: 20,
                ..ObservabilityConfig::default()
            },
            ..Self::default()
        }
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        self.base_dir.join(rel)
    }

    /// Every subdirectory the run writes into, in creation order.
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let s = &self.subdirs;
        [
            &s.raw,
            &s.reference,
            &s.contracts,
            &s.obs_raw,
            &s.obs_contracts,
            &s.obs_curated,
        ]
        .iter()
        .map(|rel| self.dir(rel))
        .collect()
    }

    /// Reject degenerate configurations before anything is generated.
    pub fn validate(&self) -> GenResult<()> {
        let v = &self.volumes;
        for (name, count) in [
            ("customers", v.customers),
            ("accounts", v.accounts),
            ("merchants", v.merchants),
            ("transactions", v.transactions),
            ("disputes", v.disputes),
            ("fx_days", v.fx_days),
        ] {
            if count == 0 {
                return Err(GenError::config(format!("volume '{name}' must be > 0")));
            }
        }

        let o = &self.observability;
        for (name, count) in [
            ("bulletins", o.bulletins),
            ("provenance", o.provenance),
            ("kpis", o.kpis),
            ("alerts", o.alerts),
            ("days", o.days),
            ("trace_pool_size", o.trace_pool_size),
            ("flowfile_pool_size", o.flowfile_pool_size),
        ] {
            if count == 0 {
                return Err(GenError::config(format!(
                    "observability volume '{name}' must be > 0"
                )));
            }
        }
        if o.flows.is_empty() || o.nodes.is_empty() {
            return Err(GenError::config("observability flows and nodes must be non-empty"));
        }

        check_currency(&self.fx.base_ccy)?;
        for (i, q) in self.fx.quote_ccys.iter().enumerate() {
            check_currency(q)?;
            if self.fx.quote_ccys[..i].contains(q) {
                return Err(GenError::config(format!("fx quote currency {q} is listed twice")));
            }
        }
        if !self.fx.quote_ccys.iter().any(|q| *q != self.fx.base_ccy) {
            return Err(GenError::config(format!(
                "fx quote list has no currency other than base {}",
                self.fx.base_ccy
            )));
        }
        Ok(())
    }
}

fn check_currency(code: &str) -> GenResult<()> {
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(GenError::config(format!("'{code}' is not a 3-letter currency code")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GenConfig::default().validate().unwrap();
        GenConfig::default_test().validate().unwrap();
    }

    #[test]
    fn zero_volume_is_rejected() {
        let mut config = GenConfig::default_test();
        config.volumes.merchants = 0;
        assert!(matches!(config.validate(), Err(GenError::Config { .. })));
    }

    #[test]
    fn quote_list_of_only_base_is_rejected() {
        let mut config = GenConfig::default_test();
        config.fx.quote_ccys = vec!["USD".into()];
        assert!(matches!(config.validate(), Err(GenError::Config { .. })));
    }

    #[test]
    fn repeated_quote_currency_is_rejected() {
        let mut config = GenConfig::default_test();
        config.fx.quote_ccys = vec!["EUR".into(), "GBP".into(), "EUR".into()];
        assert!(matches!(config.validate(), Err(GenError::Config { .. })));
    }

    #[test]
    fn bad_currency_is_rejected() {
        let mut config = GenConfig::default_test();
        config.fx.base_ccy = "us".into();
        assert!(matches!(config.validate(), Err(GenError::Config { .. })));
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config: GenConfig =
            serde_json::from_str(r#"{"seed": 99, "volumes": {"customers": 10}}"#).unwrap();
        assert_eq!(config.seed, 99);
        assert_eq!(config.volumes.customers, 10);
        assert_eq!(config.volumes.accounts, 800);
        assert_eq!(config.subdirs.obs_raw, "obs/raw");
    }
}
