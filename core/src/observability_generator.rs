//! Observability telemetry: bulletins, provenance events, flow KPIs, alerts.
//!
//! Node and flow identifiers come from small fixed pools. Records are
//! weakly linked to business activity through a shared pool of trace
//! contexts: a record either carries one complete context or none at all.

use crate::{
    clock::{self, GenClock},
    config::ObservabilityConfig,
    doc::{Doc, IntoDoc},
    error::{GenError, GenResult},
    generator::DatasetGenerator,
    name_generator::NameGenerator,
    rng::DataRng,
    sampler::WeightedTable,
    types::EntityId,
};
use chrono::{DateTime, Duration, Utc};

pub const SCHEMA_VERSION: &str = "1.0";

pub const BULLETIN_TRACE_P: f64 = 0.6;
pub const PROVENANCE_TRACE_P: f64 = 0.8;
pub const ALERT_TRACE_P: f64 = 0.4;

pub const KPI_WINDOW_MINUTES: i64 = 5;
pub const ALERT_WINDOW_MINUTES: i64 = 5;

pub const BULLETIN_LEVEL_WEIGHTS: &[(&str, u32)] = &[("INFO", 70), ("WARN", 20), ("ERROR", 10)];
pub const COMPONENT_TYPES: &[&str] = &["Processor", "ControllerService", "ReportingTask"];
pub const BULLETIN_CATEGORIES: &[&str] =
    &["Backpressure", "Repository", "Security", "FlowFile", "Processor"];
pub const PROVENANCE_EVENT_TYPES: &[&str] = &[
    "RECEIVE",
    "FETCH",
    "ROUTE",
    "CONTENT_MODIFIED",
    "SEND",
    "DROP",
    "FORK",
    "JOIN",
    "CLONE",
];
pub const TRANSIT_URIS: &[Option<&str>] = &[
    None,
    Some("file://data"),
    Some("s2s://nifi"),
    Some("https://sink/api"),
];
pub const KPI_METRICS: &[&str] = &[
    "postings_succeeded",
    "postings_failed",
    "dlq_count",
    "queue_depth",
    "backpressure_engaged",
    "latency_ms_p95",
];
pub const ALERT_TYPES: &[&str] = &[
    "stall_detected",
    "error_rate_high",
    "dlq_rate_high",
    "backpressure_engaged",
];
pub const SEVERITIES: &[&str] = &["LOW", "MEDIUM", "HIGH"];

// ── Trace pool ─────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    pub correlation_id: EntityId,
    pub transaction_id: EntityId,
    pub idempotency_key: String,
}

/// Pre-generated identifiers shared by all observability records.
pub struct TracePool {
    pub traces: Vec<TraceContext>,
    pub flowfiles: Vec<EntityId>,
}

impl TracePool {
    pub fn generate(rng: &mut DataRng, trace_count: usize, flowfile_count: usize) -> GenResult<Self> {
        if trace_count == 0 || flowfile_count == 0 {
            return Err(GenError::config("trace and flowfile pools must be non-empty"));
        }
        let flowfiles = (0..flowfile_count).map(|_| rng.uuid_string()).collect();
        let traces = (0..trace_count)
            .map(|_| {
                let correlation_id = rng.uuid_string();
                let transaction_id = rng.uuid_string();
                let key_hex = rng.uuid().simple().to_string();
                TraceContext {
                    correlation_id,
                    transaction_id,
                    idempotency_key: format!("k:{}", &key_hex[..12]),
                }
            })
            .collect();
        Ok(Self { traces, flowfiles })
    }

    /// With probability `p`, one whole context; otherwise none.
    pub fn maybe_pick(&self, rng: &mut DataRng, p: f64) -> Option<TraceContext> {
        if rng.chance(p) {
            Some(rng.choose(&self.traces).clone())
        } else {
            None
        }
    }
}

fn trace_fields(trace: Option<&TraceContext>, with_key: bool) -> Vec<(&'static str, Doc)> {
    let mut fields = vec![
        ("trace.correlation_id", Doc::from(trace.map(|t| t.correlation_id.as_str()))),
        ("trace.transaction_id", Doc::from(trace.map(|t| t.transaction_id.as_str()))),
    ];
    if with_key {
        fields.push((
            "trace.idempotency_key",
            Doc::from(trace.map(|t| t.idempotency_key.as_str())),
        ));
    }
    fields
}

/// Shared time window and node pool for all observability generators.
#[derive(Clone, Copy)]
pub struct ObsWindow<'a> {
    pub clock: GenClock,
    pub days: i64,
    pub nodes: &'a [String],
    pub flows: &'a [String],
}

impl<'a> ObsWindow<'a> {
    pub fn new(clock: GenClock, config: &'a ObservabilityConfig) -> GenResult<Self> {
        if config.nodes.is_empty() || config.flows.is_empty() {
            return Err(GenError::config("observability flows and nodes must be non-empty"));
        }
        Ok(Self {
            clock,
            days: config.days as i64,
            nodes: &config.nodes,
            flows: &config.flows,
        })
    }

    fn time(&self, rng: &mut DataRng) -> DateTime<Utc> {
        self.clock.within_window(rng, self.days)
    }
}

// ── Bulletins ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct BulletinRecord {
    pub event_time: DateTime<Utc>,
    pub node_id: String,
    pub group_id: EntityId,
    pub component_id: EntityId,
    pub component_type: &'static str,
    pub bulletin_level: &'static str,
    pub category: &'static str,
    pub message: String,
    pub trace: Option<TraceContext>,
}

impl IntoDoc for BulletinRecord {
    fn to_doc(&self) -> Doc {
        let mut fields = vec![
            ("event_time", Doc::from(clock::iso_utc(&self.event_time))),
            ("node_id", Doc::from(&self.node_id)),
            ("group_id", Doc::from(&self.group_id)),
            ("component_id", Doc::from(&self.component_id)),
            ("component_type", Doc::from(self.component_type)),
            ("bulletin_level", Doc::from(self.bulletin_level)),
            ("category", Doc::from(self.category)),
            ("message", Doc::from(&self.message)),
        ];
        fields.extend(trace_fields(self.trace.as_ref(), true));
        Doc::map(fields)
    }
}

pub struct BulletinGenerator<'a> {
    window: ObsWindow<'a>,
    pool: &'a TracePool,
    level: WeightedTable<&'static str>,
}

impl<'a> BulletinGenerator<'a> {
    pub fn new(window: ObsWindow<'a>, pool: &'a TracePool) -> GenResult<Self> {
        Ok(Self {
            window,
            pool,
            level: WeightedTable::from_pairs(BULLETIN_LEVEL_WEIGHTS)?,
        })
    }
}

impl DatasetGenerator for BulletinGenerator<'_> {
    type Record = BulletinRecord;

    fn name(&self) -> &'static str {
        "bulletin"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<BulletinRecord>> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let event_time = self.window.time(rng);
            let trace = self.pool.maybe_pick(rng, BULLETIN_TRACE_P);
            out.push(BulletinRecord {
                event_time,
                trace,
                node_id: rng.choose(self.window.nodes).clone(),
                group_id: rng.uuid_string(),
                component_id: rng.uuid_string(),
                component_type: *rng.choose(COMPONENT_TYPES),
                bulletin_level: *self.level.sample(rng),
                category: *rng.choose(BULLETIN_CATEGORIES),
                message: NameGenerator::sentence(rng, 10),
            });
        }
        log::debug!("bulletin: generated {} records", out.len());
        Ok(out)
    }
}

// ── Provenance ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct ProvenanceRecord {
    pub event_time: DateTime<Utc>,
    pub node_id: String,
    pub flowfile_uuid: EntityId,
    pub event_type: &'static str,
    pub component_id: EntityId,
    pub transit_uri: Option<&'static str>,
    pub file_size: i64,
    pub trace: Option<TraceContext>,
}

impl IntoDoc for ProvenanceRecord {
    fn to_doc(&self) -> Doc {
        let attributes = match &self.trace {
            Some(t) => Doc::map([
                ("trace.correlation_id", Doc::from(&t.correlation_id)),
                ("trace.transaction_id", Doc::from(&t.transaction_id)),
                ("trace.idempotency_key", Doc::from(&t.idempotency_key)),
                ("schema_version", Doc::from(SCHEMA_VERSION)),
            ]),
            None => Doc::map([("schema_version", Doc::from(SCHEMA_VERSION))]),
        };
        Doc::map([
            ("event_time", Doc::from(clock::iso_utc(&self.event_time))),
            ("node_id", Doc::from(&self.node_id)),
            ("flowfile_uuid", Doc::from(&self.flowfile_uuid)),
            ("event_type", Doc::from(self.event_type)),
            ("component_id", Doc::from(&self.component_id)),
            ("transit_uri", Doc::from(self.transit_uri)),
            ("file_size", Doc::from(self.file_size)),
            ("attributes", attributes),
        ])
    }
}

pub struct ProvenanceGenerator<'a> {
    window: ObsWindow<'a>,
    pool: &'a TracePool,
}

impl<'a> ProvenanceGenerator<'a> {
    pub fn new(window: ObsWindow<'a>, pool: &'a TracePool) -> Self {
        Self { window, pool }
    }
}

impl DatasetGenerator for ProvenanceGenerator<'_> {
    type Record = ProvenanceRecord;

    fn name(&self) -> &'static str {
        "provenance"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<ProvenanceRecord>> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let event_time = self.window.time(rng);
            let flowfile_uuid = rng.choose(&self.pool.flowfiles).clone();
            let trace = self.pool.maybe_pick(rng, PROVENANCE_TRACE_P);
            out.push(ProvenanceRecord {
                event_time,
                flowfile_uuid,
                trace,
                node_id: rng.choose(self.window.nodes).clone(),
                event_type: *rng.choose(PROVENANCE_EVENT_TYPES),
                component_id: rng.uuid_string(),
                transit_uri: *rng.choose(TRANSIT_URIS),
                file_size: rng.range_inclusive(50, 250_000),
            });
        }
        log::debug!("provenance: generated {} records", out.len());
        Ok(out)
    }
}

// ── Flow KPIs ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KpiRecord {
    pub window_start: DateTime<Utc>,
    pub window_end: DateTime<Utc>,
    pub flow_name: String,
    pub metric_name: &'static str,
    pub metric_value: f64,
}

impl IntoDoc for KpiRecord {
    fn to_doc(&self) -> Doc {
        Doc::map([
            ("window_start", Doc::from(clock::iso_utc(&self.window_start))),
            ("window_end", Doc::from(clock::iso_utc(&self.window_end))),
            ("flow_name", Doc::from(&self.flow_name)),
            ("metric_name", Doc::from(self.metric_name)),
            ("metric_value", Doc::from(self.metric_value)),
            (
                "dimensions",
                Doc::map([("env", Doc::from("dev")), ("cluster", Doc::from("c1"))]),
            ),
        ])
    }
}

pub struct KpiGenerator<'a> {
    window: ObsWindow<'a>,
}

impl<'a> KpiGenerator<'a> {
    pub fn new(window: ObsWindow<'a>) -> Self {
        Self { window }
    }
}

impl DatasetGenerator for KpiGenerator<'_> {
    type Record = KpiRecord;

    fn name(&self) -> &'static str {
        "kpi"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<KpiRecord>> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let window_end = self.window.time(rng);
            let flow_name = rng.choose(self.window.flows).clone();
            let metric_name = *rng.choose(KPI_METRICS);
            // backpressure_engaged is a 0/1 flag, everything else a gauge.
            let metric_value = if metric_name == "backpressure_engaged" {
                rng.next_u64_below(2) as f64
            } else {
                rng.uniform(0.0, 500.0)
            };
            out.push(KpiRecord {
                window_start: window_end - Duration::minutes(KPI_WINDOW_MINUTES),
                window_end,
                flow_name,
                metric_name,
                metric_value,
            });
        }
        log::debug!("kpi: generated {} records", out.len());
        Ok(out)
    }
}

// ── Alerts ─────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct AlertRecord {
    pub alert_time: DateTime<Utc>,
    pub alert_type: &'static str,
    pub severity: &'static str,
    pub signal_value: f64,
    pub flow_name: String,
    pub node_id: String,
    pub component_id: EntityId,
    pub trace: Option<TraceContext>,
}

impl IntoDoc for AlertRecord {
    fn to_doc(&self) -> Doc {
        let mut context = vec![
            ("flow_name", Doc::from(&self.flow_name)),
            ("node_id", Doc::from(&self.node_id)),
            ("component_id", Doc::from(&self.component_id)),
        ];
        context.extend(trace_fields(self.trace.as_ref(), false));
        Doc::map([
            ("alert_time", Doc::from(clock::iso_utc(&self.alert_time))),
            ("alert_type", Doc::from(self.alert_type)),
            ("severity", Doc::from(self.severity)),
            (
                "signal",
                Doc::map([
                    ("value", Doc::from(self.signal_value)),
                    ("window_minutes", Doc::Int(ALERT_WINDOW_MINUTES)),
                ]),
            ),
            ("context", Doc::map(context)),
        ])
    }
}

pub struct AlertGenerator<'a> {
    window: ObsWindow<'a>,
    pool: &'a TracePool,
}

impl<'a> AlertGenerator<'a> {
    pub fn new(window: ObsWindow<'a>, pool: &'a TracePool) -> Self {
        Self { window, pool }
    }
}

impl DatasetGenerator for AlertGenerator<'_> {
    type Record = AlertRecord;

    fn name(&self) -> &'static str {
        "alert"
    }

    fn generate(&self, count: usize, rng: &mut DataRng) -> GenResult<Vec<AlertRecord>> {
        let mut out = Vec::with_capacity(count);
        for _ in 0..count {
            let alert_time = self.window.time(rng);
            let trace = self.pool.maybe_pick(rng, ALERT_TRACE_P);
            out.push(AlertRecord {
                alert_time,
                trace,
                alert_type: *rng.choose(ALERT_TYPES),
                severity: *rng.choose(SEVERITIES),
                signal_value: rng.next_f64(),
                flow_name: rng.choose(self.window.flows).clone(),
                node_id: rng.choose(self.window.nodes).clone(),
                component_id: rng.uuid_string(),
            });
        }
        log::debug!("alert: generated {} records", out.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn setup() -> (GenClock, ObservabilityConfig, DataRng) {
        let clock = GenClock::new(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap());
        (clock, ObservabilityConfig::default(), DataRng::new(11, 1))
    }

    /// Either every trace.* key is null or all come from the same pool entry.
    fn assert_trace_consistent(doc: &Doc, pool: &TracePool, keys: &[&str]) {
        let values: Vec<&Doc> = keys.iter().map(|k| doc.get(k).unwrap()).collect();
        if values.iter().all(|v| **v == Doc::Null) {
            return;
        }
        let corr = match values[0] {
            Doc::Str(s) => s,
            other => panic!("unexpected correlation value {other:?}"),
        };
        let entry = pool
            .traces
            .iter()
            .find(|t| &t.correlation_id == corr)
            .expect("correlation id from pool");
        assert_eq!(values[1], &Doc::from(&entry.transaction_id));
        if keys.len() > 2 {
            assert_eq!(values[2], &Doc::from(&entry.idempotency_key));
        }
    }

    #[test]
    fn bulletin_traces_are_all_or_nothing() {
        let (clock, config, mut rng) = setup();
        let pool = TracePool::generate(&mut rng, 5, 5).unwrap();
        let window = ObsWindow::new(clock, &config).unwrap();
        let bulletins = BulletinGenerator::new(window, &pool)
            .unwrap()
            .generate(200, &mut rng)
            .unwrap();

        let traced = bulletins.iter().filter(|b| b.trace.is_some()).count();
        assert!(traced > 0 && traced < 200);
        for b in &bulletins {
            assert!(b.event_time <= clock.anchor);
            assert!(b.event_time >= clock.anchor - Duration::days(2));
            assert_trace_consistent(
                &b.to_doc(),
                &pool,
                &["trace.correlation_id", "trace.transaction_id", "trace.idempotency_key"],
            );
        }
    }

    #[test]
    fn alert_traces_are_all_or_nothing() {
        let (clock, config, mut rng) = setup();
        let pool = TracePool::generate(&mut rng, 5, 5).unwrap();
        let window = ObsWindow::new(clock, &config).unwrap();
        let alerts = AlertGenerator::new(window, &pool).generate(100, &mut rng).unwrap();
        for a in &alerts {
            let doc = a.to_doc();
            let context = doc.get("context").unwrap();
            assert_trace_consistent(context, &pool, &["trace.correlation_id", "trace.transaction_id"]);
        }
    }

    #[test]
    fn provenance_attributes_always_carry_schema_version() {
        let (clock, config, mut rng) = setup();
        let pool = TracePool::generate(&mut rng, 5, 5).unwrap();
        let window = ObsWindow::new(clock, &config).unwrap();
        let events = ProvenanceGenerator::new(window, &pool)
            .generate(100, &mut rng)
            .unwrap();
        for e in &events {
            assert!(pool.flowfiles.contains(&e.flowfile_uuid));
            let doc = e.to_doc();
            let attrs = doc.get("attributes").unwrap();
            assert_eq!(attrs.get("schema_version"), Some(&Doc::from(SCHEMA_VERSION)));
            assert_eq!(
                attrs.get("trace.correlation_id").is_some(),
                e.trace.is_some()
            );
        }
    }

    #[test]
    fn kpi_windows_are_five_minutes() {
        let (clock, config, mut rng) = setup();
        let window = ObsWindow::new(clock, &config).unwrap();
        let kpis = KpiGenerator::new(window).generate(100, &mut rng).unwrap();
        for k in &kpis {
            assert_eq!(k.window_end - k.window_start, Duration::minutes(5));
            if k.metric_name == "backpressure_engaged" {
                assert!(k.metric_value == 0.0 || k.metric_value == 1.0);
            } else {
                assert!((0.0..500.0).contains(&k.metric_value));
            }
        }
    }

    #[test]
    fn idempotency_keys_are_short_hex() {
        let mut rng = DataRng::new(3, 1);
        let pool = TracePool::generate(&mut rng, 20, 1).unwrap();
        for t in &pool.traces {
            assert!(t.idempotency_key.starts_with("k:"));
            assert_eq!(t.idempotency_key.len(), 14);
            assert!(t.idempotency_key[2..].chars().all(|c| c.is_ascii_hexdigit()));
        }
    }
}
