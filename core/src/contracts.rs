//! Static data contracts: dataset schemas, quality rules and the bundle
//! that ties them together.
//!
//! Nothing here draws randomness or looks at generated records.

use crate::{
    account_generator::{ACCOUNT_STATUS_WEIGHTS, ACCOUNT_TYPE_WEIGHTS},
    customer_generator::KYC_WEIGHTS,
    dispute_generator::{DISPUTE_STATUS_WEIGHTS, REASON_WEIGHTS},
    doc::Doc,
    merchant_generator::RISK_TIER_WEIGHTS,
    transaction_generator::{CHANNEL_WEIGHTS, DIRECTION_WEIGHTS, STATUS_WEIGHTS},
};

pub const CONTRACT_VERSION: &str = "1.0";
const JSON_SCHEMA_DIALECT: &str = "https://json-schema.org/draft/2020-12/schema";

/// A named schema and the file stem it is written under.
pub struct SchemaDoc {
    pub name: &'static str,
    pub doc: Doc,
}

impl SchemaDoc {
    pub fn json_file(&self) -> String {
        format!("{}.schema.json", self.name)
    }

    pub fn yaml_file(&self) -> String {
        format!("{}.schema.yaml", self.name)
    }
}

fn values(table: &[(&str, u32)]) -> Doc {
    Doc::seq(table.iter().map(|(v, _)| *v))
}

fn typed(ty: &str) -> Doc {
    Doc::map([("type", Doc::from(ty))])
}

fn formatted(ty: &str, format: &str) -> Doc {
    Doc::map([("type", Doc::from(ty)), ("format", Doc::from(format))])
}

fn nullable(ty: &str) -> Doc {
    Doc::seq([ty, "null"])
}

fn currency_prop(ty: Doc) -> Doc {
    Doc::map([
        ("type", ty),
        ("minLength", Doc::Int(3)),
        ("maxLength", Doc::Int(3)),
    ])
}

fn minor_units(ty: Doc) -> Doc {
    Doc::map([("type", ty), ("minimum", Doc::Int(0))])
}

fn enum_prop(table: &[(&str, u32)]) -> Doc {
    Doc::map([("type", Doc::from("string")), ("enum", values(table))])
}

fn json_schema(title: &str, required: &[&str], properties: Vec<(&str, Doc)>) -> Doc {
    Doc::map([
        ("$schema", Doc::from(JSON_SCHEMA_DIALECT)),
        ("title", Doc::from(title)),
        ("type", Doc::from("object")),
        ("additionalProperties", Doc::Bool(true)),
        ("required", Doc::seq(required.iter().copied())),
        ("properties", Doc::map(properties)),
    ])
}

pub fn raw_transactions_schema() -> Doc {
    let mut risk_tiers: Vec<Doc> = RISK_TIER_WEIGHTS.iter().map(|(v, _)| Doc::from(*v)).collect();
    risk_tiers.push(Doc::Null);

    json_schema(
        "raw_transactions",
        &[
            "transaction_id",
            "correlation_id",
            "event_time",
            "customer_id",
            "account_id",
            "merchant_id",
            "amount",
            "currency",
            "status",
            "idempotency_key",
        ],
        vec![
            ("transaction_id", formatted("string", "uuid")),
            ("correlation_id", formatted("string", "uuid")),
            ("event_time", formatted("string", "date-time")),
            ("customer_id", formatted("string", "uuid")),
            ("account_id", formatted("string", "uuid")),
            ("merchant_id", formatted("string", "uuid")),
            ("channel", enum_prop(CHANNEL_WEIGHTS)),
            ("direction", enum_prop(DIRECTION_WEIGHTS)),
            ("amount", minor_units(Doc::from("integer"))),
            ("currency", currency_prop(Doc::from("string"))),
            ("status", enum_prop(STATUS_WEIGHTS)),
            ("auth_code", typed("string")),
            (
                "card_last4",
                Doc::map([
                    ("type", nullable("string")),
                    ("pattern", Doc::from("^[0-9]{4}$")),
                ]),
            ),
            ("device_id", typed("string")),
            ("ip_address", typed("string")),
            ("idempotency_key", typed("string")),
            ("amount_base", minor_units(nullable("integer"))),
            ("base_currency", currency_prop(nullable("string"))),
            ("fx_rate", Doc::map([("type", nullable("number"))])),
            (
                "merchant_risk_tier",
                Doc::map([("type", nullable("string")), ("enum", Doc::Seq(risk_tiers))]),
            ),
        ],
    )
}

pub fn raw_disputes_schema() -> Doc {
    json_schema(
        "raw_disputes",
        &[
            "dispute_id",
            "correlation_id",
            "transaction_id",
            "opened_at",
            "reason_code",
            "status",
            "amount",
            "currency",
        ],
        vec![
            ("dispute_id", formatted("string", "uuid")),
            ("correlation_id", formatted("string", "uuid")),
            ("transaction_id", formatted("string", "uuid")),
            ("opened_at", formatted("string", "date-time")),
            ("reason_code", enum_prop(REASON_WEIGHTS)),
            ("status", enum_prop(DISPUTE_STATUS_WEIGHTS)),
            ("amount", minor_units(Doc::from("integer"))),
            ("currency", currency_prop(Doc::from("string"))),
        ],
    )
}

/// Column descriptor of a tabular dataset.
enum Col<'a> {
    Plain(&'a str, &'a str),
    Enum(&'a str, &'a [(&'a str, u32)]),
}

fn tabular_schema(title: &str, columns: &[Col]) -> Doc {
    let columns = columns
        .iter()
        .map(|col| match col {
            Col::Plain(name, ty) => Doc::map([
                ("name", Doc::from(*name)),
                ("type", Doc::from(*ty)),
                ("required", Doc::Bool(true)),
            ]),
            Col::Enum(name, table) => Doc::map([
                ("name", Doc::from(*name)),
                ("type", Doc::from("enum")),
                ("values", values(table)),
                ("required", Doc::Bool(true)),
            ]),
        })
        .collect::<Vec<_>>();
    Doc::map([
        ("title", Doc::from(title)),
        ("type", Doc::from("csv")),
        ("columns", Doc::Seq(columns)),
    ])
}

pub fn reference_customers_schema() -> Doc {
    tabular_schema(
        "reference_customers",
        &[
            Col::Plain("customer_id", "uuid"),
            Col::Plain("full_name", "string"),
            Col::Plain("email", "string"),
            Col::Plain("phone_e164", "string"),
            Col::Plain("dob", "date"),
            Col::Enum("kyc_level", KYC_WEIGHTS),
            Col::Plain("country", "string"),
            Col::Plain("created_at", "date-time"),
        ],
    )
}

pub fn reference_accounts_schema() -> Doc {
    tabular_schema(
        "reference_accounts",
        &[
            Col::Plain("account_id", "uuid"),
            Col::Plain("customer_id", "uuid"),
            Col::Enum("account_type", ACCOUNT_TYPE_WEIGHTS),
            Col::Enum("status", ACCOUNT_STATUS_WEIGHTS),
            Col::Plain("base_currency", "string"),
            Col::Plain("opened_at", "date-time"),
        ],
    )
}

pub fn reference_merchants_schema() -> Doc {
    tabular_schema(
        "reference_merchants",
        &[
            Col::Plain("merchant_id", "uuid"),
            Col::Plain("merchant_name", "string"),
            Col::Plain("mcc", "string"),
            Col::Plain("country", "string"),
            Col::Enum("risk_tier", RISK_TIER_WEIGHTS),
            Col::Plain("created_at", "date-time"),
        ],
    )
}

pub fn reference_fx_rates_schema() -> Doc {
    tabular_schema(
        "reference_fx_rates",
        &[
            Col::Plain("rate_date", "date"),
            Col::Plain("base_ccy", "string"),
            Col::Plain("quote_ccy", "string"),
            Col::Plain("rate", "decimal"),
            Col::Plain("provider", "string"),
        ],
    )
}

/// Every fintech schema, in emission order.
pub fn fintech_schemas() -> Vec<SchemaDoc> {
    vec![
        SchemaDoc { name: "raw_transactions", doc: raw_transactions_schema() },
        SchemaDoc { name: "raw_disputes", doc: raw_disputes_schema() },
        SchemaDoc { name: "reference_customers", doc: reference_customers_schema() },
        SchemaDoc { name: "reference_accounts", doc: reference_accounts_schema() },
        SchemaDoc { name: "reference_merchants", doc: reference_merchants_schema() },
        SchemaDoc { name: "reference_fx_rates", doc: reference_fx_rates_schema() },
    ]
}

fn rule(rule: &str, check: &str) -> Doc {
    Doc::map([("rule", Doc::from(rule)), ("check", Doc::from(check))])
}

pub fn quality_rules() -> Doc {
    Doc::map([
        (
            "raw_transactions",
            Doc::Seq(vec![
                rule("amount is integer minor units", "amount is int and amount >= 0"),
                rule("currency length 3", "len(currency) == 3"),
                rule("correlation_id present", "present and UUID-shaped"),
                rule("idempotency_key present", "present and non-empty"),
                rule("card_last4 only for CARD", "card_last4 is 4 digits iff channel == CARD"),
            ]),
        ),
        (
            "raw_disputes",
            Doc::Seq(vec![
                rule("amount is integer minor units", "amount is int and amount >= 0"),
                rule("currency length 3", "len(currency) == 3"),
                rule(
                    "references transaction_id",
                    "transaction_id appears in raw transactions",
                ),
                rule(
                    "opened after transaction",
                    "opened_at > referenced transaction event_time",
                ),
            ]),
        ),
    ])
}

/// Paths recorded in the bundle, as display strings.
pub struct BundlePaths {
    pub raw: String,
    pub reference: String,
    pub contracts: String,
}

/// Aggregate of all schema references and quality rules.
/// `generated_at` is the one wall-clock value in the whole output.
pub fn contracts_bundle(paths: &BundlePaths, generated_at: &str, schemas: &[SchemaDoc]) -> Doc {
    Doc::map([
        ("version", Doc::from(CONTRACT_VERSION)),
        ("generated_at", Doc::from(generated_at)),
        (
            "paths",
            Doc::map([
                ("raw", Doc::from(&paths.raw)),
                ("reference", Doc::from(&paths.reference)),
                ("contracts", Doc::from(&paths.contracts)),
            ]),
        ),
        (
            "schemas",
            Doc::map(schemas.iter().map(|s| (s.name, Doc::from(s.json_file())))),
        ),
        ("quality_rules", quality_rules()),
    ])
}

fn dataset(path: String, required: &[&str]) -> Doc {
    Doc::map([
        ("path", Doc::from(path)),
        ("required", Doc::seq(required.iter().copied())),
    ])
}

/// Required fields per observability dataset. `obs_raw` is the
/// relative directory the datasets are written to.
pub fn observability_contracts(obs_raw: &str) -> Doc {
    let path = |file: &str| format!("{}/{file}", obs_raw.trim_end_matches('/'));
    Doc::map([
        ("version", Doc::from(CONTRACT_VERSION)),
        (
            "datasets",
            Doc::map([
                (
                    "nifi_bulletins",
                    dataset(
                        path("nifi_bulletins.jsonl"),
                        &[
                            "event_time",
                            "node_id",
                            "group_id",
                            "component_id",
                            "component_type",
                            "bulletin_level",
                            "category",
                            "message",
                        ],
                    ),
                ),
                (
                    "nifi_provenance",
                    dataset(
                        path("nifi_provenance.jsonl"),
                        &[
                            "event_time",
                            "node_id",
                            "flowfile_uuid",
                            "event_type",
                            "component_id",
                            "file_size",
                            "attributes",
                        ],
                    ),
                ),
                (
                    "flow_kpis",
                    dataset(
                        path("flow_kpis.jsonl"),
                        &[
                            "window_start",
                            "window_end",
                            "flow_name",
                            "metric_name",
                            "metric_value",
                            "dimensions",
                        ],
                    ),
                ),
                (
                    "alerts",
                    dataset(
                        path("alerts.jsonl"),
                        &["alert_time", "alert_type", "severity", "signal", "context"],
                    ),
                ),
            ]),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tabular_schemas_match_csv_columns() {
        let cases = [
            (reference_customers_schema(), crate::customer_generator::CUSTOMER_COLUMNS),
            (reference_accounts_schema(), crate::account_generator::ACCOUNT_COLUMNS),
            (reference_merchants_schema(), crate::merchant_generator::MERCHANT_COLUMNS),
            (reference_fx_rates_schema(), crate::fx_generator::FX_COLUMNS),
        ];
        for (schema, columns) in cases {
            let Some(Doc::Seq(cols)) = schema.get("columns") else {
                panic!("schema without columns");
            };
            let names: Vec<&Doc> = cols.iter().filter_map(|c| c.get("name")).collect();
            let expected: Vec<Doc> = columns.iter().map(|c| Doc::from(*c)).collect();
            assert_eq!(names, expected.iter().collect::<Vec<_>>());
        }
    }

    #[test]
    fn transaction_enums_follow_weight_tables() {
        let schema = raw_transactions_schema();
        let channel = schema.get("properties").and_then(|p| p.get("channel")).unwrap();
        assert_eq!(channel.get("enum"), Some(&Doc::seq(["CARD", "UPI", "ACH", "WIRE"])));
    }

    #[test]
    fn bundle_lists_every_schema() {
        let schemas = fintech_schemas();
        let paths = BundlePaths {
            raw: "data/raw".into(),
            reference: "data/reference".into(),
            contracts: "data/contracts".into(),
        };
        let bundle = contracts_bundle(&paths, "2024-06-01T00:00:00Z", &schemas);
        let Some(Doc::Map(listed)) = bundle.get("schemas") else {
            panic!("bundle without schemas");
        };
        assert_eq!(listed.len(), 6);
        assert_eq!(
            bundle.get("schemas").and_then(|s| s.get("raw_disputes")),
            Some(&Doc::from("raw_disputes.schema.json"))
        );
    }

    #[test]
    fn observability_paths_are_relative() {
        let doc = observability_contracts("obs/raw/");
        let path = doc
            .get("datasets")
            .and_then(|d| d.get("alerts"))
            .and_then(|a| a.get("path"));
        assert_eq!(path, Some(&Doc::from("obs/raw/alerts.jsonl")));
    }
}
