//! Cross-dataset invariants over one in-memory fintech dataset.

use fixture_core::{engine::FintechDataset, FixtureEngine, GenConfig};
use std::collections::{HashMap, HashSet};

fn dataset() -> FintechDataset {
    let mut config = GenConfig::default_test();
    config.volumes.customers = 40;
    config.volumes.accounts = 80;
    config.volumes.merchants = 25;
    config.volumes.transactions = 600;
    config.volumes.disputes = 60;
    FixtureEngine::new(config)
        .expect("valid config")
        .generate_fintech()
        .expect("generate")
}

#[test]
fn every_account_belongs_to_a_customer() {
    let data = dataset();
    let customers: HashSet<_> = data.customers.iter().map(|c| c.customer_id.as_str()).collect();
    for a in &data.accounts {
        assert!(customers.contains(a.customer_id.as_str()), "orphan account {}", a.account_id);
    }
}

#[test]
fn transactions_reference_their_account_owner_and_merchant() {
    let data = dataset();
    let owners: HashMap<_, _> = data
        .accounts
        .iter()
        .map(|a| (a.account_id.as_str(), (a.customer_id.as_str(), a.base_currency.as_str())))
        .collect();
    let merchants: HashSet<_> = data.merchants.iter().map(|m| m.merchant_id.as_str()).collect();

    for t in &data.transactions {
        let (owner, ccy) = owners[t.account_id.as_str()];
        assert_eq!(t.customer_id, owner);
        assert_eq!(t.base_currency.as_deref(), Some(ccy));
        assert!(merchants.contains(t.merchant_id.as_str()));
        assert!(t.amount >= 100);
        assert_eq!(t.currency.len(), 3);
        assert!(t.idempotency_key.starts_with(&format!("{}:{}:", t.customer_id, t.account_id)));
        assert_eq!(t.auth_code.len(), 6);
    }
}

#[test]
fn card_last4_is_present_only_for_card_payments() {
    let data = dataset();
    for t in &data.transactions {
        match (t.channel, t.card_last4.as_deref()) {
            ("CARD", Some(last4)) => {
                assert_eq!(last4.len(), 4);
                assert!(last4.chars().all(|c| c.is_ascii_digit()));
            }
            ("CARD", None) => panic!("card transaction {} without card_last4", t.transaction_id),
            (_, Some(_)) => panic!("{} transaction carries card_last4", t.channel),
            (_, None) => {}
        }
    }
}

#[test]
fn disputes_follow_their_transaction() {
    let data = dataset();
    let txns: HashMap<_, _> = data
        .transactions
        .iter()
        .map(|t| (t.transaction_id.as_str(), t))
        .collect();

    let mut seen = HashSet::new();
    for d in &data.disputes {
        let t = txns[d.transaction_id.as_str()];
        assert!(seen.insert(d.transaction_id.as_str()), "transaction disputed twice");
        assert!(d.opened_at > t.event_time);
        assert_eq!(d.currency, t.currency);
        assert!(d.amount >= 0 && d.amount <= t.amount);
        assert_eq!(d.correlation_id, t.correlation_id);
    }
}

#[test]
fn entity_ids_are_unique() {
    let data = dataset();
    let mut ids = HashSet::new();
    let all = data
        .customers
        .iter()
        .map(|c| &c.customer_id)
        .chain(data.accounts.iter().map(|a| &a.account_id))
        .chain(data.merchants.iter().map(|m| &m.merchant_id))
        .chain(data.transactions.iter().map(|t| &t.transaction_id))
        .chain(data.disputes.iter().map(|d| &d.dispute_id));
    for id in all {
        assert!(ids.insert(id.clone()), "duplicate id {id}");
    }
}
