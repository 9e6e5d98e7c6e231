//! Deterministic fake-data provider using curated word lists.
//!
//! Provides people, companies, contact details, network addresses and
//! filler prose. All generation is deterministic (same RNG seed = same output).

use crate::rng::DataRng;
use chrono::{Duration, NaiveDate};

/// Deterministic fake-data generator using curated lists
pub struct NameGenerator;

impl NameGenerator {
    /// Generate a full name (first + last) deterministically
    pub fn full_name(rng: &mut DataRng) -> String {
        let first = Self::first_name(rng);
        let last = Self::last_name(rng);
        format!("{first} {last}")
    }

    pub fn first_name(rng: &mut DataRng) -> &'static str {
        *rng.choose(FIRST_NAMES)
    }

    pub fn last_name(rng: &mut DataRng) -> &'static str {
        *rng.choose(LAST_NAMES)
    }

    /// Email drawn independently of the customer's full name,
    /// e.g. `maria.okafor27@example.org`.
    pub fn email(rng: &mut DataRng) -> String {
        let first = Self::first_name(rng).to_lowercase();
        let last = Self::last_name(rng).to_lowercase();
        let suffix = rng.range_inclusive(1, 99);
        let domain = rng.choose(EMAIL_DOMAINS);
        format!("{first}.{last}{suffix}@{domain}")
    }

    /// E.164-shaped number: `+` then 11 or 12 digits, no leading zero.
    pub fn phone_e164(rng: &mut DataRng) -> String {
        let len = rng.range_inclusive(11, 12) as usize;
        let mut out = String::with_capacity(len + 1);
        out.push('+');
        out.push(char::from(b'1' + rng.next_u64_below(9) as u8));
        for _ in 1..len {
            out.push(char::from(b'0' + rng.next_u64_below(10) as u8));
        }
        out
    }

    /// Birth date for someone aged `min_age..=max_age` on `today`.
    pub fn date_of_birth(
        rng: &mut DataRng,
        today: NaiveDate,
        min_age: i64,
        max_age: i64,
    ) -> NaiveDate {
        let youngest = today - Duration::days(min_age * 365);
        let oldest = today - Duration::days((max_age + 1) * 365 - 1);
        let span = (youngest - oldest).num_days();
        oldest + Duration::days(rng.range_inclusive(0, span))
    }

    /// Business name: "Prefix Industry Suffix" or "LastName Industry Suffix".
    pub fn company_name(rng: &mut DataRng) -> String {
        let industry = rng.choose(BUSINESS_INDUSTRIES);
        let suffix = rng.choose(BUSINESS_SUFFIXES);
        if rng.chance(0.5) {
            let prefix = rng.choose(BUSINESS_PREFIXES);
            format!("{prefix} {industry} {suffix}")
        } else {
            format!("{} {industry} {suffix}", Self::last_name(rng))
        }
    }

    /// Public IPv4 address. Redraws until outside reserved space.
    pub fn ipv4_public(rng: &mut DataRng) -> String {
        loop {
            let bits = rng.next_u64() as u32;
            let o = bits.to_be_bytes();
            if is_public(o) {
                return format!("{}.{}.{}.{}", o[0], o[1], o[2], o[3]);
            }
        }
    }

    /// A capitalised sentence of roughly `nb_words` words (±40%).
    pub fn sentence(rng: &mut DataRng, nb_words: usize) -> String {
        let spread = (nb_words as f64 * 0.4).round() as i64;
        let lo = (nb_words as i64 - spread).max(1);
        let hi = nb_words as i64 + spread;
        let count = rng.range_inclusive(lo, hi) as usize;

        let mut words: Vec<String> = Vec::with_capacity(count);
        for i in 0..count {
            let w = *rng.choose(LOREM_WORDS);
            if i == 0 {
                let mut chars = w.chars();
                let cap = chars
                    .next()
                    .map(|c| c.to_uppercase().collect::<String>() + chars.as_str())
                    .unwrap_or_default();
                words.push(cap);
            } else {
                words.push(w.to_string());
            }
        }
        format!("{}.", words.join(" "))
    }
}

fn is_public(o: [u8; 4]) -> bool {
    !matches!(
        o,
        [0, ..]
            | [10, ..]
            | [127, ..]
            | [169, 254, ..]
            | [192, 168, ..]
            | [192, 0, 0, _]
            | [192, 0, 2, _]
            | [198, 51, 100, _]
            | [203, 0, 113, _]
    ) && !(o[0] == 172 && (16..=31).contains(&o[1]))
        && !(o[0] == 100 && (64..=127).contains(&o[1]))
        && !(o[0] == 198 && (18..=19).contains(&o[1]))
        && o[0] < 224
}

const FIRST_NAMES: &[&str] = &[
    "Aarav", "Abigail", "Adebayo", "Aisha", "Alejandro", "Amara", "Amelia", "Ananya",
    "Andrei", "Arjun", "Beatriz", "Benjamin", "Camila", "Chen", "Chloe", "Daniel",
    "Diego", "Elena", "Emeka", "Emma", "Ethan", "Fatima", "Felix", "Gabriel",
    "Grace", "Hana", "Hiroshi", "Ibrahim", "Ingrid", "Isabella", "Jamal", "James",
    "Javier", "Jin", "Johanna", "Karim", "Kavya", "Kwame", "Laila", "Leon",
    "Lucas", "Maria", "Mateo", "Mei", "Mohammed", "Nadia", "Nikhil", "Noah",
    "Olivia", "Omar", "Priya", "Rahul", "Rania", "Ravi", "Sakura", "Samuel",
    "Sofia", "Sven", "Tariq", "Thomas", "Valentina", "Wei", "Yusuf", "Zara",
];

const LAST_NAMES: &[&str] = &[
    "Abdullah", "Adeyemi", "Almeida", "Andersson", "Bauer", "Bose", "Brown", "Castillo",
    "Chatterjee", "Chen", "Clarke", "Costa", "Dubois", "Evans", "Fernandes", "Fischer",
    "Garcia", "Gupta", "Haddad", "Hansen", "Hughes", "Iyer", "Jansen", "Kapoor",
    "Khan", "Kim", "Kowalski", "Lam", "Larsen", "Lopez", "Mahmoud", "Martin",
    "Mehta", "Meyer", "Morales", "Murphy", "Nair", "Nakamura", "Nguyen", "Novak",
    "Okafor", "Olsen", "Patel", "Perez", "Rahman", "Reddy", "Rossi", "Santos",
    "Schmidt", "Shah", "Silva", "Singh", "Suzuki", "Tan", "Taylor", "Wagner",
    "Walker", "Wang", "Weber", "Williams", "Wong", "Yamamoto", "Yilmaz", "Zhang",
];

const EMAIL_DOMAINS: &[&str] = &["example.com", "example.org", "example.net"];

const BUSINESS_PREFIXES: &[&str] = &[
    "Apex", "Blue", "Bright", "Central", "Coastal", "Crown", "First", "Global",
    "Harbor", "Metro", "Northern", "Prime", "Silver", "Summit", "United", "Urban",
];

const BUSINESS_SUFFIXES: &[&str] = &[
    "LLC", "Inc", "Ltd", "Co", "Group", "Partners", "Holdings", "Trading",
    "Services", "Pvt Ltd", "GmbH", "SARL",
];

const BUSINESS_INDUSTRIES: &[&str] = &[
    "Grocers", "Bistro", "Electronics", "Transit", "Telecom", "Pharmacy", "Apparel",
    "Books", "Coffee", "Fuel", "Hardware", "Travel", "Gaming", "Florists", "Bakery",
    "Cinemas", "Outfitters", "Marketplace",
];

const LOREM_WORDS: &[&str] = &[
    "queue", "backlog", "processor", "flow", "record", "retry", "batch", "commit",
    "cluster", "node", "session", "handshake", "latency", "threshold", "buffer",
    "payload", "schema", "route", "relationship", "penalty", "yield", "connection",
    "timeout", "repository", "content", "provenance", "attribute", "controller",
    "service", "pool", "window", "partition", "offset", "consumer", "producer",
    "ledger", "posting", "settlement", "dispute", "merchant", "account", "exceeded",
    "failed", "completed", "delayed", "restored", "scheduled", "throttled", "the",
    "a", "for", "with", "after", "during", "on", "was", "is", "has",
];
