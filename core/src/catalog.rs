//! Reference lists shared by several generators.

pub const COUNTRIES: &[&str] = &["US", "IN", "GB", "SG", "AE", "DE", "FR"];

pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "SGD", "AED"];

/// Merchant category codes: grocery, restaurants, misc retail, commuter
/// transport, telecom, financial institutions, electronics.
pub const MCCS: &[&str] = &["5411", "5812", "5999", "4111", "4812", "6012", "5732"];

pub const FX_PROVIDERS: &[&str] = &["provider_a", "provider_b"];
