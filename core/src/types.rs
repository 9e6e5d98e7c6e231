//! Shared primitive types used across the generators.

/// Canonical hyphenated UUID string identifying any generated entity.
pub type EntityId = String;

/// Integer currency amount in minor units (cents, paise, fils...).
pub type MinorUnits = i64;

/// ISO 4217 alphabetic currency code.
pub type CurrencyCode = String;
