// src/specs/mod.rs
//! # Endpoint "specs"
//!
//! One module per upstream endpoint family. Each spec knows **where the data
//! lives in the response** and how to pull it out tolerantly.
//!
//! ## What lives here
//! - The request path for the endpoint (always relative to the proxy base).
//! - **Envelope handling**: every body goes through `decode::body_to_value`, so
//!   graph-encoded and plain JSON answers look the same from here on.
//! - **Shape sniffing** as explicit enums tried in a fixed order, with an
//!   `Unrecognized` outcome that is logged instead of half-parsed.
//! - Light shaping into typed records (`PlayerSummary`, `MarketListing`, …).
//!
//! ## What does **not** live here
//! - Batching, ordering and failure isolation across players/items (`scrape`).
//! - Grouping, filtering, sorting (`aggregate`) and any GUI concern.
//!
//! ## Conventions
//! - Ids are strings. Upstream sends them as either strings or numbers.
//! - A payload that decodes but has no recognizable shape is **empty**, not an
//!   error; transport failures are errors.

use serde_json::Value;

pub mod catalog;
pub mod inventory;
pub mod market;
pub mod players;

/// Form-encode a query value (also used for id path segments).
pub fn encode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

/// Ids arrive as strings or numbers.
pub fn id_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// First of `keys` present on `v` as a non-null value.
pub fn field<'v>(v: &'v Value, keys: &[&str]) -> Option<&'v Value> {
    keys.iter().filter_map(|k| v.get(*k)).find(|x| !x.is_null())
}

pub fn str_field<'v>(v: &'v Value, keys: &[&str]) -> Option<&'v str> {
    keys.iter().filter_map(|k| v.get(*k)).find_map(Value::as_str).filter(|s| !s.is_empty())
}

pub fn id_field(v: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().filter_map(|k| v.get(*k)).find_map(id_string)
}

/// Non-negative whole number from a number or a digit string.
pub fn amount(v: &Value) -> Option<u64> {
    match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            let f = n.as_f64()?;
            (f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64).then_some(f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Some endpoints wrap their payload in `{ "data": … }`.
pub fn unwrap_data(v: &Value) -> &Value {
    match v.get("data") {
        Some(inner) if inner.is_object() || inner.is_array() => inner,
        _ => v,
    }
}
