// src/items/normalize.rs
//
// Raw record → NormalizedItem. Steps run in a fixed order and each one feeds
// the next:
//   name → skip-prefix → tier → rarity → base name → tag → quantity
// Any step may decide the record is noise; that's a skip (None), not an error.

use serde_json::Value;

use super::tables::{
    CURRENCY_MARKERS, SKIP_PREFIXES, TIER_NAMES, starts_with_word, tier_prefix,
};
use super::{NormalizedItem, Provenance, Rarity, RawItemRecord};
use crate::config::consts::DEFAULT_TAG;

pub const MIN_TIER: i8 = -1;
pub const MAX_TIER: i8 = 8;

pub fn normalize(raw: &RawItemRecord, from: &Provenance) -> Option<NormalizedItem> {
    let name = resolve_name(raw)?;

    if is_skipped_name(name) {
        logd!("Normalize: skip rank/collection entry {name:?}");
        return None;
    }

    let tier = resolve_tier(raw.tier.as_ref(), name);
    let rarity = normalize_rarity(raw.rarity.as_ref().filter(|v| v.is_string()).or(raw.rarity_str.as_ref()));
    let base_item = base_item_name(name).to_string();
    let tag = resolve_tag(raw.tag.as_ref());

    let Some(count) = parse_quantity(raw.quantity.as_ref().or(raw.count.as_ref())) else {
        logd!("Normalize: skip {name:?}, quantity {:?}", raw.quantity.as_ref().or(raw.count.as_ref()));
        return None;
    };

    Some(NormalizedItem {
        name: name.to_string(),
        tier,
        rarity,
        count,
        base_item,
        tag,
        player_id: from.player_id.clone(),
        player_name: from.player_name.clone(),
        location: from.location.clone(),
        from_package: false,
    })
}

fn resolve_name(raw: &RawItemRecord) -> Option<&str> {
    [raw.name.as_ref(), raw.item_name.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
}

pub fn is_skipped_name(name: &str) -> bool {
    SKIP_PREFIXES.iter().any(|p| starts_with_word(name, p))
}

/// Canonical tier from the raw field, falling back to the name.
pub fn resolve_tier(raw: Option<&Value>, name: &str) -> i8 {
    raw.and_then(tier_from_field).unwrap_or_else(|| tier_from_name(name))
}

fn tier_from_field(v: &Value) -> Option<i8> {
    match v {
        Value::String(s) => {
            let lc = s.to_lowercase();
            TIER_NAMES
                .iter()
                .find(|(n, _)| lc.contains(n))
                .map(|&(_, t)| t)
                .or_else(|| embedded_int(s).and_then(in_range))
        }
        Value::Number(n) => {
            let f = n.as_f64()?;
            if f.fract() != 0.0 {
                return None;
            }
            in_range(f as i64)
        }
        _ => None,
    }
}

fn in_range(t: i64) -> Option<i8> {
    (i64::from(MIN_TIER)..=i64::from(MAX_TIER)).contains(&t).then_some(t as i8)
}

/// First integer inside a string ("Tier 3" → 3, "T-1" → -1).
fn embedded_int(s: &str) -> Option<i64> {
    let bytes = s.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(bytes.len(), |n| start + n);
    let neg = start > 0 && bytes[start - 1] == b'-';
    let v: i64 = s[start..end].parse().ok()?;
    Some(if neg { -v } else { v })
}

pub fn tier_from_name(name: &str) -> i8 {
    if let Some((_, t)) = tier_prefix(name) {
        return t;
    }
    if CURRENCY_MARKERS.iter().any(|m| name.contains(m)) {
        return -1;
    }
    0
}

pub fn normalize_rarity(raw: Option<&Value>) -> Rarity {
    let Some(s) = raw.and_then(Value::as_str) else {
        return Rarity::Common;
    };
    let s = s.trim();
    Rarity::CANONICAL
        .into_iter()
        .find(|r| s.contains(r.as_str()))
        .unwrap_or_else(|| Rarity::Other(s.to_string()))
}

/// Item name with its leading tier word removed.
pub fn base_item_name(name: &str) -> &str {
    match tier_prefix(name) {
        Some((p, _)) => &name[p.len() + 1..],
        None => name,
    }
}

pub fn resolve_tag(raw: Option<&Value>) -> String {
    raw.and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_TAG)
        .to_string()
}

/// Positive integers only. Digit-only strings are parsed; everything else fails.
pub fn parse_quantity(raw: Option<&Value>) -> Option<u64> {
    let n = match raw? {
        Value::Number(n) => match n.as_u64() {
            Some(u) => u,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 || f < 1.0 || f > u64::MAX as f64 {
                    return None;
                }
                f as u64
            }
        },
        Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s.parse().ok()?,
        _ => return None,
    };
    (n > 0).then_some(n)
}
