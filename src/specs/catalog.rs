// src/specs/catalog.rs
//! Spec for the global item catalog (`/api/items`).
//!
//! The catalog maps item id → metadata object (name, tier, rarity, tag).
//! It arrives as an array of objects carrying an id, or as an object keyed
//! by id. Inventory pockets that only carry `itemId` are joined against it.

use std::collections::HashMap;

use serde_json::Value;

use super::{id_field, unwrap_data};
use crate::{config::consts::API_PREFIX, core::Fetch, decode::body_to_value, error::Result};

pub type Catalog = HashMap<String, Value>;

const ID_KEYS: &[&str] = &["id", "itemId"];

pub fn fetch(fetch: &dyn Fetch) -> Result<Catalog> {
    let body = fetch.get(&format!("{API_PREFIX}/items"))?;
    let catalog = body_to_value(&body, "item catalog")
        .map(|v| parse(&v))
        .unwrap_or_default();
    logf!("Catalog: {} items", catalog.len());
    Ok(catalog)
}

/// Accepts `[{id, ...}]`, `{items: [...]}`, or `{id: {...}}`.
pub fn parse(v: &Value) -> Catalog {
    let v = unwrap_data(v);
    let v = v.get("items").filter(|x| x.is_array() || x.is_object()).unwrap_or(v);
    match v {
        Value::Array(list) => list
            .iter()
            .filter_map(|it| Some((id_field(it, ID_KEYS)?, it.clone())))
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter(|(_, it)| it.is_object())
            .map(|(k, it)| (k.clone(), it.clone()))
            .collect(),
        _ => Catalog::new(),
    }
}
