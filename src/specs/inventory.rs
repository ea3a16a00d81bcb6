// src/specs/inventory.rs
//! Spec for a player's inventories (`/api/players/{id}/inventories`).
//!
//! Three historical shapes are in circulation; they're tried in this order:
//!
//! 1. `CatalogJoin`: `inventories[].pockets[].contents { itemId, quantity }`
//!    with per-item metadata in a top-level `items` map/array.
//! 2. `Pockets`: the same containers, but `contents` carries the item fields.
//! 3. `Flat`: a top-level `items` array of records, each with an optional
//!    `location`.
//!
//! Anything else is `Unrecognized`: logged, and the player shows no items.
//! Empty pockets (`contents: null`) are skipped.

use serde_json::{Map, Value};

use super::catalog::{self, Catalog};
use super::players::PlayerSummary;
use super::{encode, id_field, str_field, unwrap_data};
use crate::{
    config::consts::{API_PREFIX, DEFAULT_LOCATION},
    core::Fetch,
    decode::body_to_value,
    error::Result,
    items::{self, NormalizedItem, Provenance, RawItemRecord},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InventoryShape {
    CatalogJoin,
    Pockets,
    Flat,
    Unrecognized,
}

/// One raw record plus the container it was found in.
#[derive(Clone, Debug, PartialEq)]
pub struct Pocket {
    pub record: Value,
    pub location: String,
}

const ITEM_ID_KEYS: &[&str] = &["itemId", "item_id", "id"];
const CONTAINER_NAME_KEYS: &[&str] = &["inventoryName", "name"];

pub fn fetch(fetch: &dyn Fetch, player: &PlayerSummary, external: Option<&Catalog>) -> Result<Vec<NormalizedItem>> {
    let body = fetch.get(&format!("{API_PREFIX}/players/{}/inventories", encode(&player.id)))?;
    let Some(v) = body_to_value(&body, "inventory") else {
        return Ok(Vec::new());
    };
    Ok(normalize_payload(&v, player, external))
}

/// Decoded payload → normalized items for one player, packages expanded
/// alongside their originals.
pub fn normalize_payload(v: &Value, player: &PlayerSummary, external: Option<&Catalog>) -> Vec<NormalizedItem> {
    let (shape, pockets) = pockets(v, external);
    let total = pockets.len();

    let items: Vec<NormalizedItem> = pockets
        .into_iter()
        .filter_map(|p| {
            let from = Provenance {
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                location: p.location,
            };
            items::normalize(&RawItemRecord::from_value(&p.record), &from)
        })
        .collect();

    logf!(
        "Inventory: {} ({}) shape={:?} pockets={} kept={}",
        player.name, player.id, shape, total, items.len()
    );
    items::expand_batch(items)
}

pub fn sniff(v: &Value) -> InventoryShape {
    let has_containers = v.get("inventories").is_some_and(Value::is_array);
    let has_item_meta = v.get("items").is_some_and(|x| x.is_object() || x.is_array());

    if has_containers && has_item_meta {
        InventoryShape::CatalogJoin
    } else if has_containers {
        InventoryShape::Pockets
    } else if v.get("items").is_some_and(Value::is_array) {
        InventoryShape::Flat
    } else {
        InventoryShape::Unrecognized
    }
}

/// Flatten a payload into raw pocket records. `external` fills in metadata
/// for id-only pockets when the payload doesn't carry its own.
pub fn pockets(v: &Value, external: Option<&Catalog>) -> (InventoryShape, Vec<Pocket>) {
    let mut root = v;
    let mut shape = sniff(root);
    if shape == InventoryShape::Unrecognized {
        root = unwrap_data(v);
        shape = sniff(root);
    }

    let out = match shape {
        InventoryShape::CatalogJoin => {
            let local = root.get("items").map(catalog::parse).unwrap_or_default();
            container_pockets(root, Some(&local).filter(|c| !c.is_empty()).or(external))
        }
        InventoryShape::Pockets => container_pockets(root, external),
        InventoryShape::Flat => flat_pockets(root),
        InventoryShape::Unrecognized => {
            logw!("Inventory: unrecognized payload shape");
            Vec::new()
        }
    };
    (shape, out)
}

fn container_pockets(root: &Value, meta: Option<&Catalog>) -> Vec<Pocket> {
    let mut out = Vec::new();
    let containers = root.get("inventories").and_then(Value::as_array).map(Vec::as_slice).unwrap_or(&[]);

    for c in containers {
        let location = str_field(c, CONTAINER_NAME_KEYS).unwrap_or(DEFAULT_LOCATION);
        let Some(pockets) = c.get("pockets").and_then(Value::as_array) else { continue };

        for p in pockets {
            let Some(contents) = p.get("contents").filter(|x| x.is_object()) else { continue };
            out.push(Pocket { record: join_meta(contents, meta), location: location.to_string() });
        }
    }
    out
}

/// Overlay pocket contents onto catalog metadata for its item id.
/// Contents that already name their item are left alone.
fn join_meta(contents: &Value, meta: Option<&Catalog>) -> Value {
    let named = str_field(contents, &["name", "itemName"]).is_some();
    let found = meta.zip(id_field(contents, ITEM_ID_KEYS)).and_then(|(m, id)| m.get(&id));

    match (named, found) {
        (false, Some(Value::Object(base))) => {
            let mut merged: Map<String, Value> = base.clone();
            if let Some(own) = contents.as_object() {
                for (k, v) in own {
                    if !v.is_null() {
                        merged.insert(k.clone(), v.clone());
                    }
                }
            }
            Value::Object(merged)
        }
        _ => contents.clone(),
    }
}

fn flat_pockets(root: &Value) -> Vec<Pocket> {
    root.get("items")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter(|it| it.is_object())
                .map(|it| Pocket {
                    record: it.clone(),
                    location: str_field(it, &["location"]).unwrap_or(DEFAULT_LOCATION).to_string(),
                })
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ayla() -> PlayerSummary {
        PlayerSummary { id: "1".into(), name: "Ayla".into() }
    }

    #[test]
    fn sniff_order() {
        assert_eq!(sniff(&json!({"inventories": [], "items": {}})), InventoryShape::CatalogJoin);
        assert_eq!(sniff(&json!({"inventories": []})), InventoryShape::Pockets);
        assert_eq!(sniff(&json!({"items": []})), InventoryShape::Flat);
        assert_eq!(sniff(&json!({"stuff": []})), InventoryShape::Unrecognized);
    }

    #[test]
    fn catalog_join_fills_metadata() {
        let v = json!({
            "inventories": [{
                "inventoryName": "Bank",
                "pockets": [
                    {"contents": {"itemId": 10, "quantity": 4}},
                    {"contents": null},
                    {"contents": {"itemId": 99, "quantity": 1}}
                ]
            }],
            "items": {"10": {"name": "Rough Plank", "tier": 0, "rarity": "Common", "tag": "Plank"}}
        });
        let items = normalize_payload(&v, &ayla(), None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Rough Plank");
        assert_eq!(items[0].count, 4);
        assert_eq!(items[0].location, "Bank");
        assert_eq!(items[0].tag, "Plank");
    }

    #[test]
    fn inline_pockets_and_external_catalog() {
        let v = json!({"inventories": [{
            "pockets": [
                {"contents": {"name": "Simple Clay Lump Package", "quantity": 2}},
                {"contents": {"itemId": "5", "quantity": "3"}}
            ]
        }]});
        let mut cat = Catalog::new();
        cat.insert("5".into(), json!({"name": "Hex Coin"}));
        let items = normalize_payload(&v, &ayla(), Some(&cat));

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Simple Clay Lump Package", "Hex Coin", "Simple Clay Lump"]);
        assert_eq!(items[1].tier, -1);
        assert_eq!(items[1].location, "Inventory");
        assert_eq!(items[2].count, 1000);
    }

    #[test]
    fn flat_shape_under_data() {
        let v = json!({"data": {"items": [
            {"itemName": "Fine Rope", "count": 2, "location": "Cart"},
            {"itemName": "Expert Carpenter", "count": 1}
        ]}});
        let items = normalize_payload(&v, &ayla(), None);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].location, "Cart");
        assert_eq!(items[0].tier, 4);
    }

    #[test]
    fn unrecognized_is_empty() {
        assert!(normalize_payload(&json!({"oops": true}), &ayla(), None).is_empty());
    }
}
