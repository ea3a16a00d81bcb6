// src/specs/market.rs
//! Spec for the market endpoints.
//!
//! - `/api/market?hasSellOrders=&hasBuyOrders=` → listing rows. The array sits
//!   under `items`, `data.items`, or is the body itself.
//! - `/api/market/item/{id}` → the item's order book: `sellOrders` and
//!   `buyOrders`, possibly nested under `orders`.
//! - `/api/market/player/{id}` → the player's own orders, same two lists.
//!
//! Order records are loose. Price comes from `priceThreshold`, `price` or
//! `unitPrice`; an order without a price or quantity is dropped.

use serde_json::Value;

use super::{amount, encode, field, id_field, str_field, unwrap_data};
use crate::{
    config::{consts::API_PREFIX, options::MarketOptions},
    core::Fetch,
    decode::body_to_value,
    error::Result,
    items::normalize::{normalize_rarity, resolve_tag, resolve_tier},
    market::{MarketListing, Order, OrderBook, PlayerOrders, Side},
};

const ITEM_ID_KEYS: &[&str] = &["itemId", "item_id", "id"];
const ITEM_NAME_KEYS: &[&str] = &["itemName", "name"];
const PRICE_KEYS: &[&str] = &["priceThreshold", "price", "unitPrice"];
const QTY_KEYS: &[&str] = &["quantity", "amount", "count"];
const OWNER_ID_KEYS: &[&str] = &["ownerEntityId", "playerEntityId", "ownerId"];
const OWNER_NAME_KEYS: &[&str] = &["ownerUsername", "playerName", "username"];
const LOCATION_KEYS: &[&str] = &["claimName", "regionName", "location"];

pub fn listing(fetch: &dyn Fetch, opts: &MarketOptions) -> Result<Vec<MarketListing>> {
    let path = format!(
        "{API_PREFIX}/market?hasSellOrders={}&hasBuyOrders={}",
        opts.has_sell_orders, opts.has_buy_orders
    );
    let body = fetch.get(&path)?;
    let rows = body_to_value(&body, "market listing")
        .map(|v| parse_listing(&v))
        .unwrap_or_default();
    logf!("Market: {} listings", rows.len());
    Ok(rows)
}

pub fn item(fetch: &dyn Fetch, item_id: &str) -> Result<OrderBook> {
    let body = fetch.get(&format!("{API_PREFIX}/market/item/{}", encode(item_id)))?;
    Ok(body_to_value(&body, "order book")
        .map(|v| parse_order_book(&v, item_id))
        .unwrap_or_else(|| OrderBook { item_id: item_id.to_string(), ..OrderBook::default() }))
}

pub fn player(fetch: &dyn Fetch, player_id: &str) -> Result<PlayerOrders> {
    let body = fetch.get(&format!("{API_PREFIX}/market/player/{}", encode(player_id)))?;
    Ok(body_to_value(&body, "player orders")
        .map(|v| parse_player_orders(&v, player_id))
        .unwrap_or_else(|| PlayerOrders { player_id: player_id.to_string(), ..PlayerOrders::default() }))
}

pub fn parse_listing(v: &Value) -> Vec<MarketListing> {
    let v = unwrap_data(v);
    let list = match v {
        Value::Array(a) => a,
        _ => match v.get("items").and_then(Value::as_array) {
            Some(a) => a,
            None => {
                logw!("Market: unrecognized listing payload");
                return Vec::new();
            }
        },
    };
    list.iter().filter_map(listing_row).collect()
}

fn listing_row(v: &Value) -> Option<MarketListing> {
    let id = id_field(v, ITEM_ID_KEYS)?;
    let name = str_field(v, ITEM_NAME_KEYS)?.to_string();
    let rarity = field(v, &["rarity", "rarityStr"]).filter(|r| r.is_string());

    Some(MarketListing {
        tier: resolve_tier(v.get("tier"), &name),
        rarity: normalize_rarity(rarity),
        tag: resolve_tag(v.get("tag")),
        sell_orders: order_count(v, "sellOrders", "sellOrderCount"),
        buy_orders: order_count(v, "buyOrders", "buyOrderCount"),
        id,
        name,
    })
}

/// `sellOrders: 3`, `sellOrders: [...]`, or `sellOrderCount: 3`.
fn order_count(v: &Value, key: &str, count_key: &str) -> u64 {
    match v.get(key) {
        Some(Value::Array(a)) => a.len() as u64,
        Some(n) if amount(n).is_some() => amount(n).unwrap_or(0),
        _ => v.get(count_key).and_then(amount).unwrap_or(0),
    }
}

pub fn parse_order_book(v: &Value, item_id: &str) -> OrderBook {
    let (sell, buy) = order_lists(v, Some(item_id));
    OrderBook { item_id: item_id.to_string(), sell, buy }
}

pub fn parse_player_orders(v: &Value, player_id: &str) -> PlayerOrders {
    let (sell, buy) = order_lists(v, None);
    PlayerOrders { player_id: player_id.to_string(), sell, buy }
}

fn order_lists(v: &Value, item_id: Option<&str>) -> (Vec<Order>, Vec<Order>) {
    let v = unwrap_data(v);
    let v = v.get("orders").filter(|o| o.is_object()).unwrap_or(v);
    if v.get("sellOrders").is_none() && v.get("buyOrders").is_none() {
        logw!("Market: no order lists in payload");
    }

    // Item-level metadata for books that only carry prices.
    let item_name = v.get("item").and_then(|it| str_field(it, ITEM_NAME_KEYS)).or_else(|| str_field(v, &["itemName"]));

    let side = |key: &str, side: Side| -> Vec<Order> {
        v.get(key)
            .and_then(Value::as_array)
            .map(|list| list.iter().filter_map(|o| order(o, side, item_id, item_name)).collect())
            .unwrap_or_default()
    };
    (side("sellOrders", Side::Sell), side("buyOrders", Side::Buy))
}

fn order(v: &Value, side: Side, item_id: Option<&str>, item_name: Option<&str>) -> Option<Order> {
    let item_id = match item_id {
        Some(id) => id.to_string(),
        None => id_field(v, ITEM_ID_KEYS)?,
    };
    let price = field(v, PRICE_KEYS).and_then(amount)?;
    let quantity = field(v, QTY_KEYS).and_then(amount)?;
    let item_name = str_field(v, ITEM_NAME_KEYS)
        .or_else(|| v.get("item").and_then(|it| str_field(it, ITEM_NAME_KEYS)))
        .or(item_name)
        .map_or_else(|| item_id.clone(), str::to_string);

    Some(Order {
        item_name,
        item_id,
        side,
        price,
        quantity,
        location: str_field(v, LOCATION_KEYS).unwrap_or_default().to_string(),
        owner_id: id_field(v, OWNER_ID_KEYS),
        owner_name: str_field(v, OWNER_NAME_KEYS).map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::Rarity;
    use serde_json::json;

    #[test]
    fn listing_rows() {
        let v = json!({"data": {"items": [
            {"id": 7, "name": "Simple Ingot", "tier": 2, "rarity": "Rare", "tag": "Ingot", "sellOrders": 3, "buyOrders": [{}, {}]},
            {"itemId": "8", "itemName": "Rough Plank", "tier": 40, "sellOrderCount": 1},
            {"name": "no id"}
        ]}});
        let rows = parse_listing(&v);
        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].id.as_str(), rows[0].tier, rows[0].sell_orders, rows[0].buy_orders), ("7", 2, 3, 2));
        assert_eq!(rows[0].rarity, Rarity::Rare);
        assert_eq!((rows[1].tier, rows[1].sell_orders, rows[1].tag.as_str()), (0, 1, "Other"));
    }

    #[test]
    fn bare_array_listing() {
        assert_eq!(parse_listing(&json!([{"id": 1, "name": "Sand"}])).len(), 1);
        assert!(parse_listing(&json!({"nope": 1})).is_empty());
    }

    #[test]
    fn order_book_nested_under_orders() {
        let v = json!({
            "item": {"name": "Fine Rope"},
            "orders": {
                "sellOrders": [
                    {"priceThreshold": 12, "quantity": 5, "ownerEntityId": 1, "ownerUsername": "Ayla", "claimName": "Port"},
                    {"price": "9", "quantity": 1},
                    {"quantity": 1}
                ],
                "buyOrders": [{"unitPrice": 4, "quantity": 2}]
            }
        });
        let book = parse_order_book(&v, "55");
        assert_eq!(book.sell.len(), 2);
        assert_eq!(book.sell[0].item_name, "Fine Rope");
        assert_eq!(book.sell[0].owner_id.as_deref(), Some("1"));
        assert_eq!(book.sell[0].location, "Port");
        assert_eq!(book.lowest_sell(), Some(9));
        assert_eq!(book.highest_buy(), Some(4));
    }

    #[test]
    fn player_orders_need_item_ids() {
        let v = json!({
            "sellOrders": [
                {"itemId": 3, "itemName": "Sand", "priceThreshold": 2, "quantity": 10},
                {"itemName": "Mystery", "priceThreshold": 2, "quantity": 1}
            ],
            "buyOrders": [{"itemId": "4", "price": 1, "quantity": 1}]
        });
        let o = parse_player_orders(&v, "me");
        assert_eq!(o.sell.len(), 1);
        assert_eq!(o.sell[0].item_id, "3");
        assert_eq!(o.buy[0].item_name, "4");
    }
}
