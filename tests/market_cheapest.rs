// tests/market_cheapest.rs
mod common;

use common::FakeFetch;
use stash_scrape::market::Side;
use stash_scrape::progress::RecordingProgress;
use stash_scrape::scrape;

const PLAYER: &str = r#"{"data": {
    "sellOrders": [
        {"itemId": 10, "itemName": "Fine Rope", "priceThreshold": 40, "quantity": 2},
        {"itemId": 10, "itemName": "Fine Rope", "priceThreshold": 55, "quantity": 1},
        {"itemId": 11, "itemName": "Sand", "priceThreshold": 3, "quantity": 100},
        {"itemId": 12, "itemName": "Salt", "priceThreshold": 7, "quantity": 9}
    ],
    "buyOrders": [
        {"itemId": 10, "itemName": "Fine Rope", "priceThreshold": 1, "quantity": 5}
    ]
}}"#;

#[test]
fn ties_are_all_cheapest_and_failures_stay_unknown() {
    let fetch = FakeFetch::new()
        .ok("/api/market/player/p1", PLAYER)
        // Another seller matches our 40.
        .ok("/api/market/item/10", r#"{"sellOrders": [{"priceThreshold": 40, "quantity": 1}, {"priceThreshold": 90, "quantity": 1}]}"#)
        // Someone undercuts our Sand.
        .ok("/api/market/item/11", r#"{"sellOrders": [{"priceThreshold": 2, "quantity": 1}], "buyOrders": []}"#)
        .status("/api/market/item/12", 500);

    let mut rec = RecordingProgress::default();
    let flagged = scrape::cheapest_orders(&fetch, "p1", Some(&mut rec)).unwrap();

    let summary: Vec<(&str, Side, u64, Option<bool>)> = flagged
        .iter()
        .map(|f| (f.order.item_name.as_str(), f.order.side, f.order.price, f.cheapest))
        .collect();
    assert_eq!(
        summary,
        [
            ("Fine Rope", Side::Sell, 40, Some(true)),
            ("Fine Rope", Side::Sell, 55, Some(false)),
            ("Sand", Side::Sell, 3, Some(false)),
            ("Salt", Side::Sell, 7, None),
            ("Fine Rope", Side::Buy, 1, None),
        ]
    );

    // One lookup per distinct sold item.
    let book_calls = fetch.calls().iter().filter(|p| p.starts_with("/api/market/item/")).count();
    assert_eq!(book_calls, 3);
    assert_eq!(rec.failed.len(), 1);
    assert_eq!(rec.failed[0].0, "12");
}

#[test]
fn own_ask_alone_is_cheapest_when_book_is_empty() {
    let fetch = FakeFetch::new()
        .ok("/api/market/player/p2", r#"{"sellOrders": [{"itemId": 5, "price": 9, "quantity": 1}]}"#)
        .ok("/api/market/item/5", r#"{"sellOrders": []}"#);
    let flagged = scrape::cheapest_orders(&fetch, "p2", None).unwrap();
    assert_eq!(flagged.len(), 1);
    assert_eq!(flagged[0].cheapest, Some(true));
}

#[test]
fn player_lookup_failure_is_an_error() {
    let fetch = FakeFetch::new().status("/api/market/player/p3", 503);
    assert!(scrape::cheapest_orders(&fetch, "p3", None).is_err());
}
