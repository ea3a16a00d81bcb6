// benches/decode.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use serde_json::{Value, json};

use stash_scrape::{decode, specs::inventory, specs::players::PlayerSummary};

const NAMES: [&str; 6] = ["Rough Plank", "Simple Clay Lump", "Fine Rope", "Sturdy Ingot", "Sand", "Simple Clay Lump Package"];

/// A graph-encoded inventory with `pockets` filled pockets. Names are shared
/// slots, so most pockets point back at the same strings.
fn sample(pockets: usize) -> String {
    let mut slots: Vec<Value> = vec![json!({"inventories": 1}), json!([2]), json!({"inventoryName": 3, "pockets": 4}), json!("Bank")];
    let names_at = 5;
    let list_at = 4;
    slots.push(Value::Null); // pocket list, filled below
    for n in NAMES {
        slots.push(json!(n));
    }
    let mut list = Vec::with_capacity(pockets);
    for i in 0..pockets {
        let pocket = slots.len();
        slots.push(json!({"contents": pocket + 1}));
        slots.push(json!({"name": names_at + i % NAMES.len(), "quantity": pocket + 2, "rarity": -1}));
        slots.push(json!(1 + i % 50));
        list.push(pocket);
    }
    slots[list_at] = json!(list);
    json!({"nodes": [{"type": "data", "data": slots}]}).to_string()
}

fn bench_decode(c: &mut Criterion) {
    let body = sample(2_000);
    let player = PlayerSummary { id: "1".into(), name: "Bench".into() };

    c.bench_function("envelope_to_value", |b| {
        b.iter(|| black_box(decode::body_to_value(black_box(&body), "bench")).is_some())
    });

    let v = decode::body_to_value(&body, "bench").unwrap_or(Value::Null);
    c.bench_function("normalize_inventory", |b| {
        b.iter(|| inventory::normalize_payload(black_box(&v), &player, None).len())
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
