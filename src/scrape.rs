// src/scrape.rs
//
// Batch orchestration over the endpoint specs. Inventories go one player at
// a time; order books go in bounded waves. No IO beyond the Fetch collaborator.

use std::{collections::HashMap, thread};

use crate::{
    config::consts::MARKET_BATCH,
    core::Fetch,
    error::{Error, FetchError, Result},
    items::NormalizedItem,
    market::{self, FlaggedOrder, OrderBook, PriceSummary},
    progress::Progress,
    specs::{self, catalog::Catalog, players::PlayerSummary},
};

pub struct PlayerInventory {
    pub player: PlayerSummary,
    pub items: Result<Vec<NormalizedItem>>,
}

pub type BookResult = (String, Result<OrderBook>);

/// Fetch each player's inventory strictly in order, handing each result to
/// `on_player` as soon as it lands. A failure is reported and recorded for
/// that player only; the next player is still attempted.
pub fn inventories_in_order(
    fetch: &dyn Fetch,
    players: &[PlayerSummary],
    catalog: Option<&Catalog>,
    mut progress: Option<&mut dyn Progress>,
    mut on_player: impl FnMut(PlayerInventory),
) {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(players.len());
        p.log("Fetching inventories…");
    }

    for player in players {
        let items = specs::inventory::fetch(fetch, player, catalog);
        match &items {
            Ok(list) => {
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&player.id);
                    p.log(&format!("{}: {} items", player.name, list.len()));
                }
            }
            Err(e) => {
                loge!("Inventory {} ({}): {e}", player.name, player.id);
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&player.id, &format!("{}: {e}", player.name));
                }
            }
        }
        on_player(PlayerInventory { player: player.clone(), items });
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
}

pub fn collect_inventories(
    fetch: &dyn Fetch,
    players: &[PlayerSummary],
    catalog: Option<&Catalog>,
    progress: Option<&mut dyn Progress>,
) -> Vec<PlayerInventory> {
    let mut out = Vec::with_capacity(players.len());
    inventories_in_order(fetch, players, catalog, progress, |r| out.push(r));
    out
}

/// Fetch order books in waves of `MARKET_BATCH`, handing each finished wave
/// to `on_wave` before the next one starts.
pub fn order_book_waves(
    fetch: &dyn Fetch,
    item_ids: &[String],
    mut progress: Option<&mut dyn Progress>,
    mut on_wave: impl FnMut(Vec<BookResult>),
) {
    if let Some(p) = progress.as_deref_mut() {
        p.begin(item_ids.len());
    }

    for (n, wave) in item_ids.chunks(MARKET_BATCH).enumerate() {
        logd!("Market: wave {} ({} items)", n + 1, wave.len());
        let results: Vec<BookResult> = thread::scope(|s| {
            let handles: Vec<_> = wave
                .iter()
                .map(|id| (id, s.spawn(move || specs::market::item(fetch, id))))
                .collect();
            handles
                .into_iter()
                .map(|(id, h)| {
                    let r = h
                        .join()
                        .unwrap_or_else(|_| Err(Error::Fetch(FetchError::Transport(s!("worker panicked")))));
                    (id.clone(), r)
                })
                .collect()
        });

        if let Some(p) = progress.as_deref_mut() {
            for (id, r) in &results {
                match r {
                    Ok(_) => p.item_done(id),
                    Err(e) => {
                        loge!("Order book {id}: {e}");
                        p.item_failed(id, &e.to_string());
                    }
                }
            }
        }
        on_wave(results);
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
}

/// All order books for `item_ids`; failed lookups are left out.
pub fn fetch_order_books(
    fetch: &dyn Fetch,
    item_ids: &[String],
    progress: Option<&mut dyn Progress>,
) -> HashMap<String, OrderBook> {
    let mut books = HashMap::new();
    order_book_waves(fetch, item_ids, progress, |wave| {
        books.extend(wave.into_iter().filter_map(|(id, r)| Some((id, r.ok()?))));
    });
    books
}

/// Price summaries for one wave, failures dropped.
pub fn wave_prices(wave: Vec<BookResult>) -> Vec<(String, PriceSummary)> {
    wave.into_iter()
        .filter_map(|(id, r)| r.ok().map(|b| (id, b.summary())))
        .collect()
}

/// A player's orders with the cheapest-seller flag: one order-book lookup per
/// distinct item the player sells.
pub fn cheapest_orders(
    fetch: &dyn Fetch,
    player_id: &str,
    progress: Option<&mut dyn Progress>,
) -> Result<Vec<FlaggedOrder>> {
    let orders = specs::market::player(fetch, player_id)?;
    let ids = orders.sell_item_ids();
    logf!("Orders {player_id}: {} sell, {} buy, {} items to price", orders.sell.len(), orders.buy.len(), ids.len());
    let books = fetch_order_books(fetch, &ids, progress);
    Ok(market::flag_cheapest(&orders, &books))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Answers every path from a table; unknown paths are 404s.
    struct Table(Mutex<Vec<String>>, HashMap<String, String>);

    impl Fetch for Table {
        fn get(&self, path: &str) -> std::result::Result<String, FetchError> {
            if let Ok(mut seen) = self.0.lock() {
                seen.push(path.to_string());
            }
            self.1
                .get(path)
                .cloned()
                .ok_or_else(|| FetchError::Status { code: 404, url: path.to_string() })
        }
    }

    fn table(pairs: &[(&str, &str)]) -> Table {
        Table(Mutex::new(Vec::new()), pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn cheapest_uses_one_lookup_per_item() {
        let t = table(&[
            (
                "/api/market/player/9",
                r#"{"sellOrders":[
                    {"itemId":1,"priceThreshold":5,"quantity":1},
                    {"itemId":1,"priceThreshold":8,"quantity":1},
                    {"itemId":2,"priceThreshold":3,"quantity":1}]}"#,
            ),
            ("/api/market/item/1", r#"{"sellOrders":[{"priceThreshold":5,"quantity":4},{"priceThreshold":6,"quantity":1}]}"#),
        ]);
        let flagged = cheapest_orders(&t, "9", None).unwrap();
        let flags: Vec<Option<bool>> = flagged.iter().map(|f| f.cheapest).collect();
        assert_eq!(flags, [Some(true), Some(false), None]);

        let seen = t.0.lock().unwrap();
        assert_eq!(seen.iter().filter(|p| p.starts_with("/api/market/item/")).count(), 2);
    }
}
