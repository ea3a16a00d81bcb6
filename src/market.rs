// src/market.rs
//
// Market listings, order books and a player's own orders, plus the
// cheapest-seller flag and the board the Market tab renders from.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use crate::config::options::{Filters, SortKey, SortSpec};
use crate::items::Rarity;
use crate::viewer::{Generation, Ticket};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Sell,
    Buy,
}

impl Side {
    pub fn as_str(self) -> &'static str {
        match self {
            Side::Sell => "Sell",
            Side::Buy => "Buy",
        }
    }
}

/// One row of the global market listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MarketListing {
    pub id: String,
    pub name: String,
    pub tier: i8,
    pub rarity: Rarity,
    pub tag: String,
    pub sell_orders: u64,
    pub buy_orders: u64,
}

impl MarketListing {
    pub fn total_orders(&self) -> u64 {
        self.sell_orders.saturating_add(self.buy_orders)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Order {
    pub item_id: String,
    pub item_name: String,
    pub side: Side,
    pub price: u64,
    pub quantity: u64,
    pub location: String,
    pub owner_id: Option<String>,
    pub owner_name: Option<String>,
}

/// Every open order for one item.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderBook {
    pub item_id: String,
    pub sell: Vec<Order>,
    pub buy: Vec<Order>,
}

impl OrderBook {
    pub fn lowest_sell(&self) -> Option<u64> {
        self.sell.iter().map(|o| o.price).min()
    }

    pub fn highest_buy(&self) -> Option<u64> {
        self.buy.iter().map(|o| o.price).max()
    }

    pub fn summary(&self) -> PriceSummary {
        PriceSummary { lowest_sell: self.lowest_sell(), highest_buy: self.highest_buy() }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceSummary {
    pub lowest_sell: Option<u64>,
    pub highest_buy: Option<u64>,
}

/// A player's open orders, both sides.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlayerOrders {
    pub player_id: String,
    pub sell: Vec<Order>,
    pub buy: Vec<Order>,
}

impl PlayerOrders {
    /// Distinct item ids among the sell orders, sorted. One order-book
    /// lookup is needed per id.
    pub fn sell_item_ids(&self) -> Vec<String> {
        let ids: BTreeSet<&str> = self.sell.iter().map(|o| o.item_id.as_str()).collect();
        ids.into_iter().map(str::to_string).collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlaggedOrder {
    pub order: Order,
    /// `None` when the item's book is unknown (not fetched, or the fetch
    /// failed) and for buy orders.
    pub cheapest: Option<bool>,
}

/// Flag each sell order whose price equals the item's lowest observed ask.
/// The minimum covers the fetched book and the player's own asks for that
/// item, so every tied order is cheapest.
pub fn flag_cheapest(orders: &PlayerOrders, books: &HashMap<String, OrderBook>) -> Vec<FlaggedOrder> {
    let mut own_min: HashMap<&str, u64> = HashMap::new();
    for o in &orders.sell {
        own_min
            .entry(o.item_id.as_str())
            .and_modify(|m| *m = (*m).min(o.price))
            .or_insert(o.price);
    }

    let floor = |item_id: &str| -> Option<u64> {
        let book = books.get(item_id)?;
        let own = own_min.get(item_id).copied();
        match (book.lowest_sell(), own) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    };

    let sells = orders.sell.iter().map(|o| FlaggedOrder {
        order: o.clone(),
        cheapest: floor(&o.item_id).map(|min| o.price == min),
    });
    let buys = orders.buy.iter().map(|o| FlaggedOrder { order: o.clone(), cheapest: None });
    sells.chain(buys).collect()
}

pub fn listing_matches(l: &MarketListing, f: &Filters) -> bool {
    f.matches(&l.name, l.tier, &l.rarity, &l.tag)
}

/// `SortKey::Count` orders listings by total open orders.
pub fn sort_listings(rows: &mut [&MarketListing], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let primary = match sort.key {
            SortKey::Name => by_name(a, b),
            SortKey::Tier => a.tier.cmp(&b.tier),
            SortKey::Rarity => a.rarity.rank().cmp(&b.rarity.rank()),
            SortKey::Count => a.total_orders().cmp(&b.total_orders()),
        };
        let primary = if sort.descending { primary.reverse() } else { primary };
        primary.then_with(|| by_name(a, b))
    });
}

fn by_name(a: &MarketListing, b: &MarketListing) -> Ordering {
    a.name
        .to_lowercase()
        .cmp(&b.name.to_lowercase())
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}

/// Listings plus whatever price summaries have arrived for them.
#[derive(Debug, Default)]
pub struct MarketBoard {
    listings: Vec<MarketListing>,
    prices: HashMap<String, PriceSummary>,
    generation: Generation,
}

impl MarketBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listings(&self) -> &[MarketListing] {
        &self.listings
    }

    pub fn price(&self, id: &str) -> Option<&PriceSummary> {
        self.prices.get(id)
    }

    /// Start a fresh listing load. Outstanding price waves go stale.
    pub fn begin_load(&mut self) -> Ticket {
        self.generation.bump()
    }

    pub fn ticket(&self) -> Ticket {
        self.generation.ticket()
    }

    pub fn apply_listings(&mut self, ticket: Ticket, listings: Vec<MarketListing>) -> bool {
        if !self.generation.is_current(ticket) {
            logd!("Market: dropped stale listing ({} rows)", listings.len());
            return false;
        }
        self.listings = listings;
        self.prices.clear();
        true
    }

    /// Apply one wave of price summaries.
    pub fn apply_prices(&mut self, ticket: Ticket, wave: impl IntoIterator<Item = (String, PriceSummary)>) -> bool {
        if !self.generation.is_current(ticket) {
            logd!("Market: dropped stale price wave");
            return false;
        }
        self.prices.extend(wave);
        true
    }

    /// Ids from `visible` with no price summary yet, in the given order.
    pub fn missing_prices<'a>(&self, visible: impl IntoIterator<Item = &'a MarketListing>) -> Vec<String> {
        visible
            .into_iter()
            .filter(|l| !self.prices.contains_key(&l.id))
            .map(|l| l.id.clone())
            .collect()
    }

    pub fn view(&self, filters: &Filters, sort: SortSpec) -> Vec<&MarketListing> {
        let mut rows: Vec<&MarketListing> = self.listings.iter().filter(|l| listing_matches(l, filters)).collect();
        sort_listings(&mut rows, sort);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(item: &str, side: Side, price: u64, owner: &str) -> Order {
        Order {
            item_id: item.into(),
            item_name: format!("Item {item}"),
            side,
            price,
            quantity: 1,
            location: "Port".into(),
            owner_id: Some(owner.into()),
            owner_name: None,
        }
    }

    fn book(item: &str, sells: &[u64]) -> OrderBook {
        OrderBook {
            item_id: item.into(),
            sell: sells.iter().map(|&p| order(item, Side::Sell, p, "other")).collect(),
            buy: vec![],
        }
    }

    fn listing(id: &str, name: &str, tier: i8, sells: u64) -> MarketListing {
        MarketListing {
            id: id.into(),
            name: name.into(),
            tier,
            rarity: Rarity::Common,
            tag: "Other".into(),
            sell_orders: sells,
            buy_orders: 0,
        }
    }

    #[test]
    fn ties_are_all_cheapest() {
        let mine = PlayerOrders {
            player_id: "me".into(),
            sell: vec![order("1", Side::Sell, 5, "me"), order("1", Side::Sell, 5, "me"), order("1", Side::Sell, 6, "me")],
            buy: vec![order("1", Side::Buy, 2, "me")],
        };
        let books = HashMap::from([("1".to_string(), book("1", &[5, 9]))]);
        let flags: Vec<Option<bool>> = flag_cheapest(&mine, &books).into_iter().map(|f| f.cheapest).collect();
        assert_eq!(flags, [Some(true), Some(true), Some(false), None]);
    }

    #[test]
    fn undercut_and_missing_book() {
        let mine = PlayerOrders {
            player_id: "me".into(),
            sell: vec![order("1", Side::Sell, 7, "me"), order("2", Side::Sell, 1, "me")],
            buy: vec![],
        };
        let books = HashMap::from([("1".to_string(), book("1", &[6]))]);
        let flags: Vec<Option<bool>> = flag_cheapest(&mine, &books).into_iter().map(|f| f.cheapest).collect();
        assert_eq!(flags, [Some(false), None]);
    }

    #[test]
    fn own_order_missing_from_book_still_counts() {
        let mine = PlayerOrders { player_id: "me".into(), sell: vec![order("1", Side::Sell, 3, "me")], buy: vec![] };
        let books = HashMap::from([("1".to_string(), book("1", &[]))]);
        assert_eq!(flag_cheapest(&mine, &books)[0].cheapest, Some(true));
    }

    #[test]
    fn distinct_sell_items() {
        let mine = PlayerOrders {
            player_id: "me".into(),
            sell: vec![order("9", Side::Sell, 1, "me"), order("3", Side::Sell, 1, "me"), order("9", Side::Sell, 2, "me")],
            buy: vec![order("4", Side::Buy, 1, "me")],
        };
        assert_eq!(mine.sell_item_ids(), ["3", "9"]);
    }

    #[test]
    fn board_discards_stale_work() {
        let mut board = MarketBoard::new();
        let old = board.begin_load();
        let new = board.begin_load();
        assert!(!board.apply_listings(old, vec![listing("1", "Old", 0, 1)]));
        assert!(board.apply_listings(new, vec![listing("2", "New", 0, 1)]));
        assert_eq!(board.listings().len(), 1);

        let summary = PriceSummary { lowest_sell: Some(4), highest_buy: None };
        assert!(!board.apply_prices(old, [("2".to_string(), summary)]));
        assert_eq!(board.missing_prices(board.listings()), ["2"]);
        assert!(board.apply_prices(new, [("2".to_string(), summary)]));
        assert_eq!(board.price("2"), Some(&summary));
        assert!(board.missing_prices(board.listings()).is_empty());
    }

    #[test]
    fn board_view_filters_and_sorts() {
        let mut board = MarketBoard::new();
        let t = board.begin_load();
        board.apply_listings(
            t,
            vec![listing("1", "Simple Ingot", 2, 4), listing("2", "Rough Ingot", 0, 9), listing("3", "Rough Plank", 0, 1)],
        );
        let f = Filters { search: "ingot".into(), ..Filters::default() };
        let ids: Vec<&str> = board
            .view(&f, SortSpec { key: SortKey::Count, descending: true })
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, ["2", "1"]);
    }
}
