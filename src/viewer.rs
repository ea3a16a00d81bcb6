// src/viewer.rs
//
// The inventory viewer: selected players, their item lists, and the
// generation counter that keeps late answers from landing on a player set
// that has since changed.

use crate::{
    aggregate::{self, AggregatedItem},
    config::options::ViewOptions,
    core::Fetch,
    error::Error,
    items::{self, NormalizedItem},
    progress::Progress,
    scrape,
    specs::{catalog::Catalog, players::PlayerSummary},
};

/// Snapshot of a [`Generation`] taken when work starts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// Monotonic version of some piece of state. Work started under an older
/// ticket is discarded on arrival.
#[derive(Debug, Default)]
pub struct Generation(u64);

impl Generation {
    pub fn ticket(&self) -> Ticket {
        Ticket(self.0)
    }

    pub fn bump(&mut self) -> Ticket {
        self.0 = self.0.wrapping_add(1);
        self.ticket()
    }

    pub fn is_current(&self, t: Ticket) -> bool {
        t.0 == self.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerEntry {
    pub player: PlayerSummary,
    pub items: Vec<NormalizedItem>,
    /// Last refresh failure, shown next to the player.
    pub error: Option<String>,
    pub loaded: bool,
}

#[derive(Debug, Default)]
pub struct InventoryViewer {
    players: Vec<PlayerEntry>,
    generation: Generation,
}

impl InventoryViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn players(&self) -> &[PlayerEntry] {
        &self.players
    }

    pub fn player_ids(&self) -> Vec<String> {
        self.players.iter().map(|p| p.player.id.clone()).collect()
    }

    pub fn summaries(&self) -> Vec<PlayerSummary> {
        self.players.iter().map(|p| p.player.clone()).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.players.iter().any(|p| p.player.id == id)
    }

    pub fn ticket(&self) -> Ticket {
        self.generation.ticket()
    }

    /// Returns false if the player was already selected.
    pub fn add_player(&mut self, player: PlayerSummary) -> bool {
        if self.contains(&player.id) {
            return false;
        }
        logf!("Viewer: add {} ({})", player.name, player.id);
        self.players.push(PlayerEntry { player, items: Vec::new(), error: None, loaded: false });
        self.generation.bump();
        true
    }

    /// Results still in flight for the remaining players stay valid; `apply`
    /// drops anything addressed to the removed one.
    pub fn remove_player(&mut self, id: &str) -> bool {
        let before = self.players.len();
        self.players.retain(|p| p.player.id != id);
        let removed = self.players.len() != before;
        if removed {
            logf!("Viewer: remove {id}");
        }
        removed
    }

    /// Update a player's display name (profile resolved after selection).
    /// Items already loaded keep the name they were fetched under.
    pub fn rename(&mut self, player: &PlayerSummary) -> bool {
        match self.players.iter_mut().find(|p| p.player.id == player.id) {
            Some(entry) => {
                entry.player.name = player.name.clone();
                true
            }
            None => false,
        }
    }

    /// Start a refresh of every selected player. Anything still in flight
    /// from before goes stale.
    pub fn begin_refresh(&mut self) -> (Ticket, Vec<PlayerSummary>) {
        (self.generation.bump(), self.summaries())
    }

    /// Apply one player's refresh result. Stale tickets and players that
    /// were removed meanwhile are dropped; returns whether it was applied.
    pub fn apply(&mut self, ticket: Ticket, player_id: &str, result: Result<Vec<NormalizedItem>, String>) -> bool {
        if !self.generation.is_current(ticket) {
            logd!("Viewer: dropped stale result for {player_id}");
            return false;
        }
        let Some(entry) = self.players.iter_mut().find(|p| p.player.id == player_id) else {
            logd!("Viewer: result for unselected player {player_id}");
            return false;
        };
        match result {
            Ok(items) => {
                entry.items = items;
                entry.error = None;
            }
            Err(msg) => {
                // Keep the previous items; the notice says they may be old.
                entry.error = Some(msg);
            }
        }
        entry.loaded = true;
        true
    }

    /// Blocking refresh: players one at a time, each failure isolated.
    pub fn refresh(&mut self, fetch: &dyn Fetch, catalog: Option<&Catalog>, progress: Option<&mut dyn Progress>) {
        let (ticket, players) = self.begin_refresh();
        for r in scrape::collect_inventories(fetch, &players, catalog, progress) {
            let result = r.items.map_err(|e: Error| e.to_string());
            self.apply(ticket, &r.player.id, result);
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &NormalizedItem> {
        self.players.iter().flat_map(|p| p.items.iter())
    }

    /// Distinct tags over every loaded item, sorted. Feeds the tag filter.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self.items().map(|i| i.tag.clone()).collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Rows for display/export under the given view options.
    pub fn view(&self, opts: &ViewOptions) -> Vec<AggregatedItem> {
        let visible = self
            .players
            .iter()
            .flat_map(|p| items::visible_items(&p.items, opts.expand_packages));
        aggregate::aggregate(visible, opts.group, &opts.filters, opts.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::{Provenance, RawItemRecord};
    use serde_json::json;

    fn p(id: &str, name: &str) -> PlayerSummary {
        PlayerSummary { id: id.into(), name: name.into() }
    }

    fn item(name: &str, count: u64, who: &PlayerSummary) -> NormalizedItem {
        let from = Provenance { player_id: who.id.clone(), player_name: who.name.clone(), location: "Bank".into() };
        items::normalize(&RawItemRecord::from_value(&json!({"name": name, "quantity": count})), &from).unwrap()
    }

    #[test]
    fn generation_tickets() {
        let mut g = Generation::default();
        let a = g.ticket();
        assert!(g.is_current(a));
        let b = g.bump();
        assert!(!g.is_current(a));
        assert!(g.is_current(b));
    }

    #[test]
    fn add_bumps_generation_remove_does_not() {
        let mut v = InventoryViewer::new();
        let t0 = v.ticket();
        assert!(v.add_player(p("1", "A")));
        assert!(!v.add_player(p("1", "A")));
        assert_ne!(v.ticket(), t0);
        let t1 = v.ticket();
        assert!(v.remove_player("1"));
        assert!(!v.remove_player("1"));
        assert_eq!(v.ticket(), t1);
    }

    #[test]
    fn removal_keeps_in_flight_results_for_the_rest() {
        let a = p("a", "A");
        let b = p("b", "B");
        let mut v = InventoryViewer::new();
        v.add_player(a.clone());
        v.add_player(b.clone());
        let (t, _) = v.begin_refresh();

        assert!(v.remove_player("b"));
        assert!(v.apply(t, "a", Ok(vec![item("Sand", 3, &a)])));
        assert!(v.players()[0].loaded);
        assert_eq!(v.players()[0].items.len(), 1);

        // The removed player's late answer goes nowhere.
        assert!(!v.apply(t, "b", Ok(vec![item("Salt", 1, &b)])));
        assert_eq!(v.players().len(), 1);
    }

    #[test]
    fn stale_refresh_is_dropped() {
        let a = p("1", "A");
        let mut v = InventoryViewer::new();
        v.add_player(a.clone());
        let (old, _) = v.begin_refresh();
        v.add_player(p("2", "B"));
        assert!(!v.apply(old, "1", Ok(vec![item("Sand", 3, &a)])));
        assert!(v.players()[0].items.is_empty());

        let (cur, _) = v.begin_refresh();
        assert!(v.apply(cur, "1", Ok(vec![item("Sand", 3, &a)])));
        assert_eq!(v.players()[0].items.len(), 1);
    }

    #[test]
    fn failure_keeps_items_and_records_error() {
        let a = p("1", "A");
        let mut v = InventoryViewer::new();
        v.add_player(a.clone());
        let (t, _) = v.begin_refresh();
        v.apply(t, "1", Ok(vec![item("Sand", 3, &a)]));
        let (t, _) = v.begin_refresh();
        v.apply(t, "1", Err("HTTP 502".into()));
        assert_eq!(v.players()[0].items.len(), 1);
        assert_eq!(v.players()[0].error.as_deref(), Some("HTTP 502"));
    }

    #[test]
    fn view_respects_package_toggle() {
        let a = p("1", "A");
        let mut v = InventoryViewer::new();
        v.add_player(a.clone());
        let (t, _) = v.begin_refresh();
        let list = items::expand_batch(vec![item("Simple Clay Lump Package", 3, &a), item("Simple Clay Lump", 5, &a)]);
        v.apply(t, "1", Ok(list));

        let mut opts = ViewOptions::default();
        let rows = v.view(&opts);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.name, "Simple Clay Lump");
        assert_eq!(rows[0].item.count, 1505);

        opts.expand_packages = false;
        let names: Vec<String> = v.view(&opts).into_iter().map(|r| r.item.name).collect();
        assert_eq!(names, ["Simple Clay Lump", "Simple Clay Lump Package"]);
    }
}
