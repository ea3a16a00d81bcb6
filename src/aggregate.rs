// src/aggregate.rs
//
// Flat per-player item lists → grouped, filtered, sorted rows for display
// and export. Filters run on the flat list first; grouping sums counts and
// tracks per-player contributions; sorting runs last.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::config::options::{Filters, GroupMode, SortKey, SortSpec};
use crate::items::{NormalizedItem, Rarity};

/// A grouped row. `item.count` is the group total; the remaining fields come
/// from the first member seen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedItem {
    pub item: NormalizedItem,
    /// player display name → summed count
    pub player_quantities: BTreeMap<String, u64>,
}

impl AggregatedItem {
    fn start(item: &NormalizedItem) -> Self {
        let mut player_quantities = BTreeMap::new();
        player_quantities.insert(item.player_name.clone(), item.count);
        Self { item: item.clone(), player_quantities }
    }

    fn absorb(&mut self, item: &NormalizedItem) {
        self.item.count = self.item.count.saturating_add(item.count);
        let q = self.player_quantities.entry(item.player_name.clone()).or_insert(0);
        *q = q.saturating_add(item.count);
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct GroupKey<'a> {
    name: &'a str,
    tier: i8,
    rarity: &'a Rarity,
    player: Option<&'a str>,
}

impl<'a> GroupKey<'a> {
    fn of(it: &'a NormalizedItem, mode: GroupMode) -> Self {
        Self {
            name: &it.name,
            tier: it.tier,
            rarity: &it.rarity,
            player: match mode {
                GroupMode::Item => None,
                GroupMode::ItemAndPlayer => Some(&it.player_name),
            },
        }
    }
}

pub fn matches(it: &NormalizedItem, f: &Filters) -> bool {
    f.matches(&it.name, it.tier, &it.rarity, &it.tag)
}

pub fn aggregate<'a>(
    items: impl IntoIterator<Item = &'a NormalizedItem>,
    group: GroupMode,
    filters: &Filters,
    sort: SortSpec,
) -> Vec<AggregatedItem> {
    let mut index: HashMap<GroupKey<'a>, usize> = HashMap::new();
    let mut out: Vec<AggregatedItem> = Vec::new();

    for it in items.into_iter().filter(|it| matches(it, filters)) {
        match index.get(&GroupKey::of(it, group)) {
            Some(&ix) => out[ix].absorb(it),
            None => {
                index.insert(GroupKey::of(it, group), out.len());
                out.push(AggregatedItem::start(it));
            }
        }
    }

    sort_rows(&mut out, sort);
    out
}

pub fn sort_rows(rows: &mut [AggregatedItem], sort: SortSpec) {
    rows.sort_by(|a, b| {
        let primary = match sort.key {
            SortKey::Name => by_name(a, b),
            SortKey::Tier => a.item.tier.cmp(&b.item.tier),
            SortKey::Rarity => a.item.rarity.rank().cmp(&b.item.rarity.rank()),
            SortKey::Count => a.item.count.cmp(&b.item.count),
        };
        let primary = if sort.descending { primary.reverse() } else { primary };
        primary.then_with(|| by_name(a, b))
    });
}

fn by_name(a: &AggregatedItem, b: &AggregatedItem) -> Ordering {
    a.item
        .name
        .to_lowercase()
        .cmp(&b.item.name.to_lowercase())
        .then_with(|| a.item.name.cmp(&b.item.name))
        .then_with(|| a.item.player_name.cmp(&b.item.player_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn it(name: &str, tier: i8, rarity: Rarity, count: u64, player: &str) -> NormalizedItem {
        NormalizedItem {
            name: name.into(),
            tier,
            rarity,
            count,
            base_item: name.into(),
            tag: "Other".into(),
            player_id: format!("id-{player}"),
            player_name: player.into(),
            location: "Bank".into(),
            from_package: false,
        }
    }

    #[test]
    fn same_key_merges_across_players() {
        let items = [it("Ingot", 1, Rarity::Common, 5, "A"), it("Ingot", 1, Rarity::Common, 7, "B")];
        let rows = aggregate(&items, GroupMode::Item, &Filters::default(), SortSpec::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.count, 12);
        assert_eq!(rows[0].player_quantities, BTreeMap::from([("A".to_string(), 5), ("B".to_string(), 7)]));
    }

    #[test]
    fn group_by_player_splits() {
        let items = [
            it("Ingot", 1, Rarity::Common, 5, "A"),
            it("Ingot", 1, Rarity::Common, 7, "B"),
            it("Ingot", 1, Rarity::Common, 1, "A"),
        ];
        let rows = aggregate(&items, GroupMode::ItemAndPlayer, &Filters::default(), SortSpec::default());
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].item.player_name, "A");
        assert_eq!(rows[0].item.count, 6);
        assert_eq!(rows[1].item.count, 7);
    }

    #[test]
    fn shared_display_name_sums() {
        let mut a = it("Gem", 0, Rarity::Rare, 2, "Sam");
        let mut b = it("Gem", 0, Rarity::Rare, 3, "Sam");
        a.player_id = "1".into();
        b.player_id = "2".into();
        let rows = aggregate(&[a, b], GroupMode::Item, &Filters::default(), SortSpec::default());
        assert_eq!(rows[0].player_quantities.get("Sam"), Some(&5));
    }

    #[test]
    fn different_tier_or_rarity_stay_apart() {
        let items = [
            it("Ingot", 1, Rarity::Common, 1, "A"),
            it("Ingot", 2, Rarity::Common, 1, "A"),
            it("Ingot", 1, Rarity::Rare, 1, "A"),
        ];
        assert_eq!(aggregate(&items, GroupMode::Item, &Filters::default(), SortSpec::default()).len(), 3);
    }

    #[test]
    fn filters_compose() {
        let items = [
            it("Rough Ingot", 0, Rarity::Common, 1, "A"),
            it("Simple Ingot", 2, Rarity::Common, 1, "A"),
            it("Simple Plank", 2, Rarity::Common, 1, "A"),
        ];
        let f = Filters { tier: Some(2), search: "INGOT".into(), ..Filters::default() };
        let rows = aggregate(&items, GroupMode::Item, &f, SortSpec::default());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item.name, "Simple Ingot");
    }

    #[test]
    fn sort_with_name_tiebreak() {
        let items = [
            it("b", 1, Rarity::Epic, 3, "A"),
            it("a", 1, Rarity::Common, 3, "A"),
            it("c", 0, Rarity::Mythic, 9, "A"),
        ];
        let names = |key, descending| -> Vec<String> {
            aggregate(&items, GroupMode::Item, &Filters::default(), SortSpec { key, descending })
                .into_iter()
                .map(|r| r.item.name)
                .collect()
        };
        assert_eq!(names(SortKey::Name, false), ["a", "b", "c"]);
        assert_eq!(names(SortKey::Name, true), ["c", "b", "a"]);
        assert_eq!(names(SortKey::Tier, false), ["c", "a", "b"]);
        assert_eq!(names(SortKey::Tier, true), ["a", "b", "c"]);
        assert_eq!(names(SortKey::Rarity, false), ["a", "b", "c"]);
        assert_eq!(names(SortKey::Count, true), ["c", "a", "b"]);
    }
}
