// src/config/query.rs
//
// Settings <-> URL query string. Only non-default values are written;
// anything missing or unreadable falls back to its default.
//
//   players=id1,id2  group=player  tier=3  rarity=Epic  tag=Smithing
//   q=ingot  sort=count  dir=desc  packages=0

use std::collections::HashSet;

use url::form_urlencoded;

use super::options::{GroupMode, SortKey, ViewOptions};
use super::state::AppState;
use crate::items::Rarity;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlSettings {
    pub player_ids: Vec<String>,
    pub view: ViewOptions,
}

impl UrlSettings {
    pub fn from_state(state: &AppState) -> Self {
        Self { player_ids: state.player_ids.clone(), view: state.options.view.clone() }
    }

    pub fn apply_to(self, state: &mut AppState) {
        state.player_ids = self.player_ids;
        state.options.view = self.view;
    }
}

pub fn encode(s: &UrlSettings) -> String {
    let d = ViewOptions::default();
    let v = &s.view;
    let mut q = form_urlencoded::Serializer::new(String::new());

    if !s.player_ids.is_empty() {
        q.append_pair("players", &s.player_ids.join(","));
    }
    if v.group != d.group {
        q.append_pair("group", "player");
    }
    if let Some(t) = v.filters.tier {
        q.append_pair("tier", &t.to_string());
    }
    if let Some(r) = &v.filters.rarity {
        q.append_pair("rarity", r.as_str());
    }
    if let Some(t) = &v.filters.tag {
        q.append_pair("tag", t);
    }
    if !v.filters.search.is_empty() {
        q.append_pair("q", &v.filters.search);
    }
    if v.sort.key != d.sort.key {
        q.append_pair("sort", v.sort.key.as_str());
    }
    if v.sort.descending {
        q.append_pair("dir", "desc");
    }
    if v.expand_packages != d.expand_packages {
        q.append_pair("packages", if v.expand_packages { "1" } else { "0" });
    }
    q.finish()
}

pub fn decode(query: &str) -> UrlSettings {
    let query = query.trim().trim_start_matches('?');
    let mut out = UrlSettings::default();
    let v = &mut out.view;

    for (k, val) in form_urlencoded::parse(query.as_bytes()) {
        let val = val.trim();
        match k.as_ref() {
            "players" => {
                let mut seen = HashSet::new();
                out.player_ids = val
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty() && seen.insert(*s))
                    .map(str::to_string)
                    .collect();
            }
            "group" => match val {
                "player" => v.group = GroupMode::ItemAndPlayer,
                "item" => v.group = GroupMode::Item,
                other => logw!("Settings: ignoring group={other:?}"),
            },
            "tier" => match val.parse::<i8>() {
                Ok(t) if (-1..=8).contains(&t) => v.filters.tier = Some(t),
                _ => logw!("Settings: ignoring tier={val:?}"),
            },
            "rarity" if !val.is_empty() => v.filters.rarity = Some(Rarity::parse(val)),
            "tag" if !val.is_empty() => v.filters.tag = Some(val.to_string()),
            "q" => v.filters.search = val.to_string(),
            "sort" => match SortKey::parse(val) {
                Some(key) => v.sort.key = key,
                None => logw!("Settings: ignoring sort={val:?}"),
            },
            "dir" => v.sort.descending = val.eq_ignore_ascii_case("desc"),
            "packages" => match val {
                "1" | "true" => v.expand_packages = true,
                "0" | "false" => v.expand_packages = false,
                other => logw!("Settings: ignoring packages={other:?}"),
            },
            other => logd!("Settings: unknown key {other:?}"),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::options::{Filters, SortSpec};

    #[test]
    fn defaults_encode_to_nothing() {
        assert_eq!(encode(&UrlSettings::default()), "");
        assert_eq!(decode(""), UrlSettings::default());
    }

    #[test]
    fn round_trip() {
        let s = UrlSettings {
            player_ids: vec!["72057594".into(), "11".into()],
            view: ViewOptions {
                group: GroupMode::ItemAndPlayer,
                expand_packages: false,
                filters: Filters {
                    tier: Some(-1),
                    rarity: Some(Rarity::Epic),
                    tag: Some("Smithing & Co".into()),
                    search: "clay lump".into(),
                },
                sort: SortSpec { key: SortKey::Count, descending: true },
            },
        };
        let q = encode(&s);
        assert!(q.contains("players=72057594%2C11"));
        assert_eq!(decode(&q), s);
        assert_eq!(decode(&format!("?{q}")), s);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let s = decode("tier=99&sort=weight&group=nobody&packages=maybe&players=,,");
        assert_eq!(s, UrlSettings::default());
    }

    #[test]
    fn repeated_player_ids_keep_first_occurrence() {
        assert_eq!(decode("players=1,2,1,3,2").player_ids, ["1", "2", "3"]);
    }
}
