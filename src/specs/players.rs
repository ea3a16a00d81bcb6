// src/specs/players.rs
//! Spec for player lookup: search by name fragment and profile by id.
//!
//! Search answers as `{ players: [...] }`, a bare array, or either of those
//! under `data`. A profile is `{ player: {...} }` or the player object itself.

use serde_json::Value;

use super::{encode, id_field, str_field, unwrap_data};
use crate::{config::consts::API_PREFIX, core::Fetch, decode::body_to_value, error::Result};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlayerSummary {
    pub id: String,
    pub name: String,
}

const ID_KEYS: &[&str] = &["entityId", "playerEntityId", "id"];
const NAME_KEYS: &[&str] = &["username", "userName", "name"];

pub fn search(fetch: &dyn Fetch, fragment: &str) -> Result<Vec<PlayerSummary>> {
    let path = format!("{API_PREFIX}/players?q={}", encode(fragment.trim()));
    let body = fetch.get(&path)?;
    Ok(body_to_value(&body, "player search")
        .map(|v| parse_search(&v))
        .unwrap_or_default())
}

pub fn profile(fetch: &dyn Fetch, id: &str) -> Result<Option<PlayerSummary>> {
    let path = format!("{API_PREFIX}/players/{}", encode(id));
    let body = fetch.get(&path)?;
    Ok(body_to_value(&body, "player profile").and_then(|v| parse_profile(&v)))
}

pub fn parse_search(v: &Value) -> Vec<PlayerSummary> {
    let v = unwrap_data(v);
    let list = match v {
        Value::Array(a) => a.as_slice(),
        _ => match v.get("players").and_then(Value::as_array) {
            Some(a) => a.as_slice(),
            None => {
                logw!("Players: unrecognized search payload");
                return Vec::new();
            }
        },
    };
    list.iter().filter_map(summary).collect()
}

pub fn parse_profile(v: &Value) -> Option<PlayerSummary> {
    let v = unwrap_data(v);
    summary(v.get("player").unwrap_or(v))
}

fn summary(v: &Value) -> Option<PlayerSummary> {
    let id = id_field(v, ID_KEYS)?;
    let name = str_field(v, NAME_KEYS).map(str::to_string).unwrap_or_else(|| id.clone());
    Some(PlayerSummary { id, name })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn search_shapes() {
        let a = json!({"players": [{"entityId": "1", "username": "Ayla"}, {"username": "no id"}]});
        let b = json!({"data": [{"entityId": 2, "username": "Bo"}]});
        assert_eq!(parse_search(&a), vec![PlayerSummary { id: "1".into(), name: "Ayla".into() }]);
        assert_eq!(parse_search(&b), vec![PlayerSummary { id: "2".into(), name: "Bo".into() }]);
        assert!(parse_search(&json!({"something": 1})).is_empty());
    }

    #[test]
    fn profile_shapes() {
        let wrapped = json!({"player": {"entityId": "7", "username": "Cy"}});
        let bare = json!({"entityId": "7"});
        assert_eq!(parse_profile(&wrapped).unwrap().name, "Cy");
        assert_eq!(parse_profile(&bare).unwrap().name, "7");
    }
}
