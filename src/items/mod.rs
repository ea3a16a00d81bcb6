// src/items/mod.rs
//! Item records: the loose shape upstream sends, the canonical shape the
//! rest of the app works with, and the rules that get from one to the other.
//!
//! - `normalize`: tier / rarity / base name / tag / quantity reconciliation
//! - `package`: "X Package" meta-items expanded into their contents
//! - `tables`: the static word lists both of them consult

use std::fmt;

use serde::Deserialize;
use serde_json::Value;

pub mod normalize;
pub mod package;
pub mod tables;

pub use normalize::normalize;
pub use package::{expand, expand_batch, visible_items};

/// Rarity vocabulary. Upstream strings that don't contain a canonical name
/// are kept verbatim in `Other`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    #[default]
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
    Other(String),
}

impl Rarity {
    pub const CANONICAL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    /// Severity rank for sorting. Unknown rarities rank after Mythic.
    pub fn rank(&self) -> u8 {
        match self {
            Rarity::Common => 0,
            Rarity::Uncommon => 1,
            Rarity::Rare => 2,
            Rarity::Epic => 3,
            Rarity::Legendary => 4,
            Rarity::Mythic => 5,
            Rarity::Other(_) => 6,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Rarity::Common => "Common",
            Rarity::Uncommon => "Uncommon",
            Rarity::Rare => "Rare",
            Rarity::Epic => "Epic",
            Rarity::Legendary => "Legendary",
            Rarity::Mythic => "Mythic",
            Rarity::Other(s) => s,
        }
    }

    /// Exact name lookup, used for filters and settings.
    pub fn parse(s: &str) -> Rarity {
        Rarity::CANONICAL
            .into_iter()
            .find(|r| r.as_str() == s)
            .unwrap_or_else(|| Rarity::Other(s.to_string()))
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One pocket's (or market entry's) item as upstream sends it. Every field
/// is optional and loosely typed.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawItemRecord {
    pub name: Option<Value>,
    pub item_name: Option<Value>,
    pub tier: Option<Value>,
    pub rarity: Option<Value>,
    pub rarity_str: Option<Value>,
    pub tag: Option<Value>,
    pub quantity: Option<Value>,
    pub count: Option<Value>,
}

impl RawItemRecord {
    /// Lenient conversion; anything that isn't an object yields an empty record.
    pub fn from_value(v: &Value) -> Self {
        serde_json::from_value(v.clone()).unwrap_or_default()
    }
}

/// Where an item was seen.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Provenance {
    pub player_id: String,
    pub player_name: String,
    pub location: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedItem {
    pub name: String,
    /// -1 ..= 8; -1 is currency/special
    pub tier: i8,
    pub rarity: Rarity,
    pub count: u64,
    pub base_item: String,
    pub tag: String,
    pub player_id: String,
    pub player_name: String,
    pub location: String,
    pub from_package: bool,
}

impl NormalizedItem {
    pub fn is_package(&self) -> bool {
        !self.from_package && tables::package_quantity(&self.name).is_some()
    }
}
