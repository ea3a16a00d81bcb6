// src/config/options.rs
use std::path::PathBuf;

use super::consts::*;
use crate::items::Rarity;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppOptions {
    pub view: ViewOptions,
    pub export: ExportOptions,
    pub market: MarketOptions,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PageKind {
    #[default]
    Inventory,
    Market,
    Orders,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GroupMode {
    /// (name, tier, rarity)
    #[default]
    Item,
    /// (name, tier, rarity, player)
    ItemAndPlayer,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortKey {
    #[default]
    Name,
    Tier,
    Rarity,
    Count,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [SortKey::Name, SortKey::Tier, SortKey::Rarity, SortKey::Count];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Name => "name",
            SortKey::Tier => "tier",
            SortKey::Rarity => "rarity",
            SortKey::Count => "count",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str().eq_ignore_ascii_case(s))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub descending: bool,
}

/// Exact-match filters plus a case-insensitive name search. All must pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Filters {
    pub tier: Option<i8>,
    pub rarity: Option<Rarity>,
    pub tag: Option<String>,
    pub search: String,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.tier.is_none() && self.rarity.is_none() && self.tag.is_none() && self.search.trim().is_empty()
    }

    /// Shared by inventory rows and market listings.
    pub fn matches(&self, name: &str, tier: i8, rarity: &Rarity, tag: &str) -> bool {
        if self.tier.is_some_and(|t| t != tier) {
            return false;
        }
        if self.rarity.as_ref().is_some_and(|r| r != rarity) {
            return false;
        }
        if self.tag.as_deref().is_some_and(|t| t != tag) {
            return false;
        }
        let needle = self.search.trim();
        needle.is_empty() || name.to_lowercase().contains(&needle.to_lowercase())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    pub group: GroupMode,
    pub expand_packages: bool,
    pub filters: Filters,
    pub sort: SortSpec,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            group: GroupMode::Item,
            expand_packages: true,
            filters: Filters::default(),
            sort: SortSpec::default(),
        }
    }
}

/// Order-presence flags for the market listing endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketOptions {
    pub has_sell_orders: bool,
    pub has_buy_orders: bool,
}

impl Default for MarketOptions {
    fn default() -> Self {
        Self { has_sell_orders: true, has_buy_orders: false }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportOptions {
    pub out_path: PathBuf,
    pub include_headers: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            out_path: PathBuf::from(DEFAULT_OUT_DIR).join(DEFAULT_FILE),
            include_headers: true,
        }
    }
}

impl ExportOptions {
    /// Parse GUI text into a path. Blank text keeps the current one.
    pub fn set_path(&mut self, text: &str) {
        let s = text.trim();
        if !s.is_empty() {
            self.out_path = PathBuf::from(s);
        }
    }
}
