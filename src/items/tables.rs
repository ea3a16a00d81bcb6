// src/items/tables.rs
//
// Static content tables. Order matters wherever the lookup is "first match".

/// Tier names as they appear in a raw `tier` field. Case-insensitive substring.
pub const TIER_NAMES: &[(&str, i8)] = &[
    ("currency", -1),
    ("special", -1),
    ("primitive", 0),
    ("basic", 1),
    ("improved", 2),
    ("reinforced", 3),
    ("superior", 4),
    ("exquisite", 5),
    ("peerless", 6),
    ("ornate", 7),
    ("celestium", 8),
];

/// Leading words of an item name that carry its tier.
pub const TIER_PREFIXES: &[(&str, i8)] = &[
    ("Rough", 0),
    ("Primitive", 0),
    ("Crude", 0),
    ("Basic", 1),
    ("Plain", 1),
    ("Ferralith", 1),
    ("Simple", 2),
    ("Improved", 2),
    ("Pyrelite", 2),
    ("Sturdy", 3),
    ("Reinforced", 3),
    ("Emarium", 3),
    ("Fine", 4),
    ("Superior", 4),
    ("Elenvar", 4),
    ("Exquisite", 5),
    ("Luminite", 5),
    ("Peerless", 6),
    ("Rathium", 6),
    ("Ornate", 7),
    ("Aurumite", 7),
    ("Pristine", 8),
    ("Celestium", 8),
];

/// Name fragments that mark currency-like items (tier -1).
pub const CURRENCY_MARKERS: &[&str] = &["Hex Coin", "Ancient Metal"];

/// Skill-rank and collection words. A name starting with one of these plus a
/// space is not an inventory item (e.g. "Novice Fishing Rod Schematic").
pub const SKIP_PREFIXES: &[&str] = &[
    "Professional",
    "Collectible",
    "Novice",
    "Apprentice",
    "Journeyman",
    "Expert",
    "Master",
    "Grandmaster",
    "Legendary",
    "Mythical",
];

/// Package suffix → base units per package.
pub const PACKAGES: &[(&str, u64)] = &[
    ("Clay Lump Package", 500),
    ("Sand Package", 500),
    ("Pebbles Package", 500),
    ("Salt Package", 500),
    ("Ore Concentrate Package", 500),
    ("Stone Chunk Package", 500),
    ("Wood Log Package", 500),
    ("Plant Fiber Package", 500),
    ("Ingot Package", 100),
    ("Plank Package", 100),
    ("Brick Package", 100),
    ("Cloth Package", 100),
    ("Leather Package", 100),
    ("Rope Package", 100),
    ("Filament Package", 100),
    ("Pigment Package", 100),
    ("Vial Package", 100),
    ("Fish Oil Package", 100),
    ("Flour Package", 100),
    ("Glass Package", 100),
    ("Parchment Package", 100),
    ("Tannin Package", 100),
];

pub const PACKAGE_SUFFIX: &str = " Package";

/// Lowercase base-name fragment → tag, for package contents never seen loose.
pub const TAG_HINTS: &[(&str, &str)] = &[
    ("ingot", "Smithing"),
    ("ore concentrate", "Mining"),
    ("clay", "Masonry"),
    ("brick", "Masonry"),
    ("sand", "Masonry"),
    ("pebble", "Masonry"),
    ("stone", "Masonry"),
    ("glass", "Masonry"),
    ("plank", "Carpentry"),
    ("wood log", "Forestry"),
    ("fiber", "Farming"),
    ("flour", "Cooking"),
    ("salt", "Cooking"),
    ("fish oil", "Fishing"),
    ("cloth", "Tailoring"),
    ("rope", "Tailoring"),
    ("filament", "Tailoring"),
    ("leather", "Leatherworking"),
    ("tannin", "Leatherworking"),
    ("pigment", "Scholar"),
    ("parchment", "Scholar"),
    ("vial", "Alchemy"),
];

/// Display label for a canonical tier.
pub fn tier_label(tier: i8) -> String {
    if tier < 0 { s!("Special") } else { format!("T{tier}") }
}

/// The tier-prefix word a name starts with (followed by a space), if any.
pub fn tier_prefix(name: &str) -> Option<(&'static str, i8)> {
    TIER_PREFIXES.iter().copied().find(|(p, _)| starts_with_word(name, p))
}

pub fn starts_with_word(name: &str, word: &str) -> bool {
    name.strip_prefix(word).is_some_and(|rest| rest.starts_with(' '))
}

/// Units per package when `name` is a known package, else `None`.
pub fn package_quantity(name: &str) -> Option<u64> {
    if !name.ends_with(PACKAGE_SUFFIX) {
        return None;
    }
    PACKAGES.iter().find(|(suffix, _)| name.ends_with(suffix)).map(|&(_, q)| q)
}

pub fn hinted_tag(base_name: &str) -> Option<&'static str> {
    let lc = base_name.to_lowercase();
    TAG_HINTS.iter().find(|(frag, _)| lc.contains(frag)).map(|&(_, tag)| tag)
}
