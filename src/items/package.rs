// src/items/package.rs
//
// Packages are ordinary items named "<contents> Package". Expansion emits one
// synthetic item for the contents; the package itself stays in the batch so
// the view can pick either representation.

use std::collections::HashMap;

use super::NormalizedItem;
use super::normalize::base_item_name;
use super::tables::{PACKAGE_SUFFIX, hinted_tag, package_quantity};
use crate::config::consts::DEFAULT_TAG;

/// Tags seen on loose (non-package) items in one batch, keyed by item name.
pub type TagIndex = HashMap<String, String>;

pub fn tag_index<'a>(items: impl IntoIterator<Item = &'a NormalizedItem>) -> TagIndex {
    let mut ix = TagIndex::new();
    for it in items {
        if it.from_package || it.is_package() || it.tag == DEFAULT_TAG {
            continue;
        }
        ix.entry(it.name.clone()).or_insert_with(|| it.tag.clone());
    }
    ix
}

/// The contents of a package item, or `None` if `item` isn't a known package.
pub fn expand(item: &NormalizedItem, seen: &TagIndex) -> Option<NormalizedItem> {
    if item.from_package {
        return None;
    }
    let per = package_quantity(&item.name)?;
    let name = &item.name[..item.name.len() - PACKAGE_SUFFIX.len()];

    let tag = seen
        .get(name)
        .cloned()
        .or_else(|| hinted_tag(name).map(str::to_string))
        .unwrap_or_else(|| item.tag.clone());

    Some(NormalizedItem {
        name: name.to_string(),
        base_item: base_item_name(name).to_string(),
        count: item.count.saturating_mul(per),
        tag,
        from_package: true,
        ..item.clone()
    })
}

/// Append the expansion of every package in the batch.
pub fn expand_batch(mut items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let seen = tag_index(&items);
    let extra: Vec<NormalizedItem> = items.iter().filter_map(|it| expand(it, &seen)).collect();
    if !extra.is_empty() {
        logd!("Packages: {} expanded in batch of {}", extra.len(), items.len());
    }
    items.extend(extra);
    items
}

/// Items a view should show: with expansion on, packages are replaced by
/// their contents; with it off, the synthetic contents are hidden.
pub fn visible_items(items: &[NormalizedItem], expand_packages: bool) -> impl Iterator<Item = &NormalizedItem> {
    items.iter().filter(move |it| {
        if expand_packages { !it.is_package() } else { !it.from_package }
    })
}
