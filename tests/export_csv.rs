// tests/export_csv.rs
use serde_json::json;

use stash_scrape::config::options::{GroupMode, ViewOptions};
use stash_scrape::export;
use stash_scrape::items::{self, Provenance, RawItemRecord};
use stash_scrape::specs::players::PlayerSummary;
use stash_scrape::viewer::InventoryViewer;

fn loaded_viewer() -> InventoryViewer {
    let mut v = InventoryViewer::new();
    let mut fill = |id: &str, name: &str, list: &[(&str, u64)]| {
        v.add_player(PlayerSummary { id: id.into(), name: name.into() });
        let from = Provenance { player_id: id.into(), player_name: name.into(), location: "Bank".into() };
        let items = list
            .iter()
            .filter_map(|(n, q)| items::normalize(&RawItemRecord::from_value(&json!({"name": n, "quantity": q})), &from))
            .collect();
        let t = v.ticket();
        v.apply(t, id, Ok(items));
    };
    fill("1", "Ayla", &[("Rough Plank", 5), ("Sand, Fine", 2)]);
    fill("2", "Bram", &[("Rough Plank", 1)]);
    v
}

#[test]
fn export_creates_directories_and_writes_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("deeper").join("inv.csv");
    let rows = loaded_viewer().view(&ViewOptions::default());

    let written = export::export_to_path(&path, &rows, GroupMode::Item, true).unwrap();
    assert_eq!(written, path);

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(text, "Name,Tier,Rarity,Count\n\"Rough Plank\",0,Common,6\n\"Sand, Fine\",0,Common,2\n");
}

#[test]
fn grouped_by_player_adds_player_column() {
    let opts = ViewOptions { group: GroupMode::ItemAndPlayer, ..ViewOptions::default() };
    let rows = loaded_viewer().view(&opts);
    let text = export::to_export_string(&rows, opts.group, false);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines, ["\"Rough Plank\",0,Common,5,Ayla", "\"Rough Plank\",0,Common,1,Bram", "\"Sand, Fine\",0,Common,2,Ayla"]);
}

#[test]
fn export_into_a_file_path_fails_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    std::fs::write(&blocker, "x").unwrap();
    let rows = loaded_viewer().view(&ViewOptions::default());
    assert!(export::export_to_path(&blocker.join("inv.csv"), &rows, GroupMode::Item, true).is_err());
}
