// src/gui/components/filter_bar.rs
//
// Group / package / filter / sort controls. Any change rebuilds the
// Inventory rows; the Market tab reads the same options when it draws.

use eframe::egui;
use crate::{
    config::options::{GroupMode, SortKey},
    gui::app::App,
    items::{Rarity, normalize::{MAX_TIER, MIN_TIER}, tables::tier_label},
};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let tags = app.viewer.tags();
    let before = app.state.options.view.clone();
    let v = &mut app.state.options.view;

    ui.horizontal_wrapped(|ui| {
        let mut by_player = v.group == GroupMode::ItemAndPlayer;
        if ui.checkbox(&mut by_player, "Group by player").changed() {
            v.group = if by_player { GroupMode::ItemAndPlayer } else { GroupMode::Item };
        }
        ui.checkbox(&mut v.expand_packages, "Expand packages");

        ui.separator();

        egui::ComboBox::from_id_salt("filter_tier")
            .selected_text(v.filters.tier.map_or(s!("Any tier"), tier_label))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut v.filters.tier, None, "Any tier");
                for t in MIN_TIER..=MAX_TIER {
                    ui.selectable_value(&mut v.filters.tier, Some(t), tier_label(t));
                }
            });

        egui::ComboBox::from_id_salt("filter_rarity")
            .selected_text(v.filters.rarity.as_ref().map_or("Any rarity", Rarity::as_str).to_string())
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut v.filters.rarity, None, "Any rarity");
                for r in Rarity::CANONICAL {
                    let label = s!(r.as_str());
                    ui.selectable_value(&mut v.filters.rarity, Some(r), label);
                }
            });

        egui::ComboBox::from_id_salt("filter_tag")
            .selected_text(v.filters.tag.clone().unwrap_or_else(|| s!("Any tag")))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut v.filters.tag, None, "Any tag");
                for t in &tags {
                    ui.selectable_value(&mut v.filters.tag, Some(t.clone()), t);
                }
            });

        ui.add(
            egui::TextEdit::singleline(&mut v.filters.search)
                .hint_text("Filter names")
                .desired_width(140.0),
        );
        if !v.filters.is_empty() && ui.small_button("Clear").clicked() {
            v.filters = Default::default();
        }

        ui.separator();

        ui.label("Sort:");
        egui::ComboBox::from_id_salt("sort_key")
            .selected_text(v.sort.key.as_str())
            .show_ui(ui, |ui| {
                for k in SortKey::ALL {
                    ui.selectable_value(&mut v.sort.key, k, k.as_str());
                }
            });
        ui.checkbox(&mut v.sort.descending, "Descending");
    });

    if app.state.options.view != before {
        logd!("UI: View options → {:?}", app.state.options.view);
        app.rebuild_view();
    }
}
