// src/gui/components/player_panel.rs
//
// Left panel: player search, the selected player list (with per-player
// failure notices), refresh and catalog controls.

use eframe::egui;
use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Players");

    ui.horizontal(|ui| {
        let resp = ui.add(
            egui::TextEdit::singleline(&mut app.state.gui.search_text)
                .hint_text("Search by name")
                .desired_width(150.0),
        );
        let enter = resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Search").clicked() || enter {
            app.start_search();
        }
    });

    // Search hits: click to add
    let mut add = None;
    if !app.search_results.is_empty() {
        egui::ScrollArea::vertical()
            .id_salt("player_search_scroll")
            .max_height(160.0)
            .show(ui, |ui| {
                for p in &app.search_results {
                    let selected = app.viewer.contains(&p.id);
                    let resp = ui
                        .add_enabled(!selected, egui::Button::new(format!("+ {}", p.name)).frame(false))
                        .on_hover_text(&p.id);
                    if resp.clicked() {
                        add = Some(p.clone());
                    }
                }
            });
    }
    if let Some(p) = add {
        logf!("UI: Add player {} ({})", p.name, p.id);
        app.add_player(p);
    }

    ui.separator();

    ui.horizontal(|ui| {
        let n = app.viewer.players().len();
        ui.label(format!("Selected ({n})"));
        if ui.add_enabled(n > 0, egui::Button::new("Refresh")).clicked() {
            app.start_refresh(false);
        }
    });

    let mut remove = None;
    egui::ScrollArea::vertical()
        .id_salt("players_panel_scroll")
        .show(ui, |ui| {
            let w = ui.available_width();
            ui.set_min_width(w);

            for entry in app.viewer.players() {
                ui.horizontal(|ui| {
                    if ui.small_button("✕").on_hover_text("Remove").clicked() {
                        remove = Some(entry.player.id.clone());
                    }
                    let count = if entry.loaded { entry.items.len().to_string() } else { s!("…") };
                    ui.label(format!("{} ({count})", entry.player.name))
                        .on_hover_text(&entry.player.id);
                });
                if let Some(err) = &entry.error {
                    ui.colored_label(egui::Color32::from_rgb(0xDC, 0x61, 0x49), err);
                }
            }
        });
    if let Some(id) = remove {
        logf!("UI: Remove player {id}");
        app.remove_player(&id);
    }

    ui.separator();

    let label = match &app.catalog {
        Some(c) => format!("Catalog: {} items", c.len()),
        None => s!("Catalog: not loaded"),
    };
    ui.horizontal(|ui| {
        ui.label(label);
        if ui.small_button("Load").clicked() {
            app.load_catalog();
        }
    });
}
