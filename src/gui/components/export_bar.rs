// src/gui/components/export_bar.rs

use eframe::egui;
use crate::{config::options::PageKind, export, gui::app::App};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    if app.state.gui.page != PageKind::Inventory {
        return;
    }

    // --- Include headers + Output field ---
    ui.horizontal(|ui| {
        let export = &mut app.state.options.export;
        let before_headers = export.include_headers;
        ui.checkbox(&mut export.include_headers, "Include headers");
        if export.include_headers != before_headers {
            logf!("UI: Include_headers → {}", export.include_headers);
        }

        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text)
                .font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) → {}", app.out_path_text);
        }
    });

    // --- Actions (Copy / Export / Copy link) ---
    ui.horizontal(|ui| {
        let group = app.state.options.view.group;
        let include_headers = app.state.options.export.include_headers;

        // Copy
        if ui.button("Copy").clicked() {
            if app.rows.is_empty() {
                app.status("Nothing to copy");
                logd!("Copy: Clicked, but there's nothing to copy");
            } else {
                let txt = export::to_export_string(&app.rows, group, include_headers);
                logf!("Copy: rows={}, group={:?}", app.rows.len(), group);
                ui.ctx().copy_text(txt);
                app.status("Copied to clipboard");
            }
        }

        // Export
        if ui.button("Export").clicked() {
            if app.rows.is_empty() {
                app.status("Nothing to export");
                logd!("Export: Clicked, but there's nothing to export");
            } else {
                if app.out_path_dirty {
                    app.state.options.export.set_path(&app.out_path_text);
                    logf!("Export: Out path set → {}", app.state.options.export.out_path.display());
                    app.out_path_dirty = false;
                }

                let path = app.state.options.export.out_path.clone();
                match export::export_to_path(&path, &app.rows, group, include_headers) {
                    Ok(p) => app.status(format!("Exported {} rows to {}", app.rows.len(), p.display())),
                    Err(e) => {
                        loge!("Export: Error: {}", e);
                        app.status(format!("Export error: {e}"));
                    }
                }
            }
        }

        // Shareable settings
        if ui.button("Copy settings").on_hover_text("Query string for the current players and view").clicked() {
            app.sync_players_into_state();
            let q = app.settings_query();
            logf!("Copy: settings {q:?}");
            ui.ctx().copy_text(q);
            app.status("Settings copied");
        }
    });
}

/// Bottom status line plus the latest scoped failure notices.
pub fn draw_status(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        if app.running() {
            ui.spinner();
        }
        ui.label(format!("Status: {}", app.status));
        if !app.notices.is_empty() && ui.small_button("Clear notices").clicked() {
            app.notices.clear();
        }
    });
    for n in &app.notices {
        ui.colored_label(egui::Color32::from_rgb(0xF0, 0xD2, 0x3C), n);
    }
}
