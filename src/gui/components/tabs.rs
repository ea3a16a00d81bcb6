// src/gui/components/tabs.rs
//
// Renders the top tabs and performs the tab switch itself, plus the
// per-tab load controls (market flags, order lookup).

use eframe::egui;
use crate::{config::options::PageKind, gui::app::App};

const TABS: [(PageKind, &str); 3] = [
    (PageKind::Inventory, "Inventory"),
    (PageKind::Market, "Market"),
    (PageKind::Orders, "Orders"),
];

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        let cur = app.state.gui.page;
        for (kind, title) in TABS {
            let selected = kind == cur;
            if ui.selectable_label(selected, title).clicked() && !selected {
                logf!("UI: Tab switch {:?} → {:?}", cur, kind);
                app.state.gui.page = kind;
            }
        }
    });

    match app.state.gui.page {
        PageKind::Inventory => {}
        PageKind::Market => market_controls(ui, app),
        PageKind::Orders => order_controls(ui, app),
    }
}

fn market_controls(ui: &mut egui::Ui, app: &mut App) {
    ui.horizontal(|ui| {
        let m = &mut app.state.options.market;
        ui.checkbox(&mut m.has_sell_orders, "Has sell orders");
        ui.checkbox(&mut m.has_buy_orders, "Has buy orders");

        if ui.button("Load market").clicked() {
            logf!("UI: Load market {:?}", app.state.options.market);
            app.load_market();
        }
        let any = !app.board.listings().is_empty();
        if ui.add_enabled(any, egui::Button::new("Prices for visible")).clicked() {
            app.load_prices();
        }
    });
}

fn order_controls(ui: &mut egui::Ui, app: &mut App) {
    let players = app.viewer.summaries();
    if players.is_empty() {
        ui.label("Add a player to look up their market orders.");
        return;
    }

    let mut pick = app.orders_player.clone().unwrap_or_else(|| players[0].id.clone());
    ui.horizontal(|ui| {
        let shown = players.iter().find(|p| p.id == pick).map_or(pick.as_str(), |p| p.name.as_str());
        egui::ComboBox::from_id_salt("orders_player")
            .selected_text(shown.to_string())
            .show_ui(ui, |ui| {
                for p in &players {
                    ui.selectable_value(&mut pick, p.id.clone(), &p.name);
                }
            });

        if ui.button("Look up orders").clicked() {
            logf!("UI: Orders for {pick}");
            app.load_orders(pick.clone());
        }
    });
}
