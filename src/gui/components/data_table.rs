// src/gui/components/data_table.rs
//
// Draws the live table for the current tab. Purely a view over App; the only
// write-back is a header click, which changes the sort.

use eframe::egui::{self, Align, Color32, Layout, RichText, Sense, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::{
    config::options::{GroupMode, PageKind, SortKey},
    gui::app::App,
    items::tables::tier_label,
    market::Side,
};

const GREEN: Color32 = Color32::from_rgb(0x5C, 0xC8, 0x5C);
const RED: Color32 = Color32::from_rgb(0xDC, 0x61, 0x49);

/// One cell: text, right-aligned numeric flag, optional color.
struct Cell {
    text: String,
    numeric: bool,
    color: Option<Color32>,
}

impl Cell {
    fn text(s: impl Into<String>) -> Self {
        Self { text: s.into(), numeric: false, color: None }
    }
    fn num(s: impl ToString) -> Self {
        Self { text: s.to_string(), numeric: true, color: None }
    }
    fn colored(mut self, c: Option<Color32>) -> Self {
        self.color = c;
        self
    }
}

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    // Ensure scroll bars allocate space (not floating over content)
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let page = app.state.gui.page;
    let (headers, sort_keys, rows) = match page {
        PageKind::Inventory => inventory_table(app),
        PageKind::Market => market_table(app),
        PageKind::Orders => orders_table(app),
    };

    if rows.is_empty() {
        ui.label(empty_hint(app, page));
        return;
    }

    if let Some(ix) = grid(ui, page, &headers, &sort_keys, &rows) {
        if let Some(key) = sort_keys.get(ix).copied().flatten() {
            let sort = &mut app.state.options.view.sort;
            if sort.key == key {
                sort.descending = !sort.descending;
            } else {
                sort.key = key;
                sort.descending = false;
            }
            logf!("UI: Sort → {:?}", sort);
            app.rebuild_view();
        }
    }
}

fn empty_hint(app: &App, page: PageKind) -> &'static str {
    match page {
        PageKind::Inventory if app.viewer.players().is_empty() => "No players selected.",
        PageKind::Inventory => "No items match.",
        PageKind::Market if app.board.listings().is_empty() => "Market not loaded.",
        PageKind::Market => "No listings match.",
        PageKind::Orders => "No orders loaded.",
    }
}

type Table = (Vec<&'static str>, Vec<Option<SortKey>>, Vec<Vec<Cell>>);

fn inventory_table(app: &App) -> Table {
    let by_player = app.state.options.view.group == GroupMode::ItemAndPlayer;
    let mut headers = vec!["Name", "Tier", "Rarity", "Count", "Tag"];
    let mut keys = vec![Some(SortKey::Name), Some(SortKey::Tier), Some(SortKey::Rarity), Some(SortKey::Count), None];
    headers.push(if by_player { "Player" } else { "Players" });
    keys.push(None);

    let rows = app
        .rows
        .iter()
        .map(|r| {
            let it = &r.item;
            let who = if by_player {
                it.player_name.clone()
            } else {
                r.player_quantities
                    .iter()
                    .map(|(name, n)| format!("{name}: {n}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            };
            vec![
                Cell::text(it.name.clone()),
                Cell::text(tier_label(it.tier)),
                Cell::text(it.rarity.as_str()),
                Cell::num(it.count),
                Cell::text(it.tag.clone()),
                Cell::text(who),
            ]
        })
        .collect();
    (headers, keys, rows)
}

fn market_table(app: &App) -> Table {
    let headers = vec!["Name", "Tier", "Rarity", "Tag", "Sell", "Buy", "Lowest ask", "Highest bid"];
    let keys = vec![Some(SortKey::Name), Some(SortKey::Tier), Some(SortKey::Rarity), None, Some(SortKey::Count), None, None, None];
    let view = &app.state.options.view;
    let price = |p: Option<u64>| p.map_or_else(|| s!("–"), |v| v.to_string());

    let rows = app
        .board
        .view(&view.filters, view.sort)
        .into_iter()
        .map(|l| {
            let p = app.board.price(&l.id).copied().unwrap_or_default();
            vec![
                Cell::text(l.name.clone()),
                Cell::text(tier_label(l.tier)),
                Cell::text(l.rarity.as_str()),
                Cell::text(l.tag.clone()),
                Cell::num(l.sell_orders),
                Cell::num(l.buy_orders),
                Cell::num(price(p.lowest_sell)),
                Cell::num(price(p.highest_buy)),
            ]
        })
        .collect();
    (headers, keys, rows)
}

fn orders_table(app: &App) -> Table {
    let headers = vec!["Side", "Item", "Price", "Qty", "Location", "Cheapest"];
    let rows = app
        .orders
        .iter()
        .map(|f| {
            let o = &f.order;
            let (flag, color) = match (o.side, f.cheapest) {
                (Side::Buy, _) => ("", None),
                (Side::Sell, Some(true)) => ("Yes", Some(GREEN)),
                (Side::Sell, Some(false)) => ("No", Some(RED)),
                (Side::Sell, None) => ("?", None),
            };
            vec![
                Cell::text(o.side.as_str()),
                Cell::text(o.item_name.clone()),
                Cell::num(o.price),
                Cell::num(o.quantity),
                Cell::text(o.location.clone()),
                Cell::text(flag).colored(color),
            ]
        })
        .collect();
    (headers, vec![None; 6], rows)
}

/// Returns the index of a clicked sortable header, if any.
fn grid(
    ui: &mut egui::Ui,
    page: PageKind,
    headers: &[&str],
    sort_keys: &[Option<SortKey>],
    rows: &[Vec<Cell>],
) -> Option<usize> {
    let mut clicked = None;
    let mut table = TableBuilder::new(ui)
        .striped(true)
        .min_scrolled_height(0.0)
        .id_salt(("table_state", page));
    for (ci, _) in headers.iter().enumerate() {
        let w = if ci == 0 { 220.0 } else { 90.0 };
        table = table.column(Column::initial(w).resizable(true).clip(true).at_least(30.0));
    }

    table
        .header(24.0, |mut header| {
            for (ci, h) in headers.iter().enumerate() {
                header.col(|ui| {
                    let sortable = sort_keys.get(ci).copied().flatten().is_some();
                    let label = egui::Label::new(RichText::new(*h).strong()).selectable(false);
                    let resp = if sortable { ui.add(label.sense(Sense::click())) } else { ui.add(label) };
                    if resp.clicked() {
                        clicked = Some(ci);
                    }
                });
            }
        })
        .body(|body| {
            body.rows(20.0, rows.len(), |mut row| {
                let Some(cells) = rows.get(row.index()) else { return };
                for cell in cells {
                    row.col(|ui| {
                        ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                        let mut rt = RichText::new(&cell.text);
                        if let Some(c) = cell.color {
                            rt = rt.color(c);
                        }
                        if cell.numeric {
                            ui.with_layout(Layout::right_to_left(Align::Center), |ui| { ui.label(rt); });
                        } else {
                            ui.with_layout(Layout::left_to_right(Align::Center), |ui| { ui.label(rt); });
                        }
                    });
                }
            });
        });
    clicked
}
