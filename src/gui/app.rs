// src/gui/app.rs
use std::{
    error::Error,
    sync::{
        Arc,
        mpsc::{self, Receiver},
    },
};

use eframe::egui;

use super::worker::{Msg, Worker};
use crate::{
    aggregate::AggregatedItem,
    config::{query::UrlSettings, state::AppState},
    core::{Fetch, ProxyClient},
    market::{FlaggedOrder, MarketBoard},
    specs::{catalog::Catalog, players::PlayerSummary},
    viewer::{Generation, InventoryViewer},
};

const MAX_NOTICES: usize = 8;

pub fn run(options: eframe::NativeOptions, state: AppState) -> Result<(), Box<dyn Error>> {
    let fetch: Arc<dyn Fetch> = Arc::new(ProxyClient::from_env()?);
    eframe::run_native(
        "Stash Scrape",
        options,
        Box::new(move |cc| Ok(Box::new(App::new(state, fetch, cc.egui_ctx.clone())))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    pub viewer: InventoryViewer,
    pub board: MarketBoard,
    pub catalog: Option<Arc<Catalog>>,

    // player search
    pub search_results: Vec<PlayerSummary>,
    pub search_gen: Generation,

    // orders tab
    pub orders_player: Option<String>,
    pub orders: Vec<FlaggedOrder>,
    pub orders_gen: Generation,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // in-memory display for the Inventory tab
    pub rows: Vec<AggregatedItem>,

    pub status: String,
    pub notices: Vec<String>,
    pub jobs: usize,

    worker: Worker,
    rx: Receiver<Msg>,
}

impl App {
    pub fn new(state: AppState, fetch: Arc<dyn Fetch>, ctx: egui::Context) -> Self {
        let (tx, rx) = mpsc::channel();
        let out_path_text = state.options.export.out_path.to_string_lossy().into_owned();

        let mut app = Self {
            state,
            viewer: InventoryViewer::new(),
            board: MarketBoard::new(),
            catalog: None,
            search_results: Vec::new(),
            search_gen: Generation::default(),
            orders_player: None,
            orders: Vec::new(),
            orders_gen: Generation::default(),
            out_path_text,
            out_path_dirty: false,
            rows: Vec::new(),
            status: s!("Idle"),
            notices: Vec::new(),
            jobs: 0,
            worker: Worker::new(fetch, tx, ctx),
            rx,
        };

        // Seeded from a query string: names are resolved by the first refresh.
        let seeded = app.state.player_ids.clone();
        for id in &seeded {
            app.viewer.add_player(PlayerSummary { id: id.clone(), name: id.clone() });
        }
        logf!("Init: players={}, page={:?}", seeded.len(), app.state.gui.page);
        if !seeded.is_empty() {
            app.start_refresh(true);
        }
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn status<T: Into<String>>(&mut self, msg: T) {
        self.status = msg.into();
    }

    #[inline]
    pub fn running(&self) -> bool {
        self.jobs > 0
    }

    pub fn notice(&mut self, msg: String) {
        self.notices.push(msg);
        if self.notices.len() > MAX_NOTICES {
            self.notices.remove(0);
        }
    }

    /// Rebuild the Inventory rows from the viewer and current view options.
    pub fn rebuild_view(&mut self) {
        self.rows = self.viewer.view(&self.state.options.view);
    }

    /// Mirror viewer selection → state (for the settings link).
    pub fn sync_players_into_state(&mut self) {
        self.state.player_ids = self.viewer.player_ids();
    }

    pub fn settings_query(&self) -> String {
        crate::config::query::encode(&UrlSettings::from_state(&self.state))
    }

    /* ---------- actions ---------- */

    pub fn start_search(&mut self) {
        let text = self.state.gui.search_text.trim().to_string();
        if text.is_empty() {
            return;
        }
        let ticket = self.search_gen.bump();
        logf!("UI: Player search {text:?}");
        self.jobs += 1;
        self.worker.search(ticket, text);
    }

    pub fn add_player(&mut self, p: PlayerSummary) {
        if self.viewer.add_player(p) {
            self.sync_players_into_state();
            self.start_refresh(false);
        }
    }

    pub fn remove_player(&mut self, id: &str) {
        if self.viewer.remove_player(id) {
            self.sync_players_into_state();
            if self.orders_player.as_deref() == Some(id) {
                self.orders_player = None;
                self.orders.clear();
                self.orders_gen.bump();
            }
            self.rebuild_view();
        }
    }

    pub fn start_refresh(&mut self, resolve: bool) {
        let (ticket, players) = self.viewer.begin_refresh();
        if players.is_empty() {
            return;
        }
        logf!("Refresh: Begin players={}", players.len());
        self.jobs += 1;
        self.worker.refresh(ticket, players, self.catalog.clone(), resolve);
    }

    pub fn load_catalog(&mut self) {
        self.jobs += 1;
        self.worker.catalog();
    }

    pub fn load_market(&mut self) {
        let ticket = self.board.begin_load();
        self.jobs += 1;
        self.worker.listings(ticket, self.state.options.market.clone());
    }

    /// Prices for the rows currently visible in the Market tab.
    pub fn load_prices(&mut self) {
        let view = &self.state.options.view;
        let ids = self.board.missing_prices(self.board.view(&view.filters, view.sort));
        if ids.is_empty() {
            self.status("Prices: nothing to fetch");
            return;
        }
        logf!("Prices: Begin items={}", ids.len());
        self.jobs += 1;
        self.worker.prices(self.board.ticket(), ids);
    }

    pub fn load_orders(&mut self, player_id: String) {
        let ticket = self.orders_gen.bump();
        self.orders_player = Some(player_id.clone());
        self.orders.clear();
        self.jobs += 1;
        self.worker.orders(ticket, player_id);
    }

    /* ---------- worker → UI ---------- */

    fn drain_messages(&mut self) {
        while let Ok(msg) = self.rx.try_recv() {
            self.handle(msg);
        }
    }

    fn handle(&mut self, msg: Msg) {
        match msg {
            Msg::Status(s) => self.status = s,
            Msg::Notice(n) => self.notice(n),
            Msg::Idle => self.jobs = self.jobs.saturating_sub(1),

            Msg::Players { ticket, result } => {
                if !self.search_gen.is_current(ticket) {
                    logd!("UI: stale player search dropped");
                    return;
                }
                match result {
                    Ok(list) => {
                        self.status(format!("{} player(s) found", list.len()));
                        self.search_results = list;
                    }
                    Err(e) => self.notice(format!("Search: {e}")),
                }
            }

            Msg::Resolved(p) => {
                self.viewer.rename(&p);
            }

            Msg::Inventory { ticket, player_id, result } => {
                if let Err(e) = &result {
                    loge!("Refresh: {player_id}: {e}");
                }
                if self.viewer.apply(ticket, &player_id, result) {
                    self.rebuild_view();
                }
            }

            Msg::Catalog(result) => match result {
                Ok(c) => {
                    self.status(format!("Catalog: {} items", c.len()));
                    self.catalog = Some(Arc::new(c));
                }
                Err(e) => self.notice(format!("Catalog: {e}")),
            },

            Msg::Listings { ticket, result } => match result {
                Ok(list) => {
                    let n = list.len();
                    if self.board.apply_listings(ticket, list) {
                        self.status(format!("Market: {n} items"));
                    }
                }
                Err(e) => self.notice(format!("Market: {e}")),
            },

            Msg::Prices { ticket, wave } => {
                self.board.apply_prices(ticket, wave);
            }

            Msg::Orders { ticket, player_id, result } => {
                if !self.orders_gen.is_current(ticket) {
                    logd!("UI: stale orders for {player_id} dropped");
                    return;
                }
                match result {
                    Ok(list) => {
                        self.status(format!("Orders: {} for {player_id}", list.len()));
                        self.orders = list;
                    }
                    Err(e) => self.notice(format!("Orders {player_id}: {e}")),
                }
            }
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_messages();

        egui::SidePanel::left("players")
            .resizable(true)
            .default_width(240.0)
            .show(ctx, |ui| {
                crate::gui::components::player_panel::draw(ui, self);
            });

        egui::TopBottomPanel::bottom("status").show(ctx, |ui| {
            crate::gui::components::export_bar::draw_status(ui, self);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            crate::gui::components::tabs::draw(ui, self);

            ui.separator();

            crate::gui::components::filter_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::export_bar::draw(ui, self);

            ui.separator();

            crate::gui::components::data_table::draw(ui, self);
        });

        if self.running() {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }
}
