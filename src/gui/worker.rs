// src/gui/worker.rs
//
// Background jobs for the GUI. Each job runs on its own thread and reports
// over one mpsc channel; every message carries the ticket it was started
// under so the UI thread can drop answers that arrive too late.

use std::{
    sync::{Arc, mpsc::Sender},
    thread,
};

use eframe::egui;

use super::progress::GuiProgress;
use crate::{
    config::options::MarketOptions,
    core::Fetch,
    items::NormalizedItem,
    market::{FlaggedOrder, MarketListing, PriceSummary},
    scrape,
    specs::{self, catalog::Catalog, players::PlayerSummary},
    viewer::Ticket,
};

pub enum Msg {
    Status(String),
    /// Scoped failure notice (one player, one item).
    Notice(String),
    Players { ticket: Ticket, result: Result<Vec<PlayerSummary>, String> },
    Resolved(PlayerSummary),
    Inventory { ticket: Ticket, player_id: String, result: Result<Vec<NormalizedItem>, String> },
    Catalog(Result<Catalog, String>),
    Listings { ticket: Ticket, result: Result<Vec<MarketListing>, String> },
    Prices { ticket: Ticket, wave: Vec<(String, PriceSummary)> },
    Orders { ticket: Ticket, player_id: String, result: Result<Vec<FlaggedOrder>, String> },
    /// A job finished (success or not).
    Idle,
}

#[derive(Clone)]
pub struct Worker {
    fetch: Arc<dyn Fetch>,
    tx: Sender<Msg>,
    ctx: egui::Context,
}

impl Worker {
    pub fn new(fetch: Arc<dyn Fetch>, tx: Sender<Msg>, ctx: egui::Context) -> Self {
        Self { fetch, tx, ctx }
    }

    fn spawn(&self, job: impl FnOnce(&dyn Fetch, &Sender<Msg>, &egui::Context) + Send + 'static) {
        let fetch = Arc::clone(&self.fetch);
        let tx = self.tx.clone();
        let ctx = self.ctx.clone();
        thread::spawn(move || {
            job(&*fetch, &tx, &ctx);
            let _ = tx.send(Msg::Idle);
            ctx.request_repaint();
        });
    }

    fn progress(&self, what: &'static str) -> GuiProgress {
        GuiProgress::new(self.tx.clone(), self.ctx.clone(), what)
    }

    pub fn search(&self, ticket: Ticket, fragment: String) {
        self.spawn(move |fetch, tx, _| {
            let result = specs::players::search(fetch, &fragment).map_err(|e| e.to_string());
            let _ = tx.send(Msg::Players { ticket, result });
        });
    }

    pub fn catalog(&self) {
        self.spawn(|fetch, tx, _| {
            let _ = tx.send(Msg::Status(s!("Loading item catalog…")));
            let _ = tx.send(Msg::Catalog(specs::catalog::fetch(fetch).map_err(|e| e.to_string())));
        });
    }

    /// Sequential refresh. With `resolve`, profiles are looked up first so
    /// ids seeded from a query string get real display names.
    pub fn refresh(&self, ticket: Ticket, players: Vec<PlayerSummary>, catalog: Option<Arc<Catalog>>, resolve: bool) {
        let mut prog = self.progress("Inventories");
        self.spawn(move |fetch, tx, ctx| {
            let players: Vec<PlayerSummary> = if resolve {
                players
                    .into_iter()
                    .map(|p| match specs::players::profile(fetch, &p.id) {
                        Ok(Some(found)) => {
                            let _ = tx.send(Msg::Resolved(found.clone()));
                            found
                        }
                        Ok(None) => p,
                        Err(e) => {
                            logw!("Profile {}: {e}", p.id);
                            p
                        }
                    })
                    .collect()
            } else {
                players
            };

            scrape::inventories_in_order(fetch, &players, catalog.as_deref(), Some(&mut prog), |r| {
                let _ = tx.send(Msg::Inventory {
                    ticket,
                    player_id: r.player.id,
                    result: r.items.map_err(|e| e.to_string()),
                });
                ctx.request_repaint();
            });
        });
    }

    pub fn listings(&self, ticket: Ticket, opts: MarketOptions) {
        self.spawn(move |fetch, tx, _| {
            let _ = tx.send(Msg::Status(s!("Loading market…")));
            let result = specs::market::listing(fetch, &opts).map_err(|e| e.to_string());
            let _ = tx.send(Msg::Listings { ticket, result });
        });
    }

    /// Price summaries in waves; each wave is sent as soon as it completes.
    pub fn prices(&self, ticket: Ticket, ids: Vec<String>) {
        let mut prog = self.progress("Prices");
        self.spawn(move |fetch, tx, ctx| {
            scrape::order_book_waves(fetch, &ids, Some(&mut prog), |wave| {
                let _ = tx.send(Msg::Prices { ticket, wave: scrape::wave_prices(wave) });
                ctx.request_repaint();
            });
        });
    }

    pub fn orders(&self, ticket: Ticket, player_id: String) {
        let mut prog = self.progress("Order books");
        self.spawn(move |fetch, tx, _| {
            let result = scrape::cheapest_orders(fetch, &player_id, Some(&mut prog)).map_err(|e| e.to_string());
            let _ = tx.send(Msg::Orders { ticket, player_id, result });
        });
    }
}
