// src/bin/gui.rs
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]
use eframe::egui::ViewportBuilder;
use stash_scrape::{
    config::{query, state::AppState},
    gui, log,
};

fn main() {
    log::init();

    // Optional first argument: a saved settings query string.
    let mut state = AppState::default();
    if let Some(q) = std::env::args().nth(1) {
        query::decode(&q).apply_to(&mut state);
    }

    let options = eframe::NativeOptions {
        viewport: ViewportBuilder::default()
            .with_inner_size([state.gui.window_w as f32, state.gui.window_h as f32]),
        ..Default::default()
    };

    if let Err(e) = gui::run(options, state) {
        eprintln!("GUI failed: {}", e);
        std::process::exit(1);
    }
}
