// src/config/state.rs
use super::options::{AppOptions, PageKind};

#[derive(Clone, Debug)]
pub struct GuiState {
    pub window_w: u32,
    pub window_h: u32,

    /// Active tab
    pub page: PageKind,

    /// Player search box
    pub search_text: String,
}

impl Default for GuiState {
    fn default() -> Self {
        Self {
            window_w: 1100,
            window_h: 700,
            page: PageKind::Inventory,
            search_text: s!(),
        }
    }
}

/// Everything the query string can carry, plus GUI-only bits.
#[derive(Clone, Debug, Default)]
pub struct AppState {
    /// Selected player ids, in selection order
    pub player_ids: Vec<String>,
    pub options: AppOptions,
    pub gui: GuiState,
}
