// src/gui/components/mod.rs
pub mod data_table;
pub mod export_bar;
pub mod filter_bar;
pub mod player_panel;
pub mod tabs;
