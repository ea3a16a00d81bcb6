// src/lib.rs

#[macro_use]
pub mod macros;
#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod decode;
pub mod error;
pub mod items;
pub mod specs;

pub mod aggregate;
pub mod export;
pub mod market;
pub mod progress;
pub mod scrape;
pub mod viewer;

#[cfg(feature = "cli")]
pub mod cli;
pub mod gui;
