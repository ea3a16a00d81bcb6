// src/config/consts.rs

// Net config
pub const DEFAULT_PROXY: &str = "http://127.0.0.1:8787";
pub const PROXY_ENV: &str = "STASH_SCRAPE_PROXY";
pub const API_PREFIX: &str = "/api";
pub const HTTP_TIMEOUT_SECS: u64 = 20;
pub const USER_AGENT: &str = concat!("stash_scrape/", env!("CARGO_PKG_VERSION"));

// Local store (logs only; no data cache)
pub const STORE_DIR: &str = ".store";
pub const LOG_FILE: &str = "debug.log";

// Export
pub const DEFAULT_OUT_DIR: &str = "out";
pub const DEFAULT_FILE: &str = "inventory.csv";

// Concurrency
pub const MARKET_BATCH: usize = 10; // concurrent price lookups per wave

// Item defaults
pub const DEFAULT_TAG: &str = "Other";
pub const DEFAULT_LOCATION: &str = "Inventory";
