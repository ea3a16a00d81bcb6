// src/log.rs
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::{EnvFilter, fmt, fmt::time::Uptime};

use crate::config::consts::{LOG_FILE, STORE_DIR};

#[doc(hidden)]
pub use tracing;

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global subscriber. Lines go to `.store/debug.log` with an
/// uptime stamp; if the file can't be opened we fall back to stderr.
/// Safe to call more than once (later calls are no-ops).
pub fn init() {
    let _ = fs::create_dir_all(STORE_DIR);
    let path = Path::new(STORE_DIR).join(LOG_FILE);

    match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => {
            let _ = fmt()
                .with_env_filter(filter())
                .with_timer(Uptime::default())
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        Err(_) => {
            let _ = fmt()
                .with_env_filter(filter())
                .with_timer(Uptime::default())
                .with_writer(std::io::stderr)
                .try_init();
        }
    }
}

/// Info-level logging
#[macro_export]
macro_rules! logf {
    ($($arg:tt)*) => {
        $crate::log::tracing::info!($($arg)*)
    };
}

/// Debug-level logging
#[macro_export]
macro_rules! logd {
    ($($arg:tt)*) => {
        $crate::log::tracing::debug!($($arg)*)
    };
}

/// Warn-level logging
#[macro_export]
macro_rules! logw {
    ($($arg:tt)*) => {
        $crate::log::tracing::warn!($($arg)*)
    };
}

/// Error-level logging
#[macro_export]
macro_rules! loge {
    ($($arg:tt)*) => {
        $crate::log::tracing::error!($($arg)*)
    };
}
