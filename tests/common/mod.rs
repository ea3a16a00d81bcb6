// tests/common/mod.rs
//
// In-memory Fetch for integration tests: canned bodies per path, optional
// per-request delay, and bookkeeping of calls and peak concurrency.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use stash_scrape::core::Fetch;
use stash_scrape::error::FetchError;

#[derive(Default)]
pub struct FakeFetch {
    routes: HashMap<String, Result<String, u16>>,
    delay: Option<Duration>,
    pub calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    pub peak: AtomicUsize,
}

impl FakeFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, path: &str, body: &str) -> Self {
        self.routes.insert(path.to_string(), Ok(body.to_string()));
        self
    }

    pub fn status(mut self, path: &str, code: u16) -> Self {
        self.routes.insert(path.to_string(), Err(code));
        self
    }

    pub fn delay(mut self, d: Duration) -> Self {
        self.delay = Some(d);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

impl Fetch for FakeFetch {
    fn get(&self, path: &str) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(path.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if let Some(d) = self.delay {
            thread::sleep(d);
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.routes.get(path) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(code)) => Err(FetchError::Status { code: *code, url: path.to_string() }),
            None => Err(FetchError::Status { code: 404, url: path.to_string() }),
        }
    }
}
