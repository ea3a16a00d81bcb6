// src/progress.rs
/// Lightweight progress reporting used by long-running operations (refresh, price waves, export).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of items (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called when one logical unit completes (a player's inventory, an item's order book).
    fn item_done(&mut self, _id: &str) {}

    /// One unit failed. The batch carries on; this is the user-visible notice.
    fn item_failed(&mut self, _id: &str, _msg: &str) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects everything it's told. Handy for tests and for the CLI summary.
#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub total: Option<usize>,
    pub lines: Vec<String>,
    pub done: Vec<String>,
    pub failed: Vec<(String, String)>,
    pub finished: bool,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, total: usize) {
        self.total = Some(total);
    }
    fn log(&mut self, msg: &str) {
        self.lines.push(s!(msg));
    }
    fn item_done(&mut self, id: &str) {
        self.done.push(s!(id));
    }
    fn item_failed(&mut self, id: &str, msg: &str) {
        self.failed.push((s!(id), s!(msg)));
    }
    fn finish(&mut self) {
        self.finished = true;
    }
}
