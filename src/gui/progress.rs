// src/gui/progress.rs
use std::sync::mpsc::Sender;

use eframe::egui;

use super::worker::Msg;
use crate::progress::Progress;

/// Progress sink for background jobs: status lines and failure notices go
/// back to the UI thread over the worker channel.
pub struct GuiProgress {
    tx: Sender<Msg>,
    ctx: egui::Context,
    what: &'static str,
    done: usize,
    failed: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(tx: Sender<Msg>, ctx: egui::Context, what: &'static str) -> Self {
        Self { tx, ctx, what, done: 0, failed: 0, total: 0 }
    }

    fn send(&self, msg: Msg) {
        let _ = self.tx.send(msg);
        self.ctx.request_repaint();
    }

    fn set_status(&self, msg: impl Into<String>) {
        self.send(Msg::Status(msg.into()));
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        self.set_status(s!(msg));
    }
    fn item_done(&mut self, _id: &str) {
        self.done += 1;
        self.set_status(format!("{}: {}/{}", self.what, self.done + self.failed, self.total));
    }
    fn item_failed(&mut self, _id: &str, msg: &str) {
        self.failed += 1;
        self.send(Msg::Notice(format!("{}: {msg}", self.what)));
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status(format!("{} complete", self.what)); // no counts if we never began
        } else if self.failed == 0 {
            self.set_status(format!("{} complete ({}/{})", self.what, self.done, self.total));
        } else {
            self.set_status(format!(
                "{} complete ({}/{}, {} failed)",
                self.what, self.done, self.total, self.failed
            ));
        }
    }
}
