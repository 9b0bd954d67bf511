// src/gui/progress.rs
use std::sync::{Arc, Mutex, PoisonError};

use eframe::egui;

use crate::progress::Progress;

/// Writes scrape progress into the shared status line and wakes the UI.
pub struct GuiProgress {
    status: Arc<Mutex<String>>,
    ctx: egui::Context,
    done: usize,
    failed: usize,
    total: usize,
}

impl GuiProgress {
    pub fn new(status: Arc<Mutex<String>>, ctx: egui::Context) -> Self {
        Self { status, ctx, done: 0, failed: 0, total: 0 }
    }

    fn set_status(&self, msg: impl Into<String>) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = msg.into();
        self.ctx.request_repaint();
    }
}

impl Progress for GuiProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.set_status(format!("Fetching {total} record(s)"));
    }
    fn log(&mut self, msg: &str) {
        self.set_status(msg);
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        self.set_status(format!("Fetched {label} ({}/{})", self.done + self.failed, self.total));
    }
    fn item_failed(&mut self, label: &str) {
        self.failed += 1;
        self.set_status(format!("Failed {label} ({}/{})", self.done + self.failed, self.total));
    }
    fn finish(&mut self) {
        if self.total == 0 {
            self.set_status("Fetch complete"); // no counts if we never began
        } else {
            self.set_status(format!("Fetch complete ({} ok, {} failed)", self.done, self.failed));
        }
    }
}
