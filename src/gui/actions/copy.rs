// src/gui/actions/copy.rs
use eframe::egui;

use crate::{csv::to_export_string, gui::app::App};

pub fn copy(app: &mut App, ui_ctx: &egui::Context) {
    if app.row_ix.is_empty() {
        app.status("Nothing to copy");
        logd!("Copy: Clicked, but there's nothing to copy");
        return;
    }

    let Some((headers, rows)) = app.visible_table() else {
        app.status("Nothing to copy (no data loaded)");
        return;
    };

    let export = &app.state.options.export;
    logf!("Copy: page={:?}, rows={}", app.current_page_kind(), rows.len());
    let txt = to_export_string(&headers, &rows, export.include_headers, export.delimiter());

    ui_ctx.copy_text(txt);
    app.status(format!("Copied {} rows to clipboard", rows.len()));
}
