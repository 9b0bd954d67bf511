// src/gui/components/data_table.rs
//
// Draws the live table: headers from the page data (or the page defaults),
// body rows from `app.row_ix`. Column widths are remembered per page.

use eframe::egui::{self, Align, Layout, RichText, TextWrapMode};
use egui_extras::{Column, TableBuilder};

use crate::config::options::PageKind;
use crate::gui::app::App;

const ROW_HEIGHT: f32 = 20.0;
const DEFAULT_WIDTH: f32 = 120.0;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let page = app.current_page();
    let kind = page.kind();

    let headers: Vec<String> = app
        .current_data()
        .and_then(|ds| ds.headers.clone())
        .unwrap_or_else(|| page.default_headers().iter().map(|h| s!(*h)).collect());
    let cols = headers.len();

    let widths = app.col_widths.entry(kind).or_insert_with(|| {
        page.preferred_column_widths().map(|ws| ws.to_vec()).unwrap_or_default()
    });
    if widths.len() != cols {
        widths.resize(cols, DEFAULT_WIDTH);
    }
    let widths = widths.clone();

    // Scroll bars reserve their space instead of floating over the content
    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.bar_inner_margin = 7.0;
        s.bar_outer_margin = 0.0;
        s.handle_min_length = 48.0;
        s.foreground_color = true;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let avail_h = ui.available_height();
    egui::ScrollArea::new([true, false])
        .id_salt("inner_table_hscroll")
        .min_scrolled_height(avail_h)
        .max_height(avail_h)
        .show(ui, |ui| {
            let realized = inner_table(ui, app, kind, &headers, &widths);
            if let Some(ws) = app.col_widths.get_mut(&kind) {
                for (slot, w) in ws.iter_mut().zip(realized) {
                    *slot = w;
                }
            }
        });
}

/// Returns the realized header widths so resizes survive tab switches.
fn inner_table(ui: &mut egui::Ui, app: &App, kind: PageKind, headers: &[String], widths: &[f32]) -> Vec<f32> {
    let mut table = TableBuilder::new(ui).striped(true).min_scrolled_height(0.0).id_salt(("table_state", kind));
    for &w in widths {
        table = table.column(Column::initial(w).resizable(true).clip(true).at_least(20.0));
    }

    let ds = app.current_data();
    let mut realized = Vec::with_capacity(headers.len());

    table
        .header(24.0, |mut header| {
            for h in headers {
                header.col(|ui| {
                    ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                    ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                        ui.add(egui::Label::new(RichText::new(h).strong()).selectable(false));
                    });
                    realized.push(ui.max_rect().width().max(20.0));
                });
            }
        })
        .body(|body| {
            let Some(ds) = ds else { return };
            body.rows(ROW_HEIGHT, app.row_ix.len(), |mut row| {
                let Some(data) = app.row_ix.get(row.index()).and_then(|&i| ds.rows.get(i)) else {
                    return;
                };
                for ci in 0..headers.len() {
                    let cell = data.get(ci).map(String::as_str).unwrap_or("");
                    row.col(|ui| {
                        ui.style_mut().wrap_mode = Some(TextWrapMode::Extend);
                        ui.with_layout(Layout::left_to_right(Align::Center), |ui| {
                            ui.label(cell).on_hover_text(cell);
                        });
                    });
                }
            });
        });

    realized
}
