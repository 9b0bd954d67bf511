// src/gui/components/tabs.rs
//
// Top tabs. Switching rebuilds the new page's view from its data plus the
// institution selection, and moves the output directory along when it was
// still the previous page's default.

use eframe::egui;

use crate::gui::{app::App, router};

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let mut switch_to: Option<usize> = None;

    ui.horizontal_wrapped(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;
        let cur = app.current_index();

        for (idx, page) in router::all_pages().iter().enumerate() {
            let selected = idx == cur;
            let label = match app.data.get(&page.kind()) {
                Some(ds) => format!("{} ({})", page.title(), ds.row_count()),
                None => s!(page.title()),
            };
            if ui.selectable_label(selected, label).clicked() && !selected {
                switch_to = Some(idx);
            }
        }
    });

    if let Some(idx) = switch_to {
        switch(app, idx);
    }
}

fn switch(app: &mut App, idx: usize) {
    let prev = app.current_page_kind();
    app.set_current_index(idx);
    let next = app.current_page_kind();
    logf!("UI: Tab switch {:?} -> {:?}", prev, next);
    app.rebuild_view();

    // A pending (dirty) edit keeps its file name and stays pending.
    if let Some(text) = app.state.options.export.follow_page(&app.out_path_text, prev, next) {
        logd!("UI: Output follows page -> {}", text);
        app.out_path_text = text;
    }
}
