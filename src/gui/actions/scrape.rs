// src/gui/actions/scrape.rs
use std::{
    sync::mpsc::{self, TryRecvError},
    thread,
};

use eframe::egui;

use crate::{
    config::options::PageKind,
    file::ensure_directory,
    gui::{app::App, progress::GuiProgress, router},
    roster::list_institutions,
    scrape::collect_works,
};

/// Start a works scrape for the selected institutions on a background thread.
pub fn scrape(app: &mut App, ctx: &egui::Context) {
    if app.running {
        return;
    }
    app.sync_gui_selection_into_scrape();

    let options = app.state.options.clone();
    let institutions = options.scrape.institutions.resolve(&app.institutions);
    if institutions.is_empty() {
        return app.status("Select at least one institution");
    }

    logf!("Scrape: Begin institutions={:?}", options.scrape.institutions);

    let (tx, rx) = mpsc::channel();
    let mut prog = GuiProgress::new(app.status.clone(), ctx.clone());
    thread::spawn(move || {
        let paths = &options.paths;
        let result = ensure_directory(&paths.works_dir)
            .and_then(|_| collect_works(&options.scrape, &paths.institutions_dir, &institutions, &mut prog))
            .and_then(|report| report.write(&paths.works_dir).map(|_| report));
        // Receiver gone means the window closed; nothing left to report to.
        let _ = tx.send(result);
    });

    app.scrape_rx = Some(rx);
    app.running = true;
}

/// Pick up a finished scrape: merge into the Works page, cache, show it.
pub fn poll_scrape(app: &mut App) {
    let Some(rx) = &app.scrape_rx else { return };
    let result = match rx.try_recv() {
        Ok(result) => result,
        Err(TryRecvError::Empty) => return,
        Err(TryRecvError::Disconnected) => {
            app.scrape_rx = None;
            app.running = false;
            loge!("Scrape: worker thread ended without a result");
            return app.status("Scrape stopped unexpectedly");
        }
    };
    app.scrape_rx = None;
    app.running = false;

    match result {
        Ok(report) => {
            let kind = PageKind::Works;
            let page = router::page_for(&kind);
            let new_ds = report.to_dataset();
            logf!("Scrape: OK rows={} failed={}", new_ds.row_count(), report.failed.len());

            let entry = app.data.entry(kind).or_default();
            page.merge(entry, new_ds);
            if let Some(ds) = app.data.get(&kind) {
                app.save_cache(kind, ds);
            }

            // New institution folders may have appeared meanwhile
            if let Ok(list) = list_institutions(&app.state.options.paths.institutions_dir) {
                app.institutions = list;
            }

            app.set_current_index(router::index_of(&kind));
            app.rebuild_view();
            app.status(format!(
                "Ready: {} works, {} failed record(s)",
                report.total_rows(),
                report.failed.len()
            ));
        }
        Err(e) => {
            loge!("Scrape: Error: {}", e);
            app.status(format!("Error: {e}"));
        }
    }
}
