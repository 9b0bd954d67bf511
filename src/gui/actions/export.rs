// src/gui/actions/export.rs
use crate::{file::export_dataset, gui::app::App};

pub fn export(app: &mut App) {
    // normalize out_path first (mutates app) before any &app borrows
    if app.out_path_dirty {
        app.state.options.export.set_path(&app.out_path_text);
        logf!("Export: Out path set -> {}", app.state.options.export.out_path().display());
        app.out_path_dirty = false;
    }

    if app.row_ix.is_empty() {
        logd!("Export: Clicked, but there's nothing to export");
        return app.status("Nothing to export");
    }
    let Some((headers, rows)) = app.visible_table() else {
        return app.status("Nothing to export (no data loaded)");
    };

    let page = app.current_page();
    let inst_col = app.current_data().and_then(|ds| page.institution_column(ds));
    let export = &app.state.options.export;

    logf!(
        "Export: Begin page={:?}, rows={}, type={:?}",
        page.kind(),
        rows.len(),
        export.export_type
    );

    let status_msg = match export_dataset(export, &headers, &rows, inst_col) {
        Ok(paths) => match paths.last() {
            Some(last) => {
                logf!("Export: OK count={} last={}", paths.len(), last.display());
                format!("Exported {} file(s). Last: {}", paths.len(), last.display())
            }
            None => s!("Nothing to export"),
        },
        Err(e) => {
            loge!("Export: Error: {}", e);
            format!("Export error: {e}")
        }
    };

    app.status(status_msg);
}
