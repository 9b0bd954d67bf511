// src/gui/components/export_bar.rs

use std::path::{Path, PathBuf};

use eframe::egui::{self, Checkbox, widgets::Spinner};

use crate::{
    config::options::{
        ExportFormat,
        ExportType::{self, PerInstitution, SingleFile},
    },
    gui::{actions, app::App},
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum UiFormat { Csv, Tsv }

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    let page = app.current_page();
    let cur_kind = page.kind();
    let per_inst_applicable = app.current_data().is_some_and(|ds| page.institution_column(ds).is_some());

    {
        let export = &mut app.state.options.export;

        // --- Format + Include headers ---
        let prev_fmt = match export.format {
            ExportFormat::Csv => UiFormat::Csv,
            ExportFormat::Tsv => UiFormat::Tsv,
        };
        let mut fmt = prev_fmt;

        ui.horizontal(|ui| {
            ui.label("Format:");
            ui.selectable_value(&mut fmt, UiFormat::Csv, "CSV");
            ui.selectable_value(&mut fmt, UiFormat::Tsv, "TSV");

            let before_headers = export.include_headers;
            ui.checkbox(&mut export.include_headers, "Include headers");
            if export.include_headers != before_headers {
                logf!("UI: Include_headers -> {}", export.include_headers);
            }
        });

        if fmt != prev_fmt {
            export.format = match fmt {
                UiFormat::Csv => ExportFormat::Csv,
                UiFormat::Tsv => ExportFormat::Tsv,
            };
            logf!("UI: Export format -> {:?}", export.format);

            // Keep the text field in step while the user hasn't typed a path.
            if !app.out_path_dirty && export.is_fully_default_for(cur_kind) {
                app.out_path_text = export.out_path().to_string_lossy().into_owned();
            }
        }
    }

    // Page-specific controls
    if page.draw_controls(ui, &mut app.state.gui) {
        app.rebuild_view();
    }

    let export = &mut app.state.options.export;

    // --- Per-institution toggle + Output field ---
    let mut open_folder_clicked = false;
    ui.horizontal(|ui| {
        // Always show the checkbox; gray it out where rows have no institution.
        let mut single = matches!(export.export_type, SingleFile);
        let changed = ui
            .add_enabled(per_inst_applicable, Checkbox::new(&mut single, "All institutions in one file"))
            .changed();

        if per_inst_applicable && changed {
            export.export_type = if single { SingleFile } else { PerInstitution };
            if !app.out_path_dirty {
                app.out_path_text = export.out_path().to_string_lossy().into_owned();
            }
            logf!("UI: export_type -> {:?}", export.export_type);
        }

        if !per_inst_applicable && !matches!(export.export_type, SingleFile) {
            export.export_type = SingleFile;
            if !app.out_path_dirty {
                app.out_path_text = export.out_path().to_string_lossy().into_owned();
            }
        }

        ui.label("Output:");
        if ui
            .add(egui::TextEdit::singleline(&mut app.out_path_text).font(egui::TextStyle::Monospace))
            .changed()
        {
            app.out_path_dirty = true;
            logd!("UI: out_path_text changed (dirty=true) -> {}", app.out_path_text);
        }

        if ui.button("📁").on_hover_text("Open output folder").clicked() {
            open_folder_clicked = true;
        }
    });

    if open_folder_clicked {
        open_output_folder(app);
    }

    // --- Actions (Copy / Export / Reload / SCRAPE) ---
    ui.horizontal(|ui| {
        if ui.button("Copy").clicked() {
            actions::copy(app, ui.ctx());
        }

        if ui.button("Export").clicked() {
            actions::export(app);
        }

        if ui.add_enabled(!app.running, egui::Button::new("Reload")).on_hover_text("Re-read the pipeline files").clicked() {
            app.reload_current();
        }

        let red = egui::Color32::from_rgb(220, 30, 30);
        let black = egui::Color32::BLACK;
        let button_scrape = ui.add_enabled(
            !app.running,
            egui::Button::new(egui::RichText::new("SCRAPE").color(black).strong()).fill(red),
        );
        if button_scrape.on_hover_text("Fetch ORCID works for the selected institutions").clicked() {
            actions::scrape(app, ui.ctx());
        }

        if app.running {
            ui.add(Spinner::new().size(16.0));
        }

        ui.label(format!("{} rows | {}", app.row_ix.len(), app.status_text()));
    });
}

/// Open the output folder in the system file explorer.
fn open_output_folder(app: &App) {
    let export = &app.state.options.export;
    let path = export.out_path();

    let folder = match export.export_type {
        ExportType::SingleFile => path.parent().unwrap_or(Path::new(".")),
        ExportType::PerInstitution => path.as_path(),
    };

    let folder_to_open = find_nearest_existing_parent(folder);
    let absolute_folder = match std::fs::canonicalize(&folder_to_open) {
        Ok(abs_path) => abs_path,
        Err(e) => {
            let msg = format!("Cannot resolve folder path: {e}");
            loge!("{}", msg);
            app.status(msg);
            return;
        }
    };

    if let Err(e) = open_folder_in_explorer(&absolute_folder) {
        loge!("Failed to open folder: {}", e);
        app.status(format!("Failed to open folder: {e}"));
    } else {
        logf!("Opened folder: {}", absolute_folder.display());
    }
}

/// Walk up until an existing directory is found; "." at the root.
fn find_nearest_existing_parent(path: &Path) -> PathBuf {
    let mut current = path.to_path_buf();
    loop {
        if current.is_dir() {
            return current;
        }
        match current.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => current = parent.to_path_buf(),
            _ => return PathBuf::from("."),
        }
    }
}

fn open_folder_in_explorer(path: &Path) -> std::io::Result<()> {
    #[cfg(target_os = "windows")]
    let program = "explorer";
    #[cfg(target_os = "macos")]
    let program = "open";
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let program = "xdg-open";

    std::process::Command::new(program).arg(path).spawn().map(|_| ())
}
