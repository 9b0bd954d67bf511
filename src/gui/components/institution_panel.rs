// src/gui/components/institution_panel.rs
//
// Renders the left institution list and applies selection changes directly
// to `app`. Ctrl toggles, Shift selects a range, Ctrl+Shift extends it.

use eframe::egui;

use crate::gui::app::App;

pub fn draw(ui: &mut egui::Ui, app: &mut App) {
    ui.heading("Institutions");

    let apply_selection_change = |app: &mut App| {
        app.sync_gui_selection_into_scrape();
        app.rebuild_view();

        // Don't overwrite scrape progress with selection info
        if !app.running {
            app.set_selection_message();
        }
    };

    ui.horizontal(|ui| {
        if ui.button("All").clicked() {
            app.state.gui.selected_institutions = app.institutions.clone();
            apply_selection_change(app);
        }
        if ui.button("None").clicked() {
            app.state.gui.selected_institutions.clear();
            apply_selection_change(app);
        }
    });

    ui.separator();

    if app.institutions.is_empty() {
        ui.label(format!(
            "No institution sheets under {}",
            app.state.options.paths.institutions_dir.display()
        ));
        return;
    }

    {
        let s = &mut ui.style_mut().spacing.scroll;
        s.floating = false;
        s.bar_width = 10.0;
        s.handle_min_length = 48.0;
        s.foreground_color = true;
        let visuals = &mut ui.style_mut().visuals;
        visuals.extreme_bg_color = visuals.panel_fill;
    }

    let mut changed = false;
    egui::ScrollArea::vertical().id_salt("institutions_panel_scroll").show(ui, |ui| {
        let w = ui.available_width();
        ui.set_min_width(w);

        for idx in 0..app.institutions.len() {
            let name = &app.institutions[idx];
            let is_selected = app.state.gui.selected_institutions.contains(name);
            let resp = ui.selectable_label(is_selected, name.replace('_', " "));

            if !resp.clicked() || app.running {
                continue;
            }
            let modifiers = ui.input(|i| i.modifiers);
            let name = name.clone();
            let sel = &mut app.state.gui.selected_institutions;
            let range = |last: usize| if last <= idx { last..=idx } else { idx..=last };

            match (modifiers.ctrl, modifiers.shift, app.last_clicked) {
                (true, true, Some(last)) => {
                    for j in range(last) {
                        if !sel.contains(&app.institutions[j]) {
                            sel.push(app.institutions[j].clone());
                        }
                    }
                }
                (true, _, _) => {
                    if is_selected {
                        sel.retain(|x| *x != name);
                    } else {
                        sel.push(name);
                    }
                }
                (false, true, Some(last)) => {
                    *sel = app.institutions[range(last)].to_vec();
                }
                _ => *sel = vec![name],
            }
            app.last_clicked = Some(idx);
            changed = true;
        }
    });

    if changed {
        apply_selection_change(app);
        logf!("UI: Selection changed ({} institutions)", app.state.gui.selected_institutions.len());
    }
}
