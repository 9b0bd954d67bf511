// src/gui/app.rs
use std::{
    collections::{HashMap, HashSet},
    error::Error,
    sync::{Arc, Mutex, PoisonError, mpsc::Receiver},
};

use eframe::egui;

use crate::{
    config::{
        self,
        options::{InstitutionSelector, PageKind},
        state::AppState,
    },
    roster::list_institutions,
    scrape::ScrapeReport,
    store::{self, DataSet},
};

use super::{components, pages::Page, router};

pub fn run(options: eframe::NativeOptions) -> Result<(), Box<dyn Error>> {
    let app_options = config::load(None)?;
    crate::log::init(&app_options.paths.store_dir)?;

    eframe::run_native(
        "SONaa",
        options,
        Box::new(|_cc| Ok(Box::new(App::new(AppState::with_options(app_options))))),
    )?;
    Ok(())
}

pub struct App {
    // single source of truth (UI thread only)
    pub state: AppState,

    // institutions & selection UI (selection lives inside state.gui)
    pub institutions: Vec<String>,
    pub last_clicked: Option<usize>,

    // output text field UX (we map this <-> ExportOptions)
    pub out_path_text: String,
    pub out_path_dirty: bool,

    // canonical data per page + the visible row indices of the current page
    pub data: HashMap<PageKind, DataSet>,
    pub row_ix: Vec<usize>,
    pub col_widths: HashMap<PageKind, Vec<f32>>,

    // status/progress (the scrape thread writes here)
    pub status: Arc<Mutex<String>>,
    pub running: bool,
    pub scrape_rx: Option<Receiver<crate::Result<ScrapeReport>>>,
}

impl App {
    pub fn new(mut state: AppState) -> Self {
        let institutions = match list_institutions(&state.options.paths.institutions_dir) {
            Ok(v) => v,
            Err(e) => {
                logw!("Init: no institutions ({e})");
                Vec::new()
            }
        };

        // Default selection: all
        state.gui.selected_institutions = institutions.clone();

        let mut status = s!("Idle");
        let store_dir = state.options.paths.store_dir.clone();

        // Cache first, then the pipeline files
        let mut data: HashMap<PageKind, DataSet> = HashMap::new();
        for page in router::all_pages() {
            let k = page.kind();
            match store::load_dataset(&store_dir, &k) {
                Ok(ds) if !ds.rows.is_empty() && page.validate_cache(&ds) => {
                    logf!("Cache: Loaded {:?} (rows={}, headers={})", k, ds.row_count(), ds.header_count());
                    data.insert(k, ds);
                    status = s!("Loaded local data");
                    continue;
                }
                Ok(_) => logd!("Cache: {:?} empty or stale, ignoring", k),
                Err(e) => logd!("Cache: Missing {:?} ({})", k, e),
            }
            match page.load(&state.options) {
                Ok(ds) => {
                    logf!("Init: {:?} from pipeline files (rows={})", k, ds.row_count());
                    data.insert(k, ds);
                }
                Err(e) => logd!("Init: {:?} not available ({})", k, e),
            }
        }

        let out_path_text = state.options.export.out_path().to_string_lossy().into_owned();
        logf!("Init: institutions={}, pages={}", institutions.len(), router::all_pages().len());

        let mut app = Self {
            state,
            institutions,
            last_clicked: None,
            out_path_text,
            out_path_dirty: false,
            data,
            row_ix: Vec::new(),
            col_widths: HashMap::new(),
            status: Arc::new(Mutex::new(status)),
            running: false,
            scrape_rx: None,
        };
        app.rebuild_view();
        app
    }

    /* ---------- tiny helpers ---------- */

    #[inline]
    pub fn current_index(&self) -> usize { self.state.gui.current_page_index }

    #[inline]
    pub fn set_current_index(&mut self, idx: usize) { self.state.gui.current_page_index = idx; }

    #[inline]
    pub fn current_page_kind(&self) -> PageKind { self.current_page().kind() }

    #[inline]
    pub fn current_page(&self) -> &'static dyn Page {
        let pages = router::all_pages();
        pages.get(self.current_index()).copied().unwrap_or(pages[0])
    }

    pub fn current_data(&self) -> Option<&DataSet> {
        self.data.get(&self.current_page_kind())
    }

    pub fn status<T: Into<String>>(&self, msg: T) {
        *self.status.lock().unwrap_or_else(PoisonError::into_inner) = msg.into();
    }

    pub fn status_text(&self) -> String {
        self.status.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_selection_message(&self) {
        let n = self.state.gui.selected_institutions.len();
        self.status(format!("Selection: {n} institution(s)"));
    }

    /// Mirror GUI selection -> options.scrape.institutions
    pub fn sync_gui_selection_into_scrape(&mut self) {
        let sel = &self.state.gui.selected_institutions;

        self.state.options.scrape.institutions = if sel.len() == self.institutions.len() && !sel.is_empty() {
            InstitutionSelector::All
        } else if sel.len() == 1 {
            InstitutionSelector::One(sel[0].clone())
        } else {
            InstitutionSelector::Names(sel.clone())
        };
    }

    /// Recompute the visible rows of the current page from its data, the
    /// institution selection and the page's own filter.
    pub fn rebuild_view(&mut self) {
        let page = self.current_page();
        let Some(ds) = self.data.get(&page.kind()) else {
            self.row_ix.clear();
            return;
        };

        let selected: HashSet<&str> = self.state.gui.selected_institutions.iter().map(String::as_str).collect();
        let inst_col = page.institution_column(ds);
        let gui = &self.state.gui;

        self.row_ix = ds
            .rows
            .iter()
            .enumerate()
            .filter(|(_, r)| inst_col.is_none_or(|c| r.get(c).is_some_and(|u| selected.contains(u.as_str()))))
            .filter(|(_, r)| page.keep_row(gui, ds, r))
            .map(|(i, _)| i)
            .collect();
        logd!("View: {:?} {} of {} rows", page.kind(), self.row_ix.len(), ds.row_count());
    }

    /// Headers + visible rows of the current page, cloned for copy/export.
    pub fn visible_table(&self) -> Option<(Option<Vec<String>>, Vec<Vec<String>>)> {
        let ds = self.current_data()?;
        let rows = self.row_ix.iter().filter_map(|&i| ds.rows.get(i).cloned()).collect();
        Some((ds.headers.clone(), rows))
    }

    /// Replace the current page's data from the pipeline files.
    pub fn reload_current(&mut self) {
        let page = self.current_page();
        let kind = page.kind();
        match page.load(&self.state.options) {
            Ok(ds) => {
                let n = ds.row_count();
                self.save_cache(kind, &ds);
                self.data.insert(kind, ds);
                self.rebuild_view();
                self.status(format!("Reloaded {} ({n} rows)", page.title()));
            }
            Err(e) => {
                loge!("Reload: {:?} failed: {}", kind, e);
                self.status(format!("Reload error: {e}"));
            }
        }
    }

    pub fn save_cache(&self, kind: PageKind, ds: &DataSet) {
        match store::save_dataset(&self.state.options.paths.store_dir, &kind, ds) {
            Ok(p) => logf!("Cache: Saved {:?} -> {}", kind, p.display()),
            Err(e) => loge!("Cache: Save failed {:?}: {}", kind, e),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        super::actions::poll_scrape(self);
        if self.running {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }

        egui::SidePanel::left("institutions")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                components::institution_panel::draw(ui, self);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            components::tabs::draw(ui, self);

            ui.separator();

            components::export_bar::draw(ui, self);

            ui.separator();

            components::data_table::draw(ui, self);
        });
    }
}
