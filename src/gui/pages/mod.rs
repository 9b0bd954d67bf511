// src/gui/pages/mod.rs
use eframe::egui;

use crate::{
    Result,
    config::{
        options::{AppOptions, PageKind},
        state::GuiState,
    },
    store::DataSet,
};

pub mod articles;
pub mod authors;
pub mod works;

pub trait Page: Send + Sync + 'static {
    fn title(&self) -> &'static str;
    fn kind(&self) -> PageKind;

    /// Headers shown before any data is loaded.
    fn default_headers(&self) -> &'static [&'static str];

    /// Per-page column widths (in px-ish)
    fn preferred_column_widths(&self) -> Option<&'static [f32]> { None }

    /// Column holding the institution a row belongs to, if any. Rows are
    /// filtered by the left panel selection and exported per institution
    /// through it.
    fn institution_column(&self, _ds: &DataSet) -> Option<usize> { None }

    /// Draw page-specific controls; true when the view must be rebuilt.
    fn draw_controls(&self, _ui: &mut egui::Ui, _gui: &mut GuiState) -> bool { false }

    /// Extra per-row filter on top of the institution selection.
    fn keep_row(&self, _gui: &GuiState, _ds: &DataSet, _row: &[String]) -> bool { true }

    /// Rebuild the table from the pipeline files on disk.
    fn load(&self, options: &AppOptions) -> Result<DataSet>;

    /// Cached data is only trusted when its headers are the page's.
    fn validate_cache(&self, ds: &DataSet) -> bool {
        ds.headers
            .as_ref()
            .is_some_and(|h| h.iter().map(String::as_str).eq(self.default_headers().iter().copied()))
    }

    /// Merge freshly loaded `new` rows into `into`. Default: replace.
    fn merge(&self, into: &mut DataSet, new: DataSet) {
        *into = new;
    }
}
