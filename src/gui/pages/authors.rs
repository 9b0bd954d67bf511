// src/gui/pages/authors.rs
use eframe::egui;

use crate::{
    Result,
    config::{
        options::{AppOptions, PageKind},
        state::GuiState,
    },
    roster::{AUTHOR_HEADERS, author_headers, author_row, read_authors},
    store::{DataSet, field},
};

use super::Page;

pub struct AuthorsPage;
pub static PAGE: AuthorsPage = AuthorsPage;

const WIDTHS: [f32; 13] = [60.0, 90.0, 90.0, 60.0, 120.0, 200.0, 180.0, 200.0, 160.0, 80.0, 60.0, 150.0, 200.0];

impl Page for AuthorsPage {
    fn title(&self) -> &'static str { "Authors" }
    fn kind(&self) -> PageKind { PageKind::Authors }
    fn default_headers(&self) -> &'static [&'static str] { &AUTHOR_HEADERS }
    fn preferred_column_widths(&self) -> Option<&'static [f32]> { Some(&WIDTHS) }

    fn institution_column(&self, ds: &DataSet) -> Option<usize> {
        ds.column("main_job")
    }

    fn draw_controls(&self, ui: &mut egui::Ui, gui: &mut GuiState) -> bool {
        ui.checkbox(&mut gui.authors_only_with_orcid, "Only with ORCID").changed()
    }

    fn keep_row(&self, gui: &GuiState, ds: &DataSet, row: &[String]) -> bool {
        !gui.authors_only_with_orcid || !field(row, ds.column("orcid")).is_empty()
    }

    fn load(&self, options: &AppOptions) -> Result<DataSet> {
        let authors = read_authors(&options.paths.selected_authors())?;
        Ok(DataSet::new(author_headers(), authors.iter().map(author_row).collect()))
    }
}
