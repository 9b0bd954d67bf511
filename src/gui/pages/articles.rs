// src/gui/pages/articles.rs
use crate::{
    Result,
    config::options::{AppOptions, PageKind},
    corpus::{ARTICLE_HEADERS, Corpus},
    store::DataSet,
};

use super::Page;

pub struct ArticlesPage;
pub static PAGE: ArticlesPage = ArticlesPage;

const WIDTHS: [f32; 12] = [200.0, 180.0, 360.0, 50.0, 200.0, 260.0, 160.0, 160.0, 160.0, 200.0, 180.0, 160.0];

impl Page for ArticlesPage {
    fn title(&self) -> &'static str { "Articles" }
    fn kind(&self) -> PageKind { PageKind::Articles }
    fn default_headers(&self) -> &'static [&'static str] { &ARTICLE_HEADERS }
    fn preferred_column_widths(&self) -> Option<&'static [f32]> { Some(&WIDTHS) }

    fn load(&self, options: &AppOptions) -> Result<DataSet> {
        let corpus = Corpus::load(&options.paths.corpus, options.matching.clone())?;
        Ok(corpus.articles_table())
    }
}
