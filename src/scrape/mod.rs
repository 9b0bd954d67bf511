// src/scrape/mod.rs
mod collect;
mod works;

pub use collect::collect_article_list;
pub use works::{
    OrcidClient, ScrapeReport, WORK_HEADERS, WorkRow, WorkSource, collect_works, collect_works_with, scrape_targets,
    select_works, work_headers, works_from_html, write_failed, write_works,
};
