// src/gui/pages/works.rs
use std::collections::HashSet;

use crate::{
    Result,
    config::options::{AppOptions, PageKind},
    csv::read_csv,
    roster::list_institutions,
    store::{DataSet, field},
};

use super::Page;

pub struct WorksPage;
pub static PAGE: WorksPage = WorksPage;

/// Work columns plus the institution the researcher was scraped under.
const HEADERS: [&str; 7] = ["name", "orcid", "link", "title", "date", "journal", "uni"];
const WIDTHS: [f32; 7] = [180.0, 160.0, 220.0, 360.0, 90.0, 220.0, 160.0];
const UNI_COL: usize = 6;

fn headers() -> Vec<String> {
    HEADERS.iter().map(|h| s!(*h)).collect()
}

impl Page for WorksPage {
    fn title(&self) -> &'static str { "Works" }
    fn kind(&self) -> PageKind { PageKind::Works }
    fn default_headers(&self) -> &'static [&'static str] { &HEADERS }
    fn preferred_column_widths(&self) -> Option<&'static [f32]> { Some(&WIDTHS) }

    fn institution_column(&self, _ds: &DataSet) -> Option<usize> {
        Some(UNI_COL)
    }

    /// `<works_dir>/<uni>.csv` for every known institution.
    fn load(&self, options: &AppOptions) -> Result<DataSet> {
        let paths = &options.paths;
        let mut rows = Vec::new();
        for uni in list_institutions(&paths.institutions_dir)? {
            let path = paths.works_dir.join(join!(&uni, ".csv"));
            if !path.is_file() {
                continue;
            }
            let ds = read_csv(&path)?;
            let cols: Vec<Option<usize>> = HEADERS[..UNI_COL].iter().map(|h| ds.column(h)).collect();
            for r in &ds.rows {
                let mut row: Vec<String> = cols.iter().map(|&c| s!(field(r, c))).collect();
                row.push(uni.clone());
                rows.push(row);
            }
        }
        Ok(DataSet::new(headers(), rows))
    }

    /// A fresh scrape replaces the rows of the institutions it covered.
    fn merge(&self, into: &mut DataSet, mut new: DataSet) {
        if new.headers.is_some() {
            into.headers = new.headers.take();
        }

        let scraped: HashSet<String> = new.rows.iter().filter_map(|r| r.get(UNI_COL).cloned()).collect();
        if !scraped.is_empty() {
            into.rows.retain(|r| r.get(UNI_COL).is_none_or(|u| !scraped.contains(u)));
        }
        into.rows.extend(new.rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_replaces_scraped_institutions_only() {
        let mut into = DataSet::new(
            headers(),
            vec![
                strs!["A", "o1", "empty", "t1", "2018", "j", "UW"],
                strs!["B", "o2", "empty", "t2", "2019", "j", "UJ"],
            ],
        );
        let new = DataSet::new(headers(), vec![strs!["C", "o3", "empty", "t3", "2020", "j", "UW"]]);
        PAGE.merge(&mut into, new);

        let names: Vec<&str> = into.rows.iter().map(|r| r[0].as_str()).collect();
        assert_eq!(names, ["B", "C"]);
        assert!(PAGE.validate_cache(&into));
    }
}
