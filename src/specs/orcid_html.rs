// src/specs/orcid_html.rs
//
// Saved, rendered ORCID profile pages. Layout (as of the snapshots we hold):
//
//   <h3>Title</h3>                       <- sibling before the 3rd ancestor
//   <div><div><div>
//     <div class="panel-data-container">  "Journal article"
//       <div class="general-data">2019-03-14 | Journal article</div>
//       <div class="general-data ng-star-inserted">Journal name</div>
//       <a href="https://doi.org/...">
//
// A paginated record shows "Works (1 - 50 of 73)" in a `div.clickable`.

use scraper::{CaseSensitivity, ElementRef, Html, Selector};

use crate::{Error, Result, core::sanitize::normalize_ws};

use super::{JOURNAL_ARTICLE, Work, find_date};

const PANEL_MARKER: &str = "Journal article";
const STAR_INSERTED: &str = "ng-star-inserted";

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfilePage {
    pub works: Vec<Work>,
    /// The record continues on another page.
    pub has_more: bool,
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| Error::Other(format!("bad selector {css:?}: {e}")))
}

fn text_of(el: ElementRef<'_>) -> String {
    normalize_ws(&el.text().collect::<String>())
}

fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().has_class(class, CaseSensitivity::CaseSensitive)
}

/// Text of the element just before the panel's third ancestor.
fn title_for(panel: ElementRef<'_>) -> String {
    panel
        .ancestors()
        .nth(2)
        .and_then(|a| a.prev_siblings().find_map(ElementRef::wrap))
        .map(text_of)
        .unwrap_or_default()
}

/// Every journal-article panel on the page, plus the pagination hint.
/// `year_from` only feeds `has_more`: once a work older than the range shows
/// up, later pages cannot hold anything we want.
pub fn parse_profile_html(html: &str, year_from: i32) -> Result<ProfilePage> {
    let doc = Html::parse_document(html);
    let sel_panel = selector("div.panel-data-container")?;
    let sel_general = selector("div.general-data")?;
    let sel_link = selector("a[href]")?;
    let sel_header = selector("div.clickable")?;

    let mut works = Vec::new();
    for panel in doc.select(&sel_panel).filter(|p| p.html().contains(PANEL_MARKER)) {
        let general: Vec<ElementRef> = panel.select(&sel_general).collect();
        let date = general.iter().find(|d| !has_class(d, STAR_INSERTED)).and_then(|d| find_date(&text_of(*d)));
        let journal = general
            .iter()
            .find(|d| has_class(d, STAR_INSERTED))
            .map(|d| text_of(*d))
            .filter(|j| !j.is_empty());
        let link = panel
            .select(&sel_link)
            .find(|a| {
                let h = a.html();
                h.contains("http") && h.contains("doi")
            })
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string);

        works.push(Work { work_type: s!(JOURNAL_ARTICLE), title: title_for(panel), journal, date, link });
    }

    let paginated = doc
        .select(&sel_header)
        .map(text_of)
        .find(|t| t.contains("Works"))
        .is_some_and(|t| t.contains("of"));
    let reached_older = works.iter().filter_map(Work::year).any(|y| y < year_from);
    let has_more = paginated && !reached_older;

    logd!("Profile HTML: {} journal articles, has_more={has_more}", works.len());
    Ok(ProfilePage { works, has_more })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(title: &str, general: &str, journal: &str, href: &str) -> String {
        format!(
            r#"<div class="work"><h4>{title}</h4>
               <div><div><div>
                 <div class="panel-data-container">
                   <div class="general-data">{general}</div>
                   <div class="general-data ng-star-inserted">
                      {journal}
                   </div>
                   <a href="https://orcid.org/help">help</a>
                   <a href="{href}">{href}</a>
                 </div>
               </div></div></div></div>"#
        )
    }

    fn page(header: &str, panels: &[String]) -> String {
        format!(
            r#"<html><body><div class="clickable"><h2>{header}</h2></div>{}</body></html>"#,
            panels.join("\n")
        )
    }

    #[test]
    fn reads_journal_article_panels() {
        let html = page(
            "Works (2)",
            &[
                panel("Anxiety and attention", "2019-03-14 | Journal article", "Polish Psychological Bulletin", "https://doi.org/10.1/a"),
                panel("Untitled book", "2018 | Book", "Publisher", "https://doi.org/10.1/b"),
                panel("Undated", "Journal article", "Roczniki Psychologiczne", "https://example.org/x"),
            ],
        );
        let page = parse_profile_html(&html, 2017).unwrap();
        assert!(!page.has_more);
        assert_eq!(page.works.len(), 2);

        let w = &page.works[0];
        assert_eq!(w.title, "Anxiety and attention");
        assert_eq!(w.date.as_deref(), Some("2019-03-14"));
        assert_eq!(w.journal.as_deref(), Some("Polish Psychological Bulletin"));
        assert_eq!(w.link.as_deref(), Some("https://doi.org/10.1/a"));

        assert_eq!(page.works[1].date, None);
        assert_eq!(page.works[1].link, None);
    }

    #[test]
    fn pagination_stops_once_older_works_appear() {
        let recent = panel("A", "2021 | Journal article", "J", "https://doi.org/10.1/a");
        let old = panel("B", "2015 | Journal article", "J", "https://doi.org/10.1/b");

        let html = page("Works (1 - 50 of 73)", std::slice::from_ref(&recent));
        assert!(parse_profile_html(&html, 2017).unwrap().has_more);

        let html = page("Works (1 - 50 of 73)", &[recent, old]);
        assert!(!parse_profile_html(&html, 2017).unwrap().has_more);
    }
}
