// src/specs/mod.rs
//! # ORCID record "specs"
//!
//! Pure parsing of the two shapes an ORCID record reaches us in:
//!
//! - `orcid_api` – the public API v3.0 `/works` JSON document.
//! - `orcid_html` – a saved, fully rendered profile page (for records that were
//!   captured by hand in a browser).
//!
//! Both produce the same [`Work`] rows. Nothing here touches the network or
//! the filesystem; fetching lives in `scrape`, persistence in `csv`/`store`.
//!
//! ## Conventions
//! - Dates are kept as the text that was found (`YYYY-MM-DD`, `YYYY-MM` or
//!   `YYYY`); a work with no recognisable date stays undated and is *kept* by
//!   [`in_range`].
//! - Links are full DOI URLs (`https://doi.org/...`) when known.
//! - Only journal articles survive collection (`Work::is_journal_article`).
//!
//! Everything is testable offline against captured fixtures.

pub mod orcid_api;
pub mod orcid_html;

use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

pub use orcid_api::parse_works_json;
pub use orcid_html::{ProfilePage, parse_profile_html};

pub const JOURNAL_ARTICLE: &str = "journal-article";

static ORCID_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{3}[\dX]$").expect("static regex"));
static DATE_YMD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}-\d{2}").expect("static regex"));
static DATE_YM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}-\d{2}").expect("static regex"));
static DATE_Y: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d{4}").expect("static regex"));

/// One work as listed on a record.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Work {
    pub work_type: String,
    pub title: String,
    pub journal: Option<String>,
    pub date: Option<String>,
    /// Full DOI URL.
    pub link: Option<String>,
}

impl Work {
    pub fn is_journal_article(&self) -> bool {
        self.work_type == JOURNAL_ARTICLE
    }

    pub fn year(&self) -> Option<i32> {
        self.date.as_deref().and_then(|d| d.get(..4)).and_then(|y| y.parse().ok())
    }
}

/// `https://orcid.org/0000-0002-1825-0097` or `0000-0002-1825-0097` -> bare id.
pub fn orcid_id(url_or_id: &str) -> Result<String> {
    let tail = url_or_id.trim().trim_end_matches('/').rsplit('/').next().unwrap_or("");
    if ORCID_ID.is_match(tail) {
        Ok(s!(tail))
    } else {
        Err(Error::InvalidOrcid(s!(url_or_id.trim())))
    }
}

/// Most specific date in `text`: `YYYY-MM-DD`, then `YYYY-MM`, then `YYYY`.
pub fn find_date(text: &str) -> Option<String> {
    [&*DATE_YMD, &*DATE_YM, &*DATE_Y]
        .into_iter()
        .find_map(|re| re.find(text))
        .map(|m| s!(m.as_str()))
}

/// Undated works are kept; otherwise `from <= year < to`.
pub fn in_range(work: &Work, from: i32, to: i32) -> bool {
    match work.year() {
        None => true,
        Some(y) => (from..to).contains(&y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orcid_ids_from_urls_and_bare() {
        assert_eq!(orcid_id("https://orcid.org/0000-0002-1825-0097").unwrap(), "0000-0002-1825-0097");
        assert_eq!(orcid_id(" 0000-0001-5109-370X/ ").unwrap(), "0000-0001-5109-370X");
        assert!(matches!(orcid_id("https://orcid.org/"), Err(Error::InvalidOrcid(_))));
        assert!(orcid_id("0000-0002-1825-009").is_err());
    }

    #[test]
    fn dates_prefer_most_specific() {
        assert_eq!(find_date("Published 2019-03-14 online").as_deref(), Some("2019-03-14"));
        assert_eq!(find_date("2020-11 | Journal").as_deref(), Some("2020-11"));
        assert_eq!(find_date("In press, 2021").as_deref(), Some("2021"));
        assert_eq!(find_date("no date here"), None);
    }

    #[test]
    fn range_is_half_open_and_keeps_undated() {
        let w = |d: Option<&str>| Work { date: d.map(|d| s!(d)), ..Work::default() };
        assert!(in_range(&w(Some("2017-01-01")), 2017, 2022));
        assert!(in_range(&w(Some("2021")), 2017, 2022));
        assert!(!in_range(&w(Some("2022-05")), 2017, 2022));
        assert!(!in_range(&w(Some("2016-12-31")), 2017, 2022));
        assert!(in_range(&w(None), 2017, 2022));
    }
}
