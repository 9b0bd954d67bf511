// src/specs/orcid_api.rs
//
// Public API v3.0 `/v3.0/<id>/works`. Only the bits we keep are modelled;
// everything is optional because records are filled in by hand.

use serde::Deserialize;

use crate::{Result, config::consts::DOI_HOST};

use super::Work;

#[derive(Debug, Default, Deserialize)]
struct WorksDoc {
    #[serde(default)]
    group: Vec<Group>,
}

#[derive(Debug, Default, Deserialize)]
struct Group {
    #[serde(rename = "work-summary", default)]
    summaries: Vec<Summary>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct Summary {
    #[serde(rename = "type")]
    work_type: Option<String>,
    title: Option<TitleBlock>,
    journal_title: Option<Value>,
    publication_date: Option<PubDate>,
    external_ids: Option<ExternalIds>,
}

#[derive(Debug, Default, Deserialize)]
struct TitleBlock {
    title: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct Value {
    value: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PubDate {
    year: Option<Value>,
    month: Option<Value>,
    day: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct ExternalIds {
    #[serde(rename = "external-id", default)]
    ids: Vec<ExternalId>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ExternalId {
    external_id_type: Option<String>,
    external_id_value: Option<String>,
    external_id_url: Option<Value>,
}

fn text(v: &Option<Value>) -> Option<String> {
    v.as_ref()
        .and_then(|v| v.value.as_deref())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl PubDate {
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`, stopping at the first gap.
    fn render(&self) -> Option<String> {
        let mut out = text(&self.year)?;
        if let Some(m) = text(&self.month) {
            out = join!(&out, "-", &m);
            if let Some(d) = text(&self.day) {
                out = join!(&out, "-", &d);
            }
        }
        Some(out)
    }
}

impl ExternalIds {
    fn doi_link(&self) -> Option<String> {
        let doi = self
            .ids
            .iter()
            .find(|id| id.external_id_type.as_deref().is_some_and(|t| t.eq_ignore_ascii_case("doi")))?;
        text(&doi.external_id_url).or_else(|| {
            doi.external_id_value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(|v| join!(DOI_HOST, v))
        })
    }
}

impl From<&Summary> for Work {
    fn from(s: &Summary) -> Self {
        Work {
            work_type: s.work_type.clone().unwrap_or_default(),
            title: s.title.as_ref().and_then(|t| text(&t.title)).unwrap_or_default(),
            journal: text(&s.journal_title),
            date: s.publication_date.as_ref().and_then(PubDate::render),
            link: s.external_ids.as_ref().and_then(ExternalIds::doi_link),
        }
    }
}

/// First summary of every group (ORCID groups duplicates of one work).
pub fn parse_works_json(body: &str) -> Result<Vec<Work>> {
    let doc: WorksDoc = serde_json::from_str(body)?;
    Ok(doc
        .group
        .iter()
        .filter_map(|g| g.summaries.first())
        .map(Work::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = r#"{
      "last-modified-date": {"value": 1700000000000},
      "group": [
        {"work-summary": [
          {"type": "journal-article",
           "title": {"title": {"value": "Anxiety and attention"}, "subtitle": null},
           "journal-title": {"value": "Polish Psychological Bulletin"},
           "publication-date": {"year": {"value": "2019"}, "month": {"value": "03"}, "day": null},
           "external-ids": {"external-id": [
             {"external-id-type": "issn", "external-id-value": "0079-2993", "external-id-url": null},
             {"external-id-type": "doi", "external-id-value": "10.1234/ppb.2019.1", "external-id-url": null}
           ]}},
          {"type": "journal-article", "title": {"title": {"value": "duplicate"}}}
        ]},
        {"work-summary": [
          {"type": "book-chapter",
           "title": {"title": {"value": "A chapter"}},
           "journal-title": null,
           "publication-date": null,
           "external-ids": {"external-id": [
             {"external-id-type": "doi", "external-id-value": "10.9/x",
              "external-id-url": {"value": "https://doi.org/10.9/X"}}
           ]}}
        ]},
        {"work-summary": []}
      ]
    }"#;

    #[test]
    fn takes_first_summary_per_group() {
        let works = parse_works_json(BODY).unwrap();
        assert_eq!(works.len(), 2);

        assert!(works[0].is_journal_article());
        assert_eq!(works[0].title, "Anxiety and attention");
        assert_eq!(works[0].journal.as_deref(), Some("Polish Psychological Bulletin"));
        assert_eq!(works[0].date.as_deref(), Some("2019-03"));
        assert_eq!(works[0].link.as_deref(), Some("https://doi.org/10.1234/ppb.2019.1"));

        assert!(!works[1].is_journal_article());
        assert_eq!(works[1].date, None);
        assert_eq!(works[1].link.as_deref(), Some("https://doi.org/10.9/X"));
    }

    #[test]
    fn empty_record_has_no_works() {
        assert!(parse_works_json(r#"{"group": []}"#).unwrap().is_empty());
        assert!(parse_works_json("not json").is_err());
    }
}
