// tests/corpus_clean.rs
//
// Corpus building from the three sources, then cleaning, manual merges and
// file linking.

use std::fs;
use std::path::Path;

use sonaa::config::options::{DedupOptions, MatchingOptions};
use sonaa::corpus::{Article, Corpus, SimilarPair};
use sonaa::roster::Author;

fn author(id: &str, fullname: &str, orcid: Option<&str>) -> Author {
    Author {
        radon_id: id.to_string(),
        aid: format!("{}_{id}", fullname.replace(' ', "_")),
        fullname: fullname.to_string(),
        orcid: orcid.map(str::to_string),
        ..Author::default()
    }
}

fn corpus() -> Corpus {
    Corpus::with_authors(
        vec![
            author("1", "Jan Kowalski", Some("0000-0001-2345-6789")),
            author("2", "Ewa Nowak", None),
        ],
        MatchingOptions::default(),
    )
}

fn article(id: &str, doi: Option<&str>, title: &str) -> Article {
    Article {
        article_id: id.to_string(),
        doi: doi.map(str::to_string),
        title: title.to_string(),
        ..Article::default()
    }
}

fn write(path: &Path, text: &str) {
    fs::write(path, text).unwrap();
}

#[test]
fn orcid_rows_become_articles_with_resolved_authors() {
    let dir = tempfile::tempdir().unwrap();
    let raw = dir.path().join("raw_article_list.csv");
    write(
        &raw,
        "Article_ID,name,orcid,link,title,date,journal\n\
         10_1&a,Jan Kowalski,https://orcid.org/0000-0001-2345-6789,https://doi.org/10.1/A,Working memory in children,2019-03,Memory\n\
         10_1&a,Ewa Nowak,,https://doi.org/10.1/A,Working memory in children,2019-03,Memory\n\
         10_1&a,Jan Kowalski,https://orcid.org/0000-0001-2345-6789,https://doi.org/10.1/A,Working memory in children,2019-03,Memory\n\
         title_sleep_x_ABC,Piotr Zieliński,,empty,Sleep,unrecovered,\n",
    );

    let mut c = corpus();
    assert_eq!(c.load_orcid_articles(&raw).unwrap(), 2);

    let a = c.get("10_1&a").unwrap();
    assert_eq!(a.doi.as_deref(), Some("10.1/A"));
    assert_eq!(a.year, Some(2019));
    assert_eq!(a.journal.as_deref(), Some("Memory"));
    assert_eq!(a.authors, vec!["Jan_Kowalski_1".to_string(), "Ewa_Nowak_2".to_string()]);

    // Unknown researchers stay as raw names; no date, no DOI
    let b = c.get("title_sleep_x_ABC").unwrap();
    assert_eq!(b.authors, vec!["Piotr Zieliński".to_string()]);
    assert_eq!(b.doi, None);
    assert_eq!(b.year, None);

    // Loading again adds nothing
    assert_eq!(c.load_orcid_articles(&raw).unwrap(), 0);
    assert_eq!(c.len(), 2);
}

#[test]
fn pbn_rows_extend_by_id_and_author() {
    let dir = tempfile::tempdir().unwrap();
    let pbn = dir.path().join("pbn.csv");
    write(
        &pbn,
        "type,doi_transformed,our_id,doi,title,year,journal\n\
         ARTICLE,10_1&abc,1,10.1/abc,Stress,2019,J\n\
         BOOK,10_4&book,1,10.4/book,A book,2019,\n\
         ARTICLE,10_5&q,77,10.5/q,Other,2020,K\n",
    );

    let mut c = corpus();
    let mut a = article("10_1&abc", Some("10.1/abc"), "Stress");
    a.authors = vec!["Ewa_Nowak_2".to_string()];
    c.articles.push(a);

    assert_eq!(c.load_pbn_articles(&pbn).unwrap(), (1, 1));
    assert_eq!(c.get("10_1&abc").unwrap().authors, vec!["Ewa_Nowak_2".to_string(), "Jan_Kowalski_1".to_string()]);
    assert_eq!(c.get("10_5&q").unwrap().authors, vec!["77".to_string()]);
    assert!(c.get("10_4&book").is_none());
}

#[test]
fn clean_merges_duplicates_and_reports_conflicts() {
    let mut c = corpus();

    let mut x1 = article("x1", Some("10.1/abc"), "Stress and coping in students");
    x1.authors = vec!["A".to_string()];
    let mut x2 = article("x2", Some("https://doi.org/10.1/ABC"), "Stress and coping in students (preprint)");
    x2.authors = vec!["B".to_string()];
    x2.year = Some(2020);

    let mut t1 = article("t1", None, "Attachment styles in adulthood");
    t1.authors = vec!["A".to_string()];
    let mut t2 = article("t2", Some("10.2/zzz"), "Attachment Styles in Adulthood!");
    t2.authors = vec!["B".to_string()];
    t2.year = Some(2018);

    let c1 = article("c1", Some("10.3/one"), "A conflicted title here");
    let c2 = article("c2", Some("10.3/two"), "A conflicted title here");

    c.articles.extend([x1, x2, t1, t2, c1, c2]);
    let report = c.clean(&DedupOptions::default());

    assert_eq!(
        report.doi_merged,
        vec![("Stress and coping in students".to_string(), "Stress and coping in students (preprint)".to_string())]
    );
    assert_eq!(
        report.title_merged,
        vec![("Attachment Styles in Adulthood!".to_string(), "Attachment styles in adulthood".to_string())]
    );
    assert_eq!(report.conflicts.len(), 1);
    assert_eq!(
        report.conflicts[0].groups,
        vec![
            ("10.3/one".to_string(), vec!["c1".to_string()]),
            ("10.3/two".to_string(), vec!["c2".to_string()]),
        ]
    );

    assert_eq!(c.len(), 4);

    let by_doi = c.get("10_1&abc").unwrap();
    assert_eq!(by_doi.authors, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(by_doi.year, Some(2020));
    assert_eq!(by_doi.tracking, vec!["x1".to_string(), "x2".to_string()]);
    assert_eq!(by_doi.old_dois, vec!["10.1/abc".to_string()]);

    // The DOI-bearing record survives a title merge
    let by_title = c.get("10_2&zzz").unwrap();
    assert_eq!(by_title.authors, vec!["B".to_string(), "A".to_string()]);
    assert_eq!(by_title.year, Some(2018));
    assert!(by_title.tracking.contains(&"t1".to_string()));

    // Conflicting articles are left alone and show up as similar
    assert!(c.get("c1").is_some() && c.get("c2").is_some());
    assert_eq!(report.similar, vec![SimilarPair { shared: 1, first: 2, second: 3 }]);
}

#[test]
fn merge_list_applies_good_lines_and_skips_bad_ones() {
    let dir = tempfile::tempdir().unwrap();
    let list = dir.path().join("merge.txt");
    write(&list, "# reviewed by hand\n\nc1, c2\nx9,y9\nc1\n");

    let mut c = corpus();
    c.articles.push(article("c1", Some("10.3/one"), "A conflicted title here"));
    c.articles.push(article("c2", Some("10.3/two"), "A conflicted title here"));
    c.articles.push(article("keep", None, "Unrelated"));

    assert_eq!(c.apply_merge_list(&list).unwrap(), 1);
    assert_eq!(c.len(), 2);

    let merged = c.get("10_3&one").unwrap();
    assert_eq!(merged.tracking, vec!["c1".to_string(), "c2".to_string()]);
    assert_eq!(merged.old_dois, vec!["10.3/one".to_string(), "10.3/two".to_string()]);
}

#[test]
fn files_link_by_id_or_history() {
    let dir = tempfile::tempdir().unwrap();
    let pdfs = dir.path();
    fs::create_dir_all(pdfs.join("sub")).unwrap();
    write(&pdfs.join("10_1&abc.pdf"), "%PDF");
    write(&pdfs.join("sub").join("t2.pdf"), "%PDF");
    write(&pdfs.join("orphan.pdf"), "%PDF");

    let mut c = corpus();
    c.articles.push(article("10_1&abc", Some("10.1/abc"), "Stress"));
    let mut tracked = article("10_2&zzz", Some("10.2/zzz"), "Attachment");
    tracked.tracking = vec!["10_2&zzz".to_string(), "t2".to_string()];
    c.articles.push(tracked);
    c.articles.push(article("lonely", None, "No file for me"));

    let report = c.update_files(pdfs).unwrap();
    assert_eq!(report.files, 3);
    assert_eq!(report.articles_with_files, 2);
    assert_eq!(report.articles_without_files, 1);
    assert_eq!(report.files_without_articles, 1);
    assert_eq!(c.get("10_2&zzz").unwrap().file_name.as_deref(), Some("t2"));

    let without = fs::read_to_string(pdfs.join("articles_without_files.csv")).unwrap();
    assert!(without.contains("lonely"));
    let orphans = fs::read_to_string(pdfs.join("files_without_articles.csv")).unwrap();
    assert!(orphans.contains("orphan"));

    // Reports written last time are not picked up as files
    assert_eq!(c.update_files(pdfs).unwrap().files, 3);

    assert!(c.update_files(&pdfs.join("missing")).is_err());
}

#[test]
fn fully_linked_corpus_leaves_no_reports() {
    let dir = tempfile::tempdir().unwrap();
    let pdfs = dir.path();
    write(&pdfs.join("10_1&abc.pdf"), "%PDF");

    let mut c = corpus();
    c.articles.push(article("10_1&abc", Some("10.1/abc"), "Stress"));
    c.articles.push(article("lonely", None, "No file for me"));

    // first run reports the article without a file
    assert_eq!(c.update_files(pdfs).unwrap().articles_without_files, 1);
    assert!(pdfs.join("articles_without_files.csv").is_file());
    assert!(!pdfs.join("files_without_articles.csv").exists());

    write(&pdfs.join("lonely.pdf"), "%PDF");
    let report = c.update_files(pdfs).unwrap();
    assert_eq!(report.articles_with_files, 2);
    assert_eq!(report.articles_without_files, 0);
    assert_eq!(report.files_without_articles, 0);
    assert!(!pdfs.join("articles_without_files.csv").exists());
    assert!(!pdfs.join("files_without_articles.csv").exists());
}

#[test]
fn openalex_enhances_adds_and_parks_the_rest() {
    let dir = tempfile::tempdir().unwrap();
    let oa = dir.path().join("openalex.csv");
    write(
        &oa,
        "doi,title,publication_year,journal,authors,author_orcids,pdf_url,landing_page_url,oa_url\n\
         https://doi.org/10.1/ABC,Stress,2019,J,\"Jan Kowalski, Someone Else\",,http://pdf/abc,,\n\
         https://doi.org/10.9/new,New thing,2021,K,J. Kowalski,J. Kowalski: https://orcid.org/0000-0001-2345-6789,,,\n\
         https://doi.org/10.8/none,Nobody,2020,L,Piotr Zieliński,,,,\n",
    );

    let mut c = corpus();
    let mut a = article("10_1&abc", Some("10.1/abc"), "Stress");
    a.authors = vec!["Ewa_Nowak_2".to_string()];
    c.articles.push(a);

    let report = c.load_openalex_articles(&oa).unwrap();
    assert_eq!(report.matched_dois, 1);
    assert_eq!(report.enhanced, 1);
    assert_eq!(report.added, 1);
    assert_eq!(report.unmatched, 1);

    let enhanced = c.get("10_1&abc").unwrap();
    assert_eq!(enhanced.pdf_url.as_deref(), Some("http://pdf/abc"));
    assert!(enhanced.authors.contains(&"Jan_Kowalski_1".to_string()));

    let added = c.get("10_9&new").unwrap();
    assert_eq!(added.authors, vec!["Jan_Kowalski_1".to_string()]);
    assert_eq!(added.year, Some(2021));

    let parked = report.unmatched_path.unwrap();
    assert_eq!(parked, dir.path().join("openalex_unmatched.csv"));
    assert!(fs::read_to_string(parked).unwrap().contains("Nobody"));
}

#[test]
fn openalex_rows_sharing_a_doi_become_one_article() {
    let dir = tempfile::tempdir().unwrap();
    let oa = dir.path().join("openalex.csv");
    write(
        &oa,
        "doi,title,publication_year,journal,authors,author_orcids,pdf_url,landing_page_url,oa_url\n\
         https://doi.org/10.9/new,New thing,2021,K,J. Kowalski,J. Kowalski: https://orcid.org/0000-0001-2345-6789,,,\n\
         10.9/NEW,New thing,2021,K,Ewa Nowak,,http://pdf/new,,\n",
    );

    let mut c = corpus();
    let report = c.load_openalex_articles(&oa).unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(report.unmatched, 0);
    assert_eq!(c.articles.len(), 1);

    let added = c.get("10_9&new").unwrap();
    assert_eq!(added.authors, vec!["Jan_Kowalski_1".to_string(), "Ewa_Nowak_2".to_string()]);
    assert_eq!(added.pdf_url.as_deref(), Some("http://pdf/new"));

    let cleaned = c.clean(&DedupOptions::default());
    assert!(cleaned.doi_merged.is_empty());
    assert_eq!(c.articles.len(), 1);
}
