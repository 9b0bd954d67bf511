// tests/roster_split.rs
//
// Radon export -> authors -> split files -> enrichment from curated sheets.

use std::fs;
use std::path::Path;

use sonaa::csv::read_csv;
use sonaa::roster::{self, split::fullname_map};

const RADON_HEADER: &str = "Id,Dane podstawowe - Imię,Dane podstawowe - Drugie imię,Dane podstawowe - Przedrostek nazwiska,Dane podstawowe - Nazwisko,Zatrudnienie - Nazwa,Zatrudnienie - Podstawowe miejsce pracy,Zatrudnienie - Oświadczone dyscypliny";

fn write_inputs(dir: &Path) {
    let radon = [
        RADON_HEADER,
        "1,JAN,,,KOWALSKI,Uniwersytet Warszawski,Tak,psychologia",
        "1,Jan,,,Kowalski,Uniwersytet im. Adama Mickiewicza w Poznaniu,Nie,psychologia",
        "2,anna,maria,,nowak,Uniwersytet Warszawski,Tak,",
        "3,Ewa,,,Zając,Instytut Psychologii PAN,Tak,",
        "4,Piotr,,,Wiśniewski,Uniwersytet Warszawski,Nie,",
        "5,,,,,Uniwersytet Warszawski,Nie,",
    ]
    .join("\n");
    fs::write(dir.join("radon.csv"), radon).unwrap();
    fs::write(dir.join("evaluation.csv"), "uni_code,category\nUniwersytet_Warszawski,A+\n").unwrap();
}

#[test]
fn split_groups_researchers_by_main_job() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let rows = roster::read_radon_export(&dir.path().join("radon.csv")).unwrap();
    assert_eq!(rows.len(), 6);
    let evaluation = roster::read_evaluation(&dir.path().join("evaluation.csv")).unwrap();
    let authors = roster::build_authors(&rows);
    assert_eq!(authors.len(), 5);
    assert_eq!(authors[0].fullname, "Jan Kowalski");
    assert_eq!(authors[1].fullname, "Anna Maria Nowak");
    // no surname anywhere: kept, with an empty name
    assert_eq!(authors[4].fullname, "");

    let split = roster::split(&rows, &fullname_map(&authors), &evaluation);

    assert_eq!(split.institutions[0].name, "Uniwersytet_Warszawski");
    assert_eq!(split.institutions[0].researchers, 2);
    assert_eq!(split.evaluated().count(), 1);
    assert_eq!(
        split.institutions[0].evaluation.as_ref().and_then(|e| e.get("category")).map(String::as_str),
        Some("A+")
    );

    assert_eq!(split.selected.len(), 1);
    assert_eq!(split.selected[0].0, "Uniwersytet_Warszawski");
    assert_eq!(split.selected[0].1, vec!["Jan Kowalski", "Anna Maria Nowak"]);
    assert_eq!(split.not_selected, vec![("Ewa Zając".to_string(), "Instytut_Psychologii_PAN".to_string())]);
    assert_eq!(split.unlisted_names, vec!["Piotr Wiśniewski"]);

    let tags: Vec<&str> = split.where_is_wally.iter().map(|w| w.file).collect();
    assert_eq!(tags, ["selected", "selected", "other-names", "other-unlisted"]);
    assert_eq!(split.where_is_wally[3].institution, "");

    let out = dir.path().join("institutions");
    let written = roster::write_split(&split, &out).unwrap();
    assert!(written.iter().all(|p| p.is_file()));

    let sheet = read_csv(&out.join("Uniwersytet_Warszawski").join("names.csv")).unwrap();
    assert_eq!(sheet.row_count(), 2);
    let all = read_csv(&out.join("institutes_all.csv")).unwrap();
    assert_eq!(all.headers.unwrap(), vec!["uni_name", "count", "category"]);
    assert_eq!(all.rows.len(), 2);
    assert!(out.join("other").join("unlisted_names_only.csv").is_file());
    assert!(out.join("WhereIsWally.csv").is_file());
}

#[test]
fn missing_radon_column_is_named() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("radon.csv");
    fs::write(&path, "Id,Dane podstawowe - Imię\n1,Jan\n").unwrap();

    let err = roster::read_radon_export(&path).unwrap_err();
    assert!(err.to_string().contains("Dane podstawowe - Drugie imię"), "{err}");
}

#[test]
fn selected_authors_get_orcids_from_checked_sheets() {
    let dir = tempfile::tempdir().unwrap();
    write_inputs(dir.path());

    let rows = roster::read_radon_export(&dir.path().join("radon.csv")).unwrap();
    let evaluation = roster::read_evaluation(&dir.path().join("evaluation.csv")).unwrap();
    let authors = roster::build_authors(&rows);
    let selected = roster::select_evaluated(&authors, &evaluation);
    assert_eq!(selected.len(), 2);

    let path = dir.path().join("selected_authors.csv");
    roster::write_authors(&selected, &path).unwrap();
    let mut back = roster::read_authors(&path).unwrap();
    assert_eq!(back, selected);

    let uni = dir.path().join("institutions").join("Uniwersytet_Warszawski");
    fs::create_dir_all(&uni).unwrap();
    fs::write(
        uni.join("names.csv"),
        "fullname,orcid,Checked\n\
         Jan Kowalski,https://orcid.org/0000-0001-2345-6789,1\n\
         Anna Maria Nowak,https://orcid.org/0000-0002-0000-0001,0\n",
    )
    .unwrap();

    let updated = roster::enrich(&mut back, &dir.path().join("institutions"), &[]).unwrap();
    assert_eq!(updated, 1);
    assert_eq!(back[0].orcid.as_deref(), Some("0000-0001-2345-6789"));
    assert_eq!(back[1].orcid, None);

    assert_eq!(roster::list_institutions(&dir.path().join("institutions")).unwrap(), vec!["Uniwersytet_Warszawski"]);
}

fn xlsx_fixture() -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures").join("names.xlsx")
}

#[test]
fn workbook_sheet_is_read_and_preferred_over_csv() {
    let rows = roster::read_sheet(&xlsx_fixture()).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].fullname, "Jan Kowalski");
    assert_eq!(rows[0].orcid.as_deref(), Some("https://orcid.org/0000-0001-2345-6789"));
    // numeric cells come back as "1" / "0"
    assert_eq!(rows[0].checked, Some(true));
    assert_eq!(rows[1].checked, Some(false));
    assert_eq!(rows[2].fullname, "Ewa Zając");
    assert_eq!(rows[2].checked, None);

    let dir = tempfile::tempdir().unwrap();
    let uni = dir.path().join("Uniwersytet_Warszawski");
    fs::create_dir_all(&uni).unwrap();
    fs::write(uni.join("names.csv"), "fullname,orcid,Checked\nJan Kowalski,,0\n").unwrap();
    fs::copy(xlsx_fixture(), uni.join("names.xlsx")).unwrap();
    assert_eq!(roster::find_sheet(&uni), Some(uni.join("names.xlsx")));
    assert_eq!(roster::list_institutions(dir.path()).unwrap(), vec!["Uniwersytet_Warszawski"]);

    let mut authors = vec![
        roster::Author { fullname: "Jan Kowalski".into(), ..roster::Author::default() },
        roster::Author { fullname: "Anna Maria Nowak".into(), ..roster::Author::default() },
        roster::Author { fullname: "Ewa Zając".into(), ..roster::Author::default() },
    ];
    assert_eq!(roster::enrich(&mut authors, dir.path(), &[]).unwrap(), 2);
    assert_eq!(authors[0].orcid.as_deref(), Some("0000-0001-2345-6789"));
    assert_eq!(authors[1].orcid, None);
    assert_eq!(authors[2].orcid.as_deref(), Some("0000-0003-0000-0002"));
}
