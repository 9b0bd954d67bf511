// tests/export_options.rs
//
// Tests for ExportOptions path/extension logic.
//
use std::path::{Path, PathBuf};

use sonaa::config::options::PageKind::{Articles, Authors, Works};
use sonaa::config::options::{ExportFormat, ExportOptions, ExportType};

#[test]
fn default_path_ext_changes_when_fully_default() {
    let mut opts = ExportOptions::default();
    opts.format = ExportFormat::Csv;
    opts.export_type = ExportType::SingleFile;

    opts.set_default_dir_for_page(Authors);
    assert!(opts.is_fully_default_for(Authors));
    let p_csv = opts.out_path();
    assert!(p_csv.to_string_lossy().ends_with("all.csv"));

    // Switch format; still fully-default -> extension follows the format
    opts.format = ExportFormat::Tsv;
    assert!(opts.out_path().to_string_lossy().ends_with("all.tsv"));
}

fn norm(p: &Path) -> PathBuf { p.components().collect() }

#[test]
fn filename_preserved_on_dir_migration() {
    let mut export = ExportOptions::default();
    let text_before = ExportOptions::default_dir_for(Works).join("hello.csv").to_string_lossy().into_owned();

    let text_after = export.follow_page(&text_before, Works, Articles).unwrap();

    let expected = norm(&ExportOptions::default_dir_for(Articles).join("hello.csv"));
    assert_eq!(norm(Path::new(&text_after)), expected, "DIR should migrate and filename be preserved");
    assert_eq!(norm(export.current_dir()), norm(&ExportOptions::default_dir_for(Articles)));
}

#[test]
fn no_dir_migration_when_textbox_dir_is_custom() {
    let mut export = ExportOptions::default();
    assert_eq!(export.follow_page("out/custom/hello.csv", Works, Authors), None);
    assert_eq!(norm(export.current_dir()), norm(&ExportOptions::default_dir_for(Authors)));
}

#[test]
fn user_extension_survives_format_change() {
    let mut export = ExportOptions::default();
    export.format = ExportFormat::Csv;
    export.set_path("out/authors/custom.data");

    export.format = ExportFormat::Tsv;
    assert!(export.out_path().to_string_lossy().ends_with("custom.data"));
    assert!(!export.is_fully_default_for(Authors));
}

#[test]
fn typed_format_extension_is_not_sticky() {
    let mut export = ExportOptions::default();
    export.set_path("out/works/list.csv");
    export.format = ExportFormat::Tsv;
    assert!(export.out_path().to_string_lossy().ends_with("list.tsv"));
}

#[test]
fn per_institution_directory_follows_page() {
    let mut export = ExportOptions::default();
    export.export_type = ExportType::PerInstitution;
    let text = ExportOptions::default_dir_for(Authors).to_string_lossy().into_owned();

    let after = export.follow_page(&text, Authors, Works).unwrap();
    assert_eq!(norm(Path::new(&after)), norm(&ExportOptions::default_dir_for(Works)));
    assert_eq!(norm(&export.out_path()), norm(&ExportOptions::default_dir_for(Works)));
}

#[test]
fn per_institution_path_is_a_directory() {
    let mut export = ExportOptions::default();
    export.export_type = ExportType::PerInstitution;
    export.set_path("out/by_uni");
    assert_eq!(norm(&export.out_path()), norm(Path::new("out/by_uni")));
}
