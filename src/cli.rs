// src/cli.rs
//
// Non-interactive front end: one subcommand per pipeline step. Paths and
// tunables come from `sonaa.toml` / `SONAA_*`; flags only pick inputs.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Result, WrapErr, eyre};

use crate::{
    config::{
        self,
        options::{AppOptions, ExportFormat, ExportOptions, ExportType, InstitutionSelector, PageKind},
    },
    corpus::Corpus,
    file::{ensure_directory, export_dataset},
    progress::Progress,
    roster::{self, split::fullname_map},
    scrape,
};

#[derive(Parser)]
#[command(name = "cli")]
#[command(about = "SONaa pipeline: radon roster, ORCID works, article corpus")]
#[command(after_help = "Environment:\n  SONAA_<SECTION>__<KEY>   Override a config value\n  RUST_LOG                 Log filter for <store>/debug.log")]
struct Cli {
    /// Config file (default: ./sonaa.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Split the radon export into institution sheets and reports
    Split {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Build all_authors.csv and selected_authors.csv from the radon export
    Authors,
    /// Copy checked ORCID ids from the curated sheets onto selected authors
    Enrich,
    /// Fetch ORCID works for checked researchers
    Scrape {
        /// Institution directory name; repeat for several (default: all)
        #[arg(long = "uni")]
        unis: Vec<String>,
    },
    /// Parse a saved ORCID profile page instead of calling the API
    ParseHtml {
        file: PathBuf,
        name: String,
        orcid: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Concatenate works/<uni>.csv into raw_article_list.csv
    Collect,
    /// Build the corpus from authors and the raw article list, clean it and save it
    Build {
        #[arg(long)]
        authors: Option<PathBuf>,
        #[arg(long)]
        pbn: Option<PathBuf>,
        #[arg(long)]
        openalex: Option<PathBuf>,
        /// `Aid, alternative_name` CSV
        #[arg(long)]
        alt_names: Option<PathBuf>,
    },
    /// Merge article groups listed one per line (comma-separated ids)
    Merge { list: PathBuf },
    /// Link corpus articles to files under the PDF directory
    LinkFiles {
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Export the corpus tables
    Export {
        #[arg(value_enum)]
        table: Table,
        #[arg(long, short)]
        out: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = FormatArg::Csv)]
        format: FormatArg,
        /// One file per main-job institution (authors only)
        #[arg(long)]
        per_institution: bool,
        #[arg(long)]
        no_headers: bool,
    },
    /// List the most similar article titles for manual review
    Similar {
        #[arg(long)]
        max_pairs: Option<usize>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Table {
    Authors,
    Articles,
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Tsv,
}

/// Progress lines on stderr.
struct CliProgress {
    total: usize,
    done: usize,
}

impl CliProgress {
    fn new() -> Self {
        Self { total: 0, done: 0 }
    }
}

impl Progress for CliProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        eprintln!("{total} items");
    }
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
    fn item_done(&mut self, label: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {label}", self.done, self.total);
    }
    fn item_failed(&mut self, label: &str) {
        self.done += 1;
        eprintln!("[{}/{}] FAILED {label}", self.done, self.total);
    }
    fn finish(&mut self) {
        eprintln!("done");
    }
}

pub fn run() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let options = config::load(cli.config.as_deref())?;
    crate::log::init(&options.paths.store_dir)?;
    logf!("CLI: starting");

    match cli.command {
        Command::Split { out } => split(&options, out),
        Command::Authors => authors(&options),
        Command::Enrich => enrich(&options),
        Command::Scrape { unis } => scrape_works(options, unis),
        Command::ParseHtml { file, name, orcid, out } => parse_html(&options, &file, &name, &orcid, out),
        Command::Collect => collect(&options),
        Command::Build { authors, pbn, openalex, alt_names } => {
            build(&options, authors, pbn.as_deref(), openalex.as_deref(), alt_names.as_deref())
        }
        Command::Merge { list } => merge(&options, &list),
        Command::LinkFiles { dir } => link_files(&options, dir),
        Command::Export { table, out, format, per_institution, no_headers } => {
            export(&options, table, out, format, per_institution, no_headers)
        }
        Command::Similar { max_pairs } => similar(&options, max_pairs),
    }
}

fn split(options: &AppOptions, out: Option<PathBuf>) -> Result<()> {
    let paths = &options.paths;
    let rows = roster::read_radon_export(&paths.radon_export)?;
    let evaluation = roster::read_evaluation(&paths.evaluation)?;
    let fullnames = fullname_map(&roster::build_authors(&rows));

    let split = roster::split(&rows, &fullnames, &evaluation);
    let out_dir = out.unwrap_or_else(|| paths.institutions_dir.clone());
    let written = roster::write_split(&split, &out_dir)?;
    println!(
        "{} institutions ({} evaluated), {} files under {}",
        split.institutions.len(),
        split.evaluated().count(),
        written.len(),
        out_dir.display()
    );
    Ok(())
}

fn authors(options: &AppOptions) -> Result<()> {
    let paths = &options.paths;
    let rows = roster::read_radon_export(&paths.radon_export)?;
    let evaluation = roster::read_evaluation(&paths.evaluation)?;

    let all = roster::build_authors(&rows);
    let selected = roster::select_evaluated(&all, &evaluation);
    roster::write_authors(&all, &paths.all_authors())?;
    roster::write_authors(&selected, &paths.selected_authors())?;
    println!("{} authors, {} at evaluated institutions", all.len(), selected.len());
    Ok(())
}

fn enrich(options: &AppOptions) -> Result<()> {
    let path = options.paths.selected_authors();
    let mut authors = roster::read_authors(&path).wrap_err("run `authors` first")?;
    let updated = roster::enrich(&mut authors, &options.paths.institutions_dir, &options.roster.ambiguous_names)?;
    roster::write_authors(&authors, &path)?;
    let with_orcid = authors.iter().filter(|a| a.has_orcid()).count();
    println!("{updated} authors got an ORCID ({with_orcid} of {} now have one)", authors.len());
    Ok(())
}

fn scrape_works(mut options: AppOptions, unis: Vec<String>) -> Result<()> {
    let paths = options.paths.clone();
    let available = roster::list_institutions(&paths.institutions_dir)?;
    options.scrape.institutions = match unis.as_slice() {
        [] => InstitutionSelector::All,
        [one] => InstitutionSelector::One(one.clone()),
        _ => InstitutionSelector::Names(unis),
    };
    let selected = options.scrape.institutions.resolve(&available);
    if selected.is_empty() {
        return Err(eyre!("no matching institutions under {}", paths.institutions_dir.display()));
    }

    ensure_directory(&paths.works_dir)?;
    let mut progress = CliProgress::new();
    let report = scrape::collect_works(&options.scrape, &paths.institutions_dir, &selected, &mut progress)?;
    report.write(&paths.works_dir)?;
    println!("{} works, {} failed records", report.total_rows(), report.failed.len());
    Ok(())
}

fn parse_html(options: &AppOptions, file: &Path, name: &str, orcid: &str, out: Option<PathBuf>) -> Result<()> {
    let rows = scrape::works_from_html(file, name, orcid, &options.scrape)?;
    let headers = scrape::work_headers();
    let table: Vec<Vec<String>> = rows.iter().map(|r| r.to_row()).collect();

    match out {
        Some(path) => {
            crate::csv::write_csv(&path, &headers, &table)?;
            println!("{} works -> {}", rows.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            crate::csv::write_rows(stdout.lock(), Some(&headers), &table, b',')?;
        }
    }
    Ok(())
}

fn collect(options: &AppOptions) -> Result<()> {
    let ds = scrape::collect_article_list(&options.paths.works_dir)?;
    println!("{} rows -> {}", ds.row_count(), options.paths.raw_articles().display());
    Ok(())
}

fn load_corpus(options: &AppOptions) -> Result<Corpus> {
    let path = &options.paths.corpus;
    Corpus::load(path, options.matching.clone())
        .wrap_err_with(|| format!("cannot load {} (run `build` first)", path.display()))
}

fn build(
    options: &AppOptions,
    authors: Option<PathBuf>,
    pbn: Option<&Path>,
    openalex: Option<&Path>,
    alt_names: Option<&Path>,
) -> Result<()> {
    let paths = &options.paths;
    let authors_path = authors.unwrap_or_else(|| paths.selected_authors());
    let authors = roster::read_authors(&authors_path)?;
    let mut corpus = Corpus::with_authors(authors, options.matching.clone());

    if let Some(p) = alt_names {
        let added = corpus.import_alternative_names(p)?;
        eprintln!("{added} alternative names");
    }

    let n = corpus.load_orcid_articles(&paths.raw_articles())?;
    eprintln!("ORCID: {n} articles");
    if let Some(p) = pbn {
        let (added, updated) = corpus.load_pbn_articles(p)?;
        eprintln!("PBN: {added} added, {updated} updated");
    }
    if let Some(p) = openalex {
        let r = corpus.load_openalex_articles(p)?;
        eprintln!(
            "OpenAlex: {} matched DOIs, {} enhanced, {} added, {} unmatched",
            r.matched_dois, r.enhanced, r.added, r.unmatched
        );
    }

    let report = corpus.clean(&options.dedup);
    for c in &report.conflicts {
        eprintln!("title conflict: {}", c.title);
    }
    corpus.save(&paths.corpus)?;
    println!(
        "{} articles ({} DOI merges, {} title merges, {} conflicts) -> {}",
        corpus.len(),
        report.doi_merged.len(),
        report.title_merged.len(),
        report.conflicts.len(),
        paths.corpus.display()
    );
    Ok(())
}

fn merge(options: &AppOptions, list: &Path) -> Result<()> {
    let mut corpus = load_corpus(options)?;
    let merged = corpus.apply_merge_list(list)?;
    corpus.save(&options.paths.corpus)?;
    println!("{merged} groups merged, {} articles", corpus.len());
    Ok(())
}

fn link_files(options: &AppOptions, dir: Option<PathBuf>) -> Result<()> {
    let mut corpus = load_corpus(options)?;
    let dir = dir.unwrap_or_else(|| options.paths.pdf_dir.clone());
    let r = corpus.update_files(&dir)?;
    corpus.save(&options.paths.corpus)?;
    println!(
        "{} files: {} articles linked, {} without files, {} orphan files",
        r.files, r.articles_with_files, r.articles_without_files, r.files_without_articles
    );
    Ok(())
}

fn export(
    options: &AppOptions,
    table: Table,
    out: Option<PathBuf>,
    format: FormatArg,
    per_institution: bool,
    no_headers: bool,
) -> Result<()> {
    let corpus = load_corpus(options)?;
    let (ds, inst_col) = match table {
        Table::Authors => {
            let ds = corpus.authors_table();
            let col = ds.column("main_job");
            (ds, col)
        }
        Table::Articles => (corpus.articles_table(), None),
    };

    let mut export = ExportOptions::default();
    export.format = match format {
        FormatArg::Csv => ExportFormat::Csv,
        FormatArg::Tsv => ExportFormat::Tsv,
    };
    export.export_type = if per_institution { ExportType::PerInstitution } else { ExportType::SingleFile };
    export.include_headers = !no_headers;
    let kind = match table {
        Table::Authors => PageKind::Authors,
        Table::Articles => PageKind::Articles,
    };
    export.set_default_dir_for_page(kind);
    if let Some(out) = out {
        export.set_path(&out.to_string_lossy());
    }

    let written = export_dataset(&export, &ds.headers, &ds.rows, inst_col)?;
    for p in &written {
        println!("{}", p.display());
    }
    Ok(())
}

fn similar(options: &AppOptions, max_pairs: Option<usize>) -> Result<()> {
    let corpus = load_corpus(options)?;
    let d = &options.dedup;
    let pairs = corpus.identify_similar_titles(max_pairs.unwrap_or(d.similar_max_pairs), d.ngram_size, d.min_shared);

    let mut out = io::stdout().lock();
    for p in pairs {
        let (a, b) = (&corpus.articles[p.first], &corpus.articles[p.second]);
        writeln!(out, "{}\t{}\t{}", p.shared, a.article_id, b.article_id)?;
        writeln!(out, "\t{}\n\t{}", a.title, b.title)?;
    }
    Ok(())
}
