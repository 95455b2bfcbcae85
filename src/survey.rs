use log::{debug, info, warn};

use likert_scoring::session::Session;
use likert_scoring::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::survey::config_reader::*;
use crate::survey::io_bank::BankCache;

pub mod config_reader;
pub mod io_answers;
pub mod io_bank;
pub mod io_common;
pub mod io_export;
pub mod resolver;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet or no header row"))]
    EmptyExcel { path: String },
    #[snafu(display("Error accessing file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display(
        "{path}: no column found for {missing} (the header contains: {header})"
    ))]
    Schema {
        path: String,
        missing: String,
        header: String,
    },
    #[snafu(display(
        "No question bank file found for {title:?}. Files available: {}",
        available.join(", ")
    ))]
    FileNotFound {
        title: String,
        available: Vec<String>,
    },
    #[snafu(display("Unknown question bank {title:?}. Known banks: {}", known.join(", ")))]
    UnknownBank { title: String, known: Vec<String> },
    #[snafu(display("No question bank selected. Choose one with --bank: {}", known.join(", ")))]
    MissingBank { known: Vec<String> },
    #[snafu(display("Error reading directory {path}"))]
    ReadingDirectory {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error reading {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error reading the answers"))]
    ReadingAnswers { source: std::io::Error },
    #[snafu(display("Error writing the questionnaire"))]
    WritingPrompt { source: std::io::Error },
    #[snafu(display("Answer #{position}: cannot understand {content:?} (expected a value from 1 to 5)"))]
    InvalidAnswer { position: usize, content: String },
    #[snafu(display("{given} answers given but the bank only has {count} questions"))]
    TooManyAnswers { given: usize, count: usize },
    #[snafu(display("Error writing the report {path}"))]
    WritingExport {
        source: rust_xlsxwriter::XlsxError,
        path: String,
    },
    #[snafu(display("Error writing the summary {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Cannot compute the scores"))]
    Scoring { source: ScoringErrors },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The effective settings of a run: the configuration file (or the defaults)
/// with the command line applied on top.
#[derive(Debug, Clone)]
pub struct RunSettings {
    pub config: SurveyConfig,
    /// Directory against which relative paths of the configuration resolve.
    pub root: PathBuf,
    /// Directories given on the command line, relative to the working
    /// directory. When present they replace those of the configuration.
    pub cli_bank_directories: Vec<PathBuf>,
}

impl RunSettings {
    pub fn from_args(args: &Args) -> SurveyResult<RunSettings> {
        let (mut config, root) = match &args.config {
            Some(config_path) => {
                let config = read_config(config_path)?;
                let root = Path::new(config_path)
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                (config, root)
            }
            None => (SurveyConfig::default(), PathBuf::new()),
        };
        let cli_bank_directories: Vec<PathBuf> = args.bank_dir.iter().map(PathBuf::from).collect();
        if let Some(mode) = &args.resolution {
            config.resolution = parse_resolution_mode(mode)?;
        }
        debug!("RunSettings: config: {:?}, root: {:?}", config, root);
        Ok(RunSettings {
            config,
            root,
            cli_bank_directories,
        })
    }

    pub fn resolve_path(&self, p: &str) -> PathBuf {
        self.root.join(p)
    }

    pub fn bank_directories(&self) -> Vec<PathBuf> {
        if !self.cli_bank_directories.is_empty() {
            return self.cli_bank_directories.clone();
        }
        self.config
            .bank_directories
            .iter()
            .map(|d| self.resolve_path(d))
            .collect()
    }

    pub fn bank_titles(&self) -> Vec<String> {
        self.config.banks.iter().map(|b| b.title.clone()).collect()
    }

    /// Finds the spreadsheet holding the given bank, following the configured
    /// resolution mode.
    pub fn locate_bank(&self, title: &str) -> SurveyResult<PathBuf> {
        let source = self
            .config
            .banks
            .iter()
            .find(|b| b.title == title)
            .context(UnknownBankSnafu {
                title,
                known: self.bank_titles(),
            })?;
        let dirs = self.bank_directories();
        match self.config.resolution {
            ResolutionMode::Fuzzy => {
                let vocabulary = self.config.resolver_vocabulary.clone().unwrap_or_default();
                resolver::resolve_bank_file(title, &dirs, &vocabulary)
            }
            ResolutionMode::Static => {
                let p = source.file_path.as_ref().map(|fp| self.resolve_path(fp));
                resolver::resolve_static(title, p.as_deref(), &dirs)
            }
        }
    }

    pub fn export_path(&self, args: &Args, session: &Session) -> PathBuf {
        if let Some(p) = &args.export {
            return PathBuf::from(p);
        }
        let file_name = io_export::export_file_name(
            &self.config.export_file_prefix,
            session.name(),
            &self.config.default_respondent_name,
        );
        match &self.config.output_directory {
            Some(d) => self.resolve_path(d).join(file_name),
            None => PathBuf::from(file_name),
        }
    }
}

fn category_summary_to_json(result: &ScoringResult) -> Vec<JSValue> {
    result
        .categories
        .iter()
        .map(|c| {
            json!({
                "category": c.code,
                "label": c.label,
                "itemCount": c.item_count,
                "sumScore": c.sum_score,
                "meanScore": c.mean_score,
            })
        })
        .collect()
}

fn build_summary_js(session: &Session, result: &ScoringResult) -> JSValue {
    let mut wide: JSMap<String, JSValue> = JSMap::new();
    for (code, mean) in result.wide() {
        wide.insert(code, json!(mean));
    }
    json!({
        "config": {
            "bank": session.bank(),
            "name": session.name(),
            "class": session.class_label(),
        },
        "totalScore": result.total_score,
        "results": category_summary_to_json(result),
        "wide": wide,
    })
}

fn print_results(session: &Session, result: &ScoringResult) {
    println!("Category summary");
    for c in result.categories.iter() {
        println!(
            "  {:<55} {:>3} items  total {:>4}  mean {:.2}",
            c.label, c.item_count, c.sum_score, c.mean_score
        );
    }
    println!("Total score (all questions): {}", result.total_score);
    println!(
        "Name: {}, Class: {}, Bank: {}",
        session.name(),
        session.class_label(),
        session.bank().unwrap_or_default()
    );
}

fn write_summary(out: &str, pretty_js: &str) -> SurveyResult<()> {
    if out.trim().is_empty() {
        debug!("write_summary: no output requested");
        return Ok(());
    }
    if out == "stdout" {
        println!("{}", pretty_js);
        return Ok(());
    }
    info!("write_summary: writing summary to {:?}", out);
    let mut file = fs::File::create(out).context(WritingSummarySnafu { path: out })?;
    file.write_all(pretty_js.as_bytes())
        .context(WritingSummarySnafu { path: out })
}

fn check_reference(reference_path: &str, pretty_js: &str) -> SurveyResult<()> {
    let contents =
        fs::read_to_string(reference_path).context(OpeningJsonSnafu { path: reference_path })?;
    let summary_ref: JSValue = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let pretty_js_ref = serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

/// Prints every configured bank with the file it resolves to and its number
/// of questions.
pub fn list_banks(settings: &RunSettings, cache: &mut BankCache) {
    let aliases = settings.config.column_aliases.clone().unwrap_or_default();
    for title in settings.bank_titles() {
        let located = settings
            .locate_bank(&title)
            .and_then(|p| cache.load(&p, &aliases).map(|entries| (p, entries.len())));
        match located {
            Ok((p, count)) => println!("{}: {} ({} questions)", title, p.display(), count),
            Err(e) => println!("{}: {}", title, e),
        }
    }
    debug!("list_banks: {} file(s) parsed", cache.parse_count());
}

/// Runs one questionnaire end to end: locate and load the bank, collect the
/// answers, score them and write the report.
pub fn run_survey(args: &Args) -> SurveyResult<()> {
    let settings = RunSettings::from_args(args)?;
    let mut cache = BankCache::new();

    if args.list_banks {
        list_banks(&settings, &mut cache);
        return Ok(());
    }

    let title = args.bank.clone().context(MissingBankSnafu {
        known: settings.bank_titles(),
    })?;
    let bank_path = settings.locate_bank(&title)?;
    info!("Attempting to read question bank {:?}", bank_path);

    let aliases = settings.config.column_aliases.clone().unwrap_or_default();
    let entries = cache.load(&bank_path, &aliases)?;

    let name = args.name.clone().unwrap_or_default();
    let class_label = args.class_label.clone().unwrap_or_default();
    if name.trim().is_empty() || class_label.trim().is_empty() {
        warn!("run_survey: the name and/or class of the respondent is missing");
    }
    let mut session = Session::new().respondent(&name, &class_label);
    session.select_bank(&title, entries.len());

    if let Some(answers) = &args.answers {
        io_answers::apply_answer_list(&mut session, answers)?;
    } else if let Some(answers_path) = &args.answers_file {
        let contents = fs::read_to_string(answers_path)
            .context(OpeningFileSnafu { path: answers_path })?;
        io_answers::apply_answer_lines(&mut session, &contents)?;
    } else {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        io_answers::prompt_answers(&mut session, &entries, stdin.lock(), stdout.lock())?;
    }

    if session.remaining() > 0 {
        println!(
            "{} question(s) still unanswered. No results produced.",
            session.remaining()
        );
    }
    let result = session.score(&entries).context(ScoringSnafu {})?;

    print_results(&session, &result);

    let export_path = settings.export_path(args, &session);
    io_export::write_report(&export_path, &result)?;
    println!("Report written to {}", export_path.display());

    let summary_js = build_summary_js(&session, &result);
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;
    if let Some(out) = &args.out {
        write_summary(out, &pretty_js)?;
    }
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }
    Ok(())
}
