use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_report::*;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;
use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::{Args, Command, SubmitArgs};
use crate::survey::config_reader::*;
use crate::survey::io_common::resolve_path;
use crate::survey::io_csv::CsvStore;
use crate::survey::io_excel::ExcelStore;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_excel;

#[derive(Debug, Snafu)]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {name}"))]
    MissingWorksheet { name: String },
    #[snafu(display(
        "Several worksheets in {path} ({names:?}), the name of the worksheet must be provided"
    ))]
    TooManyWorksheets { path: String, names: Vec<String> },
    #[snafu(display("Error opening file {path}"))]
    OpeningCsv { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error writing to {path}"))]
    WritingCsv { source: csv::Error, path: String },
    #[snafu(display("Column {column} is not part of {path}"))]
    CsvUnknownColumn { column: String, path: String },
    #[snafu(display("Error writing to {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Unknown rating {key} in columnLabels"))]
    UnknownRatingColumn { key: String },
    #[snafu(display("Unknown input type {provider}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Input type {provider} does not accept new evaluations"))]
    ReadOnlyStore { provider: String },
    #[snafu(display("Invalid evaluation"))]
    InvalidSubmission { source: SubmissionError },
    #[snafu(display("Error rendering the report"))]
    Render { source: RenderError },
    #[snafu(display("Missing parent directory"))]
    MissingParentDir {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

/// The kind of file holding the evaluations.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

impl Provider {
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Csv => "csv",
            Provider::Xlsx => "xlsx",
        }
    }

    pub fn parse(s: &str) -> SurveyResult<Provider> {
        match s {
            "csv" => Ok(Provider::Csv),
            "xlsx" | "excel" => Ok(Provider::Xlsx),
            x => UnknownProviderSnafu { provider: x }.fail(),
        }
    }

    fn from_extension(path: &Path) -> Provider {
        match path.extension().and_then(|e| e.to_str()) {
            Some(e) if e.eq_ignore_ascii_case("xlsx") => Provider::Xlsx,
            _ => Provider::Csv,
        }
    }
}

/// The settings of one run, once the configuration file and the command line are merged.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Settings {
    pub provider: Provider,
    pub input_path: PathBuf,
    pub excel_worksheet_name: Option<String>,
    pub output_directory: PathBuf,
    pub report_file_name: String,
    pub labels: ColumnLabels,
}

impl Settings {
    pub fn from_args(args: &Args) -> SurveyResult<Settings> {
        let config = match args.config.as_deref() {
            Some(p) => read_config(p)?,
            None => SurveyConfig::default(),
        };
        let root: Option<&Path> = match args.config.as_deref() {
            Some(p) => Some(Path::new(p).parent().context(MissingParentDirSnafu {})?),
            None => None,
        };
        Settings::merge(args, &config, root)
    }

    fn merge(args: &Args, config: &SurveyConfig, root: Option<&Path>) -> SurveyResult<Settings> {
        let input_path: PathBuf = match (&args.input, &config.store_settings.file_path) {
            (Some(p), _) => PathBuf::from(p),
            (None, Some(p)) => resolve_path(root, p),
            (None, None) => {
                whatever!("No input file: use --input or storeSettings.filePath in the configuration")
            }
        };
        let provider = match args
            .input_type
            .as_deref()
            .or(config.store_settings.provider.as_deref())
        {
            Some(s) => Provider::parse(s)?,
            None => Provider::from_extension(&input_path),
        };
        let output_directory = match &config.output_settings.output_directory {
            Some(d) => resolve_path(root, d),
            None => root.map(|r| r.to_path_buf()).unwrap_or_default(),
        };
        Ok(Settings {
            provider,
            input_path,
            excel_worksheet_name: args
                .excel_worksheet_name
                .clone()
                .or_else(|| config.store_settings.excel_worksheet_name.clone()),
            output_directory,
            report_file_name: config
                .output_settings
                .report_file_name
                .clone()
                .unwrap_or_else(|| REPORT_FILE_NAME.to_string()),
            labels: config.column_labels()?,
        })
    }

    pub fn open_store(&self) -> Box<dyn RowStore<Error = SurveyError>> {
        match self.provider {
            Provider::Csv => Box::new(CsvStore::new(&self.input_path)),
            Provider::Xlsx => Box::new(ExcelStore::new(
                &self.input_path,
                self.excel_worksheet_name.clone(),
            )),
        }
    }
}

/// The summary of a report, in the JSON format printed on the output.
pub fn summary_to_json(summary: &ReportSummary, labels: &ColumnLabels) -> JSValue {
    let averages: Vec<JSValue> = summary
        .stats
        .iter()
        .map(|s| {
            json!({
                "rating": s.column.name(),
                "label": labels.label(s.column),
                "count": s.count.to_string(),
                "mean": s.mean().map(|m| format!("{:.2}", m)),
            })
        })
        .collect();
    json!({
        "totalEvaluations": summary.total.to_string(),
        "averages": averages
    })
}

fn write_output(out: &str, bytes: &[u8]) -> SurveyResult<()> {
    if out == "stdout" {
        let mut stdout = std::io::stdout();
        stdout
            .write_all(bytes)
            .and_then(|_| stdout.flush())
            .context(WritingFileSnafu { path: out })?;
        return Ok(());
    }
    let p = Path::new(out);
    if let Some(parent) = p.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingFileSnafu { path: out })?;
        }
    }
    fs::write(p, bytes).context(WritingFileSnafu { path: out })?;
    info!(
        "Report written to {:?} ({}, {} bytes)",
        out,
        REPORT_MIME_TYPE,
        bytes.len()
    );
    Ok(())
}

/// Reads all the evaluations, prints their summary and writes the PDF report.
///
/// Returns the path the report was written to.
pub fn run_report(
    settings: &Settings,
    out: Option<String>,
    check_summary_path: Option<String>,
) -> SurveyResult<String> {
    let store = settings.open_store();
    let table = store.read()?;

    let builder = ReportBuilder::new(settings.labels.clone());
    let summary = builder.summarize(&table);
    let summary_js = summary_to_json(&summary, builder.labels());
    let pretty_js_stats = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    let out_path = out.unwrap_or_else(|| {
        settings
            .output_directory
            .join(&settings.report_file_name)
            .display()
            .to_string()
    });
    // The document takes the standard output, the summary goes to the logs.
    if out_path == "stdout" {
        info!("summary: {}", pretty_js_stats);
    } else {
        println!("{}", pretty_js_stats);
    }

    let bytes = builder
        .document_from_summary(&summary)
        .to_pdf()
        .context(RenderSnafu {})?;
    write_output(&out_path, &bytes)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(&summary_p)?;
        debug!("reference summary: {:?}", summary_ref);
        let pretty_js_summary_ref =
            serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
        if pretty_js_summary_ref != pretty_js_stats {
            warn!("Found differences with the reference summary");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(out_path)
}

fn build_submission(sub: &SubmitArgs) -> SurveyResult<Submission> {
    let now = Local::now();
    let date = match sub.date.as_deref() {
        Some(s) => Submission::parse_date(s).context(InvalidSubmissionSnafu {})?,
        None => now.date_naive(),
    };
    let time = match sub.time.as_deref() {
        Some(s) => Submission::parse_time(s).context(InvalidSubmissionSnafu {})?,
        None => now.time(),
    };
    let consumption = match sub.consumption.as_deref() {
        Some(s) => Consumption::parse(s).context(InvalidSubmissionSnafu {})?,
        None => Consumption::FULL,
    };
    Ok(Submission {
        date,
        evaluator: sub.evaluator.clone(),
        time,
        meal_type: MealType::parse(&sub.meal_type).context(InvalidSubmissionSnafu {})?,
        sector: Sector::parse(&sub.sector).context(InvalidSubmissionSnafu {})?,
        ratings: [
            sub.appearance,
            sub.aroma,
            sub.flavor,
            sub.texture,
            sub.temperature,
            sub.portion,
            sub.overall,
        ],
        consumption,
        notes: sub.notes.clone().unwrap_or_default(),
    })
}

/// Validates one evaluation and appends it to the store.
///
/// Returns the number of evaluations in the store afterwards.
pub fn run_submit(settings: &Settings, sub: &SubmitArgs) -> SurveyResult<usize> {
    let submission = build_submission(sub)?;
    let row = submission
        .to_row(&settings.labels)
        .context(InvalidSubmissionSnafu {})?;
    let mut store = settings.open_store();
    let table = store.append(row)?;
    info!("Recorded evaluation #{}", table.len());
    Ok(table.len())
}

pub fn run(args: &Args) -> SurveyResult<()> {
    let settings = Settings::from_args(args)?;
    info!("settings: {:?}", settings);
    match &args.command {
        Command::Report { out, reference } => {
            run_report(&settings, out.clone(), reference.clone())?;
        }
        Command::Submit(sub) => {
            let total = run_submit(&settings, sub)?;
            println!("Evaluation recorded ({} in total)", total);
        }
    }
    Ok(())
}
