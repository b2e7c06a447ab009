//! Pawprint CLI - Command-line interface for the pawprint pipeline
//!
//! Commands:
//! - transform: Run the pipeline and write the long-form table
//! - render: Run the pipeline and write the chart HTML artifacts
//! - validate: Run the pipeline and print a summary report

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use thiserror::Error;

use pawprint::pipeline::TrackerPipeline;
use pawprint::types::{Category, TrackerReport};
use pawprint::{PipelineError, PAWPRINT_VERSION};

/// Pawprint - charts from daily self-tracking exports
#[derive(Parser)]
#[command(name = "pawprint")]
#[command(version = PAWPRINT_VERSION)]
#[command(about = "Transform self-tracking CSV exports into a long-form table and charts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pipeline and write the long-form table
    Transform {
        /// Input CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long)]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json")]
        format: OutputFormat,

        /// Trend window in observations
        #[arg(long, default_value = "7")]
        window: usize,
    },

    /// Run the pipeline and write the chart HTML artifacts
    Render {
        /// Input CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Directory for the HTML artifacts
        #[arg(short, long, default_value = "charts")]
        out_dir: PathBuf,

        /// Trend window in observations
        #[arg(long, default_value = "7")]
        window: usize,
    },

    /// Run the pipeline and print a summary report
    Validate {
        /// Input CSV export
        #[arg(short, long)]
        input: PathBuf,

        /// Output the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Full report as JSON (table, factor set, dates)
    Json,
    /// Full report as pretty-printed JSON
    JsonPretty,
    /// Long-form table rows as CSV
    Csv,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Transform {
            input,
            output,
            format,
            window,
        } => cmd_transform(&input, &output, format, window),
        Commands::Render {
            input,
            out_dir,
            window,
        } => cmd_render(&input, &out_dir, window),
        Commands::Validate { input, json } => cmd_validate(&input, json),
    }
}

fn cmd_transform(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    window: usize,
) -> Result<(), CliError> {
    let report = TrackerPipeline::with_trend_window(window).process_file(input)?;

    let rendered = match format {
        OutputFormat::Json => serde_json::to_string(&report)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(&report)?,
        OutputFormat::Csv => longform_csv(&report)?,
    };

    write_output(output, &rendered)?;
    Ok(())
}

fn cmd_render(input: &Path, out_dir: &Path, window: usize) -> Result<(), CliError> {
    let pipeline = TrackerPipeline::with_trend_window(window);
    let report = pipeline.process_file(input)?;
    let (measurements, factors) = pipeline.charts(&report);

    fs::create_dir_all(out_dir)?;
    let measurements_path = out_dir.join("measurements.html");
    let factors_path = out_dir.join("factors.html");
    measurements.write_html(&measurements_path, "Measurements")?;
    factors.write_html(&factors_path, "Factor occurrences")?;

    println!("{}", measurements_path.display());
    println!("{}", factors_path.display());
    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CliError> {
    let report = TrackerPipeline::new().process_file(input)?;
    let summary = Summary::from_report(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("rows: {}", summary.rows);
        for (category, count) in &summary.rows_per_category {
            println!("  {category}: {count}");
        }
        match (&summary.first_date, &summary.last_date) {
            (Some(first), Some(last)) => println!("dates: {first} .. {last} ({} days)", summary.days),
            _ => println!("dates: none"),
        }
        println!("factors: {}", summary.factors_unique.join(", "));
    }
    Ok(())
}

#[derive(Serialize)]
struct Summary {
    rows: usize,
    rows_per_category: Vec<(String, usize)>,
    days: usize,
    first_date: Option<String>,
    last_date: Option<String>,
    factors_unique: Vec<String>,
}

impl Summary {
    fn from_report(report: &TrackerReport) -> Self {
        let rows_per_category = Category::ALL
            .iter()
            .map(|category| {
                let count = report
                    .longform
                    .iter()
                    .filter(|r| r.category == *category)
                    .count();
                (category.as_str().to_string(), count)
            })
            .collect();

        Self {
            rows: report.longform.len(),
            rows_per_category,
            days: report.dates.len(),
            first_date: report.dates.first().map(|d| d.to_string()),
            last_date: report.dates.last().map(|d| d.to_string()),
            factors_unique: report.factors_unique.clone(),
        }
    }
}

fn longform_csv(report: &TrackerReport) -> Result<String, CliError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for record in &report.longform {
        writer.serialize(record)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| CliError::Io(io::Error::new(io::ErrorKind::Other, e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    if path == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(contents.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        fs::write(path, contents)?;
    }
    Ok(())
}
