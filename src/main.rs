//! CLI entry point for the transit health analyzer.
//!
//! Provides subcommands for running the batch analysis against the hosted
//! database or a local CSV archive, exporting raw pings to an archive, and
//! checking which pre-aggregated views answer.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use transit_health::{
    analyzers::runner::{AnalysisRunner, Metric, VIEW_LIMIT},
    infra::{
        csv_source::CsvPingSource,
        postgrest::{RestClient, RestConfig},
    },
    output::{render_report, to_json, write_snapshot_csv},
    services::sources::{PingSource, ViewSource},
};

#[derive(Parser)]
#[command(name = "transit_health")]
#[command(about = "Derive operational health metrics from transit vehicle pings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all four analyses once and print the report
    Run {
        /// Number of recent pings to analyze locally (overrides per-metric defaults)
        #[arg(short, long)]
        snapshot_size: Option<usize>,

        /// Analyze a CSV archive instead of the hosted database
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Report format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Export recent raw pings from the hosted database to a CSV archive
    Export {
        /// Archive path; a `.gz` suffix enables compression
        #[arg(short, long, default_value = "pings.csv")]
        output: PathBuf,

        /// Number of most recent pings to export
        #[arg(short, long, default_value_t = 1500)]
        limit: usize,
    },
    /// Check which pre-aggregated views the database serves
    Views,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/transit_health.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("transit_health.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            snapshot_size,
            csv,
            format,
        } => {
            let mut runner = match csv {
                Some(path) => {
                    info!(path = %path.display(), "Analyzing CSV archive");
                    AnalysisRunner::new(None, Box::new(CsvPingSource::new(path)))
                }
                None => {
                    let client = Arc::new(RestClient::from_config(&RestConfig::from_env()?)?);
                    AnalysisRunner::new(Some(Box::new(client.clone())), Box::new(client))
                }
            }
            .with_snapshot_size(snapshot_size);

            let sections = runner.run_all().await;
            match format {
                OutputFormat::Table => print!("{}", render_report(&sections)),
                OutputFormat::Json => println!("{}", to_json(&sections)?),
            }
        }
        Commands::Export { output, limit } => {
            let client = RestClient::from_config(&RestConfig::from_env()?)?;
            let rows = client.query_raw(limit).await?;
            write_snapshot_csv(&output, &rows)?;
        }
        Commands::Views => {
            let client = RestClient::from_config(&RestConfig::from_env()?)?;
            check_views(&client).await;
        }
    }

    Ok(())
}

/// Queries every metric view once and logs whether it answered.
#[tracing::instrument(skip(views))]
async fn check_views(views: &dyn ViewSource) {
    let mut available = 0;
    for metric in Metric::ALL {
        match views.query_view(metric.view_name(), VIEW_LIMIT).await {
            Ok(rows) => {
                available += 1;
                info!(view = metric.view_name(), rows = rows.len(), "View available");
            }
            Err(e) => warn!(view = metric.view_name(), error = %e, "View unavailable"),
        }
    }
    info!(available, total = Metric::ALL.len(), "View check complete");
}
