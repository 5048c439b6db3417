//! Console sales report.
//!
//! ```text
//! sales-report ventas.csv --zone north
//! sales-report --sample --json
//! sales-report --url https://example.com/ventas.csv --offline
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use sales_dashboard::render::{JsonRenderer, Renderer, TextRenderer};
use sales_dashboard::sample::{self, SampleConfig};
use sales_dashboard::{ColumnMap, DashboardError, DashboardState, SalesDashboard, Zone};

#[derive(Parser)]
#[command(name = "sales-report")]
#[command(about = "Per-product sales KPIs with year-over-year deltas and monthly trend")]
#[command(version)]
struct Cli {
    /// CSV file with monthly sales records
    csv: Option<PathBuf>,

    /// Zone filter: all, north, central, south (Spanish labels also accepted)
    #[arg(long, default_value = "all")]
    zone: Zone,

    /// Year to report on; defaults to the latest year in the data
    #[arg(long)]
    year: Option<i32>,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Use generated sample data instead of a CSV file
    #[arg(long, conflicts_with_all = ["csv", "url"])]
    sample: bool,

    /// Load the CSV from an HTTP(S) URL through the local cache
    #[arg(long, conflicts_with = "csv")]
    url: Option<String>,

    /// Never download; serve --url from the cache only
    #[arg(long)]
    offline: bool,

    /// CSV uses English headers (Year, Month, Branch, ...)
    #[arg(long)]
    english: bool,

    /// Omit the monthly sales table from the text report
    #[arg(long)]
    no_series: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(DashboardError::NotFound(msg)) => {
            eprintln!("Please load a CSV file ({msg})");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> sales_dashboard::Result<String> {
    let columns = if cli.english {
        ColumnMap::english()
    } else {
        ColumnMap::spanish()
    };
    let dashboard = SalesDashboard::builder()
        .offline(cli.offline)
        .columns(columns)
        .build()?;

    let rows = if cli.sample {
        dashboard.load_records(&sample::generate(&SampleConfig::default()))?
    } else if let Some(url) = &cli.url {
        dashboard.load_url(url)?
    } else if let Some(path) = &cli.csv {
        dashboard.load_csv(path)?
    } else {
        return Err(DashboardError::NotFound("no input given".to_string()));
    };
    log::info!("Loaded {} rows", rows);

    let report = match cli.year {
        Some(year) => dashboard.report_for(&DashboardState::new(cli.zone, year))?,
        None => dashboard.report(cli.zone)?,
    };

    if cli.json {
        JsonRenderer::pretty().render(&report)
    } else {
        TextRenderer {
            show_series: !cli.no_series,
        }
        .render(&report)
    }
}
