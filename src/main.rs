//! CLI entry point for the clean-air route planner.
//!
//! Fetches the TfL tube topology and WAQI readings, joins each station to
//! its nearest monitoring site and finds the least-polluted route between
//! two stations.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use clean_air_router::{
    RouteError,
    config::Config,
    infra::{feeds::LiveFeeds, overrides::load_overrides},
    network::{PathResult, PredictionOverrides},
    output::{append_record, format_path, print_json, print_pretty, write_annotations},
    pipeline::{ingest, ingest_stations, lookup_stations},
    stats::RouteSummary,
};
use std::ffi::OsStr;
use std::path::Path;
use std::process::ExitCode;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "clean_air_router")]
#[command(about = "Find the least-polluted tube route between two stations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct FeedArgs {
    /// Station feed URL or JSON file (overrides TFL_STATIONS_URL)
    #[arg(long)]
    stations: Option<String>,

    /// AQI search URL or JSON file (overrides WAQI_SEARCH_URL)
    #[arg(long)]
    aqi: Option<String>,

    /// CSV of predicted AQI values that replace live readings
    #[arg(long, value_name = "CSV")]
    overrides: Option<String>,

    /// Use the latest prediction at or before this time (RFC 3339)
    #[arg(long, requires = "overrides")]
    at: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Plan the least-polluted route between two stations
    Route {
        /// Start station, matched by case-insensitive substring
        from: String,

        /// Destination station, matched by case-insensitive substring
        to: String,

        #[command(flatten)]
        feeds: FeedArgs,

        /// Route feed URL or JSON file (overrides TFL_ROUTES_URL)
        #[arg(long)]
        routes: Option<String>,

        /// CSV file to append the query summary to
        #[arg(short, long)]
        output: Option<String>,

        /// Log the summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write every station with its nearest AQI reading to CSV
    Annotate {
        #[command(flatten)]
        feeds: FeedArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "station_aqi.csv")]
        output: String,
    },
    /// List stations whose name contains QUERY, in match order
    Stations {
        query: String,

        #[command(flatten)]
        feeds: FeedArgs,
    },
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok(); // Load .env file

    let mut config = Config::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = Path::new(&config.log_file_path)
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"))
        .to_path_buf();
    let log_file_name = Path::new(&config.log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("clean_air_router.log"))
        .to_os_string();

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
        Commands::Route {
            from,
            to,
            feeds,
            routes,
            output,
            json,
        } => {
            if let Some(routes) = routes {
                config.routes_source = routes;
            }
            let overrides = apply_feed_args(&mut config, &feeds)?;
            let source = LiveFeeds::from_config(&config)?;
            let network = ingest(&source, &overrides).await?;

            let (summary, code) = match network.plan_by_name(&from, &to) {
                Ok(Some(path)) => {
                    print_route(&path);
                    (RouteSummary::from_path(&path), ExitCode::SUCCESS)
                }
                Ok(None) => {
                    println!("No low-pollution path found between '{from}' and '{to}'");
                    let message = "stations are not connected";
                    (RouteSummary::from_error("no_path", message), ExitCode::from(1))
                }
                Err(e @ RouteError::NotFound(_)) => {
                    println!("{e}, please check the station name");
                    (RouteSummary::from_error("not_found", &e.to_string()), ExitCode::from(2))
                }
                Err(e) => return Err(e.into()),
            };
            let summary = summary.with_queries(&from, &to);

            if json {
                print_json(&summary)?;
            } else {
                print_pretty(&summary);
            }
            if let Some(output) = output {
                append_record(&output, &summary)?;
                info!(output = %output, "Route summary appended");
            }

            return Ok(code);
        }
        Commands::Annotate { feeds, output } => {
            let overrides = apply_feed_args(&mut config, &feeds)?;
            let source = LiveFeeds::from_config(&config)?;
            let catalog = ingest_stations(&source, &overrides).await?;

            let written = write_annotations(&output, &catalog)?;
            println!("Wrote AQI for {written} stations to {output}");
        }
        Commands::Stations { query, feeds } => {
            let overrides = apply_feed_args(&mut config, &feeds)?;
            let source = LiveFeeds::from_config(&config)?;
            let catalog = lookup_stations(&source, &overrides).await?;

            let matches = catalog.search(&query);
            if matches.is_empty() {
                warn!(query = %query, "No station matches");
                println!("{}", RouteError::NotFound(query));
                return Ok(ExitCode::from(2));
            }
            for (i, station) in matches.iter().enumerate() {
                let marker = if i == 0 { "*" } else { " " };
                let aqi = station.aqi.map_or("n/a".to_string(), |a| a.to_string());
                println!("{marker} {} [{}] (AQI: {aqi})", station.name, station.id);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Applies per-invocation feed overrides and loads prediction overrides.
fn apply_feed_args(config: &mut Config, args: &FeedArgs) -> Result<PredictionOverrides> {
    if let Some(stations) = &args.stations {
        config.stations_source = stations.clone();
    }
    if let Some(aqi) = &args.aqi {
        config.aqi_source = aqi.clone();
    }

    match &args.overrides {
        Some(path) => load_overrides(path, args.at),
        None => Ok(PredictionOverrides::default()),
    }
}

fn print_route(path: &PathResult) {
    println!("Least-polluted route (total weight {:.1}):", path.total_weight);
    println!("{}", format_path(path));
}
