//! Streamflow forecast command-line front end.
//!
//! Runs one endpoint per invocation and writes its body to stdout, or CSV
//! attachments into `--output-dir`.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use forecast_api::config::ApiConfig;
use forecast_api::handlers;
use forecast_api::params::QueryParams;
use forecast_api::response::{ApiResponse, Body};
use forecast_api::state::AppState;
use forecast_protocol::tabular;
use hydro_common::Precision;

/// Streamflow forecast service
#[derive(Parser, Debug)]
#[command(name = "forecast-api")]
#[command(about = "Ensemble streamflow forecast statistics, records and warnings")]
struct Args {
    /// Root of the forecast data tree
    #[arg(long, env = "FORECAST_DATA_ROOT")]
    data_root: Option<PathBuf>,

    /// Decimal places in output values
    #[arg(long, env = "FORECAST_PRECISION")]
    precision: Option<u32>,

    /// Year of the forecast record files
    #[arg(long, env = "FORECAST_RECORD_YEAR")]
    record_year: Option<i32>,

    /// YAML region table replacing the built-in one
    #[arg(long, env = "FORECAST_REGIONS_FILE")]
    regions_file: Option<PathBuf>,

    /// Directory for CSV attachments (stdout when omitted)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "warn", env = "RUST_LOG")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

/// Reach given directly or by coordinates.
#[derive(ClapArgs, Debug)]
struct ReachArgs {
    #[arg(long)]
    reach_id: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    lat: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    lon: Option<String>,
}

#[derive(ClapArgs, Debug)]
struct OutputArgs {
    /// cms or cfs
    #[arg(long, default_value = "cms")]
    units: String,

    /// csv, json or df
    #[arg(long, default_value = "csv")]
    return_format: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ensemble statistics of one forecast
    ForecastStats {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = "latest")]
        date: String,
    },
    /// Mean of the perturbed members
    Forecast {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = "latest")]
        date: String,
    },
    /// Individual ensemble members
    ForecastEnsembles {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = "latest")]
        date: String,
        /// Members such as `1-10,52` or `all`
        #[arg(long, default_value = "all")]
        ensemble: String,
    },
    /// Forecast records between two dates
    ForecastRecords {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long)]
        start_date: String,
        #[arg(long)]
        end_date: String,
    },
    /// Mean forecast against daily averages
    ForecastAnomalies {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long, default_value = "latest")]
        date: String,
    },
    /// Reaches exceeding return periods
    ForecastWarnings {
        #[arg(long, default_value = "latest")]
        date: String,
        #[arg(long, default_value = "csv")]
        return_format: String,
    },
    /// Stats, recent records and return periods together
    Hydroviewer {
        #[command(flatten)]
        reach: ReachArgs,
        #[command(flatten)]
        output: OutputArgs,
        #[arg(long)]
        start_date: String,
        #[arg(long, default_value = "latest")]
        date: String,
    },
    /// Issue dates on disk
    AvailableDates {
        #[arg(long)]
        region: Option<String>,
    },
    /// Nearest reach to a point
    GetReachId {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
    /// WaterOneFlow GetValues document
    GetValues {
        #[arg(long)]
        location: String,
        #[arg(long)]
        variable: String,
        #[arg(long)]
        start_date: Option<String>,
        #[arg(long)]
        end_date: Option<String>,
    },
}

fn push_reach(params: QueryParams, reach: ReachArgs) -> QueryParams {
    [("reach_id", reach.reach_id), ("lat", reach.lat), ("lon", reach.lon)]
        .into_iter()
        .fold(params, |p, (key, value)| match value {
            Some(v) => p.with(key, v),
            None => p,
        })
}

fn push_output(params: QueryParams, output: OutputArgs) -> QueryParams {
    params
        .with("units", output.units)
        .with("return_format", output.return_format)
}

impl Command {
    /// Route name and query parameters for this command.
    fn into_request(self) -> (&'static str, QueryParams) {
        let params = QueryParams::new();
        match self {
            Command::ForecastStats { reach, output, date } => (
                "ForecastStats",
                push_output(push_reach(params, reach), output).with("date", date),
            ),
            Command::Forecast { reach, output, date } => (
                "Forecast",
                push_output(push_reach(params, reach), output).with("date", date),
            ),
            Command::ForecastEnsembles {
                reach,
                output,
                date,
                ensemble,
            } => (
                "ForecastEnsembles",
                push_output(push_reach(params, reach), output)
                    .with("date", date)
                    .with("ensemble", ensemble),
            ),
            Command::ForecastRecords {
                reach,
                output,
                start_date,
                end_date,
            } => (
                "ForecastRecords",
                push_output(push_reach(params, reach), output)
                    .with("start_date", start_date)
                    .with("end_date", end_date),
            ),
            Command::ForecastAnomalies { reach, output, date } => (
                "ForecastAnomalies",
                push_output(push_reach(params, reach), output).with("date", date),
            ),
            Command::ForecastWarnings { date, return_format } => (
                "ForecastWarnings",
                params.with("date", date).with("return_format", return_format),
            ),
            Command::Hydroviewer {
                reach,
                output,
                start_date,
                date,
            } => (
                "HydroViewer",
                push_output(push_reach(params, reach), output)
                    .with("start_date", start_date)
                    .with("date", date),
            ),
            Command::AvailableDates { region } => (
                "AvailableDates",
                match region {
                    Some(r) => params.with("region", r),
                    None => params,
                },
            ),
            Command::GetReachId { lat, lon } => ("GetReachID", params.with("lat", lat).with("lon", lon)),
            Command::GetValues {
                location,
                variable,
                start_date,
                end_date,
            } => {
                let params = params.with("location", location).with("variable", variable);
                let params = match start_date {
                    Some(s) => params.with("startDate", s),
                    None => params,
                };
                let params = match end_date {
                    Some(e) => params.with("endDate", e),
                    None => params,
                };
                ("wof/GetValues", params)
            }
        }
    }
}

fn build_config(args: &Args) -> Result<ApiConfig> {
    let mut config = ApiConfig::from_env().context("Failed to load configuration from environment")?;

    if let Some(root) = &args.data_root {
        config.store.data_root = root.clone();
    }
    if let Some(decimals) = args.precision {
        config.precision = Precision::new(decimals);
    }
    if let Some(year) = args.record_year {
        config.store.record_year = year;
    }
    if let Some(path) = &args.regions_file {
        config = config.with_regions_file(path)?;
    }

    Ok(config)
}

/// Write a successful response body.
fn emit(response: ApiResponse, output_dir: Option<&PathBuf>) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match response.body {
        Body::Csv(attachment) => match output_dir {
            Some(dir) => {
                std::fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;
                let path = dir.join(&attachment.filename);
                std::fs::write(&path, attachment.body).with_context(|| format!("Failed to write {:?}", path))?;
                info!(path = %path.display(), "Wrote attachment");
                writeln!(out, "{}", path.display())?;
            }
            None => out.write_all(attachment.body.as_bytes())?,
        },
        Body::Json(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
        Body::Xml(document) => writeln!(out, "{}", document)?,
        Body::Table(table) => out.write_all(tabular::table_csv(&table)?.as_bytes())?,
        Body::Warnings(table) => out.write_all(tabular::warnings_csv(&table)?.as_bytes())?,
    }

    Ok(())
}

fn run(args: Args) -> Result<ExitCode> {
    let config = build_config(&args)?;
    let state = AppState::new(config)?;

    let output_dir = args.output_dir.clone();
    let (route, params) = args.command.into_request();
    let response = handlers::dispatch(&state, route, &params);

    if response.is_success() {
        emit(response, output_dir.as_ref())?;
        Ok(ExitCode::SUCCESS)
    } else {
        let body = match &response.body {
            Body::Json(value) => value.to_string(),
            _ => format!("{{\"status\": {}}}", response.status),
        };
        eprintln!("{}", body);
        Ok(ExitCode::FAILURE)
    }
}

fn main() -> ExitCode {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .json()
        .init();

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{:#}", e);
            eprintln!("{}", serde_json::json!({ "error": format!("{:#}", e) }));
            ExitCode::FAILURE
        }
    }
}
