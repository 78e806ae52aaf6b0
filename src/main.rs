//! CLI entry point for the AQI forecast tool.
//!
//! Provides subcommands for converting PM2.5 readings to AQI, predicting PM2.5
//! with the trained model, summarising historical exports, and fetching the
//! current weather for a location.

use anyhow::Result;
use aqi_forecast::{
    analysis::analyze_history,
    config::Settings,
    fetch::BasicClient,
    model::{Features, ForestModel, Regressor},
    output::{append_record, print_json, write_enriched, write_json},
    prediction::{Assessment, PredictionRecord, assess},
    weather::{Coordinates, OpenWeatherClient, WeatherProvider},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "aqi_forecast")]
#[command(about = "Predict PM2.5, convert it to AQI and analyse air quality trends", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert PM2.5 concentrations (µg/m³) to AQI
    Aqi {
        #[arg(value_name = "PM25", required = true, allow_negative_numbers = true)]
        concentrations: Vec<f64>,
    },
    /// Predict PM2.5 from weather and aerosol measurements
    Predict {
        /// Model artifact (overrides MODEL_PATH)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// JSON file with feature values; flags are ignored when given
        #[arg(long, value_name = "JSON")]
        features_file: Option<PathBuf>,

        /// CSV file to append the prediction to
        #[arg(short, long, default_value = "predictions.csv")]
        output: PathBuf,

        #[command(flatten)]
        features: Features,
    },
    /// Summarise AQI trends from a historical CSV export
    Analyze {
        /// CSV with at least `datetime` and `pm2p5` columns
        #[arg(value_name = "CSV")]
        input: PathBuf,

        /// Where to write the JSON trend report
        #[arg(short, long)]
        report: Option<PathBuf>,

        /// Where to write the input rows with year, month and AQI columns
        #[arg(short, long)]
        enriched: Option<PathBuf>,
    },
    /// Fetch current weather conditions from OpenWeatherMap
    Weather {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/aqi_forecast.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("aqi_forecast.log"));

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
    let settings = Settings::from_env()?;

    match cli.command {
        Commands::Aqi { concentrations } => {
            for pm25 in concentrations {
                match assess(pm25) {
                    Ok(a) => report_assessment(&a, false),
                    Err(e) => warn!(pm25, error = %e, "AQI undefined"),
                }
            }
        }
        Commands::Predict {
            model,
            features_file,
            output,
            features,
        } => {
            let features = match features_file {
                Some(path) => Features::load(&path)?,
                None => features,
            };
            let model_path = model.unwrap_or(settings.model_path);
            predict(&model_path, &features, &output)?;
        }
        Commands::Analyze {
            input,
            report,
            enriched,
        } => {
            let (scored, trends) = analyze_history(&input)?;

            if let Some(path) = enriched {
                write_enriched(&path, &scored)?;
                info!(path = %path.display(), "Enriched CSV written");
            }
            match report {
                Some(path) => {
                    write_json(&path, &trends)?;
                    info!(path = %path.display(), "Trend report written");
                }
                None => print_json(&trends)?,
            }
        }
        Commands::Weather { lat, lon } => {
            let coords = Coordinates::new(lat, lon)?;
            let client = OpenWeatherClient::new(
                BasicClient::new(settings.http_timeout)?,
                settings.require_api_key()?.to_string(),
                &settings.openweather_url,
                settings.local_offset,
            )?;

            let report = client.current(coords).await?;
            info!(
                location = %report.location,
                condition = %report.description,
                temperature_c = %format!("{:.2}", report.temperature_c),
                humidity_pct = report.humidity_pct,
                wind_speed_mps = report.wind_speed_mps,
                wind_deg = report.wind_deg,
                visibility_m = ?report.visibility_m,
                sunrise = %report.sunrise_local(),
                sunset = %report.sunset_local(),
                "Current weather"
            );
        }
    }

    Ok(())
}

/// Runs the model, reports the AQI outcome and appends it to the prediction log.
#[tracing::instrument(skip_all, fields(model = %model_path.display(), output = %output.display()))]
fn predict(model_path: &Path, features: &Features, output: &Path) -> Result<()> {
    let model = ForestModel::load(model_path)?;
    let pm25 = model.predict(features)?;
    info!(predicted_pm25 = %format!("{:.2}", pm25), "Prediction complete");

    let outcome = assess(pm25);
    match &outcome {
        Ok(a) => report_assessment(a, true),
        Err(e) => error!(error = %e, "AQI undefined for predicted PM2.5"),
    }

    append_record(output, &PredictionRecord::from_outcome(pm25, &outcome))
}

fn report_assessment(a: &Assessment, with_recommendation: bool) {
    info!(
        pm25 = a.pm25,
        aqi = a.aqi.value(),
        category = %a.category,
        warning = a.warning.color(),
        "{}",
        a.warning.message()
    );
    if with_recommendation {
        info!("Health recommendation:\n{}", a.recommendation.to_text());
    }
}
