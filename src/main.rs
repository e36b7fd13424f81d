use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use aqi_locator::{
    AqiCategory, AqiConfig, ConsoleSink, LocationAirQualityWidget, WaqiClient, geolocation,
    logging, waqi, widget,
};
use clap::{ArgAction, Parser};
use tracing::debug;

#[derive(Parser)]
#[command(name = "aqi-locator", version)]
#[command(about = "Fetch live air-quality readings for the current location")]
struct Cli {
    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Latitude in decimal degrees
    #[arg(long, requires = "lon", allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Longitude in decimal degrees
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Estimate the position from the public IP address
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    ip: bool,
    /// Print the fields as a JSON object
    #[arg(long, default_value_t = false)]
    json: bool,
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Command-line position flags win over the configured provider
    fn apply_overrides(&self, config: &mut AqiConfig) {
        if let (Some(lat), Some(lon)) = (self.lat, self.lon) {
            config.geolocation.provider = "fixed".to_string();
            config.geolocation.latitude = Some(lat);
            config.geolocation.longitude = Some(lon);
        } else if self.ip {
            config.geolocation.provider = "ip".to_string();
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let mut config = AqiConfig::load_from_path(cli.config.clone())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    logging::init(&config.logging, cli.verbose)?;
    debug!(
        "Using config from: {}",
        cli.config
            .clone()
            .or_else(AqiConfig::get_config_path)
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "environment only".to_string())
    );

    let client = waqi::build_http_client(config.service.timeout_seconds)?;
    let source = WaqiClient::from_config(&config.service, client.clone())
        .context("Cannot query the air-quality service")?;
    let provider = geolocation::from_config(&config.geolocation, client);

    let sink = ConsoleSink { json: cli.json };
    let widget = LocationAirQualityWidget::new(
        Arc::from(provider),
        Arc::new(source),
        Arc::new(sink),
    );

    match widget.try_refresh().await {
        Ok(outcome) => {
            if let (Some(aqi), false) = (outcome.reading.aqi, cli.json) {
                let category = AqiCategory::from_aqi(aqi);
                println!();
                println!("AQI {aqi} ({category})");
                println!("{}", category.health_implications());
                println!("Caution: {}", category.cautionary_statement());
            }
            Ok(true)
        }
        Err(e) => {
            widget::log_failure(&e);
            eprintln!("{}", e.user_message());
            Ok(false)
        }
    }
}
