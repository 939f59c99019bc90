use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use riskmap::{
    ApiClient, DisasterClient, DisasterRecord, ResultBoard, RiskAssessment, RiskMapConfig,
    RiskMapError, RiskPipeline, RiskReport, WeatherFetchAdapter, WeatherObservation, logging,
};

/// Disaster risk prediction for a map location
#[derive(Parser, Debug)]
#[command(name = "riskmap", version)]
#[command(about = "Disaster risk prediction for a map location", long_about = None)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Weather and disaster prediction for a coordinate
    Predict {
        /// Latitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        /// Longitude in decimal degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
    /// Prediction from explicit weather readings, as carried by a details link
    Details {
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        #[arg(long, allow_hyphen_values = true)]
        lng: Option<String>,
        /// Temperature in °C
        #[arg(long, allow_hyphen_values = true)]
        temp: Option<String>,
        /// Station pressure in hPa
        #[arg(long)]
        pressure: Option<String>,
        /// Relative humidity in percent
        #[arg(long)]
        humidity: Option<String>,
        /// Wind speed in m/s
        #[arg(long)]
        wind_speed: Option<String>,
    },
    /// Current weather for a coordinate
    Weather {
        #[arg(long, allow_hyphen_values = true)]
        lat: String,
        #[arg(long, allow_hyphen_values = true)]
        lon: String,
    },
    /// Historical disaster records
    Disasters {
        #[command(subcommand)]
        action: DisasterAction,
    },
}

#[derive(Subcommand, Debug)]
enum DisasterAction {
    /// List all records
    List,
    /// Show one record
    Show { id: i64 },
    /// Create a record from a JSON file
    Create {
        #[arg(long)]
        file: PathBuf,
    },
    /// Replace a record with the contents of a JSON file
    Update {
        id: i64,
        #[arg(long)]
        file: PathBuf,
    },
    /// Delete a record
    Delete { id: i64 },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<ExitCode> {
    let config = RiskMapConfig::load_from_path(args.config.clone())?;
    logging::init(&config.logging, args.verbose)?;
    tracing::debug!("Using service at {}", config.service.base_url);

    match args.command {
        Command::Predict { lat, lon } => predict(&config, &lat, &lon).await,
        Command::Details {
            lat,
            lng,
            temp,
            pressure,
            humidity,
            wind_speed,
        } => {
            let params: HashMap<String, String> = [
                ("lat", lat),
                ("lng", lng),
                ("temp", temp),
                ("pressure", pressure),
                ("humidity", humidity),
                ("wind_speed", wind_speed),
            ]
            .into_iter()
            .filter_map(|(name, value)| value.map(|value| (name.to_string(), value)))
            .collect();
            details(&config, &params).await
        }
        Command::Weather { lat, lon } => weather(&config, &lat, &lon).await,
        Command::Disasters { action } => disasters(&config, action).await,
    }
}

async fn predict(config: &RiskMapConfig, lat: &str, lon: &str) -> Result<ExitCode> {
    let pipeline = RiskPipeline::from_config(&config.service)?;
    let board = ResultBoard::new();
    let mut display = board.subscribe();

    pipeline.submit(&board, lat, lon).await;

    display
        .changed()
        .await
        .context("Pipeline finished without publishing a result")?;
    let Some(outcome) = display.borrow_and_update().clone() else {
        return Ok(ExitCode::FAILURE);
    };

    match &outcome.report {
        Ok(report) => Ok(print_report(report)),
        Err(e) => Ok(report_failure(e)),
    }
}

async fn details(config: &RiskMapConfig, params: &HashMap<String, String>) -> Result<ExitCode> {
    let pipeline = RiskPipeline::from_config(&config.service)?;

    match pipeline.assess_query(params).await {
        Ok(assessment) => {
            print_assessment(&assessment);
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => Ok(report_failure(&e)),
    }
}

async fn weather(config: &RiskMapConfig, lat: &str, lon: &str) -> Result<ExitCode> {
    let coordinate = match riskmap::Coordinate::validate(lat, lon) {
        Ok(coordinate) => coordinate,
        Err(e) => return Ok(report_failure(&e)),
    };

    let adapter = WeatherFetchAdapter::new(ApiClient::new(&config.service)?);
    let observation = adapter.fetch(&coordinate).await;
    println!("📍 {}", coordinate.format_coordinates());
    print_weather(&observation);
    Ok(ExitCode::SUCCESS)
}

async fn disasters(config: &RiskMapConfig, action: DisasterAction) -> Result<ExitCode> {
    let client = DisasterClient::new(ApiClient::new(&config.service)?);

    match action {
        DisasterAction::List => {
            let records = client.list().await?;
            if records.is_empty() {
                println!("No disaster records");
            }
            for record in &records {
                println!("{}", record.summary());
            }
        }
        DisasterAction::Show { id } => {
            let record = client.get(id).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        DisasterAction::Create { file } => {
            let record = read_record(&file)?;
            let created = client.create(&record).await?;
            println!("Created {}", created.summary());
        }
        DisasterAction::Update { id, file } => {
            let record = read_record(&file)?;
            let updated = client.update(id, &record).await?;
            println!("Updated {}", updated.summary());
        }
        DisasterAction::Delete { id } => {
            client.delete(id).await?;
            println!("Deleted #{id}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn read_record(path: &Path) -> Result<DisasterRecord> {
    DisasterRecord::from_json_file(path)
        .with_context(|| format!("Failed to load disaster record from {}", path.display()))
}

/// Print the user-facing message; input errors exit with a usage code
fn report_failure(error: &RiskMapError) -> ExitCode {
    eprintln!("{}", error.user_message());
    if error.is_input_error() {
        ExitCode::from(2)
    } else {
        ExitCode::FAILURE
    }
}

fn print_weather(observation: &WeatherObservation) {
    if observation.is_fallback() {
        println!("⚠️  Weather service unavailable, showing defaults");
    }
    println!("   Temperature:        {}", observation.format_temperature());
    println!("   Pressure:           {}", observation.format_pressure());
    println!("   Humidity:           {}", observation.format_humidity());
    println!("   Sea level pressure: {}", observation.format_sea_level_pressure());
    println!("   Wind speed:         {}", observation.format_wind());
}

fn print_report(report: &RiskReport) -> ExitCode {
    println!("📍 {}", report.coordinate.format_coordinates());
    print_weather(&report.weather);
    println!();

    match &report.assessment {
        Ok(assessment) => {
            print_assessment(assessment);
            ExitCode::SUCCESS
        }
        Err(e) => report_failure(e),
    }
}

fn print_assessment(assessment: &RiskAssessment) {
    println!("🌪️  {}", assessment.result.disaster_type);
    println!("   Predicted deaths:    {}", assessment.predicted_deaths);
    println!("   Infrastructure loss: {}", assessment.infrastructure_loss);
    println!(
        "   Severity:            {} ({})",
        assessment.band.label(),
        assessment.severity_percent
    );
}
