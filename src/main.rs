mod cli;
mod config;
mod db;
mod error;
mod logic;
mod models;
mod report;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use config::Config;
use db::Database;
use error::AgriError;
use logic::DecisionEngine;
use models::NewReading;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Commands::Init = cli.command {
        Config::setup_interactive(cli.config.as_ref())?;
        return Ok(());
    }

    let config = match Config::load(cli.config.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };
    let engine = DecisionEngine::from_config(&config).context("invalid engine configuration")?;

    let db_path = Config::db_path(cli.data_dir.as_ref())?;
    let db = Database::open(db_path.clone())
        .with_context(|| format!("failed to open database at {}", db_path.display()))?;

    run(cli.command, &config, &engine, &db)
}

fn run(
    command: Commands,
    config: &Config,
    engine: &DecisionEngine,
    db: &Database,
) -> anyhow::Result<()> {
    match command {
        Commands::Init => unreachable!("init is handled before configuration is loaded"),
        Commands::Check => {
            println!("Configuration OK");
            println!("  Database: {}", db.path().display());
            let t = engine.thresholds();
            println!(
                "  Soil moisture: critical <{}%, water <{}%, stop >{}%",
                t.soil_moisture_critical, t.soil_moisture_low, t.soil_moisture_high
            );
            println!(
                "  Temperature: drought >{}°C, heat >{}°C, cold <{}°C",
                t.temp_drought, t.temp_heat_stress, t.temp_cold_stress
            );
            println!(
                "  Humidity: overwatering >{}%, low <{}%",
                t.humidity_overwatering, t.humidity_low
            );
            println!("  History window: {} readings", config.history_limit);
            println!("  Irrigation strategies:");
            for (id, name) in engine.registry().list() {
                let marker = match config.default_crop {
                    Some(ref crop) if crop.eq_ignore_ascii_case(id) => " (default)",
                    None if id == "standard" => " (default)",
                    _ => "",
                };
                println!("    {:<12} {}{}", id, name, marker);
            }
        }
        Commands::Ingest {
            sensor_id,
            moisture,
            temperature,
            humidity,
            timestamp,
        } => {
            let reading = NewReading {
                sensor_id,
                soil_moisture: moisture,
                temperature_c: temperature,
                humidity,
                timestamp,
            }
            .validate(chrono::Utc::now())?;

            let id = db.save_reading(&reading)?;
            tracing::info!(id, sensor_id = %reading.sensor_id, "Reading stored");
            println!("Stored reading #{} for {}", id, reading.sensor_id);
        }
        Commands::Recommend {
            sensor_id,
            crop,
            json,
            no_save,
        } => {
            let reading = db.latest_reading(&sensor_id)?.ok_or_else(|| {
                AgriError::NotFound(format!("no readings for sensor '{}'", sensor_id))
            })?;
            let history = db.reading_history(&sensor_id, config.history_limit)?;

            let rec = match crop.as_deref().or(config.default_crop.as_deref()) {
                Some(crop) => engine.generate_for_crop(crop, &reading, &history)?,
                None => engine.generate_recommendation(&reading, &history)?,
            };

            if !no_save {
                let id = db.append_recommendation(&sensor_id, &rec)?;
                tracing::info!(id, sensor_id = %sensor_id, "Recommendation recorded");
            }

            if json {
                println!("{}", serde_json::to_string_pretty(&rec)?);
            } else {
                print!("{}", report::recommendation(&rec));
            }
        }
        Commands::History { sensor_id, limit } => {
            let readings = db.reading_history(&sensor_id, limit)?;
            if readings.is_empty() {
                println!("No readings for {}", sensor_id);
            }
            for reading in &readings {
                println!("{}", report::reading_row(reading));
            }
        }
        Commands::Sensors => {
            let sensors = db.list_sensors()?;
            if sensors.is_empty() {
                println!("No sensors have reported yet");
            }
            for reading in &sensors {
                println!("{}", report::reading_row(reading));
            }
        }
        Commands::Audit {
            sensor_id,
            limit,
            json,
        } => {
            let records = db.recommendation_history(&sensor_id, limit)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else if records.is_empty() {
                println!("No recommendations recorded for {}", sensor_id);
            } else {
                for record in &records {
                    println!("{}", report::audit_row(record));
                }
            }
        }
    }

    Ok(())
}
