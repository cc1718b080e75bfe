use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agriops",
    version,
    about = "Irrigation and fertilization recommendations from soil sensor data"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run interactive setup and write config.yaml
    Init,
    /// Validate config and open the database
    Check,
    /// Record a sensor reading
    Ingest {
        sensor_id: String,
        /// Soil moisture, percent
        #[arg(short, long)]
        moisture: f64,
        /// Temperature, °C
        #[arg(short, long, allow_negative_numbers = true)]
        temperature: f64,
        /// Relative humidity, percent
        #[arg(long)]
        humidity: f64,
        /// RFC 3339 timestamp (defaults to now)
        #[arg(long)]
        timestamp: Option<DateTime<Utc>>,
    },
    /// Generate a recommendation from the latest reading
    Recommend {
        sensor_id: String,
        /// Crop strategy (overrides default_crop)
        #[arg(long)]
        crop: Option<String>,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Don't append the result to the audit trail
        #[arg(long)]
        no_save: bool,
    },
    /// Show recent readings for a sensor
    History {
        sensor_id: String,
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// List sensors with their latest reading
    Sensors,
    /// Show previously generated recommendations
    Audit {
        sensor_id: String,
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_ingest_with_negative_temperature() {
        let cli = Cli::try_parse_from([
            "agriops",
            "ingest",
            "FIELD_01",
            "--moisture",
            "35",
            "--temperature",
            "-4.5",
            "--humidity",
            "60",
        ])
        .unwrap();
        match cli.command {
            Commands::Ingest {
                sensor_id,
                temperature,
                timestamp,
                ..
            } => {
                assert_eq!(sensor_id, "FIELD_01");
                assert_eq!(temperature, -4.5);
                assert!(timestamp.is_none());
            }
            _ => panic!("expected ingest"),
        }
    }

    #[test]
    fn parses_recommend_flags() {
        let cli =
            Cli::try_parse_from(["agriops", "-vv", "recommend", "S1", "--crop", "tomato", "--json"])
                .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Recommend {
                crop, json, no_save, ..
            } => {
                assert_eq!(crop.as_deref(), Some("tomato"));
                assert!(json);
                assert!(!no_save);
            }
            _ => panic!("expected recommend"),
        }
    }
}
