use crate::error::{AgriError, Result};
use crate::logic::rules::engine::default_crops;
use crate::logic::rules::irrigation::STANDARD_ID;
use crate::logic::thresholds::{CropProfile, FertilizationPolicy, IrrigationVolumes, Thresholds};
use dialoguer::{Input, Select};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub thresholds: Thresholds,
    #[serde(default)]
    pub irrigation: IrrigationVolumes,
    #[serde(default)]
    pub fertilization: FertilizationPolicy,
    /// Readings passed to the engine as history, newest first
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Crop strategy used when `recommend` is run without `--crop`
    #[serde(default)]
    pub default_crop: Option<String>,
    #[serde(default = "default_crops")]
    pub crops: BTreeMap<String, CropProfile>,
}

fn default_history_limit() -> usize {
    30
}

impl Config {
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p.clone(),
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(AgriError::Config(format!(
                "Config file not found at {:?}. Run `agriops init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| AgriError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml(&config_str)?;
        tracing::debug!(path = %config_path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Parse and validate a YAML document, substituting `${VAR}` references first.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| AgriError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        self.irrigation.validate()?;
        self.fertilization.validate()?;

        if self.history_limit == 0 {
            return Err(AgriError::Config(
                "history_limit must be greater than zero".into(),
            ));
        }

        for (key, profile) in &self.crops {
            if key.trim().is_empty() {
                return Err(AgriError::Config("crop keys must not be empty".into()));
            }
            if key.trim().eq_ignore_ascii_case(STANDARD_ID) {
                return Err(AgriError::Config(format!(
                    "crops.{}: '{}' is reserved for the standard irrigation ladder",
                    key, STANDARD_ID
                )));
            }
            profile.validate(key)?;
        }

        if let Some(ref crop) = self.default_crop {
            let known = crop.eq_ignore_ascii_case(STANDARD_ID)
                || self.crops.keys().any(|k| k.eq_ignore_ascii_case(crop));
            if !known {
                return Err(AgriError::Config(format!(
                    "default_crop '{}' is not a configured crop",
                    crop
                )));
            }
        }

        Ok(())
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("agriops").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Default path for writing new config files (~/.config/agriops/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| AgriError::Config("Cannot determine config directory".into()))?
            .join("agriops");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the written Config and the path it was written to.
    pub fn setup_interactive(target: Option<&PathBuf>) -> Result<(Self, PathBuf)> {
        let defaults = Config::default();

        println!();
        println!("Let's set up agriops!");
        println!();

        println!("Soil moisture thresholds (%)");
        let critical: f64 = prompt_number("  Critical (water immediately below)", 20.0)?;
        let low: f64 = prompt_number("  Low (water below)", 40.0)?;
        let high: f64 = prompt_number("  High (stop watering above)", 70.0)?;

        println!();
        println!("Temperature thresholds (°C)");
        let heat: f64 = prompt_number("  Heat stress above", 35.0)?;
        let cold: f64 = prompt_number("  Cold stress below", 10.0)?;

        println!();
        println!("Humidity thresholds (%)");
        let humidity_low: f64 = prompt_number("  Low humidity below", 40.0)?;

        println!();
        let mut choices: Vec<String> = vec!["standard".into()];
        choices.extend(defaults.crops.keys().cloned());
        let selected = Select::new()
            .with_prompt("Default crop strategy")
            .items(&choices)
            .default(0)
            .interact()
            .map_err(|e| AgriError::Config(format!("Input error: {}", e)))?;
        let default_crop = match selected {
            0 => None,
            i => Some(choices[i].clone()),
        };

        let config = Config {
            thresholds: Thresholds {
                soil_moisture_critical: critical,
                soil_moisture_low: low,
                soil_moisture_high: high,
                temp_heat_stress: heat,
                temp_cold_stress: cold,
                humidity_low,
                ..defaults.thresholds.clone()
            },
            default_crop,
            ..defaults
        };
        config.validate()?;

        let config_path = match target {
            Some(p) => p.clone(),
            None => Self::default_config_path()?,
        };
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| AgriError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# agriops configuration\n# Generated by `agriops init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!();
        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("AGRIOPS_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| AgriError::Config("Cannot determine data directory".into()))?
            .join("agriops");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("agriops.db"))
    }
}

fn prompt_number(prompt: &str, default: f64) -> Result<f64> {
    Input::new()
        .with_prompt(prompt)
        .default(default)
        .interact_text()
        .map_err(|e| AgriError::Config(format!("Input error: {}", e)))
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            irrigation: IrrigationVolumes::default(),
            fertilization: FertilizationPolicy::default(),
            history_limit: default_history_limit(),
            default_crop: None,
            crops: default_crops(),
        }
    }
}
