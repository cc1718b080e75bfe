use crate::error::{AgriError, Result};
use crate::models::TEMPERATURE_RANGE_C;
use serde::{Deserialize, Serialize};

/// Upper bounds on configured quantities. Together they keep every computed
/// watering volume far below `u64::MAX` milliliters.
pub const MAX_VOLUME_ML: u64 = 1_000_000_000_000;
pub const MAX_PLOT_AREA_M2: f64 = 1_000_000.0;
pub const MAX_ROOT_DEPTH_M: f64 = 10.0;
pub const MAX_SURCHARGE_PER_DEGREE: f64 = 1.0;

/// Agronomic bounds shared by every evaluator.
///
/// Every field is required when loaded from YAML: a threshold file that omits
/// one is a configuration error, not a silent default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub soil_moisture_critical: f64,
    pub soil_moisture_low: f64,
    pub soil_moisture_high: f64,
    /// Temperature above which critically dry soil raises a drought alert.
    pub temp_drought: f64,
    pub temp_heat_stress: f64,
    pub temp_cold_stress: f64,
    /// Humidity above which saturated soil raises an overwatering alert.
    pub humidity_overwatering: f64,
    pub humidity_low: f64,
    /// Moisture points between the recent and older window averages before
    /// the trend stops being "stable".
    pub trend_delta: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            soil_moisture_critical: 20.0,
            soil_moisture_low: 40.0,
            soil_moisture_high: 70.0,
            temp_drought: 30.0,
            temp_heat_stress: 35.0,
            temp_cold_stress: 10.0,
            humidity_overwatering: 80.0,
            humidity_low: 40.0,
            trend_delta: 5.0,
        }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("soil_moisture_critical", self.soil_moisture_critical),
            ("soil_moisture_low", self.soil_moisture_low),
            ("soil_moisture_high", self.soil_moisture_high),
            ("temp_drought", self.temp_drought),
            ("temp_heat_stress", self.temp_heat_stress),
            ("temp_cold_stress", self.temp_cold_stress),
            ("humidity_overwatering", self.humidity_overwatering),
            ("humidity_low", self.humidity_low),
            ("trend_delta", self.trend_delta),
        ] {
            require_finite("thresholds", name, value)?;
        }

        for (name, value) in [
            ("soil_moisture_critical", self.soil_moisture_critical),
            ("soil_moisture_high", self.soil_moisture_high),
            ("humidity_overwatering", self.humidity_overwatering),
            ("humidity_low", self.humidity_low),
        ] {
            require_percent("thresholds", name, value)?;
        }

        if self.soil_moisture_critical >= self.soil_moisture_low {
            return Err(AgriError::Config(format!(
                "thresholds: soil_moisture_critical ({}) must be below soil_moisture_low ({})",
                self.soil_moisture_critical, self.soil_moisture_low
            )));
        }
        if self.soil_moisture_low > self.soil_moisture_high {
            return Err(AgriError::Config(format!(
                "thresholds: soil_moisture_low ({}) must not exceed soil_moisture_high ({})",
                self.soil_moisture_low, self.soil_moisture_high
            )));
        }
        if self.temp_cold_stress >= self.temp_heat_stress {
            return Err(AgriError::Config(format!(
                "thresholds: temp_cold_stress ({}) must be below temp_heat_stress ({})",
                self.temp_cold_stress, self.temp_heat_stress
            )));
        }
        if self.trend_delta < 0.0 {
            return Err(AgriError::Config(
                "thresholds: trend_delta must not be negative".into(),
            ));
        }
        Ok(())
    }
}

/// Volumes used by the standard irrigation ladder, in milliliters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IrrigationVolumes {
    pub critical_volume_ml: u64,
    pub base_volume_ml: u64,
    /// Temperature (°C) above which the base volume gets a surcharge.
    pub surcharge_base_temp: f64,
    /// Fractional surcharge per degree above `surcharge_base_temp`. Uncapped.
    pub surcharge_per_degree: f64,
}

impl Default for IrrigationVolumes {
    fn default() -> Self {
        Self {
            critical_volume_ml: 5000,
            base_volume_ml: 3000,
            surcharge_base_temp: 25.0,
            surcharge_per_degree: 0.05,
        }
    }
}

impl IrrigationVolumes {
    pub fn validate(&self) -> Result<()> {
        if self.critical_volume_ml == 0 || self.base_volume_ml == 0 {
            return Err(AgriError::Config(
                "irrigation: watering volumes must be greater than zero".into(),
            ));
        }
        if self.critical_volume_ml > MAX_VOLUME_ML || self.base_volume_ml > MAX_VOLUME_ML {
            return Err(AgriError::Config(format!(
                "irrigation: watering volumes must not exceed {} mL",
                MAX_VOLUME_ML
            )));
        }
        require_finite("irrigation", "surcharge_base_temp", self.surcharge_base_temp)?;
        require_finite("irrigation", "surcharge_per_degree", self.surcharge_per_degree)?;
        require_surcharge("irrigation", self.surcharge_base_temp, self.surcharge_per_degree)
    }
}

/// Fertilization schedule.
///
/// `interval_readings` is compared against the number of history entries,
/// which stands in for elapsed days. It only approximates calendar time when
/// sensors report about once a day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FertilizationPolicy {
    pub interval_readings: usize,
    pub fertilizer_type: String,
    pub amount_kg: f64,
}

impl Default for FertilizationPolicy {
    fn default() -> Self {
        Self {
            interval_readings: 14,
            fertilizer_type: "balanced_NPK".into(),
            amount_kg: 2.5,
        }
    }
}

impl FertilizationPolicy {
    pub fn validate(&self) -> Result<()> {
        require_finite("fertilization", "amount_kg", self.amount_kg)?;
        if self.amount_kg <= 0.0 {
            return Err(AgriError::Config(
                "fertilization: amount_kg must be greater than zero".into(),
            ));
        }
        if self.fertilizer_type.trim().is_empty() {
            return Err(AgriError::Config(
                "fertilization: fertilizer_type must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Crop-specific moisture band and plot geometry for deficit-based irrigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropProfile {
    pub name: String,
    pub soil_moisture_critical: f64,
    pub soil_moisture_low: f64,
    pub soil_moisture_optimal_min: f64,
    pub soil_moisture_optimal_max: f64,
    pub soil_moisture_excess: f64,
    #[serde(default = "default_plot_area")]
    pub plot_area_m2: f64,
    #[serde(default = "default_root_depth")]
    pub root_depth_m: f64,
    #[serde(default = "default_crop_surcharge_base")]
    pub surcharge_base_temp: f64,
    #[serde(default = "default_crop_surcharge")]
    pub surcharge_per_degree: f64,
}

fn default_plot_area() -> f64 {
    100.0
}

fn default_root_depth() -> f64 {
    0.3
}

fn default_crop_surcharge_base() -> f64 {
    25.0
}

fn default_crop_surcharge() -> f64 {
    0.02
}

impl CropProfile {
    pub fn tomato() -> Self {
        Self {
            name: "Tomato".into(),
            soil_moisture_critical: 20.0,
            soil_moisture_low: 40.0,
            soil_moisture_optimal_min: 60.0,
            soil_moisture_optimal_max: 80.0,
            soil_moisture_excess: 85.0,
            plot_area_m2: default_plot_area(),
            root_depth_m: default_root_depth(),
            surcharge_base_temp: default_crop_surcharge_base(),
            surcharge_per_degree: default_crop_surcharge(),
        }
    }

    pub fn lettuce() -> Self {
        Self {
            name: "Lettuce".into(),
            soil_moisture_critical: 20.0,
            soil_moisture_low: 50.0,
            soil_moisture_optimal_min: 70.0,
            soil_moisture_optimal_max: 85.0,
            soil_moisture_excess: 90.0,
            plot_area_m2: default_plot_area(),
            root_depth_m: default_root_depth(),
            surcharge_base_temp: default_crop_surcharge_base(),
            surcharge_per_degree: default_crop_surcharge(),
        }
    }

    pub fn validate(&self, key: &str) -> Result<()> {
        let section = format!("crops.{}", key);
        for (name, value) in [
            ("soil_moisture_critical", self.soil_moisture_critical),
            ("soil_moisture_low", self.soil_moisture_low),
            ("soil_moisture_optimal_min", self.soil_moisture_optimal_min),
            ("soil_moisture_optimal_max", self.soil_moisture_optimal_max),
            ("soil_moisture_excess", self.soil_moisture_excess),
        ] {
            require_finite(&section, name, value)?;
            require_percent(&section, name, value)?;
        }
        for (name, value) in [
            ("plot_area_m2", self.plot_area_m2),
            ("root_depth_m", self.root_depth_m),
            ("surcharge_base_temp", self.surcharge_base_temp),
            ("surcharge_per_degree", self.surcharge_per_degree),
        ] {
            require_finite(&section, name, value)?;
        }

        let ordered = self.soil_moisture_critical < self.soil_moisture_low
            && self.soil_moisture_low < self.soil_moisture_optimal_min
            && self.soil_moisture_optimal_min <= self.soil_moisture_optimal_max
            && self.soil_moisture_optimal_max <= self.soil_moisture_excess;
        if !ordered {
            return Err(AgriError::Config(format!(
                "{}: expected critical < low < optimal_min <= optimal_max <= excess",
                section
            )));
        }
        if self.plot_area_m2 <= 0.0 || self.root_depth_m <= 0.0 {
            return Err(AgriError::Config(format!(
                "{}: plot_area_m2 and root_depth_m must be greater than zero",
                section
            )));
        }
        if self.plot_area_m2 > MAX_PLOT_AREA_M2 {
            return Err(AgriError::Config(format!(
                "{}: plot_area_m2 ({}) must not exceed {}",
                section, self.plot_area_m2, MAX_PLOT_AREA_M2
            )));
        }
        if self.root_depth_m > MAX_ROOT_DEPTH_M {
            return Err(AgriError::Config(format!(
                "{}: root_depth_m ({}) must not exceed {}",
                section, self.root_depth_m, MAX_ROOT_DEPTH_M
            )));
        }
        require_surcharge(&section, self.surcharge_base_temp, self.surcharge_per_degree)
    }
}

fn require_finite(section: &str, name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AgriError::Config(format!(
            "{}: {} must be a finite number",
            section, name
        )))
    }
}

fn require_surcharge(section: &str, base_temp: f64, per_degree: f64) -> Result<()> {
    if !TEMPERATURE_RANGE_C.contains(&base_temp) {
        return Err(AgriError::Config(format!(
            "{}: surcharge_base_temp ({}) must be within {}..={} °C",
            section,
            base_temp,
            TEMPERATURE_RANGE_C.start(),
            TEMPERATURE_RANGE_C.end()
        )));
    }
    if !(0.0..=MAX_SURCHARGE_PER_DEGREE).contains(&per_degree) {
        return Err(AgriError::Config(format!(
            "{}: surcharge_per_degree ({}) must be between 0 and {}",
            section, per_degree, MAX_SURCHARGE_PER_DEGREE
        )));
    }
    Ok(())
}

fn require_percent(section: &str, name: &str, value: f64) -> Result<()> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(AgriError::Config(format!(
            "{}: {} ({}) must be between 0 and 100",
            section, name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(IrrigationVolumes::default().validate().is_ok());
        assert!(FertilizationPolicy::default().validate().is_ok());
        assert!(CropProfile::tomato().validate("tomato").is_ok());
        assert!(CropProfile::lettuce().validate("lettuce").is_ok());
    }

    #[test]
    fn critical_must_be_below_low() {
        let t = Thresholds {
            soil_moisture_critical: 40.0,
            ..Thresholds::default()
        };
        assert!(matches!(t.validate(), Err(AgriError::Config(_))));
    }

    #[test]
    fn low_may_equal_high() {
        let t = Thresholds {
            soil_moisture_low: 70.0,
            ..Thresholds::default()
        };
        assert!(t.validate().is_ok());

        let t = Thresholds {
            soil_moisture_low: 71.0,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn non_finite_threshold_rejected() {
        let t = Thresholds {
            temp_drought: f64::NAN,
            ..Thresholds::default()
        };
        let err = t.validate().unwrap_err().to_string();
        assert!(err.contains("temp_drought"));
    }

    #[test]
    fn humidity_outside_percent_rejected() {
        let t = Thresholds {
            humidity_overwatering: 120.0,
            ..Thresholds::default()
        };
        assert!(t.validate().is_err());
    }

    #[test]
    fn zero_volume_rejected() {
        let v = IrrigationVolumes {
            base_volume_ml: 0,
            ..IrrigationVolumes::default()
        };
        assert!(v.validate().is_err());
    }

    #[test]
    fn crop_band_must_be_ordered() {
        let mut crop = CropProfile::tomato();
        crop.soil_moisture_optimal_min = 30.0;
        assert!(crop.validate("tomato").is_err());

        let mut crop = CropProfile::tomato();
        crop.root_depth_m = 0.0;
        assert!(crop.validate("tomato").is_err());
    }

    #[test]
    fn crop_geometry_is_bounded() {
        let mut crop = CropProfile::tomato();
        crop.plot_area_m2 = 1e300;
        let err = crop.validate("tomato").unwrap_err().to_string();
        assert!(err.contains("plot_area_m2"));

        let mut crop = CropProfile::tomato();
        crop.root_depth_m = 50.0;
        assert!(crop.validate("tomato").is_err());

        let mut crop = CropProfile::tomato();
        crop.surcharge_base_temp = -1e300;
        assert!(crop.validate("tomato").is_err());

        let mut crop = CropProfile::tomato();
        crop.plot_area_m2 = MAX_PLOT_AREA_M2;
        crop.root_depth_m = MAX_ROOT_DEPTH_M;
        assert!(crop.validate("tomato").is_ok());
    }

    #[test]
    fn standard_volumes_are_bounded() {
        let v = IrrigationVolumes {
            base_volume_ml: MAX_VOLUME_ML + 1,
            ..IrrigationVolumes::default()
        };
        assert!(v.validate().is_err());

        let v = IrrigationVolumes {
            surcharge_per_degree: 2.0,
            ..IrrigationVolumes::default()
        };
        assert!(v.validate().is_err());
    }

    #[test]
    fn missing_threshold_fails_to_parse() {
        let yaml = "soil_moisture_critical: 20\nsoil_moisture_low: 40\n";
        assert!(serde_yaml::from_str::<Thresholds>(yaml).is_err());
    }

    #[test]
    fn non_numeric_threshold_fails_to_parse() {
        let mut yaml = serde_yaml::to_string(&Thresholds::default()).unwrap();
        yaml = yaml.replace("humidity_low: 40.0", "humidity_low: dry");
        assert!(serde_yaml::from_str::<Thresholds>(&yaml).is_err());
    }
}
