use crate::error::{AgriError, Result};
use chrono::{DateTime, Duration, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::sync::LazyLock;

pub const MOISTURE_RANGE: RangeInclusive<f64> = 0.0..=100.0;
pub const TEMPERATURE_RANGE_C: RangeInclusive<f64> = -50.0..=60.0;
pub const HUMIDITY_RANGE: RangeInclusive<f64> = 0.0..=100.0;

pub const MAX_SENSOR_ID_LEN: usize = 50;

/// How far ahead of the local clock a sensor timestamp may drift.
pub const FUTURE_TOLERANCE_MINUTES: i64 = 5;
/// Readings older than this are rejected at ingestion.
pub const RETENTION_DAYS: i64 = 7;

static SENSOR_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("sensor id pattern is valid"));

/// One timestamped sample from a field sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: Option<i64>,
    pub sensor_id: String,
    /// Volumetric soil moisture, percent.
    pub soil_moisture: f64,
    pub temperature_c: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    pub timestamp: DateTime<Utc>,
}

impl SensorReading {
    pub fn new(
        sensor_id: impl Into<String>,
        soil_moisture: f64,
        temperature_c: f64,
        humidity: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: None,
            sensor_id: sensor_id.into(),
            soil_moisture,
            temperature_c,
            humidity,
            timestamp,
        }
    }

    /// Structural checks applied wherever a reading enters the decision engine.
    ///
    /// Timestamps are not checked here: stored history is allowed to age past
    /// the ingestion retention window.
    pub fn check_bounds(&self) -> Result<()> {
        if self.sensor_id.trim().is_empty() {
            return Err(AgriError::InvalidInput("sensor_id must not be empty".into()));
        }
        check_field("soil_moisture", self.soil_moisture, &MOISTURE_RANGE)?;
        check_field("temperature_c", self.temperature_c, &TEMPERATURE_RANGE_C)?;
        check_field("humidity", self.humidity, &HUMIDITY_RANGE)?;
        Ok(())
    }
}

fn check_field(name: &str, value: f64, range: &RangeInclusive<f64>) -> Result<()> {
    if !value.is_finite() {
        return Err(AgriError::InvalidInput(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    if !range.contains(&value) {
        return Err(AgriError::InvalidInput(format!(
            "{} {} is outside {}..={}",
            name,
            value,
            range.start(),
            range.end()
        )));
    }
    Ok(())
}

/// Unvalidated reading as submitted by a sensor or the `ingest` command.
#[derive(Debug, Clone, Deserialize)]
pub struct NewReading {
    pub sensor_id: String,
    pub soil_moisture: f64,
    pub temperature_c: f64,
    pub humidity: f64,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl NewReading {
    /// Validate against ingestion rules and produce a reading ready for storage.
    /// A missing timestamp is stamped with `now`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<SensorReading> {
        validate_sensor_id(&self.sensor_id)?;

        let timestamp = self.timestamp.unwrap_or(now);
        if timestamp > now + Duration::minutes(FUTURE_TOLERANCE_MINUTES) {
            return Err(AgriError::InvalidInput(format!(
                "timestamp {} is in the future",
                timestamp.to_rfc3339()
            )));
        }
        if timestamp < now - Duration::days(RETENTION_DAYS) {
            return Err(AgriError::InvalidInput(format!(
                "timestamp {} is older than {} days",
                timestamp.to_rfc3339(),
                RETENTION_DAYS
            )));
        }

        let reading = SensorReading::new(
            self.sensor_id,
            self.soil_moisture,
            self.temperature_c,
            self.humidity,
            timestamp,
        );
        reading.check_bounds()?;
        Ok(reading)
    }
}

pub fn validate_sensor_id(sensor_id: &str) -> Result<()> {
    if sensor_id.is_empty() || sensor_id.len() > MAX_SENSOR_ID_LEN {
        return Err(AgriError::InvalidInput(format!(
            "sensor_id must be 1-{} characters",
            MAX_SENSOR_ID_LEN
        )));
    }
    if !SENSOR_ID_PATTERN.is_match(sensor_id) {
        return Err(AgriError::InvalidInput(format!(
            "sensor_id '{}' may only contain letters, digits, '_' and '-'",
            sensor_id
        )));
    }
    Ok(())
}

/// Qualitative direction of soil moisture change across the history window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Not enough history to say anything.
    #[default]
    None,
    Stable,
    Increasing,
    Decreasing,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::None => "none",
            Trend::Stable => "stable",
            Trend::Increasing => "increasing",
            Trend::Decreasing => "decreasing",
        }
    }

    /// Sentence appended to irrigation explanations. Empty for `Trend::None`.
    pub fn clause(&self) -> &'static str {
        match self {
            Trend::None => "",
            Trend::Stable => "Trend: Stable.",
            Trend::Increasing => "Trend: Moisture increasing.",
            Trend::Decreasing => "Trend: Moisture decreasing.",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submitted(sensor_id: &str) -> NewReading {
        NewReading {
            sensor_id: sensor_id.to_string(),
            soil_moisture: 35.0,
            temperature_c: 22.0,
            humidity: 55.0,
            timestamp: None,
        }
    }

    #[test]
    fn validate_stamps_missing_timestamp() {
        let now = Utc::now();
        let reading = submitted("FIELD_01").validate(now).unwrap();
        assert_eq!(reading.timestamp, now);
        assert_eq!(reading.sensor_id, "FIELD_01");
        assert!(reading.id.is_none());
    }

    #[test]
    fn validate_rejects_bad_sensor_ids() {
        let now = Utc::now();
        assert!(submitted("").validate(now).is_err());
        assert!(submitted("field'; DROP TABLE").validate(now).is_err());
        assert!(submitted("a/b").validate(now).is_err());
        assert!(submitted(&"x".repeat(51)).validate(now).is_err());
        assert!(submitted(&"x".repeat(50)).validate(now).is_ok());
        assert!(submitted("north-plot_3").validate(now).is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range_fields() {
        let now = Utc::now();

        let mut r = submitted("S1");
        r.soil_moisture = 100.5;
        assert!(matches!(r.validate(now), Err(AgriError::InvalidInput(_))));

        let mut r = submitted("S1");
        r.temperature_c = -50.1;
        assert!(r.validate(now).is_err());

        let mut r = submitted("S1");
        r.temperature_c = 60.0;
        assert!(r.validate(now).is_ok());

        let mut r = submitted("S1");
        r.humidity = f64::NAN;
        assert!(r.validate(now).is_err());
    }

    #[test]
    fn validate_rejects_future_and_stale_timestamps() {
        let now = Utc::now();

        let mut r = submitted("S1");
        r.timestamp = Some(now + Duration::minutes(4));
        assert!(r.validate(now).is_ok());

        let mut r = submitted("S1");
        r.timestamp = Some(now + Duration::minutes(6));
        assert!(r.validate(now).is_err());

        let mut r = submitted("S1");
        r.timestamp = Some(now - Duration::days(8));
        assert!(r.validate(now).is_err());
    }

    #[test]
    fn check_bounds_rejects_blank_sensor() {
        let reading = SensorReading::new("  ", 30.0, 20.0, 50.0, Utc::now());
        assert!(reading.check_bounds().is_err());
    }

    #[test]
    fn trend_clause() {
        assert_eq!(Trend::None.clause(), "");
        assert!(Trend::Stable.clause().contains("Stable"));
        assert!(Trend::Increasing.clause().contains("increasing"));
        assert!(Trend::Decreasing.clause().contains("decreasing"));
    }
}
