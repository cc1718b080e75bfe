use super::alerts::generate_alerts;
use super::fertilization::evaluate_fertilization;
use super::{IrrigationStrategy, StrategyRegistry};
use crate::config::Config;
use crate::error::{AgriError, Result};
use crate::logic::thresholds::{CropProfile, FertilizationPolicy, IrrigationVolumes, Thresholds};
use crate::logic::trend::compute_trend;
use crate::models::{Recommendation, SensorReading};
use chrono::Utc;

/// Assembles irrigation, fertilization and alerts into one recommendation.
///
/// Immutable after construction and holds no per-request state, so a single
/// engine can be shared across threads.
pub struct DecisionEngine {
    thresholds: Thresholds,
    fertilization: FertilizationPolicy,
    registry: StrategyRegistry,
}

impl DecisionEngine {
    pub fn new(
        thresholds: Thresholds,
        fertilization: FertilizationPolicy,
        registry: StrategyRegistry,
    ) -> Self {
        Self {
            thresholds,
            fertilization,
            registry,
        }
    }

    /// Validate the engine sections of `config` and build an engine from them.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let registry =
            StrategyRegistry::with_crops(&config.thresholds, &config.irrigation, &config.crops)?;
        Ok(Self::new(
            config.thresholds.clone(),
            config.fertilization.clone(),
            registry,
        ))
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    /// Recommendation using the standard irrigation ladder.
    pub fn generate_recommendation(
        &self,
        reading: &SensorReading,
        history: &[SensorReading],
    ) -> Result<Recommendation> {
        self.assemble(self.registry.fallback(), reading, history)
    }

    /// Recommendation using the irrigation strategy registered for `crop`.
    pub fn generate_for_crop(
        &self,
        crop: &str,
        reading: &SensorReading,
        history: &[SensorReading],
    ) -> Result<Recommendation> {
        self.assemble(self.registry.get(crop), reading, history)
    }

    fn assemble(
        &self,
        strategy: &dyn IrrigationStrategy,
        reading: &SensorReading,
        history: &[SensorReading],
    ) -> Result<Recommendation> {
        check_inputs(reading, history)?;

        let trend = compute_trend(history, self.thresholds.trend_delta);
        let irrigation = strategy.calculate(reading, history, trend);
        let fertilization = evaluate_fertilization(reading, history, &self.fertilization);
        let alerts = generate_alerts(reading, &self.thresholds);

        tracing::debug!(
            sensor_id = %reading.sensor_id,
            strategy = strategy.id(),
            %trend,
            action = %irrigation.action,
            volume_ml = irrigation.volume_ml,
            fertilize = fertilization.needed,
            alerts = alerts.len(),
            "Recommendation generated"
        );

        Ok(Recommendation {
            sensor_id: reading.sensor_id.clone(),
            generated_at: Utc::now(),
            trend,
            irrigation,
            fertilization,
            alerts,
        })
    }
}

impl Default for DecisionEngine {
    fn default() -> Self {
        let thresholds = Thresholds::default();
        let volumes = IrrigationVolumes::default();
        let crops = default_crops();
        let registry = StrategyRegistry::with_crops(&thresholds, &volumes, &crops)
            .expect("built-in crop keys are not reserved");
        Self::new(thresholds, FertilizationPolicy::default(), registry)
    }
}

pub fn default_crops() -> std::collections::BTreeMap<String, CropProfile> {
    [
        ("tomato".to_string(), CropProfile::tomato()),
        ("lettuce".to_string(), CropProfile::lettuce()),
    ]
    .into_iter()
    .collect()
}

fn check_inputs(reading: &SensorReading, history: &[SensorReading]) -> Result<()> {
    reading.check_bounds()?;
    for (i, entry) in history.iter().enumerate() {
        if entry.sensor_id != reading.sensor_id {
            return Err(AgriError::InvalidInput(format!(
                "history entry {} belongs to sensor '{}', expected '{}'",
                i, entry.sensor_id, reading.sensor_id
            )));
        }
        entry
            .check_bounds()
            .map_err(|e| AgriError::InvalidInput(format!("history entry {}: {}", i, e)))?;
    }
    Ok(())
}
