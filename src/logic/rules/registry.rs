use super::irrigation::{StandardIrrigation, STANDARD_ID};
use super::{CropProfileIrrigation, IrrigationStrategy};
use crate::error::{AgriError, Result};
use crate::logic::thresholds::{CropProfile, IrrigationVolumes, Thresholds};
use std::collections::BTreeMap;

/// Crop key → irrigation strategy, with the standard ladder as fallback.
pub struct StrategyRegistry {
    strategies: BTreeMap<String, Box<dyn IrrigationStrategy>>,
    fallback: Box<dyn IrrigationStrategy>,
}

impl StrategyRegistry {
    pub fn new(thresholds: &Thresholds, volumes: &IrrigationVolumes) -> Self {
        Self {
            strategies: BTreeMap::new(),
            fallback: Box::new(StandardIrrigation::new(thresholds.clone(), volumes.clone())),
        }
    }

    /// Registry with one deficit strategy per crop profile.
    pub fn with_crops<'a>(
        thresholds: &Thresholds,
        volumes: &IrrigationVolumes,
        crops: impl IntoIterator<Item = (&'a String, &'a CropProfile)>,
    ) -> Result<Self> {
        let mut registry = Self::new(thresholds, volumes);
        for (key, profile) in crops {
            registry.register(Box::new(CropProfileIrrigation::new(
                key.as_str(),
                profile.clone(),
            )))?;
        }
        Ok(registry)
    }

    /// Add a strategy under its `id()`. A strategy with the same id is replaced.
    ///
    /// The `standard` id is reserved for the fallback ladder and is rejected.
    pub fn register(&mut self, strategy: Box<dyn IrrigationStrategy>) -> Result<()> {
        let key = strategy.id().trim().to_lowercase();
        if key == STANDARD_ID {
            return Err(AgriError::Config(format!(
                "crop id '{}' is reserved for the standard irrigation ladder",
                strategy.id()
            )));
        }
        if self.strategies.insert(key.clone(), strategy).is_some() {
            tracing::debug!(crop = %key, "Replaced irrigation strategy");
        }
        Ok(())
    }

    /// Strategy for a crop key, case-insensitive. Unknown crops fall back to
    /// the standard ladder.
    pub fn get(&self, crop: &str) -> &dyn IrrigationStrategy {
        let key = crop.trim().to_lowercase();
        if key == STANDARD_ID {
            return self.fallback.as_ref();
        }
        match self.strategies.get(&key) {
            Some(strategy) => strategy.as_ref(),
            None => {
                tracing::warn!(crop = %crop, "Unknown crop type, using standard irrigation");
                self.fallback.as_ref()
            }
        }
    }

    pub fn fallback(&self) -> &dyn IrrigationStrategy {
        self.fallback.as_ref()
    }

    #[cfg(test)]
    pub fn contains(&self, crop: &str) -> bool {
        let key = crop.trim().to_lowercase();
        key == STANDARD_ID || self.strategies.contains_key(&key)
    }

    /// (id, name) pairs, fallback first
    pub fn list(&self) -> Vec<(&str, &str)> {
        std::iter::once(self.fallback.as_ref())
            .chain(self.strategies.values().map(|s| s.as_ref()))
            .map(|s| (s.id(), s.name()))
            .collect()
    }
}
