pub mod alerts;
pub mod crop_profile;
pub mod engine;
pub mod fertilization;
pub mod irrigation;
pub mod registry;

pub use crop_profile::CropProfileIrrigation;
pub use engine::DecisionEngine;
pub use registry::StrategyRegistry;

use crate::models::{IrrigationDecision, SensorReading, Trend};

/// An irrigation evaluator, typically one per crop type
pub trait IrrigationStrategy: Send + Sync {
    /// Registry key, lowercase
    fn id(&self) -> &str;

    /// Human-readable name
    fn name(&self) -> &str;

    /// Decide whether and how much to water.
    ///
    /// `trend` has already been computed from `history` by the engine.
    fn calculate(
        &self,
        reading: &SensorReading,
        history: &[SensorReading],
        trend: Trend,
    ) -> IrrigationDecision;
}
