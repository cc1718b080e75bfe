use super::IrrigationStrategy;
use crate::logic::calculations::{round_ml, temperature_factor};
use crate::logic::thresholds::{IrrigationVolumes, Thresholds};
use crate::models::{IrrigationAction, IrrigationDecision, Priority, SensorReading, Trend};

pub const STANDARD_ID: &str = "standard";

/// Default irrigation ladder
///
/// The moisture axis is partitioned into four bands, first match wins:
/// - moisture < critical: water immediately, fixed volume, high priority
/// - critical <= moisture < low: water, temperature-adjusted volume
/// - moisture > high: stop watering
/// - otherwise: monitor
pub struct StandardIrrigation {
    thresholds: Thresholds,
    volumes: IrrigationVolumes,
}

impl StandardIrrigation {
    pub fn new(thresholds: Thresholds, volumes: IrrigationVolumes) -> Self {
        Self {
            thresholds,
            volumes,
        }
    }
}

impl IrrigationStrategy for StandardIrrigation {
    fn id(&self) -> &str {
        STANDARD_ID
    }

    fn name(&self) -> &str {
        "Standard"
    }

    fn calculate(
        &self,
        reading: &SensorReading,
        _history: &[SensorReading],
        trend: Trend,
    ) -> IrrigationDecision {
        evaluate_irrigation(reading, trend, &self.thresholds, &self.volumes)
    }
}

pub fn evaluate_irrigation(
    reading: &SensorReading,
    trend: Trend,
    thresholds: &Thresholds,
    volumes: &IrrigationVolumes,
) -> IrrigationDecision {
    let moisture = reading.soil_moisture;
    let temp = reading.temperature_c;

    if moisture < thresholds.soil_moisture_critical {
        IrrigationDecision::watering(
            STANDARD_ID,
            IrrigationAction::WaterImmediately,
            volumes.critical_volume_ml,
            Priority::High,
            format!(
                "Critical: Soil moisture at {:.1}% is below {:.0}%. \
                 Immediate watering required to prevent crop stress.",
                moisture, thresholds.soil_moisture_critical
            ),
        )
    } else if moisture < thresholds.soil_moisture_low {
        let factor = temperature_factor(
            temp,
            volumes.surcharge_base_temp,
            volumes.surcharge_per_degree,
        );
        let volume = round_ml(volumes.base_volume_ml as f64 * factor);

        IrrigationDecision::watering(
            STANDARD_ID,
            IrrigationAction::Water,
            volume,
            Priority::Medium,
            with_trend(
                format!(
                    "Soil moisture at {:.1}% is below optimal range ({:.0}-{:.0}%). \
                     Temperature is {:.1}°C.",
                    moisture, thresholds.soil_moisture_low, thresholds.soil_moisture_high, temp
                ),
                trend,
            ),
        )
    } else if moisture > thresholds.soil_moisture_high {
        IrrigationDecision::hold(
            STANDARD_ID,
            IrrigationAction::StopWatering,
            format!(
                "Soil moisture at {:.1}% is above optimal range. Risk of overwatering. \
                 Allow soil to dry naturally.",
                moisture
            ),
        )
    } else {
        IrrigationDecision::hold(
            STANDARD_ID,
            IrrigationAction::Monitor,
            with_trend(
                format!(
                    "Soil moisture at {:.1}% is optimal. Continue monitoring.",
                    moisture
                ),
                trend,
            ),
        )
    }
}

pub(crate) fn with_trend(sentence: String, trend: Trend) -> String {
    match trend {
        Trend::None => sentence,
        _ => format!("{} {}", sentence, trend.clause()),
    }
}
