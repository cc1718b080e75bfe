use super::irrigation::with_trend;
use super::IrrigationStrategy;
use crate::logic::calculations::{liters_to_ml, moisture_deficit_liters, temperature_factor};
use crate::logic::thresholds::CropProfile;
use crate::models::{IrrigationAction, IrrigationDecision, Priority, SensorReading, Trend};

/// Deficit-based irrigation for a specific crop
///
/// Volume is the water needed to lift the root zone back to the crop's
/// optimal minimum, scaled up in hot weather:
///
/// liters = area × root depth × (optimal_min − moisture)/100 × 1000
///          × (1 + max(0, temp − base) × surcharge)
///
/// Decisions carry milliliters like every other strategy.
pub struct CropProfileIrrigation {
    id: String,
    profile: CropProfile,
}

impl CropProfileIrrigation {
    pub fn new(id: impl Into<String>, profile: CropProfile) -> Self {
        Self {
            id: id.into().to_lowercase(),
            profile,
        }
    }

    fn volume_ml(&self, moisture: f64, temp: f64) -> u64 {
        let p = &self.profile;
        let deficit = moisture_deficit_liters(
            p.soil_moisture_optimal_min,
            moisture,
            p.plot_area_m2,
            p.root_depth_m,
        );
        let liters =
            deficit * temperature_factor(temp, p.surcharge_base_temp, p.surcharge_per_degree);
        liters_to_ml(liters)
    }
}

impl IrrigationStrategy for CropProfileIrrigation {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.profile.name
    }

    fn calculate(
        &self,
        reading: &SensorReading,
        _history: &[SensorReading],
        trend: Trend,
    ) -> IrrigationDecision {
        let p = &self.profile;
        let moisture = reading.soil_moisture;
        let temp = reading.temperature_c;

        if moisture < p.soil_moisture_critical {
            let volume = self.volume_ml(moisture, temp);
            IrrigationDecision::watering(
                &self.id,
                IrrigationAction::WaterImmediately,
                volume,
                Priority::High,
                format!(
                    "Critical: {} soil moisture {:.1}% is below wilting point ({:.0}%). \
                     Apply {:.1} L now to restore {:.0}%. Re-check within 4 hours.",
                    p.name,
                    moisture,
                    p.soil_moisture_critical,
                    volume as f64 / 1000.0,
                    p.soil_moisture_optimal_min
                ),
            )
        } else if moisture < p.soil_moisture_low {
            let volume = self.volume_ml(moisture, temp);
            IrrigationDecision::watering(
                &self.id,
                IrrigationAction::Water,
                volume,
                Priority::Medium,
                with_trend(
                    format!(
                        "{} soil moisture {:.1}% is below {:.0}%. Apply {:.1} L to reach \
                         the optimal range ({:.0}-{:.0}%). Temperature is {:.1}°C.",
                        p.name,
                        moisture,
                        p.soil_moisture_low,
                        volume as f64 / 1000.0,
                        p.soil_moisture_optimal_min,
                        p.soil_moisture_optimal_max,
                        temp
                    ),
                    trend,
                ),
            )
        } else if moisture > p.soil_moisture_excess {
            IrrigationDecision::hold(
                &self.id,
                IrrigationAction::StopWatering,
                format!(
                    "{} soil moisture {:.1}% exceeds {:.0}%. Risk of overwatering and \
                     root disease. Suspend irrigation until soil drains.",
                    p.name, moisture, p.soil_moisture_excess
                ),
            )
        } else {
            IrrigationDecision::hold(
                &self.id,
                IrrigationAction::Monitor,
                with_trend(
                    format!(
                        "{} soil moisture {:.1}% is adequate. Continue monitoring.",
                        p.name, moisture
                    ),
                    trend,
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(moisture: f64, temp: f64) -> SensorReading {
        SensorReading::new("TEST_01", moisture, temp, 50.0, Utc::now())
    }

    fn tomato() -> CropProfileIrrigation {
        CropProfileIrrigation::new("Tomato", CropProfile::tomato())
    }

    #[test]
    fn id_is_lowercased() {
        assert_eq!(tomato().id(), "tomato");
        assert_eq!(tomato().name(), "Tomato");
    }

    #[test]
    fn critical_moisture_waters_the_full_deficit() {
        let d = tomato().calculate(&reading(15.0, 25.0), &[], Trend::None);
        assert_eq!(d.action, IrrigationAction::WaterImmediately);
        assert_eq!(d.priority, Priority::High);
        // 100 m² × 0.3 m × 45% × 1000 L/m³ = 13 500 L
        assert_eq!(d.volume_ml, 13_500_000);
        assert_eq!(d.strategy, "tomato");
        assert!(d.explanation.contains("Critical"));
    }

    #[test]
    fn heat_surcharge_is_two_percent_per_degree() {
        let d = tomato().calculate(&reading(35.0, 30.0), &[], Trend::None);
        assert_eq!(d.action, IrrigationAction::Water);
        // 30 m³ × 25% × 1000 = 7 500 L × 1.10
        assert_eq!(d.volume_ml, 8_250_000);
    }

    #[test]
    fn optimal_band_monitors() {
        let d = tomato().calculate(&reading(70.0, 25.0), &[], Trend::Stable);
        assert_eq!(d.action, IrrigationAction::Monitor);
        assert_eq!(d.volume_ml, 0);
        assert!(d.explanation.ends_with("Trend: Stable."));
    }

    #[test]
    fn excess_uses_crop_threshold_not_standard_high() {
        // 80% is above the standard ladder's 70% but within tomato tolerance
        let d = tomato().calculate(&reading(80.0, 25.0), &[], Trend::None);
        assert_eq!(d.action, IrrigationAction::Monitor);

        let d = tomato().calculate(&reading(90.0, 25.0), &[], Trend::None);
        assert_eq!(d.action, IrrigationAction::StopWatering);
        assert_eq!(d.volume_ml, 0);
    }

    #[test]
    fn lettuce_waters_earlier_than_tomato() {
        let lettuce = CropProfileIrrigation::new("lettuce", CropProfile::lettuce());
        let r = reading(45.0, 22.0);
        assert_eq!(
            lettuce.calculate(&r, &[], Trend::None).action,
            IrrigationAction::Water
        );
        assert_eq!(
            tomato().calculate(&r, &[], Trend::None).action,
            IrrigationAction::Monitor
        );
    }

    #[test]
    fn large_plot_volume_is_not_truncated() {
        let mut profile = CropProfile::tomato();
        profile.plot_area_m2 = 1_000_000.0;
        profile.root_depth_m = 1.0;
        assert!(profile.validate("estate").is_ok());
        let strategy = CropProfileIrrigation::new("estate", profile);

        let d = strategy.calculate(&reading(0.0, 25.0), &[], Trend::None);
        // 1 000 000 m³ × 60% × 1000 L/m³ = 600 000 000 L
        assert_eq!(d.volume_ml, 600_000_000_000);
        assert!(d.volume_ml > u64::from(u32::MAX));
    }

    #[test]
    fn watering_volume_always_positive() {
        let strategy = tomato();
        for tenth in 0..400 {
            let moisture = f64::from(tenth) / 10.0;
            let d = strategy.calculate(&reading(moisture, 20.0), &[], Trend::None);
            assert!(d.action.is_watering());
            assert!(d.volume_ml > 0);
        }
    }
}
