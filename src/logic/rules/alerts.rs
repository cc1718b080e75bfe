use crate::logic::thresholds::Thresholds;
use crate::models::{Alert, AlertKind, SensorReading};

/// Threshold alerts for a single reading.
///
/// Checks are independent and all evaluated; output order is fixed:
/// drought, overwatering, heat or cold (never both), low humidity.
pub fn generate_alerts(reading: &SensorReading, thresholds: &Thresholds) -> Vec<Alert> {
    let moisture = reading.soil_moisture;
    let temp = reading.temperature_c;
    let humidity = reading.humidity;

    let mut alerts = Vec::new();

    if moisture < thresholds.soil_moisture_critical && temp > thresholds.temp_drought {
        alerts.push(Alert::new(
            AlertKind::DroughtRisk,
            format!(
                "DROUGHT RISK: Critical soil moisture ({:.1}%) combined with high \
                 temperature ({:.1}°C)",
                moisture, temp
            ),
        ));
    }

    if moisture > thresholds.soil_moisture_high && humidity > thresholds.humidity_overwatering {
        alerts.push(Alert::new(
            AlertKind::OverwateringRisk,
            format!(
                "OVERWATERING RISK: High soil moisture ({:.1}%) and humidity ({:.1}%) \
                 may cause root rot",
                moisture, humidity
            ),
        ));
    }

    if temp > thresholds.temp_heat_stress {
        alerts.push(Alert::new(
            AlertKind::HeatStress,
            format!(
                "HEAT STRESS: Temperature {:.1}°C exceeds {:.0}°C. Consider shade or \
                 increased irrigation.",
                temp, thresholds.temp_heat_stress
            ),
        ));
    } else if temp < thresholds.temp_cold_stress {
        alerts.push(Alert::new(
            AlertKind::ColdStress,
            format!(
                "COLD STRESS: Temperature {:.1}°C is below {:.0}°C. Risk of frost damage.",
                temp, thresholds.temp_cold_stress
            ),
        ));
    }

    if humidity < thresholds.humidity_low {
        alerts.push(Alert::new(
            AlertKind::LowHumidity,
            format!(
                "LOW HUMIDITY: {:.1}% humidity may increase water stress. Monitor closely.",
                humidity
            ),
        ));
    }

    alerts
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn alerts_for(moisture: f64, temp: f64, humidity: f64) -> Vec<Alert> {
        let reading = SensorReading::new("S1", moisture, temp, humidity, Utc::now());
        generate_alerts(&reading, &Thresholds::default())
    }

    fn kinds(alerts: &[Alert]) -> Vec<AlertKind> {
        alerts.iter().map(|a| a.kind).collect()
    }

    #[test]
    fn comfortable_conditions_raise_nothing() {
        assert!(alerts_for(50.0, 22.0, 60.0).is_empty());
    }

    #[test]
    fn drought_requires_dry_soil_and_heat() {
        assert_eq!(kinds(&alerts_for(15.0, 32.0, 50.0)), vec![AlertKind::DroughtRisk]);
        assert!(alerts_for(15.0, 30.0, 50.0).is_empty());
        assert!(alerts_for(25.0, 32.0, 50.0).is_empty());
    }

    #[test]
    fn overwatering_requires_wet_soil_and_humid_air() {
        let alerts = alerts_for(90.0, 25.0, 85.0);
        assert_eq!(kinds(&alerts), vec![AlertKind::OverwateringRisk]);
        assert!(alerts[0].message.contains("90.0%"));
        assert!(alerts[0].message.contains("85.0%"));
        assert!(alerts_for(90.0, 25.0, 80.0).is_empty());
    }

    #[test]
    fn heat_and_cold_are_exclusive() {
        assert_eq!(kinds(&alerts_for(50.0, 36.0, 50.0)), vec![AlertKind::HeatStress]);
        assert_eq!(kinds(&alerts_for(50.0, 9.0, 50.0)), vec![AlertKind::ColdStress]);
        assert!(alerts_for(50.0, 35.0, 50.0).is_empty());
        assert!(alerts_for(50.0, 10.0, 50.0).is_empty());
    }

    #[test]
    fn independent_checks_stack_in_fixed_order() {
        let alerts = alerts_for(15.0, 38.0, 30.0);
        assert_eq!(
            kinds(&alerts),
            vec![
                AlertKind::DroughtRisk,
                AlertKind::HeatStress,
                AlertKind::LowHumidity
            ]
        );
    }

    #[test]
    fn dry_hot_and_humid_reading_only_raises_drought() {
        // Humid air doesn't interfere with the drought check
        let alerts = alerts_for(15.0, 32.0, 85.0);
        assert_eq!(kinds(&alerts), vec![AlertKind::DroughtRisk]);
    }

    #[test]
    fn messages_are_deterministic() {
        assert_eq!(alerts_for(15.0, 38.0, 30.0), alerts_for(15.0, 38.0, 30.0));
    }
}
