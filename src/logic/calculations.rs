use crate::models::SensorReading;

/// Mean soil moisture over a slice of readings
pub fn average_soil_moisture(readings: &[SensorReading]) -> Option<f64> {
    if readings.is_empty() {
        None
    } else {
        Some(readings.iter().map(|r| r.soil_moisture).sum::<f64>() / readings.len() as f64)
    }
}

/// Multiplier applied to watering volumes in hot weather.
/// Linear in the degrees above `base_temp_c`; 1.0 at or below it.
pub fn temperature_factor(temp_c: f64, base_temp_c: f64, per_degree: f64) -> f64 {
    1.0 + (temp_c - base_temp_c).max(0.0) * per_degree
}

/// Round a volume to the nearest whole milliliter.
///
/// Configuration bounds keep real volumes many orders of magnitude below
/// the `u64` ceiling.
pub fn round_ml(volume_ml: f64) -> u64 {
    volume_ml.round().clamp(0.0, u64::MAX as f64) as u64
}

pub fn liters_to_ml(liters: f64) -> u64 {
    round_ml(liters * 1000.0)
}

/// Water (liters) needed to raise a plot's root zone from `current_pct` to
/// `target_pct` volumetric moisture. Zero when already at or above target.
pub fn moisture_deficit_liters(
    target_pct: f64,
    current_pct: f64,
    plot_area_m2: f64,
    root_depth_m: f64,
) -> f64 {
    let deficit = ((target_pct - current_pct) / 100.0).max(0.0);
    // m³ of root zone × fraction × 1000 L/m³
    plot_area_m2 * root_depth_m * deficit * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reading(moisture: f64) -> SensorReading {
        SensorReading::new("S1", moisture, 20.0, 50.0, Utc::now())
    }

    #[test]
    fn average_of_empty_is_none() {
        assert!(average_soil_moisture(&[]).is_none());
    }

    #[test]
    fn average_soil_moisture_known_values() {
        let readings = vec![reading(30.0), reading(40.0), reading(50.0)];
        assert!((average_soil_moisture(&readings).unwrap() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn temperature_factor_only_above_base() {
        assert_eq!(temperature_factor(20.0, 25.0, 0.05), 1.0);
        assert_eq!(temperature_factor(25.0, 25.0, 0.05), 1.0);
        assert!((temperature_factor(32.0, 25.0, 0.05) - 1.35).abs() < 1e-9);
        // Uncapped
        assert!((temperature_factor(60.0, 25.0, 0.05) - 2.75).abs() < 1e-9);
    }

    #[test]
    fn round_ml_rounds_half_away_from_zero() {
        assert_eq!(round_ml(4049.5), 4050);
        assert_eq!(round_ml(4049.4), 4049);
        assert_eq!(round_ml(-3.0), 0);
    }

    #[test]
    fn liters_conversion() {
        assert_eq!(liters_to_ml(1.0), 1000);
        assert_eq!(liters_to_ml(12.3456), 12346);
    }

    #[test]
    fn volumes_above_u32_are_exact() {
        // 600 000 m³ of water, well past 2^32 mL
        assert_eq!(liters_to_ml(600_000_000.0), 600_000_000_000);
    }

    #[test]
    fn deficit_for_standard_plot() {
        // 100 m² × 0.3 m × 40% × 1000 = 12 000 L
        let liters = moisture_deficit_liters(60.0, 20.0, 100.0, 0.3);
        assert!((liters - 12_000.0).abs() < 1e-6);
        assert_eq!(moisture_deficit_liters(60.0, 65.0, 100.0, 0.3), 0.0);
    }
}
